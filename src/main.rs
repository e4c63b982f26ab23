use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use action_seg_datasets::{Dataset, DatasetConfig, LoadSummary};

#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    split: LoadSummary,
    /// Auxiliary feature set → (train, test) sequence counts.
    auxiliary: Vec<(String, usize, usize)>,
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(config_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: action-seg-datasets <config.json>");
        std::process::exit(2);
    };

    let config = DatasetConfig::from_file(&config_path)?;
    let dataset = Dataset::from_config(&config);
    info!(
        "loading {} / {} split {} from {}",
        dataset.name(),
        dataset.features(),
        config.split,
        dataset.base_dir().display()
    );

    let loaded = dataset
        .load_split(config.split, config.sample_rate)
        .with_context(|| format!("loading {} split {}", dataset.name(), config.split))?;

    if !loaded.report.is_clean() {
        warn!("split loaded with problems, see \"report\" in the output");
    }

    let mut auxiliary = Vec::with_capacity(config.auxiliary.len());
    for features in &config.auxiliary {
        let aux = dataset
            .load_auxiliary(features, config.split, config.sample_rate)
            .with_context(|| format!("loading auxiliary features '{features}'"))?;
        if !aux.report.is_clean() {
            warn!("auxiliary features '{features}' loaded with problems: {:?}", aux.report);
        }
        auxiliary.push((features.clone(), aux.train.len(), aux.test.len()));
    }

    let output = Output {
        split: loaded.summary(dataset.name(), dataset.features(), config.split),
        auxiliary,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
