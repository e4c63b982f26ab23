use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::variant::DatasetKind;

/// What to load, as read from a JSON file:
///
/// ```json
/// {
///   "root": "~/data/",
///   "dataset": "JIGSAWS",
///   "features": "SpatialCNN",
///   "split": 2,
///   "sample_rate": 3,
///   "auxiliary": ["accel"]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Directory holding one subdirectory per dataset.
    pub root: PathBuf,
    pub dataset: DatasetKind,
    /// Feature set name under `<dataset>/features/`.
    pub features: String,
    #[serde(default = "one")]
    pub split: usize,
    #[serde(default = "one")]
    pub sample_rate: usize,
    /// Force the `Split_<n>/` layout instead of probing for it.
    #[serde(default)]
    pub sep_splits: bool,
    /// Extra feature sets loaded alongside the main one.
    #[serde(default)]
    pub auxiliary: Vec<String>,
}

fn one() -> usize {
    1
}

impl DatasetConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: DatasetConfig = serde_json::from_str(text).context("parsing dataset config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            bail!("sample_rate must be at least 1");
        }
        let n_splits = self.dataset.variant().n_splits();
        if self.split == 0 || self.split > n_splits {
            bail!(
                "split {} out of range for {} (1..={n_splits})",
                self.split,
                self.dataset
            );
        }
        Ok(())
    }
}

/// Expand a leading `~` to `$HOME`.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}
