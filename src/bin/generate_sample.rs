//! Writes a small synthetic data root with all three on-disk layouts.
//!
//! ```text
//! cargo run --bin generate_sample -- sample_data
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array2, ShapeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use action_seg_datasets::data::mat_writer::MatWriter;

const N_FEATURES: usize = 16;

/// Normal sample via Box-Muller.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Piecewise-constant labels drawn from `1..=n_classes` (one-based on purpose).
fn segment_labels(rng: &mut StdRng, len: usize, n_classes: usize, min_seg: usize) -> Vec<f64> {
    let mut y = Vec::with_capacity(len);
    while y.len() < len {
        let class = rng.gen_range(1..=n_classes) as f64;
        let seg = rng.gen_range(min_seg..min_seg * 3);
        y.extend(std::iter::repeat(class).take(seg.min(len - y.len())));
    }
    y
}

/// Time x features, i.e. the "wrong" orientation, with a class-dependent mean.
fn features_for(rng: &mut StdRng, labels: &[f64]) -> Result<Array2<f64>> {
    let data: Vec<f64> = (0..N_FEATURES)
        .flat_map(|f| labels.iter().map(move |&c| ((f as f64) * 0.1 + c) * 0.5))
        .map(|mean| gauss(rng, mean, 0.1))
        .collect();
    // column f holds feature f over time
    Ok(Array2::from_shape_vec((labels.len(), N_FEATURES).f(), data)?)
}

fn write_manifests(base: &Path, ids: &[String], n_splits: usize, ext: &str) -> Result<()> {
    for split in 1..=n_splits {
        let dir = base.join("splits/sequences").join(split.to_string());
        fs::create_dir_all(&dir)?;
        let (test, train): (Vec<_>, Vec<_>) = ids
            .iter()
            .enumerate()
            .partition(|(i, _)| i % n_splits == split - 1);
        let lines = |v: Vec<(usize, &String)>| {
            v.into_iter()
                .map(|(_, id)| format!("{id}{ext}\n"))
                .collect::<String>()
        };
        fs::write(dir.join("train.txt"), lines(train))?;
        fs::write(dir.join("test.txt"), lines(test))?;
    }
    Ok(())
}

fn jigsaws(root: &Path, rng: &mut StdRng) -> Result<()> {
    let base = root.join("JIGSAWS");
    let features = base.join("features/SpatialCNN");
    let labels = base.join("labels/sequences/Suturing");
    fs::create_dir_all(&features)?;
    fs::create_dir_all(&labels)?;

    let mut ids = Vec::new();
    let users = ["B", "C", "D", "E", "F", "G", "H"];
    for (user, trial) in users.iter().flat_map(|u| (1..=2).map(move |t| (u, t))) {
        let id = format!("Suturing_{user}00{trial}");
        let len = rng.gen_range(400..600);
        let y = segment_labels(rng, len, 10, 20);
        let x = features_for(rng, &y)?;
        MatWriter::new().row("Y", &y).save(&labels.join(format!("{id}.mat")))?;
        MatWriter::new().matrix("X", &x).save(&features.join(format!("{id}.mat")))?;
        ids.push(id);
    }
    write_manifests(&base, &ids, 7, ".txt")
}

fn salads(root: &Path, rng: &mut StdRng) -> Result<()> {
    let base = root.join("50Salads");
    let dir = base.join("features/SpatialCNN/Split_1");
    fs::create_dir_all(&dir)?;

    let mut ids = Vec::new();
    for person in 1..=5 {
        for take in 1..=2 {
            let id = format!("{person:02}-{take}");
            let len = rng.gen_range(3000..4000);
            let y = segment_labels(rng, len, 17, 400);
            let x = features_for(rng, &y)?;
            MatWriter::new()
                .matrix("X", &x)
                .row("Y", &y)
                .save(&dir.join(format!("rgb-{id}.avi.mat")))?;
            ids.push(id);
        }
    }
    write_manifests(&base, &ids, 5, ".avi")
}

fn endovis(root: &Path, rng: &mut StdRng) -> Result<()> {
    let base = root.join("EndoVis");
    let labels = base.join("labels/sequences");
    fs::create_dir_all(&labels)?;

    let ids: Vec<String> = (1..=7).map(|i| format!("Seg{i}")).collect();
    let mut sequences: Vec<(Vec<f64>, Array2<f64>)> = Vec::with_capacity(ids.len());
    for _ in &ids {
        let len = rng.gen_range(300..400);
        let y = segment_labels(rng, len, 7, 15);
        let x = features_for(rng, &y)?;
        sequences.push((y, x));
    }

    for (id, (y, _)) in ids.iter().zip(&sequences) {
        MatWriter::new().row("Y", y).save(&labels.join(format!("{id}.mat")))?;
    }
    // Per-split feature copies with extension drift.
    for split in 1..=7 {
        let dir = base.join(format!("features/SpatialCNN/Split_{split}"));
        fs::create_dir_all(&dir)?;
        for (id, (_, x)) in ids.iter().zip(&sequences) {
            MatWriter::new().matrix("X", x).save(&dir.join(format!("{id}.mp4.mat")))?;
        }
    }
    write_manifests(&base, &ids, 7, ".mat")
}

fn main() -> Result<()> {
    env_logger::init();

    let root = std::env::args().nth(1).unwrap_or_else(|| "sample_data".to_string());
    let root = Path::new(&root);
    let mut rng = StdRng::seed_from_u64(42);

    jigsaws(root, &mut rng).context("writing JIGSAWS")?;
    salads(root, &mut rng).context("writing 50Salads")?;
    endovis(root, &mut rng).context("writing EndoVis")?;

    println!("Wrote JIGSAWS, 50Salads and EndoVis samples to {}", root.display());
    Ok(())
}
