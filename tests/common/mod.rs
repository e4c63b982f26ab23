#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use action_seg_datasets::data::mat_writer::MatWriter;
use ndarray::Array2;

/// Time x features matrix whose entry `[t, f]` is `t * 10 + f`.
pub fn time_major(len: usize, n_features: usize) -> Array2<f64> {
    Array2::from_shape_fn((len, n_features), |(t, f)| (t * 10 + f) as f64)
}

pub fn write_labels(dir: &Path, file: &str, y: &[f64]) {
    fs::create_dir_all(dir).unwrap();
    MatWriter::new().row("Y", y).save(&dir.join(file)).unwrap();
}

pub fn write_features(dir: &Path, file: &str, x: &Array2<f64>) {
    fs::create_dir_all(dir).unwrap();
    MatWriter::new().matrix("X", x).save(&dir.join(file)).unwrap();
}

pub fn write_both(dir: &Path, file: &str, x: &Array2<f64>, y: &[f64]) {
    fs::create_dir_all(dir).unwrap();
    MatWriter::new()
        .matrix("X", x)
        .row("Y", y)
        .save(&dir.join(file))
        .unwrap();
}

pub fn write_manifest(base: &Path, split: usize, train: &[&str], test: &[&str]) -> PathBuf {
    let dir = base.join("splits/sequences").join(split.to_string());
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("train.txt"), train.join("\n")).unwrap();
    fs::write(dir.join("test.txt"), test.join("\n")).unwrap();
    dir
}
