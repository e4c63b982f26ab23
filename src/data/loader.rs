use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use ndarray::{Array1, Array2};

use super::mat::MatContents;
use super::model::{AuxiliaryFeatures, LoadReport, LoadedSplit, Sequence, SplitManifest};
use super::resolve::closest_file;
use super::transform;
use super::variant::{DatasetKind, DatasetVariant};
use crate::config::{expand_home, DatasetConfig};
use crate::error::{DatasetError, Result};

const SPLIT_MARKER: &str = "Split_1";

// ---------------------------------------------------------------------------
// Dataset – one dataset root + feature set
// ---------------------------------------------------------------------------

/// A dataset root bound to one feature set.
///
/// Directories are fixed at construction; loading never mutates them.
#[derive(Debug)]
pub struct Dataset {
    variant: Box<dyn DatasetVariant>,
    base_dir: PathBuf,
    features: String,
    feature_dir: PathBuf,
    label_dir: PathBuf,
    sep_splits: bool,
}

impl Dataset {
    /// `root` is the directory holding `JIGSAWS/`, `50Salads/`, `EndoVis/`.
    pub fn new(kind: DatasetKind, root: &Path, features: &str) -> Self {
        Self::with_variant(kind.variant(), root, features)
    }

    pub fn with_variant(variant: Box<dyn DatasetVariant>, root: &Path, features: &str) -> Self {
        let base_dir = root.join(variant.name());
        let feature_dir = variant.feature_path(&base_dir, features);
        let label_dir = variant.label_path(&base_dir, features);
        Self {
            variant,
            base_dir,
            features: features.to_string(),
            feature_dir,
            label_dir,
            sep_splits: false,
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.dataset, &expand_home(&config.root), &config.features)
            .with_sep_splits(config.sep_splits)
    }

    /// Always read from `Split_<n>/` subdirectories instead of probing for them.
    pub fn with_sep_splits(mut self, sep_splits: bool) -> Self {
        self.sep_splits = sep_splits;
        self
    }

    pub fn name(&self) -> &'static str {
        self.variant.name()
    }

    pub fn n_splits(&self) -> usize {
        self.variant.n_splits()
    }

    pub fn features(&self) -> &str {
        &self.features
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn feature_dir(&self) -> &Path {
        &self.feature_dir
    }

    pub fn label_dir(&self) -> &Path {
        &self.label_dir
    }

    /// `dir/Split_<split>` when the per-split layout is in use, else `dir`.
    fn split_dir(&self, dir: &Path, split: usize) -> PathBuf {
        if self.sep_splits || dir.join(SPLIT_MARKER).exists() {
            dir.join(format!("Split_{split}"))
        } else {
            dir.to_path_buf()
        }
    }

    /// Sorted `.mat` entries of the (split-specific) label directory.
    pub fn files(&self, split: usize) -> Result<Vec<String>> {
        let dir = self.split_dir(&self.label_dir, split);
        let entries = std::fs::read_dir(&dir).map_err(|source| DatasetError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut files: Vec<String> = entries
            .flatten()
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.contains(".mat"))
            .collect();
        files.sort();
        Ok(files)
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load, normalize and partition one split.
    ///
    /// Labels are renumbered over the whole pool before partitioning, and a
    /// `sample_rate > 1` keeps every `sample_rate`-th frame. Missing files
    /// and manifest entries without a sequence end up in the report.
    pub fn load_split(&self, split: usize, sample_rate: usize) -> Result<LoadedSplit> {
        self.load_split_from(&self.feature_dir, split, sample_rate)
    }

    /// Load only the feature matrices of another feature set for `split`.
    ///
    /// The set lives at `features/<name>/`; per-split subdirectories under it
    /// are detected the same way as for the main set. Labels are still read
    /// to run the full pipeline, then discarded. Identifiers and the report
    /// are kept so callers can line the matrices up with [`Dataset::load_split`].
    pub fn load_auxiliary(
        &self,
        features: &str,
        split: usize,
        sample_rate: usize,
    ) -> Result<AuxiliaryFeatures> {
        let feature_dir = self.base_dir.join("features").join(features);
        let loaded = self.load_split_from(&feature_dir, split, sample_rate)?;

        let (train_ids, train) = loaded.train.into_iter().map(|s| (s.id, s.features)).unzip();
        let (test_ids, test) = loaded.test.into_iter().map(|s| (s.id, s.features)).unzip();
        Ok(AuxiliaryFeatures {
            train_ids,
            train,
            test_ids,
            test,
            report: loaded.report,
        })
    }

    fn load_split_from(
        &self,
        feature_dir: &Path,
        split: usize,
        sample_rate: usize,
    ) -> Result<LoadedSplit> {
        let manifest = SplitManifest::read(&self.base_dir, split)?;
        let files = self.files(split)?;
        let label_dir = self.split_dir(&self.label_dir, split);
        let feature_dir = self.split_dir(feature_dir, split);

        let mut report = LoadReport::default();
        let mut ids = Vec::with_capacity(files.len());
        let mut raw_labels = Vec::with_capacity(files.len());
        let mut raw_features = Vec::with_capacity(files.len());

        for file in &files {
            match load_pair(&label_dir, &feature_dir, file) {
                Ok((y, x)) => {
                    ids.push(self.variant.identifier_of(file));
                    raw_labels.push(y);
                    raw_features.push(x);
                }
                Err(DatasetError::FileNotFound { candidate }) => {
                    warn!("can't find file {}, dropping sequence", candidate.display());
                    report.missing_files.push(candidate);
                }
                Err(e) => return Err(e),
            }
        }

        let mut labels = transform::remap_labels(&raw_labels);
        if let Some(window) = self.variant.label_smoothing() {
            let smoothed: Vec<_> = labels
                .iter()
                .map(|y| transform::median_filter(y, window))
                .collect();
            labels = transform::redensify(&smoothed);
        }

        let mut features = transform::orient(raw_features);

        if sample_rate > 1 {
            (features, labels) = features
                .iter()
                .zip(&labels)
                .map(|(x, y)| transform::subsample(x, y, sample_rate))
                .unzip();
        }

        let n_classes = transform::count_classes(&labels);
        let n_features = features.first().map(|x| x.nrows()).unwrap_or(0);

        let pool: Vec<Sequence> = ids
            .into_iter()
            .zip(features)
            .zip(labels)
            .map(|((id, features), labels)| Sequence { id, features, labels })
            .collect();

        for seq in &pool {
            if seq.features.ncols() != seq.labels.len() {
                warn!(
                    "{}: {} labels for {} time steps",
                    seq.id,
                    seq.labels.len(),
                    seq.features.ncols()
                );
                report.length_mismatches.push(seq.id.clone());
            }
        }

        // Later duplicates win.
        let index: HashMap<&str, usize> = pool
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        let mut select = |wanted: &[String]| -> Vec<Sequence> {
            wanted
                .iter()
                .filter_map(|id| match index.get(id.as_str()) {
                    Some(&i) => Some(pool[i].clone()),
                    None => {
                        report.unmatched_ids.push(id.clone());
                        None
                    }
                })
                .collect()
        };
        let train = select(manifest.train.as_slice());
        let test = select(manifest.test.as_slice());

        if !report.unmatched_ids.is_empty() {
            debug!(
                "{} manifest entries without a sequence: {:?}",
                report.unmatched_ids.len(),
                report.unmatched_ids
            );
        }
        if train.is_empty() {
            warn!(
                "{} split {split}: no training sequences loaded from {}",
                self.name(),
                feature_dir.display()
            );
            report.empty_train = true;
        }

        info!(
            "{} split {split}: {} train / {} test sequences, {n_classes} classes, \
             {n_features} features",
            self.name(),
            train.len(),
            test.len()
        );

        Ok(LoadedSplit {
            train,
            test,
            n_classes,
            n_features,
            report,
        })
    }
}

/// Resolve and read the `Y` vector and `X` matrix stored under `file`.
fn load_pair(
    label_dir: &Path,
    feature_dir: &Path,
    file: &str,
) -> Result<(Array1<i64>, Array2<f64>)> {
    let label_path = closest_file(&label_dir.join(file))?;
    let feature_path = closest_file(&feature_dir.join(file))?;
    debug!("{file}: labels {} features {}", label_path.display(), feature_path.display());

    let y = MatContents::open(&label_path)?.flat("Y")?;
    if let Some(&value) = y.iter().find(|v| !v.is_finite() || v.fract() != 0.0) {
        return Err(DatasetError::BadLabel {
            path: label_path,
            value,
        });
    }
    let x = MatContents::open(&feature_path)?.matrix("X")?;
    Ok((y.mapv(|v| v as i64), x))
}
