use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// Sequence – one recorded trial
// ---------------------------------------------------------------------------

/// One trial: a features x time matrix and one class per time step.
#[derive(Debug, Clone)]
pub struct Sequence {
    /// Canonical identifier, as used in split manifests.
    pub id: String,
    pub features: Array2<f64>,
    /// Dense zero-based class per time step; same length as `features.ncols()`.
    pub labels: Array1<usize>,
}

impl Sequence {
    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SplitManifest – train/test identifier lists
// ---------------------------------------------------------------------------

/// Identifiers of the sequences in each partition of one split, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitManifest {
    pub train: Vec<String>,
    pub test: Vec<String>,
}

impl SplitManifest {
    /// Read `splits/sequences/<split>/{train,test}.txt` under `base_dir`.
    pub fn read(base_dir: &Path, split: usize) -> Result<Self> {
        let dir = base_dir.join("splits").join("sequences").join(split.to_string());
        Ok(Self {
            train: read_manifest(&dir.join("train.txt"))?,
            test: read_manifest(&dir.join("test.txt"))?,
        })
    }
}

fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_manifest(&text))
}

/// One entry per line; everything from the first `.` on is dropped.
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('.').next().unwrap_or("").trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// LoadReport – soft failures
// ---------------------------------------------------------------------------

/// Problems the loader tolerated rather than aborting on.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Label or feature files that could not be resolved; their sequences were dropped.
    pub missing_files: Vec<PathBuf>,
    /// Manifest identifiers with no loaded sequence.
    pub unmatched_ids: Vec<String>,
    /// Sequences whose label count differs from their time-axis length.
    pub length_mismatches: Vec<String>,
    /// Set when no training sequence survived the join.
    pub empty_train: bool,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.missing_files.is_empty()
            && self.unmatched_ids.is_empty()
            && self.length_mismatches.is_empty()
            && !self.empty_train
    }
}

// ---------------------------------------------------------------------------
// LoadedSplit – result of one load
// ---------------------------------------------------------------------------

/// Train and test sequences of one split, normalized.
#[derive(Debug, Clone)]
pub struct LoadedSplit {
    pub train: Vec<Sequence>,
    pub test: Vec<Sequence>,
    /// Distinct classes over the whole loaded pool (train, test and unassigned).
    pub n_classes: usize,
    /// Feature dimensionality of the first loaded sequence.
    pub n_features: usize,
    pub report: LoadReport,
}

impl LoadedSplit {
    /// Split into `(X_train, y_train, X_test, y_test)`.
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (Vec<Array2<f64>>, Vec<Array1<usize>>, Vec<Array2<f64>>, Vec<Array1<usize>>) {
        let (x_train, y_train) = self.train.into_iter().map(|s| (s.features, s.labels)).unzip();
        let (x_test, y_test) = self.test.into_iter().map(|s| (s.features, s.labels)).unzip();
        (x_train, y_train, x_test, y_test)
    }

    pub fn summary(&self, dataset: &str, features: &str, split: usize) -> LoadSummary {
        LoadSummary {
            dataset: dataset.to_string(),
            features: features.to_string(),
            split,
            n_classes: self.n_classes,
            n_features: self.n_features,
            train: self.train.iter().map(|s| s.id.clone()).collect(),
            test: self.test.iter().map(|s| s.id.clone()).collect(),
            train_frames: self.train.iter().map(Sequence::len).sum(),
            test_frames: self.test.iter().map(Sequence::len).sum(),
            report: self.report.clone(),
        }
    }
}

/// Feature matrices of an auxiliary feature set, aligned with a split.
///
/// A sequence missing from the auxiliary set is absent here too, so match on
/// the ids rather than on position when combining with a [`LoadedSplit`].
#[derive(Debug, Clone, Default)]
pub struct AuxiliaryFeatures {
    pub train_ids: Vec<String>,
    pub train: Vec<Array2<f64>>,
    pub test_ids: Vec<String>,
    pub test: Vec<Array2<f64>>,
    pub report: LoadReport,
}

/// Printable overview of a [`LoadedSplit`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub dataset: String,
    pub features: String,
    pub split: usize,
    pub n_classes: usize,
    pub n_features: usize,
    pub train: Vec<String>,
    pub test: Vec<String>,
    pub train_frames: usize,
    pub test_frames: usize,
    pub report: LoadReport,
}
