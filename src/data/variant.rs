//! Per-dataset directory layout and filename conventions.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Window of the median filter applied to 50Salads ground truth.
pub const SALADS_SMOOTHING_WINDOW: usize = 300;

/// Layout rules that differ between the supported datasets.
///
/// `base_dir` is `<root>/<name>`.
pub trait DatasetVariant: fmt::Debug {
    /// Directory name under the data root.
    fn name(&self) -> &'static str;

    /// How many predefined splits ship with the dataset.
    fn n_splits(&self) -> usize;

    fn feature_path(&self, base_dir: &Path, features: &str) -> PathBuf;

    fn label_path(&self, base_dir: &Path, features: &str) -> PathBuf;

    /// Strip filename decoration down to the identifier used in manifests.
    fn identifier_of(&self, filename: &str) -> String;

    /// Median-filter window for noisy frame labels, if the dataset needs one.
    fn label_smoothing(&self) -> Option<usize> {
        None
    }
}

/// JHU-ISI Gesture and Skill Assessment Working Set, Suturing task.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jigsaws;

impl DatasetVariant for Jigsaws {
    fn name(&self) -> &'static str {
        "JIGSAWS"
    }

    fn n_splits(&self) -> usize {
        7
    }

    fn feature_path(&self, base_dir: &Path, features: &str) -> PathBuf {
        base_dir.join("features").join(features)
    }

    fn label_path(&self, base_dir: &Path, _features: &str) -> PathBuf {
        base_dir.join("labels").join("sequences").join("Suturing")
    }

    fn identifier_of(&self, filename: &str) -> String {
        filename.replace(".mat", "")
    }
}

/// 50 Salads. Labels ship inside the feature directory of each feature set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Salads;

impl DatasetVariant for Salads {
    fn name(&self) -> &'static str {
        "50Salads"
    }

    fn n_splits(&self) -> usize {
        5
    }

    fn feature_path(&self, base_dir: &Path, features: &str) -> PathBuf {
        base_dir.join("features").join(features).join("Split_1")
    }

    fn label_path(&self, base_dir: &Path, features: &str) -> PathBuf {
        base_dir.join("features").join(features).join("Split_1")
    }

    fn identifier_of(&self, filename: &str) -> String {
        filename
            .replace("rgb-", "")
            .replace(".mat", "")
            .replace(".avi", "")
    }

    fn label_smoothing(&self) -> Option<usize> {
        Some(SALADS_SMOOTHING_WINDOW)
    }
}

/// MICCAI EndoVis surgical workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndoVis;

impl DatasetVariant for EndoVis {
    fn name(&self) -> &'static str {
        "EndoVis"
    }

    fn n_splits(&self) -> usize {
        7
    }

    fn feature_path(&self, base_dir: &Path, features: &str) -> PathBuf {
        base_dir.join("features").join(features)
    }

    fn label_path(&self, base_dir: &Path, _features: &str) -> PathBuf {
        base_dir.join("labels").join("sequences")
    }

    fn identifier_of(&self, filename: &str) -> String {
        filename.replace(".mat", "")
    }
}

// ---------------------------------------------------------------------------
// DatasetKind – config-level selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetKind {
    #[serde(rename = "JIGSAWS")]
    Jigsaws,
    #[serde(rename = "50Salads")]
    Salads,
    #[serde(rename = "EndoVis")]
    EndoVis,
}

impl DatasetKind {
    pub fn variant(self) -> Box<dyn DatasetVariant> {
        match self {
            DatasetKind::Jigsaws => Box::new(Jigsaws),
            DatasetKind::Salads => Box::new(Salads),
            DatasetKind::EndoVis => Box::new(EndoVis),
        }
    }
}

impl FromStr for DatasetKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jigsaws" => Ok(DatasetKind::Jigsaws),
            "50salads" | "salads" => Ok(DatasetKind::Salads),
            "endovis" => Ok(DatasetKind::EndoVis),
            _ => Err(DatasetError::UnknownDataset(s.to_string())),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variant().name())
    }
}
