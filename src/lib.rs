//! Loader for pre-extracted action-segmentation features and frame labels.
//!
//! Supports the JIGSAWS, 50Salads and EndoVis on-disk layouts:
//!
//! ```no_run
//! use std::path::Path;
//! use action_seg_datasets::{Dataset, DatasetKind};
//!
//! let dataset = Dataset::new(DatasetKind::Jigsaws, Path::new("/data"), "SpatialCNN");
//! let split = dataset.load_split(1, 1)?;
//! println!("{} classes, {} features", split.n_classes, split.n_features);
//! # Ok::<(), action_seg_datasets::DatasetError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;

pub use config::DatasetConfig;
pub use data::loader::Dataset;
pub use data::model::{
    AuxiliaryFeatures, LoadReport, LoadSummary, LoadedSplit, Sequence, SplitManifest,
};
pub use data::variant::{DatasetKind, DatasetVariant, EndoVis, Jigsaws, Salads};
pub use error::{DatasetError, Result};
