use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating and loading dataset files.
///
/// Only [`DatasetError::FileNotFound`] is recoverable: the loader drops the
/// affected sequence and records it in the load report. Everything else
/// aborts the load.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read split manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no file matching {} found", candidate.display())]
    FileNotFound { candidate: PathBuf },

    #[error("failed to parse .mat file {}: {message}", path.display())]
    MatFile { path: PathBuf, message: String },

    #[error("{} has no field '{field}'", path.display())]
    MissingField { path: PathBuf, field: String },

    #[error("{}: field '{field}' has unsupported shape {shape:?}", path.display())]
    BadShape {
        path: PathBuf,
        field: String,
        shape: Vec<usize>,
    },

    #[error("{}: label {value} is not a whole number", path.display())]
    BadLabel { path: PathBuf, value: f64 },

    #[error("unknown dataset '{0}' (expected JIGSAWS, 50Salads or EndoVis)")]
    UnknownDataset(String),
}

impl DatasetError {
    /// Whether the loader may drop the affected sequence and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DatasetError::FileNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
