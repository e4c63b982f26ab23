use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};

/// Find the file on disk that best matches `candidate`.
///
/// Exact names win. Otherwise the base name is cut at its first `.` and the
/// first directory entry (in sorted order) containing that stem is returned,
/// which absorbs extension drift such as `X.mp4.mat` vs `X.mat`.
///
/// The stem match is a plain substring test, so `seq1` also matches
/// `seq10.mat` when no exact file exists. Callers get whichever sorts first.
pub fn closest_file(candidate: &Path) -> Result<PathBuf> {
    let not_found = || DatasetError::FileNotFound {
        candidate: candidate.to_path_buf(),
    };

    let basename = candidate
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(not_found)?;
    let dir = candidate
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut entries: Vec<String> = match std::fs::read_dir(dir) {
        Ok(rd) => rd
            .flatten()
            .filter_map(|e| e.file_name().into_string().ok())
            .collect(),
        Err(_) => return Err(not_found()),
    };

    if entries.iter().any(|e| e == basename) {
        return Ok(candidate.to_path_buf());
    }

    entries.sort();
    let stem = basename.split('.').next().unwrap_or(basename);
    entries
        .into_iter()
        .find(|e| e.contains(stem))
        .map(|e| dir.join(e))
        .ok_or_else(not_found)
}
