//! Filesystem operations

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Create the output directory and return its absolute path
pub fn prepare_output_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let to_error = |e: std::io::Error| ConfigError::OutputDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    };
    std::fs::create_dir_all(path).map_err(to_error)?;
    path.canonicalize().map_err(to_error)
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}
