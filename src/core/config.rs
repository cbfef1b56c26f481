//! Matrix configuration file loading
//!
//! The matrix is read from `gocross.toml`. An explicitly named file must
//! exist; the default file is optional and an empty configuration is used
//! when it is absent.

use std::path::Path;

use crate::config::defaults::CONFIG_FILE_NAME;
use crate::core::matrix::BuildMatrixConfig;
use crate::error::ConfigError;
use crate::infra::filesystem;

/// Load the matrix configuration
///
/// `explicit` is a path given on the command line; otherwise
/// `gocross.toml` in `dir` is used if present.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<BuildMatrixConfig, ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => {
            let default = dir.join(CONFIG_FILE_NAME);
            if !default.exists() {
                tracing::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                return Ok(BuildMatrixConfig::default());
            }
            default
        }
    };

    tracing::info!("Loading matrix config from {}", path.display());
    let content = filesystem::read_file(&path)?;
    parse_config(&content).map_err(|error| ConfigError::ParseFile { path, error })
}

/// Parse matrix configuration from TOML text
pub fn parse_config(content: &str) -> Result<BuildMatrixConfig, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}
