//! Error types for gocross
//!
//! Domain-specific error types using thiserror. Per-job build failures are
//! not errors at this level: they travel as status events and end up in the
//! run report.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors, fatal to the whole run
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Platform text is not `os/arch`
    #[error("Invalid platform '{value}': platform should be of the form \"<os>/<arch>\" (e.g. \"linux/amd64\")")]
    InvalidPlatform { value: String },

    /// Unknown checksum algorithm
    #[error("Invalid shasum algorithm '{value}' (expected sha1 or sha256)")]
    InvalidHashAlgorithm { value: String },

    /// Unknown archive format
    #[error("Invalid archive format '{value}' (expected zip or tar.gz)")]
    InvalidArchiveFormat { value: String },

    /// Output naming template could not be parsed
    #[error("Invalid output template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Config file could not be read
    #[error("Failed to read config file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Config file could not be parsed
    #[error("Failed to parse config file '{path}': {error}")]
    ParseFile { path: PathBuf, error: String },

    /// Explicit config file does not exist
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Go toolchain missing from PATH
    #[error("Go toolchain not found: {error}")]
    ToolchainNotFound { error: String },

    /// Output directory could not be prepared
    #[error("Failed to create output directory '{path}': {error}")]
    OutputDir { path: PathBuf, error: String },

    /// Package selectors could not be resolved
    #[error("Failed to locate packages: {error}")]
    PackageResolution { error: String },
}

/// External process errors
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// The process could not be started
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },

    /// The process exited unsuccessfully
    #[error("{status}\n{stderr}")]
    Failed { status: String, stderr: String },
}

impl ExecError {
    /// Captured standard error, if the process got far enough to produce any
    pub fn stderr(&self) -> &str {
        match self {
            Self::Spawn { .. } => "",
            Self::Failed { stderr, .. } => stderr,
        }
    }
}

/// Post-build artifact errors (checksums, archives)
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// IO error on an artifact
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Archive could not be written
    #[error("Failed to archive '{path}': {error}")]
    Archive { path: PathBuf, error: String },
}

/// Top-level gocross error type
#[derive(Error, Debug)]
pub enum GocrossError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Progress display task failed
    #[error("Progress display failed: {0}")]
    Render(String),

    /// Checksum/archive task failed
    #[error("Post-build processing failed: {0}")]
    PostProcess(String),

    /// IO error
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_error_failed_includes_stderr() {
        let err = ExecError::Failed {
            status: "exit status: 2".to_string(),
            stderr: "main.go:3: undefined: foo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status: 2"));
        assert!(msg.contains("undefined: foo"));
        assert_eq!(err.stderr(), "main.go:3: undefined: foo");
    }

    #[test]
    fn test_exec_error_spawn_has_no_stderr() {
        let err = ExecError::Spawn {
            program: "go".to_string(),
            error: "not found".to_string(),
        };
        assert_eq!(err.stderr(), "");
    }

    #[test]
    fn test_config_error_converts_to_top_level() {
        let err: GocrossError = ConfigError::InvalidPlatform {
            value: "linux".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
