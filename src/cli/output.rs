//! Output configuration and error display
//!
//! Decides where progress goes and sets up logging. Logs always go to
//! stderr so they never interleave with the in-place progress on stdout.

use std::io::{self, Write};

use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

/// Output preferences from the global flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress progress and summary
    pub quiet: bool,
    /// Print a JSON report instead of human output
    pub json: bool,
    /// Verbosity count (-v, -vv)
    pub verbose: u8,
}

impl OutputConfig {
    /// Create output settings
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Log level directive for the verbosity
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Initialize the tracing subscriber; `RUST_LOG` takes precedence
    pub fn init_tracing(&self) {
        let filter = EnvFilter::builder()
            .with_default_directive(self.log_level().into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    /// Whether the human-readable progress display is shown
    pub fn shows_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Where progress and the summary are written
    pub fn progress_writer(&self) -> Box<dyn Write + Send> {
        if self.shows_progress() {
            Box::new(io::stdout())
        } else {
            Box::new(io::sink())
        }
    }
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR.red());
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(OutputConfig::new(false, false, 0).log_level(), tracing::Level::WARN);
        assert_eq!(OutputConfig::new(false, false, 1).log_level(), tracing::Level::INFO);
        assert_eq!(OutputConfig::new(false, false, 3).log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_progress_hidden_when_quiet_or_json() {
        assert!(OutputConfig::new(false, false, 0).shows_progress());
        assert!(!OutputConfig::new(true, false, 0).shows_progress());
        assert!(!OutputConfig::new(false, true, 0).shows_progress());
    }
}
