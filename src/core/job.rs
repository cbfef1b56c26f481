//! Job identities and resolved job specifications

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::platform::Platform;

/// One scheduled build: a package for a platform
///
/// Key for all per-job state; created once during matrix expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JobIdentity {
    /// Target platform
    pub platform: Platform,
    /// Package import path
    pub package: String,
}

impl JobIdentity {
    /// Create a job identity
    pub fn new(platform: Platform, package: impl Into<String>) -> Self {
        Self {
            platform,
            package: package.into(),
        }
    }

    /// Last element of the package path, used as `{{.Dir}}` in output names
    pub fn package_dir(&self) -> &str {
        self.package
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.package)
    }
}

impl fmt::Display for JobIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.package, self.platform)
    }
}

/// A job identity plus everything needed to invoke the build for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedJobSpec {
    /// Which job this is
    pub id: JobIdentity,
    /// Absolute path of the binary to produce
    pub output: PathBuf,
    /// Linker flags (`-ldflags`)
    pub ldflags: Option<String>,
    /// Compiler flags (`-gcflags`)
    pub gcflags: Option<String>,
    /// Assembler flags (`-asmflags`)
    pub asmflags: Option<String>,
    /// Build tags
    pub tags: Vec<String>,
    /// Module download mode (`-mod`)
    pub mod_mode: Option<String>,
    /// Force rebuilding of packages (`-a`)
    pub rebuild: bool,
    /// Enable the race detector
    pub race: bool,
    /// Build with cgo enabled
    pub cgo: bool,
}
