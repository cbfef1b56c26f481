//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gocross::core::executor::{JobExecutor, PackageResolver};
use gocross::core::job::ResolvedJobSpec;
use gocross::error::{ConfigError, ExecError};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Run the gocross binary in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gocross"))
            .current_dir(self.path())
            .args(args)
            .output()
            .expect("Failed to execute gocross")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample matrix config for testing
pub const SAMPLE_CONFIG: &str = r#"
package = ["./cmd/a", "./cmd/b"]
os = ["linux", "windows"]
arch = "amd64"
skip_platforms = ["windows/amd64"]
parallelism = 2
"#;

/// Writer whose contents can be read after it has been moved into a run
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Resolver that returns selectors unchanged
pub struct StaticResolver;

#[async_trait]
impl PackageResolver for StaticResolver {
    async fn resolve_packages(&self, selectors: &[String]) -> Result<Vec<String>, ConfigError> {
        Ok(selectors.to_vec())
    }
}

/// Fake toolchain recording concurrency and call order
///
/// Writes the artifact file on success. Packages in `failing` exit with an
/// error; platforms whose OS is in `unsupported` report the toolchain's
/// unsupported-pair message.
#[derive(Default)]
pub struct FakeToolchain {
    pub delay: Duration,
    pub failing: HashSet<String>,
    pub unsupported: HashSet<String>,
    pub running: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
}

impl FakeToolchain {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobExecutor for FakeToolchain {
    async fn execute(&self, spec: &ResolvedJobSpec) -> Result<(), ExecError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(spec.id.to_string());

        tokio::time::sleep(self.delay).await;
        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.unsupported.contains(&spec.id.platform.os) {
            return Err(ExecError::Failed {
                status: "exit status: 2".into(),
                stderr: format!(
                    "cmd/go: unsupported GOOS/GOARCH pair {}\n",
                    spec.id.platform
                ),
            });
        }
        if self.failing.contains(&spec.id.package) {
            return Err(ExecError::Failed {
                status: "exit status: 1".into(),
                stderr: format!("{}: undefined: main\n", spec.id.package),
            });
        }
        let write = |spec: &ResolvedJobSpec| -> io::Result<()> {
            if let Some(parent) = spec.output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&spec.output, b"binary")
        };
        write(spec).map_err(|e| ExecError::Spawn {
            program: "fake".into(),
            error: e.to_string(),
        })
    }
}
