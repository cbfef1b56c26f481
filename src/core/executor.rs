//! Job execution boundary
//!
//! The orchestrator does not know how to build anything. It calls a
//! [`JobExecutor`] once per job and turns the outcome into exactly one
//! terminal [`StatusEvent`]. Package selectors are likewise resolved through
//! a [`PackageResolver`]. The Go toolchain implementation of both lives in
//! [`crate::infra::go`].

use async_trait::async_trait;

use crate::config::defaults::UNSUPPORTED_PLATFORM_REASON;
use crate::core::job::{JobIdentity, ResolvedJobSpec};
use crate::core::status::StatusEvent;
use crate::error::{ConfigError, ExecError};

/// What the Go toolchain prints for an OS/arch pair it cannot target
pub const UNSUPPORTED_PLATFORM_SIGNATURE: &str = "cmd/go: unsupported GOOS/GOARCH pair";

/// Runs the build for a single job
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Build one job; the error carries captured standard error
    async fn execute(&self, spec: &ResolvedJobSpec) -> Result<(), ExecError>;
}

/// Turns package selectors into buildable package paths
#[async_trait]
pub trait PackageResolver: Send + Sync {
    /// Resolve selectors to the main packages they contain
    async fn resolve_packages(&self, selectors: &[String]) -> Result<Vec<String>, ConfigError>;
}

/// Whether captured stderr says the toolchain cannot target the platform
///
/// This matches on the toolchain's wording and breaks if that wording
/// changes; it is the only place that knows about it.
pub fn is_unsupported_platform(stderr: &str) -> bool {
    stderr.contains(UNSUPPORTED_PLATFORM_SIGNATURE)
}

/// Map an execution outcome to the job's terminal event
pub fn classify(id: JobIdentity, outcome: Result<(), ExecError>) -> StatusEvent {
    match outcome {
        Ok(()) => StatusEvent::success(id),
        Err(e) if is_unsupported_platform(e.stderr()) => {
            StatusEvent::skipped(id, UNSUPPORTED_PLATFORM_REASON)
        }
        Err(e) => StatusEvent::error(id, e.to_string()),
    }
}

/// Execute one job and classify the result
pub async fn run_job(executor: &dyn JobExecutor, spec: &ResolvedJobSpec) -> StatusEvent {
    tracing::debug!("Building {} -> {}", spec.id, spec.output.display());
    let outcome = executor.execute(spec).await;
    if let Err(ref e) = outcome {
        tracing::debug!("Build of {} failed: {e}", spec.id);
    }
    classify(spec.id.clone(), outcome)
}
