//! Build orchestration logic
//!
//! Coordinates a whole matrix run: validates the configuration, resolves
//! packages, expands and resolves jobs, runs them through the
//! [`Scheduler`] while a single renderer task owns the terminal, then
//! summarizes failures and post-processes successful artifacts.
//!
//! Only configuration problems are returned as errors. Per-job failures are
//! part of the [`BuildReport`]; the caller decides what they mean for its
//! exit status.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::core::artifact::{ArchiveFormat, HashAlgorithm};
use crate::core::executor::{JobExecutor, PackageResolver};
use crate::core::job::ResolvedJobSpec;
use crate::core::matrix::BuildMatrixConfig;
use crate::core::progress::{ProgressRenderer, RenderState};
use crate::core::scheduler::{Scheduler, STATUS_CHANNEL_CAPACITY};
use crate::core::status::{Phase, StatusEvent};
use crate::core::summary::{self, JobFailure};
use crate::core::template::OutputTemplate;
use crate::error::{ArtifactError, GocrossError};
use crate::infra::{artifacts, filesystem};

/// Outcome of a matrix run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Absolute directory artifacts were written to
    pub output_dir: PathBuf,
    /// Matrix size, including skipped jobs
    pub total: usize,
    /// Jobs that built successfully
    pub succeeded: usize,
    /// Jobs that failed
    pub failed: usize,
    /// Jobs skipped by the skip list or as unsupported
    pub skipped: usize,
    /// Successfully built binaries
    pub artifacts: Vec<PathBuf>,
    /// Checksum and archive files written for the artifacts
    pub extra_files: Vec<PathBuf>,
    /// Failed jobs in scheduling order
    pub failures: Vec<JobFailure>,
    /// Post-build problems (checksums, archives)
    pub warnings: Vec<String>,
}

impl BuildReport {
    /// Whether every dispatched job succeeded or was skipped
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Build orchestrator state
pub struct BuildOrchestrator {
    /// The matrix to build
    config: BuildMatrixConfig,
    /// Resolves package selectors
    resolver: Arc<dyn PackageResolver>,
    /// Builds single jobs
    executor: Arc<dyn JobExecutor>,
}

impl BuildOrchestrator {
    /// Create a new build orchestrator
    pub fn new(
        config: BuildMatrixConfig,
        resolver: Arc<dyn PackageResolver>,
        executor: Arc<dyn JobExecutor>,
    ) -> Self {
        Self {
            config,
            resolver,
            executor,
        }
    }

    /// Run the full matrix, rendering progress and the summary to `out`
    pub async fn run<W>(&self, mut out: W) -> Result<BuildReport, GocrossError>
    where
        W: Write + Send + 'static,
    {
        let template = OutputTemplate::parse(self.config.output_template())?;
        let output_dir = filesystem::prepare_output_dir(&self.config.output_dir())?;

        let packages = self
            .resolver
            .resolve_packages(&self.config.packages())
            .await?;
        let matrix = self.config.expand(&packages);
        let specs: Vec<ResolvedJobSpec> = matrix
            .scheduled
            .iter()
            .map(|id| self.config.resolve(id, &template, &output_dir))
            .collect();

        let parallelism = self.config.parallelism(specs.len());
        tracing::info!(
            "Building {} job(s), {} skipped, into {}",
            specs.len(),
            matrix.skipped.len(),
            output_dir.display()
        );
        write!(out, "running {parallelism} build(s) in parallel...\n\n")?;
        out.flush()?;

        let (tx, rx) = mpsc::channel(STATUS_CHANNEL_CAPACITY);
        let renderer = spawn_renderer(out, rx);

        Scheduler::new(Arc::clone(&self.executor), parallelism)
            .run(matrix.skipped.clone(), specs.clone(), tx)
            .await;

        let (state, mut out) = renderer
            .await
            .map_err(|e| GocrossError::Render(e.to_string()))?;

        let failures = summary::failures(&state);
        summary::write_summary(&mut out, &failures)?;

        let mut report = BuildReport {
            output_dir,
            total: matrix.total(),
            succeeded: state.count(Phase::Success),
            failed: failures.len(),
            skipped: state.count(Phase::Skipped),
            artifacts: built_artifacts(&state, &specs),
            failures,
            ..BuildReport::default()
        };

        if self.config.shasum.is_some() || self.config.archive.is_some() {
            let artifacts = report.artifacts.clone();
            let (shasum, archive) = (self.config.shasum, self.config.archive);
            let (extra_files, warnings) = tokio::task::spawn_blocking(move || {
                post_process(&artifacts, shasum, archive)
            })
            .await
            .map_err(|e| GocrossError::PostProcess(e.to_string()))?;
            report.extra_files = extra_files;
            report.warnings = warnings;
        }

        Ok(report)
    }
}

/// Write checksums and archives for built artifacts
///
/// Failures are returned as warnings; they never fail the run.
fn post_process(
    built: &[PathBuf],
    shasum: Option<HashAlgorithm>,
    archive: Option<ArchiveFormat>,
) -> (Vec<PathBuf>, Vec<String>) {
    let mut extra_files = Vec::new();
    let mut warnings = Vec::new();
    let mut record = |result: Result<PathBuf, ArtifactError>| match result {
        Ok(path) => extra_files.push(path),
        Err(e) => {
            tracing::warn!("{e}");
            warnings.push(e.to_string());
        }
    };

    for artifact in built {
        if let Some(algorithm) = shasum {
            record(artifacts::write_checksum(artifact, algorithm));
        }
        if let Some(format) = archive {
            record(artifacts::write_archive(artifact, format));
        }
    }
    (extra_files, warnings)
}

/// Start the single consumer that owns `out` until the event stream closes
fn spawn_renderer<W>(
    out: W,
    mut rx: mpsc::Receiver<StatusEvent>,
) -> tokio::task::JoinHandle<(RenderState, W)>
where
    W: Write + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut renderer = ProgressRenderer::new(out);
        while let Some(event) = rx.blocking_recv() {
            if let Err(e) = renderer.update(&event) {
                tracing::warn!("Failed to draw status for {}: {e}", event.id);
            }
        }
        renderer.into_parts()
    })
}

fn built_artifacts(state: &RenderState, specs: &[ResolvedJobSpec]) -> Vec<PathBuf> {
    specs
        .iter()
        .filter(|spec| state.get(&spec.id).is_some_and(|s| s.phase == Phase::Success))
        .map(|spec| spec.output.clone())
        .collect()
}
