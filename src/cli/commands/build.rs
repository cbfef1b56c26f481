//! Build command implementation
//!
//! Implements `gocross build`: runs the whole matrix through the Go
//! toolchain with live per-job progress.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use crossterm::style::Stylize;

use crate::cli::commands::MatrixArgs;
use crate::cli::output::{status, OutputConfig};
use crate::core::artifact::{ArchiveFormat, HashAlgorithm};
use crate::core::builder::{BuildOrchestrator, BuildReport};
use crate::core::matrix::BuildMatrixConfig;
use crate::infra::go::GoToolchain;

/// Build options
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub matrix: MatrixArgs,

    /// Output path template ({{.Dir}}, {{.OS}}, {{.Arch}})
    #[arg(long)]
    pub output_template: Option<String>,

    /// Directory to write artifacts to
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Linker flags passed to go build
    #[arg(long, allow_hyphen_values = true)]
    pub ldflags: Option<String>,

    /// Compiler flags passed to go build
    #[arg(long, allow_hyphen_values = true)]
    pub gcflags: Option<String>,

    /// Assembler flags passed to go build
    #[arg(long, allow_hyphen_values = true)]
    pub asmflags: Option<String>,

    /// Build tags (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Module download mode (readonly, vendor, mod)
    #[arg(long = "mod", value_name = "MODE")]
    pub mod_mode: Option<String>,

    /// Force rebuilding of packages that are already up to date
    #[arg(long)]
    pub rebuild: bool,

    /// Enable the race detector
    #[arg(long)]
    pub race: bool,

    /// Build with CGO_ENABLED=1
    #[arg(long)]
    pub cgo: bool,

    /// Number of builds to run at once
    #[arg(short = 'j', long)]
    pub parallelism: Option<usize>,

    /// Write a checksum file next to each artifact (sha1, sha256)
    #[arg(long, value_name = "ALGORITHM", num_args = 0..=1, default_missing_value = "sha1")]
    pub shasum: Option<HashAlgorithm>,

    /// Write an archive of each artifact (zip, tar.gz)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "zip")]
    pub archive: Option<ArchiveFormat>,

    /// Go module directory to build in
    #[arg(short = 'C', long, value_name = "DIR")]
    pub module: Option<PathBuf>,
}

impl BuildArgs {
    /// Load the config file and apply command-line overrides
    pub fn load(&self, dir: &Path) -> Result<BuildMatrixConfig> {
        let mut config = self.matrix.load(dir)?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut BuildMatrixConfig) {
        if self.output_template.is_some() {
            config.output_template.clone_from(&self.output_template);
        }
        if self.output_dir.is_some() {
            config.output_dir.clone_from(&self.output_dir);
        }
        if self.ldflags.is_some() {
            config.ldflags.clone_from(&self.ldflags);
        }
        if self.gcflags.is_some() {
            config.gcflags.clone_from(&self.gcflags);
        }
        if self.asmflags.is_some() {
            config.asmflags.clone_from(&self.asmflags);
        }
        if !self.tags.is_empty() {
            config.tags.clone_from(&self.tags);
        }
        if self.mod_mode.is_some() {
            config.mod_mode.clone_from(&self.mod_mode);
        }
        if self.parallelism.is_some() {
            config.parallelism = self.parallelism;
        }
        if self.shasum.is_some() {
            config.shasum = self.shasum;
        }
        if self.archive.is_some() {
            config.archive = self.archive;
        }
        config.rebuild |= self.rebuild;
        config.race |= self.race;
        config.cgo |= self.cgo;
    }
}

/// Execute the build command
pub async fn execute(project_dir: &Path, args: &BuildArgs, output: &OutputConfig) -> Result<ExitCode> {
    let (config, module_dir) = prepare(project_dir, args)?;

    let go = Arc::new(GoToolchain::detect(&module_dir).context("Cannot build without Go")?);
    let orchestrator = BuildOrchestrator::new(config, go.clone(), go);

    let report = orchestrator
        .run(output.progress_writer())
        .await
        .context("Build failed")?;

    print_report(&report, output)?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Merged config and the Go module directory
///
/// The config file is looked up in `project_dir`, not in the `-C` module
/// directory. A relative output directory is taken from `project_dir`.
fn prepare(project_dir: &Path, args: &BuildArgs) -> Result<(BuildMatrixConfig, PathBuf)> {
    let mut config = args.load(project_dir)?;
    if let Some(dir) = config.output_dir.as_mut() {
        if dir.is_relative() {
            *dir = project_dir.join(&*dir);
        }
    }
    let module_dir = match args.module {
        Some(ref dir) => project_dir.join(dir),
        None => project_dir.to_path_buf(),
    };
    Ok((config, module_dir))
}

fn print_report(report: &BuildReport, output: &OutputConfig) -> Result<()> {
    if output.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{json}");
        return Ok(());
    }

    for warning in &report.warnings {
        eprintln!("{} {warning}", status::WARNING.yellow());
    }
    if output.quiet || !report.is_success() {
        return Ok(());
    }

    println!(
        "\n{} Built {} artifact(s) into {} ({} skipped)",
        status::SUCCESS.green(),
        report.succeeded,
        report.output_dir.display(),
        report.skipped
    );
    Ok(())
}
