//! Matrix command implementation
//!
//! Implements `gocross matrix`: prints the jobs a build would run, without
//! resolving packages through the toolchain.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::commands::MatrixArgs;
use crate::cli::output::OutputConfig;
use crate::config::defaults::PLATFORM_COLUMN_WIDTH;
use crate::core::job::JobIdentity;

#[derive(Debug, Serialize)]
struct MatrixEntry<'a> {
    #[serde(flatten)]
    id: &'a JobIdentity,
    skipped: bool,
}

/// Execute the matrix command
pub fn execute(project_dir: &Path, args: &MatrixArgs, output: &OutputConfig) -> Result<ExitCode> {
    let config = args.load(project_dir)?;
    let matrix = config.expand(&config.packages());

    let entries: Vec<MatrixEntry<'_>> = matrix
        .jobs
        .iter()
        .map(|id| MatrixEntry {
            id,
            skipped: config.is_skipped(&id.platform),
        })
        .collect();

    if output.json {
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize matrix")?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Number of parallel builds: {}", config.parallelism(matrix.scheduled.len()));
    println!("{} job(s), {} skipped\n", matrix.total(), matrix.skipped.len());
    for entry in &entries {
        let mark = if entry.skipped { " (skipped)" } else { "" };
        println!(
            "--> {:>width$}: {}{mark}",
            entry.id.platform.to_string(),
            entry.id.package,
            width = PLATFORM_COLUMN_WIDTH
        );
    }
    Ok(ExitCode::SUCCESS)
}
