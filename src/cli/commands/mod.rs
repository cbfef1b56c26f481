//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod matrix;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::cli::output::OutputConfig;
use crate::core::config::load_config;
use crate::core::matrix::BuildMatrixConfig;
use crate::core::platform::Platform;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every package for every platform in the matrix
    Build(build::BuildArgs),

    /// List the jobs in the matrix without building
    Matrix(MatrixArgs),
}

impl Commands {
    /// Execute the command
    pub async fn run(self, output: &OutputConfig) -> Result<ExitCode> {
        let current_dir = std::env::current_dir()?;
        match self {
            Self::Build(args) => build::execute(&current_dir, &args, output).await,
            Self::Matrix(args) => matrix::execute(&current_dir, &args, output),
        }
    }
}

/// Options selecting the matrix, shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct MatrixArgs {
    /// Matrix config file (default: ./gocross.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Package selector (repeatable)
    #[arg(short, long = "package", value_name = "PKG")]
    pub packages: Vec<String>,

    /// Target OS (repeatable, or comma separated)
    #[arg(long, value_delimiter = ',')]
    pub os: Vec<String>,

    /// Target architecture (repeatable, or comma separated)
    #[arg(long, value_delimiter = ',')]
    pub arch: Vec<String>,

    /// Platform to skip, as os/arch (repeatable)
    #[arg(long = "skip", value_name = "OS/ARCH")]
    pub skip: Vec<Platform>,
}

impl MatrixArgs {
    /// Load the config file and apply command-line overrides
    pub fn load(&self, dir: &Path) -> Result<BuildMatrixConfig> {
        let mut config =
            load_config(self.config.as_deref(), dir).context("Failed to load matrix config")?;
        self.apply(&mut config);
        Ok(config)
    }

    /// Overwrite config fields given on the command line
    pub fn apply(&self, config: &mut BuildMatrixConfig) {
        if !self.packages.is_empty() {
            config.package.clone_from(&self.packages);
        }
        if !self.os.is_empty() {
            config.os.clone_from(&self.os);
        }
        if !self.arch.is_empty() {
            config.arch.clone_from(&self.arch);
        }
        if !self.skip.is_empty() {
            config.skip_platforms.clone_from(&self.skip);
        }
    }
}
