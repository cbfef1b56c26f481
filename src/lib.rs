//! gocross - Cross-compile Go packages across an OS/arch matrix
//!
//! Builds every package for every configured platform with bounded
//! parallelism, showing live in-place progress per job and summarizing
//! failures at the end.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Matrix expansion, scheduling, rendering, summary
//! - [`infra`] - Infrastructure layer (Go toolchain, artifacts, filesystem)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
