//! Core build logic
//!
//! Matrix expansion, scheduling, progress rendering and summarizing. No
//! toolchain invocation happens here; that goes through the traits in
//! [`executor`] and is implemented in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`platform`] - `(os, arch)` target identity
//! - [`job`] - Job identities and resolved job specifications
//! - [`template`] - Output naming template
//! - [`matrix`] - Matrix configuration and expansion
//! - [`config`] - Matrix configuration file loading
//! - [`status`] - Status events
//! - [`executor`] - Job execution boundary and outcome classification
//! - [`scheduler`] - Bounded parallel dispatch
//! - [`progress`] - Live in-place progress display
//! - [`summary`] - End-of-run failure summary
//! - [`artifact`] - Checksum and archive settings
//! - [`builder`] - Build orchestration

pub mod artifact;
pub mod builder;
pub mod config;
pub mod executor;
pub mod job;
pub mod matrix;
pub mod platform;
pub mod progress;
pub mod scheduler;
pub mod status;
pub mod summary;
pub mod template;
