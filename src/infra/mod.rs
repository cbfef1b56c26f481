//! Infrastructure layer
//!
//! Handles all I/O operations: the Go toolchain, artifact files and the
//! filesystem.

pub mod artifacts;
pub mod filesystem;
pub mod go;
