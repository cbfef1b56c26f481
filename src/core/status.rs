//! Status events flowing from the scheduler to the renderer

use std::fmt;

use serde::Serialize;

use crate::core::job::JobIdentity;

/// Lifecycle stage of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Dispatched to a worker
    Start,
    /// Build finished successfully
    Success,
    /// Build failed
    Error,
    /// Not built (skip list or unsupported by the toolchain)
    Skipped,
}

impl Phase {
    /// Whether no further events follow this phase
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Start)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// A status update for one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Job the update is for
    pub id: JobIdentity,
    /// New phase
    pub phase: Phase,
    /// Error message or skip reason
    pub detail: String,
}

impl StatusEvent {
    /// Job was handed to a worker
    pub fn start(id: JobIdentity) -> Self {
        Self {
            id,
            phase: Phase::Start,
            detail: String::new(),
        }
    }

    /// Job built successfully
    pub fn success(id: JobIdentity) -> Self {
        Self {
            id,
            phase: Phase::Success,
            detail: String::new(),
        }
    }

    /// Job failed with a message
    pub fn error(id: JobIdentity, detail: impl Into<String>) -> Self {
        Self {
            id,
            phase: Phase::Error,
            detail: detail.into(),
        }
    }

    /// Job was not built, with a reason
    pub fn skipped(id: JobIdentity, reason: impl Into<String>) -> Self {
        Self {
            id,
            phase: Phase::Skipped,
            detail: reason.into(),
        }
    }
}
