//! End-of-run failure summary
//!
//! Read once, after the status stream has been drained. Failures are listed
//! in the order their jobs first appeared on screen, not in completion or
//! alphabetical order.

use std::io::{self, Write};

use crossterm::style::Stylize;
use serde::Serialize;

use crate::config::defaults::PLATFORM_COLUMN_WIDTH;
use crate::core::job::JobIdentity;
use crate::core::progress::RenderState;
use crate::core::status::Phase;

/// A job that ended in error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobFailure {
    /// Failed job
    #[serde(flatten)]
    pub id: JobIdentity,
    /// Captured error text
    pub error: String,
}

/// Failed jobs ordered by screen line
pub fn failures(state: &RenderState) -> Vec<JobFailure> {
    state
        .jobs_in_order()
        .into_iter()
        .filter(|(_, job)| job.phase == Phase::Error)
        .map(|(id, job)| JobFailure {
            id: id.clone(),
            error: job.error.clone(),
        })
        .collect()
}

/// Print the failure report; prints nothing when there are no failures
pub fn write_summary<W: Write>(out: &mut W, failures: &[JobFailure]) -> io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    let noun = if failures.len() == 1 { "error" } else { "errors" };
    let heading = format!("{} {noun} occurred:", failures.len());
    write!(out, "\n{}\n\n", heading.bold())?;

    for failure in failures {
        write!(
            out,
            "--> {:>width$}: {}: {}\n\n",
            failure.id.platform.to_string(),
            failure.id.package,
            failure.error,
            width = PLATFORM_COLUMN_WIDTH
        )?;
    }
    out.flush()
}
