//! Bounded build scheduler
//!
//! Dispatches one worker task per job, never letting more than
//! `parallelism` jobs execute at once. Every status change is sent over a
//! channel to the single renderer; workers never touch the display.
//!
//! Ordering: a job's `start` event is sent before its worker is spawned, so
//! its terminal event can only follow it. Jobs on the skip list get their
//! `skipped` event up front without waiting for a permit. A failing job
//! never cancels the others and the scheduler always waits for every
//! worker it launched.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, Semaphore};

use crate::config::defaults::SKIP_LIST_REASON;
use crate::core::executor::{run_job, JobExecutor};
use crate::core::job::{JobIdentity, ResolvedJobSpec};
use crate::core::status::StatusEvent;

/// Capacity of the status channel between workers and the renderer
pub const STATUS_CHANNEL_CAPACITY: usize = 16;

/// Runs resolved jobs with bounded parallelism
pub struct Scheduler {
    executor: Arc<dyn JobExecutor>,
    parallelism: usize,
}

impl Scheduler {
    /// Create a scheduler admitting at most `parallelism` concurrent jobs
    pub fn new(executor: Arc<dyn JobExecutor>, parallelism: usize) -> Self {
        Self {
            executor,
            parallelism: parallelism.max(1),
        }
    }

    /// Run every job to completion, reporting progress on `events`
    ///
    /// Returns once all workers have finished. The channel closes when the
    /// last sender clone (this call's and the workers') is dropped.
    pub async fn run(
        &self,
        skipped: Vec<JobIdentity>,
        jobs: Vec<ResolvedJobSpec>,
        events: mpsc::Sender<StatusEvent>,
    ) {
        for id in skipped {
            tracing::debug!("Skipping {id}: {SKIP_LIST_REASON}");
            send(&events, StatusEvent::skipped(id, SKIP_LIST_REASON)).await;
        }

        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut workers = Vec::with_capacity(jobs.len());

        for spec in jobs {
            // Blocks dispatch while the pool is saturated.
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                tracing::error!("Build semaphore closed, {} not dispatched", spec.id);
                send(&events, StatusEvent::error(spec.id, "build was not dispatched")).await;
                continue;
            };

            send(&events, StatusEvent::start(spec.id.clone())).await;

            let id = spec.id.clone();
            let executor = Arc::clone(&self.executor);
            let tx = events.clone();
            let handle = tokio::spawn(async move {
                let event = run_job(executor.as_ref(), &spec).await;
                send(&tx, event).await;
                drop(permit);
            });
            workers.push((id, handle));
        }

        let (ids, handles): (Vec<_>, Vec<_>) = workers.into_iter().unzip();
        for (id, result) in ids.into_iter().zip(join_all(handles).await) {
            if let Err(e) = result {
                tracing::error!("Worker for {id} did not complete: {e}");
                send(&events, StatusEvent::error(id, format!("build worker failed: {e}"))).await;
            }
        }
    }
}

async fn send(events: &mpsc::Sender<StatusEvent>, event: StatusEvent) {
    if events.send(event).await.is_err() {
        tracing::warn!("Status receiver dropped, progress update lost");
    }
}
