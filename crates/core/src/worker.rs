//! Restore worker pool
//!
//! A fixed number of tasks drain the listing channel. Each task handles one
//! object at a time: it sends (or, in a dry run, skips) the restore request,
//! classifies the result and records it in the shared [`RunStats`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::error::{Error, Result};
use crate::summary::{RestoreOutcome, RunStats};
use crate::traits::ObjectStore;
use crate::types::ObjectDescriptor;

/// Error code the service reports when a restore is already running
pub const RESTORE_IN_PROGRESS_CODE: &str = "RestoreAlreadyInProgress";

/// Whether a restore error means the object is already being restored
///
/// The service has no typed error for this case, so this matches on the
/// error message. Adapters must keep the remote error code in the message.
pub fn is_restore_in_progress(error: &Error) -> bool {
    error.to_string().contains(RESTORE_IN_PROGRESS_CODE)
}

/// Map the result of a restore request to its accounting category
pub fn classify_restore_result(result: &Result<()>) -> RestoreOutcome {
    match result {
        Ok(()) => RestoreOutcome::Restored,
        Err(e) if is_restore_in_progress(e) => RestoreOutcome::InProgress,
        Err(_) => RestoreOutcome::Failed,
    }
}

type SharedReceiver = Arc<Mutex<mpsc::Receiver<ObjectDescriptor>>>;

/// Start `config.workers_count` workers on one receiver and one stats block
pub fn spawn_workers(
    config: &WorkerConfig,
    receiver: mpsc::Receiver<ObjectDescriptor>,
    store: Arc<dyn ObjectStore>,
    stats: Arc<RunStats>,
    cancel: CancellationToken,
) -> JoinSet<()> {
    let receiver = Arc::new(Mutex::new(receiver));
    let mut workers = JoinSet::new();

    for id in 0..config.workers_count {
        let worker = Worker {
            id,
            receiver: Arc::clone(&receiver),
            store: Arc::clone(&store),
            stats: Arc::clone(&stats),
            cancel: cancel.clone(),
            dry_run: config.dry_run,
            restore_timeout: config.restore_timeout,
        };
        workers.spawn(worker.run());
    }

    workers
}

struct Worker {
    id: usize,
    receiver: SharedReceiver,
    store: Arc<dyn ObjectStore>,
    stats: Arc<RunStats>,
    cancel: CancellationToken,
    dry_run: bool,
    restore_timeout: Duration,
}

impl Worker {
    async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                info!(worker = self.id, "Worker stopped due to cancellation");
                return;
            }

            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!(worker = self.id, "Worker stopped due to cancellation");
                    return;
                }
                next = self.recv() => next,
            };

            let Some(object) = next else {
                debug!(worker = self.id, "Worker finished, channel closed");
                return;
            };

            match self.process(&object).await {
                Some(outcome) => self.stats.record(object.size, outcome),
                None => {
                    info!(worker = self.id, object = %object.key, "Restore aborted by cancellation");
                    return;
                }
            }
        }
    }

    async fn recv(&self) -> Option<ObjectDescriptor> {
        self.receiver.lock().await.recv().await
    }

    /// Returns `None` when the run was cancelled mid-request
    async fn process(&self, object: &ObjectDescriptor) -> Option<RestoreOutcome> {
        if self.dry_run {
            debug!(object = %object.key, size = object.size, "DRY RUN: Would restore");
            return Some(RestoreOutcome::Simulated);
        }

        debug!(object = %object.key, size = object.size, "Restoring");
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            result = tokio::time::timeout(self.restore_timeout, self.store.restore_object(&object.key)) => {
                result.unwrap_or_else(|_| {
                    Err(Error::Timeout(format!(
                        "restore request not answered within {:?}",
                        self.restore_timeout
                    )))
                })
            }
        };

        let outcome = classify_restore_result(&result);
        match (&outcome, &result) {
            (RestoreOutcome::InProgress, _) => {
                debug!(object = %object.key, size = object.size, "Restore already in progress");
            }
            (RestoreOutcome::Failed, Err(e)) => {
                warn!(object = %object.key, size = object.size, error = %e, "Failed to restore");
            }
            _ => debug!(object = %object.key, size = object.size, "Restore requested"),
        }

        Some(outcome)
    }
}
