//! Run coordinator
//!
//! Wires the listing stream to the worker pool, waits for every task to
//! stop and finalizes the summary. A run is single-shot.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::WorkerConfig;
use crate::error::{Error, Result};
use crate::stream::{ListingOutcome, ListingStream, stream_objects};
use crate::summary::{RunStats, RunSummary};
use crate::traits::ObjectStore;
use crate::worker::spawn_workers;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunDisposition {
    /// Listing exhausted and every queued object processed
    Completed,
    /// Cancelled before the listing or the queue was drained
    Cancelled,
    /// A listing page could not be fetched; objects queued before the
    /// failure were still processed
    ListingFailed(String),
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub disposition: RunDisposition,
    pub dry_run: bool,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

impl RunReport {
    pub fn elapsed(&self) -> SignedDuration {
        self.finished_at.duration_since(self.started_at)
    }

    pub fn is_cancelled(&self) -> bool {
        self.disposition == RunDisposition::Cancelled
    }
}

/// Restore every archival object listed by `store`
///
/// Only an invalid configuration is returned as an error. Listing failures
/// and cancellation are reported through [`RunReport::disposition`], always
/// alongside the counts gathered so far.
pub async fn start(
    cancel: CancellationToken,
    config: &WorkerConfig,
    store: Arc<dyn ObjectStore>,
) -> Result<RunReport> {
    config.validate()?;

    let started_at = Timestamp::now();
    if config.dry_run {
        info!("DRY RUN MODE: No objects will actually be restored");
    }

    let stats = Arc::new(RunStats::new());
    let ListingStream { receiver, producer } =
        stream_objects(Arc::clone(&store), cancel.clone(), config.page_timeout);
    let mut workers = spawn_workers(config, receiver, store, Arc::clone(&stats), cancel.clone());
    debug!(workers = config.workers_count, "Listing and restoring");

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Worker task ended abnormally");
        }
    }
    debug!("All workers stopped");

    let listing = producer.await.unwrap_or_else(|e| {
        ListingOutcome::Failed(Error::General(format!("listing task ended abnormally: {e}")))
    });

    let disposition = match listing {
        ListingOutcome::Failed(e) => RunDisposition::ListingFailed(e.to_string()),
        _ if cancel.is_cancelled() => RunDisposition::Cancelled,
        // Nobody cancelled, so every worker died and dropped the receiver
        ListingOutcome::Cancelled => {
            error!("All workers stopped before the listing was drained");
            RunDisposition::ListingFailed(
                "all workers stopped before the listing was drained".to_string(),
            )
        }
        ListingOutcome::Exhausted => RunDisposition::Completed,
    };

    let summary = stats.summarize();
    info!(
        total_objects = summary.total_objects,
        failed_restore = summary.failed_restore,
        in_progress_restore = summary.in_progress_restore,
        disposition = ?disposition,
        "Run finished"
    );

    Ok(RunReport {
        summary,
        disposition,
        dry_run: config.dry_run,
        started_at,
        finished_at: Timestamp::now(),
    })
}
