//! Listing stream
//!
//! A single producer task walks the remote listing page by page and
//! publishes archival objects onto a bounded channel. The channel is closed
//! exactly once, when the producer returns and drops its sender.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::Error;
use crate::filter::is_archival;
use crate::traits::{ObjectStore, PageCursor};
use crate::types::ObjectDescriptor;

/// Buffer between the producer and the workers, independent of worker count
pub const CHANNEL_CAPACITY: usize = 32;

/// Why the producer stopped
#[derive(Debug)]
pub enum ListingOutcome {
    /// Every page was listed
    Exhausted,
    /// The run was cancelled, or every consumer went away
    Cancelled,
    /// A page fetch failed or timed out
    Failed(Error),
}

/// Receiving side of the listing plus the producer task
pub struct ListingStream {
    pub receiver: mpsc::Receiver<ObjectDescriptor>,
    pub producer: JoinHandle<ListingOutcome>,
}

/// Start listing `store` in the background
pub fn stream_objects(
    store: Arc<dyn ObjectStore>,
    cancel: CancellationToken,
    page_timeout: Duration,
) -> ListingStream {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let cursor = PageCursor::new(store);
    let producer = tokio::spawn(produce(cursor, sender, cancel, page_timeout));

    ListingStream { receiver, producer }
}

async fn produce(
    mut cursor: PageCursor,
    sender: mpsc::Sender<ObjectDescriptor>,
    cancel: CancellationToken,
    page_timeout: Duration,
) -> ListingOutcome {
    while cursor.has_more_pages() {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ListingOutcome::Cancelled,
            fetched = tokio::time::timeout(page_timeout, cursor.next_page()) => fetched,
        };

        let page = match fetched {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                error!(error = %e, "Failed to get next page");
                return ListingOutcome::Failed(e);
            }
            Err(_) => {
                let e = Error::Timeout(format!("listing page not received within {page_timeout:?}"));
                error!(error = %e, "Failed to get next page");
                return ListingOutcome::Failed(e);
            }
        };

        for entry in &page.entries {
            // Filtering a large page must not delay shutdown.
            if cancel.is_cancelled() {
                return ListingOutcome::Cancelled;
            }

            if !is_archival(entry) {
                continue;
            }

            let object = ObjectDescriptor::from(entry);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return ListingOutcome::Cancelled,
                sent = sender.send(object) => {
                    if sent.is_err() {
                        debug!("All workers stopped, ending listing");
                        return ListingOutcome::Cancelled;
                    }
                    debug!(object = %entry.key, size = entry.size.max(0), "Found");
                }
            }
        }
    }

    ListingOutcome::Exhausted
}
