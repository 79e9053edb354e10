//! Run statistics
//!
//! Workers update [`RunStats`] concurrently through atomic increments; the
//! coordinator turns it into an immutable [`RunSummary`] once every worker
//! has returned.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use serde::Serialize;

/// Classification of one processed object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Restore request accepted by the remote service
    Restored,
    /// A restore for this object was already running remotely
    InProgress,
    /// Restore request rejected or timed out
    Failed,
    /// Dry run, no request was sent
    Simulated,
}

/// Shared counters for one run
///
/// Increments are commutative, so `Relaxed` ordering is enough: the final
/// values are read only after every worker task has been joined.
#[derive(Debug, Default)]
pub struct RunStats {
    total_objects: AtomicU64,
    total_objects_size: AtomicI64,
    in_progress_restore: AtomicU64,
    total_in_progress_size: AtomicI64,
    failed_restore: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed object with its classification
    pub fn record(&self, size: i64, outcome: RestoreOutcome) {
        match outcome {
            RestoreOutcome::InProgress => {
                self.in_progress_restore.fetch_add(1, Ordering::Relaxed);
                self.total_in_progress_size
                    .fetch_add(size, Ordering::Relaxed);
            }
            RestoreOutcome::Failed => {
                self.failed_restore.fetch_add(1, Ordering::Relaxed);
            }
            RestoreOutcome::Restored | RestoreOutcome::Simulated => {}
        }

        self.total_objects.fetch_add(1, Ordering::Relaxed);
        self.total_objects_size.fetch_add(size, Ordering::Relaxed);
    }

    pub fn total_objects(&self) -> u64 {
        self.total_objects.load(Ordering::Relaxed)
    }

    /// Snapshot the counters and derive the average object size
    pub fn summarize(&self) -> RunSummary {
        let total_objects = self.total_objects.load(Ordering::Relaxed);
        let total_objects_size = self.total_objects_size.load(Ordering::Relaxed);

        RunSummary {
            total_objects,
            total_objects_size,
            in_progress_restore: self.in_progress_restore.load(Ordering::Relaxed),
            total_in_progress_size: self.total_in_progress_size.load(Ordering::Relaxed),
            failed_restore: self.failed_restore.load(Ordering::Relaxed),
            avg_object_size: average(total_objects_size, total_objects),
        }
    }
}

fn average(total_size: i64, count: u64) -> i64 {
    if count == 0 {
        return 0;
    }
    total_size / count as i64
}

/// Final aggregate of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_objects: u64,
    pub total_objects_size: i64,
    pub in_progress_restore: u64,
    pub total_in_progress_size: i64,
    pub failed_restore: u64,
    pub avg_object_size: i64,
}

impl RunSummary {
    /// Objects whose restore request was accepted
    ///
    /// Only meaningful for runs that actually sent requests; in a dry run
    /// every seen object lands here.
    pub fn restored(&self) -> u64 {
        self.total_objects
            .saturating_sub(self.in_progress_restore)
            .saturating_sub(self.failed_restore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_summary_has_zero_average() {
        let summary = RunStats::new().summarize();
        assert_eq!(summary.total_objects, 0);
        assert_eq!(summary.avg_object_size, 0);
    }

    #[test]
    fn test_record_outcomes() {
        let stats = RunStats::new();
        stats.record(10, RestoreOutcome::Restored);
        stats.record(20, RestoreOutcome::InProgress);
        stats.record(30, RestoreOutcome::Failed);

        let summary = stats.summarize();
        assert_eq!(summary.total_objects, 3);
        assert_eq!(summary.total_objects_size, 60);
        assert_eq!(summary.in_progress_restore, 1);
        assert_eq!(summary.total_in_progress_size, 20);
        assert_eq!(summary.failed_restore, 1);
        assert_eq!(summary.avg_object_size, 20);
        assert_eq!(summary.restored(), 1);
    }

    #[test]
    fn test_average_truncates() {
        let stats = RunStats::new();
        stats.record(1, RestoreOutcome::Simulated);
        stats.record(2, RestoreOutcome::Simulated);
        assert_eq!(stats.summarize().avg_object_size, 1);
    }

    #[test]
    fn test_concurrent_records() {
        let stats = Arc::new(RunStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        stats.record(3, RestoreOutcome::Failed);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let summary = stats.summarize();
        assert_eq!(summary.total_objects, 8000);
        assert_eq!(summary.total_objects_size, 24000);
        assert_eq!(summary.failed_restore, 8000);
        assert_eq!(summary.restored(), 0);
    }
}
