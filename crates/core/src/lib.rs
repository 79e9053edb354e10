//! cw-core: Core library for the cold2warm restore tool
//!
//! This crate provides the restore pipeline and everything it needs:
//! - Configuration management
//! - ObjectStore trait for the two remote operations the pipeline uses
//! - Archival object filter and streaming listing producer
//! - Bounded restore worker pool and run coordinator
//!
//! It is independent of any specific S3 SDK so the pipeline can be tested
//! against in-memory stores.

pub mod config;
pub mod error;
pub mod filter;
pub mod run;
pub mod stream;
pub mod summary;
pub mod traits;
pub mod types;
pub mod worker;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigManager, S3Config, WorkerConfig, normalize_endpoint};
pub use error::{Error, Result};
pub use run::{RunDisposition, RunReport, start};
pub use summary::{RestoreOutcome, RunStats, RunSummary};
pub use traits::{ObjectStore, PageCursor};
pub use types::{ARCHIVAL_STORAGE_CLASS, ListPage, ObjectDescriptor, ObjectEntry, StorageClass};
pub use worker::{RESTORE_IN_PROGRESS_CODE, classify_restore_result, is_restore_in_progress};
