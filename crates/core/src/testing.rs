//! Deterministic in-memory store used by the pipeline tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::traits::ObjectStore;
use crate::types::{ListPage, ObjectEntry, StorageClass};

pub fn glacier(key: &str, size: i64) -> ObjectEntry {
    ObjectEntry::new(key, size, StorageClass::Glacier)
}

pub fn standard(key: &str, size: i64) -> ObjectEntry {
    ObjectEntry::new(key, size, StorageClass::Standard)
}

/// Serves fixed pages and per-key restore results
///
/// Page tokens are page indexes rendered as strings.
#[derive(Default)]
pub struct FakeStore {
    pages: Vec<Vec<ObjectEntry>>,
    fail_on_page: Option<usize>,
    restore_errors: HashMap<String, String>,
    page_delay: Option<Duration>,
    restore_delay: Option<Duration>,
    list_calls: AtomicUsize,
    restore_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeStore {
    pub fn new(pages: Vec<Vec<ObjectEntry>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn fail_on_page(mut self, index: usize) -> Self {
        self.fail_on_page = Some(index);
        self
    }

    pub fn restore_error(mut self, key: &str, message: &str) -> Self {
        self.restore_errors
            .insert(key.to_string(), message.to_string());
        self
    }

    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn restore_delay(mut self, delay: Duration) -> Self {
        self.restore_delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn restore_calls(&self) -> usize {
        self.restore_calls.load(Ordering::SeqCst)
    }

    /// Highest number of restore calls observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn list_page(&self, continuation_token: Option<String>) -> Result<ListPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let index: usize = continuation_token
            .map(|t| t.parse().unwrap_or(0))
            .unwrap_or(0);

        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_page == Some(index) {
            return Err(Error::Network(format!("page {index} unavailable")));
        }

        let entries = self.pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(ListPage {
            entries,
            next_token,
        })
    }

    async fn restore_object(&self, key: &str) -> Result<()> {
        self.restore_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.restore_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.restore_errors.get(key) {
            Some(message) => Err(Error::Network(message.clone())),
            None => Ok(()),
        }
    }
}
