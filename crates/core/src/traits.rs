//! ObjectStore trait definition
//!
//! The pipeline only needs two remote operations: fetching one page of the
//! listing and requesting a restore for one key. Adapters such as the S3
//! client implement this trait; tests use in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ListPage;

/// Remote object storage as seen by the restore pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one listing page, starting after `continuation_token`
    async fn list_page(&self, continuation_token: Option<String>) -> Result<ListPage>;

    /// Request an archival-to-accessible transition for `key`
    async fn restore_object(&self, key: &str) -> Result<()>;
}

/// Paginator over [`ObjectStore::list_page`]
///
/// Mirrors the "has more pages / next page" contract of SDK paginators.
pub struct PageCursor {
    store: Arc<dyn ObjectStore>,
    next_token: Option<String>,
    first_page: bool,
}

impl PageCursor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            next_token: None,
            first_page: true,
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.first_page || self.next_token.is_some()
    }

    /// Fetch the next page and advance the cursor
    ///
    /// On error the cursor is left where it was.
    pub async fn next_page(&mut self) -> Result<ListPage> {
        let page = self.store.list_page(self.next_token.clone()).await?;
        self.first_page = false;
        self.next_token = page.next_token.clone();
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{ObjectEntry, StorageClass};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_cursor_follows_tokens() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .with(eq(None))
            .times(1)
            .returning(|_| {
                Ok(ListPage {
                    entries: vec![ObjectEntry::new("a", 1, StorageClass::Glacier)],
                    next_token: Some("t1".to_string()),
                })
            });
        store
            .expect_list_page()
            .with(eq(Some("t1".to_string())))
            .times(1)
            .returning(|_| Ok(ListPage::default()));

        let mut cursor = PageCursor::new(Arc::new(store));
        assert!(cursor.has_more_pages());
        let first = cursor.next_page().await.unwrap();
        assert_eq!(first.entries.len(), 1);
        assert!(cursor.has_more_pages());
        let second = cursor.next_page().await.unwrap();
        assert!(second.entries.is_empty());
        assert!(!cursor.has_more_pages());
    }

    #[tokio::test]
    async fn test_cursor_error_keeps_position() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_page()
            .returning(|_| Err(Error::Network("connection reset".to_string())));

        let mut cursor = PageCursor::new(Arc::new(store));
        assert!(cursor.next_page().await.is_err());
        assert!(cursor.has_more_pages());
    }
}
