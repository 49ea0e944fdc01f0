//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::sources::{Fetch, SourceError};

/// A fetcher that serves predefined pages and remembers every URL asked for.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: Mutex<HashMap<String, String>>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create a new mock fetcher with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn set_page(&self, url: impl Into<String>, body: impl Into<String>) {
        let mut guard = self.pages.lock().unwrap();
        guard.insert(url.into(), body.into());
    }

    /// Builder-style variant of [`set_page`](Self::set_page).
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.set_page(url, body);
        self
    }

    /// Every URL fetched so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        self.requested.lock().unwrap().push(url.to_string());
        let guard = self.pages.lock().unwrap();
        guard.get(url).cloned().ok_or_else(|| SourceError::Http {
            url: url.to_string(),
            status: 404,
        })
    }
}
