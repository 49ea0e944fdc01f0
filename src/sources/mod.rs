//! Page sources and the traversal over the Applied Ecology Resources listing.
//!
//! This module defines the [`Fetch`] trait the traversal uses to obtain page
//! text. [`HttpClient`](crate::utils::HttpClient) implements it over HTTP;
//! [`MockFetcher`] serves canned pages for tests.
//!
//! [`AerSource`] walks listing pages and yields one [`Record`](crate::models::Record)
//! per detail page as an async stream:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use futures_util::{pin_mut, StreamExt};
//! use aer_scraper::sources::{AerSource, PageRange};
//! use aer_scraper::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let source = AerSource::new(Arc::new(client));
//! let records = source.traverse(PageRange::new(1, 2));
//! pin_mut!(records);
//! while let Some(record) = records.next().await {
//!     println!("{}", record?.url);
//! }
//! # Ok(())
//! # }
//! ```

mod aer;
pub mod mock;

pub use aer::{AerSource, PageRange, DEFAULT_BASE_URL};
pub use mock::MockFetcher;

use async_trait::async_trait;

/// Something that can turn a URL into document text.
#[async_trait]
pub trait Fetch: Send + Sync + std::fmt::Debug {
    /// Fetch the page at `url` and return its body as text
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// Errors that can occur while fetching or extracting pages
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    /// A URL could not be built or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// An anchor element was found but the element it should lead to was not
    #[error("Unexpected page structure at {url}: {field} has no {missing}")]
    Structure {
        url: String,
        field: &'static str,
        missing: &'static str,
    },
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SourceError::Http {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            },
            None => SourceError::Network(err.to_string()),
        }
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::InvalidUrl(err.to_string())
    }
}
