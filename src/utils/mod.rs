//! Utility modules supporting the scraper.
//!
//! - [`HttpClient`]: reqwest-backed page fetcher
//! - [`Document`], [`Element`], [`Query`]: the small set of tree queries the
//!   extraction rules are written against

mod html;
mod http;

pub use html::{Child, Document, Element, Query};
pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
