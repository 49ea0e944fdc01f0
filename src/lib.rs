//! # AER Scraper
//!
//! Extracts project and publication records from the British Ecological
//! Society's Applied Ecology Resources listing and writes them to TSV.
//!
//! ## Architecture
//!
//! - [`sources`]: the [`Fetch`](sources::Fetch) seam and the paginated listing traversal
//! - [`extract`]: per-page field extraction rules
//! - [`models`]: Record and Section data structures
//! - [`output`]: TSV and JSON Lines writers
//! - [`utils`]: HTTP client and HTML query helpers
//! - [`config`]: Configuration management

pub mod config;
pub mod extract;
pub mod models;
pub mod output;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::Record;
pub use sources::{AerSource, PageRange};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
