//! Core data models for scraped records.

mod record;
mod section;

pub use record::{Metadata, Record, RecordBuilder, KEYWORD_SEPARATOR, RECORD_FIELDS};
pub use section::{Section, Timeframe};
