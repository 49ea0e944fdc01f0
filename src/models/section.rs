//! Free-text sections and timeframe dates from a detail page.

use serde::{Deserialize, Serialize};

/// A named block of free text delimited by headings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub text: String,
}

impl Section {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Project start and end dates, as printed on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
