//! Record model for one scraped project/publication page.

use serde::{Deserialize, Serialize};

/// Column order used by every tabular output.
pub const RECORD_FIELDS: [&str; 15] = [
    "url",
    "title",
    "publication_date",
    "published_by",
    "content_type",
    "journal_title",
    "doi",
    "website",
    "authors",
    "email",
    "language",
    "location",
    "download_link",
    "abstract",
    "keywords",
];

/// Separator used when keywords are flattened into a single cell
pub const KEYWORD_SEPARATOR: &str = "; ";

/// One detail page, flattened
///
/// Every field but `url` may be absent; an absent field is `None`, which is
/// distinct from an empty string scraped off the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Detail page URL this record was extracted from
    pub url: String,

    pub title: Option<String>,

    /// "Published online" date, as printed on the page
    pub publication_date: Option<String>,

    pub published_by: Option<String>,

    pub content_type: Option<String>,

    pub journal_title: Option<String>,

    /// DOI link target
    pub doi: Option<String>,

    /// Website link target
    pub website: Option<String>,

    /// Author link text
    pub authors: Option<String>,

    pub email: Option<String>,

    pub language: Option<String>,

    pub location: Option<String>,

    /// Attached document link target
    pub download_link: Option<String>,

    /// Abstract text
    pub r#abstract: Option<String>,

    /// Keywords in page order
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Record {
    /// Create a record with only the URL set
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            publication_date: None,
            published_by: None,
            content_type: None,
            journal_title: None,
            doi: None,
            website: None,
            authors: None,
            email: None,
            language: None,
            location: None,
            download_link: None,
            r#abstract: None,
            keywords: Vec::new(),
        }
    }

    /// Keywords joined into a single cell
    pub fn keyword_cell(&self) -> String {
        self.keywords.join(KEYWORD_SEPARATOR)
    }

    /// Values in [`RECORD_FIELDS`] order, absent fields as empty strings
    pub fn to_row(&self) -> Vec<String> {
        let cell = |value: &Option<String>| value.clone().unwrap_or_default();
        vec![
            self.url.clone(),
            cell(&self.title),
            cell(&self.publication_date),
            cell(&self.published_by),
            cell(&self.content_type),
            cell(&self.journal_title),
            cell(&self.doi),
            cell(&self.website),
            cell(&self.authors),
            cell(&self.email),
            cell(&self.language),
            cell(&self.location),
            cell(&self.download_link),
            cell(&self.r#abstract),
            self.keyword_cell(),
        ]
    }
}

/// Metadata-region fields, gathered before being folded into a [`Record`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub publication_date: Option<String>,
    pub published_by: Option<String>,
    pub content_type: Option<String>,
    pub journal_title: Option<String>,
    pub doi: Option<String>,
    pub website: Option<String>,
    pub authors: Option<String>,
    pub email: Option<String>,
    pub language: Option<String>,
    pub location: Option<String>,
}

/// Builder for constructing Record objects
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            record: Record::new(url),
        }
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.record.title = title;
        self
    }

    pub fn abstract_text(mut self, abstract_text: Option<String>) -> Self {
        self.record.r#abstract = abstract_text;
        self
    }

    /// Set all ten metadata-region fields at once
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        let record = &mut self.record;
        record.publication_date = metadata.publication_date;
        record.published_by = metadata.published_by;
        record.content_type = metadata.content_type;
        record.journal_title = metadata.journal_title;
        record.doi = metadata.doi;
        record.website = metadata.website;
        record.authors = metadata.authors;
        record.email = metadata.email;
        record.language = metadata.language;
        record.location = metadata.location;
        self
    }

    pub fn download_link(mut self, link: Option<String>) -> Self {
        self.record.download_link = link;
        self
    }

    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.record.keywords = keywords;
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}
