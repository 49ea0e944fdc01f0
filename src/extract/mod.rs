//! Field extraction from Applied Ecology Resources pages.
//!
//! Every rule is independent: find a region, find a labelled anchor inside
//! it, read a neighbouring value. A missing region or anchor leaves the field
//! `None`. An anchor that is present but lacks the element it should lead to
//! is reported as [`SourceError::Structure`] and aborts the whole record.

mod metadata;
mod sections;

pub use metadata::{extract_location, extract_metadata};
pub use sections::{extract_sections, extract_timeframe, split_sections, IGNORED_SECTIONS};

use tracing::trace;

use crate::models::{Record, RecordBuilder};
use crate::sources::SourceError;
use crate::utils::{Document, Element, Query};

/// Container of the page title
pub const TITLE_REGION_CLASS: &str = "bleed-area";
/// Container of the abstract
pub const CONTENT_BLOCK_CLASS: &str = "content-block";
/// Container of the attached-document link
pub const DOWNLOAD_REGION_CLASS: &str = "document-meta__download";
/// Marker class of the keyword list
pub const KEYWORDS_CLASS: &str = "key-words";
/// Marker class of one result on a listing page
pub const ITEM_CONTAINER_CLASS: &str = "faux-block-container";

/// Build the record for one detail page
pub fn extract_record(url: &str, doc: &Document) -> Result<Record, SourceError> {
    let record = RecordBuilder::new(url)
        .title(extract_title(url, doc)?)
        .abstract_text(extract_abstract(doc))
        .metadata(extract_metadata(url, doc)?)
        .download_link(extract_download_link(doc))
        .keywords(extract_keywords(doc))
        .build();

    trace!(url, ?record, "Extracted record");
    Ok(record)
}

/// Parse `html` and build its record
pub fn extract_from_html(url: &str, html: &str) -> Result<Record, SourceError> {
    extract_record(url, &Document::parse(html))
}

/// First `h1` in the title region
///
/// A title region without a heading is a structural error.
pub fn extract_title(url: &str, doc: &Document) -> Result<Option<String>, SourceError> {
    let Some(region) = doc.find(&Query::any_with_class(TITLE_REGION_CLASS)) else {
        return Ok(None);
    };

    region
        .find(&Query::tag("h1"))
        .map(|h1| Some(clean(h1.text())))
        .ok_or_else(|| SourceError::Structure {
            url: url.to_string(),
            field: "title",
            missing: "h1 heading",
        })
}

/// Paragraph directly after the "Abstract" heading of the content block
pub fn extract_abstract(doc: &Document) -> Option<String> {
    let region = doc.find(&Query::tag("div").class(CONTENT_BLOCK_CLASS))?;
    let heading = region.find(&Query::tag("h2").string("Abstract"))?;
    let paragraph = heading.next_element_sibling()?;

    (paragraph.name() == "p").then(|| clean(paragraph.text()))
}

/// First link target in the download region
pub fn extract_download_link(doc: &Document) -> Option<String> {
    doc.find(&Query::tag("div").class(DOWNLOAD_REGION_CLASS))?
        .find(&Query::tag("a").with_attr("href"))?
        .attr("href")
        .map(str::to_string)
}

/// Non-blank direct list items of the keyword list, in page order
pub fn extract_keywords(doc: &Document) -> Vec<String> {
    let Some(list) = doc.find(&Query::tag("ul").class(KEYWORDS_CLASS)) else {
        return Vec::new();
    };

    list.find_all(&Query::tag("li"), false)
        .iter()
        .filter_map(Element::string)
        .map(clean)
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// One entry per item container on a listing page, holding the container's
/// first link target if it has one
pub fn extract_item_links(doc: &Document) -> Vec<Option<String>> {
    doc.find_all(&Query::tag("div").class(ITEM_CONTAINER_CLASS))
        .iter()
        .map(|item| {
            item.find(&Query::tag("a").with_attr("href"))
                .and_then(|a| a.attr("href"))
                .map(str::to_string)
        })
        .collect()
}

pub(crate) fn clean(text: String) -> String {
    text.trim().to_string()
}
