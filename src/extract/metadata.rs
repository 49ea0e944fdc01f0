//! Label/value pairs from the document details region.

use tracing::debug;

use super::clean;
use crate::models::Metadata;
use crate::sources::SourceError;
use crate::utils::{Document, Element, Query};

/// Container of the `dt`/`dd` metadata list
pub const DETAILS_REGION_CLASS: &str = "document-meta__details";

/// Where a label's value lives relative to its `dt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueAt {
    /// Text of the following `dd` sibling
    Description,
    /// `href` of the next link in document order
    LinkTarget,
    /// Text of the next link in document order
    LinkText,
}

impl ValueAt {
    fn missing(self) -> &'static str {
        match self {
            ValueAt::Description => "dd sibling",
            ValueAt::LinkTarget | ValueAt::LinkText => "following link",
        }
    }
}

/// Read all ten metadata fields.
///
/// A page without a details region yields all fields absent.
pub fn extract_metadata(url: &str, doc: &Document) -> Result<Metadata, SourceError> {
    let Some(region) = details_region(doc) else {
        debug!(url, "No metadata region");
        return Ok(Metadata::default());
    };

    let value = |label, field, at| labelled_value(url, &region, label, field, at);

    Ok(Metadata {
        publication_date: value("Published online", "publication_date", ValueAt::Description)?,
        published_by: value("Published by", "published_by", ValueAt::Description)?,
        content_type: value("Content type", "content_type", ValueAt::Description)?,
        journal_title: value("Journal title", "journal_title", ValueAt::Description)?,
        doi: value("DOI", "doi", ValueAt::LinkTarget)?,
        website: value("Website(s)", "website", ValueAt::LinkTarget)?,
        authors: value("Author(s)", "authors", ValueAt::LinkText)?,
        email: value("Contact email(s)", "email", ValueAt::Description)?,
        language: value("Publication language", "language", ValueAt::Description)?,
        location: value("Location", "location", ValueAt::Description)?,
    })
}

/// Location alone, without touching the other labels
pub fn extract_location(url: &str, doc: &Document) -> Result<Option<String>, SourceError> {
    match details_region(doc) {
        Some(region) => labelled_value(url, &region, "Location", "location", ValueAt::Description),
        None => Ok(None),
    }
}

fn details_region(doc: &Document) -> Option<Element<'_>> {
    doc.find(&Query::tag("div").class(DETAILS_REGION_CLASS))
}

fn labelled_value(
    url: &str,
    region: &Element<'_>,
    label: &str,
    field: &'static str,
    at: ValueAt,
) -> Result<Option<String>, SourceError> {
    let Some(term) = region.find(&Query::tag("dt").string(label)) else {
        return Ok(None);
    };

    let value = match at {
        ValueAt::Description => term
            .find_next_sibling(&Query::tag("dd"))
            .map(|dd| clean(dd.text())),
        ValueAt::LinkTarget => next_link(&term)
            .and_then(|a| a.attr("href"))
            .map(str::to_string),
        ValueAt::LinkText => next_link(&term).map(|a| clean(a.text())),
    };

    value.map(Some).ok_or_else(|| SourceError::Structure {
        url: url.to_string(),
        field,
        missing: at.missing(),
    })
}

fn next_link<'a>(term: &Element<'a>) -> Option<Element<'a>> {
    let link = Query::tag("a").with_attr("href");
    term.find_next(|e| link.matches(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/aer/project/7";

    fn metadata(html: &str) -> Result<Metadata, SourceError> {
        extract_metadata(URL, &Document::parse(html))
    }

    #[test]
    fn test_all_labels() {
        let meta = metadata(
            r#"<div class="document-meta__details"><dl>
                <dt>Published online</dt><dd>1 June 2020</dd>
                <dt>Published by</dt><dd>Wiley</dd>
                <dt>Content type</dt><dd>Journal article</dd>
                <dt>Journal title</dt><dd>Journal of Applied Ecology</dd>
                <dt>DOI</dt><dd><a href="https://doi.org/10.1/j">10.1/j</a></dd>
                <dt>Website(s)</dt><dd><a href="https://project.example.org">site</a></dd>
                <dt>Author(s)</dt><dd><a href="/authors/a">A. Smith, B. Jones</a></dd>
                <dt>Contact email(s)</dt><dd>a.smith@example.org</dd>
                <dt>Publication language</dt><dd>English</dd>
                <dt>Location</dt><dd>Scotland</dd>
            </dl></div>"#,
        )
        .unwrap();

        assert_eq!(
            meta,
            Metadata {
                publication_date: Some("1 June 2020".to_string()),
                published_by: Some("Wiley".to_string()),
                content_type: Some("Journal article".to_string()),
                journal_title: Some("Journal of Applied Ecology".to_string()),
                doi: Some("https://doi.org/10.1/j".to_string()),
                website: Some("https://project.example.org".to_string()),
                authors: Some("A. Smith, B. Jones".to_string()),
                email: Some("a.smith@example.org".to_string()),
                language: Some("English".to_string()),
                location: Some("Scotland".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_region_gives_all_absent() {
        let meta = metadata("<html><body><dl><dt>Location</dt><dd>Wales</dd></dl></body></html>")
            .unwrap();
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn test_subset_in_any_order() {
        let meta = metadata(
            r#"<div class="document-meta__details"><dl>
                <dt>Location</dt><dd>Peru</dd>
                <dt>Publication language</dt><dd>Spanish</dd>
                <dt>Published by</dt><dd>Lima Press</dd>
            </dl></div>"#,
        )
        .unwrap();

        assert_eq!(meta.location.as_deref(), Some("Peru"));
        assert_eq!(meta.language.as_deref(), Some("Spanish"));
        assert_eq!(meta.published_by.as_deref(), Some("Lima Press"));
        assert!(meta.publication_date.is_none());
        assert!(meta.content_type.is_none());
        assert!(meta.journal_title.is_none());
        assert!(meta.doi.is_none());
        assert!(meta.website.is_none());
        assert!(meta.authors.is_none());
        assert!(meta.email.is_none());
    }

    #[test]
    fn test_empty_value_is_not_absent() {
        let meta = metadata(
            r#"<div class="document-meta__details"><dl><dt>Location</dt><dd> </dd></dl></div>"#,
        )
        .unwrap();
        assert_eq!(meta.location.as_deref(), Some(""));
    }

    #[test]
    fn test_label_without_value_is_structural() {
        let err = metadata(
            r#"<div class="document-meta__details"><dl><dt>Content type</dt></dl></div>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SourceError::Structure {
                field: "content_type",
                missing: "dd sibling",
                ..
            }
        ));
    }

    #[test]
    fn test_doi_without_link_is_structural() {
        let err = metadata(
            r#"<div class="document-meta__details"><dl><dt>DOI</dt><dd>10.1/j</dd></dl></div>"#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::Structure { field: "doi", .. }));
    }

    #[test]
    fn test_link_lookup_is_not_limited_to_siblings() {
        let meta = metadata(
            r#"<div class="document-meta__details">
                <dl><dt>Website(s)</dt><dd><ul><li><a href="https://a.example">a</a></li></ul></dd></dl>
            </div>"#,
        )
        .unwrap();
        assert_eq!(meta.website.as_deref(), Some("https://a.example"));
    }

    #[test]
    fn test_location_only() {
        let doc = Document::parse(
            r#"<div class="document-meta__details"><dl><dt>Location</dt><dd>Chile</dd></dl></div>"#,
        );
        assert_eq!(extract_location(URL, &doc).unwrap().as_deref(), Some("Chile"));
        assert_eq!(extract_location(URL, &Document::parse("<p></p>")).unwrap(), None);
    }
}
