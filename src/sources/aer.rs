//! Applied Ecology Resources listing traversal.

use async_stream::try_stream;
use futures_util::stream::Stream;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::extract::{extract_from_html, extract_item_links};
use crate::models::Record;
use crate::sources::{Fetch, SourceError};
use crate::utils::Document;

/// Search listing of the British Ecological Society's Applied Ecology Resources
pub const DEFAULT_BASE_URL: &str =
    "https://www.britishecologicalsociety.org/applied-ecology-resources/search/";

/// Listing pages to visit, 1-based and inclusive
///
/// A negative `page_limit` means keep going until a page lists no items.
/// `start_page` is never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start_page: i64,
    pub page_limit: i64,
}

impl PageRange {
    /// Pages `start_page..=page_limit`; a `start_page` below 1 is raised to 1
    pub fn new(start_page: i64, page_limit: i64) -> Self {
        Self {
            start_page: start_page.max(1),
            page_limit,
        }
    }

    /// Every page from `start_page` until the listing runs dry
    pub fn unbounded(start_page: i64) -> Self {
        Self::new(start_page, -1)
    }

    pub fn is_unbounded(&self) -> bool {
        self.page_limit < 0
    }

    /// Whether `page` falls inside the range's upper bound
    pub fn allows(&self, page: i64) -> bool {
        self.is_unbounded() || page <= self.page_limit
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Walks listing pages and extracts every linked detail page
#[derive(Debug, Clone)]
pub struct AerSource {
    fetcher: Arc<dyn Fetch>,
    base_url: String,
}

impl AerSource {
    /// Create a source for the public listing
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    /// Create a source for a listing at another address
    pub fn with_base_url(fetcher: Arc<dyn Fetch>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of listing page `page`
    pub fn page_url(&self, page: i64) -> Result<Url, SourceError> {
        let base = self.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{}/page/{}", base, page))?)
    }

    /// Lazily yield one record per item across the pages in `range`.
    ///
    /// Pages are visited in order and items in page order. Nothing is fetched
    /// until the stream is polled, and dropping it stops the walk. The first
    /// error ends the stream.
    pub fn traverse(
        &self,
        range: PageRange,
    ) -> impl Stream<Item = Result<Record, SourceError>> + Send + '_ {
        try_stream! {
            let mut page = range.start_page;

            while range.allows(page) {
                let page_url = self.page_url(page)?;
                let listing = self.fetcher.fetch(page_url.as_str()).await?;
                let items = item_links(&listing);

                if items.is_empty() {
                    info!(page, "No projects found");
                    break;
                }

                let total = items.len();
                info!(page, total, "Extracting docs from page #{}", page);

                for (index, item) in items.into_iter().enumerate() {
                    let Some(href) = item else {
                        warn!(page, index, "Item has no link, skipping");
                        continue;
                    };

                    let url = resolve_link(&page_url, &href)?;
                    let body = self.fetcher.fetch(&url).await?;
                    let record = extract_from_html(&url, &body)?;
                    debug!(url = %record.url, "Extracted {} of {}", index + 1, total);
                    yield record;
                }

                page += 1;
            }
        }
    }
}

/// Raw item links on a listing page, one per item container
fn item_links(listing: &str) -> Vec<Option<String>> {
    let doc = Document::parse(listing);
    extract_item_links(&doc)
}

/// Absolute detail URL for an item link found on `page_url`
fn resolve_link(page_url: &Url, href: &str) -> Result<String, SourceError> {
    Ok(page_url.join(href)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockFetcher;
    use futures_util::{pin_mut, StreamExt, TryStreamExt};

    const BASE: &str = "https://aer.example.org/search/";

    fn listing(links: &[&str]) -> String {
        let items: String = links
            .iter()
            .map(|href| {
                format!(
                    r#"<div class="faux-block-container"><a href="{}">item</a></div>"#,
                    href
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", items)
    }

    fn detail(title: &str) -> String {
        format!(
            r#"<html><body><div class="bleed-area"><h1>{}</h1></div></body></html>"#,
            title
        )
    }

    fn source(fetcher: &Arc<MockFetcher>) -> AerSource {
        AerSource::with_base_url(fetcher.clone(), BASE)
    }

    #[test]
    fn test_page_range() {
        assert!(PageRange::unbounded(3).allows(1_000));
        assert!(PageRange::new(1, 2).allows(2));
        assert!(!PageRange::new(1, 2).allows(3));
        assert_eq!(PageRange::default(), PageRange::new(1, 1));
    }

    #[test]
    fn test_page_url() {
        let fetcher = Arc::new(MockFetcher::new());
        let source = source(&fetcher);
        assert_eq!(
            source.page_url(4).unwrap().as_str(),
            "https://aer.example.org/search/page/4"
        );
    }

    #[test]
    fn test_page_range_start_below_one() {
        assert_eq!(PageRange::new(0, 3).start_page, 1);
        assert_eq!(PageRange::unbounded(-5).start_page, 1);
    }

    #[test]
    fn test_resolve_relative_links() {
        let page_url = Url::parse("https://aer.example.org/search/page/1").unwrap();
        let links = item_links(&listing(&["/project/a", "https://other.example/b"]));
        let urls: Vec<String> = links
            .iter()
            .flatten()
            .map(|href| resolve_link(&page_url, href).unwrap())
            .collect();
        assert_eq!(
            urls,
            vec!["https://aer.example.org/project/a", "https://other.example/b"]
        );
    }

    #[tokio::test]
    async fn test_traverse_stops_on_empty_page() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_page(
                    "https://aer.example.org/search/page/1",
                    listing(&["https://aer.example.org/p/1", "https://aer.example.org/p/2"]),
                )
                .with_page("https://aer.example.org/search/page/2", listing(&[]))
                .with_page("https://aer.example.org/p/1", detail("First"))
                .with_page("https://aer.example.org/p/2", detail("Second")),
        );

        let records: Vec<Record> = source(&fetcher)
            .traverse(PageRange::unbounded(1))
            .try_collect()
            .await
            .unwrap();

        let titles: Vec<_> = records.iter().map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("First"), Some("Second")]);
        assert_eq!(records[0].url, "https://aer.example.org/p/1");
        assert_eq!(
            fetcher.requested(),
            vec![
                "https://aer.example.org/search/page/1",
                "https://aer.example.org/p/1",
                "https://aer.example.org/p/2",
                "https://aer.example.org/search/page/2",
            ]
        );
    }

    #[tokio::test]
    async fn test_traverse_respects_page_limit() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_page(
                    "https://aer.example.org/search/page/1",
                    listing(&["https://aer.example.org/p/1"]),
                )
                .with_page(
                    "https://aer.example.org/search/page/2",
                    listing(&["https://aer.example.org/p/2"]),
                )
                .with_page("https://aer.example.org/p/1", detail("First"))
                .with_page("https://aer.example.org/p/2", detail("Second")),
        );

        let records: Vec<Record> = source(&fetcher)
            .traverse(PageRange::new(1, 1))
            .try_collect()
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert!(!fetcher
            .requested()
            .contains(&"https://aer.example.org/search/page/2".to_string()));
    }

    #[tokio::test]
    async fn test_traverse_skips_items_without_links() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_page(
                    "https://aer.example.org/search/page/1",
                    r#"<div class="faux-block-container"><span>no link</span></div>
                       <div class="faux-block-container"><a href="/p/9">nine</a></div>"#,
                )
                .with_page("https://aer.example.org/p/9", detail("Nine")),
        );

        let records: Vec<Record> = source(&fetcher)
            .traverse(PageRange::new(1, 1))
            .try_collect()
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://aer.example.org/p/9");
    }

    #[tokio::test]
    async fn test_dropping_stream_stops_fetching() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_page(
                    "https://aer.example.org/search/page/1",
                    listing(&["https://aer.example.org/p/1", "https://aer.example.org/p/2"]),
                )
                .with_page("https://aer.example.org/p/1", detail("First"))
                .with_page("https://aer.example.org/p/2", detail("Second")),
        );

        {
            let source = source(&fetcher);
            let stream = source.traverse(PageRange::unbounded(1));
            pin_mut!(stream);
            let first = stream.next().await.unwrap().unwrap();
            assert_eq!(first.title.as_deref(), Some("First"));
        }

        assert_eq!(
            fetcher.requested(),
            vec![
                "https://aer.example.org/search/page/1",
                "https://aer.example.org/p/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_structural_error_ends_stream() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_page(
                    "https://aer.example.org/search/page/1",
                    listing(&[
                        "https://aer.example.org/p/1",
                        "https://aer.example.org/p/2",
                        "https://aer.example.org/p/3",
                    ]),
                )
                .with_page("https://aer.example.org/p/1", detail("First"))
                .with_page(
                    "https://aer.example.org/p/2",
                    r#"<div class="bleed-area"><p>no heading</p></div>"#,
                )
                .with_page("https://aer.example.org/p/3", detail("Third")),
        );

        let results: Vec<_> = source(&fetcher)
            .traverse(PageRange::unbounded(1))
            .collect()
            .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(SourceError::Structure { field: "title", .. })
        ));
        assert!(!fetcher
            .requested()
            .contains(&"https://aer.example.org/p/3".to_string()));
    }

    #[tokio::test]
    async fn test_bad_link_ends_stream_after_earlier_items() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_page(
                    "https://aer.example.org/search/page/1",
                    listing(&["https://aer.example.org/p/1", "https://exa mple.com/p/2"]),
                )
                .with_page("https://aer.example.org/p/1", detail("First")),
        );

        let results: Vec<_> = source(&fetcher)
            .traverse(PageRange::new(1, 1))
            .collect()
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].as_ref().unwrap().title.as_deref(),
            Some("First")
        );
        assert!(matches!(results[1], Err(SourceError::InvalidUrl(_))));
        assert_eq!(
            fetcher.requested(),
            vec![
                "https://aer.example.org/search/page/1",
                "https://aer.example.org/p/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_ends_stream() {
        let fetcher = Arc::new(MockFetcher::new());

        let results: Vec<_> = source(&fetcher)
            .traverse(PageRange::unbounded(1))
            .collect()
            .await;

        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(SourceError::Http { status: 404, .. })
        ));
    }
}
