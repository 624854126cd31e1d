//! Next-page link resolution
//!
//! Listing pages advertise their successor in many ways. The resolver tries
//! the common pagination markup first and only then falls back to scanning
//! anchor text.

use crate::links::resolve_href;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Structured pagination markup, in priority order
const NEXT_SELECTORS: &[&str] = &[
    r#"li.next a[href]"#,
    r#"[rel="next"]"#,
    r#"a[aria-label="next"], a[aria-label="Next"]"#,
    r#".pagination .next a"#,
];

fn next_selectors() -> &'static [Selector] {
    static SELECTORS: OnceLock<Vec<Selector>> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        NEXT_SELECTORS
            .iter()
            .filter_map(|raw| Selector::parse(raw).ok())
            .collect()
    })
}

fn anchor_selector() -> Option<&'static Selector> {
    static ANCHOR: OnceLock<Option<Selector>> = OnceLock::new();
    ANCHOR.get_or_init(|| Selector::parse("a[href]").ok()).as_ref()
}

/// Finds the URL of the page after `current_url`
///
/// Relative links are resolved against `base_url`, which defaults to the
/// current URL. The first element found by the structured selectors decides
/// the result even when its href is missing or unusable; the anchor text scan
/// runs only when none of them matches anything.
///
/// # Example
///
/// ```
/// use url::Url;
/// use vitrine::crawler::resolve_next;
///
/// let page = Url::parse("https://books.toscrape.com/catalogue/page-1.html").unwrap();
/// let html = r#"<ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul>"#;
/// let next = resolve_next(html, &page, None).unwrap();
/// assert_eq!(next.as_str(), "https://books.toscrape.com/catalogue/page-2.html");
/// ```
pub fn resolve_next(markup: &str, current_url: &Url, base_url: Option<&Url>) -> Option<Url> {
    let base = base_url.unwrap_or(current_url);
    let document = Html::parse_document(markup);

    if let Some(element) = next_selectors()
        .iter()
        .find_map(|selector| document.select(selector).next())
    {
        let next = href_of(element, base);
        if next.is_none() {
            tracing::debug!("Next-page element on {} has no usable href", current_url);
        }
        return next;
    }

    let anchors = anchor_selector()?;
    document
        .select(anchors)
        .filter(|anchor| {
            anchor
                .text()
                .collect::<String>()
                .to_lowercase()
                .contains("next")
        })
        .find_map(|anchor| href_of(anchor, base))
}

fn href_of(element: ElementRef<'_>, base: &Url) -> Option<Url> {
    element
        .value()
        .attr("href")
        .and_then(|href| resolve_href(href, base))
}
