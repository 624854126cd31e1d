use url::Url;

/// Resolves an href against a base URL
///
/// Returns None if the link cannot be followed:
/// - empty hrefs
/// - fragment-only hrefs (`#`, `#top`)
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use vitrine::links::resolve_href;
///
/// let base = Url::parse("https://books.toscrape.com/catalogue/page-1.html").unwrap();
/// let next = resolve_href("page-2.html", &base).unwrap();
/// assert_eq!(next.as_str(), "https://books.toscrape.com/catalogue/page-2.html");
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if is_http(&absolute_url) => Some(absolute_url),
        _ => None,
    }
}

/// Parses a URL string, accepting only HTTP and HTTPS
pub fn parse_http_url(url_str: &str) -> Result<Url, String> {
    let url = Url::parse(url_str.trim()).map_err(|e| format!("'{}': {}", url_str, e))?;
    if !is_http(&url) {
        return Err(format!(
            "'{}': only HTTP and HTTPS schemes are supported, got {}",
            url_str,
            url.scheme()
        ));
    }
    if url.host_str().is_none() {
        return Err(format!("'{}': missing host", url_str));
    }
    Ok(url)
}

fn is_http(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}
