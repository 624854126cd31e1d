use url::Url;

/// Returns the path a URL points at, without a trailing slash
///
/// Query string and fragment are ignored. Strings that do not parse as
/// absolute URLs are cut at the first `?` or `#`.
pub fn page_path(url_str: &str) -> String {
    let path = match Url::parse(url_str) {
        Ok(url) => url.path().to_string(),
        Err(_) => url_str
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    path.trim_end_matches('/').to_string()
}

/// Checks whether two URLs denote the same logical page
///
/// Only the paths are compared, ignoring a trailing slash, the query string
/// and the fragment. Sites that page through a query parameter
/// (`?page=2`) therefore look like a single page.
///
/// # Examples
///
/// ```
/// use vitrine::links::is_same_page;
///
/// assert!(is_same_page("https://a.com/list/", "https://a.com/list#top"));
/// assert!(!is_same_page("https://a.com/page-1.html", "https://a.com/page-2.html"));
/// ```
pub fn is_same_page(url1: &str, url2: &str) -> bool {
    page_path(url1) == page_path(url2)
}
