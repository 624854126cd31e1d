//! Anti-bot challenge detection
//!
//! Block pages and CAPTCHA interstitials are usually served with a 200 status,
//! so a successful response still has to be checked before it is trusted.

use regex::RegexSet;
use std::sync::OnceLock;

/// Signatures of known challenge pages, matched case-insensitively
const CHALLENGE_PATTERNS: &[&str] = &[
    r"captcha",
    r"recaptcha",
    r"hcaptcha",
    r"cloudflare.*challenge",
    r"please verify you are human",
    r"unusual traffic",
];

fn challenge_signatures() -> &'static RegexSet {
    static SIGNATURES: OnceLock<RegexSet> = OnceLock::new();
    SIGNATURES.get_or_init(|| {
        let patterns = CHALLENGE_PATTERNS.iter().map(|p| format!("(?i){}", p));
        // checked by test_patterns_compile
        RegexSet::new(patterns).unwrap_or_else(|_| RegexSet::empty())
    })
}

/// Returns true if the markup looks like an anti-bot challenge page
///
/// # Examples
///
/// ```
/// use vitrine::crawler::looks_like_challenge;
///
/// assert!(looks_like_challenge("<div class=\"g-recaptcha\"></div>"));
/// assert!(!looks_like_challenge("<h1>All products</h1>"));
/// ```
pub fn looks_like_challenge(markup: &str) -> bool {
    challenge_signatures().is_match(markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert_eq!(challenge_signatures().len(), CHALLENGE_PATTERNS.len());
    }

    #[test]
    fn test_detects_captcha_variants() {
        assert!(looks_like_challenge("<script src=\"https://www.google.com/recaptcha/api.js\">"));
        assert!(looks_like_challenge("<div class=\"h-captcha\" data-sitekey=\"x\">"));
        assert!(looks_like_challenge("<title>CAPTCHA required</title>"));
    }

    #[test]
    fn test_detects_cloudflare_challenge() {
        assert!(looks_like_challenge(
            "<title>Just a moment...</title><p>Cloudflare is running a security challenge</p>"
        ));
    }

    #[test]
    fn test_detects_human_verification_text() {
        assert!(looks_like_challenge("Please verify you are human to continue"));
        assert!(looks_like_challenge("Our systems have detected Unusual Traffic from your network"));
    }

    #[test]
    fn test_cloudflare_without_challenge_is_fine() {
        assert!(!looks_like_challenge("<footer>Served by Cloudflare</footer>"));
    }

    #[test]
    fn test_plain_listing_is_fine() {
        let html = r#"<html><head><title>All products | Books to Scrape</title></head>
            <body><article class="product_pod"><h3>Book</h3></article></body></html>"#;
        assert!(!looks_like_challenge(html));
    }
}
