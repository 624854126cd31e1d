//! Crawler module for paginated catalog fetching
//!
//! This module contains the fetch-retry-paginate pipeline, including:
//! - HTTP transport with rotating identity headers
//! - Per-URL cooldown through the request gate
//! - Anti-bot challenge detection
//! - Retry with exponential backoff and jitter
//! - Next-page resolution and the pagination loop

mod challenge;
mod fetcher;
mod gate;
mod next_page;
mod paginator;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use challenge::looks_like_challenge;
pub use fetcher::{FetchOutcome, Pacing, PageFetcher, ResilientFetcher, RetryPolicy};
pub use gate::{RequestGate, DEFAULT_COOLDOWN};
pub use next_page::resolve_next;
pub use paginator::Paginator;
pub use transport::{
    build_http_client, identity_headers, RawResponse, ReqwestTransport, Transport, TransportError,
    USER_AGENTS,
};

use crate::config::Config;
use crate::extract::Extractor;
use crate::state::CrawlOutcome;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the start URL and site profile
/// 2. Build the HTTP client and the run's fetcher
/// 3. Paginate from the start URL until a stop condition
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Pages gathered and why the run stopped
/// * `Err(VitrineError)` - The run could not be set up
pub async fn crawl(config: &Config) -> crate::Result<CrawlOutcome> {
    let start = config.crawl.parsed_start_url()?;
    let extractor = Extractor::new(config.crawl.site_profile()?)?;

    let policy = config.fetcher.retry_policy();
    let client = build_http_client(policy.timeout)?;
    let mut fetcher = ResilientFetcher::new(
        ReqwestTransport::new(client),
        RequestGate::new(config.fetcher.cooldown()),
        policy,
        config.fetcher.pacing(),
    );

    tracing::info!(
        "Starting crawl at {} (profile {}, max pages {})",
        start,
        extractor.profile(),
        config
            .crawl
            .max_pages
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
    );

    let mut paginator = Paginator::new(config.crawl.max_pages);
    Ok(paginator.run(&mut fetcher, &extractor, start).await)
}
