//! Paginator - the fetch, extract, follow loop
//!
//! This module drives a crawl run from the start URL to a stop condition:
//! - Enforcing the page limit
//! - Detecting cycles through the visited set
//! - Aggregating page results in visitation order
//!
//! Pages are processed strictly one after another.

use crate::crawler::fetcher::{FetchOutcome, PageFetcher};
use crate::crawler::next_page::resolve_next;
use crate::extract::Extractor;
use crate::links::is_same_page;
use crate::state::{CrawlOutcome, CrawlState, PageResult, StopReason};
use std::collections::HashSet;
use url::Url;

/// Walks a chain of listing pages
#[derive(Debug, Default)]
pub struct Paginator {
    /// Maximum pages to process; None means unlimited
    max_pages: Option<usize>,

    /// Every URL processed in the current run
    visited: HashSet<String>,

    state: CrawlState,
}

impl Paginator {
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            max_pages,
            visited: HashSet::new(),
            state: CrawlState::Running,
        }
    }

    /// Current state of the run
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Returns true if the URL was already processed in this run
    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Runs pagination from `start` until a stop condition is met
    ///
    /// Never fails: a fetch failure ends the run with
    /// [`StopReason::FetchFailed`] and the pages gathered so far are kept.
    pub async fn run<F>(&mut self, fetcher: &mut F, extractor: &Extractor, start: Url) -> CrawlOutcome
    where
        F: PageFetcher + ?Sized,
    {
        self.visited.clear();
        self.state = CrawlState::Running;

        let mut pages: Vec<PageResult> = Vec::new();
        let mut current = start;

        let stop_reason = loop {
            if let Some(limit) = self.max_pages {
                if pages.len() >= limit {
                    tracing::info!("Reached page limit ({})", limit);
                    break StopReason::PageLimitReached;
                }
            }

            if !self.visited.insert(current.to_string()) {
                tracing::warn!("Loop detected: {} already visited", current);
                break StopReason::CycleDetected;
            }

            tracing::info!("Page {}: {}", pages.len() + 1, current);

            let markup = match fetcher.fetch(current.as_str()).await {
                FetchOutcome::Success(markup) => markup,
                failure => {
                    tracing::error!("Failed to fetch {}: {}", current, failure);
                    break StopReason::FetchFailed;
                }
            };

            let records = extractor.extract(&markup, &current);
            tracing::info!("Extracted {} records from {}", records.len(), current);

            let next = resolve_next(&markup, &current, None);

            pages.push(PageResult {
                url: current.to_string(),
                markup,
                records,
            });

            match next {
                Some(next) if !is_same_page(current.as_str(), next.as_str()) => {
                    tracing::debug!("Next page: {}", next);
                    current = next;
                }
                Some(_) => {
                    tracing::info!("Next link points back to {}, stopping", current);
                    break StopReason::NoNextPage;
                }
                None => {
                    tracing::info!("No next page after {}", current);
                    break StopReason::NoNextPage;
                }
            }
        };

        self.state = CrawlState::Stopped(stop_reason);

        let outcome = CrawlOutcome { pages, stop_reason };
        tracing::info!(
            "Pagination stopped ({}): {} pages, {} records",
            stop_reason,
            outcome.page_count(),
            outcome.record_count()
        );
        outcome
    }
}
