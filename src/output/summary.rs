//! Run summary
//!
//! Condenses a crawl outcome into the handful of numbers reported at the end
//! of a run.

use crate::state::{CrawlOutcome, StopReason};
use std::time::Duration;

/// End-of-run report
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Pages that were fetched and extracted
    pub pages: usize,

    /// Records across all pages
    pub records: usize,

    /// Why pagination stopped
    pub stop_reason: StopReason,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn from_outcome(outcome: &CrawlOutcome, elapsed: Duration) -> Self {
        Self {
            pages: outcome.page_count(),
            records: outcome.record_count(),
            stop_reason: outcome.stop_reason,
            elapsed,
        }
    }

    /// A run succeeds when it produced at least one record
    ///
    /// A run that stopped early on a fetch failure still succeeds if earlier
    /// pages yielded records.
    pub fn is_success(&self) -> bool {
        self.records > 0
    }

    /// Returns true if records were gathered but the run ended on a failure
    pub fn is_partial(&self) -> bool {
        self.is_success() && self.stop_reason.is_failure()
    }

    /// Records per page, zero when no page was processed
    pub fn records_per_page(&self) -> f64 {
        if self.pages == 0 {
            return 0.0;
        }
        self.records as f64 / self.pages as f64
    }

    /// Emits the summary through `tracing`
    pub fn log(&self) {
        tracing::info!(
            "Run finished in {:.1}s: {} pages, {} records, stopped: {}",
            self.elapsed.as_secs_f64(),
            self.pages,
            self.records,
            self.stop_reason
        );

        if !self.is_success() {
            tracing::error!("No records were extracted");
        } else if self.is_partial() {
            tracing::warn!(
                "Partial run: {} records kept from {} pages before the failure",
                self.records,
                self.pages
            );
        }
    }

    /// Prints the summary to stdout in a formatted manner
    pub fn print(&self) {
        println!("=== Crawl Summary ===\n");
        println!("  Pages processed: {}", self.pages);
        println!(
            "  Records extracted: {} ({:.1} per page)",
            self.records,
            self.records_per_page()
        );
        println!("  Stop reason: {}", self.stop_reason);
        println!("  Duration: {:.1}s", self.elapsed.as_secs_f64());
        println!();

        if self.is_success() {
            println!("✓ Run succeeded");
        } else {
            println!("✗ Run failed: no records extracted");
        }
    }
}
