use crate::extract::Record;
use crate::state::StopReason;

/// One successfully fetched and extracted page
#[derive(Debug, Clone)]
pub struct PageResult {
    /// The URL the page was fetched from
    pub url: String,

    /// Raw markup as returned by the server
    pub markup: String,

    /// Records extracted from the page, in document order
    pub records: Vec<Record>,
}

/// Everything a pagination run produced
///
/// Pages are kept in visitation order. A run that stopped early still carries
/// every page gathered before the stop.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub pages: Vec<PageResult>,
    pub stop_reason: StopReason,
}

impl CrawlOutcome {
    /// Number of pages that contributed records
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total records across all pages
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(|page| page.records.len()).sum()
    }

    /// Iterates over all records, first page first
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.pages.iter().flat_map(|page| page.records.iter())
    }

    /// Consumes the outcome and flattens all records into one list
    pub fn into_records(self) -> Vec<Record> {
        self.pages
            .into_iter()
            .flat_map(|page| page.records)
            .collect()
    }
}
