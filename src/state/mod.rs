//! State module for tracking crawl progress
//!
//! This module provides the paginator's state machine and the values a crawl
//! run accumulates.
//!
//! # Components
//!
//! - `CrawlState`: Whether the paginator is still running or has stopped
//! - `StopReason`: Why a run ended
//! - `PageResult`: One successfully processed page and its records
//! - `CrawlOutcome`: The ordered pages of a run plus its stop reason

mod crawl_state;
mod page_result;

// Re-export main types
pub use crawl_state::{CrawlState, StopReason};
pub use page_result::{CrawlOutcome, PageResult};
