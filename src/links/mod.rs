//! Link handling module for Vitrine
//!
//! This module resolves hrefs found in page markup to absolute URLs and
//! decides when two URLs denote the same logical page.

mod resolve;
mod same_page;

// Re-export main functions
pub use resolve::{parse_http_url, resolve_href};
pub use same_page::{is_same_page, page_path};
