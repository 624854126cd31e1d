//! Extraction module for catalog listings
//!
//! This module contains everything needed to turn listing markup into records:
//! - Site profiles and their fallback selector tables
//! - The page extractor
//! - Text, price and rating normalizers

mod extractor;
pub mod normalize;
mod profile;

pub use extractor::{extract_records, Extractor};
pub use normalize::{normalize_text, parse_price, parse_rating};
pub use profile::{SelectorTable, SiteProfile};

use serde::Serialize;

/// One catalog entry read from a listing card
///
/// Fields that could not be found are empty strings or `None`; a record is
/// never rejected for missing data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: String,

    /// Numeric price, with currency symbols and separators normalized away
    pub price: Option<f64>,

    pub category: String,

    pub description: String,

    /// Availability label as shown on the page (e.g. "In stock")
    pub availability: String,

    /// Star rating as an ordinal digit, "1" through "5"
    pub rating: Option<String>,

    /// Absolute URL of the entry's detail page
    pub link: String,
}
