//! Site profiles and their selector tables
//!
//! A profile names the fallback chains used to locate cards and fields on one
//! target site. Each chain is ordered: the first selector that matches wins,
//! so older or alternative markup variants sit further down the list.

use crate::ExtractError;
use std::fmt;
use std::str::FromStr;

/// Sites the extractor knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SiteProfile {
    /// books.toscrape.com style listings (`article.product_pod` cards)
    #[default]
    BooksToScrape,
}

/// Selector chains for one profile
#[derive(Debug, Clone, Copy)]
pub struct SelectorTable {
    /// Repeating card container, one per catalog entry
    pub cards: &'static [&'static str],

    /// Element carrying the entry name (title attribute or text) and its link
    pub title: &'static [&'static str],

    pub price: &'static [&'static str],

    /// Element whose class list carries the rating word
    pub rating: &'static [&'static str],

    pub availability: &'static [&'static str],

    /// Category label used when the listing does not carry one
    pub default_category: &'static str,
}

const BOOKS_TOSCRAPE: SelectorTable = SelectorTable {
    cards: &["article.product_pod", "ol.row li.col-xs-6"],
    title: &["h3 a", "a[title]"],
    price: &[".price_color", "p.price_color"],
    rating: &["p.star-rating"],
    availability: &[
        ".instock.availability",
        "p.instock_availability",
        ".availability",
    ],
    default_category: "Books",
};

impl SiteProfile {
    /// The selector chains for this profile
    pub fn selectors(&self) -> &'static SelectorTable {
        match self {
            Self::BooksToScrape => &BOOKS_TOSCRAPE,
        }
    }

    /// Name used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BooksToScrape => "books-toscrape",
        }
    }

    /// Returns all supported profiles
    pub fn all() -> &'static [Self] {
        &[Self::BooksToScrape]
    }
}

impl FromStr for SiteProfile {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "books-toscrape" => Ok(Self::BooksToScrape),
            _ => Err(ExtractError::UnsupportedProfile(s.to_string())),
        }
    }
}

impl fmt::Display for SiteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
