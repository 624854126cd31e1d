//! Listing page extractor
//!
//! This module turns one page of catalog markup into records:
//! - Locating the repeating card unit through a fallback chain
//! - Reading each field through its own fallback chain
//! - Resolving record links against the page URL
//!
//! Extraction is total: a card that matched always yields a record, and a
//! field that cannot be found or parsed is left empty.

use crate::extract::normalize::{normalize_text, parse_price, parse_rating, truncate_with_ellipsis};
use crate::extract::{Record, SiteProfile};
use crate::links::resolve_href;
use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Longest description derived from a record name
const DESCRIPTION_MAX_CHARS: usize = 100;

/// Compiled selector chains for one site profile
#[derive(Debug, Clone)]
pub struct Extractor {
    profile: SiteProfile,
    cards: Vec<Selector>,
    title: Vec<Selector>,
    price: Vec<Selector>,
    rating: Vec<Selector>,
    availability: Vec<Selector>,
    default_category: &'static str,
}

impl Extractor {
    /// Compiles the selector chains of a profile
    ///
    /// # Returns
    ///
    /// * `Ok(Extractor)` - Ready to extract pages
    /// * `Err(ExtractError::InvalidSelector)` - A selector in the profile table does not parse
    pub fn new(profile: SiteProfile) -> ExtractResult<Self> {
        let table = profile.selectors();

        Ok(Self {
            profile,
            cards: compile_chain(table.cards)?,
            title: compile_chain(table.title)?,
            price: compile_chain(table.price)?,
            rating: compile_chain(table.rating)?,
            availability: compile_chain(table.availability)?,
            default_category: table.default_category,
        })
    }

    /// The profile this extractor was built for
    pub fn profile(&self) -> SiteProfile {
        self.profile
    }

    /// Extracts every record on a page
    ///
    /// # Arguments
    ///
    /// * `markup` - The page HTML
    /// * `base_url` - The URL relative links are resolved against
    ///
    /// # Returns
    ///
    /// Records in document order; empty if no card selector matched
    ///
    /// # Example
    ///
    /// ```
    /// use url::Url;
    /// use vitrine::extract::{Extractor, SiteProfile};
    ///
    /// let html = r#"<article class="product_pod">
    ///     <h3><a href="a-light-in-the-attic_1000/index.html" title="A Light in the Attic">A Light...</a></h3>
    ///     <p class="price_color">£51.77</p>
    /// </article>"#;
    /// let base = Url::parse("https://books.toscrape.com/catalogue/page-1.html").unwrap();
    /// let records = Extractor::new(SiteProfile::BooksToScrape).unwrap().extract(html, &base);
    /// assert_eq!(records[0].name, "A Light in the Attic");
    /// assert_eq!(records[0].price, Some(51.77));
    /// ```
    pub fn extract(&self, markup: &str, base_url: &Url) -> Vec<Record> {
        let document = Html::parse_document(markup);

        for selector in &self.cards {
            let cards: Vec<ElementRef> = document.select(selector).collect();
            if cards.is_empty() {
                continue;
            }

            tracing::trace!(
                "Matched {} cards with selector {:?} on {}",
                cards.len(),
                selector,
                base_url
            );

            return cards
                .into_iter()
                .map(|card| self.extract_card(card, base_url))
                .collect();
        }

        tracing::debug!("No {} cards found on {}", self.profile, base_url);
        Vec::new()
    }

    /// Reads one card; every field degrades independently
    fn extract_card(&self, card: ElementRef<'_>, base_url: &Url) -> Record {
        let (name, link) = match first_match(card, &self.title) {
            Some(title_el) => {
                let name = title_el
                    .value()
                    .attr("title")
                    .map(normalize_text)
                    .filter(|title| !title.is_empty())
                    .unwrap_or_else(|| element_text(title_el));

                let link = title_el
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_href(href, base_url))
                    .map(|url| url.to_string())
                    .unwrap_or_default();

                (name, link)
            }
            None => (String::new(), String::new()),
        };

        let price = first_match(card, &self.price).and_then(|el| parse_price(&element_text(el)));

        let rating = first_match(card, &self.rating).and_then(|el| parse_rating(el.value().classes()));

        let availability = first_match(card, &self.availability)
            .map(element_text)
            .unwrap_or_default();

        Record {
            description: truncate_with_ellipsis(&name, DESCRIPTION_MAX_CHARS),
            name,
            price,
            category: self.default_category.to_string(),
            availability,
            rating,
            link,
        }
    }
}

/// Extracts records with a one-off extractor for `profile`
pub fn extract_records(markup: &str, base_url: &Url, profile: SiteProfile) -> ExtractResult<Vec<Record>> {
    Ok(Extractor::new(profile)?.extract(markup, base_url))
}

fn compile_chain(chain: &[&str]) -> ExtractResult<Vec<Selector>> {
    chain
        .iter()
        .map(|raw| {
            Selector::parse(raw).map_err(|e| ExtractError::InvalidSelector {
                selector: raw.to_string(),
                message: format!("{:?}", e),
            })
        })
        .collect()
}

/// Returns the first element matched by the first selector in the chain that matches anything
fn first_match<'a>(scope: ElementRef<'a>, chain: &[Selector]) -> Option<ElementRef<'a>> {
    chain
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}
