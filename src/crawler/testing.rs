//! Scripted doubles for crawler tests

use crate::crawler::fetcher::{FetchOutcome, PageFetcher};
use crate::crawler::transport::{RawResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub type Scripted = Result<RawResponse, TransportError>;

/// A 200 response with the given body
pub fn ok(body: &str) -> Scripted {
    Ok(RawResponse {
        status: 200,
        body: body.to_string(),
    })
}

/// Transport replaying a fixed sequence of responses per URL
///
/// The last response of a sequence repeats once the sequence is exhausted.
/// Unscripted URLs answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Vec<Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, responses: Vec<Scripted>) -> Self {
        self.routes.insert(url.to_string(), responses);
        self
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, _headers: HeaderMap, _timeout: Duration) -> Scripted {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            let attempt = calls.iter().filter(|u| *u == url).count();
            calls.push(url.to_string());
            attempt
        };

        match self.routes.get(url) {
            Some(responses) if !responses.is_empty() => {
                responses[attempt.min(responses.len() - 1)].clone()
            }
            _ => Ok(RawResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Page fetcher answering from a fixed URL -> outcome table
#[derive(Default)]
pub struct ScriptedFetcher {
    outcomes: HashMap<String, FetchOutcome>,
    calls: Vec<String>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, markup: String) -> Self {
        self.outcome(url, FetchOutcome::Success(markup))
    }

    pub fn outcome(mut self, url: &str, outcome: FetchOutcome) -> Self {
        self.outcomes.insert(url.to_string(), outcome);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&mut self, url: &str) -> FetchOutcome {
        self.calls.push(url.to_string());
        self.outcomes
            .get(url)
            .cloned()
            .unwrap_or(FetchOutcome::HttpError(404))
    }
}

/// Builds a books.toscrape-style listing page
///
/// Cards are named `Item <page>.<n>`; `next` becomes the pager link.
pub fn listing_page(page: usize, records: usize, next: Option<&str>) -> String {
    let mut html = String::from("<html><body><ol class=\"row\">\n");
    for n in 1..=records {
        html.push_str(&format!(
            r#"<li><article class="product_pod">
                <p class="star-rating Four"></p>
                <h3><a href="item-{page}-{n}/index.html" title="Item {page}.{n}">Item {page}.{n}</a></h3>
                <p class="price_color">£{page}{n}.50</p>
                <p class="instock availability">In stock</p>
            </article></li>
"#,
            page = page,
            n = n
        ));
    }
    html.push_str("</ol>\n");
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#,
            next
        ));
    }
    html.push_str("</body></html>");
    html
}
