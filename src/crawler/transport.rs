//! HTTP transport
//!
//! This module handles the raw HTTP side of a fetch:
//! - Building the shared HTTP client
//! - Rotating browser identity headers per request
//! - Reducing transport failures to timeout / connect / other
//!
//! Classifying a response (status codes, challenge pages) is the fetcher's
//! job; a transport only reports what came back on the wire.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Browser user agents rotated across requests
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/120.0.0.0",
];

/// Headers sent with every request besides the user agent
const BASE_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.9,pt-BR;q=0.8"),
    ("dnt", "1"),
    ("upgrade-insecure-requests", "1"),
];

/// What came back from a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Failure before a complete response was read
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Issues GET requests on behalf of the fetcher
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one GET with the given headers and timeout
    async fn get(
        &self,
        url: &str,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;
}

/// Picks a random identity: one user agent from the pool plus the base headers
pub fn identity_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in BASE_HEADERS {
        if let (Ok(name), Ok(value)) = (
            name.parse::<HeaderName>(),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    let user_agent = USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0]);
    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, value);
    }

    headers
}

/// Builds the HTTP client shared by every request of a run
///
/// Redirects are followed (up to 10 hops) and compressed bodies are decoded.
/// Per-request timeouts come from the retry policy, so only the connect phase
/// is bounded here.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use vitrine::crawler::build_http_client;
///
/// let client = build_http_client(Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(connect_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_error)?;

        Ok(RawResponse { status, body })
    }
}

/// Reduces a reqwest error to the transport taxonomy
fn classify_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}
