//! Resilient fetcher implementation
//!
//! This module wraps a [`Transport`] with everything needed to survive an
//! unreliable source:
//! - Per-URL cooldown through the [`RequestGate`]
//! - Outcome classification (status codes, timeouts, challenge pages)
//! - Bounded retry with exponential backoff and jitter
//! - Randomized pacing between successful requests

use crate::crawler::challenge::looks_like_challenge;
use crate::crawler::gate::RequestGate;
use crate::crawler::transport::{identity_headers, RawResponse, Transport, TransportError};
use async_trait::async_trait;
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Result of a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 2xx response with a normal page body
    Success(String),

    /// The request did not complete within the policy timeout
    Timeout,

    /// The connection could not be established
    ConnectionError,

    /// Non-2xx status
    HttpError(u16),

    /// 2xx response whose body is an anti-bot challenge (kept for diagnostics)
    CaptchaDetected(String),

    /// Any other failure
    UnknownError(String),
}

impl FetchOutcome {
    /// Returns true for a usable page
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for failures that may clear up on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::HttpError(_))
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "ok",
            Self::Timeout => "timeout",
            Self::ConnectionError => "connection_error",
            Self::HttpError(_) => "http_error",
            Self::CaptchaDetected(_) => "captcha",
            Self::UnknownError(_) => "error",
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpError(status) => write!(f, "http_error ({})", status),
            Self::UnknownError(message) => write!(f, "error ({})", message),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Retry settings, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per fetch, including the first one
    pub max_retries: u32,

    /// Delay before the first retry; doubled for each later one
    pub base_delay: Duration,

    /// Per-request timeout
    pub timeout: Duration,

    /// Upper bound of the random delay added to each backoff
    pub max_jitter: Duration,
}

impl RetryPolicy {
    /// Backoff before the retry that follows attempt `attempt` (zero-based)
    ///
    /// `base_delay * 2^attempt + uniform(0, max_jitter)`
    pub fn backoff_delay<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        exponential + random_between(rng, Duration::ZERO, self.max_jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(15),
            max_jitter: Duration::from_secs(1),
        }
    }
}

/// Randomized delay after every successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Pacing {
    /// No delay between requests
    pub fn none() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Draws one delay uniformly from `[min_delay, max_delay]`
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        random_between(rng, self.min_delay, self.max_delay)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(2000),
        }
    }
}

fn random_between<R: Rng + ?Sized>(rng: &mut R, low: Duration, high: Duration) -> Duration {
    if high <= low {
        return low;
    }
    Duration::from_secs_f64(rng.gen_range(low.as_secs_f64()..=high.as_secs_f64()))
}

/// Anything the paginator can pull pages from
#[async_trait]
pub trait PageFetcher: Send {
    async fn fetch(&mut self, url: &str) -> FetchOutcome;
}

/// Fetcher with cooldown, retry, backoff and pacing
///
/// Holds the run's [`RequestGate`]; build one per crawl run.
pub struct ResilientFetcher<T: Transport> {
    transport: T,
    gate: RequestGate,
    policy: RetryPolicy,
    pacing: Pacing,
}

impl<T: Transport> ResilientFetcher<T> {
    pub fn new(transport: T, gate: RequestGate, policy: RetryPolicy, pacing: Pacing) -> Self {
        Self {
            transport,
            gate,
            policy,
            pacing,
        }
    }

    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches a URL with full retry logic
    ///
    /// # Retry Logic
    ///
    /// | Outcome | Action |
    /// |---------|--------|
    /// | Success | Register with the gate, pace, return |
    /// | Timeout | Back off and retry while attempts remain |
    /// | HTTP non-2xx | Back off and retry while attempts remain |
    /// | Connection error | Return immediately |
    /// | Challenge page | Return immediately |
    /// | Other error | Return immediately |
    ///
    /// A URL still inside its cooldown is delayed by the full cooldown, never
    /// skipped.
    pub async fn fetch_with_retry(&mut self, url: &str) -> FetchOutcome {
        if self.gate.is_blocked(url) {
            tracing::debug!("URL blocked (duplicate request): {}", url);
            tokio::time::sleep(self.gate.cooldown()).await;
        }

        let max_retries = self.policy.max_retries;
        for attempt in 0..max_retries {
            let outcome = self.fetch_once(url).await;

            match outcome {
                FetchOutcome::Success(body) => {
                    self.gate.register(url);
                    let pause = self.pacing.next_delay(&mut rand::thread_rng());
                    tokio::time::sleep(pause).await;
                    return FetchOutcome::Success(body);
                }
                failure if failure.is_retryable() && attempt + 1 < max_retries => {
                    let delay = self.policy.backoff_delay(attempt, &mut rand::thread_rng());
                    tracing::info!(
                        "Retry {}/{} in {:.1}s for {} ({})",
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f64(),
                        url,
                        failure
                    );
                    tokio::time::sleep(delay).await;
                }
                failure => {
                    if failure.is_retryable() {
                        tracing::warn!(
                            "Giving up on {} after {} attempts: {}",
                            url,
                            max_retries,
                            failure
                        );
                    }
                    return failure;
                }
            }
        }

        FetchOutcome::UnknownError(format!(
            "retry policy allows no attempts (max_retries = {})",
            max_retries
        ))
    }

    /// Performs a single attempt and classifies its result
    pub async fn fetch_once(&self, url: &str) -> FetchOutcome {
        let headers = identity_headers();
        let result = self.transport.get(url, headers, self.policy.timeout).await;
        classify(url, result)
    }
}

#[async_trait]
impl<T: Transport> PageFetcher for ResilientFetcher<T> {
    async fn fetch(&mut self, url: &str) -> FetchOutcome {
        self.fetch_with_retry(url).await
    }
}

/// Maps a transport result onto the outcome taxonomy
fn classify(url: &str, result: Result<RawResponse, TransportError>) -> FetchOutcome {
    match result {
        Ok(RawResponse { status, body }) if (200..300).contains(&status) => {
            if looks_like_challenge(&body) {
                tracing::warn!("Possible CAPTCHA detected on page: {}", url);
                FetchOutcome::CaptchaDetected(body)
            } else {
                FetchOutcome::Success(body)
            }
        }
        Ok(RawResponse { status, .. }) => {
            tracing::warn!("HTTP {} on {}", status, url);
            FetchOutcome::HttpError(status)
        }
        Err(TransportError::Timeout) => {
            tracing::warn!("Timeout on {}", url);
            FetchOutcome::Timeout
        }
        Err(TransportError::Connect(error)) => {
            tracing::warn!("Connection error on {}: {}", url, error);
            FetchOutcome::ConnectionError
        }
        Err(TransportError::Other(error)) => {
            tracing::error!("Unexpected error on {}: {}", url, error);
            FetchOutcome::UnknownError(error)
        }
    }
}
