//! Vitrine: a resilient catalog crawler
//!
//! This crate walks a paginated catalog site page by page, extracting
//! structured records from each listing while coping with timeouts, rate
//! limits and anti-bot challenges along the way.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod links;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Vitrine operations
#[derive(Debug, Error)]
pub enum VitrineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unsupported site profile: {0}")]
    UnsupportedProfile(String),
}

/// Extraction-specific errors
///
/// Missing or malformed fields are never errors; they degrade to absent
/// values on the record. These variants cover misconfiguration only.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported site profile: {0}")]
    UnsupportedProfile(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, FetchOutcome, Paginator, RequestGate, ResilientFetcher, RetryPolicy};
pub use extract::{Extractor, Record, SiteProfile};
pub use state::{CrawlOutcome, CrawlState, PageResult, StopReason};
