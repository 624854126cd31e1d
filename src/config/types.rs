use crate::crawler::{Pacing, RetryPolicy};
use crate::extract::SiteProfile;
use crate::links::parse_http_url;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure for Vitrine
///
/// Every section is optional in the file; missing keys take the defaults
/// below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// What to crawl
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// First listing page
    pub start_url: String,

    /// Maximum pages to process; omitted means unlimited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    /// Site profile name (e.g. "books-toscrape")
    pub profile: String,
}

impl CrawlConfig {
    /// The start URL, parsed and restricted to http/https
    pub fn parsed_start_url(&self) -> ConfigResult<Url> {
        parse_http_url(&self.start_url).map_err(ConfigError::InvalidUrl)
    }

    /// The site profile named by `profile`
    pub fn site_profile(&self) -> ConfigResult<SiteProfile> {
        self.profile
            .parse()
            .map_err(|_| ConfigError::UnsupportedProfile(self.profile.clone()))
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: "https://books.toscrape.com/catalogue/page-1.html".to_string(),
            max_pages: None,
            profile: SiteProfile::default().as_str().to_string(),
        }
    }
}

/// Retry, timeout and pacing behavior
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Total attempts per URL, first one included
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    pub base_delay_ms: u64,

    /// Upper bound of the random delay added to each backoff (milliseconds)
    pub max_jitter_ms: u64,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Minimum time between two fetches of the same URL (milliseconds)
    pub cooldown_ms: u64,

    /// Pause after a successful fetch is drawn from this range (milliseconds)
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl FetcherConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            max_jitter: Duration::from_millis(self.max_jitter_ms),
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_jitter_ms: 1000,
            timeout_secs: 15,
            cooldown_ms: 1500,
            min_delay_ms: 500,
            max_delay_ms: 2000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory for exports and the log file
    pub directory: PathBuf,

    /// Also write a JSON export
    pub json: bool,

    /// Also attempt an Excel export
    pub excel: bool,

    /// Mirror logs into `<directory>/scraper.log`
    pub log_file: bool,
}

impl OutputConfig {
    /// Path of the log file inside the output directory
    pub fn log_path(&self) -> PathBuf {
        self.directory.join("scraper.log")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            json: false,
            excel: false,
            log_file: true,
        }
    }
}
