//! Request gate for duplicate-request suppression
//!
//! The gate remembers when each URL was last fetched successfully and reports
//! whether fetching it again now would break the per-URL cooldown.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Default minimum interval between two fetches of the same URL
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1500);

/// Tracks the last successful fetch of every URL in a run
///
/// One gate is meant to live for exactly one crawl run. It is not internally
/// synchronized; the fetcher that owns it is driven from a single task.
#[derive(Debug, Clone)]
pub struct RequestGate {
    /// Last successful fetch per URL
    last_fetch: HashMap<String, Instant>,

    /// Minimum time between two fetches of the same URL
    cooldown: Duration,
}

impl RequestGate {
    /// Creates an empty gate with the given cooldown
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_fetch: HashMap::new(),
            cooldown,
        }
    }

    /// The configured cooldown
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Returns true if the URL was registered less than `cooldown` ago
    pub fn is_blocked(&self, url: &str) -> bool {
        self.is_blocked_at(url, Instant::now())
    }

    /// Same as [`RequestGate::is_blocked`] at an explicit instant
    pub fn is_blocked_at(&self, url: &str, now: Instant) -> bool {
        self.time_until_allowed(url, now).is_some()
    }

    /// Returns how long to wait before the URL may be fetched again
    ///
    /// Returns None if the URL can be fetched now.
    pub fn time_until_allowed(&self, url: &str, now: Instant) -> Option<Duration> {
        let last = self.last_fetch.get(url)?;
        let elapsed = now.saturating_duration_since(*last);
        if elapsed < self.cooldown {
            Some(self.cooldown - elapsed)
        } else {
            None
        }
    }

    /// Stamps the URL with the current time
    pub fn register(&mut self, url: &str) {
        self.register_at(url, Instant::now());
    }

    /// Stamps the URL with an explicit instant
    pub fn register_at(&mut self, url: &str, now: Instant) {
        self.last_fetch.insert(url.to_string(), now);
    }

    /// Number of URLs the gate has seen
    pub fn len(&self) -> usize {
        self.last_fetch.len()
    }

    /// Returns whether no URL has been registered yet
    pub fn is_empty(&self) -> bool {
        self.last_fetch.is_empty()
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://books.toscrape.com/catalogue/page-1.html";

    #[test]
    fn test_unknown_url_is_not_blocked() {
        let gate = RequestGate::new(Duration::from_secs(2));
        assert!(!gate.is_blocked(URL));
        assert!(gate.is_empty());
    }

    #[test]
    fn test_blocked_within_cooldown() {
        let mut gate = RequestGate::new(Duration::from_secs(2));
        let start = Instant::now();
        gate.register_at(URL, start);

        assert!(gate.is_blocked_at(URL, start));
        assert!(gate.is_blocked_at(URL, start + Duration::from_millis(1999)));
        assert_eq!(
            gate.time_until_allowed(URL, start + Duration::from_millis(500)),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_unblocked_after_cooldown() {
        let mut gate = RequestGate::new(Duration::from_secs(2));
        let start = Instant::now();
        gate.register_at(URL, start);

        assert!(!gate.is_blocked_at(URL, start + Duration::from_secs(2)));
        assert_eq!(gate.time_until_allowed(URL, start + Duration::from_secs(3)), None);
    }

    #[test]
    fn test_urls_are_tracked_independently() {
        let mut gate = RequestGate::new(Duration::from_secs(2));
        gate.register(URL);

        assert!(gate.is_blocked(URL));
        assert!(!gate.is_blocked("https://books.toscrape.com/catalogue/page-2.html"));
        assert_eq!(gate.len(), 1);
    }

    #[test]
    fn test_register_refreshes_timestamp() {
        let mut gate = RequestGate::new(Duration::from_secs(2));
        let start = Instant::now();
        gate.register_at(URL, start);
        gate.register_at(URL, start + Duration::from_secs(5));

        assert!(gate.is_blocked_at(URL, start + Duration::from_secs(6)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_expires_on_clock() {
        let mut gate = RequestGate::new(Duration::from_secs(2));
        gate.register(URL);
        assert!(gate.is_blocked(URL));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!gate.is_blocked(URL));
    }
}
