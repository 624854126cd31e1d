/// Paginator state definitions
///
/// This module defines the states a pagination run moves through and the
/// reasons it can stop.
use std::fmt;

/// Why a pagination run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The configured maximum number of pages was processed
    PageLimitReached,

    /// The next URL was already visited in this run
    CycleDetected,

    /// The current page could not be fetched (error, exhausted retries or challenge)
    FetchFailed,

    /// The page had no next link, or it pointed back at the same page
    NoNextPage,
}

impl StopReason {
    /// Returns true if the run ended because of a failure rather than exhaustion
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }

    /// Short machine-friendly label used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageLimitReached => "page_limit_reached",
            Self::CycleDetected => "cycle_detected",
            Self::FetchFailed => "fetch_failed",
            Self::NoNextPage => "no_next_page",
        }
    }

    /// Returns all stop reasons
    pub fn all() -> [Self; 4] {
        [
            Self::PageLimitReached,
            Self::CycleDetected,
            Self::FetchFailed,
            Self::NoNextPage,
        ]
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the current state of the paginator
///
/// `Stopped` is terminal for a run; a new run starts `Running` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlState {
    /// Pages are still being fetched
    #[default]
    Running,

    /// The run is over
    Stopped(StopReason),
}

impl CrawlState {
    /// Returns true while the run is in progress
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true once the run has stopped
    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }

    /// Returns the stop reason, if the run has stopped
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Running => None,
            Self::Stopped(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped(reason) => write!(f, "stopped ({})", reason),
        }
    }
}
