/// Visit state definitions for the URLs of a crawl run
use std::fmt;

/// Represents how far a URL has progressed through the crawl
///
/// Every URL enters the registry as `Claimed` and ends in exactly one of the
/// terminal states. There is no transition back to `Claimed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// URL has been claimed by a fetch that has not completed yet
    Claimed,

    /// Page was fetched, persisted, and its links were scheduled
    Fetched,

    /// Fetch failed; the URL is a dead end and is excluded from the output
    FetchFailed,
}

impl VisitState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Claimed)
    }

    /// Returns true if the transition `self -> next` is allowed
    pub fn can_transition_to(&self, next: VisitState) -> bool {
        !self.is_terminal() && next.is_terminal()
    }

    /// Short lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claimed => "claimed",
            Self::Fetched => "fetched",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
