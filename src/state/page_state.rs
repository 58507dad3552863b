/// Page state definitions for tracking crawl progress
///
/// This module defines the outcome of expanding a single node.
use std::fmt;

/// Represents the state of a page node in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Active States =====
    /// Node exists but has not been expanded yet (part of the frontier)
    Discovered,

    // ===== Terminal Success States =====
    /// Page was fetched, parsed, and its links were added as edges
    Expanded,

    /// Remaining depth budget was zero; recorded as a leaf on purpose
    DepthExhausted,

    // ===== Terminal Error States =====
    /// Effective-URL resolution or page fetch failed (network, timeout, HTTP >= 400)
    FetchFailed,

    /// Page Content-Type is not HTML
    ContentMismatch,

    /// Page body could not be parsed into a document
    ParseFailed,

    // ===== Special States =====
    /// The crawl's node or time budget ran out before this node was expanded
    BudgetExhausted,
}

impl PageState {
    /// Returns true while the node is still waiting in the frontier
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Discovered)
    }

    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this represents a page whose expansion failed
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed | Self::ContentMismatch | Self::ParseFailed
        )
    }

    /// Converts the page state to its stable string representation
    ///
    /// Used by the text and database exporters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Expanded => "expanded",
            Self::DepthExhausted => "depth_exhausted",
            Self::FetchFailed => "fetch_failed",
            Self::ContentMismatch => "content_mismatch",
            Self::ParseFailed => "parse_failed",
            Self::BudgetExhausted => "budget_exhausted",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Discovered,
            Self::Expanded,
            Self::DepthExhausted,
            Self::FetchFailed,
            Self::ContentMismatch,
            Self::ParseFailed,
            Self::BudgetExhausted,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
