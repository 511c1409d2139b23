/// Page state definitions for tracking crawl progress
///
/// A candidate URL starts out `Pending` and ends in exactly one of the two
/// terminal states. Fetch failures still end in `Visited`; the failure is
/// recorded as an error page, not as a separate state.
use std::fmt;

/// Represents the state of a candidate URL within one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Discovered on a page but not yet taken off the stack
    Pending,

    /// Excluded, already visited, or over budget when its turn came
    Skipped,

    /// Marked visited and fetched (successfully or not)
    Visited,
}

impl PageState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Checks whether `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Skipped) | (Self::Pending, Self::Visited)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
