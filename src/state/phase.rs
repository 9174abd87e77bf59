//! Lifecycle phases of a crawl session

use std::fmt;

/// Represents where the coordinator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Loading a snapshot or seeding the frontier
    Seeding,

    /// Dispatching URLs from the frontier to workers
    Running,

    /// No new dispatch; waiting for in-flight pages to finish
    Draining,

    /// Final snapshot written; nothing else happens
    Checkpointed,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Checkpointed)
    }

    /// Returns true if workers may be running in this phase
    pub fn has_workers(&self) -> bool {
        matches!(self, Self::Running | Self::Draining)
    }

    /// Checks whether moving from `self` to `next` is allowed
    ///
    /// Phases advance in order; interruption may jump from any
    /// non-terminal phase straight to `Checkpointed`.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Seeding, Self::Running) => true,
            (Self::Running, Self::Draining) => true,
            (Self::Draining, Self::Checkpointed) => true,
            (from, Self::Checkpointed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Returns the lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Checkpointed => "checkpointed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
