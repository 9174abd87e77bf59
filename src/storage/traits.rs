//! Storage traits
//!
//! This module defines the trait interface for snapshot backends.

use crate::state::CrawlSnapshot;
use crate::StateError;

/// Result type for storage operations
pub type StateResult<T> = Result<T, StateError>;

/// Trait for snapshot storage backends
///
/// Startup loads before any worker runs and shutdown saves after dispatch
/// has stopped, so implementations see at most one caller at a time.
pub trait StateStore: Send + Sync {
    /// Loads the snapshot stored under `key`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(snapshot))` - A snapshot exists and parsed
    /// * `Ok(None)` - Nothing has been saved under this key
    /// * `Err(StateError::Corrupt)` - Stored data exists but cannot be parsed
    fn load(&self, key: &str) -> StateResult<Option<CrawlSnapshot>>;

    /// Durably replaces the snapshot stored under `key`
    ///
    /// A failure part-way through must leave any previous snapshot intact.
    fn save(&self, key: &str, snapshot: &CrawlSnapshot) -> StateResult<()>;
}
