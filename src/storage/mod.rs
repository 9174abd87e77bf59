//! Storage module for persisting crawl snapshots
//!
//! This module handles checkpoint persistence for the crawler:
//! - Loading the snapshot for a crawl key at startup
//! - Writing the final snapshot at shutdown via write-to-temp-then-rename
//!
//! One JSON file exists per crawled site, named `<key>_crawler_state.json`.

mod json;
mod traits;

pub use json::JsonStateStore;
pub use traits::{StateResult, StateStore};

use crate::state::CrawlSnapshot;

/// Loads a snapshot, treating a corrupt file as absent
///
/// Corrupt or unreadable state never aborts a crawl: the failure is logged
/// and the crawl restarts from its seed.
pub fn load_or_none(store: &dyn StateStore, key: &str) -> Option<CrawlSnapshot> {
    match store.load(key) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Ignoring saved state for '{}': {}", key, e);
            None
        }
    }
}

/// Saves a snapshot, logging instead of propagating failures
///
/// # Returns
///
/// `true` if the snapshot reached durable storage.
pub fn save_logged(store: &dyn StateStore, key: &str, snapshot: &CrawlSnapshot) -> bool {
    match store.save(key, snapshot) {
        Ok(()) => {
            tracing::info!(
                "Saved state for '{}' ({} visited, {} pending)",
                key,
                snapshot.visited.len(),
                snapshot.pending.len()
            );
            true
        }
        Err(e) => {
            tracing::error!("Failed to save state for '{}': {}", key, e);
            false
        }
    }
}
