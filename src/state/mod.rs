//! State module for tracking crawl progress
//!
//! This module provides the coordinator's lifecycle phases and the snapshot
//! of crawl progress that is checkpointed to disk.
//!
//! # Components
//!
//! - `CrawlPhase`: Seeding → Running → Draining → Checkpointed
//! - `CrawlSnapshot`: visited URLs plus the pending queue, with the
//!   visited-wins merge used on resume

mod phase;
mod snapshot;

// Re-export main types
pub use phase::CrawlPhase;
pub use snapshot::CrawlSnapshot;
