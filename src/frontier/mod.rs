//! Shared crawl frontier
//!
//! This module holds the only two pieces of mutable state shared between the
//! coordinator and its workers:
//! - `FrontierQueue`: FIFO of URLs waiting to be claimed
//! - `VisitedSet`: URLs already claimed for fetching
//!
//! Callers never take an external lock; every access goes through the atomic
//! operations these types expose.

mod queue;
mod visited;

pub use queue::FrontierQueue;
pub use visited::VisitedSet;
