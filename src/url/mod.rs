//! URL handling module for Ripple-Crawl
//!
//! This module derives the crawl origin and state-file key from the seed URL,
//! and decides which discovered links stay inside the crawl.
//!
//! URL identity is textual: two URLs are the same page iff their absolute
//! strings are byte-equal. Nothing here strips trailing slashes, queries or
//! fragments.

mod filter;
mod origin;

pub use filter::resolve_candidate;
pub use origin::{root_origin, state_key};
