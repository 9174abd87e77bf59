use crate::frontier::{FrontierQueue, VisitedSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Durable picture of crawl progress
///
/// Serialized as `{ "scrapedPages": [...], "queue": [...] }`. Unknown fields
/// are ignored and missing ones default to empty on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSnapshot {
    /// URLs claimed for fetching, sorted
    #[serde(rename = "scrapedPages", default)]
    pub visited: BTreeSet<String>,

    /// URLs still waiting in the frontier, in queue order
    #[serde(rename = "queue", default)]
    pub pending: Vec<String>,
}

impl CrawlSnapshot {
    /// Snapshot for a fresh crawl: nothing visited, only the seed pending
    pub fn seeded(seed: &str) -> Self {
        Self {
            visited: BTreeSet::new(),
            pending: vec![seed.to_string()],
        }
    }

    /// Captures the current contents of the shared frontier
    ///
    /// Only called while no worker is dispatching, or during interruption
    /// where a best-effort picture of the queue is acceptable.
    pub fn capture(visited: &VisitedSet, queue: &FrontierQueue) -> Self {
        Self {
            visited: visited.snapshot(),
            pending: queue.snapshot(),
        }
    }

    /// Rebuilds the shared frontier from this snapshot
    ///
    /// A URL listed as both visited and pending is treated as visited and
    /// dropped from the queue. Repeated pending entries collapse to the first.
    pub fn restore(self) -> (VisitedSet, FrontierQueue) {
        let queue = FrontierQueue::new();
        let mut seen = HashSet::new();

        for url in self.pending {
            if self.visited.contains(&url) || !seen.insert(url.clone()) {
                continue;
            }
            queue.push(url);
        }

        (VisitedSet::from_urls(self.visited), queue)
    }

    /// Returns true if nothing is left to crawl
    pub fn is_drained(&self) -> bool {
        self.pending.iter().all(|url| self.visited.contains(url))
    }
}
