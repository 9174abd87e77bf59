use dashmap::DashSet;
use std::collections::BTreeSet;

/// Set of URLs already claimed for fetching
///
/// Membership only ever grows. `try_claim` is the single synchronization
/// point that keeps two workers from fetching the same URL.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set pre-populated with already-visited URLs
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let set = Self::new();
        for url in urls {
            set.urls.insert(url);
        }
        set
    }

    /// Atomically claims `url` for processing
    ///
    /// # Returns
    ///
    /// * `true` - This call inserted the URL; the caller owns fetching it
    /// * `false` - The URL was already claimed
    pub fn try_claim(&self, url: &str) -> bool {
        // Cheap read path first; insert is the authoritative check
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Returns a sorted copy of the claimed URLs
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.urls.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns the number of claimed URLs
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns whether nothing has been claimed
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
