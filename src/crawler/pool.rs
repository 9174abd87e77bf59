//! Fixed-size worker pool
//!
//! Each dispatched URL runs as its own task holding one of `size` semaphore
//! permits, so at most `size` pages are fetched at once. The coordinator only
//! dispatches while a permit is free, which keeps dispatch from ever blocking.

use crate::crawler::fetcher::{fetch_html, PageFetcher};
use crate::crawler::parser::parse_page;
use crate::frontier::{FrontierQueue, VisitedSet};
use crate::output::CrawlReporter;
use crate::FetchError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Everything a worker needs to process one page
pub struct PageContext {
    /// The crawl's root origin
    pub origin: String,
    pub visited: Arc<VisitedSet>,
    pub queue: Arc<FrontierQueue>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub reporter: Arc<dyn CrawlReporter>,
}

/// Result of processing one claimed URL
#[derive(Debug)]
pub enum PageOutcome {
    /// Page fetched; links fed back to the frontier and text reported
    Scraped {
        url: String,
        /// Number of links newly added to the frontier
        links_enqueued: u64,
    },

    /// Fetch failed or returned a non-200 status; dropped without retry
    Failed { url: String, error: FetchError },
}

/// Fetches one claimed page and feeds its links back into the frontier
///
/// A discovered link is enqueued only if it has not been claimed and is not
/// already pending. The dequeue-time claim remains the authoritative check.
pub async fn process_page(ctx: &PageContext, url: String) -> PageOutcome {
    let html = match fetch_html(ctx.fetcher.as_ref(), &url).await {
        Ok(html) => html,
        Err(error) => {
            tracing::warn!("Failed to retrieve {}: {}", url, error);
            return PageOutcome::Failed { url, error };
        }
    };

    let parsed = parse_page(&html, &ctx.origin);

    let mut links_enqueued = 0;
    for link in parsed.links {
        if ctx.visited.contains(&link) {
            continue;
        }
        if ctx.queue.offer(link.clone()) {
            ctx.reporter.discovered(&link);
            links_enqueued += 1;
        }
    }

    ctx.reporter.scraped(&url, &parsed.text);
    tracing::debug!("Processed {} ({} new links)", url, links_enqueued);

    PageOutcome::Scraped {
        url,
        links_enqueued,
    }
}

/// Bounded set of in-flight page tasks
pub struct WorkerPool {
    size: usize,
    permits: Arc<Semaphore>,
    tasks: JoinSet<PageOutcome>,
    ctx: Arc<PageContext>,
}

impl WorkerPool {
    /// Creates a pool running at most `size` pages concurrently
    pub fn new(size: usize, ctx: Arc<PageContext>) -> Self {
        let size = size.max(1);
        Self {
            size,
            permits: Arc::new(Semaphore::new(size)),
            tasks: JoinSet::new(),
            ctx,
        }
    }

    /// Returns the configured worker count
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if another page can start right now
    pub fn has_capacity(&self) -> bool {
        self.permits.available_permits() > 0
    }

    /// Number of dispatched tasks not yet joined
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if every dispatched task has been joined
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Starts processing `url` on a free worker
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The page task was spawned
    /// * `Err(url)` - No worker is free; the URL is handed back
    pub fn dispatch(&mut self, url: String) -> Result<(), String> {
        let permit = match self.permits.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => return Err(url),
        };

        let ctx = self.ctx.clone();
        self.tasks.spawn(async move {
            let outcome = process_page(&ctx, url).await;
            drop(permit);
            outcome
        });
        Ok(())
    }

    /// Waits for the next task to finish
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn join_next(&mut self) -> Option<Result<PageOutcome, JoinError>> {
        self.tasks.join_next().await
    }

    /// Aborts every in-flight task and waits for them to stop
    ///
    /// # Returns
    ///
    /// The number of tasks that were still running.
    pub async fn abort_all(&mut self) -> usize {
        let remaining = self.tasks.len();
        self.tasks.shutdown().await;
        remaining
    }
}
