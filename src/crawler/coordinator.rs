//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Loading the saved snapshot or seeding the frontier
//! - Claiming URLs from the frontier and dispatching them to workers
//! - Detecting drain (empty frontier and no work in flight)
//! - Handling interruption via a cancellation token
//! - Writing the final checkpoint exactly once

use crate::config::{validate_crawler_config, CrawlerConfig};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pool::{PageContext, PageOutcome, WorkerPool};
use crate::frontier::{FrontierQueue, VisitedSet};
use crate::output::{CrawlOutcome, CrawlReport, CrawlReporter, SilentReporter};
use crate::state::{CrawlPhase, CrawlSnapshot};
use crate::storage::{load_or_none, save_logged, StateStore};
use crate::url::{root_origin, state_key};
use crate::RippleError;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

/// Counters accumulated while the crawl loop runs
#[derive(Debug, Default)]
struct RunStats {
    pages_fetched: u64,
    pages_failed: u64,
    pages_abandoned: u64,
    links_enqueued: u64,
    duplicates_skipped: u64,
}

impl RunStats {
    fn record(&mut self, joined: Result<PageOutcome, JoinError>) {
        match joined {
            Ok(PageOutcome::Scraped { links_enqueued, .. }) => {
                self.pages_fetched += 1;
                self.links_enqueued += links_enqueued;
            }
            Ok(PageOutcome::Failed { .. }) => {
                self.pages_failed += 1;
            }
            Err(e) if e.is_cancelled() => {
                self.pages_abandoned += 1;
            }
            Err(e) => {
                tracing::error!("Worker task failed: {}", e);
                self.pages_failed += 1;
            }
        }
    }
}

/// Main crawler coordinator structure
///
/// Owns the crawl session: seed, origin, the shared frontier and the state
/// store. Dropping a coordinator that never reached `Checkpointed` writes
/// the checkpoint from `Drop`.
pub struct Coordinator {
    seed: String,
    origin: String,
    key: String,
    config: CrawlerConfig,
    visited: Arc<VisitedSet>,
    queue: Arc<FrontierQueue>,
    store: Arc<dyn StateStore>,
    fetcher: Arc<dyn PageFetcher>,
    reporter: Arc<dyn CrawlReporter>,
    force_stop: CancellationToken,
    phase: CrawlPhase,
    checkpoint_done: bool,
    checkpoint_saved: bool,
}

impl Coordinator {
    /// Creates a new coordinator and seeds its frontier
    ///
    /// # Arguments
    ///
    /// * `seed` - The absolute URL the crawl starts from
    /// * `config` - Worker count and timeouts
    /// * `store` - Where snapshots are loaded from and saved to
    /// * `fetcher` - Source of page content
    /// * `fresh` - Ignore any saved snapshot and start from the seed
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to `run`, in the `Seeding` phase
    /// * `Err(RippleError::Url)` - The seed URL is malformed
    /// * `Err(RippleError::Config)` - The timeouts or worker count are invalid
    pub fn new(
        seed: &str,
        config: CrawlerConfig,
        store: Arc<dyn StateStore>,
        fetcher: Arc<dyn PageFetcher>,
        fresh: bool,
    ) -> Result<Self, RippleError> {
        validate_crawler_config(&config)?;
        let origin = root_origin(seed)?;
        let key = state_key(seed)?;

        let snapshot = if fresh {
            tracing::info!("Starting fresh crawl of {} (ignoring saved state)", origin);
            None
        } else {
            load_or_none(store.as_ref(), &key)
        };

        let snapshot = match snapshot {
            Some(snapshot) => {
                tracing::info!(
                    "Resuming crawl of {}: {} visited, {} pending",
                    origin,
                    snapshot.visited.len(),
                    snapshot.pending.len()
                );
                snapshot
            }
            None => {
                tracing::info!("Seeding frontier with {}", seed);
                CrawlSnapshot::seeded(seed)
            }
        };

        let (visited, queue) = snapshot.restore();

        Ok(Self {
            seed: seed.to_string(),
            origin,
            key,
            config,
            visited: Arc::new(visited),
            queue: Arc::new(queue),
            store,
            fetcher,
            reporter: Arc::new(SilentReporter),
            force_stop: CancellationToken::new(),
            phase: CrawlPhase::Seeding,
            checkpoint_done: false,
            checkpoint_saved: false,
        })
    }

    /// Sets the reporter that receives progress lines
    pub fn with_reporter(mut self, reporter: Arc<dyn CrawlReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets a token that cuts the shutdown grace period short
    ///
    /// Once it fires while the crawl is draining, pages still in flight are
    /// aborted immediately and the checkpoint is written.
    pub fn with_force_stop(mut self, force_stop: CancellationToken) -> Self {
        self.force_stop = force_stop;
        self
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Key under which the snapshot is stored
    pub fn state_key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn queue(&self) -> &FrontierQueue {
        &self.queue
    }

    /// Runs the crawl until the frontier drains or `cancel` fires
    ///
    /// The loop:
    /// 1. Waits for a URL (up to the idle timeout), a finished worker, or
    ///    cancellation
    /// 2. Claims each dequeued URL; already-claimed URLs are skipped
    /// 3. Dispatches claimed URLs to the worker pool
    /// 4. Stops once the frontier is empty and nothing is in flight
    ///
    /// On interruption no new URL is dispatched; in-flight pages get the
    /// shutdown grace period to finish before they are aborted. Either way
    /// the final checkpoint is written before returning.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<CrawlReport, RippleError> {
        self.transition(CrawlPhase::Running)?;
        let started = Instant::now();
        tracing::info!(
            "Crawling {} with {} workers ({} pending)",
            self.origin,
            self.config.workers,
            self.queue.len()
        );

        let ctx = Arc::new(PageContext {
            origin: self.origin.clone(),
            visited: self.visited.clone(),
            queue: self.queue.clone(),
            fetcher: self.fetcher.clone(),
            reporter: self.reporter.clone(),
        });
        let mut pool = WorkerPool::new(self.config.workers, ctx);
        let mut stats = RunStats::default();
        let queue = self.queue.clone();
        let idle_timeout = self.config.idle_timeout();

        let outcome = loop {
            if queue.is_empty() && pool.is_idle() {
                tracing::info!("Frontier drained, crawl complete");
                break CrawlOutcome::Completed;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::info!("Crawl interrupted, {} pages in flight", pool.in_flight());
                    break CrawlOutcome::Interrupted;
                }

                Some(joined) = pool.join_next(), if !pool.is_idle() => {
                    stats.record(joined);
                }

                next = queue.take_with_timeout(idle_timeout), if pool.has_capacity() => {
                    match next {
                        Some(url) => {
                            if !self.visited.try_claim(&url) {
                                tracing::trace!("Skipping already claimed {}", url);
                                stats.duplicates_skipped += 1;
                                continue;
                            }

                            self.reporter.claimed(&url);
                            if let Err(url) = pool.dispatch(url) {
                                // Capacity was checked before taking; only reachable
                                // if a permit vanished, so keep the URL recoverable
                                tracing::error!("No free worker for claimed {}", url);
                                queue.push(url);
                            }
                        }
                        None if pool.is_idle() => {
                            tracing::info!(
                                "Frontier idle for {:?} with no work in flight, crawl complete",
                                idle_timeout
                            );
                            break CrawlOutcome::Completed;
                        }
                        None => {}
                    }
                }
            }
        };

        self.transition(CrawlPhase::Draining)?;
        self.drain(&mut pool, &mut stats).await;
        drop(pool);

        self.checkpoint();

        let report = CrawlReport {
            outcome,
            pages_fetched: stats.pages_fetched,
            pages_failed: stats.pages_failed,
            pages_abandoned: stats.pages_abandoned,
            links_enqueued: stats.links_enqueued,
            duplicates_skipped: stats.duplicates_skipped,
            visited: self.visited.len(),
            pending: self.queue.len(),
            checkpoint_saved: self.checkpoint_saved,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Crawl {}: {} pages fetched, {} failed in {:?}",
            report.outcome,
            report.pages_fetched,
            report.pages_failed,
            report.elapsed
        );

        Ok(report)
    }

    /// Writes the final snapshot; later calls do nothing
    ///
    /// Persistence failures are logged, never propagated.
    ///
    /// # Returns
    ///
    /// `true` if a snapshot has been saved successfully by this coordinator.
    pub fn checkpoint(&mut self) -> bool {
        if self.checkpoint_done {
            return self.checkpoint_saved;
        }
        self.checkpoint_done = true;

        let snapshot = CrawlSnapshot::capture(&self.visited, &self.queue);
        self.checkpoint_saved = save_logged(self.store.as_ref(), &self.key, &snapshot);

        if self.phase != CrawlPhase::Checkpointed {
            tracing::debug!("{} -> {}", self.phase, CrawlPhase::Checkpointed);
            self.phase = CrawlPhase::Checkpointed;
        }

        self.checkpoint_saved
    }

    /// Waits for in-flight pages, aborting any still running after the grace period
    ///
    /// The force-stop token ends the wait early.
    async fn drain(&self, pool: &mut WorkerPool, stats: &mut RunStats) {
        if pool.is_idle() {
            return;
        }

        let grace = self.config.shutdown_grace();
        let force_stop = self.force_stop.clone();
        tracing::info!(
            "Waiting up to {:?} for {} in-flight pages",
            grace,
            pool.in_flight()
        );

        let deadline = tokio::time::sleep(grace);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;

                _ = force_stop.cancelled() => {
                    tracing::warn!("Forced stop, not waiting for in-flight pages");
                    break;
                }
                joined = pool.join_next() => match joined {
                    Some(joined) => stats.record(joined),
                    None => return,
                },
                _ = &mut deadline => {
                    tracing::warn!("Shutdown grace period of {:?} elapsed", grace);
                    break;
                }
            }
        }

        let abandoned = pool.abort_all().await;
        tracing::warn!("Abandoned {} in-flight pages", abandoned);
        stats.pages_abandoned += abandoned as u64;
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), RippleError> {
        if !self.phase.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("{} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if !self.checkpoint_done {
            tracing::warn!(
                "Coordinator for {} dropped in phase {}, writing checkpoint",
                self.origin,
                self.phase
            );
            self.checkpoint();
        }
    }
}

/// Runs a crawl from `seed` with the given collaborators
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::Config;
/// use ripple_crawl::crawler::{run_crawl, HttpFetcher};
/// use ripple_crawl::storage::JsonStateStore;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
/// let store = JsonStateStore::new(&config.output.state_dir);
/// let report = run_crawl(
///     "https://example.com/",
///     config.crawler.clone(),
///     Arc::new(store),
///     Arc::new(fetcher),
///     CancellationToken::new(),
/// )
/// .await?;
/// println!("{} pages", report.pages_fetched);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    seed: &str,
    config: CrawlerConfig,
    store: Arc<dyn StateStore>,
    fetcher: Arc<dyn PageFetcher>,
    cancel: CancellationToken,
) -> Result<CrawlReport, RippleError> {
    let mut coordinator = Coordinator::new(seed, config, store, fetcher, false)?;
    coordinator.run(cancel).await
}
