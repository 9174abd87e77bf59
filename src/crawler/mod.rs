//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with connect and read timeouts
//! - HTML parsing, link filtering and paragraph text extraction
//! - A fixed-size worker pool for concurrent page processing
//! - Overall crawl coordination, interruption and checkpointing

mod coordinator;
mod fetcher;
mod parser;
mod pool;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_html, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{extract_links, extract_text, parse_page, ParsedPage};
pub use pool::{process_page, PageContext, PageOutcome, WorkerPool};

use crate::config::Config;
use crate::output::{CrawlReport, CrawlReporter};
use crate::storage::JsonStateStore;
use crate::RippleError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl over HTTP with file-backed state
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Open the state directory and load any saved snapshot for the seed's site
/// 3. Crawl until the frontier drains or `cancel` fires
/// 4. Write the final checkpoint
///
/// # Arguments
///
/// * `seed` - The absolute URL to start from
/// * `config` - The crawler configuration
/// * `fresh` - Ignore saved state and start from the seed
/// * `reporter` - Receives progress lines
/// * `cancel` - Fires to interrupt the crawl
/// * `force_stop` - Fires to abort in-flight pages without waiting out the grace period
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished or was interrupted and checkpointed
/// * `Err(RippleError)` - The seed was malformed or the client could not be built
pub async fn crawl(
    seed: &str,
    config: &Config,
    fresh: bool,
    reporter: Arc<dyn CrawlReporter>,
    cancel: CancellationToken,
    force_stop: CancellationToken,
) -> Result<CrawlReport, RippleError> {
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
    let store = JsonStateStore::new(&config.output.state_dir);

    let mut coordinator = Coordinator::new(
        seed,
        config.crawler.clone(),
        Arc::new(store),
        Arc::new(fetcher),
        fresh,
    )?
    .with_reporter(reporter)
    .with_force_stop(force_stop);

    coordinator.run(cancel).await
}
