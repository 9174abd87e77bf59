//! Integration tests for the crawler
//!
//! These tests drive the coordinator end-to-end against an in-memory site
//! and a state directory in a temp dir.

use async_trait::async_trait;
use ripple_crawl::config::CrawlerConfig;
use ripple_crawl::crawler::{Coordinator, FetchedPage, PageFetcher};
use ripple_crawl::output::{CrawlOutcome, CrawlReporter};
use ripple_crawl::state::{CrawlPhase, CrawlSnapshot};
use ripple_crawl::storage::{JsonStateStore, StateStore};
use ripple_crawl::FetchError;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const SEED: &str = "https://site.com/";
const KEY: &str = "site";

/// In-memory site that counts every fetch
struct TestSite {
    pages: HashMap<String, String>,
    hits: Mutex<HashMap<String, usize>>,
    delay: Duration,
    cancel_after: Option<(String, CancellationToken)>,
}

impl TestSite {
    fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.clone()))
                .collect(),
            hits: Mutex::new(HashMap::new()),
            delay: Duration::from_millis(5),
            cancel_after: None,
        }
    }

    /// Fires `token` while `url` is being fetched
    fn cancel_on(mut self, url: &str, token: CancellationToken) -> Self {
        self.cancel_after = Some((url.to_string(), token));
        self
    }

    fn total_fetches(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    fn max_fetches_per_url(&self) -> usize {
        self.hits.lock().unwrap().values().copied().max().unwrap_or(0)
    }

    fn fetched(&self) -> BTreeSet<String> {
        self.hits.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl PageFetcher for TestSite {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;

        if let Some((trigger, token)) = &self.cancel_after {
            if trigger == url {
                token.cancel();
            }
        }

        tokio::time::sleep(self.delay).await;

        Ok(match self.pages.get(url) {
            Some(body) => FetchedPage {
                status: 200,
                body: body.clone(),
            },
            None => FetchedPage {
                status: 404,
                body: String::new(),
            },
        })
    }
}

#[derive(Default)]
struct TextLog {
    scraped: Mutex<Vec<(String, String)>>,
}

impl CrawlReporter for TextLog {
    fn claimed(&self, _url: &str) {}

    fn discovered(&self, _url: &str) {}

    fn scraped(&self, url: &str, text: &str) {
        self.scraped
            .lock()
            .unwrap()
            .push((url.to_string(), text.to_string()));
    }
}

fn test_config(workers: usize) -> CrawlerConfig {
    CrawlerConfig {
        workers,
        idle_timeout_secs: 2,
        connect_timeout_secs: 1,
        read_timeout_secs: 1,
        shutdown_grace_secs: 5,
    }
}

fn page(text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body><p>{}</p>{}</body></html>", text, anchors)
}

/// A -> B -> C, each page linking only to the next
fn linear_chain() -> Vec<(&'static str, String)> {
    vec![
        ("https://site.com/", page("Page A", &["/b"])),
        ("https://site.com/b", page("Page B", &["/c"])),
        ("https://site.com/c", page("Page C", &[])),
    ]
}

fn urls(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn coordinator(dir: &TempDir, site: Arc<TestSite>, workers: usize) -> Coordinator {
    Coordinator::new(
        SEED,
        test_config(workers),
        Arc::new(JsonStateStore::new(dir.path())),
        site,
        false,
    )
    .unwrap()
}

#[tokio::test]
async fn test_linear_chain_single_worker() {
    let dir = TempDir::new().unwrap();
    let site = Arc::new(TestSite::new(&linear_chain()));
    let log = Arc::new(TextLog::default());

    let mut crawler = coordinator(&dir, site.clone(), 1).with_reporter(log.clone());
    let report = tokio::time::timeout(Duration::from_secs(5), crawler.run(CancellationToken::new()))
        .await
        .expect("crawl should finish well before the idle timeout")
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert!(report.is_complete());
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.links_enqueued, 2);
    assert_eq!(site.total_fetches(), 3);
    assert_eq!(crawler.phase(), CrawlPhase::Checkpointed);

    let scraped = log.scraped.lock().unwrap();
    let order: Vec<&str> = scraped.iter().map(|(url, _)| url.as_str()).collect();
    assert_eq!(
        order,
        vec!["https://site.com/", "https://site.com/b", "https://site.com/c"]
    );
    assert_eq!(scraped[1].1, "Page B\n");

    let saved = JsonStateStore::new(dir.path()).load(KEY).unwrap().unwrap();
    assert_eq!(
        saved.visited,
        urls(&["https://site.com/", "https://site.com/b", "https://site.com/c"])
    );
    assert!(saved.pending.is_empty());
}

#[tokio::test]
async fn test_state_file_format() {
    let dir = TempDir::new().unwrap();
    let site = Arc::new(TestSite::new(&linear_chain()));

    coordinator(&dir, site, 1)
        .run(CancellationToken::new())
        .await
        .unwrap();

    let path = JsonStateStore::new(dir.path()).path_for(KEY);
    assert!(path.ends_with("site_crawler_state.json"));

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["scrapedPages"].as_array().unwrap().len(), 3);
    assert_eq!(json["queue"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_resume_of_completed_crawl_fetches_nothing() {
    let dir = TempDir::new().unwrap();

    let first = Arc::new(TestSite::new(&linear_chain()));
    coordinator(&dir, first.clone(), 2)
        .run(CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(first.total_fetches(), 3);

    let second = Arc::new(TestSite::new(&linear_chain()));
    let report = coordinator(&dir, second.clone(), 2)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.visited, 3);
    assert_eq!(second.total_fetches(), 0);
}

#[tokio::test]
async fn test_interrupt_then_resume_visits_everything_once() {
    let dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();

    let first = Arc::new(TestSite::new(&linear_chain()).cancel_on(SEED, cancel.clone()));
    let report = coordinator(&dir, first.clone(), 1)
        .run(cancel)
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Interrupted);
    assert!(report.checkpoint_saved);
    // The in-flight seed page finished during the grace period
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(first.fetched(), urls(&["https://site.com/"]));

    let saved = JsonStateStore::new(dir.path()).load(KEY).unwrap().unwrap();
    assert_eq!(saved.visited, urls(&["https://site.com/"]));
    assert_eq!(saved.pending, vec!["https://site.com/b".to_string()]);

    let second = Arc::new(TestSite::new(&linear_chain()));
    let report = coordinator(&dir, second.clone(), 1)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(
        second.fetched(),
        urls(&["https://site.com/b", "https://site.com/c"])
    );

    let saved = JsonStateStore::new(dir.path()).load(KEY).unwrap().unwrap();
    assert_eq!(
        saved.visited,
        urls(&["https://site.com/", "https://site.com/b", "https://site.com/c"])
    );
    assert!(saved.is_drained());
}

#[tokio::test]
async fn test_failed_fetch_is_claimed_but_not_retried() {
    let dir = TempDir::new().unwrap();
    let site = Arc::new(TestSite::new(&[
        ("https://site.com/", page("Home", &["/missing", "/ok"])),
        ("https://site.com/ok", page("Fine", &["/missing"])),
    ]));

    let report = coordinator(&dir, site.clone(), 2)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(site.max_fetches_per_url(), 1);

    let saved = JsonStateStore::new(dir.path()).load(KEY).unwrap().unwrap();
    assert!(saved.visited.contains("https://site.com/missing"));
}

#[tokio::test]
async fn test_corrupt_state_restarts_from_seed() {
    let dir = TempDir::new().unwrap();
    let store = JsonStateStore::new(dir.path());
    std::fs::write(store.path_for(KEY), "{ not json").unwrap();

    let site = Arc::new(TestSite::new(&linear_chain()));
    let report = coordinator(&dir, site.clone(), 1)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_fetched, 3);
    assert!(report.checkpoint_saved);

    // The corrupt file was replaced by a valid snapshot
    let saved = store.load(KEY).unwrap().unwrap();
    assert_eq!(saved.visited.len(), 3);
}

#[tokio::test]
async fn test_many_workers_fetch_each_page_once() {
    let dir = TempDir::new().unwrap();

    // Every page links to every other page
    let paths: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();
    let hrefs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let mut pages = vec![("https://site.com/".to_string(), page("Hub", &hrefs))];
    for path in &paths {
        pages.push((format!("https://site.com{}", path), page(path, &hrefs)));
    }
    let pages: Vec<(&str, String)> = pages
        .iter()
        .map(|(url, body)| (url.as_str(), body.clone()))
        .collect();

    let site = Arc::new(TestSite::new(&pages));
    let report = coordinator(&dir, site.clone(), 8)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.pages_fetched, 21);
    assert_eq!(site.total_fetches(), 21);
    assert_eq!(site.max_fetches_per_url(), 1);
    assert_eq!(report.visited, 21);
}

#[tokio::test]
async fn test_only_in_origin_links_are_followed() {
    let dir = TempDir::new().unwrap();
    let site = Arc::new(TestSite::new(&[
        (
            "https://site.com/",
            page("Home", &["https://site.com/a", "/b", "https://other.com/c"]),
        ),
        ("https://site.com/a", page("A", &[])),
        ("https://site.com/b", page("B", &[])),
    ]));

    let report = coordinator(&dir, site.clone(), 3)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(
        site.fetched(),
        urls(&["https://site.com/", "https://site.com/a", "https://site.com/b"])
    );
}

#[tokio::test]
async fn test_mixed_case_seed_follows_its_own_links() {
    let dir = TempDir::new().unwrap();
    let site = Arc::new(TestSite::new(&[
        ("https://Site.com/", page("Home", &["https://Site.com/b", "/c"])),
        ("https://Site.com/b", page("B", &[])),
        ("https://Site.com/c", page("C", &[])),
    ]));

    let mut crawler = Coordinator::new(
        "https://Site.com/",
        test_config(2),
        Arc::new(JsonStateStore::new(dir.path())),
        site.clone(),
        false,
    )
    .unwrap();
    assert_eq!(crawler.origin(), "https://Site.com");

    let report = crawler.run(CancellationToken::new()).await.unwrap();

    assert_eq!(report.pages_fetched, 3);
    assert_eq!(
        site.fetched(),
        urls(&["https://Site.com/", "https://Site.com/b", "https://Site.com/c"])
    );
}

#[tokio::test]
async fn test_saved_pending_urls_are_resumed() {
    let dir = TempDir::new().unwrap();
    let store = JsonStateStore::new(dir.path());
    store
        .save(
            KEY,
            &CrawlSnapshot {
                visited: urls(&["https://site.com/", "https://site.com/b"]),
                pending: vec!["https://site.com/c".to_string()],
            },
        )
        .unwrap();

    let site = Arc::new(TestSite::new(&linear_chain()));
    let report = coordinator(&dir, site.clone(), 2)
        .run(CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(site.fetched(), urls(&["https://site.com/c"]));
    assert_eq!(report.visited, 3);
}
