//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Mapping transport errors and non-200 statuses to `FetchError`
//!
//! Failed fetches are never retried.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Raw result of a fetch: status plus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,

    /// Page body; empty unless the status was 200
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the page should be processed
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Source of page content
///
/// The crawler only ever needs `fetch`; tests substitute in-memory sites.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, returning any HTTP response as `Ok`
    ///
    /// `Err` is reserved for transport failures (DNS, connect, timeout, body
    /// read).
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Fetches `url` and returns its body only for status 200
///
/// Every other status becomes `FetchError::Status`, so callers can treat
/// non-200 responses and transport errors the same way.
pub async fn fetch_html(fetcher: &dyn PageFetcher, url: &str) -> Result<String, FetchError> {
    let page = fetcher.fetch(url).await?;
    if !page.is_ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: page.status,
        });
    }
    Ok(page.body)
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Supplies the connect and read timeouts
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::Config;
/// use ripple_crawl::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .connect_timeout(crawler.connect_timeout())
        .timeout(crawler.read_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent, crawler)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!("{} returned {}", url, status);
            return Ok(FetchedPage {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}
