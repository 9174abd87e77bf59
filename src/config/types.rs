use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Ripple-Crawl
///
/// Every section and key is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of pages fetched in parallel
    pub workers: usize,

    /// How long the dispatch loop waits on an empty frontier (seconds)
    #[serde(rename = "idle-timeout-secs")]
    pub idle_timeout_secs: u64,

    /// TCP connect timeout per fetch (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Overall read timeout per fetch (seconds)
    #[serde(rename = "read-timeout-secs")]
    pub read_timeout_secs: u64,

    /// How long an interrupted crawl waits for in-flight pages (seconds)
    #[serde(rename = "shutdown-grace-secs")]
    pub shutdown_grace_secs: u64,
}

impl CrawlerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            idle_timeout_secs: 60,
            connect_timeout_secs: 3,
            read_timeout_secs: 30,
            shutdown_grace_secs: 35,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding `<key>_crawler_state.json` files
    #[serde(rename = "state-dir")]
    pub state_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            state_dir: ".".to_string(),
        }
    }
}
