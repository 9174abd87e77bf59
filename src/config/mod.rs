//! Configuration module for Ripple-Crawl
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so the crawler also runs
//! without one.
//!
//! # Example
//!
//! ```no_run
//! use ripple_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! println!("Idle timeout: {:?}", config.crawler.idle_timeout());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::{validate, validate_crawler_config, validate_workers, MAX_WORKERS};
