//! Output module for crawl progress and results
//!
//! This module handles:
//! - Human-facing progress lines for discovered links and scraped text
//! - The end-of-crawl report and its console rendering

mod report;
mod reporter;

pub use report::{print_report, CrawlOutcome, CrawlReport};
pub use reporter::{ConsoleReporter, CrawlReporter, SilentReporter};
