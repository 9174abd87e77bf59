//! End-of-crawl statistics
//!
//! This module provides the summary returned by a crawl run and a console
//! rendering of it.

use std::fmt;
use std::time::Duration;

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The frontier drained with no work in flight
    Completed,

    /// The cancellation token fired before the frontier drained
    Interrupted,
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Crawl run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// How the run ended
    pub outcome: CrawlOutcome,

    /// Pages fetched with status 200 and processed
    pub pages_fetched: u64,

    /// Pages dropped after a fetch failure or non-200 status
    pub pages_failed: u64,

    /// Pages whose worker was aborted at the end of the shutdown grace period
    pub pages_abandoned: u64,

    /// Links added to the frontier this run
    pub links_enqueued: u64,

    /// Dequeued URLs skipped because they were already claimed
    pub duplicates_skipped: u64,

    /// Size of the visited set at checkpoint time
    pub visited: usize,

    /// URLs left in the frontier at checkpoint time
    pub pending: usize,

    /// Whether the final snapshot reached durable storage
    pub checkpoint_saved: bool,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Returns true if the run finished with nothing left to crawl
    pub fn is_complete(&self) -> bool {
        self.outcome == CrawlOutcome::Completed && self.pending == 0
    }

    /// Pages processed per second over the run
    pub fn pages_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_fetched as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Outcome: {}", report.outcome);
    println!("  Pages fetched: {}", report.pages_fetched);
    println!("  Pages failed: {}", report.pages_failed);
    if report.pages_abandoned > 0 {
        println!("  Pages abandoned: {}", report.pages_abandoned);
    }
    println!("  Links enqueued: {}", report.links_enqueued);
    println!("  Duplicate claims skipped: {}", report.duplicates_skipped);
    println!();

    println!("Frontier:");
    println!("  Visited: {}", report.visited);
    println!("  Pending: {}", report.pending);
    println!(
        "  Checkpoint: {}",
        if report.checkpoint_saved {
            "saved"
        } else {
            "NOT saved"
        }
    );
    println!();

    println!(
        "Elapsed: {:.1}s ({:.2} pages/sec)",
        report.elapsed.as_secs_f64(),
        report.pages_per_sec()
    );
}
