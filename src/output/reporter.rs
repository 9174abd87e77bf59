/// Receives progress from workers as pages are crawled
///
/// Implementations are shared across workers and must tolerate concurrent
/// calls. Output is informational only.
pub trait CrawlReporter: Send + Sync {
    /// A URL was claimed and handed to a worker
    fn claimed(&self, url: &str);

    /// A link passed the filter and was added to the frontier
    fn discovered(&self, url: &str);

    /// Text was extracted from a fetched page
    fn scraped(&self, url: &str, text: &str);
}

/// Prints progress lines to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl CrawlReporter for ConsoleReporter {
    fn claimed(&self, url: &str) {
        println!("Scraping URL: {}", url);
    }

    fn discovered(&self, url: &str) {
        println!("Discovered link: {}", url);
    }

    fn scraped(&self, url: &str, text: &str) {
        // One println keeps a page's text contiguous when workers interleave
        println!("\n<--- Text present in {} --->\n{}", url, text);
    }
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl CrawlReporter for SilentReporter {
    fn claimed(&self, _url: &str) {}

    fn discovered(&self, _url: &str) {}

    fn scraped(&self, _url: &str, _text: &str) {}
}
