//! HTML parser for extracting links and text
//!
//! This module handles parsing HTML content to extract:
//! - Same-site links to follow (from `<a href>` tags)
//! - Paragraph text to report

use crate::url::resolve_candidate;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// In-origin links found on the page (absolute, de-duplicated)
    pub links: BTreeSet<String>,

    /// Paragraph text, one block per line
    pub text: String,
}

/// Parses HTML content once and extracts both links and text
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `origin` - The crawl's root origin, used to filter and resolve links
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::parse_page;
///
/// let html = r#"<p>Intro</p><a href="/next">Next</a>"#;
/// let parsed = parse_page(html, "https://site.com");
/// assert!(parsed.links.contains("https://site.com/next"));
/// assert_eq!(parsed.text, "Intro\n");
/// ```
pub fn parse_page(html: &str, origin: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: collect_links(&document, origin),
        text: collect_text(&document),
    }
}

/// Extracts the in-origin links from an HTML document
///
/// Every `<a href>` is passed through the link-discovery filter; what
/// survives is returned in absolute form.
pub fn extract_links(html: &str, origin: &str) -> BTreeSet<String> {
    collect_links(&Html::parse_document(html), origin)
}

/// Extracts paragraph text from an HTML document
///
/// Each `<p>` contributes its whitespace-collapsed text followed by a newline,
/// in document order. Paragraphs containing a URL are skipped; both `https:`
/// and plain `http:` count, so a paragraph quoting an insecure link is dropped
/// as well.
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::extract_text;
///
/// assert_eq!(extract_text("<p>Hello</p><p>See https://x.com</p>"), "Hello\n");
/// ```
pub fn extract_text(html: &str) -> String {
    collect_text(&Html::parse_document(html))
}

fn collect_links(document: &Html, origin: &str) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_candidate(href, origin) {
                    links.insert(url);
                }
            }
        }
    }

    links
}

fn collect_text(document: &Html) -> String {
    let mut text = String::new();

    if let Ok(p_selector) = Selector::parse("p") {
        for element in document.select(&p_selector) {
            let raw = element.text().collect::<String>();
            let block = raw.split_whitespace().collect::<Vec<_>>().join(" ");

            if contains_url(&block) {
                continue;
            }

            text.push_str(&block);
            text.push('\n');
        }
    }

    text
}

fn contains_url(block: &str) -> bool {
    block.contains("https:") || block.contains("http:")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://site.com";

    #[test]
    fn test_links_filtered_to_origin() {
        let html = r#"
            <html><body>
                <a href="https://site.com/a">A</a>
                <a href="/b">B</a>
                <a href="https://other.com/c">C</a>
            </body></html>
        "#;

        let links = extract_links(html, ORIGIN);
        let expected: BTreeSet<String> = ["https://site.com/a", "https://site.com/b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn test_links_deduplicated() {
        let html = r#"<a href="/a">1</a><a href="/a">2</a><a href="https://site.com/a">3</a>"#;
        let links = extract_links(html, ORIGIN);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_links_exclude_protocol_relative_and_relative() {
        let html = r#"
            <a href="//site.com/x">x</a>
            <a href="page.html">p</a>
            <a href="mailto:me@site.com">m</a>
            <a href="http://site.com/insecure">i</a>
        "#;
        assert!(extract_links(html, ORIGIN).is_empty());
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="top">Top</a><a href="/ok">ok</a>"#;
        let links = extract_links(html, ORIGIN);
        assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://site.com/ok"]);
    }

    #[test]
    fn test_text_skips_url_paragraphs() {
        assert_eq!(
            extract_text("<p>Hello</p><p>See https://x.com</p>"),
            "Hello\n"
        );
    }

    #[test]
    fn test_text_one_block_per_line_in_order() {
        let html = "<div><p>First</p></div><p>Second</p><p>Third</p>";
        assert_eq!(extract_text(html), "First\nSecond\nThird\n");
    }

    #[test]
    fn test_text_trims_and_collapses_whitespace() {
        let html = "<p>\n   Hello   <b>bold</b>\n world  </p>";
        assert_eq!(extract_text(html), "Hello bold world\n");
    }

    #[test]
    fn test_text_ignores_non_paragraph_content() {
        let html = "<h1>Title</h1><div>Loose</div><p>Body</p>";
        assert_eq!(extract_text(html), "Body\n");
    }

    #[test]
    fn test_text_skips_plain_http_urls() {
        assert_eq!(extract_text("<p>old http://x.com</p><p>ok</p>"), "ok\n");
    }

    #[test]
    fn test_link_href_does_not_hide_paragraph() {
        // Only visible text is checked, not attribute values
        let html = r#"<p>Read <a href="https://site.com/more">more</a></p>"#;
        assert_eq!(extract_text(html), "Read more\n");
    }

    #[test]
    fn test_parse_page_combines_both() {
        let html = r#"<p>Intro</p><a href="/next">Next</a>"#;
        let parsed = parse_page(html, ORIGIN);

        assert!(parsed.links.contains("https://site.com/next"));
        assert_eq!(parsed.text, "Intro\n");
    }

    #[test]
    fn test_empty_document() {
        let parsed = parse_page("", ORIGIN);
        assert_eq!(parsed, ParsedPage::default());
    }
}
