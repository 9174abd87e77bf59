/// Decides whether a discovered href belongs to the crawl and returns its identity
///
/// # Filter Rules
///
/// **Accepted** (only when the origin itself is `https`):
/// - `https://...` hrefs that start with the origin, followed by the end of
///   the string, `/`, `?` or `#`
/// - Root-relative paths (`/about`), resolved by prefixing the origin
///
/// **Rejected:**
/// - Protocol-relative hrefs (`//host/path`)
/// - Other hosts, other schemes, `http://` links
/// - Document-relative paths (`page.html`, `../x`), fragments, `mailto:` etc.
///
/// The resolved string is used verbatim as the URL identity.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::resolve_candidate;
///
/// let origin = "https://site.com";
/// assert_eq!(resolve_candidate("/b", origin), Some("https://site.com/b".to_string()));
/// assert_eq!(resolve_candidate("https://other.com/c", origin), None);
/// ```
pub fn resolve_candidate(href: &str, origin: &str) -> Option<String> {
    if !origin.starts_with("https://") {
        return None;
    }

    let href = href.trim();

    if href.starts_with("//") {
        return None;
    }

    if href.starts_with('/') {
        return Some(format!("{}{}", origin, href));
    }

    if !href.starts_with("https://") {
        return None;
    }

    let rest = href.strip_prefix(origin)?;
    match rest.chars().next() {
        None | Some('/') | Some('?') | Some('#') => Some(href.to_string()),
        _ => None,
    }
}
