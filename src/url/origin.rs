use crate::{UrlError, UrlResult};
use url::Url;

/// Returns the `scheme://authority` origin of an absolute URL
///
/// The input must contain an authority (`scheme://host...`); anything with
/// fewer than two `/`-delimited segments after the scheme is rejected.
///
/// The origin is cut from the input text as written, so host case and any
/// explicit port survive. Discovered links are matched against it verbatim.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::root_origin;
///
/// assert_eq!(root_origin("https://site.com/a/b").unwrap(), "https://site.com");
/// assert_eq!(root_origin("https://site.com:8443/").unwrap(), "https://site.com:8443");
/// assert_eq!(root_origin("https://Site.com/").unwrap(), "https://Site.com");
/// assert!(root_origin("site.com/a").is_err());
/// ```
pub fn root_origin(url: &str) -> UrlResult<String> {
    let parsed = parse_absolute(url)?;
    if parsed.host_str().is_none() {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| UrlError::Malformed(url.to_string()))?;
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());

    Ok(format!("{}://{}", scheme, &rest[..authority_end]))
}

/// Derives a filesystem-safe key for the snapshot file from the seed URL
///
/// The host's top-level label is dropped and the remaining labels are joined
/// with `_`, so `https://docs.example.com/` becomes `docs_example`. A host
/// with a single label is used whole.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::state_key;
///
/// assert_eq!(state_key("https://abc.com/").unwrap(), "abc");
/// assert_eq!(state_key("https://docs.example.com/x").unwrap(), "docs_example");
/// ```
pub fn state_key(url: &str) -> UrlResult<String> {
    let parsed = parse_absolute(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let key = match labels.len() {
        0 => return Err(UrlError::MissingHost(url.to_string())),
        1 => labels[0].to_string(),
        n => labels[..n - 1].join("_"),
    };

    Ok(key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect())
}

/// Parses a URL that must spell out its authority (`scheme://`)
///
/// `Url::parse` accepts `https:/host` and similar shapes; the crawl origin is
/// matched textually against discovered links, so those are refused here.
fn parse_absolute(url: &str) -> UrlResult<Url> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| UrlError::Malformed(url.to_string()))?;

    if scheme.is_empty() || rest.is_empty() || rest.starts_with('/') {
        return Err(UrlError::Malformed(url.to_string()));
    }

    Url::parse(url).map_err(|e| UrlError::Malformed(format!("{}: {}", url, e)))
}
