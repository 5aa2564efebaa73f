use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an anchor's href against the page it was found on
///
/// Standard URI reference resolution is applied; no further canonicalization
/// (case folding, trailing slashes, fragments) takes place, so the resolved
/// string is the URL's identity for the rest of the run.
///
/// Returns None when the link should be dropped:
/// - the anchor had no href attribute
/// - the href cannot be resolved to a valid URL
/// - the resolved URL is not HTTP(S) (`mailto:`, `javascript:`, ...)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use tinytrip::url::resolve;
///
/// let base = Url::parse("https://example.com/docs/index.html").unwrap();
/// let url = resolve(&base, Some("../about.html")).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about.html");
///
/// assert!(resolve(&base, None).is_none());
/// ```
pub fn resolve(base: &Url, href: Option<&str>) -> Option<Url> {
    let resolved = base.join(href?).ok()?;

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Parses the seed URL given on the command line
///
/// The seed must be an absolute HTTP(S) URL.
pub fn parse_seed(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(format!("{url_str}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}
