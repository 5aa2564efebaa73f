//! HTML parser for extracting anchors and the serialized document
//!
//! This module handles parsing fetched content to extract:
//! - The href of every `<a>` tag (absent attributes included, as `None`)
//! - The re-serialized document that gets persisted

use scraper::{Html, Selector};
use thiserror::Error;

/// Reasons a fetched body cannot be treated as an HTML page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty document")]
    EmptyDocument,

    #[error("unexpected content type: {0}")]
    UnexpectedContentType(String),
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// One entry per `<a>` element, in document order; raw and unresolved
    pub hrefs: Vec<Option<String>>,

    /// The parsed document serialized back to HTML
    pub document: String,
}

/// Parses fetched content and extracts its anchors
///
/// Relative hrefs are returned as written; resolution happens in the crawl
/// engine against the page's final URL.
///
/// # Arguments
///
/// * `body` - The fetched content
/// * `content_type` - The Content-Type header, if the server sent one
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(ParseError)` - Content is empty or not HTML
///
/// # Example
///
/// ```
/// use tinytrip::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page.html">Link</a><a>No target</a></body></html>"#;
/// let parsed = parse_page(html, Some("text/html")).unwrap();
/// assert_eq!(parsed.hrefs, vec![Some("/page.html".to_string()), None]);
/// ```
pub fn parse_page(body: &str, content_type: Option<&str>) -> Result<ParsedPage, ParseError> {
    if let Some(content_type) = content_type {
        if !is_html_content_type(content_type) {
            return Err(ParseError::UnexpectedContentType(content_type.to_string()));
        }
    }

    if body.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }

    let document = Html::parse_document(body);

    Ok(ParsedPage {
        hrefs: extract_hrefs(&document),
        document: document.html(),
    })
}

/// Accepts `text/html` and `application/xhtml+xml`, with or without parameters
fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Collects the href attribute of every anchor
fn extract_hrefs(document: &Html) -> Vec<Option<String>> {
    let Ok(a_selector) = Selector::parse("a") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .map(|element| element.value().attr("href").map(|href| href.to_string()))
        .collect()
}
