//! HTML parsing and link extraction
//!
//! Turns a fetched body into a DOM and collects the distinct, valid,
//! canonical targets of every `<a href>` in it.

use crate::url::{canonicalize, CanonicalUrl};
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Errors produced while turning a body into a DOM
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("body of {url} is binary data, not a text document")]
    Binary { url: String },
}

/// Parses a fetched body into an HTML document
///
/// The HTML parser itself is error-tolerant and accepts any text. The only
/// hard failure is a body containing NUL characters, which no text document
/// served as HTML carries.
///
/// # Arguments
///
/// * `body` - The response body, already decoded from its charset
/// * `url` - URL the body was fetched from, used in the error
pub fn parse_html(body: &str, url: &Url) -> Result<Html, ParseError> {
    if body.contains('\0') {
        return Err(ParseError::Binary {
            url: url.to_string(),
        });
    }

    Ok(Html::parse_document(body))
}

/// Yields the raw `href` of every anchor element anywhere in the document, in
/// document order
pub fn anchors(document: &Html) -> impl Iterator<Item = &str> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a")
        .filter_map(|element| element.value().attr("href"))
}

/// Extracts the distinct canonical URLs linked from a document
///
/// Each href is resolved against `base`, normalized and scheme-checked.
/// Hrefs that fail any step are dropped silently. The result keeps first-seen
/// document order.
///
/// # Example
///
/// ```
/// use sitegraph::crawler::{extract_links, parse_html};
/// use url::Url;
///
/// let base = Url::parse("http://a.test/").unwrap();
/// let body = r#"<a href="/x">x</a><a href="/x/#top">again</a><a href="mailto:me@a.test">mail</a>"#;
/// let document = parse_html(body, &base).unwrap();
///
/// let links = extract_links(&document, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "http://a.test/x");
/// ```
pub fn extract_links(document: &Html, base: &Url) -> Vec<CanonicalUrl> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in anchors(document) {
        if let Some(url) = canonicalize(base, href) {
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    if links.is_empty() {
        tracing::debug!("No followable links on {}", base);
    }

    links
}
