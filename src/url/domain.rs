use crate::url::CanonicalUrl;

/// Extracts the host of a canonical URL, used to group pages by site
///
/// The URL parser already lowercases hosts, so the result can be used
/// directly as a grouping key.
///
/// # Examples
///
/// ```
/// use sitegraph::url::{extract_domain, CanonicalUrl};
///
/// let url = CanonicalUrl::parse("https://Sub.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &CanonicalUrl) -> Option<String> {
    url.as_url().host_str().map(|h| h.to_string())
}
