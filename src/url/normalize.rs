use crate::url::CanonicalUrl;
use url::Url;

/// Resolves an href against the URL of the page it was found on
///
/// Handles already-absolute, protocol-relative (`//host/path`) and
/// path-relative hrefs. The result is absolute but not yet normalized or
/// scheme-checked; `javascript:void(0)` resolves fine and is rejected later
/// by [`is_valid`].
///
/// # Returns
///
/// * `Some(Url)` - The absolute URL
/// * `None` - The href is empty or cannot be resolved
///
/// # Examples
///
/// ```
/// use sitegraph::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("http://a.test/dir/page").unwrap();
/// assert_eq!(resolve(&base, "other").unwrap().as_str(), "http://a.test/dir/other");
/// assert_eq!(resolve(&base, "//b.test/y").unwrap().as_str(), "http://b.test/y");
/// ```
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base.join(href).ok()
}

/// Normalizes an absolute URL into its canonical form
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Remove query string
/// 3. Remove trailing slashes from the path, keeping the root `/`
///
/// Host lowercasing, default-port removal and dot-segment removal already
/// happen when the URL is parsed.
///
/// Idempotent: `normalize(&normalize(u)) == normalize(u)`.
///
/// # Examples
///
/// ```
/// use sitegraph::url::normalize;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/page/?q=1#top").unwrap();
/// assert_eq!(normalize(&url).as_str(), "https://example.com/page");
/// ```
pub fn normalize(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url.set_query(None);

    if !url.cannot_be_a_base() {
        let trimmed = url.path().trim_end_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        url.set_path(&path);
    }

    url
}

/// Returns true only for `http` and `https` URLs
pub fn is_valid(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Resolves, validates and normalizes an href in one step
///
/// This is the full rule set applied to every extracted link. Any failure
/// simply yields `None`; a bad link is never fatal to the caller.
pub fn canonicalize(base: &Url, href: &str) -> Option<CanonicalUrl> {
    resolve(base, href).and_then(|url| CanonicalUrl::from_url(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://a.test/dir/page.html").unwrap()
    }

    #[test]
    fn test_resolve_absolute() {
        let result = resolve(&base(), "https://other.test/x").unwrap();
        assert_eq!(result.as_str(), "https://other.test/x");
    }

    #[test]
    fn test_resolve_root_relative() {
        let result = resolve(&base(), "/x").unwrap();
        assert_eq!(result.as_str(), "http://a.test/x");
    }

    #[test]
    fn test_resolve_path_relative() {
        let result = resolve(&base(), "sibling.html").unwrap();
        assert_eq!(result.as_str(), "http://a.test/dir/sibling.html");
    }

    #[test]
    fn test_resolve_parent_relative() {
        let result = resolve(&base(), "../up").unwrap();
        assert_eq!(result.as_str(), "http://a.test/up");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        let result = resolve(&base(), "//b.test/y").unwrap();
        assert_eq!(result.as_str(), "http://b.test/y");
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        let result = resolve(&base(), "  /x \n").unwrap();
        assert_eq!(result.as_str(), "http://a.test/x");
    }

    #[test]
    fn test_resolve_empty_href() {
        assert!(resolve(&base(), "").is_none());
        assert!(resolve(&base(), "   ").is_none());
    }

    #[test]
    fn test_resolve_malformed() {
        assert!(resolve(&base(), "http://[::1").is_none());
        assert!(resolve(&base(), "http://").is_none());
    }

    #[test]
    fn test_normalize_strips_fragment() {
        let url = Url::parse("https://example.com/page#section").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/page");
    }

    #[test]
    fn test_normalize_strips_query() {
        let url = Url::parse("https://example.com/page?b=2&a=1").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/page");
    }

    #[test]
    fn test_normalize_trailing_slash() {
        let url = Url::parse("https://example.com/page/").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/page");
    }

    #[test]
    fn test_normalize_keeps_root_slash() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/");

        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/");
    }

    #[test]
    fn test_normalize_repeated_trailing_slashes() {
        let url = Url::parse("https://example.com/a//").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/a");

        let url = Url::parse("https://example.com///").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/");
    }

    #[test]
    fn test_normalize_lowercases_host() {
        let url = Url::parse("HTTP://EXAMPLE.COM/Page").unwrap();
        assert_eq!(normalize(&url).as_str(), "http://example.com/Page");
    }

    #[test]
    fn test_normalize_drops_default_port() {
        let url = Url::parse("https://example.com:443/a").unwrap();
        assert_eq!(normalize(&url).as_str(), "https://example.com/a");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "https://example.com/",
            "https://example.com/a/b/",
            "https://example.com/a//?x=1#frag",
            "http://example.com:8080/path/to/page.html?q#",
            "https://example.com/%7Euser/",
            "mailto:someone@example.com",
            "javascript:void(0)",
        ];

        for input in inputs {
            let url = Url::parse(input).unwrap();
            let once = normalize(&url);
            let twice = normalize(&once);
            assert_eq!(once, twice, "normalize is not idempotent for {}", input);
        }
    }

    #[test]
    fn test_is_valid_schemes() {
        for ok in ["http://a.test/", "https://a.test/x"] {
            assert!(is_valid(&Url::parse(ok).unwrap()), "{} should be valid", ok);
        }

        for bad in [
            "mailto:test@example.com",
            "javascript:void(0)",
            "ftp://example.com/file",
            "tel:+1234567890",
            "data:text/html,hi",
        ] {
            assert!(!is_valid(&Url::parse(bad).unwrap()), "{} should be invalid", bad);
        }
    }

    #[test]
    fn test_canonicalize_rejects_javascript() {
        assert!(canonicalize(&base(), "javascript:void(0)").is_none());
        assert!(canonicalize(&base(), "mailto:someone@a.test").is_none());
    }

    #[test]
    fn test_canonicalize_equivalent_spellings() {
        let a = canonicalize(&base(), "/x/").unwrap();
        let b = canonicalize(&base(), "http://A.TEST/x#top").unwrap();
        let c = canonicalize(&base(), "../x?session=1").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "http://a.test/x");
    }
}
