use crate::url::normalize::{is_valid, normalize};
use crate::UrlError;
use std::fmt;
use url::Url;

/// A normalized, absolute http(s) URL; the unique key of a page in the graph
///
/// The only ways to build one go through [`normalize`] and [`is_valid`], so two
/// values compare equal exactly when they denote the same page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Parses and canonicalizes a user-supplied absolute URL (e.g. the root)
    ///
    /// # Returns
    ///
    /// * `Ok(CanonicalUrl)` - The canonical form of the input
    /// * `Err(UrlError)` - The input is malformed, lacks a host, or is not http(s)
    ///
    /// # Examples
    ///
    /// ```
    /// use sitegraph::url::CanonicalUrl;
    ///
    /// let url = CanonicalUrl::parse("https://Example.com/docs/#intro").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/docs");
    ///
    /// assert!(CanonicalUrl::parse("ftp://example.com/").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if !is_valid(&url) {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        Ok(Self(normalize(&url)))
    }

    /// Canonicalizes an already-parsed URL, or returns `None` if it is not http(s)
    pub fn from_url(url: &Url) -> Option<Self> {
        if is_valid(url) && url.host_str().is_some() {
            Some(Self(normalize(url)))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
