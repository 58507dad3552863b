//! HTTP transport for the crawler
//!
//! This module handles all network traffic for a crawl:
//! - Building HTTP clients with the configured user agent and timeouts
//! - HEAD requests that resolve a URL to its post-redirect effective URL
//! - GET requests that fetch page content
//! - Error classification
//!
//! The orchestrator only sees the [`Transport`] trait, so tests can swap in an
//! in-memory implementation.

use crate::config::HttpConfig;
use crate::url::CanonicalUrl;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors produced while talking to a remote host
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} redirected to unsupported URL {effective}")]
    InvalidEffectiveUrl { url: String, effective: String },
}

/// A successfully retrieved page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects, exactly as reported by the server
    pub final_url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    /// Body decoded using the charset from Content-Type, UTF-8 by default
    pub body: String,
}

impl FetchedPage {
    /// Whether the body should be handed to the HTML parser
    ///
    /// A missing Content-Type header is treated as HTML.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(content_type) => {
                let content_type = content_type.to_ascii_lowercase();
                content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
            }
            None => true,
        }
    }
}

/// Network collaborator used by the crawl orchestrator
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetches the page body, following redirects
    ///
    /// HTTP status codes of 400 and above are reported as
    /// [`FetchError::Status`].
    async fn fetch(&self, url: &CanonicalUrl) -> Result<FetchedPage, FetchError>;

    /// Resolves `url` to the canonical form of its post-redirect URL without
    /// downloading the body
    async fn head_resolve(&self, url: &CanonicalUrl) -> Result<CanonicalUrl, FetchError>;
}

/// [`Transport`] backed by `reqwest`
///
/// Holds two connection pools: one for page fetches and one, with more
/// generous timeouts, for effective-URL resolution.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    head_client: Client,
}

impl HttpTransport {
    /// Builds the transport from the `[http]` configuration section
    ///
    /// # Arguments
    ///
    /// * `config` - The HTTP configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpTransport)` - Both clients were built
    /// * `Err(reqwest::Error)` - The TLS backend or client could not be initialized
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sitegraph::config::HttpConfig;
    /// use sitegraph::crawler::HttpTransport;
    ///
    /// let transport = HttpTransport::new(&HttpConfig::default()).unwrap();
    /// ```
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
            config.max_redirects,
        )?;

        let head_client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.head_timeout_secs),
            Duration::from_secs(config.head_connect_timeout_secs),
            config.max_redirects,
        )?;

        Ok(Self {
            client,
            head_client,
        })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &CanonicalUrl) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }

    async fn head_resolve(&self, url: &CanonicalUrl) -> Result<CanonicalUrl, FetchError> {
        // Any status is accepted; only the effective URL is used
        let response = self
            .head_client
            .head(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let effective = response.url();
        CanonicalUrl::from_url(effective).ok_or_else(|| FetchError::InvalidEffectiveUrl {
            url: url.to_string(),
            effective: effective.to_string(),
        })
    }
}

/// Builds an HTTP client with the given identity and limits
fn build_http_client(
    user_agent: &str,
    timeout: Duration,
    connect_timeout: Duration,
    max_redirects: usize,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .redirect(Policy::limited(max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a reqwest error onto the crawler's error kinds
fn classify_error(url: &CanonicalUrl, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Unreachable {
            url: url.to_string(),
            reason: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
