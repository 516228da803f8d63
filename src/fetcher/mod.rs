//! HTTP page fetcher
//!
//! A thin wrapper over `reqwest` that performs a single GET per call. There
//! is no retry at this layer: retry policy belongs to the source job driving
//! the fetch, and a failed page simply waits for the next refresh cycle.
//!
//! Every request is bounded by the configured timeout; an unbounded network
//! call would stall a whole refresh cycle.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;

use crate::error::FetchError;

/// Fetcher for upstream listing pages
pub struct PageFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// User agent sent with every request
    user_agent: String,

    /// Optional base URL override for testing with mock servers
    base_url: Option<String>,
}

impl PageFetcher {
    /// Create a new fetcher with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created.
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
            base_url: None,
        })
    }

    /// Create a new fetcher with a custom base URL for testing
    ///
    /// Paths passed to [`fetch`](Self::fetch) are resolved against
    /// `base_url` instead of being treated as absolute URLs.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut fetcher = Self::new(timeout, concat!("eduscout/", env!("CARGO_PKG_VERSION")))?;
        fetcher.base_url = Some(base_url.to_string());
        Ok(fetcher)
    }

    /// Fetch a page and return its body as text
    ///
    /// A single GET, no retry. An empty body with a 2xx status is a valid
    /// result, not an error.
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidUrl` if the resolved URL is not absolute
    /// - `FetchError::Timeout` if the request exceeds the configured timeout
    /// - `FetchError::Status` for any non-success HTTP status
    /// - `FetchError::Http` for transport-level failures
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let full_url = match &self.base_url {
            Some(base) => format!("{base}{url}"),
            None => url.to_string(),
        };

        if url::Url::parse(&full_url).is_err() {
            return Err(FetchError::InvalidUrl(full_url));
        }

        let response = self
            .client
            .get(&full_url)
            .headers(self.build_headers())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e)
            }
        })?;

        Ok(body)
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(agent) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );

        headers
    }
}
