//! Error types for the eduscout service
//!
//! Two domain-specific error enums cover the refresh pipeline:
//!
//! - [`FetchError`] - network/transport failures and non-success HTTP status
//! - [`ExtractError`] - the document could not be turned into records at all
//!
//! "Zero records extracted" is deliberately not an error. Both error kinds
//! are caught at the source-job boundary and converted into an empty result;
//! they never reach the cache store or the query surface.

use thiserror::Error;

/// Errors that can occur while fetching a source page
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (DNS, TLS, connection reset, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Server returned status {0}")]
    Status(u16),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether a retry of the same request could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Status(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::InvalidUrl(_) => false,
        }
    }

    /// Short cause label used in structured log fields
    pub fn cause(&self) -> &'static str {
        match self {
            Self::Http(_) => "transport",
            Self::Status(_) => "status",
            Self::Timeout => "timeout",
            Self::InvalidUrl(_) => "invalid-url",
        }
    }
}

/// Errors that can occur while extracting records from a fetched document
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Document could not be loaded into a traversable tree
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The configured source origin is not a valid base URL
    #[error("Invalid source origin: {0}")]
    InvalidOrigin(String),
}

/// Unified error type for the eduscout crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Extraction-specific errors
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
