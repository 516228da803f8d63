//! Configuration management for the eduscout service
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Default upstream page for course listings
const DEFAULT_COURSE_URL: &str =
    "https://www.coursera.org/courses?query=teaching&topic=Math%20and%20Logic";
const DEFAULT_COURSE_ORIGIN: &str = "https://www.coursera.org";

/// Default upstream page for conference listings
const DEFAULT_CONFERENCE_URL: &str =
    "https://www.conferencealerts.com/country-listing?country=India";
const DEFAULT_CONFERENCE_ORIGIN: &str = "https://www.conferencealerts.com";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Fetcher configuration
    pub fetcher: FetcherConfig,

    /// Upstream source configuration
    pub sources: SourcesConfig,

    /// Refresh scheduling configuration
    pub refresh: RefreshConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the query surface binds to
    pub bind_address: SocketAddr,

    /// Enable permissive CORS headers
    pub enable_cors: bool,

    /// Enable per-request tracing
    pub enable_request_logging: bool,
}

/// Fetcher-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Maximum retry attempts for a failing fetch within one refresh cycle
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff between retries
    pub retry_base_delay_ms: u64,
}

/// One upstream HTML page and the origin its relative links resolve against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePage {
    /// Full URL of the listing page
    pub url: String,

    /// Origin prefixed onto extracted relative hrefs
    pub origin: String,
}

/// Upstream source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Course listing page
    pub courses: SourcePage,

    /// Conference listing page
    pub conferences: SourcePage,
}

/// Refresh scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Daily wall-clock boundary at which a refresh cycle fires (HH:MM, local time)
    pub refresh_time: String,

    /// Run a refresh cycle synchronously at process start
    pub refresh_on_startup: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("EDUSCOUT_BIND_ADDRESS") {
            config.server.bind_address = addr
                .parse()
                .with_context(|| format!("Invalid EDUSCOUT_BIND_ADDRESS: {addr}"))?;
        }

        if let Some(timeout) = std::env::var("EDUSCOUT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.fetcher.request_timeout_secs = timeout;
        }

        if let Some(retries) = std::env::var("EDUSCOUT_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            config.fetcher.max_retries = retries;
        }

        if let Ok(url) = std::env::var("EDUSCOUT_COURSE_URL") {
            config.sources.courses.url = url;
        }
        if let Ok(origin) = std::env::var("EDUSCOUT_COURSE_ORIGIN") {
            config.sources.courses.origin = origin;
        }
        if let Ok(url) = std::env::var("EDUSCOUT_CONFERENCE_URL") {
            config.sources.conferences.url = url;
        }
        if let Ok(origin) = std::env::var("EDUSCOUT_CONFERENCE_ORIGIN") {
            config.sources.conferences.origin = origin;
        }

        if let Ok(time) = std::env::var("EDUSCOUT_REFRESH_TIME") {
            config.refresh.refresh_time = time;
        }

        if let Ok(level) = std::env::var("EDUSCOUT_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("EDUSCOUT_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.sources.courses.url.is_empty() || self.sources.conferences.url.is_empty() {
            anyhow::bail!("source URLs must not be empty");
        }

        if self.sources.courses.origin.is_empty() || self.sources.conferences.origin.is_empty() {
            anyhow::bail!("source origins must not be empty");
        }

        if chrono::NaiveTime::parse_from_str(&self.refresh.refresh_time, "%H:%M").is_err() {
            anyhow::bail!(
                "Invalid refresh_time '{}'. Expected HH:MM",
                self.refresh.refresh_time
            );
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetcher.request_timeout_secs)
    }

    /// Parse the daily refresh boundary
    pub fn refresh_time(&self) -> Result<chrono::NaiveTime> {
        chrono::NaiveTime::parse_from_str(&self.refresh.refresh_time, "%H:%M")
            .with_context(|| format!("Invalid refresh_time: {}", self.refresh.refresh_time))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: ([127, 0, 0, 1], 3001).into(),
                enable_cors: true,
                enable_request_logging: true,
            },
            fetcher: FetcherConfig {
                request_timeout_secs: 30,
                user_agent: format!("eduscout/{}", env!("CARGO_PKG_VERSION")),
                max_retries: 2,
                retry_base_delay_ms: 500,
            },
            sources: SourcesConfig {
                courses: SourcePage {
                    url: String::from(DEFAULT_COURSE_URL),
                    origin: String::from(DEFAULT_COURSE_ORIGIN),
                },
                conferences: SourcePage {
                    url: String::from(DEFAULT_CONFERENCE_URL),
                    origin: String::from(DEFAULT_CONFERENCE_ORIGIN),
                },
            },
            refresh: RefreshConfig {
                refresh_time: String::from("00:00"),
                refresh_on_startup: true,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
