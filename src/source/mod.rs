//! Per-source refresh jobs
//!
//! A source job composes the fetcher and the extractor for one upstream
//! page. Jobs never fail outward: a fetch or extraction error is logged with
//! a structured cause and converted into an empty record list. The caller
//! cannot distinguish "page had nothing" from "page could not be read" - an
//! accepted limitation of the pipeline; the distinction lives in the logs,
//! where operators need it.
//!
//! Fetches are wrapped in a small bounded retry with exponential backoff.
//! Exhausting the retries still degrades to an empty result; a failed cycle
//! simply waits for the next scheduled one.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{FetcherConfig, SourcePage};
use crate::error::FetchError;
use crate::extractor::{extract_conferences, extract_courses};
use crate::fetcher::PageFetcher;
use crate::models::{Conference, Course};

/// Refresh job for the course listing source
pub struct CourseSource {
    job: SourceJob,
}

impl CourseSource {
    pub fn new(fetcher: Arc<PageFetcher>, page: SourcePage, config: &FetcherConfig) -> Self {
        Self {
            job: SourceJob::new("courses", fetcher, page, config),
        }
    }

    /// Fetch and extract the current course listings
    ///
    /// Returns an empty vec on any failure; never errors outward.
    pub async fn collect(&self) -> Vec<Course> {
        self.job
            .collect_with(|html, origin| extract_courses(html, origin))
            .await
    }
}

/// Refresh job for the conference listing source
pub struct ConferenceSource {
    job: SourceJob,
}

impl ConferenceSource {
    pub fn new(fetcher: Arc<PageFetcher>, page: SourcePage, config: &FetcherConfig) -> Self {
        Self {
            job: SourceJob::new("conferences", fetcher, page, config),
        }
    }

    /// Fetch and extract the current conference listings
    ///
    /// Returns an empty vec on any failure; never errors outward.
    pub async fn collect(&self) -> Vec<Conference> {
        self.job
            .collect_with(|html, origin| extract_conferences(html, origin))
            .await
    }
}

/// Shared fetch-then-extract plumbing for both sources
struct SourceJob {
    name: &'static str,
    fetcher: Arc<PageFetcher>,
    page: SourcePage,
    max_retries: u32,
    base_delay_ms: u64,
}

impl SourceJob {
    fn new(
        name: &'static str,
        fetcher: Arc<PageFetcher>,
        page: SourcePage,
        config: &FetcherConfig,
    ) -> Self {
        Self {
            name,
            fetcher,
            page,
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
        }
    }

    async fn collect_with<T, E, F>(&self, extract: F) -> Vec<T>
    where
        E: std::fmt::Display,
        F: Fn(&str, &str) -> Result<Vec<T>, E>,
    {
        let html = match self.fetch_with_retry().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    source = self.name,
                    cause = e.cause(),
                    error = %e,
                    "fetch failed, returning empty result"
                );
                return Vec::new();
            }
        };

        let records = match extract(&html, &self.page.origin) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(
                    source = self.name,
                    cause = "parse",
                    error = %e,
                    "extraction failed, returning empty result"
                );
                return Vec::new();
            }
        };

        if records.is_empty() {
            tracing::info!(source = self.name, cause = "empty", "page yielded no matching records");
        } else {
            tracing::info!(source = self.name, count = records.len(), "extracted records");
        }

        records
    }

    /// Fetch with exponential backoff for recoverable failures
    async fn fetch_with_retry(&self) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let delay = self.base_delay_ms * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.fetcher.fetch(&self.page.url).await {
                Ok(html) => return Ok(html),
                Err(e) if e.is_recoverable() && attempt < self.max_retries => {
                    tracing::debug!(
                        source = self.name,
                        attempt,
                        error = %e,
                        "fetch attempt failed, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_source_construction() {
        let config = Config::default();
        let fetcher = Arc::new(
            PageFetcher::new(config.request_timeout(), config.fetcher.user_agent.clone()).unwrap(),
        );

        let courses =
            CourseSource::new(fetcher.clone(), config.sources.courses.clone(), &config.fetcher);
        let conferences =
            ConferenceSource::new(fetcher, config.sources.conferences.clone(), &config.fetcher);

        assert_eq!(courses.job.name, "courses");
        assert_eq!(conferences.job.name, "conferences");
        assert_eq!(courses.job.max_retries, config.fetcher.max_retries);
    }
}
