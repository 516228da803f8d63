//! eduscout - course & conference listing aggregator
//!
//! A background data-acquisition service: it periodically fetches two
//! external HTML listing pages, extracts structured records from them via
//! DOM-pattern rules, holds the latest successful extraction in memory, and
//! serves it over a minimal read API.
//!
//! # Architecture
//!
//! The library is organized into several modules, leaves first:
//!
//! - [`models`] - Core record types (Course, Conference)
//! - [`extractor`] - Pure HTML-to-record extraction, no I/O
//! - [`fetcher`] - Single-attempt HTTP page retrieval
//! - [`source`] - Per-source jobs composing fetcher and extractor
//! - [`cache`] - Last-known-good snapshot store
//! - [`scheduler`] - Boot and daily refresh cycles
//! - [`server`] - Read-only query surface over the store
//! - [`config`] - Configuration management and settings
//!
//! The pipeline favors serving stale-but-valid data over serving nothing:
//! a refresh that produces no records never overwrites a previously
//! populated snapshot.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use eduscout::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(SnapshotStore::new());
//!     let server = ApiServer::new(config.server, store);
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod scheduler;
pub mod server;
pub mod source;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{SnapshotStore, SourceCache};
    pub use crate::config::Config;
    pub use crate::error::{Error, ExtractError, FetchError, Result};
    pub use crate::fetcher::PageFetcher;
    pub use crate::models::{Conference, Course};
    pub use crate::scheduler::{CycleOutcome, RefreshEvent, RefreshScheduler, SchedulerState};
    pub use crate::server::ApiServer;
    pub use crate::source::{ConferenceSource, CourseSource};
}

// Direct re-exports for convenience
pub use models::{Conference, Course};
