//! HTTP server for the query surface
//!
//! Wires the snapshot store behind the read-only routes defined in
//! [`api`]. The server never blocks on a refresh in progress: handlers only
//! read the store, which always returns the last good snapshot.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::SnapshotStore;
use crate::config::ServerConfig;

pub use api::create_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Snapshot store, written by the scheduler and read here
    pub store: Arc<SnapshotStore>,
}

/// Query surface server
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Failed to bind to the configured address
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Serving failed after a successful bind
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

impl ApiServer {
    /// Create a new server over the given store
    pub fn new(config: ServerConfig, store: Arc<SnapshotStore>) -> Self {
        let state = AppState { store };

        Self { config, state }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and configured layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server on the configured address
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting query surface on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        tracing::info!("Starting query surface on {} (with graceful shutdown)", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        tracing::info!("Query surface shutdown complete");
        Ok(())
    }
}
