//! HTTP layer - routes, shared state and the listener loop
//!
//! This module exposes the ingestion service over HTTP: the webhook endpoint,
//! the liveness and readiness probes, and the Prometheus scrape endpoint.

/// Route handlers
pub mod handlers;

use crate::{core::ingest::IngestHandler, errors::Result, metrics::Metrics};
use axum::{
    Router,
    routing::{get, post},
};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared data available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Decodes and stores webhooks
    pub ingest: IngestHandler,
    /// Service metrics
    pub metrics: Arc<Metrics>,
    /// Deadline for persisting one webhook
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new `AppState` from its parts.
    #[must_use]
    pub const fn new(
        ingest: IngestHandler,
        metrics: Arc<Metrics>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            ingest,
            metrics,
            request_timeout,
        }
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::webhook))
        .route("/-/health", get(handlers::health))
        .route("/-/ready", get(handlers::ready))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serves requests on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Starting listener on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP server stopped");
    Ok(())
}
