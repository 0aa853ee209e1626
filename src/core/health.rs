//! Liveness and readiness checks over a storage backend.
//!
//! Both checks run against the store on every call and are bounded by the
//! backend's own probe timeouts, so a dead database cannot hang them.

use crate::{core::storage::Storer, errors::Result};
use tracing::instrument;

/// Liveness: the store answers a ping.
#[instrument(skip_all)]
pub async fn liveness(store: &dyn Storer) -> Result<()> {
    store.ping().await
}

/// Readiness: the store answers a ping and its schema version is supported.
#[instrument(skip_all)]
pub async fn readiness(store: &dyn Storer) -> Result<()> {
    store.ping().await?;
    store.check_model().await
}
