//! Storage backend abstraction.
//!
//! The ingestion path and the health probes only see [`Storer`]. The SQL
//! backend does the real work; the null backend accepts everything for dry runs.

use crate::{
    config::settings::{Backend, Settings},
    core::{alert_group::AlertGroup, null_store::NullStore, sql_store::SqlStore},
    errors::{Error, Result},
    metrics::Metrics,
};
use async_trait::async_trait;
use std::{fmt, sync::Arc, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Capabilities every storage backend provides. `Display` describes the driver.
#[async_trait]
pub trait Storer: fmt::Display + Send + Sync {
    /// Persists a whole notification as one atomic unit.
    async fn save(&self, ctx: &SaveContext, group: &AlertGroup) -> Result<()>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Checks that the stored schema version is the one this build supports.
    async fn check_model(&self) -> Result<()>;

    /// Releases held connections. Calling it more than once is harmless.
    async fn close(&self) -> Result<()>;
}

/// Shared handle to whichever backend was configured.
pub type SharedStorer = Arc<dyn Storer>;

const CANCELLED: &str = "request cancelled";
const DEADLINE_EXCEEDED: &str = "deadline exceeded";

/// Cancellation and deadline scope of a single save.
///
/// A save checks the context before opening its transaction, while writing,
/// and again before committing; once the context is done the transaction is
/// rolled back and [`Error::Cancelled`] is returned.
#[derive(Debug, Clone)]
pub struct SaveContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for SaveContext {
    fn default() -> Self {
        Self::background()
    }
}

impl SaveContext {
    /// A context that is never done unless cancelled explicitly.
    #[must_use]
    pub fn background() -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context that expires at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Token that cancels this context when triggered.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels the context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The reason the context is done, or `None` while it is still live.
    #[must_use]
    pub fn err(&self) -> Option<Error> {
        if self.cancel.is_cancelled() {
            return Some(Error::Cancelled { reason: CANCELLED });
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::Cancelled {
                reason: DEADLINE_EXCEEDED,
            }),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> Error {
        match self.deadline {
            Some(deadline) => tokio::select! {
                () = self.cancel.cancelled() => Error::Cancelled { reason: CANCELLED },
                () = tokio::time::sleep_until(deadline) => Error::Cancelled {
                    reason: DEADLINE_EXCEEDED,
                },
            },
            None => {
                self.cancel.cancelled().await;
                Error::Cancelled { reason: CANCELLED }
            }
        }
    }
}

/// Opens the backend selected in the settings.
///
/// The SQL backend is only returned once it answered a ping and its model
/// version matched; any failure here must stop the service from starting.
pub async fn open(settings: &Settings, metrics: &Metrics) -> Result<SharedStorer> {
    let store: SharedStorer = match settings.backend {
        Backend::Sql => Arc::new(
            SqlStore::connect(&settings.database, metrics.database_up.clone()).await?,
        ),
        Backend::Null => Arc::new(NullStore),
    };
    info!("Using {}", store);
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_context_is_live() {
        let ctx = SaveContext::background();
        assert!(ctx.err().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_context_reports_cancellation() {
        let ctx = SaveContext::background();
        ctx.cancellation_token().cancel();
        assert!(matches!(
            ctx.err(),
            Some(Error::Cancelled { reason: CANCELLED })
        ));
        assert!(matches!(
            ctx.done().await,
            Error::Cancelled { reason: CANCELLED }
        ));
    }

    #[tokio::test]
    async fn test_expired_deadline_reports_deadline() {
        let ctx = SaveContext::with_deadline(Instant::now());
        assert!(matches!(
            ctx.err(),
            Some(Error::Cancelled {
                reason: DEADLINE_EXCEEDED
            })
        ));
        assert!(matches!(
            ctx.done().await,
            Error::Cancelled {
                reason: DEADLINE_EXCEEDED
            }
        ));
    }

    #[tokio::test]
    async fn test_future_deadline_is_live() {
        let ctx = SaveContext::with_timeout(Duration::from_secs(60));
        assert!(ctx.err().is_none());
    }
}
