//! Webhook ingestion - decode one payload and hand it to the storage backend.
//!
//! The handler reports what happened and leaves counting to its caller. A
//! notification is either accepted as a whole or fails as a whole; failures are
//! never retried here, the webhook sender is expected to retry.

use crate::{
    core::{
        alert_group::{AlertGroup, Status},
        storage::{SaveContext, SharedStorer},
        webhook,
    },
    errors::Error,
};
use tracing::{debug, error, instrument, warn};

/// What the notification was about, for metric labels and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Receiver name from the payload
    pub receiver: String,
    /// Group status
    pub status: Status,
    /// Number of alerts in the group
    pub alerts: usize,
}

impl Summary {
    fn of(group: &AlertGroup) -> Self {
        Self {
            receiver: group.receiver.clone(),
            status: group.status,
            alerts: group.alerts.len(),
        }
    }
}

/// Result of handling one webhook.
#[derive(Debug)]
pub enum Outcome {
    /// Every row of the notification was committed
    Accepted(Summary),
    /// The payload was malformed or used an unsupported version
    Rejected(Error),
    /// The payload was valid but could not be stored
    StoreFailed(Summary, Error),
}

/// Decodes webhooks and saves them through the configured backend.
#[derive(Clone)]
pub struct IngestHandler {
    store: SharedStorer,
    debug: bool,
}

impl IngestHandler {
    /// Creates a handler over `store`. With `debug` set, raw payloads are logged.
    #[must_use]
    pub const fn new(store: SharedStorer, debug: bool) -> Self {
        Self { store, debug }
    }

    /// The backend notifications are saved to.
    #[must_use]
    pub const fn store(&self) -> &SharedStorer {
        &self.store
    }

    /// Handles one raw webhook body.
    #[instrument(skip_all, fields(bytes = payload.len()))]
    pub async fn handle(&self, ctx: &SaveContext, payload: &[u8]) -> Outcome {
        if self.debug {
            debug!("Received webhook payload: {}", String::from_utf8_lossy(payload));
        }

        let group = match webhook::decode(payload) {
            Ok(group) => group,
            Err(e) => {
                warn!("{}", e);
                return Outcome::Rejected(e);
            }
        };

        if group.truncated_alerts > 0 {
            warn!(
                "Sender truncated {} alerts from group {}",
                group.truncated_alerts, group.group_key
            );
        }

        let summary = Summary::of(&group);
        match self.store.save(ctx, &group).await {
            Ok(()) => {
                debug!(
                    "Saved {} {} alerts for receiver {}",
                    summary.alerts, summary.status, summary.receiver
                );
                Outcome::Accepted(summary)
            }
            Err(e) => {
                error!("failed to save alerts: {}", e);
                Outcome::StoreFailed(summary, e)
            }
        }
    }
}
