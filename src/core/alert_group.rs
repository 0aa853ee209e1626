//! In-memory representation of one webhook notification.
//!
//! An [`AlertGroup`] is built by the decoder, handed to a storage backend once,
//! and dropped when the request finishes. Label and annotation sets are maps
//! keyed by name; their order carries no meaning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Label or annotation pairs scoped to one owner.
pub type KeyValues = BTreeMap<String, String>;

/// Firing state of a group or of a single alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// At least one alert is active
    Firing,
    /// The alert (or every alert in the group) has cleared
    Resolved,
}

impl Status {
    /// Wire and column representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification: a group of alerts plus what they have in common.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertGroup {
    /// Webhook protocol version declared by the sender
    #[serde(default)]
    pub version: String,
    /// Sender-side key of the group
    #[serde(default)]
    pub group_key: String,
    /// Number of alerts the sender dropped to respect its payload limit
    #[serde(default)]
    pub truncated_alerts: u64,
    /// Group status
    pub status: Status,
    /// Receiver the notification was routed to
    #[serde(default)]
    pub receiver: String,
    /// Labels the sender grouped by
    #[serde(default)]
    pub group_labels: KeyValues,
    /// Labels shared by all alerts
    #[serde(default)]
    pub common_labels: KeyValues,
    /// Annotations shared by all alerts
    #[serde(default)]
    pub common_annotations: KeyValues,
    /// Backlink to the sender
    #[serde(default, rename = "externalURL")]
    pub external_url: String,
    /// Alerts in the group, possibly none
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

/// A single alert of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert status
    pub status: Status,
    /// Alert labels
    #[serde(default)]
    pub labels: KeyValues,
    /// Alert annotations
    #[serde(default)]
    pub annotations: KeyValues,
    /// When the alert started
    pub starts_at: DateTime<Utc>,
    /// End time as sent. Open alerts carry a value before `starts_at`.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Link to the producing expression
    #[serde(default, rename = "generatorURL")]
    pub generator_url: String,
    /// Sender-assigned identity
    #[serde(default)]
    pub fingerprint: String,
}

impl Alert {
    /// The end time worth recording.
    ///
    /// Senders mark a still-open alert with an end time strictly before its
    /// start time, so such a value, like a missing one, yields `None`.
    #[must_use]
    pub fn recorded_end(&self) -> Option<DateTime<Utc>> {
        self.ends_at.filter(|ends_at| *ends_at >= self.starts_at)
    }
}
