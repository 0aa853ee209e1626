//! Shared test utilities for the alert ledger.
//!
//! Helpers for setting up a ready in-memory store and for building webhook
//! payloads and alert groups with sensible defaults.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{
    config::database::{SUPPORTED_MODEL, create_tables, set_model_version},
    core::{
        alert_group::{Alert, AlertGroup, KeyValues, Status},
        sql_store::SqlStore,
    },
    errors::Result,
};
use chrono::{TimeZone, Utc};
use prometheus::IntGauge;
use sea_orm::DatabaseConnection;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes tracing for tests, once per process.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// Creates an in-memory `SQLite` database with all tables and the supported
/// model version in place.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    set_model_version(&db, SUPPORTED_MODEL).await?;
    Ok(db)
}

/// Creates a SQL store over [`setup_test_db`].
pub async fn setup_test_store() -> Result<SqlStore> {
    Ok(SqlStore::from_connection(setup_test_db().await?, test_gauge()))
}

/// A database gauge that is not registered anywhere.
pub fn test_gauge() -> IntGauge {
    IntGauge::new("test_database_up", "database reachability in tests").unwrap()
}

/// An Alertmanager v4 payload with two alerts: one still firing with the
/// zero-time end marker, one resolved half an hour after it started.
pub fn sample_payload() -> String {
    r#"{
  "version": "4",
  "groupKey": "{}:{alertname=\"DiskFull\"}",
  "truncatedAlerts": 0,
  "status": "firing",
  "receiver": "ops",
  "groupLabels": {},
  "commonLabels": {"severity": "critical"},
  "commonAnnotations": {},
  "externalURL": "http://alertmanager:9093",
  "alerts": [
    {
      "status": "firing",
      "labels": {},
      "annotations": {},
      "startsAt": "2024-03-01T12:00:00Z",
      "endsAt": "0001-01-01T00:00:00Z",
      "generatorURL": "http://prometheus:9090/graph",
      "fingerprint": "f1"
    },
    {
      "status": "resolved",
      "labels": {},
      "annotations": {},
      "startsAt": "2024-03-01T12:00:00Z",
      "endsAt": "2024-03-01T12:30:00Z",
      "generatorURL": "http://prometheus:9090/graph",
      "fingerprint": "f2"
    }
  ]
}"#
    .to_string()
}

/// Builds a firing group for `receiver` with `alerts` alerts.
///
/// # Defaults
/// * one group label `receiver` whose value is the receiver
/// * one common label and one common annotation
/// * each alert has a unique fingerprint, one label `fingerprint` holding it,
///   and one `summary` annotation
pub fn labelled_group(receiver: &str, alerts: usize) -> AlertGroup {
    let starts_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let alerts = (0..alerts)
        .map(|n| {
            let fingerprint = format!("{receiver}-{n}");
            Alert {
                status: Status::Firing,
                labels: KeyValues::from([("fingerprint".to_string(), fingerprint.clone())]),
                annotations: KeyValues::from([(
                    "summary".to_string(),
                    format!("alert {n} for {receiver}"),
                )]),
                starts_at,
                ends_at: None,
                generator_url: "http://prometheus:9090/graph".to_string(),
                fingerprint,
            }
        })
        .collect();

    AlertGroup {
        version: "4".to_string(),
        group_key: format!("{{}}:{{receiver=\"{receiver}\"}}"),
        truncated_alerts: 0,
        status: Status::Firing,
        receiver: receiver.to_string(),
        group_labels: KeyValues::from([("receiver".to_string(), receiver.to_string())]),
        common_labels: KeyValues::from([("severity".to_string(), "warning".to_string())]),
        common_annotations: KeyValues::from([(
            "runbook".to_string(),
            "https://runbooks.example/disk".to_string(),
        )]),
        external_url: "http://alertmanager:9093".to_string(),
        alerts,
    }
}
