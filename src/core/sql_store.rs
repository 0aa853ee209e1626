//! Relational storage backend.
//!
//! Every notification is written inside one database transaction: the alert
//! group first, then its label and annotation rows, then each alert followed by
//! the alert's own labels and annotations. Child rows reference the identity
//! generated for their parent earlier in the same transaction. If any insert
//! fails, or the caller's [`SaveContext`] is done, the transaction is rolled
//! back and nothing from the notification remains in the store.

use crate::{
    config::database::{ConnectionArgs, SUPPORTED_MODEL},
    core::{
        alert_group::{Alert as AlertGraph, AlertGroup as AlertGroupGraph},
        storage::{SaveContext, Storer},
    },
    entities::{
        Alert, AlertAnnotation, AlertGroup, AlertLabel, CommonAnnotation, CommonLabel,
        GroupLabel, ModelVersion, alert, alert_annotation, alert_group, alert_label,
        common_annotation, common_label, group_label,
    },
    errors::{Error, Result, WriteStep},
};
use async_trait::async_trait;
use prometheus::IntGauge;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, EntityTrait, Set,
    TransactionTrait,
};
use std::{fmt, time::Duration};
use tracing::{debug, error, info, instrument};

/// Upper bound for a connectivity probe.
pub const PING_TIMEOUT: Duration = Duration::from_secs(1);

/// Upper bound for reading the model version marker.
pub const MODEL_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// SQL database backend built on a `SeaORM` connection pool.
pub struct SqlStore {
    db: DatabaseConnection,
    database_up: IntGauge,
}

impl SqlStore {
    /// Opens the connection pool, then verifies connectivity and the model version.
    ///
    /// A store is only returned when both checks pass, so holding a `SqlStore`
    /// means the schema was compatible at start-up.
    #[instrument(skip_all)]
    pub async fn connect(args: &ConnectionArgs, database_up: IntGauge) -> Result<Self> {
        if args.url.is_empty() {
            return Err(Error::Config {
                message: "Empty DSN provided, can't connect to the database".to_string(),
            });
        }

        debug!(
            "Connecting to database (max_open={}, max_idle={}, max_lifetime={}s)",
            args.max_open_connections, args.max_idle_connections, args.max_connection_lifetime_secs
        );
        let db = Database::connect(args.connect_options())
            .await
            .map_err(Error::Connect)?;

        let store = Self::from_connection(db, database_up);
        store.ping().await?;
        debug!("Connected to database");

        store.check_model().await?;
        info!("Database model {} verified", SUPPORTED_MODEL);
        Ok(store)
    }

    /// Wraps an already opened connection without running any checks.
    #[must_use]
    pub const fn from_connection(db: DatabaseConnection, database_up: IntGauge) -> Self {
        Self { db, database_up }
    }

    /// The underlying connection, for read-side queries.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl Storer for SqlStore {
    #[instrument(skip_all, fields(receiver = %group.receiver, alerts = group.alerts.len()))]
    async fn save(&self, ctx: &SaveContext, group: &AlertGroupGraph) -> Result<()> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let txn = tokio::select! {
            biased;
            err = ctx.done() => return Err(err),
            txn = self.db.begin() => txn.map_err(Error::Begin)?,
        };

        let written = tokio::select! {
            biased;
            err = ctx.done() => Err(err),
            written = insert_alert_group(&txn, group) => written,
        };
        // The context may have expired between the last insert and now
        let written = written.and_then(|group_id| ctx.err().map_or(Ok(group_id), Err));

        match written {
            Ok(group_id) => {
                txn.commit().await.map_err(Error::Commit)?;
                debug!("Saved alert group {} with {} alerts", group_id, group.alerts.len());
                Ok(())
            }
            Err(cause) => Err(rollback(txn, cause).await),
        }
    }

    async fn ping(&self) -> Result<()> {
        let result = match tokio::time::timeout(PING_TIMEOUT, self.db.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Connect(e)),
            Err(_) => Err(Error::PingTimeout(PING_TIMEOUT)),
        };

        match &result {
            Ok(()) => {
                self.database_up.set(1);
                debug!("Pinged database...");
            }
            Err(e) => {
                self.database_up.set(0);
                debug!("Failed to ping database: {}", e);
            }
        }
        result
    }

    async fn check_model(&self) -> Result<()> {
        let row = tokio::time::timeout(MODEL_READ_TIMEOUT, ModelVersion::find().one(&self.db))
            .await
            .map_err(|_| Error::ModelRead {
                reason: format!("timed out after {MODEL_READ_TIMEOUT:?}"),
                source: None,
            })?
            .map_err(|e| Error::ModelRead {
                reason: e.to_string(),
                source: Some(e),
            })?
            .ok_or_else(|| Error::ModelRead {
                reason: "empty resultset".to_string(),
                source: None,
            })?;

        if row.version != SUPPORTED_MODEL {
            return Err(Error::UnsupportedModel {
                found: row.version,
                supported: SUPPORTED_MODEL,
            });
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.db.close_by_ref().await.map_err(Error::from)
    }
}

impl fmt::Display for SqlStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sql database driver")
    }
}

/// Rolls back after a failed save, keeping `cause` as the reported error.
async fn rollback(txn: DatabaseTransaction, cause: Error) -> Error {
    match txn.rollback().await {
        Ok(()) => cause,
        Err(rollback) => {
            error!("Rollback failed after save error: {}", rollback);
            Error::Rollback {
                rollback,
                cause: Box::new(cause),
            }
        }
    }
}

/// Writes the whole notification and returns the new alert group id.
async fn insert_alert_group<C>(txn: &C, group: &AlertGroupGraph) -> Result<i64>
where
    C: ConnectionTrait,
{
    let row = alert_group::ActiveModel {
        time: Set(chrono::Utc::now()),
        receiver: Set(group.receiver.clone()),
        status: Set(group.status.to_string()),
        external_url: Set(group.external_url.clone()),
        group_key: Set(group.group_key.clone()),
        ..Default::default()
    };
    let group_id = AlertGroup::insert(row)
        .exec(txn)
        .await
        .map_err(|source| write_error(WriteStep::AlertGroup, source))?
        .last_insert_id;

    for (name, value) in &group.group_labels {
        let row = group_label::ActiveModel {
            alert_group_id: Set(group_id),
            group_label: Set(name.clone()),
            value: Set(value.clone()),
            ..Default::default()
        };
        GroupLabel::insert(row)
            .exec_without_returning(txn)
            .await
            .map_err(|source| write_error(WriteStep::GroupLabel, source))?;
    }

    for (name, value) in &group.common_labels {
        let row = common_label::ActiveModel {
            alert_group_id: Set(group_id),
            label: Set(name.clone()),
            value: Set(value.clone()),
            ..Default::default()
        };
        CommonLabel::insert(row)
            .exec_without_returning(txn)
            .await
            .map_err(|source| write_error(WriteStep::CommonLabel, source))?;
    }

    for (name, value) in &group.common_annotations {
        let row = common_annotation::ActiveModel {
            alert_group_id: Set(group_id),
            annotation: Set(name.clone()),
            value: Set(value.clone()),
            ..Default::default()
        };
        CommonAnnotation::insert(row)
            .exec_without_returning(txn)
            .await
            .map_err(|source| write_error(WriteStep::CommonAnnotation, source))?;
    }

    for alert in &group.alerts {
        insert_alert(txn, group_id, alert).await?;
    }

    Ok(group_id)
}

/// Writes one alert and its labels and annotations.
async fn insert_alert<C>(txn: &C, group_id: i64, alert: &AlertGraph) -> Result<i64>
where
    C: ConnectionTrait,
{
    let row = alert::ActiveModel {
        alert_group_id: Set(group_id),
        status: Set(alert.status.to_string()),
        starts_at: Set(alert.starts_at),
        ends_at: Set(alert.recorded_end()),
        generator_url: Set(alert.generator_url.clone()),
        fingerprint: Set(alert.fingerprint.clone()),
        ..Default::default()
    };
    let alert_id = Alert::insert(row)
        .exec(txn)
        .await
        .map_err(|source| write_error(WriteStep::Alert, source))?
        .last_insert_id;

    for (name, value) in &alert.labels {
        let row = alert_label::ActiveModel {
            alert_id: Set(alert_id),
            label: Set(name.clone()),
            value: Set(value.clone()),
            ..Default::default()
        };
        AlertLabel::insert(row)
            .exec_without_returning(txn)
            .await
            .map_err(|source| write_error(WriteStep::AlertLabel, source))?;
    }

    for (name, value) in &alert.annotations {
        let row = alert_annotation::ActiveModel {
            alert_id: Set(alert_id),
            annotation: Set(name.clone()),
            value: Set(value.clone()),
            ..Default::default()
        };
        AlertAnnotation::insert(row)
            .exec_without_returning(txn)
            .await
            .map_err(|source| write_error(WriteStep::AlertAnnotation, source))?;
    }

    Ok(alert_id)
}

const fn write_error(step: WriteStep, source: sea_orm::DbErr) -> Error {
    Error::Write { step, source }
}
