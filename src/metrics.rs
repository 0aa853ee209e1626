//! Prometheus metrics for webhook ingestion and store connectivity.
//!
//! Metrics live in a registry owned by [`Metrics`] rather than the process-wide
//! default registry, so each service instance (and each test) has its own set.

use crate::{core::ingest::Summary, errors::Result};
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "alert_ledger";

/// Ingestion counters and the database connectivity gauge.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    /// Webhooks received, valid or not
    pub webhooks_received_total: IntCounter,
    /// Webhooks rejected as malformed or unsupported
    pub invalid_webhooks_total: IntCounter,
    /// Alerts received in valid webhooks
    pub alerts_received_total: IntCounterVec,
    /// Alerts committed to the store
    pub alerts_saved_total: IntCounterVec,
    /// Alerts whose webhook could not be stored
    pub alerts_saving_failures_total: IntCounterVec,
    /// 1 when the last database ping succeeded, 0 otherwise
    pub database_up: IntGauge,
}

impl Metrics {
    /// Creates and registers every metric.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let webhooks_received_total = IntCounter::with_opts(
            Opts::new("webhooks_received_total", "total number of webhooks received")
                .namespace(NAMESPACE),
        )?;
        let invalid_webhooks_total = IntCounter::with_opts(
            Opts::new(
                "invalid_webhooks_total",
                "total number of invalid webhooks received",
            )
            .namespace(NAMESPACE),
        )?;
        let alerts_received_total = IntCounterVec::new(
            Opts::new("alerts_received_total", "total number of valid alerts received")
                .namespace(NAMESPACE),
            &["receiver", "status"],
        )?;
        let alerts_saved_total = IntCounterVec::new(
            Opts::new("alerts_saved_total", "total number of alerts saved")
                .namespace(NAMESPACE),
            &["receiver", "status"],
        )?;
        let alerts_saving_failures_total = IntCounterVec::new(
            Opts::new(
                "alerts_saving_failures_total",
                "total number of alerts that failed to be saved",
            )
            .namespace(NAMESPACE),
            &["receiver", "status"],
        )?;
        let database_up = IntGauge::with_opts(
            Opts::new("database_up", "whether the database is reachable").namespace(NAMESPACE),
        )?;

        registry.register(Box::new(webhooks_received_total.clone()))?;
        registry.register(Box::new(invalid_webhooks_total.clone()))?;
        registry.register(Box::new(alerts_received_total.clone()))?;
        registry.register(Box::new(alerts_saved_total.clone()))?;
        registry.register(Box::new(alerts_saving_failures_total.clone()))?;
        registry.register(Box::new(database_up.clone()))?;

        Ok(Self {
            registry,
            webhooks_received_total,
            invalid_webhooks_total,
            alerts_received_total,
            alerts_saved_total,
            alerts_saving_failures_total,
            database_up,
        })
    }

    /// Counts the alerts of a decoded webhook.
    pub fn record_received(&self, summary: &Summary) {
        self.alerts_received_total
            .with_label_values(&[summary.receiver.as_str(), summary.status.as_str()])
            .inc_by(summary.alerts as u64);
    }

    /// Counts the alerts of a committed webhook.
    pub fn record_saved(&self, summary: &Summary) {
        self.alerts_saved_total
            .with_label_values(&[summary.receiver.as_str(), summary.status.as_str()])
            .inc_by(summary.alerts as u64);
    }

    /// Counts the alerts of a webhook the store refused.
    pub fn record_failed(&self, summary: &Summary) {
        self.alerts_saving_failures_total
            .with_label_values(&[summary.receiver.as_str(), summary.status.as_str()])
            .inc_by(summary.alerts as u64);
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        Ok(TextEncoder::new().encode_to_string(&self.registry.gather())?)
    }
}
