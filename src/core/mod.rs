//! Core ingestion logic - framework-agnostic decoding, persistence, and health checks.

/// In-memory representation of one notification
pub mod alert_group;
/// Liveness and readiness checks
pub mod health;
/// Decode-then-save orchestration for one webhook
pub mod ingest;
/// Storage backend that stores nothing
pub mod null_store;
/// Relational storage backend
pub mod sql_store;
/// Storage backend abstraction and save context
pub mod storage;
/// Webhook payload decoding
pub mod webhook;
