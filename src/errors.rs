//! Unified error types for alert ingestion and persistence.
//!
//! Every failure carries a human-readable message through `Display` and keeps
//! the underlying driver or parser error reachable through `source()` so the
//! caller can log the full chain.

use sea_orm::DbErr;
use std::{fmt, time::Duration};
use thiserror::Error;

/// The table a failed insert was targeting inside the save transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    /// The `AlertGroup` row itself
    AlertGroup,
    /// A `GroupLabel` row
    GroupLabel,
    /// A `CommonLabel` row
    CommonLabel,
    /// A `CommonAnnotation` row
    CommonAnnotation,
    /// An `Alert` row
    Alert,
    /// An `AlertLabel` row
    AlertLabel,
    /// An `AlertAnnotation` row
    AlertAnnotation,
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = match self {
            Self::AlertGroup => "AlertGroup",
            Self::GroupLabel => "GroupLabel",
            Self::CommonLabel => "CommonLabel",
            Self::CommonAnnotation => "CommonAnnotation",
            Self::Alert => "Alert",
            Self::AlertLabel => "AlertLabel",
            Self::AlertAnnotation => "AlertAnnotation",
        };
        f.write_str(table)
    }
}

/// Main error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// The payload is not a well-formed webhook document
    #[error("Invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload declares a webhook version other than the supported one
    #[error("Invalid payload: webhook version {found} is not supported")]
    UnsupportedVersion {
        /// Version string found in the payload
        found: String,
    },

    /// The store could not be reached
    #[error("failed to connect to database: {0}")]
    Connect(#[source] DbErr),

    /// The store did not answer the ping in time
    #[error("database ping timed out after {0:?}")]
    PingTimeout(Duration),

    /// The stored model version does not match the one compiled in
    #[error("database model '{found}' is not supported by this application ({supported})")]
    UnsupportedModel {
        /// Version read from the `Model` table
        found: String,
        /// Version this build understands
        supported: &'static str,
    },

    /// The model version marker could not be read
    #[error("failed to read model version from the database: {reason}")]
    ModelRead {
        /// What went wrong while reading
        reason: String,
        /// Underlying driver error, if there was one
        #[source]
        source: Option<DbErr>,
    },

    /// A transaction could not be opened
    #[error("failed to begin transaction: {0}")]
    Begin(#[source] DbErr),

    /// An insert inside the save transaction failed
    #[error("failed to insert into {step}: {source}")]
    Write {
        /// Table the failing insert targeted
        step: WriteStep,
        /// Driver error
        #[source]
        source: DbErr,
    },

    /// Rolling back after a failed save also failed
    #[error("failed to rollback transaction ({rollback}) after failing execution: {cause}")]
    Rollback {
        /// Error returned by the rollback itself
        rollback: DbErr,
        /// The error that triggered the rollback
        #[source]
        cause: Box<Error>,
    },

    /// Every insert succeeded but the commit did not
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] DbErr),

    /// The caller's context was cancelled or ran out of time during a save
    #[error("save aborted: {reason}")]
    Cancelled {
        /// Either cancellation or deadline expiry
        reason: &'static str,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Metrics registry failure
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// I/O error (listener bind, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other database error
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl Error {
    /// Whether the error was caused by the payload rather than the service.
    #[must_use]
    pub const fn is_invalid_payload(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::UnsupportedVersion { .. })
    }

    /// Whether the error came from the schema version check.
    #[must_use]
    pub const fn is_model_error(&self) -> bool {
        matches!(self, Self::UnsupportedModel { .. } | Self::ModelRead { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
