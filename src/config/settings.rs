//! Service settings loading from config.toml and the environment.
//!
//! Settings come from an optional TOML file (`ALERT_LEDGER_CONFIG`, default
//! `./alert-ledger.toml`). Environment variables, typically set through `.env`,
//! override the file. Every field has a default, so the file may be absent.

use crate::config::database::ConnectionArgs;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::debug;

/// Environment variable naming the settings file
pub const CONFIG_PATH_VAR: &str = "ALERT_LEDGER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "alert-ledger.toml";

/// Which storage backend to run against
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Relational database
    #[default]
    Sql,
    /// Accept and log everything, store nothing
    Null,
}

impl std::str::FromStr for Backend {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sql" | "mysql" | "sqlite" => Ok(Self::Sql),
            "null" => Ok(Self::Null),
            other => Err(Error::Config {
                message: format!("unknown storage backend '{other}'"),
            }),
        }
    }
}

/// Configuration structure representing the whole settings file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Address the HTTP server listens on
    pub listen_address: String,
    /// Storage backend
    pub backend: Backend,
    /// Log every received payload at debug level
    pub debug: bool,
    /// Deadline for persisting one webhook
    pub request_timeout_secs: u64,
    /// Relational store connection
    pub database: ConnectionArgs,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9567".to_string(),
            backend: Backend::Sql,
            debug: false,
            request_timeout_secs: 15,
            database: ConnectionArgs::default(),
        }
    }
}

impl Settings {
    /// Deadline for persisting one webhook.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies overrides from an environment lookup.
    ///
    /// Takes the lookup as a function so tests do not have to touch the
    /// process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(address) = lookup("ALERT_LEDGER_LISTEN") {
            self.listen_address = address;
        }
        if let Some(backend) = lookup("ALERT_LEDGER_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(debug) = lookup("ALERT_LEDGER_DEBUG") {
            self.debug = parse_flag(&debug)?;
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config {
            message: format!("invalid boolean '{other}' for ALERT_LEDGER_DEBUG"),
        }),
    }
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a field has the wrong type.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads the service settings: the settings file if there is one, then
/// environment overrides.
pub fn load_app_settings() -> Result<Settings> {
    let explicit = std::env::var(CONFIG_PATH_VAR).ok();
    let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

    let mut settings = if explicit.is_some() || Path::new(path).exists() {
        debug!("Loading settings from {}", path);
        load_settings(path)?
    } else {
        debug!("No settings file at {}, using defaults", path);
        Settings::default()
    };

    settings.apply_overrides(|name| std::env::var(name).ok())?;
    Ok(settings)
}
