/// Database connection parameters, schema version, and table bootstrap
pub mod database;

/// Service settings loaded from config.toml and the environment
pub mod settings;
