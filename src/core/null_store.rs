//! Storage backend that stores nothing.
//!
//! Useful for dry runs: every notification is logged and accepted, and the
//! health probes always pass.

use crate::{
    core::{
        alert_group::AlertGroup,
        storage::{SaveContext, Storer},
    },
    errors::Result,
};
use async_trait::async_trait;
use std::fmt;
use tracing::info;

/// A database that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl Storer for NullStore {
    async fn save(&self, _ctx: &SaveContext, group: &AlertGroup) -> Result<()> {
        info!("save alert group {:?}", group);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        info!("pong");
        Ok(())
    }

    async fn check_model(&self) -> Result<()> {
        info!("check model");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl fmt::Display for NullStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null database driver")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::webhook::decode, test_utils::sample_payload};

    #[tokio::test]
    async fn test_null_store_accepts_everything() -> Result<()> {
        let store = NullStore;
        assert_eq!(store.to_string(), "null database driver");

        let group = decode(sample_payload().as_bytes())?;
        store.save(&SaveContext::background(), &group).await?;
        store.ping().await?;
        store.check_model().await?;
        store.close().await?;
        store.close().await?;
        Ok(())
    }
}
