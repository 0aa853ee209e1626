//! Webhook payload decoding.
//!
//! This is the only place where an inbound document is validated. A payload
//! that decodes here is safe to persist without further checks.

use crate::{
    core::alert_group::AlertGroup,
    errors::{Error, Result},
};

/// The alert webhook data version accepted by this service
pub const SUPPORTED_WEBHOOK_VERSION: &str = "4";

/// Decodes a raw webhook body into an [`AlertGroup`].
///
/// Fails with [`Error::Decode`] when the bytes are not a webhook document and
/// with [`Error::UnsupportedVersion`] when the declared version is anything
/// other than [`SUPPORTED_WEBHOOK_VERSION`].
pub fn decode(payload: &[u8]) -> Result<AlertGroup> {
    let group: AlertGroup = serde_json::from_slice(payload)?;

    if group.version != SUPPORTED_WEBHOOK_VERSION {
        return Err(Error::UnsupportedVersion {
            found: group.version,
        });
    }

    Ok(group)
}
