//! Owned delivery resource handle

use super::host::{DeliveryHost, ResourceId};
use crate::domain::DeliveryError;
use std::fmt;
use std::sync::Arc;

/// A live, revocable resource issued by a [`DeliveryHost`]
///
/// The handle revokes itself when dropped, so replacing or discarding it
/// always releases the underlying resource. Revocation is best-effort: a
/// host without the capability only produces a warning.
pub struct DeliveryResource {
    id: ResourceId,
    name: String,
    host: Arc<dyn DeliveryHost>,
    released: bool,
}

impl DeliveryResource {
    pub(crate) fn new(id: ResourceId, name: impl Into<String>, host: Arc<dyn DeliveryHost>) -> Self {
        Self {
            id,
            name: name.into(),
            host,
            released: false,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Suggested file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Revokes the resource; later calls are no-ops
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match self.host.revoke(&self.id) {
            Ok(()) => {
                tracing::debug!(resource = %self.id, name = %self.name, "Revoked delivery resource");
            }
            Err(DeliveryError::RevokeUnsupported) => {
                tracing::warn!(
                    resource = %self.id,
                    name = %self.name,
                    "Host cannot revoke delivery resources, leaving it live"
                );
            }
            Err(e) => {
                tracing::warn!(resource = %self.id, error = %e, "Failed to revoke delivery resource");
            }
        }
    }
}

impl Drop for DeliveryResource {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for DeliveryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryResource")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("released", &self.released)
            .finish()
    }
}
