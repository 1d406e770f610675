//! Delivery manager
//!
//! Owns the single "current resource" slot. Every publish revokes the previous
//! resource before the host creates the next one, so at most one resource from
//! a manager is live at a time. Concurrent publishes are serialized by the slot
//! lock and the last one wins.

use super::host::{DeliveryHost, ResourceId};
use super::resource::DeliveryResource;
use crate::domain::{DeliveryError, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard};

/// What a successful publish handed to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub resource_id: ResourceId,
    /// Suggested file name
    pub name: String,
    pub size_bytes: usize,
    /// Hex-encoded SHA-256 of the delivered bytes
    pub sha256: String,
    /// Where the host put the file
    pub location: String,
    pub delivered_at: DateTime<Utc>,
}

/// Publishes finished exports through a [`DeliveryHost`]
pub struct DeliveryManager {
    host: Arc<dyn DeliveryHost>,
    current: Mutex<Option<DeliveryResource>>,
}

impl DeliveryManager {
    pub fn new(host: Arc<dyn DeliveryHost>) -> Self {
        Self {
            host,
            current: Mutex::new(None),
        }
    }

    fn slot(&self) -> Result<MutexGuard<'_, Option<DeliveryResource>>> {
        self.current
            .lock()
            .map_err(|e| DeliveryError::SlotPoisoned(e.to_string()).into())
    }

    /// Replaces the current resource with one wrapping `bytes` and starts its transfer
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::GeoExportError::Delivery`] if the host cannot
    /// create the resource or start the transfer. The slot is left empty in
    /// that case; the previous resource has already been revoked.
    pub fn publish(&self, name: &str, bytes: Vec<u8>) -> Result<DeliveryReceipt> {
        let mut slot = self.slot()?;

        if let Some(mut previous) = slot.take() {
            previous.release();
        }

        let id = self.host.create(name, &bytes)?;
        let resource = DeliveryResource::new(id.clone(), name, self.host.clone());
        let location = self.host.begin_transfer(&id, name)?;
        *slot = Some(resource);

        let receipt = DeliveryReceipt {
            resource_id: id,
            name: name.to_string(),
            size_bytes: bytes.len(),
            sha256: calculate_checksum_bytes(&bytes),
            location,
            delivered_at: Utc::now(),
        };
        tracing::info!(
            name = %receipt.name,
            resource = %receipt.resource_id,
            bytes = receipt.size_bytes,
            location = %receipt.location,
            "Published export"
        );
        Ok(receipt)
    }

    /// Identifier of the live resource, if any
    pub fn current(&self) -> Option<ResourceId> {
        self.slot()
            .ok()
            .and_then(|slot| slot.as_ref().map(|r| r.id().clone()))
    }

    /// Revokes the live resource, if any
    pub fn dispose(&self) -> Result<()> {
        if let Some(mut resource) = self.slot()?.take() {
            resource.release();
        }
        Ok(())
    }
}

/// Hex-encoded SHA-256 of raw bytes
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}
