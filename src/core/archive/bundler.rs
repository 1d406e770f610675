//! Archive bundler
//!
//! Folds named buffers into a single archive: open, add each member and wait
//! for it, then seal. A failed add aborts the bundle before sealing, so no
//! partial archive ever reaches delivery.

use super::writer::ArchiveFactory;
use crate::core::encode::NamedBuffer;
use crate::domain::{GeoExportError, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Bundles encoder outputs into one archive buffer
#[derive(Clone)]
pub struct ArchiveBundler {
    factory: Arc<dyn ArchiveFactory>,
}

impl ArchiveBundler {
    pub fn new(factory: Arc<dyn ArchiveFactory>) -> Self {
        Self { factory }
    }

    /// Adds `members` in order and seals the archive
    ///
    /// # Errors
    ///
    /// Returns [`GeoExportError::Archive`] if there is nothing to bundle, if
    /// two members share a name, or if opening, adding or sealing fails.
    pub async fn bundle(&self, members: Vec<NamedBuffer>) -> Result<Vec<u8>> {
        if members.is_empty() {
            return Err(GeoExportError::Archive("no members to bundle".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = members.iter().find(|m| !seen.insert(m.name.as_str())) {
            return Err(GeoExportError::Archive(format!(
                "duplicate archive member '{}'",
                dup.name
            )));
        }

        let mut writer = self.factory.open().await.map_err(as_archive_error)?;
        let count = members.len();

        for member in members {
            let size = member.bytes.len();
            writer
                .add(&member.name, member.bytes)
                .await
                .map_err(|e| {
                    tracing::error!(member = %member.name, error = %e, "Failed to add archive member");
                    GeoExportError::Archive(format!("failed to add '{}': {}", member.name, e))
                })?;
            tracing::debug!(member = %member.name, bytes = size, "Added archive member");
        }

        let archive = writer.seal().await.map_err(as_archive_error)?;
        tracing::debug!(members = count, bytes = archive.len(), "Sealed archive");
        Ok(archive)
    }
}

fn as_archive_error(err: GeoExportError) -> GeoExportError {
    match err {
        GeoExportError::Archive(_) => err,
        other => GeoExportError::Archive(other.to_string()),
    }
}
