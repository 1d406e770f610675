//! Delivery host capability
//!
//! A host turns a byte buffer into a transient, revocable resource and starts
//! its one-shot transfer to the user. [`DirectoryHost`] stages resources as
//! files and copies them into an output directory; [`MemoryHost`] keeps
//! everything in memory for embedding and tests.

use crate::domain::DeliveryError;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Opaque identifier of a live resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment that exposes delivered buffers to the user
pub trait DeliveryHost: Send + Sync {
    /// Allocates a transient resource wrapping `bytes`
    fn create(&self, name: &str, bytes: &[u8]) -> Result<ResourceId, DeliveryError>;

    /// Starts the one-shot transfer under the suggested file name
    ///
    /// Returns a human-readable location of the delivered file.
    fn begin_transfer(&self, id: &ResourceId, name: &str) -> Result<String, DeliveryError>;

    /// Releases a resource; [`DeliveryError::RevokeUnsupported`] if the host cannot
    fn revoke(&self, id: &ResourceId) -> Result<(), DeliveryError>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DeliveryError> {
    mutex
        .lock()
        .map_err(|e| DeliveryError::SlotPoisoned(e.to_string()))
}

/// Stages resources as files and delivers them into a directory
#[derive(Debug)]
pub struct DirectoryHost {
    staging_dir: PathBuf,
    output_dir: PathBuf,
    staged: Mutex<HashMap<ResourceId, PathBuf>>,
}

impl DirectoryHost {
    pub fn new(staging_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            output_dir: output_dir.into(),
            staged: Mutex::new(HashMap::new()),
        }
    }

    /// Number of staged resources not yet revoked
    pub fn staged_count(&self) -> usize {
        lock(&self.staged).map(|s| s.len()).unwrap_or(0)
    }
}

impl DeliveryHost for DirectoryHost {
    fn create(&self, name: &str, bytes: &[u8]) -> Result<ResourceId, DeliveryError> {
        fs::create_dir_all(&self.staging_dir).map_err(|e| {
            DeliveryError::CreationFailed(format!(
                "cannot create staging directory {}: {}",
                self.staging_dir.display(),
                e
            ))
        })?;
        let id = ResourceId::new(uuid::Uuid::new_v4().to_string());
        let path = self.staging_dir.join(format!("{}-{}", id, name));
        fs::write(&path, bytes).map_err(|e| {
            DeliveryError::CreationFailed(format!("cannot stage {}: {}", path.display(), e))
        })?;
        lock(&self.staged)?.insert(id.clone(), path);
        Ok(id)
    }

    fn begin_transfer(&self, id: &ResourceId, name: &str) -> Result<String, DeliveryError> {
        let staged = lock(&self.staged)?
            .get(id)
            .cloned()
            .ok_or_else(|| DeliveryError::TransferFailed(format!("unknown resource {id}")))?;
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            DeliveryError::TransferFailed(format!(
                "cannot create output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;
        let target = self.output_dir.join(name);
        fs::copy(&staged, &target).map_err(|e| {
            DeliveryError::TransferFailed(format!("cannot write {}: {}", target.display(), e))
        })?;
        Ok(target.display().to_string())
    }

    fn revoke(&self, id: &ResourceId) -> Result<(), DeliveryError> {
        let Some(path) = lock(&self.staged)?.remove(id) else {
            return Ok(());
        };
        fs::remove_file(&path).map_err(|e| DeliveryError::RevokeFailed {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A buffer handed to the user through [`MemoryHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub id: ResourceId,
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    live: HashMap<ResourceId, Vec<u8>>,
    transfers: Vec<Transfer>,
    log: Vec<String>,
}

/// Keeps resources and completed transfers in memory
#[derive(Debug, Clone)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryState>>,
    supports_revoke: bool,
    fail_create: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            supports_revoke: true,
            fail_create: false,
        }
    }

    /// A host without revocation; resources stay live until the host is dropped
    pub fn without_revoke() -> Self {
        Self {
            supports_revoke: false,
            ..Self::new()
        }
    }

    /// A host that cannot create resources at all
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::new()
        }
    }

    pub fn live_count(&self) -> usize {
        lock(&self.state).map(|s| s.live.len()).unwrap_or(0)
    }

    pub fn is_live(&self, id: &ResourceId) -> bool {
        lock(&self.state)
            .map(|s| s.live.contains_key(id))
            .unwrap_or(false)
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        lock(&self.state)
            .map(|s| s.transfers.clone())
            .unwrap_or_default()
    }

    /// `create:<name>`, `transfer:<name>` and `revoke:<id>` entries in call order
    pub fn log(&self) -> Vec<String> {
        lock(&self.state).map(|s| s.log.clone()).unwrap_or_default()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryHost for MemoryHost {
    fn create(&self, name: &str, bytes: &[u8]) -> Result<ResourceId, DeliveryError> {
        if self.fail_create {
            return Err(DeliveryError::CreationFailed(
                "host has no transfer mechanism".to_string(),
            ));
        }
        let mut state = lock(&self.state)?;
        state.next_id += 1;
        let id = ResourceId::new(format!("mem-{}", state.next_id));
        state.live.insert(id.clone(), bytes.to_vec());
        state.log.push(format!("create:{name}"));
        Ok(id)
    }

    fn begin_transfer(&self, id: &ResourceId, name: &str) -> Result<String, DeliveryError> {
        let mut state = lock(&self.state)?;
        let bytes = state
            .live
            .get(id)
            .cloned()
            .ok_or_else(|| DeliveryError::TransferFailed(format!("unknown resource {id}")))?;
        state.transfers.push(Transfer {
            id: id.clone(),
            name: name.to_string(),
            bytes,
        });
        state.log.push(format!("transfer:{name}"));
        Ok(format!("memory://{id}/{name}"))
    }

    fn revoke(&self, id: &ResourceId) -> Result<(), DeliveryError> {
        if !self.supports_revoke {
            return Err(DeliveryError::RevokeUnsupported);
        }
        let mut state = lock(&self.state)?;
        state.live.remove(id);
        state.log.push(format!("revoke:{id}"));
        Ok(())
    }
}
