//! Delivery of finished exports
//!
//! - [`host`] - the host capability ([`DirectoryHost`], [`MemoryHost`])
//! - [`resource`] - the owned, self-revoking [`DeliveryResource`] handle
//! - [`manager`] - the single-slot [`DeliveryManager`]

pub mod host;
pub mod manager;
pub mod resource;

pub use host::{DeliveryHost, DirectoryHost, MemoryHost, ResourceId, Transfer};
pub use manager::{calculate_checksum_bytes, DeliveryManager, DeliveryReceipt};
pub use resource::DeliveryResource;
