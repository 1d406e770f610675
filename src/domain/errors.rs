//! Domain error types
//!
//! This module defines the error hierarchy for GeoExport. Every failure is local
//! to one export request; the variants mirror the places a request can fail.
//! Third-party error types are converted at the boundary and never exposed.

use thiserror::Error;

/// Main GeoExport error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum GeoExportError {
    /// Configuration-related errors (raised eagerly, before any export runs)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed topology or shape references found while projecting
    #[error("Projection error: {0}")]
    Projection(String),

    /// A format encoder could not produce its output
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The requested format/geometry combination is not implemented
    #[error("Unsupported export: {0}")]
    Unsupported(String),

    /// The archive writer failed to add a member or to seal
    #[error("Archive error: {0}")]
    Archive(String),

    /// The delivery host could not create or hand over a resource
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl GeoExportError {
    /// Whether the error comes from the host environment rather than from the data
    pub fn is_environment_limitation(&self) -> bool {
        matches!(
            self,
            GeoExportError::Delivery(DeliveryError::CreationFailed(_))
                | GeoExportError::Delivery(DeliveryError::TransferFailed(_))
        )
    }
}

/// Delivery-specific errors
///
/// Errors reported by a delivery host. Creation and transfer failures mean the
/// environment cannot support the download mechanism.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The host cannot allocate a transient resource
    #[error("This environment doesn't support saving files: {0}")]
    CreationFailed(String),

    /// The host accepted the resource but could not start the transfer
    #[error("Failed to start transfer: {0}")]
    TransferFailed(String),

    /// The host has no revocation capability
    #[error("Revocation is not supported by this host")]
    RevokeUnsupported,

    /// Revocation was attempted and failed
    #[error("Failed to revoke resource {id}: {reason}")]
    RevokeFailed { id: String, reason: String },

    /// The current-resource slot was poisoned by a panicking publisher
    #[error("Delivery slot is unavailable: {0}")]
    SlotPoisoned(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for GeoExportError {
    fn from(err: std::io::Error) -> Self {
        GeoExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GeoExportError {
    fn from(err: serde_json::Error) -> Self {
        GeoExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GeoExportError {
    fn from(err: toml::de::Error) -> Self {
        GeoExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for GeoExportError {
    fn from(err: zip::result::ZipError) -> Self {
        GeoExportError::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeoExportError::Configuration("unexpected geometry type: point".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: unexpected geometry type: point"
        );
    }

    #[test]
    fn test_delivery_error_conversion() {
        let err: GeoExportError = DeliveryError::CreationFailed("no disk".to_string()).into();
        assert!(matches!(err, GeoExportError::Delivery(_)));
        assert!(err.is_environment_limitation());
    }

    #[test]
    fn test_data_errors_are_not_environment_limitations() {
        assert!(!GeoExportError::Projection("bad arc".to_string()).is_environment_limitation());
        assert!(!GeoExportError::Archive("add failed".to_string()).is_environment_limitation());
        let revoke: GeoExportError = DeliveryError::RevokeUnsupported.into();
        assert!(!revoke.is_environment_limitation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: GeoExportError = io_err.into();
        assert!(matches!(err, GeoExportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: GeoExportError = json_err.into();
        assert!(matches!(err, GeoExportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: GeoExportError = toml_err.into();
        assert!(matches!(err, GeoExportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_implements_std_error() {
        let err = GeoExportError::Encoding("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
