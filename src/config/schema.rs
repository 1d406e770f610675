//! Configuration schema types
//!
//! Maps one-to-one onto the TOML file. Every section validates itself and
//! [`GeoExportConfig::validate`] runs them all, so a loaded configuration is
//! known-good before any export is attempted.

use crate::domain::{Bounds, ExportFormat, GeometryKind, OutputName};
use crate::core::encode::DEFAULT_TOPOJSON_OBJECT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Where finished exports are delivered
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GeoExportConfig {
    /// Builds a configuration with defaults everywhere except the export section
    pub fn new(export: ExportConfig) -> Self {
        Self {
            application: ApplicationConfig::default(),
            export,
            delivery: DeliveryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.delivery.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Geometry kind of the dataset (`polygon` or `polyline`)
    pub geometry: String,

    /// Base name of exported files, `out` when absent
    #[serde(default)]
    pub output_name: Option<String>,

    /// Explicit `[xmin, ymin, xmax, ymax]`; computed from the arcs when absent
    #[serde(default)]
    pub bounds: Option<[f64; 4]>,

    /// Formats produced by `geoexport export` when none are given on the command line
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,
}

impl ExportConfig {
    /// Export settings for `kind` with every other field defaulted
    pub fn for_geometry(kind: GeometryKind) -> Self {
        Self {
            geometry: kind.as_str().to_string(),
            output_name: None,
            bounds: None,
            formats: default_formats(),
        }
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn with_bounds(mut self, bounds: [f64; 4]) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn geometry_kind(&self) -> Result<GeometryKind, String> {
        self.geometry.parse().map_err(|_| {
            format!(
                "Invalid export.geometry '{}'. Must be one of: polygon, polyline",
                self.geometry
            )
        })
    }

    pub fn output_name(&self) -> Result<OutputName, String> {
        OutputName::or_fallback(self.output_name.as_deref())
            .map_err(|e| format!("Invalid export.output_name: {e}"))
    }

    /// TopoJSON object name: the configured output name, or `features`
    pub fn object_name(&self) -> String {
        self.output_name
            .clone()
            .unwrap_or_else(|| DEFAULT_TOPOJSON_OBJECT.to_string())
    }

    pub fn bounds(&self) -> Result<Option<Bounds>, String> {
        self.bounds
            .map(Bounds::try_from_array)
            .transpose()
            .map_err(|e| format!("Invalid export.bounds: {e}"))
    }

    fn validate(&self) -> Result<(), String> {
        self.geometry_kind()?;
        self.output_name()?;
        self.bounds()?;
        if self.formats.is_empty() {
            return Err("export.formats cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Directory that receives finished exports
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory holding staged, revocable resources
    ///
    /// Defaults to a `geoexport-staging` directory under the system temp dir.
    #[serde(default)]
    pub staging_dir: Option<String>,
}

impl DeliveryConfig {
    pub fn staging_path(&self) -> PathBuf {
        self.staging_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("geoexport-staging"))
    }

    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("delivery.output_dir cannot be empty".to_string());
        }
        if self
            .staging_dir
            .as_ref()
            .is_some_and(|dir| dir.trim().is_empty())
        {
            return Err("delivery.staging_dir cannot be empty when set".to_string());
        }
        Ok(())
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            staging_dir: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_formats() -> Vec<ExportFormat> {
    ExportFormat::ALL.to_vec()
}

fn default_output_dir() -> String {
    "exports".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
        };
        assert!(config.validate().is_ok());

        config.log_level = "WARN".to_string();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_geometry() {
        let config = ExportConfig::for_geometry(GeometryKind::Polyline);
        assert_eq!(config.geometry_kind().unwrap(), GeometryKind::Polyline);
        assert!(config.validate().is_ok());

        let mut config = ExportConfig::for_geometry(GeometryKind::Polygon);
        config.geometry = "point".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("export.geometry"));
    }

    #[test]
    fn test_export_config_output_name() {
        let config = ExportConfig::for_geometry(GeometryKind::Polygon);
        assert_eq!(config.output_name().unwrap().as_str(), "out");
        assert_eq!(config.object_name(), "features");

        let config = config.with_output_name("parcels");
        assert_eq!(config.output_name().unwrap().as_str(), "parcels");
        assert_eq!(config.object_name(), "parcels");

        let config = config.with_output_name("a/b");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_bounds() {
        let config = ExportConfig::for_geometry(GeometryKind::Polygon).with_bounds([0.0, 0.0, 2.0, 1.0]);
        let bounds = config.bounds().unwrap().unwrap();
        assert_eq!(bounds.to_array(), [0.0, 0.0, 2.0, 1.0]);

        let config = config.with_bounds([3.0, 0.0, 2.0, 1.0]);
        assert!(config.validate().is_err());

        let config = config.with_bounds([0.0, f64::NAN, 2.0, 1.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_formats_not_empty() {
        let mut config = ExportConfig::for_geometry(GeometryKind::Polygon);
        assert_eq!(config.formats, ExportFormat::ALL.to_vec());
        config.formats.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delivery_config_validation() {
        let mut config = DeliveryConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.staging_path().ends_with("geoexport-staging"));

        config.staging_dir = Some("/tmp/stage".to_string());
        assert_eq!(config.staging_path(), PathBuf::from("/tmp/stage"));

        config.output_dir = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_full_config_validation() {
        let config = GeoExportConfig::new(ExportConfig::for_geometry(GeometryKind::Polygon));
        assert!(config.validate().is_ok());

        let mut bad = config.clone();
        bad.application.log_level = "loud".to_string();
        assert!(bad.validate().is_err());
    }
}
