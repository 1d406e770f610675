//! Integration tests for logging functionality
//!
//! The global subscriber can be installed only once per process, so a single
//! test covers initialization.

use geoexport::config::LoggingConfig;
use geoexport::domain::{ExportFormat, GeoExportError};
use geoexport::logging::init_logging;
use geoexport::{log_error_with_context, log_export_complete, log_export_start};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let result = init_logging("loud", &LoggingConfig::default());
    assert!(matches!(result, Err(GeoExportError::Configuration(_))));
}

#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");
    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    log_export_start!(ExportFormat::GeoJson, "parcels");
    log_export_complete!(ExportFormat::GeoJson, "parcels.geojson", 42usize, Duration::from_millis(3));
    let error = GeoExportError::Archive("seal failed".to_string());
    log_error_with_context!(&error, "shapefile export failed");

    drop(guard);
    assert!(log_path.join("geoexport.log").exists());
}
