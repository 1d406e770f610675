//! Logging and observability
//!
//! Structured logging through `tracing`, with an optional rotating JSON file
//! layer, plus a few macros that keep export log events uniform.
//!
//! # Example
//!
//! ```no_run
//! use geoexport::logging::init_logging;
//! use geoexport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export
///
/// # Example
///
/// ```no_run
/// use geoexport::log_export_start;
/// use geoexport::domain::ExportFormat;
///
/// log_export_start!(ExportFormat::GeoJson, "parcels");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($format:expr, $name:expr) => {
        tracing::info!(
            format = %$format,
            output_name = %$name,
            "Starting export"
        );
    };
}

/// Log the completion of an export
///
/// # Example
///
/// ```no_run
/// use geoexport::log_export_complete;
/// use geoexport::domain::ExportFormat;
/// use std::time::Duration;
///
/// log_export_complete!(ExportFormat::Shapefile, "parcels.zip", 2048, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($format:expr, $file:expr, $bytes:expr, $duration:expr) => {
        tracing::info!(
            format = %$format,
            file = %$file,
            bytes = $bytes,
            duration_ms = $duration.as_millis(),
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use geoexport::log_error_with_context;
/// use geoexport::domain::GeoExportError;
///
/// let error = GeoExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
