//! Configuration management for geoexport
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `GEOEXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Eager validation, so a bad file fails before any export starts
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use geoexport::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("geoexport.toml")?;
//! println!("Geometry: {}", config.export.geometry);
//! println!("Output dir: {}", config.delivery.output_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! geometry = "polygon"
//! output_name = "parcels"
//! bounds = [0.0, 0.0, 100.0, 50.0]
//!
//! [delivery]
//! output_dir = "${GEOEXPORT_OUT}"
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, DeliveryConfig, ExportConfig, GeoExportConfig, LoggingConfig};

/// Commented sample written by `geoexport init`
pub const SAMPLE_CONFIG: &str = r#"# geoexport configuration

[application]
# trace | debug | info | warn | error
log_level = "info"

[export]
# polygon | polyline
geometry = "polygon"

# Base name of exported files; "out" when omitted.
# Also names the TopoJSON object ("features" when omitted).
# output_name = "parcels"

# Explicit [xmin, ymin, xmax, ymax]; computed from the arcs when omitted.
# bounds = [0.0, 0.0, 100.0, 100.0]

# Formats produced by `geoexport export` without --format
formats = ["geojson", "topojson", "shapefile"]

[delivery]
output_dir = "exports"
# staging_dir = "/tmp/geoexport-staging"

[logging]
local_enabled = false
local_path = "logs"
# daily | hourly | never
local_rotation = "daily"
"#;
