//! Core export pipeline
//!
//! # Modules
//!
//! - [`projection`] - Shape records to format-appropriate rings or paths
//! - [`encode`] - GeoJSON, TopoJSON and Shapefile encoders
//! - [`archive`] - Bundling multi-file outputs into one archive
//! - [`delivery`] - Handing finished buffers to the user
//! - [`export`] - Sessions, per-format triggers and run reports
//!
//! # Export Workflow
//!
//! Every export request is independent:
//!
//! 1. **Project**: materialize shape records for the geometry kind
//! 2. **Encode**: produce one buffer, or a `.shp`/`.shx` pair
//! 3. **Bundle** (multi-file only): open, add each member, seal
//! 4. **Publish**: revoke the previous resource, create and transfer the new one
//!
//! # Example
//!
//! ```rust,no_run
//! use geoexport::config::load_config;
//! use geoexport::core::export::ExportSession;
//! use geoexport::domain::ExportFormat;
//! use geoexport::topology::Dataset;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("geoexport.toml")?;
//! let dataset = Arc::new(Dataset::from_file("parcels.json")?);
//!
//! let session = ExportSession::from_config(&config, dataset)?;
//! let report = session.export_all(&ExportFormat::ALL).await;
//!
//! for (format, receipt) in report.delivered() {
//!     println!("{format}: {}", receipt.location);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod delivery;
pub mod encode;
pub mod export;
pub mod projection;
