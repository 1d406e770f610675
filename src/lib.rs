// geoexport - Topological vector dataset exporter
// Copyright (c) 2025 geoexport Contributors
// Licensed under the MIT License

//! # geoexport - Topological vector dataset exporter
//!
//! geoexport serializes an in-memory topological vector dataset (a shared arc
//! table plus shape records that reference it) into three interchange formats
//! and hands the result to the user.
//!
//! ## Overview
//!
//! - **GeoJSON** (`.geojson`): a `FeatureCollection` with coordinates inlined
//! - **TopoJSON** (`.topojson`): the arc table written once, shapes as arc references
//! - **Shapefile** (`.zip`): `.shp` and `.shx` bundled into a ZIP archive
//!
//! Each export request is independent and runs project → encode → bundle →
//! deliver. Delivery keeps at most one live resource: a new export revokes the
//! previous one before the next is created.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Projection, encoders, archive bundling, delivery and sessions
//! - [`topology`] - Arc table, shape records and ring grouping
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geoexport::config::ExportConfig;
//! use geoexport::core::archive::ZipArchiveFactory;
//! use geoexport::core::delivery::DirectoryHost;
//! use geoexport::core::export::ExportSession;
//! use geoexport::domain::{ExportFormat, GeometryKind};
//! use geoexport::topology::Dataset;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Arc::new(Dataset::from_file("parcels.json")?);
//!     let config = ExportConfig::for_geometry(GeometryKind::Polygon).with_output_name("parcels");
//!
//!     let session = ExportSession::new(
//!         &config,
//!         dataset,
//!         Arc::new(ZipArchiveFactory),
//!         Arc::new(DirectoryHost::new("/tmp/staging", "exports")),
//!     )?;
//!
//!     if let Some(receipt) = session.export(ExportFormat::Shapefile).await? {
//!         println!("Wrote {} ({} bytes)", receipt.location, receipt.size_bytes);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], whose error type is
//! [`domain::GeoExportError`]:
//!
//! ```rust,no_run
//! use geoexport::domain::GeoExportError;
//!
//! fn example() -> Result<(), GeoExportError> {
//!     let config = geoexport::config::load_config("geoexport.toml")?;
//!     println!("{}", config.export.geometry);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod topology;
