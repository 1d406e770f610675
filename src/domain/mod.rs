//! Domain types for GeoExport.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Geometry primitives** ([`Point`], [`Path`], [`Bounds`])
//! - **Closed enumerations** ([`GeometryKind`], [`ExportFormat`])
//! - **Validated names** ([`OutputName`])
//! - **Error types** ([`GeoExportError`], [`DeliveryError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, GeoExportError>`]:
//!
//! ```rust
//! use geoexport::domain::{GeometryKind, Result};
//!
//! fn example() -> Result<GeometryKind> {
//!     // Invalid geometry kinds are configuration errors
//!     let kind: GeometryKind = "polygon".parse()?;
//!     Ok(kind)
//! }
//! ```

pub mod errors;
pub mod geometry;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{DeliveryError, GeoExportError};
pub use geometry::{Bounds, ExportFormat, GeometryKind, Path, Point};
pub use ids::{OutputName, FALLBACK_OUTPUT_NAME};
pub use result::Result;
