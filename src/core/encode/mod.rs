//! Format encoders
//!
//! Three stateless encoders consume a [`ProjectedShapeSet`]:
//!
//! - [`geojson`] - one `FeatureCollection` text buffer
//! - [`topojson`] - one `Topology` text buffer sharing the arc table
//! - [`shapefile`] - a `.shp`/`.shx` buffer pair
//!
//! [`encode`] dispatches on [`ExportFormat`] and names the buffers after the
//! configured output name.

pub mod geojson;
pub mod shapefile;
pub mod topojson;

use crate::core::projection::ProjectedShapeSet;
use crate::domain::{Bounds, ExportFormat, OutputName, Result};
use crate::topology::ArcTable;

/// Object name used inside TopoJSON when no output name is configured
pub const DEFAULT_TOPOJSON_OBJECT: &str = "features";

/// A named, immutable byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBuffer {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedBuffer {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Output of one encoder run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedOutput {
    /// Delivered as is
    Single(NamedBuffer),
    /// Must be bundled into an archive before delivery, members in this order
    MultiFile(Vec<NamedBuffer>),
}

/// Everything besides the projected shapes an encoder may need
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    pub arcs: &'a ArcTable,
    pub bounds: Option<Bounds>,
    pub output_name: &'a OutputName,
    /// TopoJSON object name
    pub object_name: &'a str,
}

/// Runs the encoder for `format`
///
/// # Errors
///
/// Returns [`crate::domain::GeoExportError::Unsupported`] for polyline
/// TopoJSON and [`crate::domain::GeoExportError::Encoding`] for geometry the
/// encoder cannot represent.
pub fn encode(
    format: ExportFormat,
    shapes: &ProjectedShapeSet,
    ctx: &EncodeContext<'_>,
) -> Result<EncodedOutput> {
    let output = match format {
        ExportFormat::GeoJson => {
            let json = geojson::export_geojson(shapes)?;
            EncodedOutput::Single(NamedBuffer::new(
                ctx.output_name.file_name(format.extension()),
                json.into_bytes(),
            ))
        }
        ExportFormat::TopoJson => {
            let json = topojson::export_topojson(shapes, ctx.arcs, ctx.object_name, ctx.bounds)?;
            EncodedOutput::Single(NamedBuffer::new(
                ctx.output_name.file_name(format.extension()),
                json.into_bytes(),
            ))
        }
        ExportFormat::Shapefile => {
            let files = shapefile::export_shapefile(shapes)?;
            EncodedOutput::MultiFile(vec![
                NamedBuffer::new(ctx.output_name.file_name("shp"), files.shp),
                NamedBuffer::new(ctx.output_name.file_name("shx"), files.shx),
            ])
        }
    };
    Ok(output)
}
