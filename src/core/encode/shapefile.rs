//! ESRI Shapefile encoder (`.shp` + `.shx`)
//!
//! Layout per the ESRI Shapefile Technical Description:
//!
//! - 100-byte header: file code and file length big-endian, version, shape
//!   type and bounding box little-endian. Lengths are in 16-bit words.
//! - `.shp` records: big-endian record number (1-based) and content length,
//!   then little-endian content (shape type, box, part count, point count,
//!   part start indices, points).
//! - `.shx` records: big-endian offset and content length of each `.shp`
//!   record, so both files stay consistent by construction.

use crate::core::projection::{ProjectedShape, ProjectedShapeSet};
use crate::domain::{Bounds, GeoExportError, Result};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

pub const FILE_CODE: i32 = 9994;
pub const VERSION: i32 = 1000;
pub const HEADER_BYTES: usize = 100;
pub const NULL_SHAPE: i32 = 0;

/// Encoded `.shp` and `.shx` buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapefileOutput {
    pub shp: Vec<u8>,
    pub shx: Vec<u8>,
}

/// Decoded main file header, shared by `.shp` and `.shx`
#[derive(Debug, Clone, PartialEq)]
pub struct ShapefileHeader {
    /// Total file length in 16-bit words
    pub file_length_words: i32,
    pub shape_type: i32,
    /// `[xmin, ymin, xmax, ymax]`
    pub bbox: [f64; 4],
}

/// Encodes the shape set; the shape type follows the geometry kind (5 or 3)
pub fn export_shapefile(shapes: &ProjectedShapeSet) -> Result<ShapefileOutput> {
    let shape_type = shapes.kind().shape_type();
    let records = shapes
        .shapes()
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            encode_record(shape_type, shape)
                .map_err(|e| GeoExportError::Encoding(format!("shapefile record {}: {e}", i + 1)))
        })
        .collect::<Result<Vec<_>>>()?;

    let shp_bytes = HEADER_BYTES + records.iter().map(|r| 8 + r.len()).sum::<usize>();
    let shx_bytes = HEADER_BYTES + 8 * records.len();
    let bounds = shapes.bounds();

    let mut shp = Vec::with_capacity(shp_bytes);
    let mut shx = Vec::with_capacity(shx_bytes);
    write_header(&mut shp, shape_type, words(shp_bytes)?, bounds)?;
    write_header(&mut shx, shape_type, words(shx_bytes)?, bounds)?;

    let mut offset = HEADER_BYTES;
    for (i, content) in records.iter().enumerate() {
        let content_words = words(content.len())?;
        shp.write_i32::<BigEndian>(i as i32 + 1)?;
        shp.write_i32::<BigEndian>(content_words)?;
        shp.extend_from_slice(content);

        shx.write_i32::<BigEndian>(words(offset)?)?;
        shx.write_i32::<BigEndian>(content_words)?;
        offset += 8 + content.len();
    }

    tracing::debug!(
        records = records.len(),
        shp_bytes = shp.len(),
        shx_bytes = shx.len(),
        shape_type,
        "Encoded shapefile"
    );

    Ok(ShapefileOutput { shp, shx })
}

/// Reads the 100-byte header of a `.shp` or `.shx` buffer
pub fn read_header(bytes: &[u8]) -> Result<ShapefileHeader> {
    if bytes.len() < HEADER_BYTES {
        return Err(GeoExportError::Encoding(format!(
            "shapefile header needs {HEADER_BYTES} bytes, got {}",
            bytes.len()
        )));
    }
    let mut cursor = Cursor::new(bytes);
    let file_code = cursor.read_i32::<BigEndian>()?;
    if file_code != FILE_CODE {
        return Err(GeoExportError::Encoding(format!(
            "unexpected file code {file_code}"
        )));
    }
    cursor.set_position(24);
    let file_length_words = cursor.read_i32::<BigEndian>()?;
    let _version = cursor.read_i32::<LittleEndian>()?;
    let shape_type = cursor.read_i32::<LittleEndian>()?;
    let mut bbox = [0.0; 4];
    for v in bbox.iter_mut() {
        *v = cursor.read_f64::<LittleEndian>()?;
    }
    Ok(ShapefileHeader {
        file_length_words,
        shape_type,
        bbox,
    })
}

fn write_header(
    out: &mut Vec<u8>,
    shape_type: i32,
    length_words: i32,
    bounds: Option<Bounds>,
) -> Result<()> {
    out.write_i32::<BigEndian>(FILE_CODE)?;
    for _ in 0..5 {
        out.write_i32::<BigEndian>(0)?;
    }
    out.write_i32::<BigEndian>(length_words)?;
    out.write_i32::<LittleEndian>(VERSION)?;
    out.write_i32::<LittleEndian>(shape_type)?;
    let bbox = bounds.map(|b| b.to_array()).unwrap_or([0.0; 4]);
    for v in bbox {
        out.write_f64::<LittleEndian>(v)?;
    }
    // z and m ranges
    for _ in 0..4 {
        out.write_f64::<LittleEndian>(0.0)?;
    }
    Ok(())
}

fn encode_record(shape_type: i32, shape: &ProjectedShape) -> Result<Vec<u8>> {
    let mut content = Vec::new();
    let Some(bounds) = shape.bounds() else {
        content.write_i32::<LittleEndian>(NULL_SHAPE)?;
        return Ok(content);
    };

    let parts: Vec<_> = shape.paths().collect();
    let num_points: usize = parts.iter().map(|p| p.coords.len()).sum();

    content.write_i32::<LittleEndian>(shape_type)?;
    for v in bounds.to_array() {
        content.write_f64::<LittleEndian>(v)?;
    }
    content.write_i32::<LittleEndian>(count(parts.len())?)?;
    content.write_i32::<LittleEndian>(count(num_points)?)?;

    let mut start = 0usize;
    for part in &parts {
        content.write_i32::<LittleEndian>(count(start)?)?;
        start += part.coords.len();
    }
    for part in &parts {
        for p in &part.coords {
            content.write_f64::<LittleEndian>(p[0])?;
            content.write_f64::<LittleEndian>(p[1])?;
        }
    }
    Ok(content)
}

fn words(bytes: usize) -> Result<i32> {
    i32::try_from(bytes / 2)
        .map_err(|_| GeoExportError::Encoding(format!("{bytes} bytes exceed the shapefile size limit")))
}

fn count(n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| GeoExportError::Encoding(format!("count {n} exceeds i32")))
}
