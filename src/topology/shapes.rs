//! Shape records and the dataset that owns them

use super::arcs::{ArcRef, ArcTable};
use crate::domain::{Bounds, GeoExportError, Path, Result};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

/// One feature's geometry expressed as references into the arc table
///
/// Each part is a sequence of arcs joined end to end. A record with no parts
/// is a null shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeRecord {
    parts: Vec<Vec<ArcRef>>,
}

impl ShapeRecord {
    /// Builds a record from raw signed arc ids
    pub fn from_raw(parts: Vec<Vec<i32>>) -> Self {
        Self {
            parts: parts
                .into_iter()
                .map(|part| part.into_iter().map(ArcRef::from_raw).collect())
                .collect(),
        }
    }

    pub fn parts(&self) -> &[Vec<ArcRef>] {
        &self.parts
    }

    pub fn is_null(&self) -> bool {
        self.parts.iter().all(|p| p.is_empty())
    }

    /// Every referenced arc, in order of appearance
    pub fn arc_refs(&self) -> impl Iterator<Item = ArcRef> + '_ {
        self.parts.iter().flatten().copied()
    }
}

/// Serialized form of a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDocument {
    pub arcs: Vec<Path>,
    #[serde(default)]
    pub shapes: Vec<Vec<Vec<i32>>>,
}

/// Arc table plus the ordered shape records that reference it
///
/// Immutable once built; exports only ever read it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    arcs: ArcTable,
    shapes: Vec<ShapeRecord>,
}

impl Dataset {
    /// Builds a dataset, checking that every arc reference is in range
    pub fn new(arcs: ArcTable, shapes: Vec<ShapeRecord>) -> Result<Self> {
        for (shape_id, shape) in shapes.iter().enumerate() {
            if let Some(bad) = shape.arc_refs().find(|r| !arcs.contains(*r)) {
                return Err(GeoExportError::Projection(format!(
                    "shape {shape_id} references arc {bad}, but the table has {} arcs",
                    arcs.len()
                )));
            }
        }
        Ok(Self { arcs, shapes })
    }

    pub fn from_document(doc: DatasetDocument) -> Result<Self> {
        let arcs = ArcTable::new(doc.arcs)?;
        let shapes = doc.shapes.into_iter().map(ShapeRecord::from_raw).collect();
        Self::new(arcs, shapes)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let doc: DatasetDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Loads a dataset document from disk
    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GeoExportError::Io(format!("Failed to read dataset {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn arcs(&self) -> &ArcTable {
        &self.arcs
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.arcs.bounds()
    }
}
