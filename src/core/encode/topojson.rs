//! TopoJSON encoder
//!
//! The full arc table is written once and geometries refer to it by signed
//! index, so shared boundaries are not duplicated. Coordinates are written
//! untransformed (no quantization). Only polygon datasets are supported.

use crate::core::projection::{ProjectedShape, ProjectedShapeSet};
use crate::domain::{Bounds, GeoExportError, GeometryKind, Path, Result};
use crate::topology::{ArcRef, ArcTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level TopoJSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
    pub arcs: Vec<Path>,
    pub objects: BTreeMap<String, GeometryCollection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometries: Vec<TopoGeometry>,
}

/// A geometry expressed as arc references; `kind` is `None` for null shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopoGeometry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arcs: Option<Vec<Vec<Vec<ArcRef>>>>,
}

/// Encodes a polygon shape set as a TopoJSON `Topology`
///
/// `object_name` names the single geometry collection; `bounds`, when given,
/// is written as the topology's `bbox`.
///
/// # Errors
///
/// Returns [`GeoExportError::Unsupported`] for polyline shape sets.
pub fn export_topojson(
    shapes: &ProjectedShapeSet,
    arcs: &ArcTable,
    object_name: &str,
    bounds: Option<Bounds>,
) -> Result<String> {
    let topology = build_topology(shapes, arcs, object_name, bounds)?;
    Ok(serde_json::to_string(&topology)?)
}

fn build_topology(
    shapes: &ProjectedShapeSet,
    arcs: &ArcTable,
    object_name: &str,
    bounds: Option<Bounds>,
) -> Result<Topology> {
    match shapes.kind() {
        GeometryKind::Polygon => {}
        GeometryKind::Polyline => {
            return Err(GeoExportError::Unsupported(
                "TopoJSON export of polyline datasets is not implemented".to_string(),
            ))
        }
    }

    let geometries = shapes
        .shapes()
        .iter()
        .enumerate()
        .map(|(i, shape)| match shape {
            ProjectedShape::Null => Ok(TopoGeometry {
                kind: None,
                arcs: None,
            }),
            ProjectedShape::Polygons(groups) => Ok(TopoGeometry {
                kind: Some(GeometryKind::Polygon.json_type().to_string()),
                arcs: Some(
                    groups
                        .iter()
                        .map(|group| group.iter().map(|ring| ring.arcs.clone()).collect())
                        .collect(),
                ),
            }),
            ProjectedShape::Paths(_) => Err(GeoExportError::Encoding(format!(
                "TopoJSON geometry {i}: open paths in a polygon shape set"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut objects = BTreeMap::new();
    objects.insert(
        object_name.to_string(),
        GeometryCollection {
            kind: "GeometryCollection".to_string(),
            geometries,
        },
    );

    Ok(Topology {
        kind: "Topology".to_string(),
        bbox: bounds.map(|b| b.to_array()),
        arcs: arcs.arcs().to_vec(),
        objects,
    })
}
