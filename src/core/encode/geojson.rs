//! GeoJSON encoder
//!
//! Writes a `FeatureCollection` with one feature per projected shape. Null
//! shapes become features with `"geometry": null`.

use crate::core::projection::{ProjectedShape, ProjectedShapeSet};
use crate::domain::{GeoExportError, GeometryKind, Path, Result};
use serde::Serialize;

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    geometry: Option<Geometry<'a>>,
}

#[derive(Serialize)]
struct Geometry<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Coordinates<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Coordinates<'a> {
    MultiPolygon(Vec<Vec<&'a Path>>),
    MultiLineString(Vec<&'a Path>),
}

/// Encodes a projected shape set as a GeoJSON `FeatureCollection`
pub fn export_geojson(shapes: &ProjectedShapeSet) -> Result<String> {
    let kind = shapes.kind();
    let features = shapes
        .shapes()
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            Ok(Feature {
                kind: "Feature",
                properties: None,
                geometry: geometry(kind, shape).map_err(|msg| {
                    GeoExportError::Encoding(format!("GeoJSON feature {i}: {msg}"))
                })?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features,
    };
    Ok(serde_json::to_string(&collection)?)
}

fn geometry<'a>(
    kind: GeometryKind,
    shape: &'a ProjectedShape,
) -> std::result::Result<Option<Geometry<'a>>, String> {
    let coordinates = match (kind, shape) {
        (_, ProjectedShape::Null) => return Ok(None),
        (GeometryKind::Polygon, ProjectedShape::Polygons(groups)) => Coordinates::MultiPolygon(
            groups
                .iter()
                .map(|group| group.iter().map(|ring| &ring.coords).collect())
                .collect(),
        ),
        (GeometryKind::Polyline, ProjectedShape::Paths(paths)) => {
            Coordinates::MultiLineString(paths.iter().map(|p| &p.coords).collect())
        }
        (kind, _) => return Err(format!("shape does not match geometry kind {kind}")),
    };
    Ok(Some(Geometry {
        kind: kind.json_type(),
        coordinates,
    }))
}
