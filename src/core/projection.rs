//! Shape projection
//!
//! Turns shape records into the model each encoder expects: grouped closed
//! rings for polygons, open paths for polylines. Every projected path keeps
//! both its arc references (for TopoJSON) and its resolved coordinates (for
//! GeoJSON and Shapefile). The arc table is only read.

use crate::domain::{Bounds, GeoExportError, GeometryKind, Path, Result};
use crate::topology::rings::{group_rings, is_closed_ring, signed_area};
use crate::topology::{ArcRef, ArcTable, ShapeRecord};

/// One resolved part of a shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedPath {
    /// Arcs the path was joined from
    pub arcs: Vec<ArcRef>,
    /// Joined coordinates
    pub coords: Path,
}

impl ProjectedPath {
    /// The path walked backwards, arcs flipped to match
    fn reversed(self) -> Self {
        let ProjectedPath { mut arcs, mut coords } = self;
        arcs.reverse();
        arcs.iter_mut().for_each(|arc| *arc = arc.flip());
        coords.reverse();
        Self { arcs, coords }
    }
}

/// One projected feature
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectedShape {
    /// Record without geometry
    Null,
    /// Polygons, each an outer ring followed by its holes
    Polygons(Vec<Vec<ProjectedPath>>),
    /// Open paths
    Paths(Vec<ProjectedPath>),
}

impl ProjectedShape {
    /// Every path of the shape, rings of all polygons flattened in order
    pub fn paths(&self) -> Box<dyn Iterator<Item = &ProjectedPath> + '_> {
        match self {
            ProjectedShape::Null => Box::new(std::iter::empty()),
            ProjectedShape::Polygons(groups) => Box::new(groups.iter().flatten()),
            ProjectedShape::Paths(paths) => Box::new(paths.iter()),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.paths().flat_map(|p| p.coords.iter()))
    }
}

/// Per-export materialization of the shape records, in record order
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedShapeSet {
    kind: GeometryKind,
    shapes: Vec<ProjectedShape>,
}

impl ProjectedShapeSet {
    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn shapes(&self) -> &[ProjectedShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Bounds of all projected coordinates
    pub fn bounds(&self) -> Option<Bounds> {
        self.shapes
            .iter()
            .filter_map(ProjectedShape::bounds)
            .reduce(|mut acc, b| {
                acc.merge(&b);
                acc
            })
    }
}

/// Projects every shape record for the given geometry kind
///
/// # Errors
///
/// Returns [`GeoExportError::Projection`] when a record references a missing
/// arc, or when a polygon part does not close into a ring.
pub fn project(
    arcs: &ArcTable,
    records: &[ShapeRecord],
    kind: GeometryKind,
) -> Result<ProjectedShapeSet> {
    let shapes = records
        .iter()
        .enumerate()
        .map(|(i, record)| project_record(arcs, record, kind).map_err(|e| in_shape(i, e)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        kind = %kind,
        shapes = shapes.len(),
        "Projected shape records"
    );

    Ok(ProjectedShapeSet { kind, shapes })
}

fn project_record(
    arcs: &ArcTable,
    record: &ShapeRecord,
    kind: GeometryKind,
) -> Result<ProjectedShape> {
    if record.is_null() {
        return Ok(ProjectedShape::Null);
    }
    let parts: Vec<ProjectedPath> = record
        .parts()
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| {
            Ok(ProjectedPath {
                arcs: part.clone(),
                coords: arcs.join(part)?,
            })
        })
        .collect::<Result<_>>()?;

    match kind {
        GeometryKind::Polyline => Ok(ProjectedShape::Paths(parts)),
        GeometryKind::Polygon => {
            if let Some((j, _)) = parts
                .iter()
                .enumerate()
                .find(|(_, p)| !is_closed_ring(&p.coords))
            {
                return Err(GeoExportError::Projection(format!(
                    "part {j} is not a closed ring"
                )));
            }
            let rings: Vec<Path> = parts.iter().map(|p| p.coords.clone()).collect();
            let mut slots: Vec<Option<ProjectedPath>> = parts.into_iter().map(Some).collect();
            let groups = group_rings(&rings)
                .into_iter()
                .map(|group| {
                    let mut group = group
                        .into_iter()
                        .filter_map(|i| slots[i].take())
                        .collect::<Vec<_>>();
                    // a promoted hole becomes a clockwise outer ring
                    if let [ring] = group.as_mut_slice() {
                        if signed_area(&ring.coords) > 0.0 {
                            *ring = std::mem::take(ring).reversed();
                        }
                    }
                    group
                })
                .collect();
            Ok(ProjectedShape::Polygons(groups))
        }
    }
}

fn in_shape(index: usize, err: GeoExportError) -> GeoExportError {
    match err {
        GeoExportError::Projection(msg) => {
            GeoExportError::Projection(format!("shape {index}: {msg}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Dataset;

    fn dataset() -> Dataset {
        // outer square split by a vertical arc, plus a hole in the left half
        Dataset::from_json(
            r#"{
            "arcs": [
                [[1, 0], [0, 0], [0, 2], [1, 2]],
                [[1, 2], [1, 0]],
                [[1, 2], [2, 2], [2, 0], [1, 0]],
                [[0.2, 0.2], [0.8, 0.2], [0.8, 0.8], [0.2, 0.8], [0.2, 0.2]]
            ],
            "shapes": [[[0, 1], [3]], [[2, -2]], []]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_polygon_projection_groups_holes() {
        let ds = dataset();
        let set = project(ds.arcs(), ds.shapes(), GeometryKind::Polygon).unwrap();
        assert_eq!(set.len(), 3);
        match &set.shapes()[0] {
            ProjectedShape::Polygons(groups) => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].len(), 2);
                assert_eq!(groups[0][0].arcs, vec![ArcRef::forward(0), ArcRef::forward(1)]);
                assert_eq!(groups[0][1].arcs, vec![ArcRef::forward(3)]);
            }
            other => panic!("expected polygons, got {other:?}"),
        }
        assert_eq!(set.shapes()[2], ProjectedShape::Null);
    }

    #[test]
    fn test_polyline_projection_keeps_paths() {
        let ds = dataset();
        let set = project(ds.arcs(), ds.shapes(), GeometryKind::Polyline).unwrap();
        match &set.shapes()[0] {
            ProjectedShape::Paths(paths) => assert_eq!(paths.len(), 2),
            other => panic!("expected paths, got {other:?}"),
        }
        assert_eq!(set.kind(), GeometryKind::Polyline);
    }

    #[test]
    fn test_projection_preserves_order() {
        let ds = dataset();
        let set = project(ds.arcs(), ds.shapes(), GeometryKind::Polygon).unwrap();
        let first_vertex = set.shapes()[1].paths().next().unwrap().coords[0];
        assert_eq!(first_vertex, [1.0, 2.0]);
    }

    #[test]
    fn test_open_polygon_part_is_rejected() {
        let ds = Dataset::from_json(r#"{"arcs": [[[0, 0], [1, 1], [2, 0]]], "shapes": [[[0]]]}"#)
            .unwrap();
        let err = project(ds.arcs(), ds.shapes(), GeometryKind::Polygon).unwrap_err();
        assert!(matches!(err, GeoExportError::Projection(_)));
        assert!(err.to_string().contains("shape 0"));
        // the same dataset is a valid polyline
        assert!(project(ds.arcs(), ds.shapes(), GeometryKind::Polyline).is_ok());
    }

    #[test]
    fn test_projection_does_not_mutate_topology() {
        let ds = dataset();
        let before = ds.arcs().clone();
        let _ = project(ds.arcs(), ds.shapes(), GeometryKind::Polygon).unwrap();
        assert_eq!(ds.arcs(), &before);
    }

    #[test]
    fn test_orphan_hole_is_flipped_to_outer_ring() {
        let ds = Dataset::from_json(
            r#"{"arcs": [[[0, 0], [1, 0], [1, 1]], [[1, 1], [0, 1], [0, 0]]], "shapes": [[[0, 1]]]}"#,
        )
        .unwrap();
        let set = project(ds.arcs(), ds.shapes(), GeometryKind::Polygon).unwrap();
        match &set.shapes()[0] {
            ProjectedShape::Polygons(groups) => {
                assert_eq!(groups.len(), 1);
                let ring = &groups[0][0];
                assert!(signed_area(&ring.coords) < 0.0);
                assert_eq!(ring.arcs, vec![ArcRef::reversed(1), ArcRef::reversed(0)]);
                // the flipped arcs still resolve to the written coordinates
                assert_eq!(ds.arcs().join(&ring.arcs).unwrap(), ring.coords);
            }
            other => panic!("expected polygons, got {other:?}"),
        }
    }

    #[test]
    fn test_set_bounds() {
        let ds = dataset();
        let set = project(ds.arcs(), ds.shapes(), GeometryKind::Polygon).unwrap();
        assert_eq!(set.bounds().unwrap().to_array(), [0.0, 0.0, 2.0, 2.0]);
    }
}
