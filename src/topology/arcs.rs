//! Shared arc table
//!
//! Arcs are polylines owned by the dataset. Shapes refer to them through
//! [`ArcRef`]s, so a boundary shared by two features is stored once.

use crate::domain::{Bounds, GeoExportError, Path, Point, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed reference to an arc
///
/// A non-negative value `i` is arc `i` traversed forwards; a negative value `r`
/// is arc `!r` (that is `-r - 1`) traversed backwards. TopoJSON uses the same
/// encoding, so references are written through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcRef(i32);

impl ArcRef {
    pub fn forward(index: usize) -> Self {
        Self(index as i32)
    }

    pub fn reversed(index: usize) -> Self {
        Self(!(index as i32))
    }

    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> i32 {
        self.0
    }

    pub fn is_reversed(&self) -> bool {
        self.0 < 0
    }

    /// The same arc traversed the other way
    pub fn flip(self) -> Self {
        Self(!self.0)
    }

    /// Index into the arc table
    pub fn index(&self) -> usize {
        if self.0 < 0 {
            (!self.0) as usize
        } else {
            self.0 as usize
        }
    }
}

impl fmt::Display for ArcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reversed() {
            write!(f, "~{}", self.index())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Ordered table of arcs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArcTable {
    arcs: Vec<Path>,
}

impl ArcTable {
    /// Builds a table, rejecting arcs with fewer than two vertices or non-finite coordinates
    pub fn new(arcs: Vec<Path>) -> Result<Self> {
        for (i, arc) in arcs.iter().enumerate() {
            if arc.len() < 2 {
                return Err(GeoExportError::Projection(format!(
                    "arc {i} has {} vertices, at least 2 are required",
                    arc.len()
                )));
            }
            if arc.iter().flatten().any(|v| !v.is_finite()) {
                return Err(GeoExportError::Projection(format!(
                    "arc {i} contains a non-finite coordinate"
                )));
            }
        }
        Ok(Self { arcs })
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn arcs(&self) -> &[Path] {
        &self.arcs
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.arcs.get(index)
    }

    /// Bounding box over every vertex, `None` for an empty table
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.arcs.iter().flatten())
    }

    /// Whether a reference points at an existing arc
    pub fn contains(&self, arc: ArcRef) -> bool {
        arc.index() < self.arcs.len()
    }

    /// Joins a sequence of arcs end to end into one path
    ///
    /// The first vertex of each following arc is dropped when it repeats the
    /// previous arc's last vertex.
    pub fn join(&self, refs: &[ArcRef]) -> Result<Path> {
        let mut path: Path = Vec::new();
        for &arc_ref in refs {
            let arc = self.get(arc_ref.index()).ok_or_else(|| {
                GeoExportError::Projection(format!(
                    "arc reference {arc_ref} is out of range (table has {} arcs)",
                    self.arcs.len()
                ))
            })?;
            let mut points: Box<dyn Iterator<Item = &Point>> = if arc_ref.is_reversed() {
                Box::new(arc.iter().rev())
            } else {
                Box::new(arc.iter())
            };
            if let (Some(last), Some(first)) = (path.last(), arc_first(arc, arc_ref)) {
                if *last == first {
                    points.next();
                }
            }
            path.extend(points);
        }
        Ok(path)
    }
}

fn arc_first(arc: &Path, arc_ref: ArcRef) -> Option<Point> {
    if arc_ref.is_reversed() {
        arc.last().copied()
    } else {
        arc.first().copied()
    }
}
