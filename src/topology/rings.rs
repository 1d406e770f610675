//! Ring orientation and polygon grouping
//!
//! Clockwise rings are outer rings and counter-clockwise rings are holes, the
//! same convention the Shapefile format uses. Grouping assigns every hole to
//! the smallest outer ring that contains it.

use crate::domain::{Bounds, Point};

/// Signed area of a ring; positive when counter-clockwise in a y-up plane
pub fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for w in ring.windows(2) {
        sum += w[0][0] * w[1][1] - w[1][0] * w[0][1];
    }
    // close the ring if the caller did not repeat the first vertex
    let (first, last) = (ring[0], ring[ring.len() - 1]);
    if first != last {
        sum += last[0] * first[1] - first[0] * last[1];
    }
    sum / 2.0
}

pub fn is_clockwise(ring: &[Point]) -> bool {
    signed_area(ring) < 0.0
}

/// A ring is closed when it has at least 4 vertices and ends where it starts
pub fn is_closed_ring(ring: &[Point]) -> bool {
    ring.len() >= 4 && ring.first() == ring.last()
}

/// Even-odd ray casting test
pub fn point_in_ring(p: Point, ring: &[Point]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);
        if (yi > p[1]) != (yj > p[1]) && p[0] < (xj - xi) * (p[1] - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Groups rings into polygons
///
/// Returns one `Vec` of ring indices per polygon: the outer ring first, then
/// its holes in input order. Polygons are ordered by their outer ring's input
/// position. A hole that no outer ring contains becomes a polygon of its own.
pub fn group_rings(rings: &[Vec<Point>]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut outer_slots: Vec<(usize, Bounds, f64)> = Vec::new();
    let mut holes: Vec<usize> = Vec::new();

    for (i, ring) in rings.iter().enumerate() {
        let Some(bounds) = Bounds::from_points(ring) else {
            continue;
        };
        if is_clockwise(ring) || signed_area(ring) == 0.0 {
            outer_slots.push((groups.len(), bounds, signed_area(ring).abs()));
            groups.push(vec![i]);
        } else {
            holes.push(i);
        }
    }

    for hole in holes {
        let ring = &rings[hole];
        let Some(hole_bounds) = Bounds::from_points(ring) else {
            continue;
        };
        let container = outer_slots
            .iter()
            .filter(|(slot, bounds, _)| {
                bounds.contains(&hole_bounds) && point_in_ring(ring[0], &rings[groups[*slot][0]])
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(slot, _, _)| *slot);

        match container {
            Some(slot) => groups[slot].push(hole),
            None => {
                tracing::debug!(ring = hole, "Hole has no containing ring, exporting as its own polygon");
                groups.push(vec![hole]);
            }
        }
    }

    groups
}
