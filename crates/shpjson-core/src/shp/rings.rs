//! Polygon reconstruction from a flat ring list.
//!
//! Ring orientation is the only signal separating outer boundaries from
//! holes. A positive shoelace sum (clockwise with y up) opens a new polygon;
//! anything else is a hole of the most recently opened polygon.

use crate::{BBox, Geometry, Position};

/// Orientation sum `Σ (x[i+1] - x[i]) * (y[i+1] + y[i])` over consecutive
/// vertices. There is no closing term from the last vertex back to the first.
///
/// # Examples
/// ```
/// use shpjson_core::shp::rings::shoelace_sum;
///
/// let clockwise = vec![
///     vec![0.0, 0.0],
///     vec![0.0, 1.0],
///     vec![1.0, 1.0],
///     vec![1.0, 0.0],
///     vec![0.0, 0.0],
/// ];
/// assert!(shoelace_sum(&clockwise) > 0.0);
/// ```
pub fn shoelace_sum(ring: &[Position]) -> f64 {
    ring.windows(2)
        .map(|pair| (pair[1][0] - pair[0][0]) * (pair[1][1] + pair[0][1]))
        .sum()
}

pub fn is_outer_ring(ring: &[Position]) -> bool {
    shoelace_sum(ring) > 0.0
}

/// Group rings in file order into `[outer, holes...]` sets.
///
/// A hole seen before any outer ring opens the first group itself, so it
/// ends up as that group's leading ring.
pub fn group_rings(rings: Vec<Vec<Position>>) -> Vec<Vec<Vec<Position>>> {
    let mut groups: Vec<Vec<Vec<Position>>> = Vec::new();
    for ring in rings {
        match groups.last_mut() {
            Some(group) if !is_outer_ring(&ring) => group.push(ring),
            Some(_) => groups.push(vec![ring]),
            None => {
                if !is_outer_ring(&ring) {
                    tracing::debug!("polygon starts with a hole ring; opening group with it");
                }
                groups.push(vec![ring]);
            }
        }
    }
    groups
}

/// Build a Polygon (one group) or MultiPolygon (zero or several groups).
pub fn assemble_polygon(rings: Vec<Vec<Position>>, bbox: Option<BBox>) -> Geometry {
    let mut groups = group_rings(rings);
    if groups.len() == 1 {
        let coordinates = groups.pop().unwrap_or_default();
        return Geometry::Polygon { coordinates, bbox };
    }
    Geometry::MultiPolygon {
        coordinates: groups,
        bbox,
    }
}
