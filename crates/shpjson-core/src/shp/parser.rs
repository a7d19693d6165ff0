use super::error::ReadError;
use super::layout;
use super::reader::ShpReader;
use super::rings::assemble_polygon;
use super::shape_type::ShapeType;
use crate::transform::Projector;
use crate::{BBox, Geometry, Position};

/// Decode one record payload with the field layout of `shape_type`.
///
/// Offsets are relative to the first byte after the record shape type.
pub(crate) fn parse_geometry(
    shape_type: ShapeType,
    payload: &[u8],
    projector: &mut Projector<'_>,
) -> Result<Geometry, ReadError> {
    let mut reader = ShpReader::new(payload);
    let has_z = shape_type.has_z();
    match shape_type {
        ShapeType::Point | ShapeType::PointZ => parse_point(&mut reader, projector, has_z),
        ShapeType::MultiPoint | ShapeType::MultiPointZ => {
            parse_multi_point(&mut reader, projector, has_z)
        }
        ShapeType::PolyLine | ShapeType::PolyLineZ => {
            parse_poly_line(&mut reader, projector, has_z)
        }
        ShapeType::Polygon | ShapeType::PolygonZ => parse_polygon(&mut reader, projector, has_z),
    }
}

fn parse_point(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
    has_z: bool,
) -> Result<Geometry, ReadError> {
    let mut coordinates = read_position(reader, projector)?;
    if has_z {
        reader.seek(layout::POINT_Z_OFFSET)?;
        coordinates.push(reader.read_f64_le()?);
    }
    Ok(Geometry::Point {
        coordinates,
        bbox: None,
    })
}

fn parse_multi_point(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
    has_z: bool,
) -> Result<Geometry, ReadError> {
    let bbox = read_bbox(reader, projector)?;
    reader.seek(layout::MULTIPOINT_NUM_POINTS_OFFSET)?;
    let num_points = reader.read_count_le("numPoints")?;
    reader.seek(layout::MULTIPOINT_POINTS_OFFSET)?;
    let mut points = read_positions(reader, projector, num_points)?;
    if has_z {
        read_z_values(reader, points.iter_mut())?;
    }

    if num_points == 1 {
        let coordinates = points.pop().unwrap_or_default();
        return Ok(Geometry::Point {
            coordinates,
            bbox: Some(bbox),
        });
    }
    Ok(Geometry::MultiPoint {
        coordinates: points,
        bbox: Some(bbox),
    })
}

fn parse_poly_line(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
    has_z: bool,
) -> Result<Geometry, ReadError> {
    let Parts {
        bbox,
        mut parts,
        single,
    } = read_parts(reader, projector, has_z)?;
    if single {
        let coordinates = parts.pop().unwrap_or_default();
        return Ok(Geometry::LineString {
            coordinates,
            bbox: Some(bbox),
        });
    }
    Ok(Geometry::MultiLineString {
        coordinates: parts,
        bbox: Some(bbox),
    })
}

fn parse_polygon(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
    has_z: bool,
) -> Result<Geometry, ReadError> {
    let Parts {
        bbox,
        parts,
        single,
    } = read_parts(reader, projector, has_z)?;
    if single {
        return Ok(Geometry::Polygon {
            coordinates: parts,
            bbox: Some(bbox),
        });
    }
    Ok(assemble_polygon(parts, Some(bbox)))
}

/// Decoded PolyLine/Polygon body.
struct Parts {
    bbox: BBox,
    parts: Vec<Vec<Position>>,
    /// `numParts == 1`: the record collapses to its singular form.
    single: bool,
}

fn read_parts(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
    has_z: bool,
) -> Result<Parts, ReadError> {
    let bbox = read_bbox(reader, projector)?;
    reader.seek(layout::POLY_NUM_PARTS_OFFSET)?;
    let num_parts = reader.read_count_le("numParts")?;
    let num_points = reader.read_count_le("numPoints")?;

    reader.seek(layout::POLY_PARTS_OFFSET)?;
    reader.require_available(num_parts, layout::PART_INDEX_LEN)?;
    let starts = (0..num_parts)
        .map(|_| reader.read_count_le("part index"))
        .collect::<Result<Vec<_>, _>>()?;
    reader.require_available(num_points, layout::POINT_LEN)?;

    let single = num_parts == 1;
    let mut parts = Vec::with_capacity(num_parts);
    if single {
        parts.push(read_positions(reader, projector, num_points)?);
    } else {
        // Parts are read back to back from the first point; each part ends
        // where the next one starts, the last one at numPoints.
        let mut start = 0;
        for part in 0..num_parts {
            let end = starts.get(part + 1).copied().unwrap_or(num_points);
            let count = end
                .checked_sub(start)
                .ok_or(ReadError::PartOutOfOrder { part, start, end })?;
            start = end;
            if count == 0 {
                continue;
            }
            parts.push(read_positions(reader, projector, count)?);
        }
    }

    if has_z {
        read_z_values(reader, parts.iter_mut().flatten())?;
    }
    Ok(Parts {
        bbox,
        parts,
        single,
    })
}

fn read_position(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
) -> Result<Position, ReadError> {
    let x = reader.read_f64_le()?;
    let y = reader.read_f64_le()?;
    Ok(projector.project(x, y))
}

fn read_positions(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
    count: usize,
) -> Result<Vec<Position>, ReadError> {
    reader.require_available(count, layout::POINT_LEN)?;
    (0..count)
        .map(|_| read_position(reader, projector))
        .collect()
}

/// Record bbox; both corners go through the transform like any vertex.
fn read_bbox(
    reader: &mut ShpReader<'_>,
    projector: &mut Projector<'_>,
) -> Result<BBox, ReadError> {
    reader.require_available(1, layout::BBOX_LEN)?;
    let min = read_position(reader, projector)?;
    let max = read_position(reader, projector)?;
    Ok([min[0], min[1], max[0], max[1]])
}

/// Skip the Z range, then append one Z per vertex in vertex order.
fn read_z_values<'p>(
    reader: &mut ShpReader<'_>,
    positions: impl Iterator<Item = &'p mut Position>,
) -> Result<(), ReadError> {
    reader.advance(layout::Z_RANGE_LEN)?;
    for position in positions {
        position.push(reader.read_f64_le()?);
    }
    Ok(())
}
