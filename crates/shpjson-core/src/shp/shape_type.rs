use serde::Serialize;

use super::error::ShpError;
use super::layout;
use crate::GeometryFamily;

/// Shape types the decoder can route to a field-layout reader.
///
/// Measured variants (21, 23, 25, 28) route to their X/Y base layout; the
/// trailing M values are not decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeType {
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
}

impl ShapeType {
    /// Resolve a file-level shape-type code.
    ///
    /// # Errors
    /// Returns `ShpError::UnsupportedShapeType` for any code outside
    /// 1, 3, 5, 8, their Z variants, and their measured variants.
    pub fn from_code(code: i32) -> Result<Self, ShpError> {
        let routed = match code {
            21 | 23 | 25 | 28 => code - layout::M_CODE_OFFSET,
            _ => code,
        };
        match routed {
            1 => Ok(ShapeType::Point),
            3 => Ok(ShapeType::PolyLine),
            5 => Ok(ShapeType::Polygon),
            8 => Ok(ShapeType::MultiPoint),
            11 => Ok(ShapeType::PointZ),
            13 => Ok(ShapeType::PolyLineZ),
            15 => Ok(ShapeType::PolygonZ),
            18 => Ok(ShapeType::MultiPointZ),
            _ => Err(ShpError::UnsupportedShapeType { code }),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
        }
    }

    pub fn has_z(self) -> bool {
        matches!(
            self,
            ShapeType::PointZ | ShapeType::PolyLineZ | ShapeType::PolygonZ | ShapeType::MultiPointZ
        )
    }

    pub fn family(self) -> GeometryFamily {
        match self {
            ShapeType::Point | ShapeType::PointZ | ShapeType::MultiPoint | ShapeType::MultiPointZ => {
                GeometryFamily::Point
            }
            ShapeType::PolyLine | ShapeType::PolyLineZ => GeometryFamily::Line,
            ShapeType::Polygon | ShapeType::PolygonZ => GeometryFamily::Polygon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ShapeType;
    use crate::GeometryFamily;
    use crate::shp::error::ShpError;

    #[test]
    fn recognized_codes_round_trip() {
        for code in [1, 3, 5, 8, 11, 13, 15, 18] {
            let shape_type = ShapeType::from_code(code).unwrap();
            assert_eq!(shape_type.code(), code);
            assert_eq!(shape_type.has_z(), code > 10);
        }
    }

    #[test]
    fn measured_codes_route_to_base_layout() {
        assert_eq!(ShapeType::from_code(21).unwrap(), ShapeType::Point);
        assert_eq!(ShapeType::from_code(23).unwrap(), ShapeType::PolyLine);
        assert_eq!(ShapeType::from_code(25).unwrap(), ShapeType::Polygon);
        assert_eq!(ShapeType::from_code(28).unwrap(), ShapeType::MultiPoint);
    }

    #[test]
    fn unknown_codes_rejected() {
        for code in [0, 2, 4, 10, 20, 31, -1] {
            assert_eq!(
                ShapeType::from_code(code),
                Err(ShpError::UnsupportedShapeType { code })
            );
        }
    }

    #[test]
    fn polygon_family() {
        assert_eq!(ShapeType::PolygonZ.family(), GeometryFamily::Polygon);
        assert_eq!(ShapeType::MultiPointZ.family(), GeometryFamily::Point);
    }
}
