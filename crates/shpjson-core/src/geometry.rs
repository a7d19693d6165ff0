use serde::{Deserialize, Serialize};

/// A vertex: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// Bounding box as `[xmin, ymin, xmax, ymax]`.
pub type BBox = [f64; 4];

/// GeoJSON-compatible geometry value.
///
/// Serializes as a GeoJSON geometry object; `bbox` is omitted when absent.
///
/// # Examples
/// ```
/// use shpjson_core::Geometry;
///
/// let point = Geometry::Point {
///     coordinates: vec![1.0, 2.0],
///     bbox: None,
/// };
/// let json = serde_json::to_value(&point).unwrap();
/// assert_eq!(json["type"], "Point");
/// assert!(json.get("bbox").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    LineString {
        coordinates: Vec<Position>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bbox: Option<BBox>,
    },
}

/// Geometry families; a file declares exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryFamily {
    Point,
    Line,
    Polygon,
}

impl Geometry {
    /// GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    pub fn family(&self) -> GeometryFamily {
        match self {
            Geometry::Point { .. } | Geometry::MultiPoint { .. } => GeometryFamily::Point,
            Geometry::LineString { .. } | Geometry::MultiLineString { .. } => GeometryFamily::Line,
            Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } => GeometryFamily::Polygon,
        }
    }

    pub fn bbox(&self) -> Option<&BBox> {
        match self {
            Geometry::Point { bbox, .. }
            | Geometry::MultiPoint { bbox, .. }
            | Geometry::LineString { bbox, .. }
            | Geometry::MultiLineString { bbox, .. }
            | Geometry::Polygon { bbox, .. }
            | Geometry::MultiPolygon { bbox, .. } => bbox.as_ref(),
        }
    }

    /// Total number of vertices across all parts.
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Point { .. } => 1,
            Geometry::MultiPoint { coordinates, .. } | Geometry::LineString { coordinates, .. } => {
                coordinates.len()
            }
            Geometry::MultiLineString { coordinates, .. } | Geometry::Polygon { coordinates, .. } => {
                coordinates.iter().map(Vec::len).sum()
            }
            Geometry::MultiPolygon { coordinates, .. } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter())
                .map(Vec::len)
                .sum(),
        }
    }
}
