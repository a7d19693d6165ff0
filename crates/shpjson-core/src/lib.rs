//! shpjson core library for decoding ESRI Shapefile geometry.
//!
//! This crate turns the binary `.shp` format into GeoJSON-compatible
//! geometry values: the header reader validates the 100-byte preamble, the
//! record framer walks variable-length records, the geometry parser applies
//! the field layout of the file's shape type, and the ring assembler
//! rebuilds polygons with holes from ring orientation. Decoding is
//! byte-oriented and side-effect free; file access lives in `convert`.
//!
//! Invariants:
//! - One output entry per framed record, in record order; null records stay
//!   in place as `None`.
//! - A failing coordinate transform never aborts decoding.
//! - Decoding the same bytes with the same transform is deterministic.
//!
//! Version française (résumé):
//! Cette crate décode le format binaire `.shp` en géométries compatibles
//! GeoJSON : en-tête -> enregistrements -> géométries -> polygones avec
//! trous. Les E/S restent dans `convert`; la transformation de coordonnées
//! est une fonction opaque, jamais bloquante en cas d'échec.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use shpjson_core::decode_shp_file;
//!
//! let shapes = decode_shp_file(Path::new("roads.shp"), None)?;
//! println!("records: {}", shapes.geometries.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod cache;
mod convert;
mod geometry;
pub mod shp;
mod transform;

pub use cache::{DEFAULT_CACHE_CAPACITY, ShapeCache};
pub use convert::{ConvertError, decode_shp_file};
pub use geometry::{BBox, Geometry, GeometryFamily, Position};
pub use shp::{Header, ShapeType, ShpDecoder, ShpError, parse_shp, parse_shp_with};
pub use transform::{CoordinateTransform, Identity, TransformError, TryTransform};

/// Attribute row paired with one geometry.
pub type Properties = Map<String, Value>;

/// Decoded shapefile: header plus one entry per record.
///
/// # Examples
/// ```
/// use shpjson_core::{Geometry, Header, ShapeFile};
///
/// let shapes = ShapeFile {
///     header: Header {
///         file_code: 9994,
///         length: 128,
///         version: 1000,
///         shape_type_code: 1,
///         bbox: [1.0, 2.0, 1.0, 2.0],
///     },
///     geometries: vec![
///         Some(Geometry::Point {
///             coordinates: vec![1.0, 2.0],
///             bbox: None,
///         }),
///         None,
///     ],
/// };
/// assert_eq!(shapes.null_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeFile {
    pub header: Header,
    /// One entry per record; `None` for null records.
    pub geometries: Vec<Option<Geometry>>,
}

impl ShapeFile {
    pub fn null_count(&self) -> usize {
        self.geometries.iter().filter(|g| g.is_none()).count()
    }

    /// Pair the geometries with attribute rows; see [`combine`].
    pub fn into_feature_collection(self, rows: Option<&[Properties]>) -> FeatureCollection {
        combine(self.geometries, rows)
    }
}

/// GeoJSON feature.
///
/// # Examples
/// ```
/// use shpjson_core::Feature;
///
/// let feature = Feature::new(None, Default::default());
/// let json = serde_json::to_value(&feature).unwrap();
/// assert_eq!(json["type"], "Feature");
/// assert!(json["geometry"].is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Always `"Feature"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Serialized as `null` for null records.
    pub geometry: Option<Geometry>,
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Properties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties,
        }
    }
}

/// GeoJSON feature collection in record order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

/// Pair each geometry with the attribute row at the same position.
///
/// Missing rows become `{}`; rows past the last geometry are ignored; null
/// geometries stay `null`.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use shpjson_core::{Geometry, combine};
///
/// let geometries = vec![
///     None,
///     Some(Geometry::Point {
///         coordinates: vec![0.0, 0.0],
///         bbox: None,
///     }),
/// ];
/// let rows = vec![json!({"name": "a"}).as_object().unwrap().clone()];
///
/// let collection = combine(geometries, Some(&rows));
/// assert_eq!(collection.features.len(), 2);
/// assert_eq!(collection.features[0].properties["name"], "a");
/// assert!(collection.features[1].properties.is_empty());
/// ```
pub fn combine(geometries: Vec<Option<Geometry>>, rows: Option<&[Properties]>) -> FeatureCollection {
    let rows = rows.unwrap_or_default();
    let features = geometries
        .into_iter()
        .enumerate()
        .map(|(idx, geometry)| Feature::new(geometry, rows.get(idx).cloned().unwrap_or_default()))
        .collect();
    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features,
    }
}
