use std::fs;
use std::path::PathBuf;

use shpjson_core::{
    Geometry, ShapeCache, ShpDecoder, ShpError, TransformError, TryTransform, parse_shp,
    parse_shp_with,
};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(case: &str) -> Vec<u8> {
    let path = repo_root()
        .join("tests")
        .join("golden")
        .join(case)
        .join("input.shp");
    fs::read(path).unwrap()
}

#[test]
fn decoding_is_deterministic() {
    let bytes = fixture("polygon_hole");
    assert_eq!(parse_shp(&bytes).unwrap(), parse_shp(&bytes).unwrap());
}

#[test]
fn closure_transform_applies_to_vertices_and_bbox() {
    let bytes = fixture("multipoint");
    let shift = |x: f64, y: f64| (x + 100.0, y - 100.0);
    let shapes = parse_shp_with(&bytes, Some(&shift)).unwrap();
    assert_eq!(
        shapes.geometries[0],
        Some(Geometry::Point {
            coordinates: vec![107.0, -92.0],
            bbox: Some([107.0, -92.0, 107.0, -92.0]),
        })
    );
}

#[test]
fn transform_leaves_z_untouched() {
    let bytes = fixture("pointz");
    let scale = |x: f64, y: f64| (x * 2.0, y * 2.0);
    let shapes = parse_shp_with(&bytes, Some(&scale)).unwrap();
    assert_eq!(
        shapes.geometries[0],
        Some(Geometry::Point {
            coordinates: vec![2.0, 4.0, 3.0],
            bbox: None,
        })
    );
}

#[test]
fn failing_transform_keeps_raw_coordinates() {
    let bytes = fixture("points");
    let failing = TryTransform(|_x: f64, _y: f64| -> Result<(f64, f64), TransformError> {
        Err(TransformError::Failed("no datum".to_string()))
    });

    let mut decoder = ShpDecoder::new(&bytes, Some(&failing)).unwrap();
    let geometries: Vec<_> = decoder.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(decoder.transform_failures(), 2);
    assert_eq!(
        geometries[1],
        Some(Geometry::Point {
            coordinates: vec![-30.5, 40.25],
            bbox: None,
        })
    );
}

#[test]
fn unsupported_file_shape_type_yields_no_geometries() {
    let mut bytes = fixture("points");
    bytes[32..36].copy_from_slice(&31i32.to_le_bytes());
    assert_eq!(
        parse_shp(&bytes).unwrap_err(),
        ShpError::UnsupportedShapeType { code: 31 }
    );
}

#[test]
fn truncated_record_stops_streaming_decoder() {
    let mut bytes = fixture("polylinez");
    bytes.truncate(bytes.len() - 8);
    let words = (bytes.len() / 2) as u32;
    bytes[24..28].copy_from_slice(&words.to_be_bytes());

    let results: Vec<_> = ShpDecoder::new(&bytes, None).unwrap().collect();
    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Ok(Some(Geometry::MultiLineString { .. }))));
    assert!(matches!(
        results[1],
        Err(ShpError::CorruptRecord { index: 2, .. })
    ));
    assert!(parse_shp(&bytes).is_err());
}

#[test]
fn cache_reuses_decoded_file() {
    let bytes = fixture("pointz");
    let mut cache = ShapeCache::default();
    let mut decodes = 0;
    for _ in 0..3 {
        cache
            .get_or_try_insert_with("pointz", || {
                decodes += 1;
                parse_shp(&bytes)
            })
            .unwrap();
    }
    assert_eq!(decodes, 1);
    assert_eq!(cache.hits(), 2);
    assert_eq!(cache.misses(), 1);
}
