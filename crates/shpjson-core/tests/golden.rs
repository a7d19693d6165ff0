use std::fs;
use std::path::{Path, PathBuf};

use shpjson_core::shp::writer::ShpBuilder;
use shpjson_core::{FeatureCollection, Geometry, decode_shp_file};

fn case_dir(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(dir)
}

fn load_expected(dir: &str) -> FeatureCollection {
    let expected_path = case_dir(dir).join("expected.geojson");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected.geojson");
    serde_json::from_str(&expected_json).expect("parse expected geojson")
}

fn decode_case(dir: &str) -> FeatureCollection {
    let input = case_dir(dir).join("input.shp");
    decode_shp_file(&input, None)
        .expect("decode shapefile")
        .into_feature_collection(None)
}

fn run_golden(dir: &str) {
    let expected = load_expected(dir);
    let actual = decode_case(dir);

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_polygon_hole() {
    run_golden("tests/golden/polygon_hole");
}

#[test]
fn golden_multipolygon() {
    run_golden("tests/golden/multipolygon");
}

#[test]
fn golden_pointz() {
    run_golden("tests/golden/pointz");
}

#[test]
fn golden_points() {
    run_golden("tests/golden/points");
}

#[test]
fn golden_multipoint() {
    run_golden("tests/golden/multipoint");
}

#[test]
fn golden_polylinez() {
    run_golden("tests/golden/polylinez");
}

#[test]
fn golden_polygon_hole_keeps_null_in_place() {
    let collection = decode_case("tests/golden/polygon_hole");
    assert_eq!(collection.features.len(), 3);
    assert!(collection.features[1].geometry.is_none());
    match collection.features[0].geometry.as_ref() {
        Some(Geometry::Polygon { coordinates, .. }) => assert_eq!(coordinates.len(), 2),
        other => panic!("expected Polygon, got {other:?}"),
    }
}

#[test]
fn golden_multipolygon_groups_hole_with_its_outer_ring() {
    let collection = decode_case("tests/golden/multipolygon");
    match collection.features[0].geometry.as_ref() {
        Some(Geometry::MultiPolygon { coordinates, .. }) => {
            assert_eq!(coordinates.len(), 2);
            assert_eq!(coordinates[0].len(), 1);
            assert_eq!(coordinates[1].len(), 2);
        }
        other => panic!("expected MultiPolygon, got {other:?}"),
    }
}

#[test]
fn golden_inputs_match_shared_writer() {
    let points = ShpBuilder::new(1)
        .bbox([-30.5, 20.0, 10.0, 40.25])
        .point(10.0, 20.0)
        .point(-30.5, 40.25)
        .build();
    let on_disk = fs::read(case_dir("tests/golden/points").join("input.shp")).expect("read input.shp");
    assert_eq!(on_disk, points);

    let pointz = ShpBuilder::new(11)
        .bbox([-4.5, 2.0, 1.0, 6.25])
        .point_z(1.0, 2.0, 3.0)
        .null_record()
        .point_z(-4.5, 6.25, 120.0)
        .build();
    let on_disk = fs::read(case_dir("tests/golden/pointz").join("input.shp")).expect("read input.shp");
    assert_eq!(on_disk, pointz);
}
