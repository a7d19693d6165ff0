use std::fs;
use std::path::{Path, PathBuf};

use shpjson_core::shp::writer::ShpBuilder;

const POINT: i32 = 1;
const POLYGON: i32 = 5;
const MULTIPOINT: i32 = 8;
const POINT_Z: i32 = 11;
const POLYLINE_Z: i32 = 13;

type Xy = (f64, f64);

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_polygon_fixtures(&root)?;
    write_point_fixtures(&root)?;
    write_line_fixtures(&root)?;
    Ok(())
}

fn write_polygon_fixtures(root: &Path) -> Result<(), String> {
    let outer = square_cw(0.0, 0.0, 10.0);
    let hole = square_ccw(2.0, 2.0, 6.0);
    let triangle = [(20.0, 0.0), (20.0, 5.0), (25.0, 0.0), (20.0, 0.0)];
    write_file(
        root.join("polygon_hole"),
        ShpBuilder::new(POLYGON)
            .bbox(bbox_of(&[&outer, &hole, &triangle]))
            .polygon(&[&outer, &hole])
            .null_record()
            .polygon(&[&triangle]),
    )?;

    let small = square_cw(20.0, 20.0, 4.0);
    write_file(
        root.join("multipolygon"),
        ShpBuilder::new(POLYGON)
            .bbox(bbox_of(&[&small, &outer, &hole]))
            .polygon(&[&small, &outer, &hole]),
    )?;
    Ok(())
}

fn write_point_fixtures(root: &Path) -> Result<(), String> {
    write_file(
        root.join("pointz"),
        ShpBuilder::new(POINT_Z)
            .bbox(bbox_of(&[&[(1.0, 2.0), (-4.5, 6.25)]]))
            .point_z(1.0, 2.0, 3.0)
            .null_record()
            .point_z(-4.5, 6.25, 120.0),
    )?;

    let single = [(7.0, 8.0)];
    let several = [(0.0, 0.0), (1.5, 2.5), (3.0, -1.0)];
    write_file(
        root.join("multipoint"),
        ShpBuilder::new(MULTIPOINT)
            .bbox(bbox_of(&[&single, &several]))
            .multi_point(&single, None)
            .multi_point(&several, None),
    )?;

    write_file(
        root.join("points"),
        ShpBuilder::new(POINT)
            .bbox(bbox_of(&[&[(10.0, 20.0), (-30.5, 40.25)]]))
            .point(10.0, 20.0)
            .point(-30.5, 40.25),
    )?;
    Ok(())
}

fn write_line_fixtures(root: &Path) -> Result<(), String> {
    let first = [(0.0, 0.0), (1.0, 1.0)];
    let second = [(5.0, 5.0), (6.0, 6.0), (7.0, 5.0)];
    let short = [(0.0, 0.0), (2.0, 2.0)];
    write_file(
        root.join("polylinez"),
        ShpBuilder::new(POLYLINE_Z)
            .bbox(bbox_of(&[&first, &second, &short]))
            .parts(&[&first, &second], Some(&[1.0, 2.0, 3.0, 4.0, 5.0]))
            .parts(&[&short], Some(&[10.0, 20.0])),
    )?;
    Ok(())
}

fn square_cw(x0: f64, y0: f64, size: f64) -> Vec<Xy> {
    vec![
        (x0, y0),
        (x0, y0 + size),
        (x0 + size, y0 + size),
        (x0 + size, y0),
        (x0, y0),
    ]
}

fn square_ccw(x0: f64, y0: f64, size: f64) -> Vec<Xy> {
    let mut ring = square_cw(x0, y0, size);
    ring.reverse();
    ring
}

/// File-level bbox over every vertex written to the file.
fn bbox_of(groups: &[&[Xy]]) -> [f64; 4] {
    groups.iter().flat_map(|group| group.iter()).fold(
        [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY],
        |[xmin, ymin, xmax, ymax], (x, y)| [xmin.min(*x), ymin.min(*y), xmax.max(*x), ymax.max(*y)],
    )
}

fn write_file(dir: PathBuf, builder: ShpBuilder) -> Result<(), String> {
    fs::create_dir_all(&dir)
        .map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;
    let path = dir.join("input.shp");
    fs::write(&path, builder.build())
        .map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
