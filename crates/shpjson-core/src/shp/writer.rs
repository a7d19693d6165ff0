//! In-memory `.shp` writer for fixtures and tests.
//!
//! Records get 1-based ids and the header length covers every record unless
//! overridden with [`ShpBuilder::declared_len`].
//!
//! # Examples
//! ```
//! use shpjson_core::parse_shp;
//! use shpjson_core::shp::writer::ShpBuilder;
//!
//! let bytes = ShpBuilder::new(1).point(1.0, 2.0).null_record().build();
//! let shapes = parse_shp(&bytes)?;
//! assert_eq!(shapes.geometries.len(), 2);
//! assert_eq!(shapes.null_count(), 1);
//! # Ok::<(), shpjson_core::ShpError>(())
//! ```

use super::layout;

const VERSION: i32 = 1000;

/// Builder for a whole `.shp` file; every record uses the file shape type.
#[derive(Debug, Clone)]
pub struct ShpBuilder {
    shape_type: i32,
    bbox: [f64; 4],
    declared_len: Option<usize>,
    records: Vec<Vec<u8>>,
}

impl ShpBuilder {
    pub fn new(shape_type: i32) -> Self {
        Self {
            shape_type,
            bbox: [0.0; 4],
            declared_len: None,
            records: Vec::new(),
        }
    }

    pub fn bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn declared_len(mut self, len: usize) -> Self {
        self.declared_len = Some(len);
        self
    }

    /// Record with content length 0.
    pub fn null_record(mut self) -> Self {
        self.records.push(Vec::new());
        self
    }

    /// Record whose content is written verbatim (shape type included).
    pub fn raw_record(mut self, content: Vec<u8>) -> Self {
        self.records.push(content);
        self
    }

    pub fn point(self, x: f64, y: f64) -> Self {
        let mut content = self.content_start();
        put_point(&mut content, (x, y));
        self.raw_record(content)
    }

    pub fn point_z(self, x: f64, y: f64, z: f64) -> Self {
        let mut content = self.content_start();
        put_point(&mut content, (x, y));
        content.extend_from_slice(&z.to_le_bytes());
        self.raw_record(content)
    }

    pub fn multi_point(self, points: &[(f64, f64)], z: Option<&[f64]>) -> Self {
        let mut content = self.content_start();
        put_bbox(&mut content, points);
        content.extend_from_slice(&(points.len() as i32).to_le_bytes());
        for point in points {
            put_point(&mut content, *point);
        }
        if let Some(z) = z {
            put_z(&mut content, z);
        }
        self.raw_record(content)
    }

    pub fn poly_line(self, parts: &[&[(f64, f64)]]) -> Self {
        self.parts(parts, None)
    }

    pub fn polygon(self, rings: &[&[(f64, f64)]]) -> Self {
        self.parts(rings, None)
    }

    /// PolyLine/Polygon content with explicit part layout and optional Z.
    pub fn parts(self, parts: &[&[(f64, f64)]], z: Option<&[f64]>) -> Self {
        let mut content = self.content_start();
        let points: Vec<(f64, f64)> = parts.iter().flat_map(|part| part.iter().copied()).collect();
        put_bbox(&mut content, &points);
        content.extend_from_slice(&(parts.len() as i32).to_le_bytes());
        content.extend_from_slice(&(points.len() as i32).to_le_bytes());
        let mut start = 0i32;
        for part in parts {
            content.extend_from_slice(&start.to_le_bytes());
            start += part.len() as i32;
        }
        for point in &points {
            put_point(&mut content, *point);
        }
        if let Some(z) = z {
            put_z(&mut content, z);
        }
        self.raw_record(content)
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        for (idx, content) in self.records.iter().enumerate() {
            body.extend_from_slice(&((idx + 1) as i32).to_be_bytes());
            body.extend_from_slice(&((content.len() / 2) as i32).to_be_bytes());
            body.extend_from_slice(content);
        }

        let total = layout::HEADER_LEN + body.len();
        let declared = self.declared_len.unwrap_or(total);
        let mut out = vec![0u8; layout::HEADER_LEN];
        put_at(&mut out, layout::FILE_CODE_OFFSET, &layout::FILE_CODE.to_be_bytes());
        put_at(
            &mut out,
            layout::FILE_LENGTH_OFFSET,
            &((declared / 2) as i32).to_be_bytes(),
        );
        put_at(&mut out, layout::VERSION_OFFSET, &VERSION.to_le_bytes());
        put_at(&mut out, layout::SHAPE_TYPE_OFFSET, &self.shape_type.to_le_bytes());
        for (value, offset) in self.bbox.iter().zip([
            layout::BBOX_XMIN_OFFSET,
            layout::BBOX_YMIN_OFFSET,
            layout::BBOX_XMAX_OFFSET,
            layout::BBOX_YMAX_OFFSET,
        ]) {
            put_at(&mut out, offset, &value.to_le_bytes());
        }
        out.extend_from_slice(&body);
        out
    }

    fn content_start(&self) -> Vec<u8> {
        self.shape_type.to_le_bytes().to_vec()
    }
}

fn put_at(out: &mut [u8], offset: usize, bytes: &[u8]) {
    out[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn put_point(out: &mut Vec<u8>, (x, y): (f64, f64)) {
    out.extend_from_slice(&x.to_le_bytes());
    out.extend_from_slice(&y.to_le_bytes());
}

fn put_bbox(out: &mut Vec<u8>, points: &[(f64, f64)]) {
    let (mut xmin, mut ymin) = (f64::INFINITY, f64::INFINITY);
    let (mut xmax, mut ymax) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (x, y) in points {
        xmin = xmin.min(*x);
        ymin = ymin.min(*y);
        xmax = xmax.max(*x);
        ymax = ymax.max(*y);
    }
    if points.is_empty() {
        (xmin, ymin, xmax, ymax) = (0.0, 0.0, 0.0, 0.0);
    }
    for value in [xmin, ymin, xmax, ymax] {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

fn put_z(out: &mut Vec<u8>, z: &[f64]) {
    let zmin = z.iter().copied().fold(f64::INFINITY, f64::min);
    let zmax = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    out.extend_from_slice(&zmin.to_le_bytes());
    out.extend_from_slice(&zmax.to_le_bytes());
    for value in z {
        out.extend_from_slice(&value.to_le_bytes());
    }
}
