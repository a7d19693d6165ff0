use super::error::{ReadError, ShpError};
use super::header::{Header, parse_header};
use super::parser::parse_geometry;
use super::records::RecordFramer;
use super::shape_type::ShapeType;
use crate::transform::{CoordinateTransform, Projector};
use crate::{Geometry, ShapeFile};

/// Decode a `.shp` buffer with untransformed coordinates.
///
/// # Examples
/// ```
/// use shpjson_core::{ShpError, parse_shp};
///
/// let err = parse_shp(&[0u8; 10]).unwrap_err();
/// assert!(matches!(err, ShpError::TruncatedHeader { .. }));
/// ```
///
/// # Errors
/// Returns the first fatal `ShpError`; no partial result is produced.
pub fn parse_shp(bytes: &[u8]) -> Result<ShapeFile, ShpError> {
    parse_shp_with(bytes, None)
}

/// Decode a `.shp` buffer, passing every `(x, y)` through `transform`.
///
/// # Errors
/// Returns the first fatal `ShpError`; no partial result is produced.
pub fn parse_shp_with(
    bytes: &[u8],
    transform: Option<&dyn CoordinateTransform>,
) -> Result<ShapeFile, ShpError> {
    let mut decoder = ShpDecoder::new(bytes, transform)?;
    let geometries = decoder.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok(ShapeFile {
        header: decoder.header().clone(),
        geometries,
    })
}

/// Streaming decoder yielding one `Option<Geometry>` per record.
///
/// The header and shape type are validated up front. Iteration stops after
/// the first error, so callers that want a best-effort result can keep what
/// was yielded before it.
///
/// # Examples
/// ```
/// use shpjson_core::ShpDecoder;
///
/// let mut bytes = vec![0u8; 100];
/// bytes[24..28].copy_from_slice(&50u32.to_be_bytes());
/// bytes[32..36].copy_from_slice(&1i32.to_le_bytes());
///
/// let decoder = ShpDecoder::new(&bytes, None)?;
/// assert_eq!(decoder.header().shape_type_code, 1);
/// assert_eq!(decoder.count(), 0);
/// # Ok::<(), shpjson_core::ShpError>(())
/// ```
pub struct ShpDecoder<'a> {
    header: Header,
    shape_type: ShapeType,
    records: RecordFramer<'a>,
    projector: Projector<'a>,
    decoded: usize,
    failed: bool,
    finished: bool,
}

impl<'a> ShpDecoder<'a> {
    /// # Errors
    /// `TruncatedHeader` for a short buffer, `UnsupportedShapeType` for an
    /// unknown file-level code.
    pub fn new(
        bytes: &'a [u8],
        transform: Option<&'a dyn CoordinateTransform>,
    ) -> Result<Self, ShpError> {
        let header = parse_header(bytes)?;
        let shape_type = ShapeType::from_code(header.shape_type_code)?;
        let framed = &bytes[..header.effective_len(bytes.len())];
        tracing::debug!(
            ?shape_type,
            declared_len = header.length,
            buffer_len = bytes.len(),
            "decoding shapefile"
        );
        Ok(Self {
            header,
            shape_type,
            records: RecordFramer::new(framed),
            projector: Projector::new(transform),
            decoded: 0,
            failed: false,
            finished: false,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// Coordinates kept untransformed because the transform failed.
    pub fn transform_failures(&self) -> usize {
        self.projector.failures()
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Some(err) = self.projector.first_error() {
            tracing::warn!(
                failures = self.projector.failures(),
                first_error = %err,
                "coordinate transform failed; kept untransformed coordinates"
            );
        }
        tracing::debug!(records = self.decoded, "shapefile decoded");
    }
}

impl Iterator for ShpDecoder<'_> {
    type Item = Result<Option<Geometry>, ShpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let record = match self.records.next() {
            Some(Ok(record)) => record,
            Some(Err(err)) => {
                self.failed = true;
                self.finish();
                return Some(Err(err));
            }
            None => {
                self.finish();
                return None;
            }
        };
        self.decoded += 1;

        if record.is_null() {
            tracing::trace!(id = record.id, "null record");
            return Some(Ok(None));
        }
        if record.shape_type != self.header.shape_type_code {
            tracing::trace!(
                id = record.id,
                record_type = record.shape_type,
                "record shape type differs from file; using file layout"
            );
        }

        let index = self.decoded;
        let result = parse_geometry(self.shape_type, record.payload, &mut self.projector)
            .map(Some)
            .map_err(|err: ReadError| ShpError::CorruptRecord {
                index,
                offset: record.offset,
                reason: err.to_string(),
            });
        if result.is_err() {
            self.failed = true;
            self.finish();
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{ShpDecoder, parse_shp, parse_shp_with};
    use crate::shp::error::ShpError;
    use crate::shp::writer::ShpBuilder;
    use crate::{Geometry, TransformError, TryTransform};

    fn outer_square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]
    }

    fn inner_square() -> Vec<(f64, f64)> {
        vec![(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0), (2.0, 2.0)]
    }

    #[test]
    fn polygon_with_hole_decodes_to_single_polygon() {
        let bytes = ShpBuilder::new(5)
            .polygon(&[&outer_square(), &inner_square()])
            .build();
        let shapes = parse_shp(&bytes).unwrap();
        assert_eq!(shapes.geometries.len(), 1);
        match shapes.geometries[0].as_ref().unwrap() {
            Geometry::Polygon { coordinates, .. } => assert_eq!(coordinates.len(), 2),
            other => panic!("expected Polygon, got {}", other.type_name()),
        }
    }

    #[test]
    fn disjoint_outer_rings_decode_to_multipolygon() {
        let shifted: Vec<_> = outer_square()
            .into_iter()
            .map(|(x, y)| (x + 20.0, y))
            .collect();
        let bytes = ShpBuilder::new(5)
            .polygon(&[&outer_square(), &shifted])
            .build();
        let shapes = parse_shp(&bytes).unwrap();
        match shapes.geometries[0].as_ref().unwrap() {
            Geometry::MultiPolygon { coordinates, .. } => {
                assert_eq!(coordinates.len(), 2);
                assert_eq!(coordinates[0].len(), 1);
                assert_eq!(coordinates[1].len(), 1);
            }
            other => panic!("expected MultiPolygon, got {}", other.type_name()),
        }
    }

    #[test]
    fn null_records_keep_their_position() {
        let bytes = ShpBuilder::new(1)
            .null_record()
            .point(1.0, 1.0)
            .null_record()
            .point(2.0, 2.0)
            .build();
        let shapes = parse_shp(&bytes).unwrap();
        assert_eq!(shapes.geometries.len(), 4);
        assert!(shapes.geometries[0].is_none());
        assert!(shapes.geometries[1].is_some());
        assert!(shapes.geometries[2].is_none());
        assert!(shapes.geometries[3].is_some());
    }

    #[test]
    fn record_type_zero_with_content_is_null() {
        let mut content = 0i32.to_le_bytes().to_vec();
        content.extend_from_slice(&[0u8; 16]);
        let bytes = ShpBuilder::new(1).raw_record(content).build();
        let shapes = parse_shp(&bytes).unwrap();
        assert_eq!(shapes.geometries, vec![None]);
    }

    #[test]
    fn unsupported_shape_type_yields_no_geometries() {
        let bytes = ShpBuilder::new(31).null_record().build();
        let err = parse_shp(&bytes).unwrap_err();
        assert_eq!(err, ShpError::UnsupportedShapeType { code: 31 });
        assert!(ShpDecoder::new(&bytes, None).is_err());
    }

    #[test]
    fn declared_length_bounds_framing() {
        let mut bytes = ShpBuilder::new(1).point(1.0, 1.0).build();
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef, 0x00]);
        let shapes = parse_shp(&bytes).unwrap();
        assert_eq!(shapes.geometries.len(), 1);
        assert_eq!(shapes.header.length, bytes.len() - 5);
    }

    #[test]
    fn corrupt_payload_is_fatal() {
        let bytes = ShpBuilder::new(3)
            .point(1.0, 1.0)
            .build();
        let err = parse_shp(&bytes).unwrap_err();
        assert!(matches!(err, ShpError::CorruptRecord { index: 1, offset: 100, .. }));
    }

    #[test]
    fn decoder_stops_after_corrupt_record() {
        let mut bytes = ShpBuilder::new(1)
            .point(1.0, 1.0)
            .point(2.0, 2.0)
            .build();
        bytes.truncate(bytes.len() - 8);
        let header_len = (bytes.len() / 2) as u32;
        bytes[24..28].copy_from_slice(&header_len.to_be_bytes());

        let results: Vec<_> = ShpDecoder::new(&bytes, None).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Ok(Some(_))));
        assert!(matches!(
            results[1],
            Err(ShpError::CorruptRecord { index: 2, .. })
        ));
    }

    #[test]
    fn decoding_is_deterministic() {
        let bytes = ShpBuilder::new(15)
            .parts(
                &[&outer_square(), &inner_square()],
                Some(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
            )
            .build();
        let shift = |x: f64, y: f64| (x * 0.5, y * 0.5);
        let first = parse_shp_with(&bytes, Some(&shift)).unwrap();
        let second = parse_shp_with(&bytes, Some(&shift)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn failing_transform_keeps_raw_coordinates() {
        let failing = TryTransform(|_: f64, _: f64| -> Result<(f64, f64), TransformError> {
            Err(TransformError::Failed("incompatible projection".into()))
        });
        let bytes = ShpBuilder::new(1).point(7.0, 8.0).build();

        let mut decoder = ShpDecoder::new(&bytes, Some(&failing)).unwrap();
        let geometry = decoder.next().unwrap().unwrap();
        assert_eq!(
            geometry,
            Some(Geometry::Point {
                coordinates: vec![7.0, 8.0],
                bbox: None
            })
        );
        assert!(decoder.next().is_none());
        assert_eq!(decoder.transform_failures(), 1);
    }

    #[test]
    fn corrupt_record_still_reports_transform_fallbacks() {
        let failing = TryTransform(|_: f64, _: f64| -> Result<(f64, f64), TransformError> {
            Err(TransformError::Failed("incompatible projection".into()))
        });
        let bytes = ShpBuilder::new(1)
            .point(7.0, 8.0)
            .raw_record(vec![1, 0, 0, 0, 0, 0, 0, 0])
            .build();

        let mut decoder = ShpDecoder::new(&bytes, Some(&failing)).unwrap();
        assert!(decoder.next().unwrap().is_ok());
        assert!(!decoder.finished);
        assert!(matches!(
            decoder.next(),
            Some(Err(ShpError::CorruptRecord { index: 2, .. }))
        ));
        assert!(decoder.finished);
        assert_eq!(decoder.transform_failures(), 1);
        assert!(decoder.next().is_none());
    }

    #[test]
    fn measured_polyline_decodes_xy() {
        let bytes = ShpBuilder::new(23)
            .poly_line(&[&[(0.0, 0.0), (1.0, 1.0)]])
            .build();
        let shapes = parse_shp(&bytes).unwrap();
        assert_eq!(
            shapes.geometries[0].as_ref().map(Geometry::type_name),
            Some("LineString")
        );
    }
}
