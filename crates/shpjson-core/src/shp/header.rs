use serde::{Deserialize, Serialize};

use super::error::{ReadError, ShpError};
use super::layout;
use super::reader::ShpReader;
use crate::BBox;

/// Fixed 100-byte file preamble.
///
/// # Examples
/// ```
/// use shpjson_core::Header;
///
/// let header = Header {
///     file_code: 9994,
///     length: 100,
///     version: 1000,
///     shape_type_code: 1,
///     bbox: [0.0, 0.0, 1.0, 1.0],
/// };
/// assert_eq!(header.effective_len(400), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Magic file code (9994 for well-formed files; not enforced).
    pub file_code: i32,
    /// Declared file length in bytes.
    pub length: usize,
    pub version: i32,
    pub shape_type_code: i32,
    /// `[xmin, ymin, xmax, ymax]`.
    pub bbox: BBox,
}

impl Header {
    /// Number of bytes to frame: the declared length wins over a longer
    /// physical buffer.
    pub fn effective_len(&self, buffer_len: usize) -> usize {
        self.length.min(buffer_len)
    }
}

/// Parse the fixed preamble.
///
/// # Errors
/// Returns `ShpError::TruncatedHeader` when `bytes` is shorter than the
/// preamble.
pub fn parse_header(bytes: &[u8]) -> Result<Header, ShpError> {
    let truncated = |_: ReadError| ShpError::TruncatedHeader {
        needed: layout::HEADER_LEN,
        actual: bytes.len(),
    };
    ShpReader::new(bytes)
        .require_len(layout::HEADER_LEN)
        .map_err(truncated)?;

    let file_code = ShpReader::at(bytes, layout::FILE_CODE_OFFSET)
        .read_i32_be()
        .map_err(truncated)?;
    let length = ShpReader::at(bytes, layout::FILE_LENGTH_OFFSET)
        .read_u32_be()
        .map(layout::words_to_bytes)
        .map_err(truncated)?;
    let version = ShpReader::at(bytes, layout::VERSION_OFFSET)
        .read_i32_le()
        .map_err(truncated)?;
    let shape_type_code = ShpReader::at(bytes, layout::SHAPE_TYPE_OFFSET)
        .read_i32_le()
        .map_err(truncated)?;
    let mut bbox = [0.0; 4];
    for (slot, offset) in bbox.iter_mut().zip([
        layout::BBOX_XMIN_OFFSET,
        layout::BBOX_YMIN_OFFSET,
        layout::BBOX_XMAX_OFFSET,
        layout::BBOX_YMAX_OFFSET,
    ]) {
        *slot = ShpReader::at(bytes, offset)
            .read_f64_le()
            .map_err(truncated)?;
    }

    if file_code != layout::FILE_CODE {
        tracing::debug!(file_code, "unexpected shapefile file code");
    }

    Ok(Header {
        file_code,
        length,
        version,
        shape_type_code,
        bbox,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_header;
    use crate::shp::error::ShpError;
    use crate::shp::writer::ShpBuilder;

    #[test]
    fn parse_valid_header() {
        let bytes = ShpBuilder::new(5)
            .bbox([-1.0, -2.0, 3.0, 4.0])
            .polygon(&[&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)]])
            .build();

        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.file_code, 9994);
        assert_eq!(header.length, bytes.len());
        assert_eq!(header.version, 1000);
        assert_eq!(header.shape_type_code, 5);
        assert_eq!(header.bbox, [-1.0, -2.0, 3.0, 4.0]);
    }

    #[test]
    fn parse_short_header() {
        let bytes = vec![0u8; 99];
        let err = parse_header(&bytes).unwrap_err();
        assert_eq!(
            err,
            ShpError::TruncatedHeader {
                needed: 100,
                actual: 99
            }
        );
        assert!(err.to_string().contains("truncated header"));
    }

    #[test]
    fn declared_length_truncates_longer_buffer() {
        let mut bytes = ShpBuilder::new(1).point(1.0, 2.0).build();
        let declared = bytes.len();
        bytes.extend_from_slice(&[0xff; 24]);

        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.effective_len(bytes.len()), declared);
    }

    #[test]
    fn shorter_buffer_keeps_physical_length() {
        let bytes = ShpBuilder::new(1).declared_len(4096).point(1.0, 2.0).build();
        let header = parse_header(&bytes).unwrap();
        assert_eq!(header.length, 4096);
        assert_eq!(header.effective_len(bytes.len()), bytes.len());
    }
}
