use super::error::{ReadError, ShpError};
use super::layout;
use super::reader::ShpReader;

/// One framed record; `payload` borrows the shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Sequence number as stored (1-based by convention).
    pub id: u32,
    /// Content length in bytes (shape type included).
    pub byte_length: usize,
    /// Record-local shape type; 0 marks a null geometry.
    pub shape_type: i32,
    /// Content after the record shape type.
    pub payload: &'a [u8],
    /// Absolute offset of the record header.
    pub offset: usize,
}

impl Record<'_> {
    pub fn is_null(&self) -> bool {
        self.shape_type == 0
    }
}

/// Lazy walk over the records following the header.
///
/// Yields at most one error, then stops.
///
/// # Examples
/// ```
/// use shpjson_core::shp::records::RecordFramer;
///
/// let bytes = vec![0u8; 100];
/// assert_eq!(RecordFramer::new(&bytes).count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RecordFramer<'a> {
    bytes: &'a [u8],
    offset: usize,
    index: usize,
    failed: bool,
}

impl<'a> RecordFramer<'a> {
    /// `bytes` is the full file, already truncated to its declared length.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: layout::HEADER_LEN,
            index: 0,
            failed: false,
        }
    }

    fn frame(&mut self) -> Result<Record<'a>, ShpError> {
        let start = self.offset;
        let index = self.index + 1;
        let corrupt = |err: ReadError| ShpError::CorruptRecord {
            index,
            offset: start,
            reason: err.to_string(),
        };

        let mut reader = ShpReader::at(self.bytes, start);
        let id = reader.read_u32_be().map_err(corrupt)?;
        let byte_length = reader
            .read_u32_be()
            .map(layout::words_to_bytes)
            .map_err(corrupt)?;

        let (shape_type, payload) = if byte_length == 0 {
            (0, &[][..])
        } else {
            let content = reader.read_slice(byte_length).map_err(corrupt)?;
            let shape_type = ShpReader::new(content).read_i32_le().map_err(corrupt)?;
            let payload = content
                .get(layout::RECORD_SHAPE_TYPE_LEN..)
                .unwrap_or_default();
            (shape_type, payload)
        };

        self.offset = reader.position();
        self.index = index;
        Ok(Record {
            id,
            byte_length,
            shape_type,
            payload,
            offset: start,
        })
    }
}

impl<'a> Iterator for RecordFramer<'a> {
    type Item = Result<Record<'a>, ShpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        let result = self.frame();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
