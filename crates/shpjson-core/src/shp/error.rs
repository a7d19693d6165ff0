use thiserror::Error;

/// Errors returned by shapefile decoding.
///
/// All variants are fatal to the current decode call.
///
/// # Examples
/// ```
/// use shpjson_core::ShpError;
///
/// let err = ShpError::UnsupportedShapeType { code: 31 };
/// assert!(err.to_string().contains("unsupported shape type"));
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShpError {
    #[error("truncated header: need {needed} bytes, got {actual}")]
    TruncatedHeader { needed: usize, actual: usize },
    #[error("corrupt record #{index} at offset {offset}: {reason}")]
    CorruptRecord {
        index: usize,
        offset: usize,
        reason: String,
    },
    #[error("unsupported shape type: {code}")]
    UnsupportedShapeType { code: i32 },
}

/// Bounds failure raised by the byte cursor.
///
/// Callers map it onto the [`ShpError`] variant matching the region being
/// read (header or record).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    #[error("buffer too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("negative {field}: {value}")]
    NegativeCount { field: &'static str, value: i32 },
    #[error("part {part} ends at vertex {end} before it starts at {start}")]
    PartOutOfOrder {
        part: usize,
        start: usize,
        end: usize,
    },
}
