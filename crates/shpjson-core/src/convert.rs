use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::ShapeFile;
use crate::shp::{ShpError, parse_shp_with};
use crate::transform::CoordinateTransform;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("shapefile error: {0}")]
    Shp(#[from] ShpError),
}

/// Read a `.shp` file and decode every record.
///
/// # Errors
/// Returns [`ConvertError::Io`] when the file cannot be read and
/// [`ConvertError::Shp`] when its contents are not a decodable shapefile.
pub fn decode_shp_file(
    path: &Path,
    transform: Option<&dyn CoordinateTransform>,
) -> Result<ShapeFile, ConvertError> {
    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read shapefile");
    let shapes = parse_shp_with(&bytes, transform)?;
    tracing::info!(
        path = %path.display(),
        records = shapes.geometries.len(),
        nulls = shapes.null_count(),
        "decoded shapefile"
    );
    Ok(shapes)
}
