//! ESRI Shapefile (`.shp`) geometry decoding.
//!
//! The decoder is a strict pipeline: the header reader validates the fixed
//! 100-byte preamble, the record framer walks `(id, length, shape type,
//! payload)` frames, the geometry parser applies one of eight field layouts
//! selected by the file-level shape type, and the ring assembler groups
//! polygon rings into outer boundaries and holes by orientation.
//!
//! Layering follows the usual split:
//! - `layout`: byte offsets and widths (source of truth)
//! - `reader`: bounds-checked cursor, endianness conventions
//! - `header` / `records`: preamble and framing
//! - `parser` / `rings`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//! - `writer`: byte-level builder for fixtures and tests
//!
//! Decoding is pure: no I/O, no shared state, and the input buffer is never
//! modified.
//!
//! Version française (résumé):
//! Le module décode le format binaire `.shp` : en-tête fixe, découpage des
//! enregistrements, lecture des huit dispositions de champs, puis
//! regroupement des anneaux de polygones selon leur orientation. Les positions
//! sont dans `layout`, les lectures sûres dans `reader`.

pub mod decode;
pub mod error;
pub mod header;
pub mod layout;
pub(crate) mod parser;
pub mod reader;
pub mod records;
pub mod rings;
pub mod shape_type;
pub mod writer;

pub use decode::{ShpDecoder, parse_shp, parse_shp_with};
pub use error::{ReadError, ShpError};
pub use header::{Header, parse_header};
pub use records::{Record, RecordFramer};
pub use shape_type::ShapeType;
