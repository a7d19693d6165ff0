//! Byte offsets and field widths of the `.shp` format.
//!
//! Header offsets are absolute; payload offsets are relative to the first
//! byte after the record shape type.

pub const HEADER_LEN: usize = 100;
pub const FILE_CODE_OFFSET: usize = 0;
pub const FILE_LENGTH_OFFSET: usize = 24;
pub const VERSION_OFFSET: usize = 28;
pub const SHAPE_TYPE_OFFSET: usize = 32;
pub const BBOX_XMIN_OFFSET: usize = 36;
pub const BBOX_YMIN_OFFSET: usize = 44;
pub const BBOX_XMAX_OFFSET: usize = 52;
pub const BBOX_YMAX_OFFSET: usize = 60;

pub const FILE_CODE: i32 = 9994;

pub const RECORD_SHAPE_TYPE_LEN: usize = 4;

pub const BBOX_LEN: usize = 32;
pub const POINT_LEN: usize = 16;
pub const PART_INDEX_LEN: usize = 4;
pub const Z_RANGE_LEN: usize = 16;

pub const POINT_Z_OFFSET: usize = 16;

pub const MULTIPOINT_NUM_POINTS_OFFSET: usize = 32;
pub const MULTIPOINT_POINTS_OFFSET: usize = 36;

pub const POLY_NUM_PARTS_OFFSET: usize = 32;
pub const POLY_PARTS_OFFSET: usize = 40;

/// Offset added to a base code for measured variants.
pub const M_CODE_OFFSET: i32 = 20;

/// Lengths are stored as counts of 16-bit words.
pub const fn words_to_bytes(words: u32) -> usize {
    (words as usize) << 1
}
