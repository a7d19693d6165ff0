use super::error::ReadError;

/// Bounds-checked cursor over a `.shp` byte region.
///
/// Every field width and endianness decision of the format goes through this
/// type. Reads never go past the end of the slice; they fail with
/// [`ReadError::TooShort`] instead.
///
/// # Examples
/// ```
/// use shpjson_core::shp::reader::ShpReader;
///
/// let bytes = [0x00, 0x00, 0x27, 0x0a];
/// let mut reader = ShpReader::new(&bytes);
/// assert_eq!(reader.read_i32_be().unwrap(), 9994);
/// assert_eq!(reader.position(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ShpReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ShpReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn require_len(&self, needed: usize) -> Result<(), ReadError> {
        if self.bytes.len() < needed {
            return Err(ReadError::TooShort {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Check that `count` fields of `width` bytes remain after the cursor.
    pub fn require_available(&self, count: usize, width: usize) -> Result<(), ReadError> {
        let needed = count
            .checked_mul(width)
            .and_then(|len| self.pos.checked_add(len))
            .ok_or(ReadError::TooShort {
                needed: usize::MAX,
                actual: self.bytes.len(),
            })?;
        self.require_len(needed)
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), ReadError> {
        self.require_len(pos)?;
        self.pos = pos;
        Ok(())
    }

    pub fn advance(&mut self, count: usize) -> Result<(), ReadError> {
        let target = self.end_of(count)?;
        self.seek(target)
    }

    pub fn read_i32_be(&mut self) -> Result<i32, ReadError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32, ReadError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f64_le(&mut self) -> Result<f64, ReadError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian count field, rejecting negative values.
    pub fn read_count_le(&mut self, field: &'static str) -> Result<usize, ReadError> {
        let value = self.read_i32_le()?;
        usize::try_from(value).map_err(|_| ReadError::NegativeCount { field, value })
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.end_of(len)?;
        let slice = self.bytes.get(self.pos..end).ok_or(ReadError::TooShort {
            needed: end,
            actual: self.bytes.len(),
        })?;
        self.pos = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let slice = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn end_of(&self, len: usize) -> Result<usize, ReadError> {
        self.pos.checked_add(len).ok_or(ReadError::TooShort {
            needed: usize::MAX,
            actual: self.bytes.len(),
        })
    }
}
