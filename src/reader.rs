use crate::error::DecodeError;

/// Byte order of all multi-byte fields in a section image.
///
/// Supplied by whoever extracted the section from its object file; the
/// decoder itself never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Random-access cursor over a read-only section image.
///
/// Reads are bounds-checked and a failed read leaves the cursor where it
/// was. Seeks are not bounds-checked; a cursor past the end simply makes
/// every subsequent read fail.
#[derive(Debug, Clone)]
pub struct DataReader<'a> {
    data: &'a [u8],
    endian: Endian,
    pos: usize,
}

impl<'a> DataReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            endian,
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek_to(&mut self, offset: usize) {
        self.pos = offset;
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        match self.data.get(self.pos..).and_then(|rest| rest.get(..count)) {
            Some(bytes) => {
                self.pos += count;
                Ok(bytes)
            }
            None => Err(DecodeError::UnexpectedEnd {
                offset: self.pos,
                needed: count,
                remaining: self.remaining(),
            }),
        }
    }

    /// Advance the cursor over `count` bytes without decoding them.
    pub fn skip(&mut self, count: usize) -> Result<(), DecodeError> {
        self.take(count).map(|_| ())
    }

    /// Read a fixed-width unsigned integer of `width` bytes, zero-extended
    /// to `u64`. Widths are 1, 2, 4, or 8.
    pub fn read_uint(&mut self, width: usize) -> Result<u64, DecodeError> {
        debug_assert!(
            matches!(width, 1 | 2 | 4 | 8),
            "unsupported read width {width}"
        );
        let bytes = self.take(width)?;
        let mut value: u64 = 0;
        match self.endian {
            Endian::Little => {
                for &b in bytes.iter().rev() {
                    value = (value << 8) | u64::from(b);
                }
            }
            Endian::Big => {
                for &b in bytes {
                    value = (value << 8) | u64::from(b);
                }
            }
        }
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_uint(1)? as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(self.read_uint(2)? as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(self.read_uint(4)? as u32)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.read_uint(8)
    }

    /// Read an unsigned LEB128 value. Bits past the 64th are dropped.
    pub fn read_uleb128(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let offset = self.pos;
            let Some(&byte) = self.data.get(offset) else {
                self.pos = start;
                return Err(DecodeError::UnexpectedEnd {
                    offset,
                    needed: 1,
                    remaining: 0,
                });
            };
            self.pos += 1;
            if shift < 64 {
                value |= u64::from(byte & 0x7F) << shift;
            }
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}
