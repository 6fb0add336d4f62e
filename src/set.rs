use crate::error::DecodeError;
use crate::reader::DataReader;

/// Only version 2 of the range-table format has ever been issued.
const SUPPORTED_VERSION: u16 = 2;

/// Byte size of the length field, which `Header::length` itself excludes.
const LENGTH_FIELD_SIZE: usize = 4;

/// Decoded per-set header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Total byte length of the remaining header fields plus the descriptor
    /// region; does not include the 4-byte length field itself.
    pub length: u32,
    /// Format version; must be 2.
    pub version: u16,
    /// Offset of the described compilation unit in the paired debug-info
    /// section. Opaque here, round-tripped for the caller.
    pub cu_offset: u32,
    /// Size in bytes of a target address: 1, 2, 4, or 8.
    pub addr_size: u8,
    /// Size in bytes of a segment selector; 0 on flat-address targets.
    pub seg_size: u8,
}

/// One covered region: segment-relative start address and byte length.
///
/// A zero `length` with a nonzero `address` is a legal zero-width marker;
/// only the all-zero pair terminates a descriptor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub address: u64,
    pub length: u64,
}

impl Descriptor {
    /// One past the last covered address. Saturates on corrupt inputs.
    pub fn end_address(&self) -> u64 {
        self.address.saturating_add(self.length)
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.address && address < self.end_address()
    }
}

/// One decoded address range set: header plus descriptors in file order.
///
/// Constructed empty and populated by a single [`extract`](Self::extract)
/// call; a failed extract leaves the set empty, never half-decoded. The
/// offset tag is bookkeeping for the owner and survives extract failures;
/// [`clear`](Self::clear) resets everything.
#[derive(Debug, Clone, Default)]
pub struct ArangeSet {
    offset: Option<usize>,
    header: Header,
    descriptors: Vec<Descriptor>,
}

impl ArangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag this set with its starting offset in the owning section.
    /// Does not read data.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = Some(offset);
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Reset to the empty default for reuse across repeated extract calls.
    pub fn clear(&mut self) {
        self.offset = None;
        self.reset_decoded();
    }

    fn reset_decoded(&mut self) {
        self.header = Header::default();
        self.descriptors.clear();
    }

    /// Decode one set starting at the reader's current position.
    ///
    /// On success the cursor lands exactly on the set's declared end,
    /// `set_start + 4 + length`. On a failure past an in-bounds length
    /// field the cursor is resynchronized to that same boundary, so a
    /// caller iterating a section of concatenated sets can skip this one
    /// and keep decoding. A failure reading the length itself, or a
    /// declared extent past the end of the buffer, cannot compute a
    /// boundary and leaves the cursor where the failed read left it.
    pub fn extract(&mut self, reader: &mut DataReader<'_>) -> Result<(), DecodeError> {
        self.reset_decoded();

        let set_start = reader.position();
        let length = reader.read_u32()?;
        let next_set_offset = set_start + LENGTH_FIELD_SIZE + length as usize;
        if next_set_offset > reader.len() {
            return Err(DecodeError::TruncatedSet {
                offset: set_start,
                declared: length,
                available: reader.remaining(),
            });
        }

        let result = self.extract_body(reader, set_start, next_set_offset, length);
        if result.is_err() {
            self.reset_decoded();
        }
        reader.seek_to(next_set_offset);
        result
    }

    fn extract_body(
        &mut self,
        reader: &mut DataReader<'_>,
        set_start: usize,
        next_set_offset: usize,
        length: u32,
    ) -> Result<(), DecodeError> {
        let version = reader.read_u16()?;
        let cu_offset = reader.read_u32()?;
        let addr_size = reader.read_u8()?;
        let seg_size = reader.read_u8()?;

        if version != SUPPORTED_VERSION {
            return Err(DecodeError::UnsupportedVersion {
                offset: set_start,
                version,
            });
        }
        if !matches!(addr_size, 1 | 2 | 4 | 8) {
            return Err(DecodeError::UnsupportedAddressSize {
                offset: set_start,
                addr_size,
            });
        }

        self.header = Header {
            length,
            version,
            cu_offset,
            addr_size,
            seg_size,
        };

        // The first tuple sits on a multiple of the tuple stride measured
        // from the start of the set; the header is padded up to that
        // boundary. Padding content is not validated.
        let stride = seg_size as usize + 2 * addr_size as usize;
        let header_size = reader.position() - set_start;
        let first_tuple = header_size.div_ceil(stride) * stride;
        reader.seek_to(set_start + first_tuple);

        loop {
            if reader.position() + stride > next_set_offset {
                return Err(DecodeError::MissingTerminator { offset: set_start });
            }
            if seg_size > 0 {
                // Segment selectors are consumed but not retained.
                reader.skip(seg_size as usize)?;
            }
            let address = reader.read_uint(addr_size as usize)?;
            let length = reader.read_uint(addr_size as usize)?;
            if address == 0 && length == 0 {
                return Ok(());
            }
            self.descriptors.push(Descriptor { address, length });
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of retained descriptors; the terminator is never counted.
    pub fn num_descriptors(&self) -> usize {
        self.descriptors.len()
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Hot-path access without a bounds check of its own: panics if
    /// `i >= num_descriptors()`. Use [`get_descriptor`](Self::get_descriptor)
    /// when the index is not already known to be valid.
    pub fn descriptor(&self, i: usize) -> &Descriptor {
        &self.descriptors[i]
    }

    pub fn get_descriptor(&self, i: usize) -> Option<&Descriptor> {
        self.descriptors.get(i)
    }

    /// Index of the first descriptor whose range contains `address`.
    ///
    /// Descriptors are scanned in file order, not sorted order; when ranges
    /// overlap the lowest index wins.
    pub fn find_address(&self, address: u64) -> Option<usize> {
        self.descriptors.iter().position(|d| d.contains(address))
    }
}
