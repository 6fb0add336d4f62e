use std::path::Path;

use crate::error::{DecodeError, Error};
use crate::reader::{DataReader, Endian};
use crate::set::ArangeSet;

/// Iterator over every set in a `.debug_aranges` section image.
///
/// A set that fails to decode is yielded as an error and iteration resumes
/// at that set's declared end, so one corrupt set costs one missing range
/// table rather than the rest of the section. Iteration stops at end of
/// data, on a truncation that leaves no resume point, and whenever a decode
/// fails to move the cursor forward.
pub struct SetIter<'a> {
    reader: DataReader<'a>,
    done: bool,
}

impl<'a> SetIter<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            reader: DataReader::new(data, endian),
            done: false,
        }
    }
}

impl Iterator for SetIter<'_> {
    type Item = Result<ArangeSet, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.reader.remaining() == 0 {
            return None;
        }
        let start = self.reader.position();
        let mut set = ArangeSet::new();
        set.set_offset(start);
        match set.extract(&mut self.reader) {
            Ok(()) => Some(Ok(set)),
            Err(e) => {
                // A decode that did not advance has no resume point, and a
                // set whose declared extent runs past the buffer leaves
                // nothing after it to trust.
                if self.reader.position() <= start
                    || matches!(e, DecodeError::TruncatedSet { .. })
                {
                    self.done = true;
                }
                Some(Err(e))
            }
        }
    }
}

/// All sets decoded from one section image, plus the failures skipped
/// along the way.
#[derive(Debug, Clone, Default)]
pub struct DebugAranges {
    sets: Vec<ArangeSet>,
    errors: Vec<DecodeError>,
}

impl DebugAranges {
    /// Decode every set in `data`, keeping the good ones and recording an
    /// error per skipped set.
    pub fn decode(data: &[u8], endian: Endian) -> Self {
        let mut sets = Vec::new();
        let mut errors = Vec::new();
        for item in SetIter::new(data, endian) {
            match item {
                Ok(set) => sets.push(set),
                Err(e) => errors.push(e),
            }
        }
        Self { sets, errors }
    }

    /// Read `path` as a raw section image and decode it.
    pub fn from_file(path: impl AsRef<Path>, endian: Endian) -> Result<Self, Error> {
        let data = std::fs::read(path)?;
        Ok(Self::decode(&data, endian))
    }

    pub fn sets(&self) -> &[ArangeSet] {
        &self.sets
    }

    /// Errors from sets that failed to decode and were skipped.
    pub fn errors(&self) -> &[DecodeError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// `cu_offset` of the first set in file order with a descriptor
    /// containing `address`.
    pub fn find_address(&self, address: u64) -> Option<u32> {
        self.sets
            .iter()
            .find(|set| set.find_address(address).is_some())
            .map(|set| set.header().cu_offset)
    }
}
