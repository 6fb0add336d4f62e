use thiserror::Error;

/// A structured `.debug_aranges` decode failure.
///
/// Every variant carries the offset it was detected at, so a caller walking
/// many sets can report which one went bad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of data at offset {offset:#X}: needed {needed} bytes, {remaining} remain")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("set at offset {offset:#X} declares {declared} bytes but only {available} remain")]
    TruncatedSet {
        offset: usize,
        declared: u32,
        available: usize,
    },

    #[error("set at offset {offset:#X} has unsupported version {version}")]
    UnsupportedVersion { offset: usize, version: u16 },

    #[error("set at offset {offset:#X} has unsupported address size {addr_size}")]
    UnsupportedAddressSize { offset: usize, addr_size: u8 },

    #[error("descriptor list of set at offset {offset:#X} ends without a terminator")]
    MissingTerminator { offset: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_offsets() {
        let e = DecodeError::UnsupportedVersion {
            offset: 0x30,
            version: 5,
        };
        assert_eq!(e.to_string(), "set at 0x30 has unsupported version 5");

        let wrapped = Error::from(e);
        assert_eq!(wrapped.to_string(), "set at 0x30 has unsupported version 5");
    }

    #[test]
    fn test_display_truncation() {
        let e = DecodeError::UnexpectedEnd {
            offset: 0x10,
            needed: 4,
            remaining: 2,
        };
        assert_eq!(
            e.to_string(),
            "unexpected end of data at offset 0x10: needed 4 bytes, 2 remain"
        );
    }
}
