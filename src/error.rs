use std::fmt;

/// Everything that can go wrong loading property tables or a `.atr` trie, or
/// calling into a scanner with an unloaded/misconfigured context.
///
/// Every failure is a value: there are no panics on the happy path or on
/// malformed input. The two assertion-style variants below exist only to
/// give a name to genuine programmer errors (not data errors) so that
/// callers which do hit them during development get a useful message
/// instead of an index-out-of-bounds panic deep in a ring buffer.
#[derive(Debug)]
pub enum Error {
    /// The `.atr` file did not start with the 8-byte `ARBOTRIE` magic.
    BadMagic,

    /// The `.atr` file's version field did not match a version this reader
    /// understands.
    BadVersion(u16),

    /// A chunk's declared length ran past the end of the file.
    TruncatedChunk {
        tag: [u8; 4],
    },

    /// A `FORM` chunk was not exactly 8 bytes.
    MalformedFormChunk {
        len: u32,
    },

    /// The file contained no `FORM` chunk at all.
    MissingFormChunk,

    /// The trailing CRC-32 did not match the computed checksum; the trie
    /// that was being built is discarded.
    ChecksumMismatch {
        expected: u32,
        computed: u32,
    },

    /// Underlying I/O failure while reading a table or trie source.
    Io(std::io::Error),

    /// A `BreakCache` was asked for a capacity that is not a power of two.
    CapacityNotPowerOfTwo(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadMagic => write!(f, "trie load failed: bad magic bytes"),
            Error::BadVersion(v) => write!(f, "trie load failed: unsupported version {v}"),
            Error::TruncatedChunk { tag } => write!(
                f,
                "trie load failed: truncated chunk {:?}",
                String::from_utf8_lossy(tag)
            ),
            Error::MalformedFormChunk { len } => write!(
                f,
                "trie load failed: FORM chunk has wrong size ({len} bytes, expected 8)"
            ),
            Error::MissingFormChunk => write!(f, "trie load failed: no FORM chunk present"),
            Error::ChecksumMismatch { expected, computed } => write!(
                f,
                "trie load failed: checksum mismatch (file says {expected:#010x}, computed {computed:#010x})"
            ),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::CapacityNotPowerOfTwo(cap) => {
                write!(f, "break cache capacity {cap} is not a power of two")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
