//! Error types for the bsprof-reader crate.

use thiserror::Error;

/// Coarse classification of a decode failure, stored on the
/// [`ProfilerFile`](super::profile::ProfilerFile) aggregate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileError {
    /// Decoding completed without error.
    #[default]
    None,
    /// Generic decode failure (truncated data, bad varint, invalid field value).
    ParseError,
    /// The buffer does not start with the `bsprof\0\0` signature.
    FileNotBsprof,
    /// The capture could not be loaded from disk.
    FileNotValid,
    /// A body record carried a tag this reader does not understand.
    UnknownBodyEntry,
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            FileError::None => "none",
            FileError::ParseError => "parse error",
            FileError::FileNotBsprof => "file is not a bsprof capture",
            FileError::FileNotValid => "file is not valid",
            FileError::UnknownBodyEntry => "unknown body entry",
        };
        f.write_str(name)
    }
}

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum BsprofError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The first 8 bytes are not the bsprof magic.
    #[error("Invalid magic: expected \"bsprof\\0\\0\", found {found:02x?}")]
    InvalidMagic { found: [u8; 8] },

    /// A read ran past the end of the buffer.
    #[error("Unexpected end of data at byte {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A variable-length integer does not fit in 64 bits.
    #[error("Varint starting at byte {offset} overflows 64 bits")]
    VarintOverflow { offset: usize },

    /// A varint decoded fine but is too wide for the field it populates.
    #[error("Value {value} at byte {offset} is out of range for {context}")]
    ValueOutOfRange {
        offset: usize,
        value: u64,
        context: &'static str,
    },

    /// A null-terminated string is not valid UTF-8 (strict decoding only).
    #[error("Invalid UTF-8 in string starting at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// The declared header size ends before the fields already read.
    #[error("Declared header size {declared} is smaller than the {position} bytes already read")]
    HeaderSizeMismatch { declared: usize, position: usize },

    /// A body record tag outside the known set. The cursor cannot be resynchronised.
    #[error("Unknown body entry tag {tag:#05b} found at byte {offset}")]
    UnknownBodyEntry { tag: u8, offset: usize },
}

impl BsprofError {
    /// Maps this error onto the coarse kind recorded on a capture.
    pub fn kind(&self) -> FileError {
        match self {
            BsprofError::Io(_) => FileError::FileNotValid,
            BsprofError::InvalidMagic { .. } => FileError::FileNotBsprof,
            BsprofError::UnknownBodyEntry { .. } => FileError::UnknownBodyEntry,
            _ => FileError::ParseError,
        }
    }
}

/// A convenience `Result` type alias using the crate's `BsprofError` type.
pub type Result<T> = std::result::Result<T, BsprofError>;
