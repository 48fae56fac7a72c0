//! Decode configuration.

/// How null-terminated strings with invalid UTF-8 are handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Policy {
    /// Replace malformed sequences with U+FFFD.
    #[default]
    Lossy,
    /// Fail the decode with [`BsprofError::InvalidUtf8`](crate::BsprofError::InvalidUtf8).
    Strict,
}

/// Options accepted by [`parse_file_with`](crate::parse_file_with) and
/// [`ProfilerFile::from_path`](crate::ProfilerFile::from_path).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub utf8: Utf8Policy,
}

impl DecodeOptions {
    /// Options that reject malformed UTF-8 instead of replacing it.
    pub fn strict() -> Self {
        Self { utf8: Utf8Policy::Strict }
    }
}
