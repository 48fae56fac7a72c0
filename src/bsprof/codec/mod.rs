//! Codec layer for the primitive encodings used by bsprof captures.
//!
//! # Submodules
//!
//! - [`varint`][]: LEB128 variable-length unsigned integers

pub mod varint;
