//! # bsprof-reader
//!
//! A reader for BrightScript profiler capture files (`.bsprof`).
//!
//! Decodes the header, the tagged body records and the footer into a
//! [`ProfilerFile`]: an interned string table, executable modules, and the
//! call graph of path elements with their CPU, memory and call-count samples.
//!
//! ```no_run
//! let bytes = std::fs::read("capture.bsprof").unwrap();
//! let file = bsprof_reader::parse_file(&bytes);
//! if file.is_ok() {
//!     for root in file.roots() {
//!         println!("{:?}", file.function_name(root.id));
//!     }
//! }
//! ```
pub mod bsprof;

// Re-export the main types for convenience
pub use bsprof::{
    parse_file, parse_file_with,
    options::{DecodeOptions, Utf8Policy},
    types::{
        error::{BsprofError, FileError, Result},
        models::{
            CpuMeasurement, Footer, FrameKind, Header, MemoryOperation, MemoryOperationType,
            ModuleId, PathElement, PathElementId, PathElementProps, ProfilerBody, StringId,
            Version,
        },
        profile::ProfilerFile,
    },
};
