//! File format parsing layer for bsprof captures.
//!
//! # Module Organization
//!
//! - [`header`]: Magic, version, sampling metadata and device strings
//! - [`body`]: Tagged records populating the string, module and path tables
//! - [`footer`]: The run end timestamp
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Header         │ ← header::parse()
//! │  (size-         │
//! │   delimited)    │
//! ├─────────────────┤
//! │  Body Records   │ ← body::parse()
//! │  (tagged,       │
//! │   zero ends)    │
//! ├─────────────────┤
//! │  Footer         │ ← footer::parse()
//! └─────────────────┘
//! ```

pub mod body;
pub mod footer;
pub mod header;
