//! Core bsprof decoding module

pub mod codec;
pub mod cursor;
pub mod format;
pub mod options;
pub mod types;

use log::{info, warn};

use cursor::ByteReader;
use options::DecodeOptions;
use types::error::Result;
use types::profile::ProfilerFile;

/// Decodes a capture held fully in memory, using default options.
///
/// Never fails outright: a malformed capture comes back with
/// [`ProfilerFile::error`] set and whatever was decoded before the failure.
pub fn parse_file(bytes: &[u8]) -> ProfilerFile {
    parse_file_with(bytes, &DecodeOptions::default())
}

/// Decodes a capture held fully in memory.
pub fn parse_file_with(bytes: &[u8], options: &DecodeOptions) -> ProfilerFile {
    info!("Decoding bsprof capture ({} bytes)", bytes.len());
    let mut reader = ByteReader::new(bytes, options.utf8);
    let mut file = ProfilerFile::new();

    if let Err(e) = decode(&mut file, &mut reader) {
        warn!("Decode stopped at byte {}: {}", reader.position(), e);
        file.record_error(e);
    }

    file
}

fn decode(file: &mut ProfilerFile, reader: &mut ByteReader<'_>) -> Result<()> {
    format::header::parse(reader, &mut file.header)?;
    format::body::parse(file, reader)?;
    format::footer::parse(reader, &mut file.footer)?;
    Ok(())
}
