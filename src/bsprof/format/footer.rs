//! Capture footer parsing.

use log::{debug, info};

use crate::bsprof::cursor::ByteReader;
use crate::bsprof::types::{error::Result, models::Footer};

/// Reads the end timestamp. Anything after it is ignored.
pub fn parse(reader: &mut ByteReader<'_>, footer: &mut Footer) -> Result<()> {
    footer.target_run_end_timestamp = reader.read_u64()?;
    if reader.has_bytes_to_read() {
        debug!("Ignoring {} trailing bytes after footer", reader.bytes_left());
    }
    info!("Footer parsed: run end timestamp={}", footer.target_run_end_timestamp);
    Ok(())
}
