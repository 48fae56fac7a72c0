//! Capture header parsing.
//!
//! # Header Structure
//! ```text
//! [8 bytes]  Magic "bsprof\0\0"
//! [varint]   Major, minor, patch version
//! [varint]   Header size (absolute offset of the body)
//! [4 bytes]  Requested sample ratio (f32 LE)
//! [4 bytes]  Actual sample ratio (f32 LE)
//! [1 byte]   Line specific data flag
//! [1 byte]   Memory operations flag
//! [varint]   Target run start timestamp
//! [utf8z]    Target name, supplemental info, target version,
//!            device vendor name, device model number, device firmware version
//! [...]      Extension bytes up to the declared header size
//! ```

use log::{debug, info, trace, warn};

use crate::bsprof::cursor::ByteReader;
use crate::bsprof::types::{
    error::{BsprofError, Result},
    models::{Header, Version},
};

pub const HEADER_MAGIC: [u8; 8] = *b"bsprof\0\0";

/// Parses the header and leaves the cursor at the start of the body.
pub fn parse(reader: &mut ByteReader<'_>, header: &mut Header) -> Result<()> {
    info!("Parsing bsprof header");

    let magic = reader.read_array::<8>()?;
    if magic != HEADER_MAGIC {
        return Err(BsprofError::InvalidMagic { found: magic });
    }

    header.version = Version {
        major: reader.read_u32("version major")?,
        minor: reader.read_u32("version minor")?,
        patch: reader.read_u32("version patch")?,
    };
    header.size = reader.read_u32("header size")?;
    trace!("Header version={}, declared size={}", header.version, header.size);

    header.requested_sample_ratio = reader.read_f32()?;
    header.actual_sample_ratio = reader.read_f32()?;
    header.line_specific_data = reader.read_bool()?;
    header.memory_operations = reader.read_bool()?;
    header.target_run_start_timestamp = reader.read_u64()?;
    debug!(
        "Sample ratio requested={} actual={}, line data={}, memory ops={}",
        header.requested_sample_ratio,
        header.actual_sample_ratio,
        header.line_specific_data,
        header.memory_operations
    );

    header.target_name = reader.read_string()?;
    header.supplemental_info = reader.read_string()?;
    header.target_version = reader.read_string()?;
    header.device_vendor_name = reader.read_string()?;
    header.device_model_number = reader.read_string()?;
    header.device_firmware_version = reader.read_string()?;

    // Newer producers may append fields; the declared size covers them.
    let declared = header.size as usize;
    let extension = declared.saturating_sub(reader.position());
    if extension > 0 {
        warn!("Skipping {} unknown header extension bytes", extension);
    }
    reader.skip_to(declared)?;

    info!(
        "Header parsed successfully: version={}, target='{}' {}, device='{}' {} ({})",
        header.version,
        header.target_name,
        header.target_version,
        header.device_vendor_name,
        header.device_model_number,
        header.device_firmware_version
    );
    Ok(())
}
