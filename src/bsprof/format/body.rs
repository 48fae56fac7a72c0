//! Body record parsing.
//!
//! The body is a sequence of records, each introduced by a varint whose low
//! three bits select the record kind and whose upper bits carry the id of the
//! table row (and, for memory records, the operation type). A zero varint
//! terminates the body.
//!
//! ```text
//! tag  record              id bits       fields
//! 000  string table        entry >> 3    utf8z
//! 001  executable module   entry >> 3    name string id
//! 010  path element        entry >> 3    caller id, then root or child layout
//! 011  memory operation    entry >> 5    [line offset], address, [alloc size]
//! 100  cpu measurement     entry >> 3    [line offset], self cpu, self time
//! 101  path call count     entry >> 3    call count
//! ```

use log::{info, trace, warn};

use crate::bsprof::cursor::ByteReader;
use crate::bsprof::types::{
    error::{BsprofError, Result},
    models::{
        CpuMeasurement, FrameKind, MemoryOperation, MemoryOperationType, PathElementProps,
    },
    profile::ProfilerFile,
};

const TAG_BITS: u32 = 3;
const TAG_MASK: u64 = 0b111;
const MEMORY_OP_BITS: u32 = 2;
const MEMORY_OP_MASK: u64 = 0b11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTag {
    StringTable = 0b000,
    ExecutableModule = 0b001,
    PathElement = 0b010,
    MemoryOperation = 0b011,
    CpuMeasurement = 0b100,
    PathCallCount = 0b101,
}

impl TryFrom<u8> for EntryTag {
    type Error = u8;
    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0b000 => Ok(Self::StringTable),
            0b001 => Ok(Self::ExecutableModule),
            0b010 => Ok(Self::PathElement),
            0b011 => Ok(Self::MemoryOperation),
            0b100 => Ok(Self::CpuMeasurement),
            0b101 => Ok(Self::PathCallCount),
            other => Err(other),
        }
    }
}

/// Parses body records until a zero entry or the end of the buffer.
pub fn parse(file: &mut ProfilerFile, reader: &mut ByteReader<'_>) -> Result<()> {
    info!("Parsing bsprof body at byte {}", reader.position());
    let mut records = 0usize;
    let mut terminated = false;

    while reader.has_bytes_to_read() {
        let offset = reader.position();
        let entry = reader.read_u64()?;
        if entry == 0 {
            terminated = true;
            break;
        }

        let bits = (entry & TAG_MASK) as u8;
        let tag = EntryTag::try_from(bits)
            .map_err(|tag| BsprofError::UnknownBodyEntry { tag, offset })?;
        trace!("Body entry {:?} ({:#x}) at byte {}", tag, entry, offset);

        let lsd = file.header.line_specific_data;
        match tag {
            EntryTag::StringTable => handle_string_table_entry(file, reader, entry, offset)?,
            EntryTag::ExecutableModule => {
                handle_executable_module_entry(file, reader, entry, offset)?
            }
            EntryTag::PathElement => handle_path_element_entry(file, reader, entry, offset, lsd)?,
            EntryTag::MemoryOperation => {
                handle_memory_operation_entry(file, reader, entry, offset, lsd)?
            }
            EntryTag::CpuMeasurement => {
                handle_cpu_measurement_entry(file, reader, entry, offset, lsd)?
            }
            EntryTag::PathCallCount => handle_path_call_count_entry(file, reader, entry, offset)?,
        }
        records += 1;
    }

    if !terminated {
        warn!("Body ended at byte {} without a terminating entry", reader.position());
    }
    info!(
        "Body parsed: {} records, {} strings, {} modules, {} path elements",
        records,
        file.body.string_table.len(),
        file.body.executable_modules.len(),
        file.body.path_elements.len()
    );
    Ok(())
}

/// Extracts the id packed above the tag (and any auxiliary bits).
fn entry_id(entry: u64, shift: u32, offset: usize, context: &'static str) -> Result<u32> {
    let value = entry >> shift;
    u32::try_from(value).map_err(|_| BsprofError::ValueOutOfRange {
        offset,
        value,
        context,
    })
}

fn handle_string_table_entry(
    file: &mut ProfilerFile,
    reader: &mut ByteReader<'_>,
    entry: u64,
    offset: usize,
) -> Result<()> {
    let id = entry_id(entry, TAG_BITS, offset, "string id")?;
    if id == 0 {
        return Ok(());
    }
    let value = reader.read_string()?;
    file.body.string_table.insert(id, value);
    Ok(())
}

fn handle_executable_module_entry(
    file: &mut ProfilerFile,
    reader: &mut ByteReader<'_>,
    entry: u64,
    offset: usize,
) -> Result<()> {
    let id = entry_id(entry, TAG_BITS, offset, "module id")?;
    if id == 0 {
        return Ok(());
    }
    let name_string_id = reader.read_u32("module name string id")?;
    file.body.executable_modules.insert(id, name_string_id);
    Ok(())
}

fn handle_path_element_entry(
    file: &mut ProfilerFile,
    reader: &mut ByteReader<'_>,
    entry: u64,
    offset: usize,
    line_specific_data: bool,
) -> Result<()> {
    let id = entry_id(entry, TAG_BITS, offset, "path element id")?;

    let caller_id = reader.read_u32("caller id")?;
    let kind = if caller_id == 0 {
        FrameKind::Root {
            module_id: reader.read_u32("module id")?,
        }
    } else {
        let line_offset_in_caller = if line_specific_data {
            Some(reader.read_u32("line offset in caller")?)
        } else {
            None
        };
        FrameKind::Child {
            caller_id,
            line_offset_in_caller,
        }
    };
    let props = PathElementProps {
        kind,
        file_name_string_id: reader.read_u32("file name string id")?,
        line_number: reader.read_u32("line number")?,
        function_name_string_id: reader.read_u32("function name string id")?,
    };

    file.get_path_element(id).props = Some(props);
    if caller_id != 0 {
        file.assign_to_parent(id);
    }
    Ok(())
}

fn handle_memory_operation_entry(
    file: &mut ProfilerFile,
    reader: &mut ByteReader<'_>,
    entry: u64,
    offset: usize,
    line_specific_data: bool,
) -> Result<()> {
    let id = entry_id(entry, TAG_BITS + MEMORY_OP_BITS, offset, "path element id")?;
    let op_bits = ((entry >> TAG_BITS) & MEMORY_OP_MASK) as u8;
    let op_type = MemoryOperationType::from(op_bits);
    if let MemoryOperationType::Unknown(value) = op_type {
        warn!("Memory operation with reserved type {} at byte {}", value, offset);
    }

    let line_offset = if line_specific_data {
        reader.read_u32("line offset")?
    } else {
        0
    };
    let mem_address = reader.read_u32("memory address")?;
    let alloc_size = if op_type.has_alloc_size() {
        Some(reader.read_u32("allocation size")?)
    } else {
        None
    };

    file.add_memory_operation(
        id,
        MemoryOperation {
            op_index: 0,
            op_type,
            line_offset,
            mem_address,
            alloc_size,
        },
    );
    Ok(())
}

fn handle_cpu_measurement_entry(
    file: &mut ProfilerFile,
    reader: &mut ByteReader<'_>,
    entry: u64,
    offset: usize,
    line_specific_data: bool,
) -> Result<()> {
    let id = entry_id(entry, TAG_BITS, offset, "path element id")?;
    let line_offset = if line_specific_data {
        reader.read_u32("line offset")?
    } else {
        0
    };
    let self_cpu = reader.read_u32("self cpu")?;
    let self_time = reader.read_u32("self time")?;

    file.add_cpu_measurement(
        id,
        CpuMeasurement {
            op_index: 0,
            line_offset,
            self_cpu,
            self_time,
        },
    );
    Ok(())
}

fn handle_path_call_count_entry(
    file: &mut ProfilerFile,
    reader: &mut ByteReader<'_>,
    entry: u64,
    offset: usize,
) -> Result<()> {
    let id = entry_id(entry, TAG_BITS, offset, "path element id")?;
    let call_count = reader.read_u32("call count")?;
    file.add_call_count_entry(id, call_count);
    Ok(())
}
