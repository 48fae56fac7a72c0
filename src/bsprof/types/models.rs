//! Core data structures for bsprof capture components.
//!
//! This module defines the records decoded from a capture:
//! - Header metadata and footer timestamps
//! - Path elements (call-stack frames) and their samples
//! - The id-keyed tables making up the body

use std::collections::BTreeMap;
use std::fmt;

pub type StringId = u32;
pub type ModuleId = u32;
pub type PathElementId = u32;

/// Format version triplet declared by the producer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Capture header.
///
/// `line_specific_data` gates the line-offset fields of path element, memory
/// and CPU records in the body.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Header {
    pub version: Version,
    /// Absolute offset at which the body starts.
    pub size: u32,
    pub requested_sample_ratio: f32,
    pub actual_sample_ratio: f32,
    pub line_specific_data: bool,
    pub memory_operations: bool,
    pub target_run_start_timestamp: u64,
    pub target_name: String,
    pub supplemental_info: String,
    pub target_version: String,
    pub device_vendor_name: String,
    pub device_model_number: String,
    pub device_firmware_version: String,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  Version: {}", self.version)?;
        writeln!(f, "  Header size: {} bytes", self.size)?;
        writeln!(
            f,
            "  Sample ratio: requested={}, actual={}",
            self.requested_sample_ratio, self.actual_sample_ratio
        )?;
        writeln!(f, "  Line specific data: {}", self.line_specific_data)?;
        writeln!(f, "  Memory operations: {}", self.memory_operations)?;
        writeln!(f, "  Run start timestamp: {}", self.target_run_start_timestamp)?;
        writeln!(f, "  Target name: {}", self.target_name)?;
        writeln!(f, "  Supplemental info: {}", self.supplemental_info)?;
        writeln!(f, "  Target version: {}", self.target_version)?;
        writeln!(f, "  Device vendor: {}", self.device_vendor_name)?;
        writeln!(f, "  Device model: {}", self.device_model_number)?;
        write!(f, "  Device firmware: {}", self.device_firmware_version)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    pub target_run_end_timestamp: u64,
}

/// Identity of a path element: either a root frame inside a module or a
/// frame called from another path element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Root {
        module_id: ModuleId,
    },
    Child {
        caller_id: PathElementId,
        /// Only present when the header sets `line_specific_data`.
        line_offset_in_caller: Option<u32>,
    },
}

/// Definition of a path element, available once its defining record is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathElementProps {
    pub kind: FrameKind,
    pub file_name_string_id: StringId,
    /// 1-based.
    pub line_number: u32,
    pub function_name_string_id: StringId,
}

impl PathElementProps {
    pub fn caller_id(&self) -> Option<PathElementId> {
        match self.kind {
            FrameKind::Child { caller_id, .. } => Some(caller_id),
            FrameKind::Root { .. } => None,
        }
    }

    pub fn module_id(&self) -> Option<ModuleId> {
        match self.kind {
            FrameKind::Root { module_id } => Some(module_id),
            FrameKind::Child { .. } => None,
        }
    }

    pub fn line_offset_in_caller(&self) -> Option<u32> {
        match self.kind {
            FrameKind::Child { line_offset_in_caller, .. } => line_offset_in_caller,
            FrameKind::Root { .. } => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, FrameKind::Root { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuMeasurement {
    /// Capture-wide sequence number, shared by all path elements.
    pub op_index: u64,
    /// Zero unless the header sets `line_specific_data`.
    pub line_offset: u32,
    pub self_cpu: u32,
    pub self_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryOperationType {
    Alloc,
    Free,
    FreeRealloc,
    /// Reserved value; the record layout matches the free kinds.
    Unknown(u8),
}

impl From<u8> for MemoryOperationType {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Alloc,
            1 => Self::Free,
            2 => Self::FreeRealloc,
            other => Self::Unknown(other),
        }
    }
}

impl MemoryOperationType {
    /// Only allocations carry a size field.
    pub fn has_alloc_size(&self) -> bool {
        matches!(self, Self::Alloc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryOperation {
    /// Capture-wide sequence number, independent of the CPU counter.
    pub op_index: u64,
    pub op_type: MemoryOperationType,
    /// Zero unless the header sets `line_specific_data`.
    pub line_offset: u32,
    pub mem_address: u32,
    /// Only present for [`MemoryOperationType::Alloc`].
    pub alloc_size: Option<u32>,
}

/// One call-stack frame and everything sampled against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathElement {
    pub id: PathElementId,
    /// `None` until the defining record is seen. A referenced but never
    /// defined element keeps `None`.
    pub props: Option<PathElementProps>,
    pub memory_operations: Vec<MemoryOperation>,
    pub cpu_measurements: Vec<CpuMeasurement>,
    pub call_counts: Vec<u32>,
    /// Ids of elements whose caller is this element, in link order.
    pub children: Vec<PathElementId>,
    /// Caller this element was linked under, if any.
    pub(crate) parent: Option<PathElementId>,
}

impl PathElement {
    pub fn new(id: PathElementId) -> Self {
        Self {
            id,
            props: None,
            memory_operations: Vec::new(),
            cpu_measurements: Vec::new(),
            call_counts: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn parent(&self) -> Option<PathElementId> {
        self.parent
    }

    pub fn total_self_cpu(&self) -> u64 {
        self.cpu_measurements.iter().map(|m| m.self_cpu as u64).sum()
    }

    pub fn total_self_time(&self) -> u64 {
        self.cpu_measurements.iter().map(|m| m.self_time as u64).sum()
    }

    pub fn total_calls(&self) -> u64 {
        self.call_counts.iter().map(|&c| c as u64).sum()
    }
}

/// Sparse id-keyed tables decoded from the body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfilerBody {
    pub string_table: BTreeMap<StringId, String>,
    /// Module id to the string id of its name.
    pub executable_modules: BTreeMap<ModuleId, StringId>,
    pub path_elements: BTreeMap<PathElementId, PathElement>,
}
