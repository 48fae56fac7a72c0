//! The decode target: a capture's header, body tables and footer, plus the
//! error state of the decode that produced it.

use std::path::Path;

use log::{info, warn};

use super::error::{BsprofError, FileError};
use super::models::*;
use crate::bsprof::options::DecodeOptions;

/// A decoded (possibly partially decoded) profiler capture.
///
/// Always check [`error`](Self::error) before trusting the body or footer:
/// the header can be complete even when the body failed partway through.
#[derive(Debug, Default)]
pub struct ProfilerFile {
    pub error: FileError,
    /// The failure that set [`error`](Self::error), if any.
    pub error_detail: Option<BsprofError>,
    pub header: Header,
    pub footer: Footer,
    pub body: ProfilerBody,

    last_memory_operation_index: u64,
    last_cpu_measurement_index: u64,
}

impl ProfilerFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and decodes a capture from disk.
    ///
    /// An unreadable path still yields a `ProfilerFile`, with
    /// [`FileError::FileNotValid`] and the I/O error attached.
    pub fn from_path(path: impl AsRef<Path>, options: &DecodeOptions) -> Self {
        let path = path.as_ref();
        info!("Opening bsprof capture: {}", path.display());
        match std::fs::read(path) {
            Ok(bytes) => crate::bsprof::parse_file_with(&bytes, options),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                let mut file = Self::new();
                file.record_error(e.into());
                file
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error == FileError::None
    }

    /// Records a failure, keeping the first kind and detail seen.
    pub(crate) fn record_error(&mut self, err: BsprofError) {
        if self.error == FileError::None {
            self.error = err.kind();
        }
        if self.error_detail.is_none() {
            self.error_detail = Some(err);
        }
    }

    /// Looks up a path element, creating an empty one on first reference.
    pub(crate) fn get_path_element(&mut self, id: PathElementId) -> &mut PathElement {
        self.body
            .path_elements
            .entry(id)
            .or_insert_with(|| PathElement::new(id))
    }

    pub(crate) fn add_memory_operation(
        &mut self,
        id: PathElementId,
        mut op: MemoryOperation,
    ) -> &mut PathElement {
        self.last_memory_operation_index += 1;
        op.op_index = self.last_memory_operation_index;
        let el = self.get_path_element(id);
        el.memory_operations.push(op);
        el
    }

    pub(crate) fn add_cpu_measurement(
        &mut self,
        id: PathElementId,
        mut measurement: CpuMeasurement,
    ) -> &mut PathElement {
        self.last_cpu_measurement_index += 1;
        measurement.op_index = self.last_cpu_measurement_index;
        let el = self.get_path_element(id);
        el.cpu_measurements.push(measurement);
        el
    }

    pub(crate) fn add_call_count_entry(
        &mut self,
        id: PathElementId,
        value: u32,
    ) -> &mut PathElement {
        let el = self.get_path_element(id);
        el.call_counts.push(value);
        el
    }

    /// Appends `child_id` to its caller's children.
    ///
    /// Links at most once per child; a child without a caller is left alone.
    /// The caller is always created, even when the child is already linked.
    pub(crate) fn assign_to_parent(&mut self, child_id: PathElementId) {
        let child = self.get_path_element(child_id);
        let Some(caller_id) = child.props.as_ref().and_then(PathElementProps::caller_id) else {
            return;
        };
        let already_linked = child.parent.is_some();
        if !already_linked {
            child.parent = Some(caller_id);
        }
        let caller = self.get_path_element(caller_id);
        if !already_linked {
            caller.children.push(child_id);
        }
    }

    pub fn path_element(&self, id: PathElementId) -> Option<&PathElement> {
        self.body.path_elements.get(&id)
    }

    pub fn string(&self, id: StringId) -> Option<&str> {
        self.body.string_table.get(&id).map(String::as_str)
    }

    pub fn module_name(&self, id: ModuleId) -> Option<&str> {
        self.body
            .executable_modules
            .get(&id)
            .and_then(|&string_id| self.string(string_id))
    }

    pub fn function_name(&self, id: PathElementId) -> Option<&str> {
        let props = self.path_element(id)?.props.as_ref()?;
        self.string(props.function_name_string_id)
    }

    pub fn file_name(&self, id: PathElementId) -> Option<&str> {
        let props = self.path_element(id)?.props.as_ref()?;
        self.string(props.file_name_string_id)
    }

    /// Defined root frames, in id order.
    pub fn roots(&self) -> impl Iterator<Item = &PathElement> {
        self.body
            .path_elements
            .values()
            .filter(|el| el.props.as_ref().is_some_and(PathElementProps::is_root))
    }

    /// Children linked under `id`, in link order.
    pub fn children(&self, id: PathElementId) -> impl Iterator<Item = &PathElement> {
        self.path_element(id)
            .into_iter()
            .flat_map(|el| el.children.iter())
            .filter_map(move |child| self.path_element(*child))
    }

    pub fn memory_operation_count(&self) -> u64 {
        self.last_memory_operation_index
    }

    pub fn cpu_measurement_count(&self) -> u64 {
        self.last_cpu_measurement_index
    }
}
