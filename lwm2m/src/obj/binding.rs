//! Resource Bindings
//!
//! A binding ties one schema resource (instance) to its column in an
//! instance's storage row. Bindings hold offsets, not pointers, so records
//! stay `Copy` and can be built before anything is written to the table.

use super::field::{Permissions, ResourceDescriptor, ValueKind};
use super::ResourceId;

/// Resource instance id of an unbound table entry
pub const RES_INSTANCE_NOT_CREATED: u16 = u16::MAX;

/// Runtime binding of a resource instance to its storage column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceBinding {
    /// Schema entry this binding was built from
    pub descriptor: ResourceDescriptor,
    /// Column start within the instance row
    pub offset: usize,
    /// Column width in bytes
    pub capacity: usize,
    /// Bytes currently holding a value
    pub data_len: usize,
    /// Multiplicity index (resource instance id)
    pub res_inst_id: u16,
}

impl ResourceBinding {
    /// Unbound table entry
    pub const fn empty() -> Self {
        Self {
            descriptor: ResourceDescriptor::new(0, Permissions::empty(), ValueKind::Opaque),
            offset: 0,
            capacity: 0,
            data_len: 0,
            res_inst_id: RES_INSTANCE_NOT_CREATED,
        }
    }

    #[inline]
    pub const fn res_id(&self) -> ResourceId {
        self.descriptor.id
    }

    #[inline]
    pub const fn kind(&self) -> ValueKind {
        self.descriptor.kind
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.res_inst_id != RES_INSTANCE_NOT_CREATED
    }

    /// Byte range of this column within the row
    #[inline]
    pub fn range(&self) -> core::ops::Range<usize> {
        self.offset..self.offset + self.capacity
    }

    /// True if the two columns share any byte
    pub fn overlaps(&self, other: &ResourceBinding) -> bool {
        self.capacity != 0
            && other.capacity != 0
            && self.offset < other.offset + other.capacity
            && other.offset < self.offset + self.capacity
    }
}

impl Default for ResourceBinding {
    fn default() -> Self {
        Self::empty()
    }
}
