//! Resource Schema
//!
//! Every object type declares its resources once, as a static table of
//! [`ResourceDescriptor`]s. The table is shared by all instances of the type
//! and drives storage layout and binding construction.
//!
//! # Declaring a schema
//! ```
//! use lwm2m::obj::{Permissions, ResourceDescriptor, ValueKind};
//!
//! static FIELDS: [ResourceDescriptor; 2] = [
//!     ResourceDescriptor::new(0, Permissions::W, ValueKind::Opaque).with_size(16),
//!     ResourceDescriptor::new(1, Permissions::W_OPT, ValueKind::U8),
//! ];
//! ```

use super::ResourceId;

bitflags::bitflags! {
    /// Resource access mode
    ///
    /// Recorded for the engine; this crate never enforces it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Permissions: u8 {
        const READ = 0x01;
        const WRITE = 0x02;
        const EXECUTE = 0x04;
        /// Resource is optional in the object definition
        const OPTIONAL = 0x80;

        const R = Self::READ.bits();
        const W = Self::WRITE.bits();
        const RW = Self::READ.bits() | Self::WRITE.bits();
        const X = Self::EXECUTE.bits();
        const R_OPT = Self::R.bits() | Self::OPTIONAL.bits();
        const W_OPT = Self::W.bits() | Self::OPTIONAL.bits();
        const RW_OPT = Self::RW.bits() | Self::OPTIONAL.bits();
        const X_OPT = Self::X.bits() | Self::OPTIONAL.bits();
    }
}

/// Resource value kind
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Opaque = 0,
    String = 1,
    U8 = 2,
    U16 = 3,
    U32 = 4,
    S8 = 5,
    S16 = 6,
    S32 = 7,
    S64 = 8,
    Bool = 9,
    Time = 10,
    Float = 11,
    ObjLnk = 12,
}

impl ValueKind {
    /// Storage width of a scalar kind, `None` for byte-buffer kinds
    pub const fn scalar_width(self) -> Option<usize> {
        match self {
            ValueKind::Opaque | ValueKind::String => None,
            ValueKind::U8 | ValueKind::S8 | ValueKind::Bool => Some(1),
            ValueKind::U16 | ValueKind::S16 => Some(2),
            ValueKind::U32 | ValueKind::S32 | ValueKind::ObjLnk => Some(4),
            ValueKind::S64 | ValueKind::Time | ValueKind::Float => Some(8),
        }
    }

    /// Byte-buffer kinds start out empty; scalars start out as zero
    #[inline]
    pub const fn is_bytes(self) -> bool {
        self.scalar_width().is_none()
    }
}

/// Static description of one resource in an object schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Resource id, unique within the object type
    pub id: ResourceId,
    /// Declared access mode
    pub access: Permissions,
    /// Value kind
    pub kind: ValueKind,
    /// Storage capacity of one resource instance in bytes
    pub size: usize,
    /// Number of resource instances (1 for single-valued resources)
    pub multi_count: u16,
}

impl ResourceDescriptor {
    /// Single-valued resource sized by its kind
    ///
    /// Byte-buffer kinds start with zero capacity; give them one with
    /// [`with_size`](Self::with_size).
    pub const fn new(id: ResourceId, access: Permissions, kind: ValueKind) -> Self {
        let size = match kind.scalar_width() {
            Some(width) => width,
            None => 0,
        };
        Self {
            id,
            access,
            kind,
            size,
            multi_count: 1,
        }
    }

    /// Set the storage capacity (byte-buffer kinds)
    pub const fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Declare a multi-instance resource with `count` instances
    pub const fn multi(mut self, count: u16) -> Self {
        self.multi_count = count;
        self
    }

    #[inline]
    pub const fn is_multi(&self) -> bool {
        self.multi_count > 1
    }

    /// Bytes this resource occupies in an instance row
    pub const fn footprint(&self) -> usize {
        self.size * self.multi_count as usize
    }
}

/// Storage row width needed by `schema`
pub const fn storage_size(schema: &[ResourceDescriptor]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < schema.len() {
        total += schema[i].footprint();
        i += 1;
    }
    total
}

/// Number of binding entries needed by `schema`
pub const fn binding_count(schema: &[ResourceDescriptor]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < schema.len() {
        total += schema[i].multi_count as usize;
        i += 1;
    }
    total
}

/// Look up a descriptor by resource id
pub fn find_field(schema: &[ResourceDescriptor], res_id: ResourceId) -> Option<&ResourceDescriptor> {
    schema.iter().find(|field| field.id == res_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: [ResourceDescriptor; 3] = [
        ResourceDescriptor::new(0, Permissions::W, ValueKind::Opaque).with_size(12),
        ResourceDescriptor::new(1, Permissions::RW_OPT, ValueKind::U32),
        ResourceDescriptor::new(2, Permissions::R, ValueKind::U16).multi(3),
    ];

    #[test]
    fn test_scalar_sizes() {
        assert_eq!(FIELDS[1].size, 4);
        assert_eq!(FIELDS[2].size, 2);
        assert_eq!(ResourceDescriptor::new(9, Permissions::R, ValueKind::Opaque).size, 0);
        assert!(ValueKind::String.is_bytes());
        assert!(!ValueKind::Bool.is_bytes());
    }

    #[test]
    fn test_schema_sizes() {
        assert_eq!(storage_size(&FIELDS), 12 + 4 + 6);
        assert_eq!(binding_count(&FIELDS), 5);
        assert_eq!(storage_size(&[]), 0);
    }

    #[test]
    fn test_permission_combinations() {
        assert!(Permissions::W_OPT.contains(Permissions::WRITE));
        assert!(Permissions::W_OPT.contains(Permissions::OPTIONAL));
        assert!(!Permissions::W.contains(Permissions::READ));
        assert_eq!(Permissions::RW, Permissions::READ | Permissions::WRITE);
    }

    #[test]
    fn test_find_field() {
        assert_eq!(find_field(&FIELDS, 1).map(|f| f.kind), Some(ValueKind::U32));
        assert!(find_field(&FIELDS, 7).is_none());
    }
}
