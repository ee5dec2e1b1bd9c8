//! Object Type Registration
//!
//! An object type hands the registry two things:
//! - an [`ObjectDescriptor`]: id, version, schema and instance limit
//! - a [`ManagedObject`] implementation carrying the instance entry points
//!
//! User callbacks run by the registry around instance creation and
//! deletion live in [`ObjectCallbacks`].

use super::binding::ResourceBinding;
use super::field::ResourceDescriptor;
use super::{ObjectId, ResourceId};
use crate::error::ObjError;

/// Well-known LwM2M object ids
pub mod object_id {
    use super::ObjectId;

    pub const SECURITY: ObjectId = 0;
    pub const SERVER: ObjectId = 1;
    pub const ACCESS_CONTROL: ObjectId = 2;
    pub const DEVICE: ObjectId = 3;
    pub const CONNECTIVITY_MONITORING: ObjectId = 4;
    pub const FIRMWARE: ObjectId = 5;
    pub const LOCATION: ObjectId = 6;
    pub const CONNECTIVITY_STATISTICS: ObjectId = 7;
    pub const OSCORE: ObjectId = 21;
}

/// Object type descriptor
#[derive(Debug, Clone, Copy)]
pub struct ObjectDescriptor {
    /// Object type id
    pub obj_id: ObjectId,
    /// Object definition version
    pub version_major: u8,
    pub version_minor: u8,
    /// Core objects are defined by the LwM2M specification itself
    pub is_core: bool,
    /// Resource schema, shared by every instance
    pub fields: &'static [ResourceDescriptor],
    /// Maximum number of live instances
    pub max_instance_count: usize,
}

impl ObjectDescriptor {
    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Read-only view of an occupied instance
#[derive(Debug, Clone, Copy)]
pub struct InstanceView<'a> {
    pub obj_id: ObjectId,
    pub obj_inst_id: u16,
    /// Table slot holding the instance
    pub slot: usize,
    /// Bound resources, in schema order
    pub resources: &'a [ResourceBinding],
}

impl<'a> InstanceView<'a> {
    #[inline]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Binding for a resource instance
    pub fn resource(&self, res_id: ResourceId, res_inst_id: u16) -> Option<&'a ResourceBinding> {
        self.resources
            .iter()
            .find(|b| b.res_id() == res_id && b.res_inst_id == res_inst_id)
    }
}

/// Per-type instance management, called by the registry
///
/// Implementations own their instance table and storage. All mutation goes
/// through `&mut self`; the registry serializes access.
pub trait ManagedObject: Send {
    /// Registration descriptor
    fn descriptor(&self) -> &ObjectDescriptor;

    /// Number of occupied instances
    fn instance_count(&self) -> usize;

    /// Claim a free slot for `obj_inst_id` and initialize its resources
    ///
    /// # Returns
    /// The slot index of the new instance. On error nothing changed.
    fn create_instance(&mut self, obj_inst_id: u16) -> Result<usize, ObjError>;

    /// Free the slot holding `obj_inst_id`
    fn delete_instance(&mut self, obj_inst_id: u16) -> Result<(), ObjError>;

    /// Reset an existing instance to defaults and rebuild its bindings
    fn reinitialize_instance(&mut self, obj_inst_id: u16) -> Result<(), ObjError>;

    /// Look up an instance by id
    fn instance(&self, obj_inst_id: u16) -> Option<InstanceView<'_>>;

    /// Look up an instance by table slot
    fn instance_at(&self, slot: usize) -> Option<InstanceView<'_>>;

    /// Current value bytes of a resource instance
    fn resource_data(
        &self,
        obj_inst_id: u16,
        res_id: ResourceId,
        res_inst_id: u16,
    ) -> Result<&[u8], ObjError>;

    /// Replace the value bytes of a resource instance
    fn write_resource(
        &mut self,
        obj_inst_id: u16,
        res_id: ResourceId,
        res_inst_id: u16,
        data: &[u8],
    ) -> Result<(), ObjError>;

    #[inline]
    fn obj_id(&self) -> ObjectId {
        self.descriptor().obj_id
    }
}

/// Called after an instance is created; a negative status rolls it back
pub type CreateCallback = fn(obj_inst_id: u16) -> i32;

/// Called before an instance is deleted
pub type DeleteCallback = fn(obj_inst_id: u16) -> i32;

/// User callbacks attached to a registered object type
#[derive(Debug, Clone, Copy)]
pub struct ObjectCallbacks {
    pub create: Option<CreateCallback>,
    pub delete: Option<DeleteCallback>,
}

impl ObjectCallbacks {
    /// Create empty callbacks
    pub const fn new() -> Self {
        Self {
            create: None,
            delete: None,
        }
    }
}

impl Default for ObjectCallbacks {
    fn default() -> Self {
        Self::new()
    }
}
