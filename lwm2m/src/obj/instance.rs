//! Object Instance Table
//!
//! Fixed-capacity instance table for one object type. Each slot owns one
//! storage row and one binding table; a slot is in use iff its record
//! carries an object id.
//!
//! # Instance Lifecycle
//! ```text
//! Free --create_instance--> Occupied --delete_instance--> Free
//! ```
//!
//! Creation computes the binding table before it touches the slot, so a
//! rejected request leaves the table exactly as it was.

use log::{debug, error};

use super::binder::bind_resources;
use super::binding::ResourceBinding;
use super::object_type::{InstanceView, ManagedObject, ObjectDescriptor};
use super::storage::StorageRows;
use super::{ObjectId, ResourceId};
use crate::error::ObjError;

/// One slot in the instance table
#[derive(Debug, Clone, Copy)]
pub struct InstanceRecord<const BINDINGS: usize> {
    /// Backing object type (None if the slot is free)
    pub obj_id: Option<ObjectId>,
    /// Instance id
    pub obj_inst_id: u16,
    /// Resource binding table
    pub resources: [ResourceBinding; BINDINGS],
    /// Number of valid entries in `resources`
    pub resource_count: usize,
}

impl<const BINDINGS: usize> InstanceRecord<BINDINGS> {
    /// Create a free record
    pub const fn new() -> Self {
        Self {
            obj_id: None,
            obj_inst_id: 0,
            resources: [ResourceBinding::empty(); BINDINGS],
            resource_count: 0,
        }
    }

    /// Check if the slot is in use
    #[inline]
    pub fn is_used(&self) -> bool {
        self.obj_id.is_some()
    }

    /// Release the slot; bindings and storage are left stale
    pub fn clear(&mut self) {
        self.obj_id = None;
    }

    /// Valid bindings
    pub fn bindings(&self) -> &[ResourceBinding] {
        &self.resources[..self.resource_count]
    }

    fn binding_index(&self, res_id: ResourceId, res_inst_id: u16) -> Option<usize> {
        self.bindings()
            .iter()
            .position(|b| b.res_id() == res_id && b.res_inst_id == res_inst_id)
    }
}

impl<const BINDINGS: usize> Default for InstanceRecord<BINDINGS> {
    fn default() -> Self {
        Self::new()
    }
}

/// Instance table and storage for one object type
///
/// * `MAX` - instance slots
/// * `ROW` - storage row width, see [`storage_size`](super::storage_size)
/// * `BINDINGS` - binding entries per instance, see [`binding_count`](super::binding_count)
pub struct ObjectInstanceTable<const MAX: usize, const ROW: usize, const BINDINGS: usize> {
    descriptor: ObjectDescriptor,
    instances: [InstanceRecord<BINDINGS>; MAX],
    storage: StorageRows<MAX, ROW>,
}

impl<const MAX: usize, const ROW: usize, const BINDINGS: usize>
    ObjectInstanceTable<MAX, ROW, BINDINGS>
{
    /// Create an empty table for `descriptor`
    pub const fn new(descriptor: ObjectDescriptor) -> Self {
        Self {
            descriptor,
            instances: [InstanceRecord::new(); MAX],
            storage: StorageRows::new(),
        }
    }

    /// Usable slots: the table size, further limited by the descriptor
    #[inline]
    pub fn capacity(&self) -> usize {
        MAX.min(self.descriptor.max_instance_count)
    }

    /// Slot holding `obj_inst_id`
    pub fn slot_of(&self, obj_inst_id: u16) -> Option<usize> {
        self.instances
            .iter()
            .position(|inst| inst.is_used() && inst.obj_inst_id == obj_inst_id)
    }

    /// Record at `slot`, free or not
    pub fn record(&self, slot: usize) -> Option<&InstanceRecord<BINDINGS>> {
        self.instances.get(slot)
    }

    /// Occupied records in slot order
    pub fn occupied(&self) -> impl Iterator<Item = &InstanceRecord<BINDINGS>> {
        self.instances.iter().filter(|inst| inst.is_used())
    }

    fn occupied_slot(&self, obj_inst_id: u16) -> Result<usize, ObjError> {
        self.slot_of(obj_inst_id).ok_or(ObjError::InstanceNotFound {
            obj_id: self.descriptor.obj_id,
            obj_inst_id,
        })
    }

    /// Reset `slot`'s storage and install a freshly built binding table
    fn init_slot(&mut self, slot: usize) -> Result<(), ObjError> {
        let mut resources = [ResourceBinding::empty(); BINDINGS];
        let count = bind_resources(self.descriptor.fields, ROW, &mut resources)?;

        self.storage.reset(slot);

        let inst = &mut self.instances[slot];
        inst.resources = resources;
        inst.resource_count = count;
        Ok(())
    }

    fn view(&self, slot: usize) -> Option<InstanceView<'_>> {
        let inst = self.instances.get(slot)?;
        let obj_id = inst.obj_id?;
        Some(InstanceView {
            obj_id,
            obj_inst_id: inst.obj_inst_id,
            slot,
            resources: inst.bindings(),
        })
    }
}

impl<const MAX: usize, const ROW: usize, const BINDINGS: usize> ManagedObject
    for ObjectInstanceTable<MAX, ROW, BINDINGS>
{
    fn descriptor(&self) -> &ObjectDescriptor {
        &self.descriptor
    }

    fn instance_count(&self) -> usize {
        self.occupied().count()
    }

    fn create_instance(&mut self, obj_inst_id: u16) -> Result<usize, ObjError> {
        let obj_id = self.descriptor.obj_id;

        // Check that there is no other instance with this ID
        if self.slot_of(obj_inst_id).is_some() {
            error!(
                "Can not create instance - already existing: {}/{}",
                obj_id, obj_inst_id
            );
            return Err(ObjError::DuplicateInstance { obj_id, obj_inst_id });
        }

        let capacity = self.capacity();
        let slot = match self.instances[..capacity]
            .iter()
            .position(|inst| !inst.is_used())
        {
            Some(slot) => slot,
            None => {
                error!(
                    "Can not create instance - no more room: {}/{}",
                    obj_id, obj_inst_id
                );
                return Err(ObjError::CapacityExceeded { obj_id });
            }
        };

        if let Err(err) = self.init_slot(slot) {
            error!("Can not create instance {}/{}: {}", obj_id, obj_inst_id, err);
            return Err(err);
        }

        let inst = &mut self.instances[slot];
        inst.obj_inst_id = obj_inst_id;
        inst.obj_id = Some(obj_id);

        debug!("Create LWM2M instance: {}/{} (slot {})", obj_id, obj_inst_id, slot);
        Ok(slot)
    }

    fn delete_instance(&mut self, obj_inst_id: u16) -> Result<(), ObjError> {
        let slot = self.occupied_slot(obj_inst_id)?;
        self.instances[slot].clear();
        debug!("Delete LWM2M instance: {}/{}", self.descriptor.obj_id, obj_inst_id);
        Ok(())
    }

    fn reinitialize_instance(&mut self, obj_inst_id: u16) -> Result<(), ObjError> {
        let slot = self.occupied_slot(obj_inst_id)?;
        self.init_slot(slot)
    }

    fn instance(&self, obj_inst_id: u16) -> Option<InstanceView<'_>> {
        self.view(self.slot_of(obj_inst_id)?)
    }

    fn instance_at(&self, slot: usize) -> Option<InstanceView<'_>> {
        self.view(slot)
    }

    fn resource_data(
        &self,
        obj_inst_id: u16,
        res_id: ResourceId,
        res_inst_id: u16,
    ) -> Result<&[u8], ObjError> {
        let slot = self.occupied_slot(obj_inst_id)?;
        let inst = &self.instances[slot];
        let index = inst
            .binding_index(res_id, res_inst_id)
            .ok_or(ObjError::ResourceNotFound { res_id, res_inst_id })?;
        Ok(self.storage.value(slot, &inst.resources[index]))
    }

    fn write_resource(
        &mut self,
        obj_inst_id: u16,
        res_id: ResourceId,
        res_inst_id: u16,
        data: &[u8],
    ) -> Result<(), ObjError> {
        let slot = self.occupied_slot(obj_inst_id)?;
        let index = self.instances[slot]
            .binding_index(res_id, res_inst_id)
            .ok_or(ObjError::ResourceNotFound { res_id, res_inst_id })?;
        let binding = self.instances[slot].resources[index];

        if data.len() > binding.capacity {
            return Err(ObjError::BufferTooSmall {
                needed: data.len(),
                capacity: binding.capacity,
            });
        }
        // Scalars are always written whole
        if !binding.kind().is_bytes() && data.len() != binding.capacity {
            return Err(ObjError::TypeMismatch { res_id });
        }

        self.storage.column_mut(slot, &binding)[..data.len()].copy_from_slice(data);
        self.instances[slot].resources[index].data_len = data.len();
        Ok(())
    }
}
