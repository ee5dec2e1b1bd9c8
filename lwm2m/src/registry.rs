//! Object Registry
//!
//! The registry maps object type ids to their [`ManagedObject`]s and
//! drives instance creation and deletion the way the LwM2M engine does:
//!
//! 1. Look up the object type
//! 2. Check the live instance count against the descriptor's limit
//! 3. Delegate to the type's `create_instance`
//! 4. Run the user create callback, rolling the instance back if it fails
//!
//! The registry is an explicit context value. It borrows the objects it
//! manages, so several registries can coexist (one per test, for example).
//! It does no locking itself; hosts that share one between execution
//! contexts wrap it in a [`SharedRegistry`].

use log::{debug, error, info};

use crate::config::LWM2M_ENGINE_MAX_OBJECTS;
use crate::error::ObjError;
use crate::obj::{
    CreateCallback, DeleteCallback, InstanceView, ManagedObject, ObjectCallbacks, ObjectId,
    ResourceBinding, ValueKind,
};
use crate::value::{ResourcePath, ScalarValue};

/// Registry shared between execution contexts
pub type SharedRegistry<'a> = spin::Mutex<Registry<'a>>;

/// Handle to a created instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceRef {
    pub obj_id: ObjectId,
    pub obj_inst_id: u16,
    /// Slot in the object's instance table
    pub slot: usize,
}

/// Registered object type plus its user callbacks
struct RegisteredObject<'a> {
    object: &'a mut dyn ManagedObject,
    callbacks: ObjectCallbacks,
}

/// Object registry holding up to `N` object types
pub struct Registry<'a, const N: usize = LWM2M_ENGINE_MAX_OBJECTS> {
    objects: [Option<RegisteredObject<'a>>; N],
}

impl<'a, const N: usize> Registry<'a, N> {
    const EMPTY: Option<RegisteredObject<'a>> = None;

    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            objects: [Self::EMPTY; N],
        }
    }

    fn entry(&self, obj_id: ObjectId) -> Option<&RegisteredObject<'a>> {
        self.objects
            .iter()
            .flatten()
            .find(|entry| entry.object.obj_id() == obj_id)
    }

    fn entry_mut(&mut self, obj_id: ObjectId) -> Result<&mut RegisteredObject<'a>, ObjError> {
        self.objects
            .iter_mut()
            .flatten()
            .find(|entry| entry.object.obj_id() == obj_id)
            .ok_or(ObjError::ObjectNotFound(obj_id))
    }

    // ========================================================================
    // Object Types
    // ========================================================================

    /// Register an object type
    pub fn register(&mut self, object: &'a mut dyn ManagedObject) -> Result<(), ObjError> {
        let descriptor = *object.descriptor();

        if self.entry(descriptor.obj_id).is_some() {
            error!("Object {} is already registered", descriptor.obj_id);
            return Err(ObjError::AlreadyRegistered(descriptor.obj_id));
        }

        let free = self
            .objects
            .iter_mut()
            .find(|entry| entry.is_none())
            .ok_or(ObjError::RegistryFull)?;

        *free = Some(RegisteredObject {
            object,
            callbacks: ObjectCallbacks::new(),
        });

        info!(
            "Registered object {} v{}.{} ({} fields, max {} instances)",
            descriptor.obj_id,
            descriptor.version_major,
            descriptor.version_minor,
            descriptor.field_count(),
            descriptor.max_instance_count
        );
        Ok(())
    }

    /// Remove an object type, releasing the registry's borrow of it
    pub fn unregister(&mut self, obj_id: ObjectId) -> Result<(), ObjError> {
        let slot = self
            .objects
            .iter_mut()
            .find(|entry| matches!(entry, Some(e) if e.object.obj_id() == obj_id))
            .ok_or(ObjError::ObjectNotFound(obj_id))?;
        *slot = None;
        debug!("Unregistered object {}", obj_id);
        Ok(())
    }

    /// Look up a registered object type
    pub fn object(&self, obj_id: ObjectId) -> Option<&dyn ManagedObject> {
        self.entry(obj_id).map(|entry| &*entry.object as &dyn ManagedObject)
    }

    /// Install the callback run after each successful creation
    pub fn register_create_callback(
        &mut self,
        obj_id: ObjectId,
        callback: CreateCallback,
    ) -> Result<(), ObjError> {
        self.entry_mut(obj_id)?.callbacks.create = Some(callback);
        Ok(())
    }

    /// Install the callback run before each deletion
    pub fn register_delete_callback(
        &mut self,
        obj_id: ObjectId,
        callback: DeleteCallback,
    ) -> Result<(), ObjError> {
        self.entry_mut(obj_id)?.callbacks.delete = Some(callback);
        Ok(())
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Create instance `obj_inst_id` of object type `obj_id`
    pub fn create_obj_inst(
        &mut self,
        obj_id: ObjectId,
        obj_inst_id: u16,
    ) -> Result<InstanceRef, ObjError> {
        let entry = self.entry_mut(obj_id).map_err(|err| {
            error!("unable to find obj: {}", obj_id);
            err
        })?;

        let max = entry.object.descriptor().max_instance_count;
        if entry.object.instance_count() + 1 > max {
            error!("no more instances available for obj {}", obj_id);
            return Err(ObjError::CapacityExceeded { obj_id });
        }

        let slot = entry.object.create_instance(obj_inst_id).map_err(|err| {
            error!("unable to create obj {} instance {}: {}", obj_id, obj_inst_id, err);
            err
        })?;

        if let Some(create) = entry.callbacks.create {
            let ret = create(obj_inst_id);
            if ret < 0 {
                error!("create callback failed for {}/{}: {}", obj_id, obj_inst_id, ret);
                let _ = entry.object.delete_instance(obj_inst_id);
                return Err(ObjError::CallbackFailed(ret));
            }
        }

        Ok(InstanceRef {
            obj_id,
            obj_inst_id,
            slot,
        })
    }

    /// Delete instance `obj_inst_id` of object type `obj_id`
    ///
    /// A failing delete callback is logged; the instance is removed anyway.
    pub fn delete_obj_inst(&mut self, obj_id: ObjectId, obj_inst_id: u16) -> Result<(), ObjError> {
        let entry = self.entry_mut(obj_id)?;

        if entry.object.instance(obj_inst_id).is_none() {
            return Err(ObjError::InstanceNotFound { obj_id, obj_inst_id });
        }

        if let Some(delete) = entry.callbacks.delete {
            let ret = delete(obj_inst_id);
            if ret < 0 {
                error!("delete callback failed for {}/{}: {}", obj_id, obj_inst_id, ret);
            }
        }

        entry.object.delete_instance(obj_inst_id)
    }

    /// Reset an existing instance's resources to their defaults
    pub fn reinit_obj_inst(&mut self, obj_id: ObjectId, obj_inst_id: u16) -> Result<(), ObjError> {
        self.entry_mut(obj_id)?.object.reinitialize_instance(obj_inst_id)
    }

    /// Look up an instance by id
    pub fn get_obj_inst(&self, obj_id: ObjectId, obj_inst_id: u16) -> Option<InstanceView<'_>> {
        self.entry(obj_id)?.object.instance(obj_inst_id)
    }

    /// Resolve an [`InstanceRef`]; `None` once the instance is gone
    pub fn resolve(&self, inst: &InstanceRef) -> Option<InstanceView<'_>> {
        self.entry(inst.obj_id)?
            .object
            .instance_at(inst.slot)
            .filter(|view| view.obj_inst_id == inst.obj_inst_id)
    }

    // ========================================================================
    // Resource Access
    // ========================================================================

    fn binding(&self, path: &ResourcePath) -> Result<ResourceBinding, ObjError> {
        let view = self
            .entry(path.obj_id)
            .ok_or(ObjError::ObjectNotFound(path.obj_id))?
            .object
            .instance(path.obj_inst_id)
            .ok_or(ObjError::InstanceNotFound {
                obj_id: path.obj_id,
                obj_inst_id: path.obj_inst_id,
            })?;
        view.resource(path.res_id, path.res_inst_id)
            .copied()
            .ok_or(ObjError::ResourceNotFound {
                res_id: path.res_id,
                res_inst_id: path.res_inst_id,
            })
    }

    fn check_kind(&self, path: &ResourcePath, ok: fn(ValueKind) -> bool) -> Result<(), ObjError> {
        if ok(self.binding(path)?.kind()) {
            Ok(())
        } else {
            Err(ObjError::TypeMismatch { res_id: path.res_id })
        }
    }

    /// Store bytes in an opaque or string resource
    pub fn set_opaque(&mut self, path: &ResourcePath, data: &[u8]) -> Result<(), ObjError> {
        self.check_kind(path, ValueKind::is_bytes)?;
        self.entry_mut(path.obj_id)?.object.write_resource(
            path.obj_inst_id,
            path.res_id,
            path.res_inst_id,
            data,
        )
    }

    /// Current bytes of an opaque or string resource
    pub fn get_opaque(&self, path: &ResourcePath) -> Result<&[u8], ObjError> {
        self.check_kind(path, ValueKind::is_bytes)?;
        self.raw(path)
    }

    /// Store a scalar value
    pub fn set_value<T: ScalarValue>(&mut self, path: &ResourcePath, value: T) -> Result<(), ObjError> {
        self.check_kind(path, T::accepts)?;
        let mut buf = [0u8; 8];
        value.store(&mut buf[..T::WIDTH]);
        self.entry_mut(path.obj_id)?.object.write_resource(
            path.obj_inst_id,
            path.res_id,
            path.res_inst_id,
            &buf[..T::WIDTH],
        )
    }

    /// Read a scalar value
    pub fn get_value<T: ScalarValue>(&self, path: &ResourcePath) -> Result<T, ObjError> {
        self.check_kind(path, T::accepts)?;
        let bytes = self.raw(path)?;
        if bytes.len() != T::WIDTH {
            return Err(ObjError::TypeMismatch { res_id: path.res_id });
        }
        Ok(T::load(bytes))
    }

    fn raw(&self, path: &ResourcePath) -> Result<&[u8], ObjError> {
        self.entry(path.obj_id)
            .ok_or(ObjError::ObjectNotFound(path.obj_id))?
            .object
            .resource_data(path.obj_inst_id, path.res_id, path.res_inst_id)
    }

    // ========================================================================
    // Registry Inspection
    // ========================================================================

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for entry in self.objects.iter().flatten() {
            stats.object_count += 1;
            stats.instance_count += entry.object.instance_count();
            stats.instance_capacity += entry.object.descriptor().max_instance_count;
        }
        stats
    }

    /// Get snapshots of all registered object types
    pub fn snapshots(&self) -> ([ObjectSnapshot; N], usize) {
        let mut snapshots = [ObjectSnapshot::default(); N];
        let mut count = 0;

        for entry in self.objects.iter().flatten() {
            let descriptor = entry.object.descriptor();
            snapshots[count] = ObjectSnapshot {
                obj_id: descriptor.obj_id,
                version_major: descriptor.version_major,
                version_minor: descriptor.version_minor,
                is_core: descriptor.is_core,
                field_count: descriptor.field_count(),
                instance_count: entry.object.instance_count(),
                max_instance_count: descriptor.max_instance_count,
            };
            count += 1;
        }

        (snapshots, count)
    }
}

impl<'a, const N: usize> Default for Registry<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered object types
    pub object_count: usize,
    /// Live instances across all types
    pub instance_count: usize,
    /// Sum of per-type instance limits
    pub instance_capacity: usize,
}

/// Snapshot of a registered object type for debugging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectSnapshot {
    pub obj_id: ObjectId,
    pub version_major: u8,
    pub version_minor: u8,
    pub is_core: bool,
    pub field_count: usize,
    pub instance_count: usize,
    pub max_instance_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::{
        binding_count, storage_size, ObjectDescriptor, ObjectInstanceTable, Permissions,
        ResourceDescriptor,
    };
    use core::sync::atomic::{AtomicU32, Ordering};

    const FIELDS: &[ResourceDescriptor] = &[
        ResourceDescriptor::new(0, Permissions::W, ValueKind::Opaque).with_size(4),
        ResourceDescriptor::new(1, Permissions::RW, ValueKind::U32),
        ResourceDescriptor::new(2, Permissions::R, ValueKind::Bool),
        ResourceDescriptor::new(3, Permissions::RW_OPT, ValueKind::S64).multi(2),
    ];

    const ROW: usize = storage_size(FIELDS);
    const BINDINGS: usize = binding_count(FIELDS);

    type TestObject = ObjectInstanceTable<4, ROW, BINDINGS>;

    fn test_object(obj_id: ObjectId, max_instance_count: usize) -> TestObject {
        TestObject::new(ObjectDescriptor {
            obj_id,
            version_major: 1,
            version_minor: 1,
            is_core: false,
            fields: FIELDS,
            max_instance_count,
        })
    }

    #[test]
    fn test_register_and_create() {
        let mut obj = test_object(3300, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();

        let inst = registry.create_obj_inst(3300, 0).unwrap();
        assert_eq!(inst, InstanceRef { obj_id: 3300, obj_inst_id: 0, slot: 0 });

        let view = registry.get_obj_inst(3300, 0).unwrap();
        assert_eq!(view.resource_count(), BINDINGS);
        assert!(registry.resolve(&inst).is_some());
    }

    #[test]
    fn test_scenario_through_registry() {
        let mut obj = test_object(3300, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();

        assert_eq!(registry.create_obj_inst(3300, 0).map(|i| i.slot), Ok(0));
        assert_eq!(
            registry.create_obj_inst(3300, 0),
            Err(ObjError::DuplicateInstance { obj_id: 3300, obj_inst_id: 0 })
        );
        assert_eq!(registry.create_obj_inst(3300, 5).map(|i| i.slot), Ok(1));
        assert_eq!(
            registry.create_obj_inst(3300, 9),
            Err(ObjError::CapacityExceeded { obj_id: 3300 })
        );

        registry.delete_obj_inst(3300, 0).unwrap();
        assert_eq!(registry.create_obj_inst(3300, 9).map(|i| i.slot), Ok(0));
        assert_eq!(registry.stats().instance_count, 2);
    }

    #[test]
    fn test_stale_ref_does_not_resolve() {
        let mut obj = test_object(3300, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();

        let first = registry.create_obj_inst(3300, 1).unwrap();
        registry.delete_obj_inst(3300, 1).unwrap();
        let second = registry.create_obj_inst(3300, 2).unwrap();

        assert_eq!(first.slot, second.slot);
        assert!(registry.resolve(&first).is_none());
        assert!(registry.resolve(&second).is_some());
    }

    #[test]
    fn test_unknown_object() {
        let mut registry: Registry<'_, 4> = Registry::new();
        assert_eq!(registry.create_obj_inst(7, 0), Err(ObjError::ObjectNotFound(7)));
        assert_eq!(registry.delete_obj_inst(7, 0), Err(ObjError::ObjectNotFound(7)));
        assert!(registry.get_obj_inst(7, 0).is_none());
    }

    #[test]
    fn test_register_errors() {
        let mut a = test_object(10, 1);
        let mut b = test_object(10, 1);
        let mut c = test_object(11, 1);
        let mut registry: Registry<'_, 1> = Registry::new();

        registry.register(&mut a).unwrap();
        assert_eq!(registry.register(&mut b), Err(ObjError::AlreadyRegistered(10)));
        assert_eq!(registry.register(&mut c), Err(ObjError::RegistryFull));

        registry.unregister(10).unwrap();
        assert_eq!(registry.stats().object_count, 0);
        assert_eq!(registry.unregister(10), Err(ObjError::ObjectNotFound(10)));
    }

    #[test]
    fn test_unregister_frees_space() {
        let mut a = test_object(10, 1);
        let mut c = test_object(11, 1);
        let mut registry: Registry<'_, 1> = Registry::new();
        registry.register(&mut a).unwrap();
        registry.unregister(10).unwrap();
        registry.register(&mut c).unwrap();
        assert!(registry.object(11).is_some());
        assert!(registry.object(10).is_none());
    }

    fn reject_create(_obj_inst_id: u16) -> i32 {
        -13
    }

    #[test]
    fn test_create_callback_rolls_back() {
        let mut obj = test_object(3300, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();
        registry.register_create_callback(3300, reject_create).unwrap();

        assert_eq!(registry.create_obj_inst(3300, 0), Err(ObjError::CallbackFailed(-13)));
        assert!(registry.get_obj_inst(3300, 0).is_none());
        assert_eq!(registry.stats().instance_count, 0);
    }

    static DELETED: AtomicU32 = AtomicU32::new(0);

    fn count_delete(_obj_inst_id: u16) -> i32 {
        DELETED.fetch_add(1, Ordering::SeqCst);
        -1
    }

    #[test]
    fn test_delete_callback_runs() {
        let mut obj = test_object(3301, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();
        registry.register_delete_callback(3301, count_delete).unwrap();

        registry.create_obj_inst(3301, 4).unwrap();
        registry.delete_obj_inst(3301, 4).unwrap();

        assert_eq!(DELETED.load(Ordering::SeqCst), 1);
        assert!(registry.get_obj_inst(3301, 4).is_none());
        assert_eq!(
            registry.delete_obj_inst(3301, 4),
            Err(ObjError::InstanceNotFound { obj_id: 3301, obj_inst_id: 4 })
        );
    }

    #[test]
    fn test_typed_access() {
        let mut obj = test_object(3300, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();
        registry.create_obj_inst(3300, 0).unwrap();

        let opaque = ResourcePath::new(3300, 0, 0);
        let counter = ResourcePath::new(3300, 0, 1);
        let flag = ResourcePath::new(3300, 0, 2);
        let stamp = ResourcePath::new(3300, 0, 3).with_res_inst(1);

        assert_eq!(registry.get_opaque(&opaque), Ok(&[][..]));
        assert_eq!(registry.get_value::<u32>(&counter), Ok(0));
        assert_eq!(registry.get_value::<bool>(&flag), Ok(false));

        registry.set_opaque(&opaque, &[1, 2, 3]).unwrap();
        registry.set_value(&counter, 77u32).unwrap();
        registry.set_value(&flag, true).unwrap();
        registry.set_value(&stamp, -5i64).unwrap();

        assert_eq!(registry.get_opaque(&opaque), Ok(&[1u8, 2, 3][..]));
        assert_eq!(registry.get_value::<u32>(&counter), Ok(77));
        assert_eq!(registry.get_value::<bool>(&flag), Ok(true));
        assert_eq!(registry.get_value::<i64>(&stamp), Ok(-5));
        assert_eq!(registry.get_value::<i64>(&ResourcePath::new(3300, 0, 3)), Ok(0));
    }

    #[test]
    fn test_typed_access_errors() {
        let mut obj = test_object(3300, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();
        registry.create_obj_inst(3300, 0).unwrap();

        let opaque = ResourcePath::new(3300, 0, 0);
        let counter = ResourcePath::new(3300, 0, 1);

        assert_eq!(registry.set_value(&opaque, 1u8), Err(ObjError::TypeMismatch { res_id: 0 }));
        assert_eq!(registry.set_opaque(&counter, &[1]), Err(ObjError::TypeMismatch { res_id: 1 }));
        assert_eq!(registry.get_value::<u16>(&counter), Err(ObjError::TypeMismatch { res_id: 1 }));
        assert_eq!(
            registry.set_opaque(&opaque, &[0; 5]),
            Err(ObjError::BufferTooSmall { needed: 5, capacity: 4 })
        );
        assert_eq!(
            registry.get_opaque(&ResourcePath::new(3300, 1, 0)),
            Err(ObjError::InstanceNotFound { obj_id: 3300, obj_inst_id: 1 })
        );
        assert_eq!(
            registry.get_opaque(&ResourcePath::new(3300, 0, 9)),
            Err(ObjError::ResourceNotFound { res_id: 9, res_inst_id: 0 })
        );
    }

    #[test]
    fn test_reinit_through_registry() {
        let mut obj = test_object(3300, 2);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut obj).unwrap();
        registry.create_obj_inst(3300, 0).unwrap();

        let counter = ResourcePath::new(3300, 0, 1);
        registry.set_value(&counter, 9u32).unwrap();
        registry.reinit_obj_inst(3300, 0).unwrap();
        assert_eq!(registry.get_value::<u32>(&counter), Ok(0));
    }

    #[test]
    fn test_snapshots() {
        let mut a = test_object(10, 2);
        let mut b = test_object(11, 3);
        let mut registry: Registry<'_, 4> = Registry::new();
        registry.register(&mut a).unwrap();
        registry.register(&mut b).unwrap();
        registry.create_obj_inst(11, 0).unwrap();

        let (snapshots, count) = registry.snapshots();
        assert_eq!(count, 2);
        assert_eq!(snapshots[0].obj_id, 10);
        assert_eq!(snapshots[1].instance_count, 1);
        assert_eq!(snapshots[1].field_count, 4);

        let stats = registry.stats();
        assert_eq!(stats, RegistryStats { object_count: 2, instance_count: 1, instance_capacity: 5 });
    }

    #[test]
    fn test_shared_registry() {
        let mut obj = test_object(3300, 1);
        let shared: SharedRegistry<'_> = spin::Mutex::new(Registry::new());

        shared.lock().register(&mut obj).unwrap();
        let inst = shared.lock().create_obj_inst(3300, 0).unwrap();
        assert!(shared.lock().resolve(&inst).is_some());
    }
}
