//! Object Model (obj)
//!
//! The object model describes every manageable entity on the device:
//!
//! - **Schema**: static resource descriptors per object type
//! - **Storage**: preallocated rows, one per instance slot
//! - **Bindings**: per-instance map from resource to storage column
//! - **Instance Tables**: fixed-capacity slots with unique instance ids
//!
//! # Key Structures
//!
//! - `ResourceDescriptor`: one schema entry
//! - `ResourceBinding`: one resource instance bound to storage
//! - `InstanceRecord`: one instance slot
//! - `ObjectInstanceTable`: all slots and storage of one object type
//! - `ManagedObject`: the interface the registry drives

pub mod binder;
pub mod binding;
pub mod field;
pub mod instance;
pub mod object_type;
pub mod storage;

/// Object type id
pub type ObjectId = u16;

/// Resource id, unique within an object type
pub type ResourceId = u16;

pub use binder::bind_resources;
pub use binding::{ResourceBinding, RES_INSTANCE_NOT_CREATED};
pub use field::{
    binding_count, find_field, storage_size, Permissions, ResourceDescriptor, ValueKind,
};
pub use instance::{InstanceRecord, ObjectInstanceTable};
pub use object_type::{
    object_id, CreateCallback, DeleteCallback, InstanceView, ManagedObject, ObjectCallbacks,
    ObjectDescriptor,
};
pub use storage::StorageRows;
