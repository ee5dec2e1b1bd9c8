//! OSCORE Object (21)
//!
//! Security context for Object Security for Constrained RESTful
//! Environments. The object only stores the context material; deriving
//! keys from it is done elsewhere.
//!
//! | RID | Resource       | Access | Kind   |
//! |-----|----------------|--------|--------|
//! | 0   | Master Secret  | W      | Opaque |
//! | 1   | Sender ID      | W      | Opaque |
//! | 2   | Recipient ID   | W      | Opaque |
//! | 3   | AEAD Algorithm | W_OPT  | U8     |
//! | 4   | HMAC Algorithm | W_OPT  | U8     |
//! | 5   | Master Salt    | W_OPT  | Opaque |
//! | 6   | ID Context     | W_OPT  | Opaque |

use log::error;

use crate::config::{
    LWM2M_OSCORE_OBJ_ID_CONTEXT_SIZE, LWM2M_OSCORE_OBJ_INSTANCE_COUNT,
    LWM2M_OSCORE_OBJ_MASTER_SALT_SIZE, LWM2M_OSCORE_OBJ_MASTER_SECRET_SIZE,
    LWM2M_OSCORE_OBJ_RECIPIENT_ID_SIZE, LWM2M_OSCORE_OBJ_SENDER_ID_SIZE,
};
use crate::error::ObjError;
use crate::obj::{
    binding_count, object_id, storage_size, ObjectDescriptor, ObjectInstanceTable, Permissions,
    ResourceDescriptor, ResourceId, ValueKind,
};
use crate::registry::{InstanceRef, Registry};

pub const OSCORE_VERSION_MAJOR: u8 = 2;
pub const OSCORE_VERSION_MINOR: u8 = 0;

/// Resource ids
pub mod rid {
    use super::ResourceId;

    pub const MASTER_SECRET: ResourceId = 0;
    pub const SENDER_ID: ResourceId = 1;
    pub const RECIPIENT_ID: ResourceId = 2;
    pub const AEAD_ALGORITHM: ResourceId = 3;
    pub const HMAC_ALGORITHM: ResourceId = 4;
    pub const MASTER_SALT: ResourceId = 5;
    pub const ID_CONTEXT: ResourceId = 6;
}

/// Number of resources in the object
pub const OSCORE_MAX_RID: usize = 7;

/// Resource schema
pub const FIELDS: &[ResourceDescriptor] = &[
    ResourceDescriptor::new(rid::MASTER_SECRET, Permissions::W, ValueKind::Opaque)
        .with_size(LWM2M_OSCORE_OBJ_MASTER_SECRET_SIZE),
    ResourceDescriptor::new(rid::SENDER_ID, Permissions::W, ValueKind::Opaque)
        .with_size(LWM2M_OSCORE_OBJ_SENDER_ID_SIZE),
    ResourceDescriptor::new(rid::RECIPIENT_ID, Permissions::W, ValueKind::Opaque)
        .with_size(LWM2M_OSCORE_OBJ_RECIPIENT_ID_SIZE),
    ResourceDescriptor::new(rid::AEAD_ALGORITHM, Permissions::W_OPT, ValueKind::U8),
    ResourceDescriptor::new(rid::HMAC_ALGORITHM, Permissions::W_OPT, ValueKind::U8),
    ResourceDescriptor::new(rid::MASTER_SALT, Permissions::W_OPT, ValueKind::Opaque)
        .with_size(LWM2M_OSCORE_OBJ_MASTER_SALT_SIZE),
    ResourceDescriptor::new(rid::ID_CONTEXT, Permissions::W_OPT, ValueKind::Opaque)
        .with_size(LWM2M_OSCORE_OBJ_ID_CONTEXT_SIZE),
];

/// Storage row width of one instance
pub const OSCORE_ROW_SIZE: usize = storage_size(FIELDS);

/// Binding entries per instance
pub const OSCORE_RESOURCE_INSTANCE_COUNT: usize = binding_count(FIELDS);

/// OSCORE object with `MAX` instance slots
pub type OscoreObjectN<const MAX: usize> =
    ObjectInstanceTable<MAX, OSCORE_ROW_SIZE, OSCORE_RESOURCE_INSTANCE_COUNT>;

/// OSCORE object sized by the build configuration
pub type OscoreObject = OscoreObjectN<LWM2M_OSCORE_OBJ_INSTANCE_COUNT>;

/// Registration descriptor allowing `max_instance_count` instances
pub const fn descriptor(max_instance_count: usize) -> ObjectDescriptor {
    ObjectDescriptor {
        obj_id: object_id::OSCORE,
        version_major: OSCORE_VERSION_MAJOR,
        version_minor: OSCORE_VERSION_MINOR,
        is_core: true,
        fields: FIELDS,
        max_instance_count,
    }
}

/// Create an empty OSCORE object
pub const fn new_object<const MAX: usize>() -> OscoreObjectN<MAX> {
    ObjectInstanceTable::new(descriptor(MAX))
}

/// Register the OSCORE object and auto-create instance 0
pub fn init<'a, const N: usize, const MAX: usize>(
    registry: &mut Registry<'a, N>,
    object: &'a mut OscoreObjectN<MAX>,
) -> Result<InstanceRef, ObjError> {
    if let Err(err) = registry.register(object) {
        error!("Register LWM2M OSCORE object error: {}", err);
        return Err(err);
    }

    registry.create_obj_inst(object_id::OSCORE, 0).map_err(|err| {
        error!("Create LWM2M OSCORE instance 0 error: {}", err.errno());
        err
    })
}
