//! Object Engine Errors
//!
//! Every failure in the registry is reported as an [`ObjError`] value.
//! Nothing in this crate panics on a bad request; the caller decides
//! whether a failure is fatal.

use core::fmt;

use crate::obj::{ObjectId, ResourceId};

/// errno values used at the engine boundary
pub mod errno {
    pub const ENOENT: i32 = 2;
    pub const ENOMEM: i32 = 12;
    pub const EEXIST: i32 = 17;
    pub const EINVAL: i32 = 22;
    pub const ENOSPC: i32 = 28;
}

/// Object engine error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjError {
    /// An occupied instance already carries the requested id
    DuplicateInstance { obj_id: ObjectId, obj_inst_id: u16 },
    /// No free instance slot remains
    CapacityExceeded { obj_id: ObjectId },
    /// No object type registered under this id
    ObjectNotFound(ObjectId),
    /// The object type has no instance with this id
    InstanceNotFound { obj_id: ObjectId, obj_inst_id: u16 },
    /// The instance has no binding for this resource (instance)
    ResourceNotFound { res_id: ResourceId, res_inst_id: u16 },
    /// An object type with this id is already registered
    AlreadyRegistered(ObjectId),
    /// The registry has no room for another object type
    RegistryFull,
    /// The value does not match the resource's declared kind
    TypeMismatch { res_id: ResourceId },
    /// The value does not fit the resource's storage
    BufferTooSmall { needed: usize, capacity: usize },
    /// The schema does not fit the object's binding table or storage row
    SchemaOverflow,
    /// A user callback returned a negative status code
    CallbackFailed(i32),
}

impl ObjError {
    /// Negative errno equivalent of this error
    pub const fn errno(&self) -> i32 {
        match self {
            ObjError::DuplicateInstance { .. } | ObjError::AlreadyRegistered(_) => -errno::EEXIST,
            ObjError::CapacityExceeded { .. }
            | ObjError::RegistryFull
            | ObjError::BufferTooSmall { .. } => -errno::ENOMEM,
            ObjError::ObjectNotFound(_)
            | ObjError::InstanceNotFound { .. }
            | ObjError::ResourceNotFound { .. } => -errno::ENOENT,
            ObjError::TypeMismatch { .. } => -errno::EINVAL,
            ObjError::SchemaOverflow => -errno::ENOSPC,
            ObjError::CallbackFailed(code) => *code,
        }
    }
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::DuplicateInstance { obj_id, obj_inst_id } => {
                write!(f, "instance {}/{} already exists", obj_id, obj_inst_id)
            }
            ObjError::CapacityExceeded { obj_id } => {
                write!(f, "no more instances available for object {}", obj_id)
            }
            ObjError::ObjectNotFound(obj_id) => write!(f, "unable to find object {}", obj_id),
            ObjError::InstanceNotFound { obj_id, obj_inst_id } => {
                write!(f, "unable to find instance {}/{}", obj_id, obj_inst_id)
            }
            ObjError::ResourceNotFound { res_id, res_inst_id } => {
                write!(f, "unable to find resource {} instance {}", res_id, res_inst_id)
            }
            ObjError::AlreadyRegistered(obj_id) => {
                write!(f, "object {} is already registered", obj_id)
            }
            ObjError::RegistryFull => write!(f, "object registry is full"),
            ObjError::TypeMismatch { res_id } => {
                write!(f, "value type does not match resource {}", res_id)
            }
            ObjError::BufferTooSmall { needed, capacity } => {
                write!(f, "value of {} bytes exceeds capacity {}", needed, capacity)
            }
            ObjError::SchemaOverflow => write!(f, "schema does not fit object storage"),
            ObjError::CallbackFailed(code) => write!(f, "callback failed: {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        let dup = ObjError::DuplicateInstance { obj_id: 21, obj_inst_id: 0 };
        assert_eq!(dup.errno(), -17);
        assert_eq!(ObjError::CapacityExceeded { obj_id: 21 }.errno(), -12);
        assert_eq!(ObjError::ObjectNotFound(3).errno(), -2);
        assert_eq!(ObjError::SchemaOverflow.errno(), -28);
        assert_eq!(ObjError::CallbackFailed(-5).errno(), -5);
    }
}
