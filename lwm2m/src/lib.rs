//! LwM2M Object Registry
//!
//! Fixed-capacity registry of LwM2M managed objects for devices without a
//! heap. Every object type declares a static resource schema; its instances
//! live in preallocated slots whose resources are bound to preallocated
//! storage when the instance is created.
//!
//! # Architecture
//!
//! - **obj** - Object model: schema, storage rows, bindings, instance tables
//! - **registry** - Object type registry and instance lifecycle
//! - **value** - Resource paths and typed scalar access
//! - **objects** - Stock object definitions (OSCORE)
//! - **config** - Build-time sizes
//!
//! # Startup
//!
//! ```
//! use lwm2m::{objects::oscore, Registry};
//!
//! let mut oscore_obj: oscore::OscoreObject = oscore::new_object();
//! let mut registry: Registry<'_> = Registry::new();
//! let inst = oscore::init(&mut registry, &mut oscore_obj).unwrap();
//! assert_eq!(inst.obj_inst_id, 0);
//! ```
//!
//! The crate logs through the `log` facade and never installs a logger.

#![no_std]

pub mod config;
pub mod error;
pub mod obj;
pub mod objects;
pub mod registry;
pub mod value;

pub use error::ObjError;
pub use obj::{ManagedObject, ObjectDescriptor, ObjectId, ObjectInstanceTable, ResourceId};
pub use registry::{InstanceRef, ObjectSnapshot, Registry, RegistryStats, SharedRegistry};
pub use value::{ResourcePath, ScalarValue};
