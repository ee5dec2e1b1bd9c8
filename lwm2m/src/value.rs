//! Resource Paths and Scalar Values
//!
//! Typed access to resource storage. Values are kept in native byte order;
//! encoding for the wire is the engine's business.

use core::fmt;

use crate::obj::{ObjectId, ResourceId, ValueKind};

/// Address of one resource instance: `/obj/inst/res/res_inst`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    pub obj_id: ObjectId,
    pub obj_inst_id: u16,
    pub res_id: ResourceId,
    pub res_inst_id: u16,
}

impl ResourcePath {
    /// Path to a single-valued resource
    pub const fn new(obj_id: ObjectId, obj_inst_id: u16, res_id: ResourceId) -> Self {
        Self {
            obj_id,
            obj_inst_id,
            res_id,
            res_inst_id: 0,
        }
    }

    /// Path to one instance of a multi-instance resource
    pub const fn with_res_inst(mut self, res_inst_id: u16) -> Self {
        self.res_inst_id = res_inst_id;
        self
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/{}/{}",
            self.obj_id, self.obj_inst_id, self.res_id, self.res_inst_id
        )
    }
}

/// Fixed-width value storable in a scalar resource
pub trait ScalarValue: Copy + Sized {
    /// Storage width in bytes
    const WIDTH: usize;

    /// True if a resource of `kind` can hold this type
    fn accepts(kind: ValueKind) -> bool;

    /// Write the value into exactly `WIDTH` bytes
    fn store(self, out: &mut [u8]);

    /// Read the value back from exactly `WIDTH` bytes
    fn load(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($ty:ty, $($kind:ident)|+) => {
        impl ScalarValue for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn accepts(kind: ValueKind) -> bool {
                matches!(kind, $(ValueKind::$kind)|+)
            }

            fn store(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }

            fn load(bytes: &[u8]) -> Self {
                let mut buf = [0u8; core::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_ne_bytes(buf)
            }
        }
    };
}

impl_scalar!(u8, U8);
impl_scalar!(u16, U16);
impl_scalar!(u32, U32 | ObjLnk);
impl_scalar!(i8, S8);
impl_scalar!(i16, S16);
impl_scalar!(i32, S32);
impl_scalar!(i64, S64 | Time);
impl_scalar!(f64, Float);

impl ScalarValue for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Bool
    }

    fn store(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    fn load(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}
