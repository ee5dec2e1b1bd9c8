//! Build-time Configuration
//!
//! Every table in this crate is sized at compile time. The constants here
//! are the defaults used by the stock object definitions; object tables take
//! their sizes as const generics, so a board can instantiate its own
//! capacities without editing this file.

/// Maximum number of object types a [`Registry`](crate::Registry) holds
pub const LWM2M_ENGINE_MAX_OBJECTS: usize = 16;

// ============================================================================
// OSCORE Object (21)
// ============================================================================

/// Maximum number of OSCORE security-context instances
pub const LWM2M_OSCORE_OBJ_INSTANCE_COUNT: usize = 1;

/// OSCORE Master Secret buffer size
pub const LWM2M_OSCORE_OBJ_MASTER_SECRET_SIZE: usize = 16;

/// OSCORE Sender ID buffer size
pub const LWM2M_OSCORE_OBJ_SENDER_ID_SIZE: usize = 8;

/// OSCORE Recipient ID buffer size
pub const LWM2M_OSCORE_OBJ_RECIPIENT_ID_SIZE: usize = 8;

/// OSCORE Master Salt buffer size
pub const LWM2M_OSCORE_OBJ_MASTER_SALT_SIZE: usize = 16;

/// OSCORE ID Context buffer size
pub const LWM2M_OSCORE_OBJ_ID_CONTEXT_SIZE: usize = 8;
