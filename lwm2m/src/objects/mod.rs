//! Stock Object Definitions
//!
//! Each submodule declares one object type: its resource ids, schema,
//! sized instance table and the init routine that registers it.

pub mod oscore;

pub use oscore::{OscoreObject, OscoreObjectN};
