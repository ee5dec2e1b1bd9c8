//! Resource Schema Binder
//!
//! Walks a schema in declaration order and lays every resource instance out
//! in an instance row. Columns are assigned back to back, so two bindings
//! never share storage, and the layout depends only on the schema: binding
//! the same slot twice gives the same table.
//!
//! ```text
//! row: | master secret (16) | sender id (8) | ... | aead (1) | hmac (1) | ...
//!        ^ binding 0          ^ binding 1           ^ binding 3
//! ```

use super::binding::ResourceBinding;
use super::field::ResourceDescriptor;
use crate::error::ObjError;

/// Build the binding table for one instance
///
/// # Arguments
/// * `schema` - Resource descriptors in declaration order
/// * `row_size` - Width of the instance's storage row
/// * `out` - Binding table to fill
///
/// # Returns
/// Number of bindings written. Entries past that count are reset to
/// [`ResourceBinding::empty`].
pub fn bind_resources(
    schema: &[ResourceDescriptor],
    row_size: usize,
    out: &mut [ResourceBinding],
) -> Result<usize, ObjError> {
    let mut count = 0;
    let mut offset = 0;

    for field in schema {
        for res_inst_id in 0..field.multi_count {
            if count >= out.len() || offset + field.size > row_size {
                return Err(ObjError::SchemaOverflow);
            }

            // Scalars hold a zero value; byte buffers start empty
            let data_len = if field.kind.is_bytes() { 0 } else { field.size };

            out[count] = ResourceBinding {
                descriptor: *field,
                offset,
                capacity: field.size,
                data_len,
                res_inst_id,
            };

            offset += field.size;
            count += 1;
        }
    }

    for entry in out[count..].iter_mut() {
        *entry = ResourceBinding::empty();
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::field::{binding_count, storage_size, Permissions, ValueKind};

    const FIELDS: &[ResourceDescriptor] = &[
        ResourceDescriptor::new(0, Permissions::W, ValueKind::Opaque).with_size(10),
        ResourceDescriptor::new(1, Permissions::W_OPT, ValueKind::U8),
        ResourceDescriptor::new(4, Permissions::R, ValueKind::U32).multi(2),
        ResourceDescriptor::new(7, Permissions::W_OPT, ValueKind::String).with_size(5),
    ];

    const ROW: usize = storage_size(FIELDS);
    const BINDINGS: usize = binding_count(FIELDS);

    #[test]
    fn test_bind_in_schema_order() {
        let mut table = [ResourceBinding::empty(); BINDINGS];
        let count = bind_resources(FIELDS, ROW, &mut table).unwrap();
        assert_eq!(count, 5);

        let ids: [u16; 5] = core::array::from_fn(|i| table[i].res_id());
        assert_eq!(ids, [0, 1, 4, 4, 7]);
        assert_eq!(table[2].res_inst_id, 0);
        assert_eq!(table[3].res_inst_id, 1);
        assert_eq!(table[4].offset, 10 + 1 + 8);
    }

    #[test]
    fn test_defaults() {
        let mut table = [ResourceBinding::empty(); BINDINGS];
        bind_resources(FIELDS, ROW, &mut table).unwrap();
        assert_eq!(table[0].data_len, 0);
        assert_eq!(table[1].data_len, 1);
        assert_eq!(table[2].data_len, 4);
        assert_eq!(table[4].data_len, 0);
    }

    #[test]
    fn test_no_overlap() {
        let mut table = [ResourceBinding::empty(); BINDINGS];
        let count = bind_resources(FIELDS, ROW, &mut table).unwrap();
        for a in 0..count {
            for b in (a + 1)..count {
                assert!(!table[a].overlaps(&table[b]));
            }
            assert!(table[a].range().end <= ROW);
        }
    }

    #[test]
    fn test_rebind_is_idempotent() {
        let mut first = [ResourceBinding::empty(); BINDINGS];
        let mut second = [ResourceBinding::empty(); BINDINGS];
        bind_resources(FIELDS, ROW, &mut first).unwrap();
        second[0].data_len = 3;
        bind_resources(FIELDS, ROW, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overflow() {
        let mut short = [ResourceBinding::empty(); 3];
        assert_eq!(bind_resources(FIELDS, ROW, &mut short), Err(ObjError::SchemaOverflow));

        let mut table = [ResourceBinding::empty(); BINDINGS];
        assert_eq!(bind_resources(FIELDS, ROW - 1, &mut table), Err(ObjError::SchemaOverflow));
    }

    #[test]
    fn test_trailing_entries_cleared() {
        let mut table = [ResourceBinding::empty(); BINDINGS + 2];
        table[6].res_inst_id = 3;
        let count = bind_resources(FIELDS, ROW, &mut table).unwrap();
        assert!(table[count..].iter().all(|b| !b.is_bound()));
    }
}
