//! Instance Storage
//!
//! Preallocated backing store for one object type: one fixed row per
//! instance slot. Rows are never freed, only reset when a slot is claimed
//! again; a deleted instance's bytes stay in place until then.

use super::binding::ResourceBinding;

/// Fixed storage rows for `MAX` instances of `ROW` bytes each
pub struct StorageRows<const MAX: usize, const ROW: usize> {
    rows: [[u8; ROW]; MAX],
}

impl<const MAX: usize, const ROW: usize> StorageRows<MAX, ROW> {
    pub const fn new() -> Self {
        Self {
            rows: [[0; ROW]; MAX],
        }
    }

    /// Reset a row to defaults (all columns zero)
    pub fn reset(&mut self, slot: usize) {
        self.rows[slot].fill(0);
    }

    /// Current value bytes of a bound column
    pub fn value(&self, slot: usize, binding: &ResourceBinding) -> &[u8] {
        &self.rows[slot][binding.offset..binding.offset + binding.data_len]
    }

    /// Whole column, for writing
    pub fn column_mut(&mut self, slot: usize, binding: &ResourceBinding) -> &mut [u8] {
        &mut self.rows[slot][binding.range()]
    }

    /// Raw row bytes
    pub fn row(&self, slot: usize) -> &[u8] {
        &self.rows[slot]
    }
}

impl<const MAX: usize, const ROW: usize> Default for StorageRows<MAX, ROW> {
    fn default() -> Self {
        Self::new()
    }
}
