//! In-memory representation of a snapshot.

use droplet_core::{Clock, Extent};

use crate::error::SnapshotError;

/// Address of a leaf cell in a quadtree: `2^level` cells per side, column
/// `i` along `x`, row `j` along `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafKey {
    /// Refinement level.
    pub level: u8,
    /// Column index, `0..2^level`.
    pub i: u32,
    /// Row index, `0..2^level`.
    pub j: u32,
}

impl LeafKey {
    /// Construct a key.
    pub const fn new(level: u8, i: u32, j: u32) -> Self {
        Self { level, i, j }
    }

    /// Whether `(i, j)` lies inside the `2^level` square.
    pub fn in_bounds(&self) -> bool {
        match 1u64.checked_shl(u32::from(self.level)) {
            Some(n) => u64::from(self.i) < n && u64::from(self.j) < n,
            None => false,
        }
    }
}

/// Full persisted state: clock, domain, field layout, leaves and values.
///
/// `values[k][n]` is the value of field `fields[k]` in leaf `leaves[n]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotData {
    /// Scheduler position at the time of the dump.
    pub clock: Clock,
    /// Domain extent.
    pub extent: Extent,
    /// Field names in registration order.
    pub fields: Vec<String>,
    /// Leaf cells in canonical order.
    pub leaves: Vec<LeafKey>,
    /// One value column per field.
    pub values: Vec<Vec<f64>>,
}

impl SnapshotData {
    /// Check structural consistency: one column per field, one value per
    /// leaf, unique field names and in-bounds leaf keys.
    pub fn check(&self) -> Result<(), SnapshotError> {
        if self.values.len() != self.fields.len() {
            return Err(SnapshotError::malformed(format!(
                "{} value columns for {} fields",
                self.values.len(),
                self.fields.len()
            )));
        }
        for (name, column) in self.fields.iter().zip(&self.values) {
            if column.len() != self.leaves.len() {
                return Err(SnapshotError::malformed(format!(
                    "field '{name}' has {} values for {} leaves",
                    column.len(),
                    self.leaves.len()
                )));
            }
        }
        for (k, name) in self.fields.iter().enumerate() {
            if self.fields[..k].contains(name) {
                return Err(SnapshotError::malformed(format!(
                    "duplicate field name '{name}'"
                )));
            }
        }
        if let Some(bad) = self.leaves.iter().find(|leaf| !leaf.in_bounds()) {
            return Err(SnapshotError::malformed(format!(
                "leaf {bad:?} outside its level"
            )));
        }
        Ok(())
    }

    /// Value column of the field called `name`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.fields
            .iter()
            .position(|f| f == name)
            .map(|k| self.values[k].as_slice())
    }
}
