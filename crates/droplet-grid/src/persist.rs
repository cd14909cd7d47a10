//! Dump and restore through the snapshot format.

use std::collections::HashSet;
use std::path::Path;

use droplet_core::{Clock, EngineError, FieldDef};
use droplet_snapshot::{read_snapshot, write_snapshot, LeafKey, SnapshotData};

use crate::quadtree::{parent, LeafMap, QuadGrid};

fn snapshot_error(path: &Path, reason: impl ToString) -> EngineError {
    EngineError::Snapshot {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Check that `leaves` tile the unit square exactly once.
///
/// No leaf may have an ancestor among the leaves, and the areas must sum
/// to one. Both together rule out overlaps and holes.
fn check_tiling(leaves: &[LeafKey]) -> Result<(), String> {
    if let Some(deep) = leaves.iter().find(|k| k.level > QuadGrid::DEPTH_LIMIT) {
        return Err(format!(
            "leaf {deep:?} deeper than the limit of {}",
            QuadGrid::DEPTH_LIMIT
        ));
    }
    let set: HashSet<LeafKey> = leaves.iter().copied().collect();
    if set.len() != leaves.len() {
        return Err("duplicate leaf".into());
    }
    for &leaf in leaves {
        let mut up = parent(leaf);
        while let Some(ancestor) = up {
            if set.contains(&ancestor) {
                return Err(format!("leaf {leaf:?} lies inside leaf {ancestor:?}"));
            }
            up = parent(ancestor);
        }
    }
    // Area in units of the finest possible cell.
    let full = 1u128 << (2 * u32::from(QuadGrid::DEPTH_LIMIT));
    let area: u128 = leaves
        .iter()
        .map(|k| 1u128 << (2 * u32::from(QuadGrid::DEPTH_LIMIT - k.level)))
        .sum();
    if area != full {
        return Err("leaves do not cover the domain".into());
    }
    Ok(())
}

impl QuadGrid {
    /// Full state as a snapshot, in canonical order.
    pub fn to_snapshot(&self, clock: Clock) -> SnapshotData {
        SnapshotData {
            clock,
            extent: self.extent,
            fields: self.fields.keys().cloned().collect(),
            leaves: self.leaves.clone(),
            values: self.values.clone(),
        }
    }

    pub(crate) fn dump_to(&self, path: &Path, clock: Clock) -> Result<(), EngineError> {
        write_snapshot(path, &self.to_snapshot(clock)).map_err(|e| snapshot_error(path, e))
    }

    pub(crate) fn restore_from(&mut self, path: &Path) -> Result<Option<Clock>, EngineError> {
        let Some(data) = read_snapshot(path).map_err(|e| snapshot_error(path, e))? else {
            return Ok(None);
        };
        let clock = data.clock;
        self.load(data).map_err(|reason| snapshot_error(path, reason))?;
        Ok(Some(clock))
    }

    /// Replace mesh, extent and values with `data`.
    ///
    /// Registered fields keep their boundary conditions and prolongation;
    /// fields only present in the snapshot are appended as plain scalars.
    fn load(&mut self, data: SnapshotData) -> Result<(), String> {
        check_tiling(&data.leaves)?;
        if !(data.extent.size.is_finite() && data.extent.size > 0.0) {
            return Err(format!("invalid extent {:?}", data.extent));
        }
        for name in self.fields.keys() {
            if !data.fields.contains(name) {
                return Err(format!("field '{name}' missing from snapshot"));
            }
        }
        for name in &data.fields {
            if !self.fields.contains_key(name) {
                self.fields
                    .insert(name.clone(), FieldDef::scalar(name.as_str()));
            }
        }
        let columns: Vec<usize> = self
            .fields
            .keys()
            .filter_map(|name| data.fields.iter().position(|f| f == name))
            .collect();
        let map: LeafMap = data
            .leaves
            .iter()
            .enumerate()
            .map(|(n, &key)| (key, columns.iter().map(|&c| data.values[c][n]).collect()))
            .collect();
        self.extent = data.extent;
        self.install(map);
        Ok(())
    }
}
