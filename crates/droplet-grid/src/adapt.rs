//! Refinement, coarsening and wavelet-style adaptation.

use std::collections::BTreeSet;

use droplet_core::{AdaptCriterion, AdaptStats, Cell, CellId, EngineError, FieldAccess};
use droplet_snapshot::LeafKey;

use crate::quadtree::{children, parent, LeafValues, QuadGrid};

/// Coarsening threshold as a fraction of the refinement tolerance.
const COARSEN_RATIO: f64 = 2.0 / 3.0;

impl QuadGrid {
    /// Values of the four children of leaf `slot`, per field prolongation.
    fn prolongate(&self, slot: usize) -> [LeafValues; 4] {
        let key = self.leaves[slot];
        let mut out: [LeafValues; 4] = Default::default();
        for f in 0..self.fields.len() {
            for (vals, child) in out.iter_mut().zip(children(key)) {
                vals.push(self.prolongate_to(f, key, slot, 1, (child.i, child.j)));
            }
        }
        out
    }

    /// Split the leaves at `slots`, computing every child value from the
    /// current state before the mesh changes.
    fn split(&mut self, slots: &[usize]) -> Result<(), EngineError> {
        if let Some(&deep) = slots
            .iter()
            .find(|&&s| self.leaves[s].level >= Self::DEPTH_LIMIT)
        {
            return Err(EngineError::DepthLimit {
                level: self.leaves[deep].level + 1,
                max: Self::DEPTH_LIMIT,
            });
        }
        let splits: Vec<(LeafKey, [LeafValues; 4])> = slots
            .iter()
            .map(|&s| (self.leaves[s], self.prolongate(s)))
            .collect();
        let mut map = self.leaf_map();
        for (key, kids) in splits {
            map.remove(&key);
            for (child, vals) in children(key).into_iter().zip(kids) {
                map.insert(child, vals);
            }
        }
        self.install(map);
        Ok(())
    }

    /// Merge every sibling group under `parents` into its parent, whose
    /// values are the children's means.
    fn merge(&mut self, parents: &BTreeSet<LeafKey>) {
        let mut map = self.leaf_map();
        for &p in parents {
            let mut sum = LeafValues::from_elem(0.0, self.fields.len());
            for child in children(p) {
                if let Some(vals) = map.remove(&child) {
                    for (acc, v) in sum.iter_mut().zip(vals) {
                        *acc += v;
                    }
                }
            }
            for acc in sum.iter_mut() {
                *acc *= 0.25;
            }
            map.insert(p, sum);
        }
        self.install(map);
    }

    /// Parents all of whose four children are leaves, in canonical order.
    fn mergeable_parents(&self) -> BTreeSet<LeafKey> {
        let leaves: BTreeSet<LeafKey> = self.leaves.iter().copied().collect();
        leaves
            .iter()
            .filter_map(|&k| parent(k))
            .filter(|&p| children(p).iter().all(|c| leaves.contains(c)))
            .collect()
    }

    /// Geometry of a parent cell; `id` is the slot of its first child.
    fn parent_cell(&self, key: LeafKey) -> Cell {
        let first = self.lookup.get(&children(key)[0]).copied().unwrap_or(0);
        self.cell_of(key, CellId(first))
    }

    pub(crate) fn refine_where(
        &mut self,
        predicate: &dyn Fn(&Cell) -> bool,
    ) -> Result<usize, EngineError> {
        let mut total = 0;
        loop {
            let slots: Vec<usize> = self
                .active_cells()
                .into_iter()
                .filter(|c| predicate(c))
                .map(|c| c.id.0)
                .collect();
            if slots.is_empty() {
                return Ok(total);
            }
            self.split(&slots)?;
            total += slots.len();
        }
    }

    pub(crate) fn unrefine_where(&mut self, predicate: &dyn Fn(&Cell) -> bool) -> usize {
        let mut total = 0;
        loop {
            let parents: BTreeSet<LeafKey> = self
                .mergeable_parents()
                .into_iter()
                .filter(|&p| predicate(&self.parent_cell(p)))
                .collect();
            if parents.is_empty() {
                return total;
            }
            total += parents.len();
            self.merge(&parents);
        }
    }

    /// Largest absolute second difference of field `f` at `key` along
    /// either axis.
    fn detail(&self, f: usize, key: LeafKey) -> f64 {
        let s = self.stencil3(f, key);
        let dx = (s[2][1] - 2.0 * s[1][1] + s[0][1]).abs();
        let dy = (s[1][2] - 2.0 * s[1][1] + s[1][0]).abs();
        dx.max(dy)
    }

    pub(crate) fn adapt(
        &mut self,
        criteria: &[AdaptCriterion],
        max_level: u8,
        min_level: u8,
    ) -> Result<AdaptStats, EngineError> {
        let resolved: Vec<(usize, f64)> = criteria
            .iter()
            .map(|c| self.field_index(c.field).map(|f| (f, c.tolerance)))
            .collect::<Result<_, _>>()?;

        let details: Vec<Vec<f64>> = self
            .leaves
            .iter()
            .map(|&key| resolved.iter().map(|&(f, _)| self.detail(f, key)).collect())
            .collect();

        let refine: Vec<usize> = (0..self.leaves.len())
            .filter(|&s| {
                let level = self.leaves[s].level;
                level < min_level
                    || (level < max_level
                        && details[s]
                            .iter()
                            .zip(&resolved)
                            .any(|(&d, &(_, tol))| d > tol))
            })
            .collect();
        let flagged: BTreeSet<LeafKey> = refine.iter().map(|&s| self.leaves[s]).collect();

        let coarsen: BTreeSet<LeafKey> = self
            .mergeable_parents()
            .into_iter()
            .filter(|&p| {
                let kids = children(p);
                if kids.iter().any(|k| flagged.contains(k)) {
                    return false;
                }
                let child_level = p.level + 1;
                if child_level > max_level {
                    return true;
                }
                child_level > min_level
                    && kids.iter().all(|k| {
                        let s = self.lookup[k];
                        details[s]
                            .iter()
                            .zip(&resolved)
                            .all(|(&d, &(_, tol))| d < COARSEN_RATIO * tol)
                    })
            })
            .collect();

        if !refine.is_empty() {
            self.split(&refine)?;
        }
        if !coarsen.is_empty() {
            self.merge(&coarsen);
        }
        Ok(AdaptStats {
            refined: refine.len(),
            coarsened: coarsen.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplet_core::{DomainSpec, Extent, FieldDef, FlowFields};

    fn grid(level: u8) -> QuadGrid {
        QuadGrid::new(&DomainSpec {
            extent: Extent {
                size: 1.0,
                x0: 0.0,
                y0: 0.0,
            },
            level,
            fields: FlowFields::definitions(),
        })
        .unwrap()
    }

    fn fill_half_plane(g: &mut QuadGrid, h: f64) {
        let f = FlowFields::STANDARD.f;
        for c in g.active_cells() {
            let lo = c.x - 0.5 * c.delta;
            let frac = ((h - lo) / c.delta).clamp(0.0, 1.0);
            g.set(f, c.id, frac);
        }
    }

    fn volume(g: &QuadGrid) -> f64 {
        let f = FlowFields::STANDARD.f;
        g.active_cells()
            .iter()
            .map(|c| g.get(f, c.id) * c.delta * c.delta)
            .sum()
    }

    #[test]
    fn refine_runs_to_fixed_point() {
        let mut g = grid(1);
        let n = g
            .refine_where(&|c| c.x < 0.5 && c.y < 0.5 && c.level < 4)
            .unwrap();
        // 1 + 4 + 16 splits of the lower-left quadrant.
        assert_eq!(n, 21);
        assert_eq!(g.depth(), 4);
        assert_eq!(g.leaf_count(), 3 + 64);
    }

    #[test]
    fn refine_reports_depth_limit() {
        let mut g = grid(0);
        // Only the corner cell at the origin keeps splitting.
        let err = g
            .refine_where(&|c| c.x < c.delta && c.y < c.delta)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::DepthLimit {
                level: QuadGrid::DEPTH_LIMIT + 1,
                max: QuadGrid::DEPTH_LIMIT
            }
        );
    }

    #[test]
    fn fraction_prolongation_conserves_volume_and_position() {
        let mut g = grid(3);
        fill_half_plane(&mut g, 0.3);
        let before = volume(&g);
        g.refine_where(&|c| c.level < 5).unwrap();
        assert!((volume(&g) - before).abs() < 1e-12);
        // A child straddling x = 0.3 at level 5 holds exactly its share.
        let id = g.locate(0.3 - 1e-9, 0.5).unwrap();
        let c = g.active_cells()[id.0];
        let expected = ((0.3 - (c.x - 0.5 * c.delta)) / c.delta).clamp(0.0, 1.0);
        assert!((g.get(FlowFields::STANDARD.f, id) - expected).abs() < 1e-9);
    }

    #[test]
    fn injection_for_velocity() {
        let mut g = grid(1);
        let ux = FlowFields::STANDARD.ux;
        for c in g.active_cells() {
            g.set(ux, c.id, -1.0);
        }
        g.refine_where(&|c| c.level < 2).unwrap();
        assert!(g.active_cells().iter().all(|c| g.get(ux, c.id) == -1.0));
    }

    #[test]
    fn unrefine_merges_by_parent_predicate() {
        let mut g = grid(3);
        let merged = g.unrefine_where(&|c| c.x > 0.5);
        // Right half collapses to two level-1 cells: 8 + 2 + ... merges.
        assert!(merged > 0);
        assert_eq!(g.leaves().iter().filter(|k| k.level == 3).count(), 32);
        let right: Vec<_> = g
            .active_cells()
            .into_iter()
            .filter(|c| c.x > 0.5)
            .collect();
        assert!(right.iter().all(|c| c.level == 1), "{right:?}");
    }

    #[test]
    fn merge_averages_children() {
        let mut g = QuadGrid::new(&DomainSpec {
            extent: Extent {
                size: 1.0,
                x0: 0.0,
                y0: 0.0,
            },
            level: 1,
            fields: vec![FieldDef::scalar("q")],
        })
        .unwrap();
        for (n, c) in g.active_cells().into_iter().enumerate() {
            g.set(droplet_core::FieldId(0), c.id, n as f64);
        }
        g.unrefine_where(&|_| true);
        assert_eq!(g.leaf_count(), 1);
        assert_eq!(g.get(droplet_core::FieldId(0), CellId(0)), 1.5);
    }

    #[test]
    fn adapt_refines_interface_and_coarsens_bulk() {
        let mut g = grid(4);
        fill_half_plane(&mut g, 0.3);
        let criteria = [AdaptCriterion {
            field: FlowFields::STANDARD.f,
            tolerance: 1e-3,
        }];
        let stats = g.adapt(&criteria, 6, 2).unwrap();
        assert!(stats.refined > 0);
        assert!(stats.coarsened > 0);
        // Level bounds hold after repeated passes.
        for _ in 0..4 {
            g.adapt(&criteria, 6, 2).unwrap();
        }
        let levels: Vec<u8> = g.leaves().iter().map(|k| k.level).collect();
        assert!(levels.iter().all(|&l| (2..=6).contains(&l)));
        let interface = g.locate(0.3 - 1e-9, 0.5).unwrap();
        assert_eq!(g.leaves()[interface.0].level, 6);
    }

    #[test]
    fn adapt_forces_min_level() {
        let mut g = grid(1);
        let criteria = [AdaptCriterion {
            field: FlowFields::STANDARD.ux,
            tolerance: 1.0,
        }];
        g.adapt(&criteria, 5, 3).unwrap();
        g.adapt(&criteria, 5, 3).unwrap();
        assert!(g.leaves().iter().all(|k| k.level == 3));
    }

    #[test]
    fn adapt_rejects_unknown_field() {
        let mut g = grid(1);
        let criteria = [AdaptCriterion {
            field: droplet_core::FieldId(9),
            tolerance: 1.0,
        }];
        assert!(matches!(
            g.adapt(&criteria, 5, 1),
            Err(EngineError::UnknownField { .. })
        ));
    }
}
