//! The engine contract: cell access, reductions, mesh adaptation,
//! interface reconstruction and persistence.
//!
//! The control layer never touches a mesh directly. Initialization and
//! diagnostics are written against the narrow [`FieldAccess`] capability so
//! they can run on a flat list of synthetic cells; everything that changes
//! the mesh or needs neighbour stencils goes through [`Domain`].

use std::path::Path;

use crate::error::EngineError;
use crate::field::{BoundaryCondition, FieldDef, Prolongation};
use crate::geometry::Point;
use crate::id::{CellId, Clock, FieldId, Side};
use crate::reduce::compensated_sum;

/// Geometry of one active (leaf) cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Slot of the cell, valid until the next mesh change.
    pub id: CellId,
    /// Refinement level; the cell size is `L / 2^level`.
    pub level: u8,
    /// Centre `x` (along the symmetry axis, substrate at `x0`).
    pub x: f64,
    /// Centre `y` (distance from the symmetry axis).
    pub y: f64,
    /// Cell size (`Delta`).
    pub delta: f64,
}

/// Narrow per-cell access capability.
///
/// Enough to initialize fields and compute integral diagnostics, and small
/// enough to implement over a plain vector of cells in tests.
pub trait FieldAccess {
    /// All active cells, in the backend's canonical order.
    fn active_cells(&self) -> Vec<Cell>;

    /// Value of `field` in `cell`.
    ///
    /// Like slice indexing, panics when `cell` is stale or `field` is not
    /// registered.
    fn get(&self, field: FieldId, cell: CellId) -> f64;

    /// Overwrite the value of `field` in `cell`.
    ///
    /// Panics under the same conditions as [`get`](Self::get).
    fn set(&mut self, field: FieldId, cell: CellId, value: f64);

    /// Sum `term` over every active cell.
    ///
    /// Uses compensated summation so that the result does not depend, to
    /// within a few ulps, on the order in which cells are visited.
    fn sum(&self, term: &dyn Fn(&Cell) -> f64) -> f64 {
        compensated_sum(self.active_cells().iter().map(term))
    }

    /// Maximum of `init` and every `Some` produced by `term`.
    ///
    /// `max` is associative and commutative, so the result is independent
    /// of the visiting order.
    fn max(&self, init: f64, term: &dyn Fn(&Cell) -> Option<f64>) -> f64 {
        self.active_cells()
            .iter()
            .filter_map(term)
            .fold(init, f64::max)
    }
}

/// Extent of the square computational domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Side length `L0`.
    pub size: f64,
    /// Lower-left corner `x0`.
    pub x0: f64,
    /// Lower-left corner `y0`.
    pub y0: f64,
}

impl Extent {
    /// Whether `(x, y)` lies inside the closed domain square.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x0 + self.size && y >= self.y0 && y <= self.y0 + self.size
    }
}

/// Everything needed to establish a fresh domain.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainSpec {
    /// Domain extent.
    pub extent: Extent,
    /// Uniform initial level (`2^level` cells per side).
    pub level: u8,
    /// Registered fields; `FieldId(n)` is `fields[n]`.
    pub fields: Vec<FieldDef>,
}

/// One field and its tolerance in a wavelet adaptation request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaptCriterion {
    /// Field whose detail coefficients are inspected.
    pub field: FieldId,
    /// Error tolerance; details above it trigger refinement.
    pub tolerance: f64,
}

/// Cell counts changed by one adaptation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdaptStats {
    /// Cells split into four children.
    pub refined: usize,
    /// Sibling groups merged into their parent.
    pub coarsened: usize,
}

/// A reconstructed interface segment inside one cell, in world coordinates.
///
/// Produced fresh per query; the field changes every step so facets are
/// never cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Facet {
    /// First end point.
    pub p0: Point,
    /// Second end point.
    pub p1: Point,
}

impl Facet {
    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point {
        Point::new(0.5 * (self.p0.x + self.p1.x), 0.5 * (self.p0.y + self.p1.y))
    }
}

/// The numerical engine as seen by the control layer.
///
/// Reductions and mesh operations are synchronous and all-or-nothing: when
/// a call returns, every active cell has been visited or adapted.
pub trait Domain: FieldAccess {
    /// Build a domain at a uniform level with the given fields.
    fn establish(spec: &DomainSpec) -> Result<Self, EngineError>
    where
        Self: Sized;

    /// Domain extent.
    fn extent(&self) -> Extent;

    /// Look up a registered field by name.
    fn field(&self, name: &str) -> Option<FieldId>;

    /// Replace the boundary condition of `field` on `side`.
    fn set_boundary(
        &mut self,
        field: FieldId,
        side: Side,
        bc: BoundaryCondition,
    ) -> Result<(), EngineError>;

    /// Replace the prolongation rule of `field`.
    fn set_prolongation(&mut self, field: FieldId, rule: Prolongation)
        -> Result<(), EngineError>;

    /// Split every cell for which `predicate` holds, repeatedly, until no
    /// cell satisfies it. Returns the number of cells split.
    fn refine(&mut self, predicate: &dyn Fn(&Cell) -> bool) -> Result<usize, EngineError>;

    /// Merge sibling groups whose parent satisfies `predicate`, repeatedly,
    /// until no group qualifies. The predicate sees the parent geometry.
    /// Returns the number of groups merged.
    fn unrefine(&mut self, predicate: &dyn Fn(&Cell) -> bool) -> usize;

    /// Wavelet-driven adaptation of the mesh within `[min_level, max_level]`.
    fn adapt_wavelet(
        &mut self,
        criteria: &[AdaptCriterion],
        max_level: u8,
        min_level: u8,
    ) -> Result<AdaptStats, EngineError>;

    /// Compute the interface curvature of `vof` into `kappa`.
    /// Cells without interface receive zero.
    fn curvature(&mut self, vof: FieldId, kappa: FieldId) -> Result<(), EngineError>;

    /// Piecewise-linear reconstruction of the interface in `cell`.
    ///
    /// Returns `None` when the cell holds no interface or the line does not
    /// cut the cell in exactly two points.
    fn reconstruct(&self, vof: FieldId, cell: &Cell) -> Option<Facet>;

    /// Persist the full field state plus `clock` to `path`.
    fn dump(&self, path: &Path, clock: Clock) -> Result<(), EngineError>;

    /// Replace the state with the snapshot at `path`.
    ///
    /// Returns `Ok(None)` when no snapshot exists at `path`; that is the
    /// normal fresh-start signal, not an error. Fields are matched by name;
    /// boundary conditions and prolongation rules of already-registered
    /// fields are kept.
    fn restore(&mut self, path: &Path) -> Result<Option<Clock>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Strip {
        cells: Vec<Cell>,
        values: Vec<f64>,
    }

    impl FieldAccess for Strip {
        fn active_cells(&self) -> Vec<Cell> {
            self.cells.clone()
        }
        fn get(&self, _field: FieldId, cell: CellId) -> f64 {
            self.values[cell.0]
        }
        fn set(&mut self, _field: FieldId, cell: CellId, value: f64) {
            self.values[cell.0] = value;
        }
    }

    fn strip(n: usize) -> Strip {
        let cells = (0..n)
            .map(|i| Cell {
                id: CellId(i),
                level: 3,
                x: 0.0625 + 0.125 * i as f64,
                y: 0.0625,
                delta: 0.125,
            })
            .collect();
        Strip {
            cells,
            values: (0..n).map(|i| i as f64).collect(),
        }
    }

    #[test]
    fn default_sum_visits_every_cell() {
        let s = strip(8);
        let total = s.sum(&|c| s.get(FieldId(0), c.id));
        assert_eq!(total, 28.0);
    }

    #[test]
    fn default_max_skips_none_and_respects_init() {
        let s = strip(5);
        let m = s.max(0.0, &|c| (c.x < 0.35).then(|| s.get(FieldId(0), c.id)));
        assert_eq!(m, 2.0);
        assert_eq!(s.max(10.0, &|_| None), 10.0);
    }

    #[test]
    fn facet_midpoint() {
        let facet = Facet {
            p0: Point::new(0.0, 1.0),
            p1: Point::new(2.0, 3.0),
        };
        assert_eq!(facet.midpoint(), Point::new(1.0, 2.0));
    }

    #[test]
    fn extent_contains_is_closed() {
        let e = Extent {
            size: 2.0,
            x0: 0.0,
            y0: 0.0,
        };
        assert!(e.contains(0.0, 2.0));
        assert!(!e.contains(-1e-9, 1.0));
    }
}
