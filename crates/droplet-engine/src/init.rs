//! Initial conditions: the refinement predicate around the drop and the
//! drop's volume fraction and velocity.
//!
//! Everything here is a pure function of the parameters and the narrow
//! [`FieldAccess`] capability, so it runs unchanged on a synthetic cell
//! list.

use droplet_core::{level_set_fraction, Cell, FieldAccess, FlowFields, Point};
use droplet_params::SimulationParams;

/// The initial refinement reaches `REFINE_MARGIN * radius` from the centre.
pub const REFINE_MARGIN: f64 = 1.05;

/// Geometry and velocity of the initial drop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropSetup {
    /// Drop centre.
    pub centre: Point,
    /// Drop radius.
    pub radius: f64,
    /// Initial `u.x` inside the drop.
    pub impact_velocity: f64,
    /// Refinement stops at this level.
    pub max_level: u8,
}

impl DropSetup {
    /// The drop described by `p`, refined up to `max_level`.
    pub fn new(p: &SimulationParams, max_level: u8) -> Self {
        Self {
            centre: Point::new(p.drop_x, p.drop_y),
            radius: p.drop_radius,
            impact_velocity: p.impact_velocity,
            max_level,
        }
    }

    /// Whether `cell` should be split during initial refinement: its centre
    /// lies within the margin around the drop and it is below the maximum
    /// level.
    pub fn needs_refinement(&self, cell: &Cell) -> bool {
        let reach = REFINE_MARGIN * self.radius;
        cell.level < self.max_level
            && Point::new(cell.x, cell.y).distance_sq(self.centre) < reach * reach
    }

    /// Level-set function, positive inside the drop.
    pub fn level_set(&self, x: f64, y: f64) -> f64 {
        self.radius * self.radius - Point::new(x, y).distance_sq(self.centre)
    }
}

/// Set `f` to the drop's volume fraction, `u.x = impact_velocity * f` and
/// `u.y = 0` in every active cell.
pub fn initialize_drop<A: FieldAccess + ?Sized>(
    access: &mut A,
    fields: FlowFields,
    drop: &DropSetup,
) {
    for cell in access.active_cells() {
        let f = level_set_fraction(|x, y| drop.level_set(x, y), cell.x, cell.y, cell.delta);
        access.set(fields.f, cell.id, f);
        access.set(fields.ux, cell.id, drop.impact_velocity * f);
        access.set(fields.uy, cell.id, 0.0);
    }
}
