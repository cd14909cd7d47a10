//! Strongly-typed identifiers and the simulation [`Clock`].

use std::fmt;

/// Identifies a field registered with a domain.
///
/// Fields are registered when the domain is established and assigned
/// sequential IDs. `FieldId(n)` corresponds to the n-th field definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Slot of an active cell in the current mesh.
///
/// A `CellId` is only meaningful until the next mesh change: refine,
/// unrefine, adaptation and restore all renumber the active cells.
/// Callers must re-enumerate with
/// [`FieldAccess::active_cells`](crate::FieldAccess::active_cells)
/// after any of those operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four sides of the square computational domain.
///
/// `Left` is the substrate plane `x = x0`, `Bottom` the symmetry axis
/// `y = y0`; `Right` and `Top` are the far-field outflow boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// `x = x0`.
    Left,
    /// `x = x0 + L`.
    Right,
    /// `y = y0`.
    Bottom,
    /// `y = y0 + L`.
    Top,
}

impl Side {
    /// All four sides in storage order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Bottom, Side::Top];

    /// Storage index of the side (`0..4`).
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Top => 3,
        }
    }
}

/// Scheduler position: simulation time and iteration count.
///
/// Persisted with every snapshot so that a restored run continues from the
/// exact point at which the checkpoint was written.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    /// Simulation time.
    pub time: f64,
    /// Number of completed solver steps.
    pub iteration: u64,
}

impl Clock {
    /// Clock at `t = 0`, iteration 0.
    pub fn start() -> Self {
        Self::default()
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i={} t={}", self.iteration, self.time)
    }
}
