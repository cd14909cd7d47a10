//! Field definitions, boundary conditions and the standard flow-field layout.

use crate::id::{FieldId, Side};

/// How a field is filled into the children of a refined cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prolongation {
    /// Children inherit the parent value.
    Injection,
    /// Children receive the volume fraction cut from the parent's
    /// piecewise-linear interface, so the parent's fluid volume is
    /// conserved exactly and the interface position is preserved.
    Fraction,
}

/// Boundary condition applied through ghost values on one side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryCondition {
    /// Fixed value on the boundary face: `ghost = 2 * value - interior`.
    Dirichlet(f64),
    /// Zero normal gradient: `ghost = interior`.
    Neumann,
}

impl BoundaryCondition {
    /// Ghost value mirrored from `interior` across the boundary face.
    pub fn ghost(self, interior: f64) -> f64 {
        match self {
            Self::Dirichlet(value) => 2.0 * value - interior,
            Self::Neumann => interior,
        }
    }
}

/// Definition of a field registered with a domain.
///
/// `FieldId(n)` corresponds to the n-th definition passed to
/// [`DomainSpec`](crate::DomainSpec).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    /// Name used in snapshots and for lookup (e.g. `"u.x"`).
    pub name: String,
    /// Refinement rule.
    pub prolongation: Prolongation,
    /// Boundary condition per side, indexed by [`Side::index`].
    pub boundary: [BoundaryCondition; 4],
}

impl FieldDef {
    /// A field with injection prolongation and zero-Neumann boundaries.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prolongation: Prolongation::Injection,
            boundary: [BoundaryCondition::Neumann; 4],
        }
    }

    /// Builder-style prolongation override.
    pub fn with_prolongation(mut self, prolongation: Prolongation) -> Self {
        self.prolongation = prolongation;
        self
    }

    /// Builder-style boundary override for one side.
    pub fn with_boundary(mut self, side: Side, bc: BoundaryCondition) -> Self {
        self.boundary[side.index()] = bc;
        self
    }

    /// The boundary condition on `side`.
    pub fn boundary_on(&self, side: Side) -> BoundaryCondition {
        self.boundary[side.index()]
    }

    /// Structural validation: the name must be non-empty and every
    /// Dirichlet value finite.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("field name must not be empty".to_string());
        }
        for side in Side::ALL {
            if let BoundaryCondition::Dirichlet(v) = self.boundary_on(side) {
                if !v.is_finite() {
                    return Err(format!(
                        "field '{}': non-finite Dirichlet value {v} on {side:?}",
                        self.name
                    ));
                }
            }
        }
        Ok(())
    }
}

/// The field layout of a two-phase axisymmetric run.
///
/// `f` is the volume fraction (1 inside the drop), `ux`/`uy` the velocity
/// components and `kappa` the interface curvature recomputed each step by
/// the refinement policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowFields {
    /// Volume fraction.
    pub f: FieldId,
    /// Velocity along `x`.
    pub ux: FieldId,
    /// Velocity along `y`.
    pub uy: FieldId,
    /// Interface curvature.
    pub kappa: FieldId,
}

impl FlowFields {
    /// Volume fraction field name.
    pub const VOF: &'static str = "f";
    /// `x` velocity field name.
    pub const UX: &'static str = "u.x";
    /// `y` velocity field name.
    pub const UY: &'static str = "u.y";
    /// Curvature field name.
    pub const KAPPA: &'static str = "kappa";

    /// IDs matching the order of [`FlowFields::definitions`].
    pub const STANDARD: FlowFields = FlowFields {
        f: FieldId(0),
        ux: FieldId(1),
        uy: FieldId(2),
        kappa: FieldId(3),
    };

    /// Field definitions with the boundary conditions of the drop-impact
    /// setup:
    ///
    /// - substrate (left): no tangential velocity, no liquid in the ghost
    ///   layer;
    /// - right and top: zero-gradient outflow for the normal velocity;
    /// - symmetry axis (bottom) and everything else: zero Neumann.
    pub fn definitions() -> Vec<FieldDef> {
        vec![
            FieldDef::scalar(Self::VOF)
                .with_prolongation(Prolongation::Fraction)
                .with_boundary(Side::Left, BoundaryCondition::Dirichlet(0.0)),
            FieldDef::scalar(Self::UX)
                .with_boundary(Side::Right, BoundaryCondition::Neumann),
            FieldDef::scalar(Self::UY)
                .with_boundary(Side::Left, BoundaryCondition::Dirichlet(0.0))
                .with_boundary(Side::Top, BoundaryCondition::Neumann),
            FieldDef::scalar(Self::KAPPA),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirichlet_ghost_mirrors_about_value() {
        assert_eq!(BoundaryCondition::Dirichlet(0.0).ghost(0.25), -0.25);
        assert_eq!(BoundaryCondition::Dirichlet(1.0).ghost(0.5), 1.5);
        assert_eq!(BoundaryCondition::Neumann.ghost(0.7), 0.7);
    }

    #[test]
    fn standard_ids_match_definition_order() {
        let defs = FlowFields::definitions();
        let ids = FlowFields::STANDARD;
        assert_eq!(defs[ids.f.0 as usize].name, FlowFields::VOF);
        assert_eq!(defs[ids.ux.0 as usize].name, FlowFields::UX);
        assert_eq!(defs[ids.uy.0 as usize].name, FlowFields::UY);
        assert_eq!(defs[ids.kappa.0 as usize].name, FlowFields::KAPPA);
    }

    #[test]
    fn vof_uses_fraction_prolongation_and_dry_substrate() {
        let vof = &FlowFields::definitions()[0];
        assert_eq!(vof.prolongation, Prolongation::Fraction);
        assert_eq!(
            vof.boundary_on(Side::Left),
            BoundaryCondition::Dirichlet(0.0)
        );
        assert_eq!(vof.boundary_on(Side::Bottom), BoundaryCondition::Neumann);
    }

    #[test]
    fn validate_rejects_empty_name_and_nan_dirichlet() {
        assert!(FieldDef::scalar(" ").validate().is_err());
        let bad = FieldDef::scalar("p").with_boundary(Side::Top, BoundaryCondition::Dirichlet(f64::NAN));
        assert!(bad.validate().is_err());
        assert!(FieldDef::scalar("p").validate().is_ok());
    }
}
