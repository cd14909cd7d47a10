//! Reference engine backend for Droplet: an adaptive quadtree.
//!
//! [`QuadGrid`] implements the [`Domain`] contract from `droplet-core` on a
//! square, axisymmetric domain. It is deliberately simple: cell-centred
//! values, no 2:1 balance, ghost values for boundary conditions and a
//! sampling rule that works across levels. It is fast enough for the
//! control layer's end-to-end runs and the offline extraction tools.
//!
//! # Adaptation
//!
//! - [`Domain::refine`] and [`Domain::unrefine`] iterate to a fixed point.
//! - [`Domain::adapt_wavelet`] makes one pass driven by second-difference
//!   details of the listed fields.
//! - Fraction fields are split with PLIC so that refinement conserves
//!   volume and keeps a planar interface in place.
//!
//! # Persistence
//!
//! [`Domain::dump`] and [`Domain::restore`] use the `droplet-snapshot`
//! format. Leaves are stored in canonical order, so restoring a snapshot
//! and dumping it again reproduces the file byte for byte.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod adapt;
mod interface;
mod persist;
mod quadtree;

use std::path::Path;

use droplet_core::{
    AdaptCriterion, AdaptStats, BoundaryCondition, Cell, Clock, Domain, DomainSpec, EngineError,
    Extent, Facet, FieldId, Prolongation, Side,
};

pub use quadtree::QuadGrid;

impl QuadGrid {
    fn def_mut(&mut self, field: FieldId) -> Result<&mut droplet_core::FieldDef, EngineError> {
        let idx = self.field_index(field)?;
        self.fields
            .get_index_mut(idx)
            .map(|(_, def)| def)
            .ok_or(EngineError::UnknownField { field })
    }
}

impl Domain for QuadGrid {
    fn establish(spec: &DomainSpec) -> Result<Self, EngineError> {
        QuadGrid::new(spec)
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn field(&self, name: &str) -> Option<FieldId> {
        self.fields
            .get_index_of(name)
            .and_then(|idx| u32::try_from(idx).ok())
            .map(FieldId)
    }

    fn set_boundary(
        &mut self,
        field: FieldId,
        side: Side,
        bc: BoundaryCondition,
    ) -> Result<(), EngineError> {
        let def = self.def_mut(field)?;
        let updated = def.clone().with_boundary(side, bc);
        updated
            .validate()
            .map_err(|reason| EngineError::InvalidDomain { reason })?;
        *def = updated;
        Ok(())
    }

    fn set_prolongation(
        &mut self,
        field: FieldId,
        rule: Prolongation,
    ) -> Result<(), EngineError> {
        self.def_mut(field)?.prolongation = rule;
        Ok(())
    }

    fn refine(&mut self, predicate: &dyn Fn(&Cell) -> bool) -> Result<usize, EngineError> {
        self.refine_where(predicate)
    }

    fn unrefine(&mut self, predicate: &dyn Fn(&Cell) -> bool) -> usize {
        self.unrefine_where(predicate)
    }

    fn adapt_wavelet(
        &mut self,
        criteria: &[AdaptCriterion],
        max_level: u8,
        min_level: u8,
    ) -> Result<AdaptStats, EngineError> {
        self.adapt(criteria, max_level, min_level)
    }

    fn curvature(&mut self, vof: FieldId, kappa: FieldId) -> Result<(), EngineError> {
        self.compute_curvature(vof, kappa)
    }

    fn reconstruct(&self, vof: FieldId, cell: &Cell) -> Option<Facet> {
        self.facet(vof, cell)
    }

    fn dump(&self, path: &Path, clock: Clock) -> Result<(), EngineError> {
        self.dump_to(path, clock)
    }

    fn restore(&mut self, path: &Path) -> Result<Option<Clock>, EngineError> {
        self.restore_from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use droplet_core::FlowFields;

    fn grid() -> QuadGrid {
        QuadGrid::establish(&DomainSpec {
            extent: Extent {
                size: 2.0,
                x0: 0.0,
                y0: 0.0,
            },
            level: 2,
            fields: FlowFields::definitions(),
        })
        .unwrap()
    }

    #[test]
    fn fields_resolve_by_name() {
        let g = grid();
        assert_eq!(g.field("f"), Some(FlowFields::STANDARD.f));
        assert_eq!(g.field("kappa"), Some(FlowFields::STANDARD.kappa));
        assert_eq!(g.field("p"), None);
    }

    #[test]
    fn boundary_and_prolongation_updates() {
        let mut g = grid();
        let ux = FlowFields::STANDARD.ux;
        g.set_boundary(ux, Side::Top, BoundaryCondition::Dirichlet(1.0))
            .unwrap();
        assert_eq!(
            g.field_defs().nth(1).unwrap().boundary_on(Side::Top),
            BoundaryCondition::Dirichlet(1.0)
        );
        assert!(g
            .set_boundary(ux, Side::Top, BoundaryCondition::Dirichlet(f64::INFINITY))
            .is_err());
        g.set_prolongation(ux, Prolongation::Fraction).unwrap();
        assert_eq!(
            g.field_defs().nth(1).unwrap().prolongation,
            Prolongation::Fraction
        );
        assert!(matches!(
            g.set_prolongation(FieldId(42), Prolongation::Injection),
            Err(EngineError::UnknownField { .. })
        ));
    }
}
