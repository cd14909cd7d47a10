//! Core types and traits for the Droplet simulation workspace.
//!
//! This is the leaf crate every other Droplet crate builds on. It defines
//! the contract between the control layer and the numerical engine:
//! identifiers, field descriptors, the [`FieldAccess`] capability, the full
//! [`Domain`] engine trait, and the pure geometry helpers (PLIC
//! reconstruction, level-set volume fractions, compensated reductions)
//! shared by the engine backend and the offline tools.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod geometry;
pub mod id;
pub mod numfmt;
pub mod plic;
pub mod reduce;
pub mod traits;

pub use error::EngineError;
pub use field::{BoundaryCondition, FieldDef, FlowFields, Prolongation};
pub use geometry::{level_set_fraction, Point};
pub use id::{CellId, Clock, FieldId, Side};
pub use numfmt::fmt_g;
pub use reduce::{compensated_sum, NeumaierSum};
pub use traits::{
    AdaptCriterion, AdaptStats, Cell, Domain, DomainSpec, Extent, Facet, FieldAccess,
};
