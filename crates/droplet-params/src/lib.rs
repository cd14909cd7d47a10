//! Typed configuration for Droplet drop-impact simulations.
//!
//! Parameters start from compiled defaults, are overlaid by exactly one
//! front-end ([`parse_from_file`]/[`parse_from_str`] or
//! [`parse_from_legacy_args`], selected by [`ParamSource::from_args`]),
//! checked by [`validate`] and finally frozen into a [`ScheduleSpec`].
//! Nothing here touches the numerical engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod params;
pub mod parse;
pub mod schedule;
pub mod summary;
pub mod validate;

pub use error::{ConfigError, ParamWarning, UsageError};
pub use params::{MaterialProperties, SimulationParams};
pub use parse::{parse_from_file, parse_from_legacy_args, parse_from_str, ParamSource, Parsed};
pub use schedule::ScheduleSpec;
pub use summary::render_summary;
pub use validate::{advisories, validate, Violation};
