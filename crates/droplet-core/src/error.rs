//! Error types raised by engine backends.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::id::FieldId;

/// Errors from a [`Domain`](crate::Domain) implementation.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// A refine request would exceed the backend's hard depth limit.
    DepthLimit {
        /// The level that could not be created.
        level: u8,
        /// The deepest level the backend supports.
        max: u8,
    },
    /// A field ID does not name a registered field.
    UnknownField {
        /// The offending field.
        field: FieldId,
    },
    /// No field is registered under a required name.
    MissingField {
        /// The name looked up.
        name: String,
    },
    /// The domain specification is unusable (non-finite size, no fields, ...).
    InvalidDomain {
        /// Description of the problem.
        reason: String,
    },
    /// A snapshot could not be written or read back.
    Snapshot {
        /// Path of the snapshot involved.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthLimit { level, max } => {
                write!(f, "refinement to level {level} exceeds depth limit {max}")
            }
            Self::UnknownField { field } => write!(f, "unknown field {field}"),
            Self::MissingField { name } => write!(f, "no field named '{name}'"),
            Self::InvalidDomain { reason } => write!(f, "invalid domain: {reason}"),
            Self::Snapshot { path, reason } => {
                write!(f, "snapshot '{}': {reason}", path.display())
            }
        }
    }
}

impl Error for EngineError {}
