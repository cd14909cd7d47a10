//! Extraction error type.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use droplet_core::EngineError;

/// Errors from loading snapshots and extracting interface data.
#[derive(Debug)]
pub enum ExtractError {
    /// No snapshot exists at the given path.
    NotFound {
        /// Snapshot path.
        path: PathBuf,
    },
    /// The engine could not restore or configure the snapshot.
    Load {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying engine failure.
        source: EngineError,
    },
    /// The footprint cutoff must be a positive finite number.
    InvalidCutoff {
        /// The rejected cutoff.
        value: f64,
    },
    /// The worker pool could not be built.
    Pool {
        /// Description of the failure.
        reason: String,
    },
    /// Writing output failed.
    Io(io::Error),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "snapshot '{}' not found", path.display()),
            Self::Load { path, source } => {
                write!(f, "cannot load snapshot '{}': {source}", path.display())
            }
            Self::InvalidCutoff { value } => {
                write!(f, "xCutoff must be positive, got {value}")
            }
            Self::Pool { reason } => write!(f, "cannot start worker pool: {reason}"),
            Self::Io(e) => write!(f, "output failed: {e}"),
        }
    }
}

impl Error for ExtractError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExtractError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
