//! Parse failures, usage errors and non-fatal parameter warnings.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ── ConfigError ────────────────────────────────────────────────────

/// A configuration source could not be turned into parameters.
#[derive(Debug)]
pub enum ConfigError {
    /// The parameter file could not be opened or read.
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A known key carries a value that does not parse as its type.
    InvalidValue {
        /// Parameter name.
        key: String,
        /// 1-based line number (file mode) or argument position (legacy mode).
        line: usize,
        /// The offending text.
        value: String,
    },
    /// Legacy mode needs at least six positional arguments.
    MissingArguments {
        /// Number of arguments supplied.
        found: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read parameter file '{}': {source}", path.display())
            }
            Self::InvalidValue { key, line, value } => {
                write!(f, "invalid value '{value}' for '{key}' at line {line}")
            }
            Self::MissingArguments { found } => write!(
                f,
                "insufficient arguments ({found} given); required: \
                 <MAXlevel> <tmax> <We> <Ohd> <Ohs> <Ldomain>, \
                 optional: [drop_x] [drop_y] [impact_velocity]"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── UsageError ─────────────────────────────────────────────────────

/// The command line matches neither the file form nor the legacy form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageError {
    /// Number of arguments supplied (program name excluded).
    pub found: usize,
}

impl UsageError {
    /// Usage text for `program`.
    pub fn usage(program: &str) -> String {
        format!(
            "Usage:\n  {program} <params_file>\n  {program} <MAXlevel> <tmax> <We> <Ohd> <Ohs> <Ldomain> [drop_x] [drop_y] [impact_velocity]\n\nParameter file format: key=value (one per line, # starts a comment)\n"
        )
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected a parameter file or at least 6 positional arguments, got {} argument(s)",
            self.found
        )
    }
}

impl Error for UsageError {}

// ── ParamWarning ───────────────────────────────────────────────────

/// Non-fatal findings reported alongside successfully parsed parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamWarning {
    /// A `key=value` line names no known parameter.
    UnknownKey {
        /// The unrecognised key.
        key: String,
        /// 1-based line number.
        line: usize,
    },
    /// Legacy arguments beyond the ninth were ignored.
    ExtraArguments {
        /// Number of ignored arguments.
        ignored: usize,
    },
    /// The maximum level is high enough to risk exhausting memory.
    HighMaxLevel {
        /// Configured maximum level.
        level: i32,
    },
}

impl fmt::Display for ParamWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey { key, line } => {
                write!(f, "unknown parameter '{key}' at line {line}")
            }
            Self::ExtraArguments { ignored } => {
                write!(f, "{ignored} extra argument(s) ignored")
            }
            Self::HighMaxLevel { level } => {
                write!(f, "very high MAXlevel ({level}) may cause memory issues")
            }
        }
    }
}
