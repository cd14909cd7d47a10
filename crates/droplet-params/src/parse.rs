//! The two configuration front-ends: `key=value` files and positional
//! legacy arguments.
//!
//! Both start from [`SimulationParams::default`] and return the overlaid
//! parameters together with any non-fatal warnings. Neither validates; that
//! is [`validate`](crate::validate)'s job.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConfigError, ParamWarning, UsageError};
use crate::params::SimulationParams;

/// Number of mandatory legacy arguments.
pub const LEGACY_REQUIRED: usize = 6;
/// Number of legacy arguments that carry meaning.
pub const LEGACY_MAX: usize = 9;

/// Parameters plus the warnings produced while parsing them.
pub type Parsed = (SimulationParams, Vec<ParamWarning>);

// ── Source selection ───────────────────────────────────────────────

/// Where a run's configuration comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamSource {
    /// A `key=value` parameter file.
    File(PathBuf),
    /// Positional arguments `MAXlevel tmax We Ohd Ohs Ldomain [drop_x]
    /// [drop_y] [impact_velocity]`.
    Legacy(Vec<String>),
}

impl ParamSource {
    /// Select the mode from command-line arguments (program name excluded).
    ///
    /// A single argument naming an existing file selects file mode; six or
    /// more arguments select legacy mode. Anything else is a usage error.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, UsageError> {
        if let [only] = args {
            let path = Path::new(only.as_ref());
            if path.exists() {
                return Ok(Self::File(path.to_path_buf()));
            }
        }
        if args.len() >= LEGACY_REQUIRED {
            return Ok(Self::Legacy(
                args.iter().map(|a| a.as_ref().to_string()).collect(),
            ));
        }
        Err(UsageError { found: args.len() })
    }

    /// Run the matching parser.
    pub fn parse(&self) -> Result<Parsed, ConfigError> {
        match self {
            Self::File(path) => parse_from_file(path),
            Self::Legacy(tokens) => parse_from_legacy_args(tokens),
        }
    }
}

// ── File mode ──────────────────────────────────────────────────────

/// Parse a `key=value` parameter file.
pub fn parse_from_file(path: &Path) -> Result<Parsed, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_from_str(&text)
}

/// Parse `key=value` text.
///
/// `#` starts a comment anywhere on a line. Blank lines and lines without
/// `=` are skipped. Unknown keys become [`ParamWarning::UnknownKey`]; a
/// value that does not parse as its key's type is a hard error.
pub fn parse_from_str(text: &str) -> Result<Parsed, ConfigError> {
    let mut params = SimulationParams::default();
    let mut warnings = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let Some((key, value)) = content.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if !assign(&mut params, key, value, line)? {
            warnings.push(ParamWarning::UnknownKey {
                key: key.to_string(),
                line,
            });
        }
    }

    Ok((params, warnings))
}

/// Set `key` to `value`. Returns `Ok(false)` for an unknown key.
fn assign(
    p: &mut SimulationParams,
    key: &str,
    value: &str,
    line: usize,
) -> Result<bool, ConfigError> {
    match key {
        "CaseNo" => p.case_no = parse_value(key, value, line)?,
        "We" => p.we = parse_value(key, value, line)?,
        "Ohd" => p.ohd = parse_value(key, value, line)?,
        "Ohs" => p.ohs = parse_value(key, value, line)?,
        "rho_ratio" => p.rho_ratio = parse_value(key, value, line)?,
        "Ldomain" => p.ldomain = parse_value(key, value, line)?,
        "drop_x" => p.drop_x = parse_value(key, value, line)?,
        "drop_y" => p.drop_y = parse_value(key, value, line)?,
        "drop_radius" => p.drop_radius = parse_value(key, value, line)?,
        "impact_velocity" => p.impact_velocity = parse_value(key, value, line)?,
        "MAXlevel" => p.max_level = parse_value(key, value, line)?,
        "MINlevel" => p.min_level = parse_value(key, value, line)?,
        "init_grid_level" => p.init_grid_level = parse_value(key, value, line)?,
        "fErr" => p.f_err = parse_value(key, value, line)?,
        "KErr" => p.k_err = parse_value(key, value, line)?,
        "VelErr" => p.vel_err = parse_value(key, value, line)?,
        "tmax" => p.tmax = parse_value(key, value, line)?,
        "tsnap" => p.tsnap = parse_value(key, value, line)?,
        "output_dir" => {
            if value.is_empty() {
                return Err(invalid(key, value, line));
            }
            p.output_dir = PathBuf::from(value);
        }
        "log_interval" => p.log_interval = parse_value(key, value, line)?,
        "outflow_x_frac" => p.outflow_x_frac = parse_value(key, value, line)?,
        "outflow_y_max" => p.outflow_y_max = parse_value(key, value, line)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_value<T: FromStr>(key: &str, value: &str, line: usize) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value, line))
}

fn invalid(key: &str, value: &str, line: usize) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        line,
        value: value.to_string(),
    }
}

// ── Legacy mode ────────────────────────────────────────────────────

/// Parse positional arguments `MAXlevel tmax We Ohd Ohs Ldomain [drop_x]
/// [drop_y] [impact_velocity]` (program name excluded).
///
/// Only these nine axes are reachable; every other parameter keeps its
/// default, exactly as a parameter file that omits it would. For
/// [`ConfigError::InvalidValue`] the `line` field holds the 1-based
/// argument position.
pub fn parse_from_legacy_args<S: AsRef<str>>(tokens: &[S]) -> Result<Parsed, ConfigError> {
    if tokens.len() < LEGACY_REQUIRED {
        return Err(ConfigError::MissingArguments {
            found: tokens.len(),
        });
    }

    const KEYS: [&str; LEGACY_MAX] = [
        "MAXlevel",
        "tmax",
        "We",
        "Ohd",
        "Ohs",
        "Ldomain",
        "drop_x",
        "drop_y",
        "impact_velocity",
    ];

    let mut params = SimulationParams::default();
    for (idx, (key, token)) in KEYS.iter().zip(tokens).enumerate() {
        assign(&mut params, key, token.as_ref().trim(), idx + 1)?;
    }

    let mut warnings = Vec::new();
    if tokens.len() > LEGACY_MAX {
        warnings.push(ParamWarning::ExtraArguments {
            ignored: tokens.len() - LEGACY_MAX,
        });
    }
    Ok((params, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_blanks_and_whitespace() {
        let text = "\
# leading comment
We = 25   # trailing comment

  Ohd=0.01
not a pair
output_dir =  run_a
";
        let (p, warnings) = parse_from_str(text).unwrap();
        assert_eq!(p.we, 25.0);
        assert_eq!(p.ohd, 0.01);
        assert_eq!(p.output_dir, PathBuf::from("run_a"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_key_is_a_warning_with_line() {
        let (p, warnings) = parse_from_str("We=12\nBond=0.3\n").unwrap();
        assert_eq!(p.we, 12.0);
        assert_eq!(
            warnings,
            vec![ParamWarning::UnknownKey {
                key: "Bond".into(),
                line: 2
            }]
        );
    }

    #[test]
    fn malformed_value_is_an_error() {
        let err = parse_from_str("MAXlevel=10\nWe=fast\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { key, line, value } => {
                assert_eq!(key, "We");
                assert_eq!(line, 2);
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn comment_hides_equals_sign() {
        let (p, _) = parse_from_str("# We=99\n").unwrap();
        assert_eq!(p.we, SimulationParams::default().we);
    }

    #[test]
    fn legacy_requires_six_arguments() {
        let err = parse_from_legacy_args(&["10", "4.0", "10"]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingArguments { found: 3 }));
    }

    #[test]
    fn legacy_optional_arguments_and_extras() {
        let args = [
            "11", "2.5", "20", "0.01", "1e-4", "6", "1.2", "0.8", "-2", "extra",
        ];
        let (p, warnings) = parse_from_legacy_args(&args).unwrap();
        assert_eq!(p.max_level, 11);
        assert_eq!(p.tmax, 2.5);
        assert_eq!(p.ldomain, 6.0);
        assert_eq!(p.drop_x, 1.2);
        assert_eq!(p.drop_y, 0.8);
        assert_eq!(p.impact_velocity, -2.0);
        assert_eq!(warnings, vec![ParamWarning::ExtraArguments { ignored: 1 }]);
    }

    #[test]
    fn legacy_bad_token_reports_position() {
        let err = parse_from_legacy_args(&["10", "4", "x", "1", "1", "8"]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, line: 3, .. } if key == "We"
        ));
    }

    #[test]
    fn source_selection() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("case.params");
        fs::write(&file, "We=5\n").unwrap();
        let file_arg = file.to_string_lossy().into_owned();

        assert_eq!(
            ParamSource::from_args(&[file_arg.as_str()]).unwrap(),
            ParamSource::File(file.clone())
        );
        assert!(matches!(
            ParamSource::from_args(&["10", "4", "10", "5e-3", "1e-5", "8"]).unwrap(),
            ParamSource::Legacy(ref t) if t.len() == 6
        ));
        assert_eq!(
            ParamSource::from_args(&["no-such-file.params"]).unwrap_err(),
            UsageError { found: 1 }
        );
        let none: [&str; 0] = [];
        assert_eq!(
            ParamSource::from_args(&none).unwrap_err(),
            UsageError { found: 0 }
        );
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_from_file(&dir.path().join("absent.params")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
