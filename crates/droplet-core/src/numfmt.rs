//! Shortest-general number formatting.
//!
//! Log rows, parameter summaries and footprint output use the general
//! notation familiar from post-processing scripts: six significant digits,
//! fixed notation for moderate exponents, scientific otherwise, trailing
//! zeros removed.

const PRECISION: i32 = 6;

/// Format `v` in general notation with six significant digits.
///
/// ```
/// use droplet_core::fmt_g;
/// assert_eq!(fmt_g(0.5), "0.5");
/// assert_eq!(fmt_g(1234567.0), "1.23457e+06");
/// assert_eq!(fmt_g(1e-5), "1e-05");
/// assert_eq!(fmt_g(100.0), "100");
/// ```
pub fn fmt_g(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to six digits decides the exponent (9.999995 -> 1e+01).
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..PRECISION).contains(&exp) {
        let decimals = (PRECISION - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{v:.decimals$}")).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_zeros(mantissa), exp.abs())
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
