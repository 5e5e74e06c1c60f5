//! printf-style numeric formatting for caption format strings.
//!
//! Format strings such as `"%.3f"`, `"%8.2e"` or `"M=%+.1f"` are stored in the
//! display configuration by key. Only the first conversion consumes the value;
//! text around it is kept verbatim.
//!
//! Unlike C `printf`, a negative value that rounds to zero prints without a
//! sign: `format_value("%.3f", -0.0001)` gives `"0.000"`, not `"-0.000"`.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Conversion pattern: flags, width, precision and conversion character.
const CONVERSION: &str = r"%([-+ 0]*)(\d+)?(?:\.(\d+))?([dfFeEgG%])";

/// Compiled [`CONVERSION`]; `None` only if the pattern failed to compile.
fn conversion() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(CONVERSION) {
            Ok(regex) => Some(regex),
            Err(err) => {
                log::warn!("format conversions disabled: {err}");
                None
            }
        })
        .as_ref()
}

/// Return `true` when `spec` contains a conversion that consumes a value.
#[must_use]
pub fn has_conversion(spec: &str) -> bool {
    conversion().is_some_and(|regex| regex.captures_iter(spec).any(|caps| &caps[4] != "%"))
}

/// Format `value` according to the printf-style `spec`.
///
/// # Examples
/// ```
/// use framex::format_value;
///
/// assert_eq!(format_value("%.3f", -5.0), "-5.000");
/// assert_eq!(format_value("N=%+.1f kN", 2.26), "N=+2.3 kN");
/// assert_eq!(format_value("%.2e", 1234.5), "1.23e+03");
/// ```
#[must_use]
pub fn format_value(spec: &str, value: f64) -> String {
    let Some(regex) = conversion() else {
        return spec.to_string();
    };
    let mut consumed = false;
    regex
        .replace_all(spec, |caps: &Captures<'_>| {
            if &caps[4] == "%" {
                return "%".to_string();
            }
            if consumed {
                return caps[0].to_string();
            }
            consumed = true;
            convert(caps, value)
        })
        .into_owned()
}

/// Render one matched conversion.
fn convert(caps: &Captures<'_>, value: f64) -> String {
    let flags = caps.get(1).map_or("", |m| m.as_str());
    let width = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .unwrap_or(0);
    let precision = caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok());
    let body = match &caps[4] {
        "d" => format!("{}", value.round().abs()),
        "f" | "F" => format!("{:.*}", precision.unwrap_or(6), value.abs()),
        "e" => exponential(value.abs(), precision.unwrap_or(6)),
        "E" => exponential(value.abs(), precision.unwrap_or(6)).to_uppercase(),
        "g" => general(value.abs(), precision.unwrap_or(6)),
        _ => general(value.abs(), precision.unwrap_or(6)).to_uppercase(),
    };
    let negative = value.is_sign_negative() && body.bytes().any(|b| (b'1'..=b'9').contains(&b));
    let sign = if negative {
        "-"
    } else if flags.contains('+') {
        "+"
    } else if flags.contains(' ') {
        " "
    } else {
        ""
    };
    pad(sign, &body, width, flags)
}

/// Apply width and the `-` and `0` flags.
fn pad(sign: &str, body: &str, width: usize, flags: &str) -> String {
    let len = sign.len() + body.chars().count();
    if len >= width {
        return format!("{sign}{body}");
    }
    let fill = width - len;
    if flags.contains('-') {
        format!("{sign}{body}{}", " ".repeat(fill))
    } else if flags.contains('0') {
        format!("{sign}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{sign}{body}", " ".repeat(fill))
    }
}

/// C-style exponent: at least two exponent digits and an explicit sign.
fn exponential(value: f64, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => raw,
    }
}

/// `%g`: the shorter of fixed and exponential, trailing zeros removed.
fn general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.log10().floor() as i32;
    if exponent < -4 || exponent >= precision as i32 {
        let formatted = exponential(value, precision - 1);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", strip_zeros(mantissa)),
            None => formatted,
        }
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_matches_c_output() {
        assert_eq!(format_value("%.3f", 1.0), "1.000");
        assert_eq!(format_value("%.1f", 12.34), "12.3");
        assert_eq!(format_value("%f", 0.5), "0.500000");
        assert_eq!(format_value("%8.2f", -3.14159), "   -3.14");
        assert_eq!(format_value("%-7.1f|", 2.0), "2.0    |");
        assert_eq!(format_value("%07.2f", -1.5), "-001.50");
    }

    #[test]
    fn negative_zero_prints_without_sign() {
        assert_eq!(format_value("%.3f", -0.0001), "0.000");
    }

    #[test]
    fn exponent_and_general_forms() {
        assert_eq!(format_value("%.3e", 0.00012346), "1.235e-04");
        assert_eq!(format_value("%.1E", 25000.0), "2.5E+04");
        assert_eq!(format_value("%g", 0.00025), "0.00025");
        assert_eq!(format_value("%g", 1234567.0), "1.23457e+06");
        assert_eq!(format_value("%.3g", 2.5), "2.5");
    }

    #[test]
    fn negative_values_rounding_to_zero_lose_the_sign() {
        assert_eq!(format_value("%.3f", -0.0001), "0.000");
        assert_eq!(format_value("%+.3f", -0.0001), "+0.000");
        assert_eq!(format_value("%.3f", -0.001), "-0.001");
    }

    #[test]
    fn integer_conversion_rounds() {
        assert_eq!(format_value("%d", 41.6), "42");
        assert_eq!(format_value("%+d", 3.0), "+3");
    }

    #[test]
    fn surrounding_text_and_literal_percent_are_kept() {
        assert_eq!(format_value("%.0f%%", 87.4), "87%");
        assert_eq!(format_value("%.1f / %.1f", 1.0), "1.0 / %.1f");
        assert!(has_conversion("Q=%.2f"));
        assert!(!has_conversion("100%%"));
    }
}
