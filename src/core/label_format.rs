/// Signature of a numeric label formatter.
pub type LabelFormatter = fn(f64) -> String;

/// Multiplication dot placed between mantissa and power of ten.
const CDOT: char = '\u{00B7}';

const PLAIN_UPPER: f64 = 1e5;
const PLAIN_LOWER: f64 = 1e-5;
const UNIT_MANTISSA_EPSILON: f64 = 1e-5;

/// Default gridline label formatter.
///
/// Values strictly between `1e-5` and `1e5` in magnitude are printed in plain
/// decimal form; everything else uses `mantissa·10ⁿ` with superscript digits.
#[must_use]
pub fn format_label(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    if magnitude < PLAIN_UPPER && magnitude > PLAIN_LOWER {
        return beautify_float(value, 12);
    }

    let exponent = magnitude.log10().floor() as i32;
    let mantissa = value / 10f64.powi(exponent);

    let mut out = String::new();
    if (mantissa - 1.0).abs() >= UNIT_MANTISSA_EPSILON {
        out.push_str(&beautify_float(mantissa, 8));
        out.push(CDOT);
    }
    out.push_str("10");
    out.push_str(&superscript_integer(i64::from(exponent)));
    out
}

/// Fixed-precision formatting with trailing zeros (and a dangling point) removed.
#[must_use]
pub fn beautify_float(value: f64, precision: usize) -> String {
    let fixed = format!("{value:.precision$}");
    if !fixed.contains('.') {
        return fixed;
    }
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Writes an integer with Unicode superscript characters, e.g. `-12` as `⁻¹²`.
#[must_use]
pub fn superscript_integer(value: i64) -> String {
    value
        .to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207B}',
            '0' => '\u{2070}',
            '1' => '\u{00B9}',
            '2' => '\u{00B2}',
            '3' => '\u{00B3}',
            '4' => '\u{2074}',
            '5' => '\u{2075}',
            '6' => '\u{2076}',
            '7' => '\u{2077}',
            '8' => '\u{2078}',
            _ => '\u{2079}',
        })
        .collect()
}
