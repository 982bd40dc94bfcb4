//! CSS Values & Units Level 3: §4 Numbers
//! Spec: <https://www.w3.org/TR/css-values-3/#numeric-types>

/// A CSS <number> as written in the source, with its parsed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Number<'src> {
    /// Source text of the number, sign included.
    pub raw: &'src str,
    /// Parsed value.
    pub value: f64,
}

/// Length of the longest prefix of `text` that is a plain decimal number:
/// an optional sign, then digits with an optional fraction, or a bare fraction (`.5`).
///
/// Exponents are not part of the accepted grammar. Returns `None` when `text` does not start
/// with a number.
fn number_prefix_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut idx = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }
    let int_start = idx;
    while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
        idx += 1;
    }
    let has_int = idx > int_start;
    if bytes.get(idx) == Some(&b'.') && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit) {
        idx += 1;
        while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
            idx += 1;
        }
        return Some(idx);
    }
    has_int.then_some(idx)
}

/// Parse `text` as a plain decimal number (§4.2 subset). The whole text must match.
///
/// Values that overflow to infinity are rejected.
pub fn parse_number(text: &str) -> Option<Number<'_>> {
    if number_prefix_len(text)? != text.len() {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    value.is_finite().then_some(Number { raw: text, value })
}

/// Fraction digits needed to write any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Round `value` to `precision` decimal places by fixed-point formatting and re-parsing,
/// which also drops trailing zeros (`1.20` becomes `1.2`).
///
/// Values exactly halfway between two candidates round away from zero (`2.5` to `3`,
/// `-0.125` to `-0.13` at two places). Everything else rounds to the nearest candidate.
pub fn round_to_precision(value: f64, precision: u8) -> f64 {
    let places = usize::from(precision);
    let fixed = round_exact_tie(value, places)
        .unwrap_or_else(|| format!("{value:.prec$}", prec = places));
    fixed.parse().unwrap_or(value)
}

/// Fixed-point text of `value` rounded away from zero to `places`, when the exact decimal
/// expansion of `value` ends with a `5` right after the last kept place. `None` otherwise.
fn round_exact_tie(value: f64, places: usize) -> Option<String> {
    let exact = format!("{:.prec$}", value.abs(), prec = EXACT_FRACTION_DIGITS);
    let (whole, fraction) = exact.trim_end_matches('0').split_once('.')?;
    let kept = fraction
        .strip_suffix('5')
        .filter(|kept| kept.len() == places)?;

    let mut digits: Vec<u8> = whole.bytes().chain(kept.bytes()).collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let split = digits.len() - places;
    let text = String::from_utf8(digits).ok()?;
    let (int_digits, frac_digits) = text.split_at(split);
    let sign = if value.is_sign_negative() { "-" } else { "" };
    Some(if frac_digits.is_empty() {
        format!("{sign}{int_digits}")
    } else {
        format!("{sign}{int_digits}.{frac_digits}")
    })
}

/// Shortest decimal text that reads back as `value`, without exponent or trailing zeros.
///
/// Negative zero is written as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}
