//! CSS Values & Units Level 3: §6 Dimensions (Lengths subset)
//! Spec: <https://www.w3.org/TR/css-values-3/#lengths>

use crate::chapter_4_numbers::{Number, parse_number};

/// The root-em unit suffix.
pub const REM_UNIT: &str = "rem";

/// A `<number>rem` literal as written in the source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemLength<'src> {
    /// The numeric part, sign included.
    pub number: Number<'src>,
}

impl RemLength<'_> {
    /// Numeric value of the literal in rem.
    pub const fn value(&self) -> f64 {
        self.number.value
    }
}

/// Recognize a root-em length literal (§6.2.2) such as `1.2rem`, `-1.5rem` or `.5REM`.
///
/// The unit matches case-insensitively; the part before it must be a plain decimal number,
/// so words like `abcrem` or `1e3rem` are rejected.
pub fn parse_rem_literal(text: &str) -> Option<RemLength<'_>> {
    let split = text.len().checked_sub(REM_UNIT.len())?;
    let unit = text.get(split..)?;
    if !unit.eq_ignore_ascii_case(REM_UNIT) {
        return None;
    }
    let number = parse_number(text.get(..split)?)?;
    Some(RemLength { number })
}
