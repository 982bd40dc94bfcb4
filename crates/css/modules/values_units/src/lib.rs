//! CSS Values and Units Module Level 3: numeric literals and the root-em unit.
//! Spec: <https://www.w3.org/TR/css-values-3/>

#![forbid(unsafe_code)]

// Per-chapter modules mirroring the CSS Values and Units table of contents.
pub mod chapter_4_numbers;
pub mod chapter_6_dimensions;

// Re-exports for ergonomic access from other crates.
pub use chapter_4_numbers::{Number, format_number, parse_number, round_to_precision};
pub use chapter_6_dimensions::{REM_UNIT, RemLength, parse_rem_literal};
