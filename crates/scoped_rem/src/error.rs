//! Error types for option resolution and stylesheet rewriting.

use css_syntax::SyntaxError;
use thiserror::Error;

/// Why a `precision` option was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PrecisionIssue {
    /// The value is not numeric at all.
    #[error("not a number")]
    NotANumber,
    /// The value is numeric but has a fractional part or exponent.
    #[error("not an integer")]
    NotAnInteger,
    /// The value is an integer outside `0..=100`.
    #[error("must be between 0 and 100")]
    OutOfRange,
}

/// A malformed or out-of-range option value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidOptionError {
    /// `precision` was not an integer in `0..=100`.
    #[error("invalid precision `{raw}`: {reason}")]
    Precision {
        /// The value as supplied.
        raw: String,
        /// What is wrong with it.
        reason: PrecisionIssue,
    },
}

/// Failure to rewrite a stylesheet.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The input is not syntactically valid CSS.
    #[error("{filename}:{source}")]
    Syntax {
        /// File identifier the stylesheet was loaded from.
        filename: String,
        /// Parser diagnostic.
        source: SyntaxError,
    },
}

/// Any failure along the resolve-then-rewrite path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScopedRemError {
    /// The query string carried a bad option.
    #[error(transparent)]
    InvalidOption(#[from] InvalidOptionError),
    /// The stylesheet could not be rewritten.
    #[error(transparent)]
    Transform(#[from] TransformError),
}
