//! Scoped rem: rewrite `rem` lengths as `calc(<n> * var(--name))` so the effective root unit of a
//! compiled stylesheet can be changed at runtime by setting one custom property.
//!
//! Two steps, both pure:
//! - [`parse_query_options`] turns a resource query such as
//!   `?rem-scoped&rootval=26.6667vw` into [`ScopedRemOptions`], or `None` when the
//!   transform was not requested.
//! - [`transform_css`] rewrites a stylesheet with those options.

#![forbid(unsafe_code)]

pub mod error;
pub mod options;
pub mod transform;

pub use error::{InvalidOptionError, PrecisionIssue, ScopedRemError, TransformError};
pub use options::{SCOPE_DEFAULT, ScopedRemOptions, VARNAME_DEFAULT, parse_query_options};
pub use transform::{RemRewriter, transform_css};
