//! Build-tool integration for scoped rem rewriting.
//!
//! A bundler hands the loader a stylesheet, the resource path and the resource query
//! (`?rem-scoped&rootval=...`). The loader resolves options, rewrites the stylesheet, and on
//! any failure reports a non-fatal error through the context and returns the source unchanged
//! so the build keeps going.

#![forbid(unsafe_code)]

pub mod cli;

use std::borrow::Cow;

use log::{debug, warn};
use scoped_rem::{ScopedRemError, parse_query_options, transform_css};
use thiserror::Error;

/// Errors reported by the loader. None of them abort the build.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The transform was requested but the host gave no resource path.
    #[error("[scoped-rem-loader] Missing resource path")]
    MissingResourcePath,
    /// Option resolution or rewriting failed.
    #[error("[scoped-rem-loader] Failed to transform {path}: {source}")]
    Transform {
        /// Resource path of the stylesheet.
        path: String,
        /// Underlying failure.
        source: ScopedRemError,
    },
}

/// What the loader needs from the host build tool.
pub trait LoaderContext {
    /// Resource query including the leading `?`, or the empty string.
    fn resource_query(&self) -> &str;

    /// Path of the resource being loaded, if known.
    fn resource_path(&self) -> Option<&str>;

    /// Report a non-fatal error.
    fn emit_error(&mut self, error: LoaderError);
}

/// A [`LoaderContext`] that owns its inputs and keeps emitted errors.
#[derive(Debug, Default)]
pub struct CollectingContext {
    /// Query handed to the loader, `?` included.
    pub resource_query: String,
    /// Path of the stylesheet; `None` models a host that has none.
    pub resource_path: Option<String>,
    /// Errors emitted so far, oldest first.
    pub errors: Vec<LoaderError>,
}

impl CollectingContext {
    /// Context for the stylesheet at `resource_path` loaded with `resource_query`.
    pub fn new(resource_path: impl Into<String>, resource_query: impl Into<String>) -> Self {
        Self {
            resource_query: resource_query.into(),
            resource_path: Some(resource_path.into()),
            errors: Vec::new(),
        }
    }
}

impl LoaderContext for CollectingContext {
    fn resource_query(&self) -> &str {
        &self.resource_query
    }

    fn resource_path(&self) -> Option<&str> {
        self.resource_path.as_deref()
    }

    fn emit_error(&mut self, error: LoaderError) {
        self.errors.push(error);
    }
}

/// Resolve options and rewrite `source`. `Ok(None)` means the transform does not apply.
fn transform_resource(
    source: &str,
    resource_query: &str,
    resource_path: Option<&str>,
) -> Result<Option<String>, LoaderError> {
    let Some(query) = resource_query.strip_prefix('?') else {
        return Ok(None);
    };
    let failed = |source: ScopedRemError| LoaderError::Transform {
        path: resource_path.unwrap_or_default().to_owned(),
        source,
    };

    let Some(options) = parse_query_options(query).map_err(|err| failed(err.into()))? else {
        return Ok(None);
    };
    let path = resource_path.ok_or(LoaderError::MissingResourcePath)?;
    debug!(target: "scoped_rem_loader", "transforming {path} with {options:?}");
    let output = transform_css(source, path, &options).map_err(|err| failed(err.into()))?;
    debug!(target: "scoped_rem_loader", "transformed {path}: {} -> {} bytes", source.len(), output.len());
    Ok(Some(output))
}

/// Run the loader on a stylesheet.
///
/// Returns the source borrowed and unchanged when the query does not request the transform
/// or when the transform fails; failures go to [`LoaderContext::emit_error`].
pub fn run_loader<'src, C>(source: &'src str, ctx: &mut C) -> Cow<'src, str>
where
    C: LoaderContext + ?Sized,
{
    let result = transform_resource(source, ctx.resource_query(), ctx.resource_path());
    match result {
        Ok(Some(output)) => Cow::Owned(output),
        Ok(None) => Cow::Borrowed(source),
        Err(err) => {
            warn!(target: "scoped_rem_loader", "{err}; keeping original source");
            ctx.emit_error(err);
            Cow::Borrowed(source)
        }
    }
}

/// Run the loader on a raw buffer. Invalid UTF-8 is replaced before parsing; when nothing is
/// transformed the original bytes come back untouched.
pub fn run_loader_bytes<'src, C>(source: &'src [u8], ctx: &mut C) -> Cow<'src, [u8]>
where
    C: LoaderContext + ?Sized,
{
    let text = String::from_utf8_lossy(source);
    match run_loader(&text, ctx) {
        Cow::Owned(output) => Cow::Owned(output.into_bytes()),
        Cow::Borrowed(_) => Cow::Borrowed(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_without_question_mark() {
        let mut ctx = CollectingContext::new("a.css", "rem-scoped");
        assert!(matches!(run_loader(".a { top: 1rem }", &mut ctx), Cow::Borrowed(_)));
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn skips_empty_query() {
        let mut ctx = CollectingContext::new("a.css", "");
        assert!(matches!(run_loader(".a { top: 1rem }", &mut ctx), Cow::Borrowed(_)));
    }

    #[test]
    fn missing_path_is_reported() {
        let mut ctx = CollectingContext {
            resource_query: "?rem-scoped".to_owned(),
            ..CollectingContext::default()
        };
        let output = run_loader(".a { top: 1rem }", &mut ctx);
        assert_eq!(output, ".a { top: 1rem }");
        assert!(matches!(ctx.errors.as_slice(), [LoaderError::MissingResourcePath]));
    }

    #[test]
    fn bytes_round_trip_when_untouched() {
        let source: &[u8] = b".a { top: 1rem } \xff";
        let mut ctx = CollectingContext::new("a.css", "");
        assert!(matches!(run_loader_bytes(source, &mut ctx), Cow::Borrowed(bytes) if bytes == source));
    }
}
