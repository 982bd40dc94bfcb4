//! Option resolution from a resource query string.
//!
//! The query looks like `?rem-scoped&rootval=26.6667vw&varname=--base&varselector=.app&precision=3`.
//! Without the `rem-scoped` key the transform is not applicable and no other key is looked at.

use std::borrow::Cow;

use css_variables::{custom_property_rule, to_custom_property_name};
use url::form_urlencoded;

use crate::error::{InvalidOptionError, PrecisionIssue};

/// Presence-only key that turns the transform on.
pub const ACTIVATION_KEY: &str = "rem-scoped";
/// Key for the value assigned to the custom property.
pub const ROOTVAL_KEY: &str = "rootval";
/// Key for the custom property name.
pub const VARNAME_KEY: &str = "varname";
/// Key for the selector that scopes the custom property declaration.
pub const SCOPE_KEY: &str = "varselector";
/// Alternate spelling of [`SCOPE_KEY`].
pub const SCOPE_ALIAS_KEY: &str = "scope";
/// Key for the number of decimal places kept in rewritten values.
pub const PRECISION_KEY: &str = "precision";

/// Custom property used when no `varname` is supplied.
pub const VARNAME_DEFAULT: &str = "--rem-relative-base";
/// Selector used when no scope is supplied.
pub const SCOPE_DEFAULT: &str = ":root";
/// Largest accepted `precision`.
pub const PRECISION_MAX: u8 = 100;

/// Fully resolved transform configuration.
///
/// Defaults: no root value (no declaration rule is emitted), [`VARNAME_DEFAULT`],
/// [`SCOPE_DEFAULT`], and no rounding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopedRemOptions {
    /// Value assigned to the custom property, e.g. `26.6667vw`.
    pub root_val: Option<String>,
    /// Custom property name, always `--` prefixed.
    pub var_name: String,
    /// Selector the custom property is declared under.
    pub scope: String,
    /// Decimal places to round rewritten numbers to.
    pub precision: Option<u8>,
}

impl Default for ScopedRemOptions {
    fn default() -> Self {
        Self {
            root_val: None,
            var_name: VARNAME_DEFAULT.to_owned(),
            scope: SCOPE_DEFAULT.to_owned(),
            precision: None,
        }
    }
}

impl ScopedRemOptions {
    /// Set the root value. An empty value means "not supplied".
    #[must_use]
    pub fn with_root_val(mut self, root_val: &str) -> Self {
        self.root_val = (!root_val.is_empty()).then(|| root_val.to_owned());
        self
    }

    /// Set the custom property name, adding the `--` prefix if missing.
    /// An empty name keeps the current one.
    #[must_use]
    pub fn with_var_name(mut self, var_name: &str) -> Self {
        if !var_name.trim().is_empty() {
            self.var_name = to_custom_property_name(var_name);
        }
        self
    }

    /// Set the scope selector. An empty selector keeps the current one.
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        if !scope.is_empty() {
            scope.clone_into(&mut self.scope);
        }
        self
    }

    /// Set the rounding precision.
    ///
    /// # Errors
    /// Returns [`InvalidOptionError::Precision`] when `precision` exceeds [`PRECISION_MAX`].
    pub fn with_precision(mut self, precision: u8) -> Result<Self, InvalidOptionError> {
        if precision > PRECISION_MAX {
            return Err(InvalidOptionError::Precision {
                raw: precision.to_string(),
                reason: PrecisionIssue::OutOfRange,
            });
        }
        self.precision = Some(precision);
        Ok(self)
    }

    /// The `<scope> { <var>: <root value>; }` rule, when a root value is configured.
    pub fn declaration_rule(&self) -> Option<String> {
        self.root_val
            .as_deref()
            .filter(|root_val| !root_val.is_empty())
            .map(|root_val| custom_property_rule(&self.scope, &self.var_name, root_val))
    }
}

/// Validate a raw `precision` value: a base-10 integer in `0..=100`.
///
/// # Errors
/// Returns [`InvalidOptionError::Precision`] with the raw text and the reason.
pub fn parse_precision(raw: &str) -> Result<u8, InvalidOptionError> {
    let reason = match raw.parse::<i64>() {
        Ok(value) => match u8::try_from(value) {
            Ok(precision) if precision <= PRECISION_MAX => return Ok(precision),
            _ => PrecisionIssue::OutOfRange,
        },
        Err(_) if is_signed_digits(raw) => PrecisionIssue::OutOfRange,
        Err(_) if raw.parse::<f64>().is_ok_and(f64::is_finite) => PrecisionIssue::NotAnInteger,
        Err(_) => PrecisionIssue::NotANumber,
    };
    Err(InvalidOptionError::Precision {
        raw: raw.to_owned(),
        reason,
    })
}

/// `[+-]?[0-9]+`, used to tell integer overflow apart from other parse failures.
fn is_signed_digits(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Resolve options from a query string.
///
/// A leading `?` is ignored and pairs are form-urlencoded. Returns `Ok(None)` when the
/// activation key is absent. Repeated keys resolve to their last occurrence, empty values
/// count as not supplied, and unknown keys are ignored.
///
/// # Errors
/// Returns [`InvalidOptionError`] when the transform is active and `precision` is invalid.
pub fn parse_query_options(query: &str) -> Result<Option<ScopedRemOptions>, InvalidOptionError> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut active = false;
    let mut root_val: Option<Cow<'_, str>> = None;
    let mut var_name: Option<Cow<'_, str>> = None;
    let mut scope: Option<Cow<'_, str>> = None;
    let mut precision: Option<Cow<'_, str>> = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            ACTIVATION_KEY => active = true,
            ROOTVAL_KEY => root_val = Some(value),
            VARNAME_KEY => var_name = Some(value),
            SCOPE_KEY | SCOPE_ALIAS_KEY => scope = Some(value),
            PRECISION_KEY => precision = Some(value),
            _ => {}
        }
    }
    if !active {
        return Ok(None);
    }

    let mut options = ScopedRemOptions::default()
        .with_root_val(root_val.as_deref().unwrap_or_default())
        .with_var_name(var_name.as_deref().unwrap_or_default())
        .with_scope(scope.as_deref().unwrap_or_default());
    if let Some(raw) = precision.as_deref().filter(|raw| !raw.is_empty()) {
        options = options.with_precision(parse_precision(raw)?)?;
    }
    Ok(Some(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_materialized() {
        let options = ScopedRemOptions::default();
        assert_eq!(options.root_val, None);
        assert_eq!(options.var_name, "--rem-relative-base");
        assert_eq!(options.scope, ":root");
        assert_eq!(options.precision, None);
        assert_eq!(options.declaration_rule(), None);
    }

    #[test]
    fn declaration_rule_uses_all_fields() {
        let options = ScopedRemOptions::default()
            .with_root_val("10vw")
            .with_var_name("my-base")
            .with_scope(".my-component");
        assert_eq!(
            options.declaration_rule().as_deref(),
            Some(".my-component { --my-base: 10vw; }")
        );
    }

    #[test]
    fn empty_builder_values_keep_defaults() {
        let options = ScopedRemOptions::default()
            .with_root_val("")
            .with_var_name("")
            .with_scope("");
        assert_eq!(options, ScopedRemOptions::default());
    }

    #[test]
    fn precision_bounds() {
        assert_eq!(parse_precision("0"), Ok(0));
        assert_eq!(parse_precision("100"), Ok(100));
        assert_eq!(parse_precision("+3"), Ok(3));
        let reason = |raw: &str| match parse_precision(raw) {
            Err(InvalidOptionError::Precision { reason, .. }) => Some(reason),
            Ok(_) => None,
        };
        assert_eq!(reason("-1"), Some(PrecisionIssue::OutOfRange));
        assert_eq!(reason("101"), Some(PrecisionIssue::OutOfRange));
        assert_eq!(reason("99999999999999999999999"), Some(PrecisionIssue::OutOfRange));
        assert_eq!(reason("2.5"), Some(PrecisionIssue::NotAnInteger));
        assert_eq!(reason("2.0"), Some(PrecisionIssue::NotAnInteger));
        assert_eq!(reason("1e3"), Some(PrecisionIssue::NotAnInteger));
        assert_eq!(reason("abc"), Some(PrecisionIssue::NotANumber));
        assert_eq!(reason("2px"), Some(PrecisionIssue::NotANumber));
        assert_eq!(reason("NaN"), Some(PrecisionIssue::NotANumber));
        assert_eq!(reason(" 2"), Some(PrecisionIssue::NotANumber));
    }

    #[test]
    fn builder_rejects_large_precision() {
        assert!(matches!(ScopedRemOptions::default().with_precision(101), Err(_)));
        assert_eq!(
            ScopedRemOptions::default()
                .with_precision(2)
                .map(|options| options.precision),
            Ok(Some(2))
        );
    }
}
