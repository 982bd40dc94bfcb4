//! Stylesheet rewriting: `<n>rem` becomes `calc(<n> * var(--name))`.

use css_syntax::value::{ValueNode, parse_value};
use css_syntax::{Stylesheet, parse_stylesheet};
use css_values_units::{format_number, parse_rem_literal, round_to_precision};
use css_variables::{is_custom_property_name, var_reference};

use crate::error::TransformError;
use crate::options::ScopedRemOptions;

/// Rewrites rem literals in declaration values according to a set of options.
#[derive(Clone, Debug)]
pub struct RemRewriter<'opts> {
    options: &'opts ScopedRemOptions,
    /// `var(<name>)`, built once per stylesheet.
    var_ref: String,
}

impl<'opts> RemRewriter<'opts> {
    /// Build a rewriter that references `options.var_name`.
    pub fn new(options: &'opts ScopedRemOptions) -> Self {
        Self {
            options,
            var_ref: var_reference(&options.var_name),
        }
    }

    /// Replacement text for a single word, or `None` if the word is not a rem literal.
    fn replace_word(&self, word: &str) -> Option<String> {
        if is_custom_property_name(word) {
            return None;
        }
        let mut value = parse_rem_literal(word)?.value();
        if let Some(precision) = self.options.precision {
            value = round_to_precision(value, precision);
        }
        if value == 0.0 {
            return Some("0".to_owned());
        }
        Some(format!("calc({} * {})", format_number(value), self.var_ref))
    }

    /// Rewrite every rem literal in a declaration value.
    ///
    /// Returns `None` when nothing in the value qualifies, so callers can keep the original
    /// bytes. Strings, comments and `url()` contents are never touched.
    pub fn rewrite_value(&self, value: &str) -> Option<String> {
        let mut tree = parse_value(value);
        let mut modified = false;
        tree.walk_mut(&mut |node| match node {
            ValueNode::Word(word) => {
                if let Some(replacement) = self.replace_word(word) {
                    *word = replacement;
                    modified = true;
                }
                true
            }
            ValueNode::Function(function) => !function.is_url(),
            ValueNode::String(_)
            | ValueNode::Url(_)
            | ValueNode::Space(_)
            | ValueNode::Comment(_)
            | ValueNode::Div(_) => true,
        });
        modified.then(|| tree.to_string())
    }

    /// Rewrite the values of all declarations in `sheet`, in place.
    pub fn rewrite_stylesheet(&self, sheet: &mut Stylesheet) {
        sheet.for_each_declaration_mut(&mut |decl| {
            if let Some(value) = self.rewrite_value(&decl.value) {
                decl.value = value;
            }
        });
    }
}

/// Transform a stylesheet: rewrite every rem literal and, when a root value is configured,
/// prepend `<scope> { <var>: <root value>; }` on its own line.
///
/// `filename` only labels diagnostics.
///
/// # Errors
/// Returns [`TransformError::Syntax`] when `css` is not valid CSS. Nothing is produced in
/// that case.
pub fn transform_css(
    css: &str,
    filename: &str,
    options: &ScopedRemOptions,
) -> Result<String, TransformError> {
    let mut sheet = parse_stylesheet(css).map_err(|source| TransformError::Syntax {
        filename: filename.to_owned(),
        source,
    })?;
    RemRewriter::new(options).rewrite_stylesheet(&mut sheet);
    let body = sheet.to_string();
    Ok(match options.declaration_rule() {
        Some(rule) => format!("{rule}\n{body}"),
        None => body,
    })
}
