//! CSS Custom Properties for Cascading Variables Module Level 1: CSS variables.
//! Spec: <https://www.w3.org/TR/css-variables-1/>

#![forbid(unsafe_code)]

/// Prefix that marks a property name as a custom property.
pub const CUSTOM_PROPERTY_PREFIX: &str = "--";

/// Whether `name` is a custom property name (`--*`).
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#custom-property>
#[inline]
pub fn is_custom_property_name(name: &str) -> bool {
    name.starts_with(CUSTOM_PROPERTY_PREFIX)
}

/// Turn a user-supplied variable name into a custom property name by adding the `--` prefix
/// when it is missing. Surrounding whitespace is dropped.
#[inline]
pub fn to_custom_property_name(name: &str) -> String {
    let trimmed = name.trim();
    if is_custom_property_name(trimmed) {
        trimmed.to_owned()
    } else {
        [CUSTOM_PROPERTY_PREFIX, trimmed].concat()
    }
}

/// Build a `var()` reference to the custom property `name`.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#using-variables>
#[inline]
pub fn var_reference(name: &str) -> String {
    format!("var({name})")
}

/// Render a single-declaration rule that sets `name` to `value` under `selector`,
/// e.g. `:root { --base: 16px; }`.
///
/// Neither the selector nor the value is validated; both are written verbatim.
#[inline]
pub fn custom_property_rule(selector: &str, name: &str, value: &str) -> String {
    format!("{selector} {{ {name}: {value}; }}")
}
