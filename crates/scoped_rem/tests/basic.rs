#![cfg(test)]

use core::error::Error;
use scoped_rem::{ScopedRemOptions, transform_css};

type TestResult = Result<(), Box<dyn Error>>;

fn with_root_val(root_val: &str) -> ScopedRemOptions {
    ScopedRemOptions::default().with_root_val(root_val)
}

#[test]
fn simple_rem_to_calc() -> TestResult {
    let input = ".foo {\n  width: 1.2rem;\n  height: 2rem;\n  margin: 0.5rem 1rem;\n}";
    let result = transform_css(input, "test.css", &with_root_val("26.6667vw"))?;

    assert!(result.starts_with(":root { --rem-relative-base: 26.6667vw; }\n"));
    assert!(result.contains("calc(1.2 * var(--rem-relative-base))"));
    assert!(result.contains("calc(2 * var(--rem-relative-base))"));
    assert!(result.contains("calc(0.5 * var(--rem-relative-base))"));
    assert!(result.contains("calc(1 * var(--rem-relative-base))"));
    Ok(())
}

#[test]
fn compact_input_exact_output() -> TestResult {
    let input = ".foo{width:1.2rem;height:2rem;margin:0.5rem 1rem;}";
    let result = transform_css(input, "test.css", &with_root_val("26.6667vw"))?;
    assert_eq!(
        result,
        ":root { --rem-relative-base: 26.6667vw; }\n\
         .foo{width:calc(1.2 * var(--rem-relative-base));\
         height:calc(2 * var(--rem-relative-base));\
         margin:calc(0.5 * var(--rem-relative-base)) calc(1 * var(--rem-relative-base));}"
    );
    Ok(())
}

#[test]
fn custom_varname_and_scope() -> TestResult {
    let options = ScopedRemOptions::default()
        .with_root_val("10vw")
        .with_var_name("--my-base")
        .with_scope(".my-component");
    let result = transform_css(".comp {\n  font-size: 1.5rem;\n}", "test.css", &options)?;

    assert!(result.contains(".my-component { --my-base: 10vw; }"));
    assert!(result.contains("calc(1.5 * var(--my-base))"));
    assert!(!result.contains("--rem-relative-base"));
    Ok(())
}

#[test]
fn precision_rounds_values() -> TestResult {
    let options = ScopedRemOptions::default()
        .with_root_val("16px")
        .with_precision(2)?;
    let result = transform_css(".foo {\n  width: 1.23456rem;\n}", "test.css", &options)?;
    assert!(result.contains("calc(1.23 * var(--rem-relative-base))"));
    Ok(())
}

#[test]
fn precision_drops_trailing_zeros() -> TestResult {
    let options = ScopedRemOptions::default().with_precision(2)?;
    let result = transform_css(".foo { width: 1.20rem; top: 3.999rem }", "test.css", &options)?;
    assert!(result.contains("calc(1.2 * var(--rem-relative-base))"));
    assert!(result.contains("calc(4 * var(--rem-relative-base))"));
    Ok(())
}

#[test]
fn precision_ties_round_away_from_zero() -> TestResult {
    let whole = ScopedRemOptions::default().with_precision(0)?;
    assert_eq!(
        transform_css(".a{top:2.5rem;bottom:-2.5rem}", "test.css", &whole)?,
        ".a{top:calc(3 * var(--rem-relative-base));bottom:calc(-3 * var(--rem-relative-base))}"
    );

    let hundredths = ScopedRemOptions::default().with_precision(2)?;
    assert_eq!(
        transform_css(".a{top:0.125rem}", "test.css", &hundredths)?,
        ".a{top:calc(0.13 * var(--rem-relative-base))}"
    );
    Ok(())
}

#[test]
fn no_rounding_without_precision() -> TestResult {
    let result = transform_css(".foo { width: 1.23456rem }", "test.css", &ScopedRemOptions::default())?;
    assert!(result.contains("calc(1.23456 * var(--rem-relative-base))"));
    Ok(())
}

#[test]
fn other_units_untouched() -> TestResult {
    let input = ".foo {\n  width: 100px;\n  height: 50%;\n  margin: 1em;\n}";
    let result = transform_css(input, "test.css", &with_root_val("26.6667vw"))?;

    assert!(result.contains("100px"));
    assert!(result.contains("50%"));
    assert!(result.contains("1em"));
    assert!(!result.contains("calc(100 * var"));
    assert!(!result.contains("calc(50 * var"));
    assert!(result.ends_with(input));
    Ok(())
}

#[test]
fn zero_values_become_bare_zero() -> TestResult {
    let input = ".foo {\n  margin: 0rem;\n  padding: 0rem 1rem;\n}";
    let result = transform_css(input, "test.css", &with_root_val("26.6667vw"))?;

    assert!(result.contains("margin: 0;"));
    assert!(result.contains("0 calc(1 * var(--rem-relative-base))"));
    assert!(!result.contains("calc(0 *"));
    Ok(())
}

#[test]
fn shorthand_lists() -> TestResult {
    let result = transform_css(
        ".foo {\n  margin: 1rem 0 2rem 0.5rem;\n}",
        "test.css",
        &with_root_val("26.6667vw"),
    )?;
    assert!(result.contains(
        "calc(1 * var(--rem-relative-base)) 0 calc(2 * var(--rem-relative-base)) \
         calc(0.5 * var(--rem-relative-base))"
    ));

    let result = transform_css(
        ".foo {\n  box-shadow: 0 0 5px 1rem rgba(0,0,0,0.1);\n}",
        "test.css",
        &with_root_val("26.6667vw"),
    )?;
    assert!(result.contains("0 0 5px calc(1 * var(--rem-relative-base)) rgba(0,0,0,0.1)"));
    Ok(())
}

#[test]
fn rem_inside_functions() -> TestResult {
    let input = ".foo {\n  width: calc(100% - 2rem);\n  height: calc(1rem + 10px);\n}";
    let result = transform_css(input, "test.css", &with_root_val("26.6667vw"))?;
    assert!(result.contains("calc(100% - calc(2 * var(--rem-relative-base)))"));
    assert!(result.contains("calc(calc(1 * var(--rem-relative-base)) + 10px)"));

    let input = ".foo {\n  width: calc(50% + calc(10px + 1rem));\n}";
    let result = transform_css(input, "test.css", &with_root_val("26.6667vw"))?;
    assert!(result.contains("calc(50% + calc(10px + calc(1 * var(--rem-relative-base))))"));
    Ok(())
}

#[test]
fn no_declaration_rule_without_root_val() -> TestResult {
    let options = ScopedRemOptions::default().with_var_name("base-no-rootval");
    let result = transform_css(".component { font-size: 2rem; }", "test.css", &options)?;
    assert_eq!(
        result,
        ".component { font-size: calc(2 * var(--base-no-rootval)); }"
    );
    Ok(())
}

#[test]
fn at_rules_and_nesting() -> TestResult {
    let input = "@import url(\"base-1rem.css\");\n\
                 @media (min-width: 40rem) { .a { padding: 1rem } }\n\
                 .b { &:hover { margin: 2rem; } }\n\
                 @font-face { font-family: x; src: url(x-1rem.woff) }";
    let result = transform_css(input, "test.css", &ScopedRemOptions::default())?;
    assert!(result.contains("@import url(\"base-1rem.css\");"));
    assert!(result.contains("@media (min-width: 40rem) { .a { padding: calc(1 * var(--rem-relative-base)) } }"));
    assert!(result.contains("&:hover { margin: calc(2 * var(--rem-relative-base)); }"));
    assert!(result.contains("src: url(x-1rem.woff) }"));
    Ok(())
}

#[test]
fn important_is_preserved() -> TestResult {
    let result = transform_css(".a { top: 1rem !important; }", "test.css", &ScopedRemOptions::default())?;
    assert_eq!(
        result,
        ".a { top: calc(1 * var(--rem-relative-base)) !important; }"
    );
    Ok(())
}

#[test]
fn custom_property_values_are_rewritten_but_names_are_not() -> TestResult {
    let input = ":root { --gap-1rem: 1rem; } .a { margin: var(--gap-1rem); }";
    let result = transform_css(input, "test.css", &ScopedRemOptions::default())?;
    assert_eq!(
        result,
        ":root { --gap-1rem: calc(1 * var(--rem-relative-base)); } .a { margin: var(--gap-1rem); }"
    );
    Ok(())
}

#[test]
fn second_pass_changes_nothing() -> TestResult {
    let options = ScopedRemOptions::default();
    let input = ".a { width: calc(100% - 2rem); margin: 0rem -1.5rem; }";
    let once = transform_css(input, "test.css", &options)?;
    let twice = transform_css(&once, "test.css", &options)?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn unmodified_stylesheet_is_byte_identical() -> TestResult {
    let input = "/* header */\n.a , .b {\n  color : red ;\n  content: \"1rem\";\n}\n\n@media print {\n  .c { margin: 0 }\n}\n";
    let result = transform_css(input, "test.css", &ScopedRemOptions::default())?;
    assert_eq!(result, input);
    Ok(())
}
