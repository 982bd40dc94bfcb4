//! CSS Syntax Module Level 3: lossless stylesheet parsing.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Unlike a cascade-oriented parser this one is lossless: every byte of the input ends up in
//! exactly one node of the resulting [`Stylesheet`], so serializing an unmodified tree yields the
//! original text. Only declaration values are meant to be edited in place.

#![forbid(unsafe_code)]

mod error;
pub mod value;

use core::fmt;

use css_variables::is_custom_property_name;
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::ParseErrorKind;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::SourceLocation;
use cssparser::StyleSheetParser;
use cssparser::Token;

pub use error::{SyntaxError, SyntaxErrorKind};

/// A single CSS declaration (property: value [!important]).
///
/// The text is split so that `before_value + value + after_value` is exactly the source slice
/// of the declaration, not counting the terminating `;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name as written.
    pub name: String,
    /// Everything between the end of the name and the first value byte (colon, whitespace).
    pub before_value: String,
    /// Raw value text, including a trailing `!important` if present.
    pub value: String,
    /// Trailing whitespace after the value.
    pub after_value: String,
}

/// A qualified rule (usually a style rule) with its raw prelude and parsed body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// Raw prelude text up to and including the opening `{`.
    pub prelude: String,
    /// Body items in source order.
    pub body: Vec<Node>,
}

/// An at-rule, with or without a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// Raw text from the `@` up to the end of the prelude, or up to and including `{`.
    pub prelude: String,
    /// Block contents, `None` for statement at-rules such as `@import`.
    pub body: Option<Vec<Node>>,
}

/// One item of a stylesheet or of a block body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Verbatim text between items: whitespace, comments and `;` separators.
    Raw(String),
    /// A qualified rule.
    Rule(StyleRule),
    /// An at-rule.
    AtRule(AtRule),
    /// A declaration.
    Declaration(Declaration),
}

/// A parsed stylesheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level items in source order.
    pub nodes: Vec<Node>,
}

impl Stylesheet {
    /// Visit every declaration in document order, including those nested in at-rules and
    /// nested rules.
    pub fn for_each_declaration_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut Declaration),
    {
        visit_declarations(&mut self.nodes, visit);
    }
}

fn visit_declarations<F>(nodes: &mut [Node], visit: &mut F)
where
    F: FnMut(&mut Declaration),
{
    for node in nodes {
        match node {
            Node::Declaration(decl) => visit(decl),
            Node::Rule(rule) => visit_declarations(&mut rule.body, visit),
            Node::AtRule(AtRule {
                body: Some(body), ..
            }) => visit_declarations(body, visit),
            Node::AtRule(_) | Node::Raw(_) => {}
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}{}{}{}",
            self.name, self.before_value, self.value, self.after_value
        )
    }
}

impl fmt::Display for Node {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(text) => formatter.write_str(text),
            Self::Declaration(decl) => fmt::Display::fmt(decl, formatter),
            Self::Rule(rule) => {
                formatter.write_str(&rule.prelude)?;
                write_nodes(formatter, &rule.body)?;
                formatter.write_str("}")
            }
            Self::AtRule(rule) => {
                formatter.write_str(&rule.prelude)?;
                if let Some(body) = &rule.body {
                    write_nodes(formatter, body)?;
                    formatter.write_str("}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(formatter, &self.nodes)
    }
}

fn write_nodes(formatter: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for node in nodes {
        fmt::Display::fmt(node, formatter)?;
    }
    Ok(())
}

/// A parsed item together with its byte span in the source.
struct Spanned {
    start: usize,
    end: usize,
    node: Node,
}

type ItemResult<'i> = Result<Spanned, ParseError<'i, SyntaxErrorKind>>;

/// Consume a declaration value, rejecting the shapes a declaration value cannot have.
///
/// `strict` is false inside nested blocks and for custom properties, where colons and
/// curly blocks are allowed. The legacy `progid:` filter prefix is accepted in strict mode.
fn scan_value<'i>(
    input: &mut Parser<'i, '_>,
    source: &str,
    strict: bool,
) -> Result<(), ParseError<'i, SyntaxErrorKind>> {
    let mut after_progid = false;
    loop {
        let location = input.current_source_location();
        let Ok(token) = input.next_including_whitespace_and_comments() else {
            return Ok(());
        };
        let follows_progid = after_progid;
        after_progid =
            matches!(*token, Token::Ident(ref ident) if ident.eq_ignore_ascii_case(LEGACY_FILTER_PREFIX));
        let closer = match *token {
            Token::Colon if strict && !follows_progid => {
                return Err(location.new_custom_error(SyntaxErrorKind::MissedSemicolon));
            }
            Token::CurlyBracketBlock if strict => {
                return Err(location.new_custom_error(SyntaxErrorKind::UnexpectedBlock));
            }
            Token::BadString(_) => {
                return Err(location.new_custom_error(SyntaxErrorKind::UnclosedString));
            }
            Token::BadUrl(_) => {
                return Err(location.new_custom_error(SyntaxErrorKind::BadUrl));
            }
            Token::Function(_) | Token::ParenthesisBlock => b')',
            Token::SquareBracketBlock => b']',
            Token::CurlyBracketBlock => b'}',
            _ => continue,
        };
        let closed = input.parse_nested_block(|nested| {
            scan_value(nested, source, false)?;
            Ok(source.as_bytes().get(nested.position().byte_index()) == Some(&closer))
        })?;
        if !closed {
            return Err(location.new_custom_error(SyntaxErrorKind::UnclosedBracket));
        }
    }
}

/// Identifier that may be followed by a colon in a plain declaration value.
const LEGACY_FILTER_PREFIX: &str = "progid";

/// Byte length of the leading whitespace of `text`.
fn leading_whitespace_len(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Parser for the contents of a `{}` block: declarations, nested rules and at-rules.
struct BodyParser<'src> {
    source: &'src str,
}

impl<'i> CssDeclarationParser<'i> for BodyParser<'_> {
    type Declaration = Spanned;
    type Error = SyntaxErrorKind;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = decl_start.position().byte_index();
        let value_start = input.position().byte_index();
        scan_value(input, self.source, !is_custom_property_name(&name))?;
        let end = input.position().byte_index();
        let name_end = start + name_source_len(self.source, start, value_start);

        let raw_value = self.source.get(value_start..end).unwrap_or_default();
        let lead = leading_whitespace_len(raw_value);
        let value = raw_value.trim();
        let value_end = value_start + lead + value.len();

        Ok(Spanned {
            start,
            end,
            node: Node::Declaration(Declaration {
                name: slice(self.source, start, name_end),
                before_value: slice(self.source, name_end, value_start + lead),
                value: value.to_owned(),
                after_value: slice(self.source, value_end, end),
            }),
        })
    }
}

/// Length of the property name at `start`: the run of bytes before whitespace, a comment
/// or the colon.
fn name_source_len(source: &str, start: usize, limit: usize) -> usize {
    source
        .get(start..limit)
        .and_then(|head| head.find(|ch: char| ch == ':' || ch == '/' || ch.is_whitespace()))
        .unwrap_or(0)
}

fn slice(source: &str, start: usize, end: usize) -> String {
    source.get(start..end).unwrap_or_default().to_owned()
}

/// Prelude of an at-rule: where the prelude ends.
struct AtPrelude {
    end: usize,
}

/// Consume an at-rule prelude, recording where it stops.
fn parse_at_prelude<'i>(
    input: &mut Parser<'i, '_>,
    source: &str,
) -> Result<AtPrelude, ParseError<'i, SyntaxErrorKind>> {
    scan_value(input, source, false)?;
    Ok(AtPrelude {
        end: input.position().byte_index(),
    })
}

/// Consume a qualified rule prelude, rejecting stray closing braces.
fn parse_rule_prelude<'i>(
    input: &mut Parser<'i, '_>,
    source: &str,
) -> Result<(), ParseError<'i, SyntaxErrorKind>> {
    loop {
        let location = input.current_source_location();
        let Ok(token) = input.next_including_whitespace_and_comments() else {
            return Ok(());
        };
        let closer = match *token {
            Token::CloseCurlyBracket => {
                return Err(location.new_custom_error(SyntaxErrorKind::UnexpectedCloseBrace));
            }
            Token::BadString(_) => {
                return Err(location.new_custom_error(SyntaxErrorKind::UnclosedString));
            }
            Token::Function(_) | Token::ParenthesisBlock => b')',
            Token::SquareBracketBlock => b']',
            _ => continue,
        };
        let closed = input.parse_nested_block(|nested| {
            scan_value(nested, source, false)?;
            Ok(source.as_bytes().get(nested.position().byte_index()) == Some(&closer))
        })?;
        if !closed {
            return Err(location.new_custom_error(SyntaxErrorKind::UnclosedBracket));
        }
    }
}

/// Parse the items of a block and check that the block is closed by a `}`.
///
/// Returns the body nodes and the byte index just past the closing brace.
fn parse_block_body<'i>(
    block: &mut Parser<'i, '_>,
    source: &str,
) -> Result<(Vec<Node>, usize), ParseError<'i, SyntaxErrorKind>> {
    let body_start = block.position().byte_index();
    let mut items = Vec::new();
    let mut body = BodyParser { source };
    for item in CssRuleBodyParser::new(block, &mut body) {
        items.push(item.map_err(|(err, _slice)| err)?);
    }
    let body_end = block.position().byte_index();
    if source.as_bytes().get(body_end) != Some(&b'}') {
        return Err(block.new_custom_error(SyntaxErrorKind::UnclosedBlock));
    }
    Ok((fill_gaps(source, body_start, body_end, items), body_end + 1))
}

/// Interleave parsed items with `Node::Raw` text so the nodes cover `start..end` exactly.
fn fill_gaps(source: &str, start: usize, end: usize, items: Vec<Spanned>) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(items.len() * 2 + 1);
    let mut cursor = start;
    for item in items {
        if item.start > cursor {
            nodes.push(Node::Raw(slice(source, cursor, item.start)));
        }
        nodes.push(item.node);
        cursor = item.end;
    }
    if end > cursor {
        nodes.push(Node::Raw(slice(source, cursor, end)));
    }
    nodes
}

fn qualified_rule<'i>(
    source: &str,
    state: &ParserState,
    input: &mut Parser<'i, '_>,
) -> ItemResult<'i> {
    let start = state.position().byte_index();
    let prelude_end = input.position().byte_index();
    let (body, end) = parse_block_body(input, source)?;
    Ok(Spanned {
        start,
        end,
        node: Node::Rule(StyleRule {
            prelude: slice(source, start, prelude_end),
            body,
        }),
    })
}

fn at_rule_with_block<'i>(
    source: &str,
    state: &ParserState,
    input: &mut Parser<'i, '_>,
) -> ItemResult<'i> {
    let start = state.position().byte_index();
    let prelude_end = input.position().byte_index();
    let (body, end) = parse_block_body(input, source)?;
    Ok(Spanned {
        start,
        end,
        node: Node::AtRule(AtRule {
            prelude: slice(source, start, prelude_end),
            body: Some(body),
        }),
    })
}

fn at_rule_without_block(source: &str, prelude: AtPrelude, state: &ParserState) -> Spanned {
    let start = state.position().byte_index();
    Spanned {
        start,
        end: prelude.end,
        node: Node::AtRule(AtRule {
            prelude: slice(source, start, prelude.end),
            body: None,
        }),
    }
}

impl<'i> CssAtRuleParser<'i> for BodyParser<'_> {
    type Prelude = AtPrelude;
    type AtRule = Spanned;
    type Error = SyntaxErrorKind;

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        parse_at_prelude(input, self.source)
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        at_rule_with_block(self.source, start, input)
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(at_rule_without_block(self.source, prelude, start))
    }
}

impl<'i> CssQualifiedRuleParser<'i> for BodyParser<'_> {
    type Prelude = ();
    type QualifiedRule = Spanned;
    type Error = SyntaxErrorKind;

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        parse_rule_prelude(input, self.source)
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        qualified_rule(self.source, start, input)
    }
}

impl<'i> CssRuleBodyItemParser<'i, Spanned, SyntaxErrorKind> for BodyParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}

/// Top-level parser that builds rule items for qualified rules and at-rules.
struct TopLevelParser<'src> {
    source: &'src str,
    /// Where a `}` without a matching `{` was found.
    stray_close_brace: Option<SourceLocation>,
}

impl<'i> CssAtRuleParser<'i> for TopLevelParser<'_> {
    type Prelude = AtPrelude;
    type AtRule = Spanned;
    type Error = SyntaxErrorKind;

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        parse_at_prelude(input, self.source)
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        at_rule_with_block(self.source, start, input)
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(at_rule_without_block(self.source, prelude, start))
    }
}

impl<'i> CssQualifiedRuleParser<'i> for TopLevelParser<'_> {
    type Prelude = ();
    type QualifiedRule = Spanned;
    type Error = SyntaxErrorKind;

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        // cssparser reports a missing block ahead of the prelude error, so keep the location.
        let prelude = parse_rule_prelude(input, self.source);
        if let Err(err) = &prelude
            && matches!(err.kind, ParseErrorKind::Custom(SyntaxErrorKind::UnexpectedCloseBrace))
        {
            self.stray_close_brace = Some(err.location);
        }
        prelude
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        qualified_rule(self.source, start, input)
    }
}

/// Parse a full stylesheet into a lossless `Stylesheet` using cssparser.
///
/// # Errors
/// Returns a [`SyntaxError`] for the first malformed construct: unclosed blocks or brackets,
/// a missing semicolon between declarations, stray closing braces, rules without a block,
/// and bad strings or URLs. No partial tree is produced.
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, SyntaxError> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = TopLevelParser {
        source: css,
        stray_close_brace: None,
    };
    let mut items = Vec::new();
    let mut failure = None;
    for rule in StyleSheetParser::new(&mut parser, &mut top) {
        match rule {
            Ok(item) => items.push(item),
            Err((err, _slice)) => {
                failure = Some(SyntaxError::from_parse_error(&err));
                break;
            }
        }
    }
    if let Some(err) = failure {
        return Err(match top.stray_close_brace {
            Some(location) => SyntaxError::at(SyntaxErrorKind::UnexpectedCloseBrace, location),
            None => err,
        });
    }
    Ok(Stylesheet {
        nodes: fill_gaps(css, 0, css.len(), items),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(css: &str) {
        let sheet = parse_stylesheet(css);
        assert_eq!(
            sheet.map(|parsed| parsed.to_string()).ok().as_deref(),
            Some(css),
            "serialization must reproduce the input"
        );
    }

    #[test]
    fn serializes_byte_for_byte() {
        roundtrip("");
        roundtrip("  \n\t ");
        roundtrip(".foo{width:1.2rem;height:2rem;margin:0.5rem 1rem;}");
        roundtrip("/* lead */\n.a , .b  {\n  color : red !important ;\n  width: 1rem /* c */ ;\n}\n");
        roundtrip("@import url(a.css);\n@media (min-width: 40rem) { .a { top: 1rem } }");
        roundtrip(".a { &:hover { color: red; } --x: { a: b }; }");
        roundtrip("@font-face{font-family:x;src:url(\"x.woff\")}");
    }

    #[test]
    fn splits_declaration_text() {
        let mut sheet = parse_stylesheet(".a {  width :  1rem  ; }").unwrap_or_default();
        let mut found = Vec::new();
        sheet.for_each_declaration_mut(&mut |decl| found.push(decl.clone()));
        assert_eq!(
            found,
            [Declaration {
                name: "width".to_owned(),
                before_value: " :  ".to_owned(),
                value: "1rem".to_owned(),
                after_value: "  ".to_owned(),
            }]
        );
    }

    #[test]
    fn visits_nested_declarations() {
        let mut sheet = parse_stylesheet(
            "@media print { .a { top: 1rem } } .b { left: 2rem; .c { right: 3rem } }",
        )
        .unwrap_or_default();
        let mut names = Vec::new();
        sheet.for_each_declaration_mut(&mut |decl| names.push(decl.name.clone()));
        assert_eq!(names, ["top", "left", "right"]);
    }

    #[test]
    fn rejects_malformed_input() {
        let cases = [
            ".foo {\n  width: 1.2rem\n  height: 2rem;\n}",
            ".foo {\n  width: 1.2rem;\n  height: 2rem;",
            ".foo { width: calc(1rem + 2px; }",
            "}",
            ".foo",
            ".foo { bar }",
        ];
        for css in cases {
            assert!(matches!(parse_stylesheet(css), Err(_)), "expected an error for {css:?}");
        }
    }

    #[test]
    fn accepts_legacy_filter() {
        roundtrip(".a { filter: progid:DXImageTransform.Microsoft.gradient(startColorstr='#80000000', endColorstr='#80000000'); }");
        assert!(matches!(parse_stylesheet(".a { color: red:blue; }"), Err(_)));
    }

    #[test]
    fn reports_stray_close_brace() {
        let err = parse_stylesheet(".a { top: 1rem; }\n}").err();
        assert_eq!(
            err.map(|err| (err.kind, err.line)),
            Some((SyntaxErrorKind::UnexpectedCloseBrace, 2))
        );
    }

    #[test]
    fn reports_location() {
        let err = parse_stylesheet(".foo {\n  width: 1.2rem\n  height: 2rem;\n}").err();
        assert_eq!(
            err.map(|err| (err.kind, err.line)),
            Some((SyntaxErrorKind::MissedSemicolon, 3))
        );
    }
}
