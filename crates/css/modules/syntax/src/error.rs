//! Owned syntax errors for stylesheet parsing.

use cssparser::BasicParseErrorKind;
use cssparser::ParseError;
use cssparser::ParseErrorKind;
use cssparser::SourceLocation;
use cssparser::ToCss as _;
use thiserror::Error;

/// Why a stylesheet failed to parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A `{` block reached the end of input without its `}`.
    #[error("unclosed block")]
    UnclosedBlock,
    /// A `(` or `[` reached the end of its enclosing input without a closer.
    #[error("unclosed bracket")]
    UnclosedBracket,
    /// A string token was cut by a newline.
    #[error("unclosed string")]
    UnclosedString,
    /// A malformed `url()` token.
    #[error("bad url")]
    BadUrl,
    /// A `:` inside a declaration value, which means two declarations ran together.
    #[error("missed semicolon")]
    MissedSemicolon,
    /// A `{}` block inside a declaration value.
    #[error("unexpected block in declaration value")]
    UnexpectedBlock,
    /// A `}` with no matching `{`.
    #[error("unexpected }}")]
    UnexpectedCloseBrace,
    /// A token that cannot start or continue the current construct.
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    /// The input ended in the middle of a construct, such as a selector with no block.
    #[error("unexpected end of input")]
    EndOfInput,
    /// An at-rule the parser could not accept.
    #[error("invalid at-rule `@{0}`")]
    InvalidAtRule(String),
    /// A rule that is neither a declaration nor a valid nested rule.
    #[error("invalid rule")]
    InvalidRule,
}

/// A stylesheet syntax error with its 1-based position.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{line}:{column}: {kind}")]
pub struct SyntaxError {
    /// What went wrong.
    pub kind: SyntaxErrorKind,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl SyntaxError {
    /// Attach a cssparser location (0-based line, 1-based column) to `kind`.
    pub(crate) fn at(kind: SyntaxErrorKind, location: SourceLocation) -> Self {
        Self {
            kind,
            line: location.line + 1,
            column: location.column,
        }
    }

    /// Convert a borrowed cssparser error into an owned one.
    pub(crate) fn from_parse_error(err: &ParseError<'_, SyntaxErrorKind>) -> Self {
        let kind = match &err.kind {
            ParseErrorKind::Custom(kind) => kind.clone(),
            ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
                SyntaxErrorKind::UnexpectedToken(token.to_css_string())
            }
            ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => SyntaxErrorKind::EndOfInput,
            ParseErrorKind::Basic(BasicParseErrorKind::AtRuleInvalid(name)) => {
                SyntaxErrorKind::InvalidAtRule(name.to_string())
            }
            ParseErrorKind::Basic(
                BasicParseErrorKind::AtRuleBodyInvalid | BasicParseErrorKind::QualifiedRuleInvalid,
            ) => SyntaxErrorKind::InvalidRule,
        };
        Self::at(kind, err.location)
    }
}
