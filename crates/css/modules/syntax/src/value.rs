//! Declaration value trees.
//!
//! A value is tokenized with cssparser and grouped into a tree of words, strings, URLs,
//! whitespace, comments, dividers and function/bracket groups. Every node keeps its source text,
//! so an unmodified tree serializes back to the exact input. Comments and the contents of
//! strings never appear as words, which is what lets callers edit words safely.

use core::fmt;

use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::Token;

/// A `(`/`[`/`{` group, with or without a function name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionNode {
    /// Opening text: `calc(`, `(`, `[` or `{`.
    pub opening: String,
    /// Children in source order.
    pub nodes: Vec<ValueNode>,
    /// Closing character, empty when the group runs to the end of the value.
    pub closing: String,
}

impl FunctionNode {
    /// Function name for `name(` groups, the empty string for bare parentheses,
    /// `None` for square and curly brackets.
    pub fn name(&self) -> Option<&str> {
        self.opening.strip_suffix('(')
    }

    /// Whether this is a `url(` function.
    pub fn is_url(&self) -> bool {
        self.name()
            .is_some_and(|name| name.eq_ignore_ascii_case("url"))
    }
}

/// One node of a value tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueNode {
    /// Identifiers, numbers, dimensions, percentages, hashes and other bare tokens.
    Word(String),
    /// A quoted string, quotes included.
    String(String),
    /// An unquoted `url(...)` token.
    Url(String),
    /// Whitespace.
    Space(String),
    /// A `/* ... */` comment.
    Comment(String),
    /// `,`, `/` or `:`.
    Div(String),
    /// A function call or bracketed group.
    Function(FunctionNode),
}

/// A parsed declaration value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueTree {
    /// Top-level nodes in source order.
    pub nodes: Vec<ValueNode>,
}

impl ValueTree {
    /// Walk every node in document order.
    ///
    /// The callback returns whether to descend into a function's children; its return value
    /// is ignored for other node kinds.
    pub fn walk_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut ValueNode) -> bool,
    {
        walk_nodes(&mut self.nodes, visit);
    }
}

fn walk_nodes<F>(nodes: &mut [ValueNode], visit: &mut F)
where
    F: FnMut(&mut ValueNode) -> bool,
{
    for node in nodes {
        let descend = visit(node);
        if descend && let ValueNode::Function(function) = node {
            walk_nodes(&mut function.nodes, visit);
        }
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(text)
            | Self::String(text)
            | Self::Url(text)
            | Self::Space(text)
            | Self::Comment(text)
            | Self::Div(text) => formatter.write_str(text),
            Self::Function(function) => {
                formatter.write_str(&function.opening)?;
                for child in &function.nodes {
                    fmt::Display::fmt(child, formatter)?;
                }
                formatter.write_str(&function.closing)
            }
        }
    }
}

impl fmt::Display for ValueTree {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            fmt::Display::fmt(node, formatter)?;
        }
        Ok(())
    }
}

/// Parse a declaration value into a [`ValueTree`].
///
/// Tokenization of a value cannot fail; malformed pieces become `Word` nodes and unclosed
/// groups get an empty `closing`.
pub fn parse_value(text: &str) -> ValueTree {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    ValueTree {
        nodes: parse_nodes(&mut parser, text),
    }
}

fn parse_nodes(input: &mut Parser<'_, '_>, source: &str) -> Vec<ValueNode> {
    let mut nodes = Vec::new();
    loop {
        let start = input.position();
        let Ok(token) = input.next_including_whitespace_and_comments() else {
            return nodes;
        };
        let closer = match *token {
            Token::Function(_) | Token::ParenthesisBlock => ")",
            Token::SquareBracketBlock => "]",
            Token::CurlyBracketBlock => "}",
            Token::WhiteSpace(_) => {
                nodes.push(ValueNode::Space(input.slice_from(start).to_owned()));
                continue;
            }
            Token::Comment(_) => {
                nodes.push(ValueNode::Comment(input.slice_from(start).to_owned()));
                continue;
            }
            Token::QuotedString(_) => {
                nodes.push(ValueNode::String(input.slice_from(start).to_owned()));
                continue;
            }
            Token::UnquotedUrl(_) => {
                nodes.push(ValueNode::Url(input.slice_from(start).to_owned()));
                continue;
            }
            Token::Comma | Token::Colon | Token::Delim('/') => {
                nodes.push(ValueNode::Div(input.slice_from(start).to_owned()));
                continue;
            }
            _ => {
                nodes.push(ValueNode::Word(input.slice_from(start).to_owned()));
                continue;
            }
        };
        let opening = input.slice_from(start).to_owned();
        let group: Result<(Vec<ValueNode>, bool), ParseError<'_, ()>> =
            input.parse_nested_block(|nested| {
                let children = parse_nodes(nested, source);
                let index = nested.position().byte_index();
                Ok((children, source.get(index..).is_some_and(|rest| rest.starts_with(closer))))
            });
        let (children, closed) = group.unwrap_or_default();
        nodes.push(ValueNode::Function(FunctionNode {
            opening,
            nodes: children,
            closing: if closed { closer.to_owned() } else { String::new() },
        }));
    }
}
