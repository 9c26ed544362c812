//! CSS syntax parser using the `cssparser` crate.
//!
//! The parser only splits a stylesheet into its block structure. Selectors,
//! at-rule preludes and declaration values are kept as raw source slices so
//! the scoping transform sees exactly what the author wrote.

use std::path::Path;

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, SourceLocation, Token};

use super::{AtRule, Declaration, Document, Node, Rule};
use crate::logging::targets;
use crate::{Error, Result};

/// How a prelude ended.
enum Terminator {
    /// A `{ ... }` block follows.
    Block,
    /// A `;` ended the prelude.
    Semicolon,
    /// The input (or enclosing block) ended.
    End,
}

/// Parse a CSS stylesheet string into a [`Document`].
///
/// Comments are dropped. Malformed declarations inside a block are skipped
/// with a warning; a top-level prelude without a block is an error.
///
/// # Example
///
/// ```ignore
/// let document = parse_document("styles/app.css", ".title { color: red; }")?;
/// assert_eq!(document.nodes.len(), 1);
/// ```
pub fn parse_document(path: impl AsRef<Path>, source: &str) -> Result<Document> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);
    let nodes = parse_nodes(&mut parser, 0)?;

    Ok(Document::new(path.as_ref(), source, nodes))
}

/// Parse a list of rules, at-rules and declarations.
fn parse_nodes<'i>(parser: &mut Parser<'i, '_>, depth: usize) -> Result<Vec<Node>> {
    let mut nodes = vec![];

    loop {
        // Skip whitespace and comments
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let location = parser.current_source_location();
        let state = parser.state();
        let at_name = match parser.next() {
            Ok(Token::AtKeyword(name)) => Some(name.to_string()),
            _ => None,
        };

        let node = match at_name {
            Some(name) => Some(parse_at_rule(parser, name, depth)?),
            None => {
                parser.reset(&state);
                parse_qualified(parser, depth, location)?
            }
        };

        if let Some(node) = node {
            nodes.push(node);
        }
    }

    Ok(nodes)
}

/// Parse `@name params;` or `@name params { ... }` after the at-keyword.
fn parse_at_rule<'i>(parser: &mut Parser<'i, '_>, name: String, depth: usize) -> Result<Node> {
    let (params, terminator) = parse_prelude(parser)?;

    let at_rule = match terminator {
        Terminator::Block => AtRule::block(name, params, parse_block(parser, depth)?),
        Terminator::Semicolon | Terminator::End => AtRule::statement(name, params),
    };

    Ok(Node::AtRule(at_rule))
}

/// Parse a rule or, inside a block, a declaration.
fn parse_qualified<'i>(
    parser: &mut Parser<'i, '_>,
    depth: usize,
    location: SourceLocation,
) -> Result<Option<Node>> {
    let (prelude, terminator) = parse_prelude(parser)?;

    match terminator {
        Terminator::Block => {
            let nodes = parse_block(parser, depth)?;
            Ok(Some(Node::Rule(Rule::new(prelude, nodes))))
        }
        // Stray semicolon
        _ if prelude.is_empty() => Ok(None),
        _ if depth > 0 => Ok(parse_declaration(&prelude, location)),
        _ => Err(Error::parse(
            format!("Expected '{{' after selector '{}'", prelude),
            location.line + 1,
            location.column,
        )),
    }
}

/// Capture raw text up to the next `;` or `{`, then consume the terminator.
fn parse_prelude<'i>(parser: &mut Parser<'i, '_>) -> Result<(String, Terminator)> {
    let location = parser.current_source_location();
    let start = parser.position();

    parser
        .parse_until_before(Delimiter::Semicolon | Delimiter::CurlyBracketBlock, |p| {
            while p.next().is_ok() {}
            Ok::<_, CssParseError<'_, ()>>(())
        })
        .map_err(|e| {
            Error::parse(
                format!("Failed to parse prelude: {:?}", e.kind),
                location.line + 1,
                location.column,
            )
        })?;

    let prelude = parser.slice_from(start).trim().to_string();

    let terminator = match parser.next() {
        Ok(Token::CurlyBracketBlock) => Terminator::Block,
        Ok(Token::Semicolon) => Terminator::Semicolon,
        _ => Terminator::End,
    };

    Ok((prelude, terminator))
}

/// Parse the contents of the `{ ... }` block that was just consumed.
fn parse_block<'i>(parser: &mut Parser<'i, '_>, depth: usize) -> Result<Vec<Node>> {
    let location = parser.current_source_location();

    parser
        .parse_nested_block(|p| {
            let nodes = parse_nodes(p, depth + 1);
            // An inner error leaves tokens behind; drain them so it surfaces
            while p.next().is_ok() {}
            Ok::<_, CssParseError<'_, ()>>(nodes)
        })
        .map_err(|e| {
            Error::parse(
                format!("Failed to parse block: {:?}", e.kind),
                location.line + 1,
                location.column,
            )
        })?
}

/// Split `property: value`. Malformed declarations are skipped.
fn parse_declaration(text: &str, location: SourceLocation) -> Option<Node> {
    match text.split_once(':') {
        Some((property, value)) if !property.trim().is_empty() => Some(Node::Declaration(
            Declaration::new(property.trim(), value.trim()),
        )),
        _ => {
            tracing::warn!(
                target: targets::PARSER,
                "Skipping malformed declaration '{}' at line {}",
                text,
                location.line + 1
            );
            None
        }
    }
}
