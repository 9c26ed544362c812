//! The `@use` directive.
//!
//! ```css
//! @use .button from './base';
//! @use (.button, .title as .heading) from './base.css';
//! ```
//!
//! A single class or a parenthesized, comma-separated list must come before
//! `from`; the quoted path must be the last token. `as` changes the label a
//! class is bound under in the current file without renaming the source
//! class.

use super::lexer::{Token, tokenize};
use super::DirectiveFrontEnd;
use crate::config::DirectiveSyntax;
use crate::document::Node;
use crate::resolve::ModuleContext;
use crate::{Error, Result};

/// One class imported by `@use`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseReference {
    /// Class name in the referenced file.
    pub class_name: String,
    /// Name the class is bound under in the current file.
    pub label: String,
}

/// A parsed `@use` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseDirective {
    /// Imported classes.
    pub references: Vec<UseReference>,
    /// Declared path of the referenced file.
    pub path: String,
}

impl UseDirective {
    /// Parse the parameters of a `@use` at-rule.
    pub fn parse(params: &str) -> Result<Self> {
        let tokens = tokenize(params)?;
        let mut cursor = Cursor {
            tokens: &tokens,
            index: 0,
            params,
        };

        let references = match cursor.peek() {
            None => return Err(cursor.error("Expected a class reference")),
            Some(Token::From) => return Err(cursor.error("Expected a class found 'from'")),
            Some(Token::OpenParen) => {
                cursor.advance();
                cursor.reference_list()?
            }
            Some(_) => vec![cursor.reference()?],
        };

        match cursor.advance() {
            Some(Token::From) => {}
            Some(Token::Comma) => return Err(cursor.error("Unexpected comma")),
            Some(Token::CloseParen) => return Err(cursor.error("Unexpected ')'")),
            Some(token) => {
                return Err(cursor.error(format!("Expected 'from' found '{token}'")));
            }
            None => return Err(cursor.error("Expected 'from'")),
        }

        let path = match cursor.advance() {
            Some(Token::Str(path)) => path.clone(),
            Some(token) => {
                return Err(cursor.error(format!("Expected a quoted path found '{token}'")));
            }
            None => return Err(cursor.error("Expected a quoted path after 'from'")),
        };

        if let Some(token) = cursor.advance() {
            return Err(cursor.error(format!("Expected end of rule but found '{token}'")));
        }

        Ok(Self { references, path })
    }
}

struct Cursor<'t> {
    tokens: &'t [Token],
    index: usize,
    params: &'t str,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.index);
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(format!("@use {}", self.params), message)
    }

    /// `.class` or `.class as .label`
    fn reference(&mut self) -> Result<UseReference> {
        let class_name = match self.advance() {
            Some(Token::Class(name)) => name.clone(),
            Some(Token::OpenParen) => return Err(self.error("Unexpected '('")),
            Some(token) => return Err(self.error(format!("Invalid class name '{token}'"))),
            None => return Err(self.error("Expected a class reference")),
        };

        if self.peek() != Some(&Token::As) {
            return Ok(UseReference {
                label: class_name.clone(),
                class_name,
            });
        }
        self.advance();

        match self.advance() {
            Some(Token::Class(label)) => Ok(UseReference {
                class_name,
                label: label.clone(),
            }),
            _ => Err(self.error("Invalid class label")),
        }
    }

    /// References after `(` up to and including `)`.
    fn reference_list(&mut self) -> Result<Vec<UseReference>> {
        let mut references = vec![];

        loop {
            match self.peek() {
                Some(Token::Comma) => return Err(self.error("Unexpected comma")),
                Some(Token::CloseParen) => return Err(self.error("Unexpected ')'")),
                Some(Token::From) => return Err(self.error("Expected ')' found 'from'")),
                None => return Err(self.error("Expected ')'")),
                Some(_) => {}
            }

            references.push(self.reference()?);

            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::CloseParen) => return Ok(references),
                Some(Token::From) => return Err(self.error("Expected ')' found 'from'")),
                Some(token) => {
                    return Err(self.error(format!("Expected ',' or ')' found '{token}'")));
                }
                None => return Err(self.error("Expected ')'")),
            }
        }
    }
}

/// Front-end for `@use` at-rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseFrontEnd;

impl DirectiveFrontEnd for UseFrontEnd {
    fn syntax(&self) -> DirectiveSyntax {
        DirectiveSyntax::Use
    }

    fn intercept(&self, node: &Node, cx: &mut ModuleContext<'_>) -> Result<bool> {
        let Node::AtRule(at_rule) = node else {
            return Ok(false);
        };
        if at_rule.name != "use" {
            return Ok(false);
        }

        let directive = UseDirective::parse(&at_rule.params)?;
        let target = cx.resolve_path(&directive.path);
        cx.require_module(&target)?;

        for reference in &directive.references {
            let scoped = cx.remote_name(&target, &reference.class_name);
            cx.bind(&format!("@use {}", at_rule.params), &reference.label, scoped)?;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(class_name: &str, label: &str) -> UseReference {
        UseReference {
            class_name: class_name.to_string(),
            label: label.to_string(),
        }
    }

    fn message(params: &str) -> String {
        match UseDirective::parse(params).unwrap_err() {
            Error::Syntax { message, .. } => message,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn parse_single_reference() {
        let directive = UseDirective::parse(".button from './base'").unwrap();

        assert_eq!(directive.references, vec![reference("button", "button")]);
        assert_eq!(directive.path, "./base");
    }

    #[test]
    fn parse_list_with_labels() {
        let directive = UseDirective::parse("(.a, .b as .c) from \"../x.css\"").unwrap();

        assert_eq!(
            directive.references,
            vec![reference("a", "a"), reference("b", "c")]
        );
        assert_eq!(directive.path, "../x.css");
    }

    #[test]
    fn single_reference_with_label() {
        let directive = UseDirective::parse(".className as .basicClassName from './basics'").unwrap();
        assert_eq!(
            directive.references,
            vec![reference("className", "basicClassName")]
        );
    }

    #[test]
    fn grammar_errors() {
        assert_eq!(message("from './a'"), "Expected a class found 'from'");
        assert_eq!(message(""), "Expected a class reference");
        assert_eq!(message("(.a from './a'"), "Expected ')' found 'from'");
        assert_eq!(message("(, .a) from './a'"), "Unexpected comma");
        assert_eq!(message("(.a,, .b) from './a'"), "Unexpected comma");
        assert_eq!(message("(.a,) from './a'"), "Unexpected ')'");
        assert_eq!(message("() from './a'"), "Unexpected ')'");
        assert_eq!(message(".a, .b from './a'"), "Unexpected comma");
        assert_eq!(message(".a) from './a'"), "Unexpected ')'");
        assert_eq!(message("((.a)) from './a'"), "Unexpected '('");
        assert_eq!(message("(.a) from ./a"), "Expected a quoted path found './a'");
        assert_eq!(message("(.a) from"), "Expected a quoted path after 'from'");
        assert_eq!(message(".a from './a' extra"), "Expected end of rule but found 'extra'");
        assert_eq!(message("a from './a'"), "Invalid class name 'a'");
        assert_eq!(message(".a as b from './a'"), "Invalid class label");
        assert_eq!(message(".a './a'"), "Expected 'from' found ''./a''");
    }

    #[test]
    fn unterminated_path_is_fatal() {
        assert_eq!(message(".a from './a"), "Unterminated string literal");
    }
}
