//! Tokenizer for `@use` parameters.

use std::fmt;

use crate::rewrite::is_class_name;
use crate::{Error, Result};

/// An atomic symbol of a `@use` parameter string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `.name`, stored without the dot.
    Class(String),
    /// `from`
    From,
    /// `as`
    As,
    /// `,`
    Comma,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// A quoted string, stored without the quotes.
    Str(String),
    /// Anything else.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Class(name) => write!(f, ".{name}"),
            Token::From => write!(f, "from"),
            Token::As => write!(f, "as"),
            Token::Comma => write!(f, ","),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::Str(value) => write!(f, "'{value}'"),
            Token::Word(word) => write!(f, "{word}"),
        }
    }
}

/// Split a parameter string into tokens.
///
/// Strings are delimited by matching `'` or `"` and have no escapes. An
/// unterminated string is a syntax error.
pub fn tokenize(params: &str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut word = String::new();
    let mut chars = params.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                flush(&mut word, &mut tokens);
                let mut literal = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == c {
                        closed = true;
                        break;
                    }
                    literal.push(next);
                }
                if !closed {
                    return Err(Error::syntax(
                        format!("@use {params}"),
                        "Unterminated string literal",
                    ));
                }
                tokens.push(Token::Str(literal));
            }
            ',' => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::Comma);
            }
            '(' => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::OpenParen);
            }
            ')' => {
                flush(&mut word, &mut tokens);
                tokens.push(Token::CloseParen);
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);

    Ok(tokens)
}

fn flush(word: &mut String, tokens: &mut Vec<Token>) {
    if word.is_empty() {
        return;
    }

    let token = match word.as_str() {
        "from" => Token::From,
        "as" => Token::As,
        w => match w.strip_prefix('.') {
            Some(name) if is_class_name(name) => Token::Class(name.to_string()),
            _ => Token::Word(w.to_string()),
        },
    };
    tokens.push(token);
    word.clear();
}
