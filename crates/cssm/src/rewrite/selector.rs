//! Selector tokenizer.
//!
//! Splits selector text into the pieces the scope state machine cares about.
//! Everything else (type selectors, ids, pseudo-classes, combinators,
//! attribute selectors) is kept verbatim as [`SelectorToken::Raw`].

use crate::{Error, Result};

/// Scope of class names in a selector region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Class names are rewritten.
    Local,
    /// Class names are emitted unchanged.
    Global,
}

impl ScopeKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "local" => Some(Self::Local),
            "global" => Some(Self::Global),
            _ => None,
        }
    }
}

/// A lexical piece of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorToken {
    /// `,` between selectors of one rule.
    Comma,
    /// A run of whitespace.
    Whitespace(String),
    /// `.name`
    Class(String),
    /// `:local`/`:global`, with the parenthesized content if present.
    Scope {
        kind: ScopeKind,
        content: Option<String>,
    },
    /// `.alias::remote`, `alias::remote` or either form in parentheses.
    Composition {
        dotted: bool,
        alias: String,
        remote: String,
        parenthesized: bool,
    },
    /// Text copied through as is.
    Raw(String),
}

/// Whether `c` may appear in a class name.
fn is_name_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '.' | ',' | '#' | ':' | '(' | ')' | '[' | ']' | '>' | '+' | '~' | '*' | '\'' | '"'
                | '{' | '}' | '|' | '='
        )
}

/// Whether `name` is a valid class name.
pub(crate) fn is_class_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Tokenize a selector.
///
/// Fails only on an unclosed `:local(` or `:global(`.
pub fn tokenize_selector(selector: &str) -> Result<Vec<SelectorToken>> {
    let chars: Vec<char> = selector.chars().collect();
    let mut tokens = vec![];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ',' => {
                tokens.push(SelectorToken::Comma);
                i += 1;
            }
            c if c.is_whitespace() => {
                let end = scan_while(&chars, i, char::is_whitespace);
                tokens.push(SelectorToken::Whitespace(collect(&chars, i, end)));
                i = end;
            }
            '[' => {
                let end = scan_bracket(&chars, i);
                tokens.push(SelectorToken::Raw(collect(&chars, i, end)));
                i = end;
            }
            '\'' | '"' => {
                let end = scan_string(&chars, i);
                tokens.push(SelectorToken::Raw(collect(&chars, i, end)));
                i = end;
            }
            '.' => {
                let end = scan_while(&chars, i + 1, is_name_char);
                if end == i + 1 {
                    tokens.push(SelectorToken::Raw(".".to_string()));
                    i += 1;
                } else if let Some((remote, after)) = scan_remote(&chars, end) {
                    tokens.push(SelectorToken::Composition {
                        dotted: true,
                        alias: collect(&chars, i + 1, end),
                        remote,
                        parenthesized: false,
                    });
                    i = after;
                } else {
                    tokens.push(SelectorToken::Class(collect(&chars, i + 1, end)));
                    i = end;
                }
            }
            ':' => {
                if chars.get(i + 1) == Some(&':') {
                    tokens.push(SelectorToken::Raw("::".to_string()));
                    i += 2;
                    continue;
                }

                let end = scan_while(&chars, i + 1, is_name_char);
                let name = collect(&chars, i + 1, end);
                match ScopeKind::from_name(&name) {
                    Some(kind) if chars.get(end) == Some(&'(') => {
                        let close = scan_parens(&chars, end).ok_or_else(|| {
                            Error::syntax(selector, format!("Unclosed ':{}('", name))
                        })?;
                        tokens.push(SelectorToken::Scope {
                            kind,
                            content: Some(collect(&chars, end + 1, close)),
                        });
                        i = close + 1;
                    }
                    Some(kind) => {
                        tokens.push(SelectorToken::Scope {
                            kind,
                            content: None,
                        });
                        i = end;
                    }
                    None => {
                        tokens.push(SelectorToken::Raw(format!(":{name}")));
                        i = end;
                    }
                }
            }
            '(' => match scan_parenthesized_composition(&chars, i) {
                Some((token, after)) => {
                    tokens.push(token);
                    i = after;
                }
                None => {
                    tokens.push(SelectorToken::Raw("(".to_string()));
                    i += 1;
                }
            },
            '#' => {
                let end = scan_while(&chars, i + 1, is_name_char);
                tokens.push(SelectorToken::Raw(collect(&chars, i, end)));
                i = end;
            }
            c if is_name_char(c) => {
                let end = scan_while(&chars, i, is_name_char);
                if let Some((remote, after)) = scan_remote(&chars, end) {
                    tokens.push(SelectorToken::Composition {
                        dotted: false,
                        alias: collect(&chars, i, end),
                        remote,
                        parenthesized: false,
                    });
                    i = after;
                } else {
                    tokens.push(SelectorToken::Raw(collect(&chars, i, end)));
                    i = end;
                }
            }
            _ => {
                tokens.push(SelectorToken::Raw(c.to_string()));
                i += 1;
            }
        }
    }

    Ok(tokens)
}

fn collect(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

fn scan_while(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = start;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    end
}

/// Scan `::name` at `start`, returning the name and the index after it.
fn scan_remote(chars: &[char], start: usize) -> Option<(String, usize)> {
    if chars.get(start) != Some(&':') || chars.get(start + 1) != Some(&':') {
        return None;
    }
    let end = scan_while(chars, start + 2, is_name_char);
    (end > start + 2).then(|| (collect(chars, start + 2, end), end))
}

/// Scan `(.alias::remote)` or `(alias::remote)` at `start`.
fn scan_parenthesized_composition(chars: &[char], start: usize) -> Option<(SelectorToken, usize)> {
    let dotted = chars.get(start + 1) == Some(&'.');
    let alias_start = if dotted { start + 2 } else { start + 1 };
    let alias_end = scan_while(chars, alias_start, is_name_char);
    if alias_end == alias_start {
        return None;
    }

    let (remote, after) = scan_remote(chars, alias_end)?;
    if chars.get(after) != Some(&')') {
        return None;
    }

    let token = SelectorToken::Composition {
        dotted,
        alias: collect(chars, alias_start, alias_end),
        remote,
        parenthesized: true,
    };
    Some((token, after + 1))
}

/// Index of the `)` matching the `(` at `open`.
fn scan_parens(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            '\'' | '"' => {
                i = scan_string(chars, i);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Index just past the `]` closing the `[` at `open`, or the end of input.
fn scan_bracket(chars: &[char], open: usize) -> usize {
    let mut i = open + 1;
    while i < chars.len() {
        match chars[i] {
            ']' => return i + 1,
            '\'' | '"' => i = scan_string(chars, i),
            _ => i += 1,
        }
    }
    chars.len()
}

/// Index just past the string literal starting at `open`.
fn scan_string(chars: &[char], open: usize) -> usize {
    let quote = chars[open];
    let mut i = open + 1;
    while i < chars.len() {
        if chars[i] == quote {
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}
