//! The `:import` rule.
//!
//! ```css
//! :import {
//!   base: "from './base'";
//!   accent: from './theme.css'::accent;
//! }
//!
//! .title base::heading { color: red; }
//! ```
//!
//! Each declaration names an alias for a file. A value is an optional
//! `from` followed by a quoted path, optionally followed by `::class`. A
//! double-quoted value may itself hold `from 'path'` or `from path`.
//! Selectors refer to classes of the aliased file with `alias::class` or
//! `.alias::class`. An alias declared with `::class` is also bound in the
//! current file's table, so `.alias` resolves like a `@use` label.

use super::DirectiveFrontEnd;
use crate::config::DirectiveSyntax;
use crate::document::Node;
use crate::resolve::ModuleContext;
use crate::rewrite::is_class_name;
use crate::{Error, Result};

/// The parsed value of an `:import` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    /// Declared path of the referenced file.
    pub path: String,
    /// Class bound to the alias, if any.
    pub class_name: Option<String>,
}

impl ImportSource {
    /// Parse a declaration value.
    pub fn parse(value: &str) -> Result<Self> {
        let error = |message: &str| Error::syntax(format!(":import {}", value.trim()), message);

        let text = strip_from(value.trim());
        let (quoted, rest) =
            split_quoted(text).ok_or_else(|| error("Expected a quoted module path"))?;
        let mut class_name = class_suffix(rest).map_err(error)?;

        let inner = strip_from(quoted.trim());
        let path = match split_quoted(inner) {
            Some((path, rest)) => {
                if let Some(name) = class_suffix(rest).map_err(error)? {
                    class_name = Some(name);
                }
                path.trim()
            }
            None => match inner.split_once("::") {
                Some((path, name)) => {
                    if !is_class_name(name) {
                        return Err(error("Invalid class name after '::'"));
                    }
                    class_name = Some(name.to_string());
                    path.trim()
                }
                None => inner,
            },
        };

        if path.is_empty() {
            return Err(error("Empty module path"));
        }
        if path.contains(char::is_whitespace) && split_quoted(inner).is_none() {
            return Err(error("Expected a quoted module path"));
        }

        Ok(Self {
            path: path.to_string(),
            class_name,
        })
    }
}

/// Drop a leading `from` keyword.
fn strip_from(text: &str) -> &str {
    match text.strip_prefix("from") {
        Some(rest) if rest.starts_with(|c: char| c.is_whitespace() || c == '\'' || c == '"') => {
            rest.trim_start()
        }
        _ => text,
    }
}

/// Split `'content'rest` into its quoted content and the rest.
fn split_quoted(text: &str) -> Option<(&str, &str)> {
    let quote = text.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let body = &text[1..];
    let end = body.find(quote)?;
    Some((&body[..end], &body[end + 1..]))
}

/// Parse an optional `::class` suffix.
fn class_suffix(rest: &str) -> std::result::Result<Option<String>, &'static str> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(None);
    }
    match rest.strip_prefix("::") {
        Some(name) if is_class_name(name) => Ok(Some(name.to_string())),
        _ => Err("Unexpected text after module path"),
    }
}

/// Front-end for `:import` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportFrontEnd;

impl DirectiveFrontEnd for ImportFrontEnd {
    fn syntax(&self) -> DirectiveSyntax {
        DirectiveSyntax::Import
    }

    fn intercept(&self, node: &Node, cx: &mut ModuleContext<'_>) -> Result<bool> {
        let Node::Rule(rule) = node else {
            return Ok(false);
        };
        if rule.selector.trim() != ":import" {
            return Ok(false);
        }

        for child in &rule.nodes {
            let Node::Declaration(decl) = child else {
                return Err(Error::syntax(":import", "Only declarations are allowed"));
            };
            if !is_class_name(&decl.property) {
                return Err(Error::syntax(
                    format!(":import {}", decl.property),
                    "Invalid alias",
                ));
            }

            let source = ImportSource::parse(&decl.value)?;
            let target = cx.resolve_path(&source.path);
            cx.require_module(&target)?;

            if let Some(class_name) = &source.class_name {
                let scoped = cx.remote_name(&target, class_name);
                cx.bind(&format!(":import {}", decl.property), &decl.property, scoped)?;
            }

            cx.add_import(decl.property.clone(), target);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str, class_name: Option<&str>) -> ImportSource {
        ImportSource {
            path: path.to_string(),
            class_name: class_name.map(str::to_string),
        }
    }

    #[test]
    fn accepted_value_forms() {
        assert_eq!(ImportSource::parse("\"from './base'\"").unwrap(), source("./base", None));
        assert_eq!(ImportSource::parse("from './base'").unwrap(), source("./base", None));
        assert_eq!(ImportSource::parse("'./base.css'").unwrap(), source("./base.css", None));
        assert_eq!(ImportSource::parse("\"from ./base\"").unwrap(), source("./base", None));
    }

    #[test]
    fn class_suffixes() {
        assert_eq!(
            ImportSource::parse("from './base'::button").unwrap(),
            source("./base", Some("button"))
        );
        assert_eq!(
            ImportSource::parse("\"from './base'::button\"").unwrap(),
            source("./base", Some("button"))
        );
        assert_eq!(
            ImportSource::parse("\"from ./base::button\"").unwrap(),
            source("./base", Some("button"))
        );
    }

    #[test]
    fn malformed_values() {
        for value in [
            "./base",
            "from ./base",
            "\"./base",
            "'./base' trailing",
            "\"\"",
            "\"from a b\"",
            "'./base'::",
        ] {
            let err = ImportSource::parse(value).unwrap_err();
            assert!(err.is_syntax(), "{value} should be rejected");
        }
    }
}
