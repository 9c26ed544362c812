//! Selector rewriting.
//!
//! [`Rewriter`] walks a document tree, hands directive nodes to the enabled
//! front-ends and rewrites every rule selector with a [`SelectorRewriter`].
//!
//! Each comma-separated selector starts in the default scope (`Local` when
//! modules are enabled). A bare `:local`/`:global` switches the scope for the
//! rest of that selector; `:local(...)`/`:global(...)` only affect their
//! content. Composition references resolve through the import bindings
//! regardless of scope.

mod selector;

pub use selector::{ScopeKind, SelectorToken, tokenize_selector};
pub(crate) use selector::is_class_name;

use crate::config::Config;
use crate::directive::{self, DirectiveFrontEnd};
use crate::document::Node;
use crate::logging::targets;
use crate::resolve::ModuleContext;
use crate::Result;

/// Source of scoped names for the selector state machine.
pub trait ClassNames {
    /// Scoped name for a class of the current document.
    fn local(&mut self, class_name: &str) -> String;

    /// Scoped name for `remote` in the file bound to `alias`, or `None` if
    /// the alias is unknown.
    fn composed(&mut self, alias: &str, remote: &str) -> Option<String>;
}

/// Rewrites class names inside one selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorRewriter {
    default_scope: ScopeKind,
}

impl SelectorRewriter {
    /// Create a rewriter; with `modules` disabled everything is global.
    pub fn new(modules: bool) -> Self {
        let default_scope = if modules {
            ScopeKind::Local
        } else {
            ScopeKind::Global
        };
        Self { default_scope }
    }

    /// The scope every comma-separated selector starts in.
    pub fn default_scope(&self) -> ScopeKind {
        self.default_scope
    }

    /// Rewrite a selector.
    pub fn rewrite(&self, selector: &str, names: &mut dyn ClassNames) -> Result<String> {
        let tokens = tokenize_selector(selector)?;
        let rewritten = rewrite_tokens(&tokens, self.default_scope, names)?;
        Ok(rewritten.trim().to_string())
    }
}

fn rewrite_tokens(
    tokens: &[SelectorToken],
    initial: ScopeKind,
    names: &mut dyn ClassNames,
) -> Result<String> {
    let mut out = String::new();
    let mut scope = initial;
    let mut branch_start = 0;
    let mut skip_whitespace = false;

    for token in tokens {
        match token {
            SelectorToken::Comma => {
                scope = initial;
                // A branch left empty by a bare marker is dropped with its comma
                if out[branch_start..].trim().is_empty() {
                    out.truncate(branch_start);
                } else {
                    out.push(',');
                }
                branch_start = out.len();
            }
            SelectorToken::Whitespace(ws) => {
                if !skip_whitespace {
                    out.push_str(ws);
                }
            }
            SelectorToken::Class(name) => {
                out.push('.');
                push_class(&mut out, name, scope, names);
            }
            SelectorToken::Scope {
                kind,
                content: Some(content),
            } => {
                let inner = tokenize_selector(content)?;
                out.push_str(&rewrite_tokens(&inner, *kind, names)?);
            }
            SelectorToken::Scope {
                kind,
                content: None,
            } => {
                scope = *kind;
                // Drop the space a leading marker leaves behind
                skip_whitespace = out[branch_start..].trim().is_empty()
                    || out.ends_with(char::is_whitespace);
                continue;
            }
            SelectorToken::Composition {
                dotted,
                alias,
                remote,
                parenthesized,
            } => match names.composed(alias, remote) {
                Some(scoped) => {
                    out.push('.');
                    out.push_str(&scoped);
                }
                None => {
                    tracing::debug!(
                        target: targets::REWRITE,
                        "no import named '{}', keeping '{}::{}'",
                        alias,
                        alias,
                        remote
                    );
                    if *parenthesized {
                        out.push('(');
                    }
                    if *dotted {
                        out.push('.');
                        push_class(&mut out, alias, scope, names);
                    } else {
                        out.push_str(alias);
                    }
                    out.push_str("::");
                    out.push_str(remote);
                    if *parenthesized {
                        out.push(')');
                    }
                }
            },
            SelectorToken::Raw(text) => out.push_str(text),
        }
        skip_whitespace = false;
    }

    if branch_start > 0 && out[branch_start..].trim().is_empty() {
        out.truncate(branch_start - 1);
    }
    Ok(out)
}

fn push_class(out: &mut String, name: &str, scope: ScopeKind, names: &mut dyn ClassNames) {
    match scope {
        ScopeKind::Local => out.push_str(&names.local(name)),
        ScopeKind::Global => out.push_str(name),
    }
}

/// Walks a document tree, removing directives and rewriting selectors.
pub struct Rewriter {
    selectors: SelectorRewriter,
    front_ends: Vec<Box<dyn DirectiveFrontEnd>>,
}

impl Rewriter {
    /// Create a rewriter for the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            selectors: SelectorRewriter::new(config.modules),
            front_ends: directive::front_ends(&config.syntaxes),
        }
    }

    /// Rewrite `nodes` in place.
    ///
    /// Nested rules and at-rule blocks are walked recursively; each rule's
    /// selector starts from the default scope.
    pub fn walk(&self, nodes: &mut Vec<Node>, cx: &mut ModuleContext<'_>) -> Result<()> {
        let mut index = 0;

        while index < nodes.len() {
            if self.intercept(&nodes[index], cx)? {
                nodes.remove(index);
                continue;
            }

            if let Node::Rule(rule) = &mut nodes[index] {
                let rewritten = self.selectors.rewrite(&rule.selector, cx)?;
                tracing::trace!(
                    target: targets::REWRITE,
                    "'{}' -> '{}'",
                    rule.selector,
                    rewritten
                );
                rule.selector = rewritten;
            }

            if let Some(children) = nodes[index].children_mut() {
                self.walk(children, cx)?;
            }

            index += 1;
        }

        Ok(())
    }

    fn intercept(&self, node: &Node, cx: &mut ModuleContext<'_>) -> Result<bool> {
        for front_end in &self.front_ends {
            if front_end.intercept(node, cx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
