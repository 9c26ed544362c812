//! Cross-file directive front-ends.
//!
//! Two grammars declare references into other files. Each one is a
//! [`DirectiveFrontEnd`] that recognizes its own nodes and binds names
//! through the shared [`ModuleContext`]:
//!
//! - `@use (.a, .b as .c) from './file';` ([`UseFrontEnd`], the default)
//! - `:import { alias: "from './file'"; }` plus `alias::class` references
//!   in selectors ([`ImportFrontEnd`])
//!
//! Recognized directive nodes are removed from the output.

mod import_rule;
mod lexer;
mod use_rule;

pub use import_rule::{ImportFrontEnd, ImportSource};
pub use lexer::{Token, tokenize};
pub use use_rule::{UseDirective, UseFrontEnd, UseReference};

use crate::config::DirectiveSyntax;
use crate::document::Node;
use crate::resolve::ModuleContext;
use crate::Result;

/// A directive grammar feeding the reference resolver.
pub trait DirectiveFrontEnd: Send + Sync {
    /// The grammar this front-end implements.
    fn syntax(&self) -> DirectiveSyntax;

    /// Handle `node` if it is one of this front-end's directives.
    ///
    /// Returns `true` when the node was consumed and must be removed.
    fn intercept(&self, node: &Node, cx: &mut ModuleContext<'_>) -> Result<bool>;
}

/// Build the front-ends for the enabled grammars, in the given order.
pub fn front_ends(syntaxes: &[DirectiveSyntax]) -> Vec<Box<dyn DirectiveFrontEnd>> {
    let mut out: Vec<Box<dyn DirectiveFrontEnd>> = vec![];
    for syntax in syntaxes {
        if out.iter().any(|f| f.syntax() == *syntax) {
            continue;
        }
        match syntax {
            DirectiveSyntax::Use => out.push(Box::new(UseFrontEnd)),
            DirectiveSyntax::Import => out.push(Box::new(ImportFrontEnd)),
        }
    }
    out
}
