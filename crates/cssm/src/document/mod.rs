//! Parsed stylesheet tree.
//!
//! The scoping transform works on this tree: directive nodes are removed and
//! rule selectors are rewritten in place. [`parse_document`] builds a tree
//! from CSS text and the [`Display`](fmt::Display) impl writes it back out in
//! a normalized layout.

mod parser;

use std::fmt;
use std::path::{Path, PathBuf};

pub use parser::parse_document;

/// A parsed stylesheet identified by its file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Resolved path of the file.
    pub path: PathBuf,
    /// Original source text. Seeds content-based name generation.
    pub source: String,
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
}

impl Document {
    /// Create a document from already-built nodes.
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            nodes,
        }
    }

    /// Parse a document from CSS text.
    pub fn parse(path: impl AsRef<Path>, source: &str) -> crate::Result<Self> {
        parse_document(path, source)
    }

    /// Collect every rule in the tree, depth first.
    pub fn rules(&self) -> Vec<&Rule> {
        let mut out = vec![];
        collect_rules(&self.nodes, &mut out);
        out
    }
}

fn collect_rules<'a>(nodes: &'a [Node], out: &mut Vec<&'a Rule>) {
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                out.push(rule);
                collect_rules(&rule.nodes, out);
            }
            Node::AtRule(at_rule) => {
                if let Some(children) = &at_rule.nodes {
                    collect_rules(children, out);
                }
            }
            Node::Declaration(_) => {}
        }
    }
}

/// A node in the stylesheet tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `selector { ... }`
    Rule(Rule),
    /// `@name params;` or `@name params { ... }`
    AtRule(AtRule),
    /// `property: value`
    Declaration(Declaration),
}

impl Node {
    /// Child nodes, if this node is a container.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Rule(rule) => Some(&mut rule.nodes),
            Node::AtRule(at_rule) => at_rule.nodes.as_mut(),
            Node::Declaration(_) => None,
        }
    }
}

/// A style rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Raw selector text.
    pub selector: String,
    /// Declarations and nested rules.
    pub nodes: Vec<Node>,
}

impl Rule {
    /// Create a rule.
    pub fn new(selector: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            selector: selector.into(),
            nodes,
        }
    }
}

/// An at-rule such as `@media` or `@use`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the leading `@`.
    pub name: String,
    /// Raw prelude text.
    pub params: String,
    /// Block contents, or `None` for a statement at-rule.
    pub nodes: Option<Vec<Node>>,
}

impl AtRule {
    /// Create a statement at-rule (`@name params;`).
    pub fn statement(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: None,
        }
    }

    /// Create a block at-rule (`@name params { ... }`).
    pub fn block(name: impl Into<String>, params: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: Some(nodes),
        }
    }
}

/// A property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name.
    pub property: String,
    /// Raw value text.
    pub value: String,
}

impl Declaration {
    /// Create a declaration.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write_node(f, node, 0)?;
        }
        Ok(())
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        Node::Rule(rule) => {
            writeln!(f, "{indent}{} {{", rule.selector)?;
            write_children(f, &rule.nodes, depth)?;
            writeln!(f, "{indent}}}")
        }
        Node::AtRule(at_rule) => {
            write!(f, "{indent}@{}", at_rule.name)?;
            if !at_rule.params.is_empty() {
                write!(f, " {}", at_rule.params)?;
            }
            match &at_rule.nodes {
                Some(children) => {
                    writeln!(f, " {{")?;
                    write_children(f, children, depth)?;
                    writeln!(f, "{indent}}}")
                }
                None => writeln!(f, ";"),
            }
        }
        Node::Declaration(decl) => writeln!(f, "{indent}{}: {};", decl.property, decl.value),
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, nodes: &[Node], depth: usize) -> fmt::Result {
    for node in nodes {
        write_node(f, node, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_normalizes_layout() {
        let document = Document::new(
            "a.css",
            "",
            vec![
                Node::AtRule(AtRule::statement("charset", "\"utf-8\"")),
                Node::Rule(Rule::new(
                    ".a",
                    vec![Node::Declaration(Declaration::new("color", "red"))],
                )),
                Node::AtRule(AtRule::block(
                    "media",
                    "screen",
                    vec![Node::Rule(Rule::new(".b", vec![]))],
                )),
            ],
        );

        assert_eq!(
            document.to_string(),
            "@charset \"utf-8\";\n\n.a {\n  color: red;\n}\n\n@media screen {\n  .b {\n  }\n}\n"
        );
    }

    #[test]
    fn rules_walks_nested_blocks() {
        let document = Document::new(
            "a.css",
            "",
            vec![Node::AtRule(AtRule::block(
                "media",
                "print",
                vec![Node::Rule(Rule::new(
                    ".outer",
                    vec![Node::Rule(Rule::new(".inner", vec![]))],
                ))],
            ))],
        );

        let selectors: Vec<&str> = document.rules().iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec![".outer", ".inner"]);
    }
}
