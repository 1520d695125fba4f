//! Parsed trees and node helpers
//!
//! A [`Tree`] owns an immutable green root plus the syntax errors found while
//! building it. Green nodes are reference counted, so cloning a tree or
//! reparsing it shares every unchanged item.

use super::fields::{Field, children_with_fields, field_of};
use super::parser::{ParseOutput, SyntaxError, parse_items};
use super::syntax_kind::{SyntaxKind, SyntaxNode};
use crate::base::{LineIndex, Point, PointRange, TextSize};
use rowan::GreenNode;
use std::fmt::Write;

/// A parsed IML document
#[derive(Debug, Clone)]
pub struct Tree {
    green: GreenNode,
    errors: Vec<SyntaxError>,
    error_owners: Vec<TextSize>,
    line_index: LineIndex,
    reused: usize,
}

/// Trees are equal when they have the same structure and errors, however
/// they were built.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.green == other.green && self.errors == other.errors
    }
}

impl Eq for Tree {}

/// Parse IML source. Never fails; problems become ERROR nodes.
pub fn parse(text: &str) -> Tree {
    let tree = Tree::from_output(text, parse_items(text, &[]));
    tracing::debug!(
        items = tree.items().count(),
        errors = tree.errors.len(),
        "parsed document"
    );
    tree
}

impl Tree {
    pub(crate) fn from_output(text: &str, output: ParseOutput) -> Self {
        Self {
            green: output.green,
            errors: output.errors,
            error_owners: output.owners,
            line_index: LineIndex::new(text),
            reused: output.reused,
        }
    }

    /// Fresh red root over the green tree.
    ///
    /// Every call builds a new root; compare nodes from different calls by
    /// range, not by identity.
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// The full source text; byte-identical to the parsed input
    pub fn text(&self) -> String {
        self.green.to_string()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors raised while parsing the top-level item starting at `offset`,
    /// which may lie past the item's own text.
    pub(crate) fn item_errors(&self, offset: TextSize) -> impl Iterator<Item = &SyntaxError> {
        self.errors
            .iter()
            .zip(&self.error_owners)
            .filter(move |(_, owner)| **owner == offset)
            .map(|(error, _)| error)
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Number of top-level items taken over from a previous tree
    pub fn reused_items(&self) -> usize {
        self.reused
    }

    pub fn point(&self, offset: TextSize) -> Point {
        self.line_index.point(offset)
    }

    pub fn node_range(&self, node: &SyntaxNode) -> PointRange {
        self.line_index.point_range(node.text_range())
    }

    /// Top-level item nodes in source order
    pub fn items(&self) -> impl Iterator<Item = SyntaxNode> {
        self.root().children()
    }
}

/// Tree-sitter flavoured accessors on syntax nodes
pub trait NodeExt {
    /// Vocabulary name of the node's kind, e.g. `value_definition`
    fn kind_name(&self) -> &'static str;

    fn byte_range(&self) -> std::ops::Range<usize>;

    /// Does this subtree contain an ERROR node?
    fn has_error(&self) -> bool;

    /// Child nodes, in order; tokens are skipped
    fn named_children(&self) -> Vec<SyntaxNode>;

    fn child_by_field(&self, field: Field) -> Option<SyntaxNode>;

    fn children_by_field(&self, field: Field) -> Vec<SyntaxNode>;

    /// Field this node occupies in its parent
    fn field_name(&self) -> Option<Field>;
}

impl NodeExt for SyntaxNode {
    fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    fn byte_range(&self) -> std::ops::Range<usize> {
        let range = self.text_range();
        usize::from(range.start())..usize::from(range.end())
    }

    fn has_error(&self) -> bool {
        self.descendants_with_tokens()
            .any(|element| element.kind() == SyntaxKind::ERROR)
    }

    fn named_children(&self) -> Vec<SyntaxNode> {
        self.children().collect()
    }

    fn child_by_field(&self, field: Field) -> Option<SyntaxNode> {
        children_with_fields(self)
            .into_iter()
            .find(|(_, f)| *f == Some(field))
            .map(|(node, _)| node)
    }

    fn children_by_field(&self, field: Field) -> Vec<SyntaxNode> {
        children_with_fields(self)
            .into_iter()
            .filter(|(_, f)| *f == Some(field))
            .map(|(node, _)| node)
            .collect()
    }

    fn field_name(&self) -> Option<Field> {
        field_of(self)
    }
}

/// Compact S-expression of a node: kinds, fields, and nothing else.
///
/// `(value_definition (let_binding pattern: (value_name) body: (number)))`
pub fn sexp(node: &SyntaxNode) -> String {
    let mut out = String::new();
    write_sexp(node, &mut out);
    out
}

fn write_sexp(node: &SyntaxNode, out: &mut String) {
    let _ = write!(out, "({}", node.kind_name());
    for (child, field) in children_with_fields(node) {
        out.push(' ');
        if let Some(field) = field {
            let _ = write!(out, "{}: ", field);
        }
        write_sexp(&child, out);
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_text_is_lossless() {
        let text = "let f x = x\n(* done *)\n";
        let tree = parse(text);
        assert_eq!(tree.text(), text);
        assert!(!tree.has_errors());
    }

    #[test]
    fn test_node_range_points() {
        let tree = parse("let a = 1\n\nverify a\n");
        let items: Vec<_> = tree.items().collect();
        assert_eq!(items.len(), 2);
        let range = tree.node_range(&items[1]);
        assert_eq!(range.start, Point::new(2, 0));
        assert_eq!(range.end, Point::new(2, 8));
    }

    #[test]
    fn test_sexp_has_fields() {
        let tree = parse("let f x = g x");
        let item = tree.items().next();
        assert_eq!(
            item.as_ref().map(sexp).as_deref(),
            Some(
                "(value_definition (let_binding pattern: (value_name) (parameter pattern: (value_pattern)) \
                 body: (application_expression function: (value_path (value_name)) argument: (value_path (value_name)))))"
            )
        );
    }
}
