//! Structural queries over IML syntax trees
//!
//! A [`Query`] is compiled once from a tree-sitter style pattern source and
//! can then be run against any node of any tree:
//!
//! ```text
//! (value_definition
//!   (let_binding
//!     pattern: (value_name) @name
//!     (item_attribute (attribute_id) @id (#eq? @id "decomp"))))
//! ```
//!
//! Matches come back in pre-order. A node yields one match for every
//! distinct way the first matching pattern binds its captures, so a
//! `value_definition` with two decorated `and` bindings yields two. Captures
//! under `?`, `*` or `+` do not tell matches apart: those keep the first
//! (longest) binding found. Each match maps capture names to the nodes bound
//! to them, in source order.

mod compile;
mod lexer;
mod matcher;

use crate::error::{CaptureArityError, QueryError};
use crate::parser::SyntaxNode;
use compile::Pattern;
use indexmap::IndexMap;
use matcher::Bindings;
use rowan::WalkEvent;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// A compiled query: one or more top-level patterns
#[derive(Debug, Clone)]
pub struct Query {
    patterns: Vec<Pattern>,
    /// Per pattern, the captures left out of match identity
    quantified: Vec<FxHashSet<SmolStr>>,
}

impl Query {
    /// Compile `source`, validating every node type, field and capture
    /// reference against the grammar.
    pub fn new(source: &str) -> Result<Self, QueryError> {
        let patterns = compile::compile(source)?;
        let quantified = patterns.iter().map(Pattern::quantified_captures).collect();
        tracing::trace!(patterns = patterns.len(), "compiled query");
        Ok(Self {
            patterns,
            quantified,
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// All matches in the subtree rooted at `node`, `node` itself included.
    ///
    /// At each node the patterns are tried in order and the first one that
    /// matches wins; every distinct binding of that pattern is reported.
    pub fn matches(&self, node: &SyntaxNode) -> Vec<QueryMatch> {
        let mut matches = Vec::new();
        for event in node.preorder() {
            let WalkEvent::Enter(current) = event else {
                continue;
            };
            for (pattern_index, pattern) in self.patterns.iter().enumerate() {
                let solutions = matcher::match_root(pattern, &current);
                if solutions.is_empty() {
                    continue;
                }
                let mut seen = FxHashSet::default();
                for bindings in solutions {
                    if !seen.insert(self.identity(pattern_index, &bindings)) {
                        continue;
                    }
                    tracing::trace!(
                        pattern_index,
                        kind = current.kind().name(),
                        range = ?current.text_range(),
                        "query match"
                    );
                    matches.push(QueryMatch::new(pattern_index, current.clone(), bindings));
                }
                break;
            }
        }
        matches
    }

    /// Nodes bound to the captures that tell matches of one pattern apart
    fn identity(&self, pattern_index: usize, bindings: &Bindings) -> Vec<(SmolStr, u32, u32, u16)> {
        let quantified = &self.quantified[pattern_index];
        let mut key: Vec<(SmolStr, u32, u32, u16)> = bindings
            .iter()
            .filter(|(name, _)| !quantified.contains(name))
            .map(|(name, node)| {
                let range = node.text_range();
                (name.clone(), range.start().into(), range.end().into(), node.kind() as u16)
            })
            .collect();
        key.sort_unstable();
        key
    }
}

/// One successful match of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatch {
    pub pattern_index: usize,
    /// Node the pattern matched at
    pub node: SyntaxNode,
    pub captures: IndexMap<SmolStr, Vec<SyntaxNode>>,
}

impl QueryMatch {
    fn new(pattern_index: usize, node: SyntaxNode, bindings: Bindings) -> Self {
        let mut captures: IndexMap<SmolStr, Vec<SyntaxNode>> = IndexMap::new();
        for (name, bound) in bindings {
            if name.starts_with('_') {
                continue;
            }
            captures.entry(name).or_default().push(bound);
        }
        for nodes in captures.values_mut() {
            nodes.sort_by_key(|n| n.text_range().start());
        }
        Self {
            pattern_index,
            node,
            captures,
        }
    }

    /// Nodes bound to `name`; empty when the capture never bound
    pub fn nodes(&self, name: &str) -> &[SyntaxNode] {
        self.captures.get(name).map_or(&[], Vec::as_slice)
    }

    /// The one node bound to `name`
    pub fn single(&self, name: &str) -> Result<&SyntaxNode, CaptureArityError> {
        match self.nodes(name) {
            [node] => Ok(node),
            nodes => Err(CaptureArityError {
                capture: name.to_string(),
                expected: "exactly one",
                found: nodes.len(),
            }),
        }
    }

    /// The node bound to `name`, if any; more than one is an error
    pub fn optional(&self, name: &str) -> Result<Option<&SyntaxNode>, CaptureArityError> {
        match self.nodes(name) {
            [] => Ok(None),
            [node] => Ok(Some(node)),
            nodes => Err(CaptureArityError {
                capture: name.to_string(),
                expected: "at most one",
                found: nodes.len(),
            }),
        }
    }

    /// Source text of the one node bound to `name`
    pub fn text(&self, name: &str) -> Result<String, CaptureArityError> {
        self.single(name).map(|node| node.text().to_string())
    }
}
