//! Document outline and request round-trips
//!
//! [`Extractor::outline`] parses a document once and lists every request and
//! declaration in it, grouped by kind. Each group is extracted from the same
//! tree; the edited copies the extractors produce are discarded.
//!
//! [`Extractor::insert_decomposition_request`] goes the other way: it writes
//! a request back as an attribute line under the function it names.

use crate::edit::{self, Edited};
use crate::error::{EditError, Result};
use crate::extract::{
    DecompositionRequest, EvalRequest, Extractor, ImportDeclaration, InstanceRequest,
    TheoremDeclaration, VerifyRequest,
};
use crate::parser::ast::{AstNode, ValueDefinition};
use crate::parser::{SyntaxNode, Tree, parse};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Everything the extractors find in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    pub verify_requests: Vec<VerifyRequest>,
    pub instance_requests: Vec<InstanceRequest>,
    pub decomposition_requests: Vec<DecompositionRequest>,
    pub opaque_names: Vec<String>,
    pub eval_requests: Vec<EvalRequest>,
    pub imports: Vec<ImportDeclaration>,
    pub theorems: Vec<TheoremDeclaration>,
}

/// Outline of `text` with the default extraction options
pub fn outline(text: &str) -> Result<Outline> {
    Extractor::new()?.outline(text)
}

impl Extractor {
    pub fn outline(&self, text: &str) -> Result<Outline> {
        let tree = parse(text);
        let outline = Outline {
            verify_requests: self.extract_verify_requests(text, &tree)?.requests,
            instance_requests: self.extract_instance_requests(text, &tree)?.requests,
            decomposition_requests: self.extract_decomposition_requests(text, &tree)?.requests,
            opaque_names: self
                .opaque_declarations(&tree)?
                .into_iter()
                .map(|decl| decl.name)
                .collect(),
            eval_requests: self.extract_eval_requests(text, &tree)?.requests,
            imports: self.import_declarations(&tree)?,
            theorems: self.theorem_declarations(&tree)?,
        };
        tracing::debug!(
            verify = outline.verify_requests.len(),
            instance = outline.instance_requests.len(),
            decomposition = outline.decomposition_requests.len(),
            opaque = outline.opaque_names.len(),
            "built outline"
        );
        Ok(outline)
    }

    /// Add `request` as an attribute line right after the binding of
    /// `request.name`.
    ///
    /// The binding must end its line: when an `and` binding or another item
    /// follows on the same line, the attribute would attach to that instead,
    /// so [`EditError::SharedLine`] is returned.
    pub fn insert_decomposition_request(
        &self,
        text: &str,
        tree: &Tree,
        request: &DecompositionRequest,
    ) -> Result<Edited> {
        let missing = || EditError::MissingTarget {
            name: request.name.clone(),
        };
        let definition = find_function_definition(tree, &request.name).ok_or_else(missing)?;
        let binding = ValueDefinition::cast(definition)
            .and_then(|def| {
                def.bindings()
                    .find(|binding| binding.name().as_deref() == Some(request.name.as_str()))
            })
            .ok_or_else(missing)?;
        let binding = binding.syntax();

        let last_row = tree.node_range(binding).end.row;
        let next_row = binding
            .last_token()
            .and_then(|token| {
                std::iter::successors(token.next_token(), |t| t.next_token())
                    .find(|t| !t.kind().is_trivia())
            })
            .map(|token| tree.point(token.text_range().start()).row);
        if next_row == Some(last_row) {
            return Err(EditError::SharedLine {
                name: request.name.clone(),
                row: last_row,
            }
            .into());
        }

        let attribute = self.render_attribute(request);
        Ok(edit::insert_lines(text, Some(tree), &[attribute], last_row)?)
    }
}

/// Top-level function definitions by name; the first definition of a name
/// wins.
pub fn function_index(tree: &Tree) -> FxHashMap<SmolStr, SyntaxNode> {
    let mut index = FxHashMap::default();
    for definition in tree.items().filter_map(ValueDefinition::cast) {
        for binding in definition.bindings() {
            if let Some(name) = binding.name() {
                index
                    .entry(name)
                    .or_insert_with(|| definition.syntax().clone());
            }
        }
    }
    index
}

pub fn find_function_definition(tree: &Tree, name: &str) -> Option<SyntaxNode> {
    function_index(tree).remove(name)
}
