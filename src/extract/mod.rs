//! Request extraction
//!
//! An [`Extractor`] owns the compiled queries for every statement and
//! attribute kind. Each `*_request` method turns one query match into a
//! typed record; each `extract_*_requests` method runs a query over a whole
//! document and also returns a copy of the document with the matched nodes
//! removed.
//!
//! ```text
//! Tree ──query──▶ QueryMatch ──extractor──▶ Request
//!   │                  │
//!   └──── edit ◀───────┘ (matched nodes deleted from a private copy)
//! ```

mod declarations;
mod decomp;
mod measures;
mod requests;
mod statements;

pub use measures::{NestedMeasure, NestedMeasures, nesting_level};
pub use requests::{
    DecompositionRequest, EvalRequest, ImportDeclaration, InstanceRequest, LiftBool,
    OpaqueDeclaration, TheoremDeclaration, TheoremKind, VerifyRequest,
};
pub use statements::strip_wrapping_parens;

use crate::config::ExtractOptions;
use crate::edit;
use crate::error::{ExtractError, QueryError, Result};
use crate::parser::{SyntaxNode, Tree, parse};
use crate::query::{Query, QueryMatch};

/// Compiled queries used by the extractors
#[derive(Debug, Clone)]
pub struct Queries {
    pub verify: Query,
    pub instance: Query,
    pub eval: Query,
    pub theorem: Query,
    pub decomposition: Query,
    pub opaque: Query,
    pub import: Query,
    pub measure: Query,
    pub top_arguments: Query,
}

impl Queries {
    pub fn new(options: &ExtractOptions) -> Result<Self, QueryError> {
        let quoted = ExtractOptions::quoted;
        Ok(Self {
            verify: Query::new("(verify_statement) @statement")?,
            instance: Query::new("(instance_statement) @statement")?,
            eval: Query::new("(eval_statement) @statement")?,
            theorem: Query::new(
                "[(axiom_definition) (theorem_definition) (lemma_definition)] @definition",
            )?,
            decomposition: Query::new(&format!(
                r#"
                (value_definition
                  (let_binding
                    pattern: (value_name) @name
                    (item_attribute
                      (attribute_id) @_id
                      (attribute_payload) @payload
                      (#eq? @_id {})) @attribute))
                "#,
                quoted(&options.decomp_attribute)
            ))?,
            opaque: Query::new(&format!(
                r#"
                (value_definition
                  (let_binding
                    pattern: (value_name) @name
                    (item_attribute
                      (attribute_id) @_id
                      (#eq? @_id {})) @attribute)) @definition
                "#,
                quoted(&options.opaque_attribute)
            ))?,
            import: Query::new(&format!(
                r#"
                (floating_attribute
                  "[@@@"
                  (attribute_id) @_id
                  (#eq? @_id {})
                  (attribute_payload)? @payload) @import
                "#,
                quoted(&options.import_attribute)
            ))?,
            measure: Query::new(&format!(
                r#"
                (value_definition
                  (let_binding
                    pattern: (value_name) @name
                    (item_attribute
                      (attribute_id) @_id
                      (#eq? @_id {})))) @definition
                "#,
                quoted(&options.measure_attribute)
            ))?,
            top_arguments: Query::new(&format!(
                r#"
                (application_expression
                  function: (value_path (value_name) @_head (#eq? @_head {}))
                  (labeled_argument)* @arguments
                  (unit) @unit)
                "#,
                quoted(&options.decomp_head)
            ))?,
        })
    }
}

/// Requests found in a document, plus the document without their nodes
#[derive(Debug, Clone)]
pub struct Extracted<R> {
    pub text: String,
    pub tree: Tree,
    pub requests: Vec<R>,
}

/// Extraction rules over a set of compiled queries
#[derive(Debug, Clone)]
pub struct Extractor {
    options: ExtractOptions,
    queries: Queries,
}

impl Extractor {
    pub fn new() -> Result<Self, QueryError> {
        Self::with_options(ExtractOptions::default())
    }

    pub fn with_options(options: ExtractOptions) -> Result<Self, QueryError> {
        let queries = Queries::new(&options)?;
        Ok(Self { options, queries })
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }

    /// `[@@decomp ...]` text for `request`, using this extractor's ids
    pub fn render_attribute(&self, request: &DecompositionRequest) -> String {
        format!(
            "[@@{} {}]",
            self.options.decomp_attribute,
            request.render_top(&self.options.decomp_head, &self.options.reference_extension)
        )
    }

    pub fn extract_verify_requests(&self, text: &str, tree: &Tree) -> Result<Extracted<VerifyRequest>> {
        self.extract_with(text, tree, &self.queries.verify, "statement", |m| {
            self.verify_request(m)
        })
    }

    pub fn extract_instance_requests(
        &self,
        text: &str,
        tree: &Tree,
    ) -> Result<Extracted<InstanceRequest>> {
        self.extract_with(text, tree, &self.queries.instance, "statement", |m| {
            self.instance_request(m)
        })
    }

    pub fn extract_eval_requests(&self, text: &str, tree: &Tree) -> Result<Extracted<EvalRequest>> {
        self.extract_with(text, tree, &self.queries.eval, "statement", |m| {
            self.eval_request(m)
        })
    }

    /// Decomposition requests; only the `[@@decomp ...]` attributes are removed.
    pub fn extract_decomposition_requests(
        &self,
        text: &str,
        tree: &Tree,
    ) -> Result<Extracted<DecompositionRequest>> {
        self.extract_with(text, tree, &self.queries.decomposition, "attribute", |m| {
            self.decomposition_request(m)
        })
    }

    /// Run `query`, convert every match, then delete each match's `removed` capture.
    fn extract_with<R>(
        &self,
        text: &str,
        tree: &Tree,
        query: &Query,
        removed: &str,
        mut convert: impl FnMut(&QueryMatch) -> Result<R, ExtractError>,
    ) -> Result<Extracted<R>> {
        let matches = query.matches(&tree.root());
        let mut requests = Vec::with_capacity(matches.len());
        let mut nodes: Vec<SyntaxNode> = Vec::with_capacity(matches.len());
        for m in &matches {
            requests.push(convert(m)?);
            nodes.push(m.single(removed)?.clone());
        }

        let edited = edit::delete_nodes(text, Some(tree), &nodes)?;
        let tree = match edited.tree {
            Some(tree) => tree,
            None => parse(&edited.text),
        };
        tracing::debug!(requests = requests.len(), "extracted requests");
        Ok(Extracted {
            text: edited.text,
            tree,
            requests,
        })
    }
}
