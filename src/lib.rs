//! # iml-query
//!
//! Structural queries, request extraction and tree edits for IML sources.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! outline   → Whole-document outline, request round-trips
//!   ↓
//! extract   → Typed requests from query matches
//!   ↓
//! edit      → Delete / insert with incremental reparse
//!   ↓
//! query     → Pattern compiler and matcher
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, rowan tree
//!   ↓
//! base      → Primitives (TextRange, Point, LineIndex)
//! ```
//!
//! ## Example
//!
//! ```
//! use iml_query::Extractor;
//!
//! let text = "let f x = x + 1\n[@@decomp top ~prune:true ()]\n";
//! let outline = Extractor::new()?.outline(text)?;
//! assert_eq!(outline.decomposition_requests[0].name, "f");
//! assert!(outline.decomposition_requests[0].prune);
//! # Ok::<(), iml_query::Error>(())
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → query → edit → extract → outline)
// ============================================================================

/// Foundation types: TextRange, Point, LineIndex
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, incremental reparse
pub mod parser;

/// Queries: tree-sitter style patterns over syntax trees
pub mod query;

/// Tree editor: text splices with point-edit bookkeeping
pub mod edit;

/// Request extractors and request records
pub mod extract;

/// Outline of a whole document
pub mod outline;

pub mod config;
pub mod error;

pub use base::{LineIndex, Point, PointRange, TextRange, TextSize};
pub use config::ExtractOptions;
pub use edit::{Edited, delete_nodes, delete_ranges, insert_lines};
pub use error::{CaptureArityError, EditError, Error, ExtractError, QueryError, Result};
pub use extract::{
    DecompositionRequest, EvalRequest, Extracted, Extractor, ImportDeclaration, InstanceRequest,
    LiftBool, NestedMeasure, NestedMeasures, OpaqueDeclaration, TheoremDeclaration, TheoremKind,
    VerifyRequest, nesting_level,
};
pub use outline::{Outline, find_function_definition, function_index, outline};
pub use parser::{InputEdit, SyntaxKind, SyntaxNode, Tree, parse, reparse};
pub use query::{Query, QueryMatch};
