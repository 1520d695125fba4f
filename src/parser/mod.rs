//! Rowan-based parser for IML
//!
//! This module provides a lossless, incrementally reparsable tree using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → one GreenNode per top-level item, under a compilation_unit root
//!     ↓
//! Tree → SyntaxNode (rowan) with fields derived from node shapes
//!     ↓
//! Queries / typed AST wrappers
//! ```
//!
//! ## Incremental Reparsing
//!
//! When text changes, we:
//! 1. Map every old top-level item through the recorded [`InputEdit`]s
//! 2. Drop items whose text or lookahead token an edit touched
//! 3. Splice the remaining green nodes back in after checking that their
//!    text reappears verbatim at the shifted offset

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod fields;
pub mod grammar;
mod lexer;
mod reparse;
mod syntax_kind;
mod tree;

pub use fields::Field;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::SyntaxError;
pub use reparse::{InputEdit, reparse};
pub use syntax_kind::{ImlLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use tree::{NodeExt, Tree, parse, sexp};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
