//! Error types for queries, extraction and editing.
//!
//! Parsing itself never fails: syntax errors live on the [`Tree`](crate::parser::Tree)
//! as ERROR nodes. Everything below is fatal at the point of detection and is
//! propagated to the caller unchanged.

use crate::parser::TextRange;
use std::ops::Range;
use thiserror::Error;

/// Errors raised while compiling a query pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Malformed pattern source.
    #[error("Query syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Node type or field name unknown to the grammar, or a field used on a
    /// node type that never carries it.
    #[error("Grammar mismatch at offset {offset}: {message}")]
    GrammarMismatch { offset: usize, message: String },

    /// Predicate refers to a capture the pattern never declares.
    #[error("Unknown capture `@{name}` at offset {offset}")]
    UnknownCapture { name: String, offset: usize },

    /// `#match?` with a pattern the regex engine rejects.
    #[error("Invalid regex `{pattern}`: {message}")]
    InvalidRegex { pattern: String, message: String },
}

impl QueryError {
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub fn unknown_node_type(name: &str, offset: usize) -> Self {
        Self::GrammarMismatch {
            offset,
            message: format!("unknown node type `{name}`"),
        }
    }

    pub fn unknown_field(name: &str, offset: usize) -> Self {
        Self::GrammarMismatch {
            offset,
            message: format!("unknown field `{name}`"),
        }
    }

    pub fn field_not_applicable(field: &str, parent: &str, offset: usize) -> Self {
        Self::GrammarMismatch {
            offset,
            message: format!("field `{field}` is not valid on `{parent}`"),
        }
    }
}

/// A capture held a different number of nodes than the caller required.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Capture `@{capture}` expected {expected} node(s), found {found}")]
pub struct CaptureArityError {
    pub capture: String,
    pub expected: &'static str,
    pub found: usize,
}

/// Errors raised while turning matches into requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A decomposition argument could not be interpreted.
    #[error("Decomposition parsing error: {0}")]
    DecompParsing(String),

    /// The payload is not a plain configuration call.
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),

    /// The matched subtree contains parser error markers.
    #[error("Malformed {kind} at {range:?}: source contains syntax errors")]
    Malformed { kind: &'static str, range: TextRange },

    /// An extractor was handed a node of the wrong kind.
    #[error("Expected {expected} node, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    CaptureArity(#[from] CaptureArityError),
}

impl ExtractError {
    /// Enumerated argument outside its fixed set.
    pub fn invalid_value(label: &str, value: &str, valid: &[&str]) -> Self {
        Self::DecompParsing(format!(
            "invalid value `{value}` for `{label}`, expected one of: {}",
            valid.join(", ")
        ))
    }

    pub fn unexpected_label(label: &str) -> Self {
        Self::DecompParsing(format!("unexpected label `{label}`"))
    }

    pub fn malformed_argument(label: &str, expected: &str) -> Self {
        Self::DecompParsing(format!("argument `{label}` must be {expected}"))
    }
}

/// Errors raised by the tree editor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Two deletion ranges overlap.
    #[error("Overlapping nodes: positions {first:?} and {second:?}")]
    Overlap {
        first: Range<usize>,
        second: Range<usize>,
    },

    /// Insertion line outside `0..=max`.
    #[error("Line index {index} out of range, expected 0..={max}")]
    RangeBounds { index: usize, max: usize },

    /// No top-level definition with the requested name.
    #[error("No function definition named `{name}`")]
    MissingTarget { name: String },

    /// The named binding ends on a line that other code continues.
    #[error("Binding `{name}` shares line {row} with following code")]
    SharedLine { name: String, row: usize },

    /// Range past the end of the text or inside a UTF-8 sequence.
    #[error("Range {range:?} is outside the text of length {len} or splits a character")]
    OutOfBounds { range: Range<usize>, len: usize },
}

/// Any error this crate reports
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl From<CaptureArityError> for Error {
    fn from(err: CaptureArityError) -> Self {
        Self::Extract(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_message_names_both_ranges() {
        let err = EditError::Overlap {
            first: 0..10,
            second: 5..15,
        };
        assert_eq!(
            err.to_string(),
            "Overlapping nodes: positions 0..10 and 5..15"
        );
    }

    #[test]
    fn test_invalid_value_lists_valid_set() {
        let err = ExtractError::invalid_value("lift_bool", "Sometimes", &["Default", "All"]);
        let message = err.to_string();
        assert!(message.contains("Sometimes"));
        assert!(message.contains("Default, All"));
    }
}
