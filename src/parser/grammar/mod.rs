//! Grammar modules for IML parsing
//!
//! The parsing logic is split by construct:
//! - `items` - top-level items (definitions, statements, type/open/module runs)
//! - `attributes` - item/floating attributes and extensions
//! - `expressions` - expression precedence chain
//! - `patterns` - patterns, parameters and loose type expressions
//!
//! The parsing functions are generic over [`ImlParser`] so they stay
//! independent of how the parser stores its tokens and builder.

pub mod attributes;
pub mod expressions;
pub mod items;
pub mod patterns;

use crate::parser::syntax_kind::SyntaxKind;
use rowan::Checkpoint;

pub use expressions::{parse_expression, parse_sequence_expression};
pub use items::parse_item;
pub use patterns::parse_pattern;

/// Interface between the grammar functions and the parser
pub trait ImlParser {
    // Token inspection
    fn current_kind(&self) -> SyntaxKind;
    fn current_text(&self) -> &str;
    fn at(&self, kind: SyntaxKind) -> bool;
    fn at_any(&self, kinds: &[SyntaxKind]) -> bool;
    fn at_eof(&self) -> bool;

    /// Peek at the kind of the nth token ahead (skipping trivia)
    fn peek_kind(&self, n: usize) -> SyntaxKind;

    /// Kind of the token directly after the current one, trivia included
    fn raw_next_kind(&self) -> SyntaxKind;

    // Position tracking
    fn get_pos(&self) -> usize;

    // Token consumption
    fn bump(&mut self);
    fn bump_string(&mut self);
    fn eat(&mut self, kind: SyntaxKind) -> bool;
    fn expect(&mut self, kind: SyntaxKind) -> bool;

    // Errors
    fn error(&mut self, message: &str);
    fn error_recover(&mut self, message: &str, recovery: &[SyntaxKind]);

    // Node building
    fn start_node(&mut self, kind: SyntaxKind);
    fn finish_node(&mut self);
    fn checkpoint(&mut self) -> Checkpoint;
    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind);

    /// Wrap the current token into a leaf node of `kind`
    fn leaf(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// Wrap the single current token into an ERROR node
    fn error_token(&mut self, message: &str) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }

    /// Insert an empty ERROR node so the gap shows up in the tree
    fn missing(&mut self, message: &str) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        self.finish_node();
    }
}

/// Tokens that close a construct; an expression never starts here
pub(crate) const STOP_TOKENS: &[SyntaxKind] = &[
    SyntaxKind::R_PAREN,
    SyntaxKind::R_BRACKET,
    SyntaxKind::R_BRACE,
    SyntaxKind::IN_KW,
    SyntaxKind::THEN_KW,
    SyntaxKind::ELSE_KW,
    SyntaxKind::WITH_KW,
    SyntaxKind::WHEN_KW,
    SyntaxKind::AND_KW,
    SyntaxKind::END_KW,
    SyntaxKind::PIPE,
    SyntaxKind::ARROW,
    SyntaxKind::SEMICOLON,
    SyntaxKind::SEMI_SEMI,
    SyntaxKind::COMMA,
    SyntaxKind::L_BRACKET_AT_AT,
];

/// Is the current token one that ends the surrounding construct?
pub(crate) fn at_stop<P: ImlParser>(p: &P) -> bool {
    p.at_eof() || p.at_any(STOP_TOKENS) || p.current_kind().starts_item()
}

/// Operator tokens that can appear as `( op )` values
pub(crate) fn is_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::INFIX_OP
            | SyntaxKind::PREFIX_OP
            | SyntaxKind::STAR
            | SyntaxKind::MINUS
            | SyntaxKind::MINUS_DOT
            | SyntaxKind::EQ
            | SyntaxKind::MOD_KW
            | SyntaxKind::OR_KW
            | SyntaxKind::COLON_COLON
    )
}
