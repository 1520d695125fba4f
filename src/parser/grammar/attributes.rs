//! Attribute and extension parsing
//!
//! ```text
//! item_attribute     = '[@@'  attribute_id attribute_payload? ']'
//! floating_attribute = '[@@@' attribute_id attribute_payload? ']'
//! attribute          = '[@'   attribute_id attribute_payload? ']'
//! extension          = '[%'   attribute_id attribute_payload? ']'
//! attribute_payload  = expression_item
//! ```

use super::ImlParser;
use super::expressions::{at_expression_start, parse_sequence_expression};
use crate::parser::syntax_kind::SyntaxKind;

/// Zero or more `[@@id payload]` after a definition or statement
pub fn parse_item_attributes<P: ImlParser>(p: &mut P) {
    while p.at(SyntaxKind::L_BRACKET_AT_AT) {
        parse_bracketed(p, SyntaxKind::ITEM_ATTRIBUTE);
    }
}

pub fn parse_floating_attribute<P: ImlParser>(p: &mut P) {
    parse_bracketed(p, SyntaxKind::FLOATING_ATTRIBUTE);
}

pub fn parse_extension<P: ImlParser>(p: &mut P) {
    parse_bracketed(p, SyntaxKind::EXTENSION);
}

/// Shared shape of attributes and extensions; the opener is the current token.
fn parse_bracketed<P: ImlParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump(); // [@@ / [@@@ / [@ / [%
    parse_attribute_id(p);

    if !p.at(SyntaxKind::R_BRACKET) && at_expression_start(p) {
        p.start_node(SyntaxKind::ATTRIBUTE_PAYLOAD);
        p.start_node(SyntaxKind::EXPRESSION_ITEM);
        parse_sequence_expression(p);
        p.finish_node();
        p.finish_node();
    }

    if !p.at(SyntaxKind::R_BRACKET) && !p.at_eof() && !p.current_kind().starts_item() {
        p.error_recover("expected R_BRACKET", &[SyntaxKind::R_BRACKET]);
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

/// Dotted identifier such as `decomp` or `ocaml.warning`; keywords are allowed
fn parse_attribute_id<P: ImlParser>(p: &mut P) {
    if !at_id_segment(p.current_kind()) {
        p.missing("expected attribute id");
        return;
    }
    p.start_node(SyntaxKind::ATTRIBUTE_ID);
    p.bump();
    while p.at(SyntaxKind::DOT) && at_id_segment(p.peek_kind(1)) {
        p.bump();
        p.bump();
    }
    p.finish_node();
}

fn at_id_segment(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::IDENT | SyntaxKind::UIDENT) || kind.is_keyword()
}
