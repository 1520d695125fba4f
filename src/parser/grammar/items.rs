//! Top-level item parsing
//!
//! ```text
//! item = value_definition
//!      | verify_statement | instance_statement | eval_statement
//!      | axiom_definition | theorem_definition | lemma_definition
//!      | type_definition | open_module | module_definition
//!      | floating_attribute | expression_item
//! ```
//!
//! Type and module definitions are kept as loose token runs: nothing
//! downstream looks inside them, but they must not swallow the next item.

use super::attributes::{parse_floating_attribute, parse_item_attributes};
use super::expressions::{at_expression_start, parse_expression, parse_sequence_expression};
use super::patterns::{at_parameter_start, parse_parameter, parse_pattern, parse_type_expression};
use super::{ImlParser, is_operator};
use crate::parser::syntax_kind::SyntaxKind;

/// Parse one top-level item. Always consumes at least one token.
pub fn parse_item<P: ImlParser>(p: &mut P) {
    match p.current_kind() {
        SyntaxKind::LET_KW => parse_top_level_let(p),
        SyntaxKind::VERIFY_KW => parse_statement(p, SyntaxKind::VERIFY_STATEMENT),
        SyntaxKind::INSTANCE_KW => parse_statement(p, SyntaxKind::INSTANCE_STATEMENT),
        SyntaxKind::EVAL_KW => parse_statement(p, SyntaxKind::EVAL_STATEMENT),
        SyntaxKind::AXIOM_KW => parse_named_definition(p, SyntaxKind::AXIOM_DEFINITION),
        SyntaxKind::THEOREM_KW => parse_named_definition(p, SyntaxKind::THEOREM_DEFINITION),
        SyntaxKind::LEMMA_KW => parse_named_definition(p, SyntaxKind::LEMMA_DEFINITION),
        SyntaxKind::TYPE_KW => parse_loose_item(p, SyntaxKind::TYPE_DEFINITION),
        SyntaxKind::MODULE_KW => parse_loose_item(p, SyntaxKind::MODULE_DEFINITION),
        SyntaxKind::OPEN_KW => parse_open_module(p),
        SyntaxKind::L_BRACKET_AT_AT_AT => parse_floating_attribute(p),
        _ if at_expression_start(p) => {
            p.start_node(SyntaxKind::EXPRESSION_ITEM);
            parse_sequence_expression(p);
            p.finish_node();
        }
        _ => {
            let mut recovery = vec![SyntaxKind::SEMI_SEMI];
            recovery.extend(SyntaxKind::all().filter(|k| k.starts_item()));
            p.error_recover("expected a top-level item", &recovery);
        }
    }
}

/// `let ...` or, when followed by `in`, an expression item
fn parse_top_level_let<P: ImlParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_value_definition(p);
    if p.at(SyntaxKind::IN_KW) {
        p.start_node_at(checkpoint, SyntaxKind::LET_EXPRESSION);
        p.bump();
        parse_sequence_expression(p);
        p.finish_node();
        p.start_node_at(checkpoint, SyntaxKind::EXPRESSION_ITEM);
        p.finish_node();
    }
}

/// `let [rec] binding (and binding)*`
pub fn parse_value_definition<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::VALUE_DEFINITION);
    p.bump(); // let
    p.eat(SyntaxKind::REC_KW);
    parse_let_binding(p);
    while p.at(SyntaxKind::AND_KW) {
        p.bump();
        parse_let_binding(p);
    }
    p.finish_node();
}

/// `name params [: type] = body [@@attr]*`
pub fn parse_let_binding<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::LET_BINDING);

    let operator_name = p.at(SyntaxKind::L_PAREN)
        && is_operator(p.peek_kind(1))
        && p.peek_kind(2) == SyntaxKind::R_PAREN;
    if p.at(SyntaxKind::IDENT) && p.current_text() != "_" {
        p.leaf(SyntaxKind::VALUE_NAME);
    } else if operator_name {
        p.start_node(SyntaxKind::VALUE_NAME);
        p.bump();
        p.bump();
        p.bump();
        p.finish_node();
    } else {
        parse_pattern(p);
    }

    while at_parameter_start(p) {
        parse_parameter(p);
    }
    if p.eat(SyntaxKind::COLON) {
        parse_type_expression(p, &[SyntaxKind::EQ]);
    }
    if p.expect(SyntaxKind::EQ) {
        parse_expression(p);
    }
    parse_item_attributes(p);
    p.finish_node();
}

/// `verify e [@@attr]*` and friends
fn parse_statement<P: ImlParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump(); // keyword
    parse_expression(p);
    parse_item_attributes(p);
    p.finish_node();
}

/// `theorem name params = body [@@by ...]`
fn parse_named_definition<P: ImlParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump(); // axiom / theorem / lemma
    parse_let_binding(p);
    p.finish_node();
}

/// `open Mod.Sub`
fn parse_open_module<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::OPEN_MODULE);
    p.bump(); // open
    if p.at(SyntaxKind::UIDENT) {
        p.start_node(SyntaxKind::MODULE_PATH);
        p.leaf(SyntaxKind::MODULE_NAME);
        while p.at(SyntaxKind::DOT) && p.peek_kind(1) == SyntaxKind::UIDENT {
            p.bump();
            p.leaf(SyntaxKind::MODULE_NAME);
        }
        p.finish_node();
    } else {
        p.missing("expected module name");
    }
    p.finish_node();
}

/// Keyword followed by every token up to the next item at bracket depth zero
fn parse_loose_item<P: ImlParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump(); // type / module
    let mut depth = 0usize;
    while !p.at_eof() {
        let current = p.current_kind();
        if depth == 0 && (current.starts_item() || current == SyntaxKind::SEMI_SEMI) {
            break;
        }
        match current {
            SyntaxKind::L_PAREN
            | SyntaxKind::L_BRACKET
            | SyntaxKind::L_BRACE
            | SyntaxKind::L_BRACKET_AT
            | SyntaxKind::L_BRACKET_AT_AT
            | SyntaxKind::L_BRACKET_AT_AT_AT
            | SyntaxKind::L_BRACKET_PERCENT
            | SyntaxKind::STRUCT_KW
            | SyntaxKind::SIG_KW
            | SyntaxKind::BEGIN_KW => depth += 1,
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE | SyntaxKind::END_KW => {
                depth = depth.saturating_sub(1)
            }
            _ => {}
        }
        p.bump();
    }
    p.finish_node();
}
