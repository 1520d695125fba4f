//! Pattern, parameter and type expression parsing
//!
//! Pattern precedence, loosest first:
//!
//! ```text
//! p as x        alias
//! p | p         or
//! p , p         tuple
//! p :: p        cons (right)
//! Ctor p        constructor application
//! simple        x, _, literals, (p), (p : t), [p; p], { f = p }, Ctor
//! ```

use super::expressions::{parse_expression, parse_uppercase_path};
use super::{ImlParser, at_stop};
use crate::parser::syntax_kind::SyntaxKind;

pub fn parse_pattern<P: ImlParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_or_pattern(p);
    while p.at(SyntaxKind::AS_KW) {
        p.start_node_at(checkpoint, SyntaxKind::ALIAS_PATTERN);
        p.bump();
        if p.at(SyntaxKind::IDENT) {
            p.leaf(SyntaxKind::VALUE_PATTERN);
        } else {
            p.missing("expected alias name");
        }
        p.finish_node();
    }
}

fn parse_or_pattern<P: ImlParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_tuple_pattern(p);
    if p.at(SyntaxKind::PIPE) {
        p.start_node_at(checkpoint, SyntaxKind::OR_PATTERN);
        while p.eat(SyntaxKind::PIPE) {
            parse_tuple_pattern(p);
        }
        p.finish_node();
    }
}

fn parse_tuple_pattern<P: ImlParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_cons_pattern(p);
    if p.at(SyntaxKind::COMMA) {
        p.start_node_at(checkpoint, SyntaxKind::TUPLE_PATTERN);
        while p.eat(SyntaxKind::COMMA) {
            parse_cons_pattern(p);
        }
        p.finish_node();
    }
}

fn parse_cons_pattern<P: ImlParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_constructor_pattern(p);
    if p.at(SyntaxKind::COLON_COLON) {
        p.start_node_at(checkpoint, SyntaxKind::CONS_PATTERN);
        p.bump();
        parse_cons_pattern(p);
        p.finish_node();
    }
}

fn parse_constructor_pattern<P: ImlParser>(p: &mut P) {
    if !p.at(SyntaxKind::UIDENT) {
        parse_simple_pattern(p);
        return;
    }
    let checkpoint = p.checkpoint();
    parse_uppercase_path(p);
    if at_simple_pattern_start(p) {
        p.start_node_at(checkpoint, SyntaxKind::CONSTRUCTOR_PATTERN);
        parse_simple_pattern(p);
        p.finish_node();
    }
}

fn at_simple_pattern_start<P: ImlParser>(p: &P) -> bool {
    p.at_any(&[
        SyntaxKind::IDENT,
        SyntaxKind::UIDENT,
        SyntaxKind::INT_LIT,
        SyntaxKind::STRING_LIT,
        SyntaxKind::CHAR_LIT,
        SyntaxKind::TRUE_KW,
        SyntaxKind::FALSE_KW,
        SyntaxKind::L_PAREN,
        SyntaxKind::L_BRACKET,
        SyntaxKind::L_BRACE,
    ]) || (p.at(SyntaxKind::MINUS) && p.peek_kind(1) == SyntaxKind::INT_LIT)
}

pub fn parse_simple_pattern<P: ImlParser>(p: &mut P) {
    match p.current_kind() {
        SyntaxKind::IDENT => p.leaf(SyntaxKind::VALUE_PATTERN),
        SyntaxKind::UIDENT => parse_uppercase_path(p),
        SyntaxKind::INT_LIT => p.leaf(SyntaxKind::NUMBER),
        SyntaxKind::CHAR_LIT => p.leaf(SyntaxKind::CHARACTER),
        SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => p.leaf(SyntaxKind::BOOLEAN),
        SyntaxKind::MINUS if p.peek_kind(1) == SyntaxKind::INT_LIT => {
            p.start_node(SyntaxKind::NUMBER);
            p.bump();
            p.bump();
            p.finish_node();
        }
        SyntaxKind::STRING_LIT => {
            p.start_node(SyntaxKind::STRING);
            p.bump_string();
            p.finish_node();
        }
        SyntaxKind::L_PAREN if p.peek_kind(1) == SyntaxKind::R_PAREN => {
            p.start_node(SyntaxKind::UNIT);
            p.bump();
            p.bump();
            p.finish_node();
        }
        SyntaxKind::L_PAREN => {
            p.start_node(SyntaxKind::PARENTHESIZED_PATTERN);
            p.bump();
            let checkpoint = p.checkpoint();
            parse_pattern(p);
            if p.at(SyntaxKind::COLON) {
                p.start_node_at(checkpoint, SyntaxKind::TYPED_PATTERN);
                p.bump();
                parse_type_expression(p, &[SyntaxKind::R_PAREN]);
                p.finish_node();
            }
            p.expect(SyntaxKind::R_PAREN);
            p.finish_node();
        }
        SyntaxKind::L_BRACKET => {
            p.start_node(SyntaxKind::LIST_PATTERN);
            p.bump();
            while at_simple_pattern_start(p) {
                parse_pattern(p);
                if !p.eat(SyntaxKind::SEMICOLON) {
                    break;
                }
            }
            p.expect(SyntaxKind::R_BRACKET);
            p.finish_node();
        }
        SyntaxKind::L_BRACE => parse_record_pattern(p),
        _ => {
            if at_stop(p) {
                p.missing("expected pattern");
            } else {
                p.error_token("expected pattern");
            }
        }
    }
}

/// `{ f = p; g; _ }`
fn parse_record_pattern<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::RECORD_PATTERN);
    p.bump(); // {
    while p.at(SyntaxKind::IDENT) {
        p.start_node(SyntaxKind::FIELD_PATH);
        p.leaf(SyntaxKind::FIELD_NAME);
        p.finish_node();
        if p.eat(SyntaxKind::EQ) {
            parse_pattern(p);
        }
        if !p.eat(SyntaxKind::SEMICOLON) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

/// Parameters of `let` bindings and `fun`: simple patterns and labels
pub fn at_parameter_start<P: ImlParser>(p: &P) -> bool {
    match p.current_kind() {
        SyntaxKind::IDENT | SyntaxKind::L_PAREN | SyntaxKind::L_BRACE => true,
        SyntaxKind::TILDE | SyntaxKind::QUESTION => {
            matches!(p.raw_next_kind(), SyntaxKind::IDENT | SyntaxKind::L_PAREN)
        }
        _ => false,
    }
}

/// `x`, `(x : t)`, `()`, `~x`, `~x:p`, `?x`, `?(x = default)`
pub fn parse_parameter<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::PARAMETER);
    if p.at_any(&[SyntaxKind::TILDE, SyntaxKind::QUESTION]) {
        p.bump();
        if p.at(SyntaxKind::L_PAREN) {
            p.bump();
            label_name(p);
            if p.eat(SyntaxKind::COLON) {
                parse_type_expression(p, &[SyntaxKind::EQ, SyntaxKind::R_PAREN]);
            }
            if p.eat(SyntaxKind::EQ) {
                parse_expression(p);
            }
            p.expect(SyntaxKind::R_PAREN);
        } else {
            label_name(p);
            if p.eat(SyntaxKind::COLON) {
                parse_simple_pattern(p);
            }
        }
    } else {
        parse_simple_pattern(p);
    }
    p.finish_node();
}

fn label_name<P: ImlParser>(p: &mut P) {
    if p.at(SyntaxKind::IDENT) {
        p.leaf(SyntaxKind::LABEL_NAME);
    } else {
        p.missing("expected label");
    }
}

/// Loose run of type tokens up to one of `stops` at bracket depth zero
pub fn parse_type_expression<P: ImlParser>(p: &mut P, stops: &[SyntaxKind]) {
    p.start_node(SyntaxKind::TYPE_EXPRESSION);
    let mut depth = 0usize;
    let mut consumed = false;
    while !p.at_eof() {
        let current = p.current_kind();
        if depth == 0
            && (p.at_any(stops)
                || current.starts_item()
                || matches!(
                    current,
                    SyntaxKind::L_BRACKET_AT_AT | SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET
                ))
        {
            break;
        }
        match current {
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                depth = depth.saturating_sub(1)
            }
            _ => {}
        }
        p.bump();
        consumed = true;
    }
    if !consumed {
        p.missing("expected type");
    }
    p.finish_node();
}
