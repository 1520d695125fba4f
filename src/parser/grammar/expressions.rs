//! Expression parsing for IML
//!
//! Binary operators go through a binding-power loop; the classes follow the
//! OCaml operator table, with `==>`/`<==`/`<==>` slotted just below `||`:
//!
//! ```text
//! ;                          sequence (parentheses and begin/end only)
//! let match fun function if  extend as far right as possible
//! ,                          tuple
//! := <-                      right
//! ==> <== <==>               right
//! || or                      right
//! && &                       right
//! = < > | & $ !=             left   (<<, <|<, |> live here too)
//! @ ^                        right
//! ::                         right
//! + -                        left
//! * / % mod land lor lxor    left
//! ** lsl lsr asr             right
//! - -.                       prefix
//! application                left, with ~label / ?label arguments
//! ! ~| ...                   prefix operators
//! .                          field access
//! ```

use super::attributes::parse_extension;
use super::items::parse_value_definition;
use super::patterns::{at_parameter_start, parse_parameter, parse_pattern, parse_type_expression};
use super::{ImlParser, at_stop, is_operator};
use crate::parser::syntax_kind::SyntaxKind;

/// Binding power of the tuple comma; `if` branches parse just above it.
const TUPLE_BP: u8 = 10;
const SIGN_BP: u8 = 30;

/// Parse an expression without top-level sequences.
///
/// Returns true if any tokens were consumed.
pub fn parse_expression<P: ImlParser>(p: &mut P) -> bool {
    let start_pos = p.get_pos();
    expr_bp(p, 0);
    p.get_pos() > start_pos
}

/// `e1; e2; ...` where sequences are allowed (parentheses, begin/end, payloads)
pub fn parse_sequence_expression<P: ImlParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    if !parse_expression(p) {
        return;
    }
    if !p.at(SyntaxKind::SEMICOLON) {
        return;
    }
    p.start_node_at(checkpoint, SyntaxKind::SEQUENCE_EXPRESSION);
    while p.eat(SyntaxKind::SEMICOLON) {
        if !at_expression_start(p) || !parse_expression(p) {
            break;
        }
    }
    p.finish_node();
}

/// Can an expression start at the current token?
pub fn at_expression_start<P: ImlParser>(p: &P) -> bool {
    at_simple_expression_start(p)
        || p.at_any(&[
            SyntaxKind::LET_KW,
            SyntaxKind::IF_KW,
            SyntaxKind::FUN_KW,
            SyntaxKind::FUNCTION_KW,
            SyntaxKind::MATCH_KW,
            SyntaxKind::MINUS,
            SyntaxKind::MINUS_DOT,
        ])
}

fn at_simple_expression_start<P: ImlParser>(p: &P) -> bool {
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
        SyntaxKind::L_BRACKET_PERCENT,
        SyntaxKind::L_BRACE,
        SyntaxKind::BEGIN_KW,
        SyntaxKind::PREFIX_OP,
    ])
}

/// `~label` or `?label` written without a space
fn at_labeled_argument<P: ImlParser>(p: &P) -> bool {
    p.at_any(&[SyntaxKind::TILDE, SyntaxKind::QUESTION]) && p.raw_next_kind() == SyntaxKind::IDENT
}

fn at_argument_start<P: ImlParser>(p: &P) -> bool {
    at_simple_expression_start(p) || at_labeled_argument(p)
}

/// Binding powers and node kind of the infix operator at the current token
fn infix_binding<P: ImlParser>(p: &P) -> Option<(u8, u8, SyntaxKind)> {
    let infix = SyntaxKind::INFIX_EXPRESSION;
    let binding = match p.current_kind() {
        SyntaxKind::COMMA => (TUPLE_BP, TUPLE_BP + 1, SyntaxKind::TUPLE_EXPRESSION),
        SyntaxKind::COLON_COLON => (24, 24, SyntaxKind::CONS_EXPRESSION),
        SyntaxKind::EQ => (20, 21, infix),
        SyntaxKind::STAR => (28, 29, infix),
        SyntaxKind::MINUS | SyntaxKind::MINUS_DOT => (26, 27, infix),
        SyntaxKind::OR_KW => (16, 16, infix),
        SyntaxKind::MOD_KW => match p.current_text() {
            "lsl" | "lsr" | "asr" => (30, 30, infix),
            _ => (28, 29, infix),
        },
        SyntaxKind::INFIX_OP => {
            let (l_bp, r_bp) = operator_binding(p.current_text());
            (l_bp, r_bp, infix)
        }
        _ => return None,
    };
    Some(binding)
}

/// Binding powers of a symbolic infix operator, decided by its leading characters
fn operator_binding(op: &str) -> (u8, u8) {
    if op == ":=" || op == "<-" {
        return (12, 12);
    }
    if op.starts_with("==>") || op.starts_with("<==") {
        return (14, 14);
    }
    if op == "||" {
        return (16, 16);
    }
    if op == "&&" || op == "&" {
        return (18, 18);
    }
    if op.starts_with("**") {
        return (30, 30);
    }
    match op.chars().next() {
        Some('@' | '^') => (22, 22),
        Some('+' | '-') => (26, 27),
        Some('*' | '/' | '%') => (28, 29),
        _ => (20, 21),
    }
}

fn expr_bp<P: ImlParser>(p: &mut P, min_bp: u8) {
    let checkpoint = p.checkpoint();
    if !parse_prefix_form(p) {
        return;
    }

    while let Some((l_bp, r_bp, kind)) = infix_binding(p) {
        if l_bp < min_bp {
            break;
        }
        p.start_node_at(checkpoint, kind);
        if kind == SyntaxKind::TUPLE_EXPRESSION {
            while p.eat(SyntaxKind::COMMA) {
                expr_bp(p, r_bp);
            }
        } else {
            p.bump();
            expr_bp(p, r_bp);
        }
        p.finish_node();
    }
}

/// Left operand of an infix chain: keyword forms, signs, or an application
fn parse_prefix_form<P: ImlParser>(p: &mut P) -> bool {
    match p.current_kind() {
        SyntaxKind::IF_KW => parse_if_expression(p),
        SyntaxKind::FUN_KW => parse_fun_expression(p),
        SyntaxKind::FUNCTION_KW => parse_function_expression(p),
        SyntaxKind::MATCH_KW => parse_match_expression(p),
        SyntaxKind::LET_KW => parse_let_expression(p),
        SyntaxKind::MINUS | SyntaxKind::MINUS_DOT => {
            p.start_node(SyntaxKind::SIGN_EXPRESSION);
            p.bump();
            expr_bp(p, SIGN_BP);
            p.finish_node();
        }
        _ => return parse_application_expression(p),
    }
    true
}

/// `f a ~label:b ?opt` or a lone simple expression
fn parse_application_expression<P: ImlParser>(p: &mut P) -> bool {
    let checkpoint = p.checkpoint();
    if !parse_simple_expression(p) {
        return false;
    }
    if at_argument_start(p) {
        p.start_node_at(checkpoint, SyntaxKind::APPLICATION_EXPRESSION);
        while at_argument_start(p) {
            let pos = p.get_pos();
            parse_argument(p);
            if p.get_pos() == pos {
                break;
            }
        }
        p.finish_node();
    }
    true
}

fn parse_argument<P: ImlParser>(p: &mut P) {
    if !at_labeled_argument(p) {
        parse_simple_expression(p);
        return;
    }
    p.start_node(SyntaxKind::LABELED_ARGUMENT);
    p.bump(); // ~ or ?
    p.leaf(SyntaxKind::LABEL_NAME);
    if p.eat(SyntaxKind::COLON) {
        parse_simple_expression(p);
    }
    p.finish_node();
}

/// Atoms plus trailing field access
///
/// On failure an ERROR node marks the spot and false is returned.
pub fn parse_simple_expression<P: ImlParser>(p: &mut P) -> bool {
    let checkpoint = p.checkpoint();
    match p.current_kind() {
        SyntaxKind::IDENT => {
            p.start_node(SyntaxKind::VALUE_PATH);
            p.leaf(SyntaxKind::VALUE_NAME);
            p.finish_node();
        }
        SyntaxKind::UIDENT => parse_uppercase_path(p),
        SyntaxKind::INT_LIT => p.leaf(SyntaxKind::NUMBER),
        SyntaxKind::CHAR_LIT => p.leaf(SyntaxKind::CHARACTER),
        SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => p.leaf(SyntaxKind::BOOLEAN),
        SyntaxKind::STRING_LIT => {
            p.start_node(SyntaxKind::STRING);
            p.bump_string();
            p.finish_node();
        }
        SyntaxKind::L_PAREN => parse_parenthesized(p),
        SyntaxKind::L_BRACKET => parse_list_expression(p),
        SyntaxKind::L_BRACKET_PERCENT => parse_extension(p),
        SyntaxKind::L_BRACE => parse_record_expression(p),
        SyntaxKind::BEGIN_KW => {
            p.start_node(SyntaxKind::PARENTHESIZED_EXPRESSION);
            p.bump();
            parse_sequence_expression(p);
            p.expect(SyntaxKind::END_KW);
            p.finish_node();
        }
        SyntaxKind::PREFIX_OP => {
            p.start_node(SyntaxKind::PREFIX_EXPRESSION);
            p.bump();
            parse_simple_expression(p);
            p.finish_node();
        }
        _ => {
            if at_stop(p) {
                p.missing("expected expression");
            } else {
                p.error_token("expected expression");
            }
            return false;
        }
    }

    while p.at(SyntaxKind::DOT) && p.peek_kind(1) == SyntaxKind::IDENT {
        p.start_node_at(checkpoint, SyntaxKind::FIELD_GET_EXPRESSION);
        p.bump(); // .
        p.start_node(SyntaxKind::FIELD_PATH);
        p.leaf(SyntaxKind::FIELD_NAME);
        p.finish_node();
        p.finish_node();
    }
    true
}

/// `Mod.Sub.value`, `Mod.Ctor` or a bare `Ctor`
pub fn parse_uppercase_path<P: ImlParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    if !at_module_qualifier(p, 0) {
        p.start_node(SyntaxKind::CONSTRUCTOR_PATH);
        p.leaf(SyntaxKind::CONSTRUCTOR_NAME);
        p.finish_node();
        return;
    }

    p.start_node(SyntaxKind::MODULE_PATH);
    p.leaf(SyntaxKind::MODULE_NAME);
    while p.at(SyntaxKind::DOT) && at_module_qualifier(p, 1) {
        p.bump();
        p.leaf(SyntaxKind::MODULE_NAME);
    }
    p.finish_node();
    p.bump(); // .

    if p.at(SyntaxKind::IDENT) {
        p.start_node_at(checkpoint, SyntaxKind::VALUE_PATH);
        p.leaf(SyntaxKind::VALUE_NAME);
    } else {
        p.start_node_at(checkpoint, SyntaxKind::CONSTRUCTOR_PATH);
        p.leaf(SyntaxKind::CONSTRUCTOR_NAME);
    }
    p.finish_node();
}

/// Is the token `n` ahead an uppercase name followed by `.name`?
fn at_module_qualifier<P: ImlParser>(p: &P, n: usize) -> bool {
    p.peek_kind(n) == SyntaxKind::UIDENT
        && p.peek_kind(n + 1) == SyntaxKind::DOT
        && matches!(p.peek_kind(n + 2), SyntaxKind::IDENT | SyntaxKind::UIDENT)
}

/// `()`, `( op )`, `(e)`, `(e : t)` and `(e1; e2)`
fn parse_parenthesized<P: ImlParser>(p: &mut P) {
    if p.peek_kind(1) == SyntaxKind::R_PAREN {
        p.start_node(SyntaxKind::UNIT);
        p.bump();
        p.bump();
        p.finish_node();
        return;
    }
    if is_operator(p.peek_kind(1)) && p.peek_kind(2) == SyntaxKind::R_PAREN {
        p.start_node(SyntaxKind::VALUE_PATH);
        p.start_node(SyntaxKind::VALUE_NAME);
        p.bump();
        p.bump();
        p.bump();
        p.finish_node();
        p.finish_node();
        return;
    }

    p.start_node(SyntaxKind::PARENTHESIZED_EXPRESSION);
    p.bump(); // (
    let checkpoint = p.checkpoint();
    parse_sequence_expression(p);
    if p.at(SyntaxKind::COLON) {
        p.start_node_at(checkpoint, SyntaxKind::TYPED_EXPRESSION);
        p.bump();
        parse_type_expression(p, &[SyntaxKind::R_PAREN]);
        p.finish_node();
    }
    if !p.at(SyntaxKind::R_PAREN) && !p.at_eof() && !p.current_kind().starts_item() {
        p.error_recover("expected R_PAREN", &[SyntaxKind::R_PAREN]);
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// `[e1; e2; ...]`, possibly empty
fn parse_list_expression<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::LIST_EXPRESSION);
    p.bump(); // [
    while !p.at(SyntaxKind::R_BRACKET) && at_expression_start(p) {
        if !parse_expression(p) || !p.eat(SyntaxKind::SEMICOLON) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

/// `{ f = e; g }` and `{ r with f = e }`
fn parse_record_expression<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::RECORD_EXPRESSION);
    p.bump(); // {
    let is_field_list = matches!(
        p.peek_kind(1),
        SyntaxKind::EQ | SyntaxKind::SEMICOLON | SyntaxKind::R_BRACE
    );
    if !is_field_list && at_expression_start(p) {
        parse_simple_expression(p);
        p.expect(SyntaxKind::WITH_KW);
    }
    while p.at(SyntaxKind::IDENT) {
        p.start_node(SyntaxKind::FIELD_EXPRESSION);
        p.start_node(SyntaxKind::FIELD_PATH);
        p.leaf(SyntaxKind::FIELD_NAME);
        p.finish_node();
        if p.eat(SyntaxKind::EQ) {
            parse_expression(p);
        }
        p.finish_node();
        if !p.eat(SyntaxKind::SEMICOLON) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

/// `if c then a else b`; branches stop before a tuple comma
fn parse_if_expression<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::IF_EXPRESSION);
    p.bump(); // if
    parse_expression(p);

    p.start_node(SyntaxKind::THEN_CLAUSE);
    p.expect(SyntaxKind::THEN_KW);
    expr_bp(p, TUPLE_BP + 1);
    p.finish_node();

    if p.at(SyntaxKind::ELSE_KW) {
        p.start_node(SyntaxKind::ELSE_CLAUSE);
        p.bump();
        expr_bp(p, TUPLE_BP + 1);
        p.finish_node();
    }
    p.finish_node();
}

/// `fun p1 p2 : t -> body`
fn parse_fun_expression<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::FUN_EXPRESSION);
    p.bump(); // fun
    if !at_parameter_start(p) {
        p.missing("expected parameter");
    }
    while at_parameter_start(p) {
        parse_parameter(p);
    }
    if p.eat(SyntaxKind::COLON) {
        parse_type_expression(p, &[SyntaxKind::ARROW]);
    }
    p.expect(SyntaxKind::ARROW);
    parse_expression(p);
    p.finish_node();
}

/// `function | p -> e | ...`
fn parse_function_expression<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::FUNCTION_EXPRESSION);
    p.bump(); // function
    parse_match_cases(p);
    p.finish_node();
}

/// `match e with | p -> e | ...`
fn parse_match_expression<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::MATCH_EXPRESSION);
    p.bump(); // match
    parse_sequence_expression(p);
    p.expect(SyntaxKind::WITH_KW);
    parse_match_cases(p);
    p.finish_node();
}

fn parse_match_cases<P: ImlParser>(p: &mut P) {
    p.eat(SyntaxKind::PIPE);
    loop {
        parse_match_case(p);
        if !p.eat(SyntaxKind::PIPE) {
            break;
        }
    }
}

fn parse_match_case<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::MATCH_CASE);
    parse_pattern(p);
    if p.at(SyntaxKind::WHEN_KW) {
        p.start_node(SyntaxKind::GUARD);
        p.bump();
        parse_expression(p);
        p.finish_node();
    }
    p.expect(SyntaxKind::ARROW);
    parse_expression(p);
    p.finish_node();
}

/// `let x = e in body`
fn parse_let_expression<P: ImlParser>(p: &mut P) {
    p.start_node(SyntaxKind::LET_EXPRESSION);
    parse_value_definition(p);
    p.expect(SyntaxKind::IN_KW);
    parse_sequence_expression(p);
    p.finish_node();
}
