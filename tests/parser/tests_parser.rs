//! Parser and incremental reparse tests

#![allow(clippy::unwrap_used)]

use crate::helpers::source_fixtures::*;
use iml_query::base::TextRange;
use iml_query::parser::{InputEdit, NodeExt, SyntaxKind, parse, reparse, sexp};
use rstest::rstest;

#[rstest]
#[case(SIMPLE_BRANCH)]
#[case(FULL_DECOMP)]
#[case(INTERLEAVED_VERIFY)]
#[case(MIXED_DOCUMENT)]
#[case("let x = \n(* unterminated")]
fn test_parse_is_lossless(#[case] source: &str) {
    assert_eq!(parse(source).text(), source);
}

#[rstest]
#[case(SIMPLE_BRANCH)]
#[case(FULL_DECOMP)]
#[case(INTERLEAVED_VERIFY)]
#[case(MIXED_DOCUMENT)]
fn test_fixtures_parse_cleanly(#[case] source: &str) {
    let tree = parse(source);
    assert!(!tree.has_errors(), "{:?}", tree.errors());
    assert!(!tree.root().has_error());
}

#[test]
fn test_item_kinds_in_order() {
    let tree = parse(MIXED_DOCUMENT);
    let kinds: Vec<_> = tree.items().map(|item| item.kind_name()).collect();
    assert_eq!(
        kinds,
        vec![
            "floating_attribute",
            "floating_attribute",
            "value_definition",
            "value_definition",
            "verify_statement",
            "instance_statement",
            "eval_statement",
            "lemma_definition",
            "axiom_definition",
        ]
    );
}

#[test]
fn test_decomp_attribute_shape() {
    let tree = parse("let f x = x [@@decomp top ~prune:true ()]");
    let attribute = tree
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::ITEM_ATTRIBUTE)
        .unwrap();
    assert_eq!(
        sexp(&attribute),
        "(item_attribute (attribute_id) (attribute_payload (expression_item \
         (application_expression function: (value_path (value_name)) \
         argument: (labeled_argument (label_name) expression: (boolean)) argument: (unit)))))"
    );
}

#[test]
fn test_implication_binds_loosest() {
    let tree = parse(VERIFY_IMPLICATION);
    let body = tree
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::FUN_EXPRESSION)
        .and_then(|f| f.child_by_field(iml_query::parser::Field::Body))
        .unwrap();
    assert_eq!(body.kind(), SyntaxKind::INFIX_EXPRESSION);
    let left = body.child_by_field(iml_query::parser::Field::Left).unwrap();
    assert_eq!(left.text().to_string(), "x > 0");
}

#[test]
fn test_error_nodes_are_local() {
    let tree = parse("let f x = x\nlet g = )\nlet h y = y\n");
    assert!(tree.has_errors());
    let clean: Vec<_> = tree
        .items()
        .filter(|item| !item.has_error())
        .map(|item| item.text().to_string())
        .collect();
    assert!(clean.contains(&"let f x = x".to_string()));
    assert!(clean.contains(&"let h y = y".to_string()));
}

#[rstest]
#[case(25, 25, "\nlet extra = 0")]
#[case(0, 15, "")]
#[case(16, 22, "instance")]
#[case(40, 40, "(")]
fn test_reparse_matches_parse(
    #[case] start: u32,
    #[case] end: u32,
    #[case] inserted: &str,
) {
    let text = INTERLEAVED_VERIFY;
    let old = parse(text);
    let range = TextRange::new(start.into(), end.into());
    let edit = InputEdit::replace(old.line_index(), range, inserted);

    let mut new_text = text.to_string();
    new_text.replace_range(start as usize..end as usize, inserted);
    let reparsed = reparse(&new_text, &old, &[edit]);
    assert_eq!(reparsed, parse(&new_text));
    assert_eq!(reparsed.text(), new_text);
}

#[test]
fn test_reparse_reuses_untouched_items() {
    let text = INTERLEAVED_VERIFY;
    let old = parse(text);
    let last = old.items().last().unwrap();
    let range = last.text_range();
    let edit = InputEdit::replace(old.line_index(), range, "let h x = g (f x)");

    let mut new_text = text.to_string();
    new_text.replace_range(last.byte_range(), "let h x = g (f x)");
    let reparsed = reparse(&new_text, &old, &[edit]);
    assert_eq!(reparsed, parse(&new_text));
    assert!(reparsed.reused_items() >= 5);
}
