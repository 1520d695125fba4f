//! Query compiler and matcher tests

#![allow(clippy::unwrap_used)]

use crate::helpers::source_fixtures::*;
use iml_query::parser::parse;
use iml_query::{Query, QueryError};
use rstest::rstest;

#[rstest]
#[case("(value_definition", "unclosed")]
#[case("(value_definition) @", "")]
#[case("(#eq? @a \"x\")", "")]
#[case("\"let\"", "")]
fn test_syntax_errors(#[case] source: &str, #[case] fragment: &str) {
    match Query::new(source) {
        Err(QueryError::Syntax { message, .. }) => assert!(message.contains(fragment), "{message}"),
        other => panic!("expected a syntax error for {source:?}, got {other:?}"),
    }
}

#[rstest]
#[case("(value_defn)")]
#[case("(let_binding name: (value_name))")]
#[case("(let_binding function: (value_name))")]
fn test_grammar_mismatch(#[case] source: &str) {
    assert!(matches!(
        Query::new(source),
        Err(QueryError::GrammarMismatch { .. })
    ));
}

#[test]
fn test_unknown_capture_in_predicate() {
    let err = Query::new(r#"((value_name) @name (#eq? @nmae "f"))"#);
    assert!(matches!(err, Err(QueryError::UnknownCapture { ref name, .. }) if name == "nmae"));
}

#[test]
fn test_invalid_regex() {
    let err = Query::new(r#"((value_name) @name (#match? @name "("))"#);
    assert!(matches!(err, Err(QueryError::InvalidRegex { .. })));
}

#[test]
fn test_matches_in_source_order() {
    let tree = parse(INTERLEAVED_VERIFY);
    let query = Query::new("(verify_statement) @statement").unwrap();
    let matches = query.matches(&tree.root());
    assert_eq!(matches.len(), 3);
    let starts: Vec<_> = matches
        .iter()
        .map(|m| m.single("statement").unwrap().text_range().start())
        .collect();
    assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_compile_twice_same_matches() {
    let source = r#"
        ; names of every function carrying an attribute
        (value_definition
          (let_binding
            pattern: (value_name) @name
            (item_attribute (attribute_id) @attr)))
    "#;
    let tree = parse(MIXED_DOCUMENT);
    let first = Query::new(source).unwrap().matches(&tree.root());
    let second = Query::new(source).unwrap().matches(&tree.root());
    assert_eq!(first, second);
    let names: Vec<_> = first.iter().map(|m| m.text("name").unwrap()).collect();
    assert_eq!(names, vec!["double", "classify"]);
}

#[test]
fn test_any_of_and_not_eq() {
    let tree = parse(MIXED_DOCUMENT);
    let query = Query::new(
        r#"(item_attribute (attribute_id) @id (#any-of? @id "opaque" "decomp" "measure") (#not-eq? @id "measure"))"#,
    )
    .unwrap();
    let ids: Vec<_> = query
        .matches(&tree.root())
        .iter()
        .map(|m| m.text("id").unwrap())
        .collect();
    assert_eq!(ids, vec!["opaque", "decomp"]);
}

#[test]
fn test_capture_equality_predicate() {
    let tree = parse("let f x = f x\nlet g x = h x\n");
    let query = Query::new(
        "(let_binding pattern: (value_name) @name body: (application_expression function: (value_path (value_name) @callee)) (#eq? @name @callee))",
    )
    .unwrap();
    let names: Vec<_> = query
        .matches(&tree.root())
        .iter()
        .map(|m| m.text("name").unwrap())
        .collect();
    assert_eq!(names, vec!["f"]);
}

#[test]
fn test_wildcards() {
    let tree = parse("let x = top ~basis:[] ~prune:true ()");
    let query = Query::new("(labeled_argument (label_name) @label (_) @value)").unwrap();
    let values: Vec<_> = query
        .matches(&tree.root())
        .iter()
        .map(|m| (m.text("label").unwrap(), m.text("value").unwrap()))
        .collect();
    assert_eq!(
        values,
        vec![
            ("basis".to_string(), "[]".to_string()),
            ("prune".to_string(), "true".to_string()),
        ]
    );
}
