//! Request extractor tests

#![allow(clippy::unwrap_used)]

use crate::helpers::source_fixtures::*;
use iml_query::parser::parse;
use iml_query::{
    DecompositionRequest, Error, ExtractError, ExtractOptions, Extractor, LiftBool, VerifyRequest,
};
use rstest::rstest;

fn extractor() -> &'static Extractor {
    &crate::helpers::EXTRACTOR
}

#[test]
fn test_simple_branch_default_request() {
    let tree = parse(SIMPLE_BRANCH);
    let extracted = extractor()
        .extract_decomposition_requests(SIMPLE_BRANCH, &tree)
        .unwrap();

    assert_eq!(
        extracted.requests,
        vec![DecompositionRequest {
            name: "simple_branch".into(),
            basis: vec![],
            rule_specs: vec![],
            prune: false,
            ctx_simp: None,
            lift_bool: None,
            assuming: None,
        }]
    );
    assert_eq!(
        extracted.text,
        "let simple_branch x = if x = 1 || x = 2 then x + 1 else x - 1\n\n"
    );
    assert_eq!(extracted.tree, parse(&extracted.text));
}

#[test]
fn test_full_decomposition_request() {
    let tree = parse(FULL_DECOMP);
    let extracted = extractor()
        .extract_decomposition_requests(FULL_DECOMP, &tree)
        .unwrap();
    assert_eq!(
        extracted.requests,
        vec![DecompositionRequest {
            name: "f".into(),
            basis: vec!["a".into(), "b".into()],
            rule_specs: vec![],
            prune: true,
            ctx_simp: None,
            lift_bool: Some(LiftBool::Default),
            assuming: Some("p".into()),
        }]
    );
    assert!(!extracted.text.contains("[@@decomp"));
    assert!(extracted.text.contains("  if p x then a x else b x\n"));
}

#[test]
fn test_mutually_recursive_bindings_each_yield_a_request() {
    let text = "\
let rec is_even n = if n = 0 then true else is_odd (n - 1)
[@@decomp top ()]
and is_odd n = if n = 0 then false else is_even (n - 1)
[@@decomp top ~prune:true ()]
";
    let tree = parse(text);
    let extracted = extractor().extract_decomposition_requests(text, &tree).unwrap();
    let summary: Vec<_> = extracted
        .requests
        .iter()
        .map(|r| (r.name.as_str(), r.prune))
        .collect();
    assert_eq!(summary, vec![("is_even", false), ("is_odd", true)]);
    assert!(!extracted.text.contains("[@@decomp"));
    assert_eq!(extracted.tree, parse(&extracted.text));
}

#[test]
fn test_verify_strips_keyword_and_parens() {
    let tree = parse(VERIFY_IMPLICATION);
    let extracted = extractor()
        .extract_verify_requests(VERIFY_IMPLICATION, &tree)
        .unwrap();
    assert_eq!(
        extracted.requests,
        vec![VerifyRequest {
            src: "fun x -> x > 0 ==> x + 1 > x".into()
        }]
    );
    assert_eq!(extracted.text, "\n");
}

#[test]
fn test_verify_keeps_inner_whitespace() {
    let text = "verify  (fun x ->\n    x   >= x)  [@@by auto]\n";
    let tree = parse(text);
    let extracted = extractor().extract_verify_requests(text, &tree).unwrap();
    assert_eq!(extracted.requests[0].src, "fun x ->\n    x   >= x");
}

#[test]
fn test_instance_and_eval() {
    let tree = parse(MIXED_DOCUMENT);
    let ex = extractor();
    let instances = ex.extract_instance_requests(MIXED_DOCUMENT, &tree).unwrap();
    assert_eq!(instances.requests[0].src, "fun x -> classify x = \"positive\"");
    let evals = ex.extract_eval_requests(MIXED_DOCUMENT, &tree).unwrap();
    assert_eq!(evals.requests[0].src, "classify 3");
    assert!(!evals.text.contains("eval"));
    assert!(evals.text.contains("instance (fun x"));
}

#[rstest]
#[case("Default", LiftBool::Default)]
#[case("Nested_equalities", LiftBool::NestedEqualities)]
#[case("Equalities", LiftBool::Equalities)]
#[case("All", LiftBool::All)]
fn test_lift_bool_values(#[case] written: &str, #[case] expected: LiftBool) {
    let text = format!("let f x = x\n[@@decomp top ~lift_bool:{written} ()]\n");
    let tree = parse(&text);
    let extracted = extractor().extract_decomposition_requests(&text, &tree).unwrap();
    assert_eq!(extracted.requests[0].lift_bool, Some(expected));
    assert_eq!(expected.to_string(), written);
}

#[rstest]
#[case("default")]
#[case("ALL")]
#[case("Nested_Equalities")]
#[case("Sometimes")]
fn test_lift_bool_guard(#[case] written: &str) {
    let text = format!("let f x = x\n[@@decomp top ~lift_bool:{written} ()]\n");
    let tree = parse(&text);
    let err = extractor()
        .extract_decomposition_requests(&text, &tree)
        .unwrap_err();
    match err {
        Error::Extract(ExtractError::DecompParsing(message)) => {
            assert!(message.contains(written), "{message}");
            assert!(message.contains("Default, Nested_equalities, Equalities, All"));
        }
        other => panic!("expected a decomposition error, got {other:?}"),
    }
}

#[rstest]
#[case("top ~basis:[[%id b]] () << top () [%id b]")]
#[case("top () <|< top ~prune:true ()")]
#[case("~| (top ())")]
#[case("(fun () -> top ())")]
fn test_composition_is_unsupported(#[case] payload: &str) {
    let text = format!("let f x = x\n[@@decomp {payload}]\n");
    let tree = parse(&text);
    let err = extractor()
        .extract_decomposition_requests(&text, &tree)
        .unwrap_err();
    assert!(
        matches!(err, Error::Extract(ExtractError::UnsupportedShape(_))),
        "{err:?}"
    );
}

#[test]
fn test_malformed_argument() {
    let text = "let f x = x\n[@@decomp top ~basis:[a ; b] ()]\n";
    let tree = parse(text);
    let err = extractor().extract_decomposition_requests(text, &tree).unwrap_err();
    assert!(matches!(
        err,
        Error::Extract(ExtractError::DecompParsing(ref message)) if message.contains("basis")
    ));
}

#[test]
fn test_custom_options() {
    let options = ExtractOptions {
        decomp_attribute: "split".into(),
        decomp_head: "cfg".into(),
        reference_extension: "ref".into(),
        ..ExtractOptions::default()
    };
    let ex = Extractor::with_options(options).unwrap();
    let text = "let f x = x\n[@@split cfg ~basis:[[%ref g]] ()]\n[@@decomp top ()]\n";
    let tree = parse(text);
    let extracted = ex.extract_decomposition_requests(text, &tree).unwrap();
    assert_eq!(extracted.requests.len(), 1);
    assert_eq!(extracted.requests[0].basis, vec!["g"]);
    assert_eq!(
        ex.render_attribute(&extracted.requests[0]),
        "[@@split cfg ~basis:[[%ref g]] ()]"
    );
    assert!(extracted.text.contains("[@@decomp top ()]"));
}

#[test]
fn test_rendered_attribute_extracts_back() {
    let request = DecompositionRequest {
        name: "f".into(),
        basis: vec!["a".into()],
        rule_specs: vec!["r1".into(), "r2".into()],
        prune: true,
        ctx_simp: Some(true),
        lift_bool: Some(LiftBool::Equalities),
        assuming: Some("pre".into()),
    };
    let text = format!("let f x = x\n{}\n", request.to_attribute());
    let tree = parse(&text);
    let extracted = extractor().extract_decomposition_requests(&text, &tree).unwrap();
    assert_eq!(extracted.requests, vec![request]);
}

#[test]
fn test_nested_measures_skip_top_level() {
    let text = "\
let good n = n [@@measure Ordinal.of_int n]
let outer n =
  let rec go i = if i >= n then i else go (i + 1)
  [@@measure Ordinal.of_int (n - i)]
  in
  go 0
";
    let tree = parse(text);
    let found = extractor().find_nested_measures(&tree.root());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].function_name, "outer");
    assert_eq!(found[0].measures[0].function_name, "go");
    assert_eq!(found[0].measures[0].level, 1);
}

#[cfg(feature = "serde")]
mod serde_records {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_request_serializes_minimal_keys() {
        let value = serde_json::to_value(DecompositionRequest::new("simple_branch")).unwrap();
        assert_eq!(
            value,
            json!({"name": "simple_branch", "basis": [], "rule_specs": [], "prune": false})
        );
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let request: DecompositionRequest =
            serde_json::from_value(json!({"name": "f", "lift_bool": "Nested_equalities"})).unwrap();
        assert_eq!(request.lift_bool, Some(LiftBool::NestedEqualities));
        assert!(request.basis.is_empty());
        assert!(!request.prune);
    }
}

#[test]
fn test_broken_verify_statement_is_malformed() {
    let text = "verify (fun x -> x > 0\n";
    let tree = parse(text);
    let err = extractor().extract_verify_requests(text, &tree).unwrap_err();
    assert!(
        matches!(err, Error::Extract(ExtractError::Malformed { kind: "verify_statement", .. })),
        "{err:?}"
    );
}

#[test]
fn test_broken_decomp_attribute_is_malformed() {
    let text = "let f x = x\n[@@decomp top ~prune:true (]\n";
    let tree = parse(text);
    let err = extractor()
        .extract_decomposition_requests(text, &tree)
        .unwrap_err();
    assert!(
        matches!(err, Error::Extract(ExtractError::Malformed { kind: "item_attribute", .. })),
        "{err:?}"
    );
}

#[test]
fn test_broken_import_is_malformed() {
    let text = "[@@@import \"helpers.iml\" )]\nlet f x = x\n";
    let tree = parse(text);
    let err = extractor().import_declarations(&tree).unwrap_err();
    assert!(
        matches!(err, Error::Extract(ExtractError::Malformed { kind: "floating_attribute", .. })),
        "{err:?}"
    );
}
