//! Outline and round-trip tests

#![allow(clippy::unwrap_used)]

use crate::helpers::source_fixtures::*;
use iml_query::parser::parse;
use iml_query::{
    DecompositionRequest, Extractor, ImportDeclaration, LiftBool, TheoremKind,
    find_function_definition, outline,
};

#[test]
fn test_outline_of_mixed_document() {
    let outline = outline(MIXED_DOCUMENT).unwrap();

    assert_eq!(outline.verify_requests.len(), 1);
    assert_eq!(outline.verify_requests[0].src, "fun x -> double x = x + x");
    assert_eq!(outline.instance_requests.len(), 1);
    assert_eq!(outline.eval_requests[0].src, "classify 3");
    assert_eq!(outline.opaque_names, vec!["double"]);
    assert_eq!(
        outline.decomposition_requests,
        vec![DecompositionRequest {
            basis: vec!["double".into()],
            lift_bool: Some(LiftBool::NestedEqualities),
            ..DecompositionRequest::new("classify")
        }]
    );
    assert_eq!(
        outline.imports,
        vec![
            ImportDeclaration {
                module_name: Some("Helpers".into()),
                path: "helpers.iml".into(),
                extract_name: None,
            },
            ImportDeclaration {
                module_name: None,
                path: "lib/util.iml".into(),
                extract_name: None,
            },
        ]
    );
    let theorems: Vec<_> = outline
        .theorems
        .iter()
        .map(|t| (t.kind, t.name.as_str()))
        .collect();
    assert_eq!(
        theorems,
        vec![(TheoremKind::Lemma, "double_pos"), (TheoremKind::Axiom, "trust_me")]
    );
}

#[test]
fn test_outline_of_empty_document() {
    let outline = outline("").unwrap();
    assert_eq!(outline, Default::default());
}

#[test]
fn test_outline_propagates_errors() {
    let text = "let f x = x\n[@@decomp top ~depth:2 ()]\n";
    assert!(outline(text).is_err());
}

#[test]
fn test_extract_then_reinsert_round_trip() {
    let extractor = Extractor::new().unwrap();
    let tree = parse(FULL_DECOMP);
    let extracted = extractor
        .extract_decomposition_requests(FULL_DECOMP, &tree)
        .unwrap();
    let request = &extracted.requests[0];

    let inserted = extractor
        .insert_decomposition_request(&extracted.text, &extracted.tree, request)
        .unwrap();
    let again = extractor.outline(&inserted.text).unwrap();
    assert_eq!(again.decomposition_requests, vec![request.clone()]);

    let definition = find_function_definition(inserted.tree.as_ref().unwrap(), "f").unwrap();
    assert!(definition.text().to_string().ends_with(&request.to_attribute()));
}

#[test]
fn test_insert_into_middle_of_document() {
    let extractor = Extractor::new().unwrap();
    let text = INTERLEAVED_VERIFY;
    let tree = parse(text);
    let request = DecompositionRequest {
        prune: true,
        ..DecompositionRequest::new("g")
    };
    let edited = extractor
        .insert_decomposition_request(text, &tree, &request)
        .unwrap();
    let lines: Vec<_> = edited.text.lines().collect();
    assert_eq!(lines[2], "let g x = x * 2");
    assert_eq!(lines[3], "[@@decomp top ~prune:true ()]");
    assert_eq!(edited.tree, Some(parse(&edited.text)));
}
