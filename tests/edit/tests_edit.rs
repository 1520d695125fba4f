//! Tree editor tests

#![allow(clippy::unwrap_used)]

use crate::helpers::source_fixtures::*;
use iml_query::parser::{NodeExt, SyntaxKind, parse};
use iml_query::{EditError, Extractor, delete_nodes, delete_ranges, insert_lines};

#[test]
fn test_overlap_guard() {
    let text = "x".repeat(20);
    let tree = parse(&text);
    assert_eq!(
        delete_ranges(&text, Some(&tree), &[0..10, 5..15]).unwrap_err(),
        EditError::Overlap {
            first: 0..10,
            second: 5..15
        }
    );
    let edited = delete_ranges(&text, Some(&tree), &[0..10, 10..20]).unwrap();
    assert_eq!(edited.text, "");
    assert_eq!(edited.tree, Some(parse("")));
}

#[test]
fn test_delete_verify_statements_keeps_definitions() {
    let text = INTERLEAVED_VERIFY;
    let tree = parse(text);
    let statements: Vec<_> = tree
        .items()
        .filter(|item| item.kind() == SyntaxKind::VERIFY_STATEMENT)
        .collect();
    assert_eq!(statements.len(), 3);

    let edited = delete_nodes(text, Some(&tree), &statements).unwrap();
    assert_eq!(
        edited.text,
        "\
let f x = x + 1

let g x = x * 2

let rec sum n = if n <= 0 then 0 else n + sum (n - 1)

let h x = f (g x)
"
    );
    let new_tree = edited.tree.unwrap();
    assert_eq!(new_tree, parse(&edited.text));
    let definitions: Vec<_> = new_tree.items().map(|item| item.text().to_string()).collect();
    let expected: Vec<_> = tree
        .items()
        .filter(|item| item.kind() == SyntaxKind::VALUE_DEFINITION)
        .map(|item| item.text().to_string())
        .collect();
    assert_eq!(definitions, expected);
    assert!(new_tree.reused_items() > 0);
}

#[test]
fn test_extract_then_delete_matches_extractor_output() {
    let text = INTERLEAVED_VERIFY;
    let tree = parse(text);
    let extracted = Extractor::new()
        .unwrap()
        .extract_verify_requests(text, &tree)
        .unwrap();
    let sources: Vec<_> = extracted.requests.iter().map(|r| r.src.as_str()).collect();
    assert_eq!(
        sources,
        vec!["fun x -> f x > x", "fun x -> g x >= x", "fun n -> sum n >= 0"]
    );
    assert!(!extracted.text.contains("verify"));
    assert!(!extracted.text.contains("[@@by auto]"));
}

#[test]
fn test_delete_then_insert_is_identity() {
    let text = INTERLEAVED_VERIFY;
    let tree = parse(text);
    let target = tree.items().nth(3).unwrap();
    let node_text = target.text().to_string();
    let range = target.byte_range();
    let row = tree.node_range(&target).start.row;

    // Drop the node together with its line break, then put the same line back.
    let deleted = delete_ranges(text, Some(&tree), &[range.start..range.end + 1]).unwrap();
    let deleted_tree = deleted.tree.unwrap();
    let restored = insert_lines(&deleted.text, Some(&deleted_tree), &[node_text], row - 1).unwrap();

    assert_eq!(restored.text, text);
    assert_eq!(restored.tree, Some(tree));
}

#[test]
fn test_text_only_mode() {
    let edited = insert_lines("let a = 1", None, &["let b = 2"], 1).unwrap();
    assert_eq!(edited.text, "let a = 1\nlet b = 2\n");
    assert!(edited.tree.is_none());
    assert_eq!(edited.edits.len(), 1);
}

#[test]
fn test_insert_bounds() {
    let text = "let a = 1\nlet b = 2\n";
    assert!(insert_lines(text, None, &["x"], 2).is_ok());
    assert_eq!(
        insert_lines(text, None, &["x"], 3).unwrap_err(),
        EditError::RangeBounds { index: 3, max: 2 }
    );
}
