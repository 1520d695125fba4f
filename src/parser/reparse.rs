//! Incremental reparsing
//!
//! An [`InputEdit`] describes one text change in both byte and row/column
//! terms. [`reparse`] uses a list of them to decide which top-level items of
//! the previous tree can be carried over. Edits are hints only: every reused
//! item is checked against the new text, and hints that contradict the old
//! text are dropped in favor of a full parse.

use super::parser::{ReuseCandidate, SyntaxError, parse_items};
use super::tree::{Tree, parse};
use crate::base::{LineIndex, Point, TextRange, TextSize};
use rowan::NodeOrToken;

/// A single text change, applied on top of the edits before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl InputEdit {
    /// Edit replacing `range` of the text behind `index` with `inserted`.
    pub fn replace(index: &LineIndex, range: TextRange, inserted: &str) -> Self {
        let start_point = index.point(range.start());
        let new_end_point = match inserted.rfind('\n') {
            Some(last_newline) => Point::new(
                start_point.row + inserted.matches('\n').count(),
                inserted.len() - last_newline - 1,
            ),
            None => Point::new(start_point.row, start_point.column + inserted.len()),
        };
        let start_byte = usize::from(range.start());
        Self {
            start_byte,
            old_end_byte: usize::from(range.end()),
            new_end_byte: start_byte + inserted.len(),
            start_point,
            old_end_point: index.point(range.end()),
            new_end_point,
        }
    }

    /// Pure deletion of `range`
    pub fn delete(index: &LineIndex, range: TextRange) -> Self {
        Self::replace(index, range, "")
    }

    fn delta(&self) -> i64 {
        self.new_end_byte as i64 - self.old_end_byte as i64
    }
}

/// Reparse `text`, reusing items of `previous` that `edits` left untouched.
///
/// The result is always the tree `parse(text)` would build.
pub fn reparse(text: &str, previous: &Tree, edits: &[InputEdit]) -> Tree {
    if !edits_are_consistent(previous, edits, text.len()) {
        tracing::warn!(edits = edits.len(), "edit hints disagree with the previous text; parsing from scratch");
        return parse(text);
    }

    let candidates = reuse_candidates(previous, edits);
    let output = parse_items(text, &candidates);
    let tree = Tree::from_output(text, output);
    tracing::debug!(
        candidates = candidates.len(),
        reused = tree.reused_items(),
        "reparsed document"
    );
    tree
}

/// Check byte bookkeeping of all edits and the points of the first one.
///
/// Later edits are expressed against intermediate texts that no longer
/// exist, so only their byte arithmetic can be checked.
fn edits_are_consistent(previous: &Tree, edits: &[InputEdit], new_len: usize) -> bool {
    let index = previous.line_index();
    let mut len = usize::from(index.len());

    if let Some(first) = edits.first() {
        let (Ok(start), Ok(old_end)) = (
            TextSize::try_from(first.start_byte),
            TextSize::try_from(first.old_end_byte),
        ) else {
            return false;
        };
        if first.old_end_byte > len
            || index.point(start) != first.start_point
            || index.point(old_end) != first.old_end_point
        {
            return false;
        }
    }

    for edit in edits {
        if edit.start_byte > edit.old_end_byte
            || edit.start_byte > edit.new_end_byte
            || edit.old_end_byte > len
            || edit.start_point > edit.old_end_point
            || edit.start_point > edit.new_end_point
        {
            return false;
        }
        len = len - (edit.old_end_byte - edit.start_byte) + (edit.new_end_byte - edit.start_byte);
    }
    len == new_len
}

/// Byte window an item's parse depends on: the item itself plus the first
/// token of whatever follows it.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: i64,
    end: i64,
    guard_end: i64,
}

impl Window {
    fn touched_by(&self, edit: &InputEdit) -> bool {
        edit.start_byte as i64 <= self.guard_end && edit.old_end_byte as i64 >= self.start
    }

    fn shift(&mut self, delta: i64) {
        self.start += delta;
        self.end += delta;
        self.guard_end += delta;
    }
}

fn reuse_candidates(previous: &Tree, edits: &[InputEdit]) -> Vec<ReuseCandidate> {
    let root = previous.root();
    let text_len = usize::from(previous.line_index().len()) as i64;
    let elements: Vec<_> = root
        .children_with_tokens()
        .filter(|element| !element.kind().is_trivia())
        .collect();

    let mut candidates = Vec::new();
    for (idx, element) in elements.iter().enumerate() {
        let NodeOrToken::Node(item) = element else {
            continue;
        };
        let range = item.text_range();
        let guard_end = match elements.get(idx + 1) {
            Some(NodeOrToken::Node(next)) => next
                .first_token()
                .map(|t| u32::from(t.text_range().end()) as i64)
                .unwrap_or(u32::from(next.text_range().end()) as i64),
            Some(NodeOrToken::Token(next)) => u32::from(next.text_range().end()) as i64,
            None => text_len,
        };
        let mut window = Window {
            start: u32::from(range.start()) as i64,
            end: u32::from(range.end()) as i64,
            guard_end,
        };

        let mut valid = true;
        for edit in edits {
            if window.touched_by(edit) {
                valid = false;
                break;
            }
            if window.start >= edit.old_end_byte as i64 {
                window.shift(edit.delta());
            }
        }
        if !valid || window.start < 0 || window.end < window.start {
            continue;
        }

        let errors = previous
            .item_errors(range.start())
            .map(|e| SyntaxError::new(e.message.clone(), e.range - range.start()))
            .collect();
        candidates.push(ReuseCandidate {
            offset: TextSize::new(window.start as u32),
            green: item.green().into_owned(),
            errors,
        });
    }
    candidates.sort_by_key(|c| c.offset);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::syntax_kind::SyntaxKind;

    fn count_items(tree: &Tree, kind: SyntaxKind) -> usize {
        tree.items().filter(|item| item.kind() == kind).count()
    }

    fn apply(text: &str, edit: &InputEdit, inserted: &str) -> String {
        let mut out = text.to_string();
        out.replace_range(edit.start_byte..edit.old_end_byte, inserted);
        out
    }

    #[test]
    fn test_reparse_matches_full_parse() {
        let text = "let a = 1\n\nlet b = 2\n\nverify (fun x -> x > a)\n";
        let tree = parse(text);
        let range = TextRange::new(TextSize::new(19), TextSize::new(20));
        let edit = InputEdit::replace(tree.line_index(), range, "42");
        let new_text = apply(text, &edit, "42");
        assert_eq!(new_text, "let a = 1\n\nlet b = 42\n\nverify (fun x -> x > a)\n");

        let reparsed = reparse(&new_text, &tree, &[edit]);
        assert_eq!(reparsed, parse(&new_text));
        assert_eq!(reparsed.text(), new_text);
        assert_eq!(reparsed.reused_items(), 2);
        assert_eq!(count_items(&reparsed, SyntaxKind::VALUE_DEFINITION), 2);
    }

    #[test]
    fn test_wrong_hint_still_yields_correct_tree() {
        let text = "let a = 1\nlet b = 2\n";
        let tree = parse(text);
        let new_text = "let a = 1\nlet b = 2 + a\n";
        // Claims an edit at the start of the file that never happened
        let bogus = InputEdit {
            start_byte: 0,
            old_end_byte: 0,
            new_end_byte: 4,
            start_point: Point::new(0, 0),
            old_end_point: Point::new(0, 0),
            new_end_point: Point::new(0, 4),
        };
        let reparsed = reparse(new_text, &tree, &[bogus]);
        assert_eq!(reparsed, parse(new_text));
    }

    #[test]
    fn test_inconsistent_points_fall_back() {
        let text = "let a = 1\nlet b = 2\n";
        let tree = parse(text);
        let range = TextRange::new(TextSize::new(10), TextSize::new(20));
        let mut edit = InputEdit::delete(tree.line_index(), range);
        edit.start_point = Point::new(5, 5);
        let new_text = apply(text, &edit, "");
        let reparsed = reparse(&new_text, &tree, &[edit]);
        assert_eq!(reparsed, parse(&new_text));
        assert_eq!(reparsed.reused_items(), 0);
    }

    #[test]
    fn test_reused_item_keeps_errors_past_its_end() {
        // "expected EQ" lands on the `let` that starts the next item
        let text = "let f\nlet x = 1\n";
        let tree = parse(text);
        assert_eq!(tree.errors().len(), 1);
        let range = TextRange::new(TextSize::new(14), TextSize::new(15));
        let edit = InputEdit::replace(tree.line_index(), range, "2");
        let new_text = apply(text, &edit, "2");

        let reparsed = reparse(&new_text, &tree, &[edit]);
        assert_eq!(reparsed.reused_items(), 1);
        assert_eq!(reparsed.errors(), parse(&new_text).errors());
        assert!(reparsed.has_errors());
        assert_eq!(reparsed, parse(&new_text));
    }

    #[test]
    fn test_insert_edit_points() {
        let index = LineIndex::new("ab\ncd\n");
        let edit = InputEdit::replace(&index, TextRange::empty(TextSize::new(3)), "x\nyz\n");
        assert_eq!(edit.start_point, Point::new(1, 0));
        assert_eq!(edit.old_end_point, Point::new(1, 0));
        assert_eq!(edit.new_end_point, Point::new(3, 0));
        assert_eq!(edit.new_end_byte, 8);
    }
}
