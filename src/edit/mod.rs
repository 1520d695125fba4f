//! Text edits that keep a tree in step
//!
//! Every operation takes the current text and, optionally, the tree parsed
//! from it. It returns the new text, the [`InputEdit`]s describing the change
//! and, when a tree was given, the incrementally reparsed tree. Inputs are
//! never modified.
//!
//! Deletions are spliced back to front: the edits are recorded in descending
//! offset order, so each one is valid both in the original coordinates and
//! as a step applied after the ones before it.

use crate::base::{LineIndex, TextRange, TextSize};
use crate::error::EditError;
use crate::parser::{InputEdit, NodeExt, SyntaxNode, Tree, reparse};
use std::ops::Range;

/// Result of an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited {
    pub text: String,
    /// Reparsed tree; `None` in text-only mode
    pub tree: Option<Tree>,
    /// Edits in the order they were applied
    pub edits: Vec<InputEdit>,
}

impl Edited {
    fn unchanged(text: &str, tree: Option<&Tree>) -> Self {
        Self {
            text: text.to_string(),
            tree: tree.cloned(),
            edits: Vec::new(),
        }
    }
}

/// Delete the byte ranges of `nodes` from `text`.
pub fn delete_nodes(text: &str, tree: Option<&Tree>, nodes: &[SyntaxNode]) -> Result<Edited, EditError> {
    let ranges: Vec<_> = nodes.iter().map(NodeExt::byte_range).collect();
    delete_ranges(text, tree, &ranges)
}

/// Delete `ranges` from `text`.
///
/// Ranges may be given in any order and may touch, but must not overlap.
pub fn delete_ranges(
    text: &str,
    tree: Option<&Tree>,
    ranges: &[Range<usize>],
) -> Result<Edited, EditError> {
    if ranges.is_empty() {
        return Ok(Edited::unchanged(text, tree));
    }

    let mut sorted = ranges.to_vec();
    for range in &sorted {
        check_range(text, range)?;
    }
    sorted.sort_by_key(|range| (range.start, range.end));
    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(EditError::Overlap {
                first: pair[0].clone(),
                second: pair[1].clone(),
            });
        }
    }

    let fresh;
    let index = match tree {
        Some(tree) => tree.line_index(),
        None => {
            fresh = LineIndex::new(text);
            &fresh
        }
    };

    let mut result = text.to_string();
    let mut edits = Vec::with_capacity(sorted.len());
    for range in sorted.iter().rev() {
        edits.push(InputEdit::delete(index, text_range(range, text.len())?));
        result.replace_range(range.clone(), "");
    }

    let tree = tree.map(|tree| reparse(&result, tree, &edits));
    tracing::debug!(deleted = edits.len(), len = result.len(), "deleted ranges");
    Ok(Edited {
        text: result,
        tree,
        edits,
    })
}

/// Insert `lines` after the 0-based line `after_line`.
///
/// Lines are newline-inclusive segments of `text`; `after_line` may be
/// anything from 0 to the number of lines, and inserting after the last line
/// appends. The block is the lines joined by `\n` with a trailing `\n`.
pub fn insert_lines<S: AsRef<str>>(
    text: &str,
    tree: Option<&Tree>,
    lines: &[S],
    after_line: usize,
) -> Result<Edited, EditError> {
    let max = line_count(text);
    if after_line > max {
        return Err(EditError::RangeBounds {
            index: after_line,
            max,
        });
    }
    if lines.is_empty() {
        return Ok(Edited::unchanged(text, tree));
    }

    let offset = line_end(text, after_line);
    let mut block = String::new();
    if offset == text.len() && !text.is_empty() && !text.ends_with('\n') {
        block.push('\n');
    }
    for line in lines {
        block.push_str(line.as_ref());
        block.push('\n');
    }

    let fresh;
    let index = match tree {
        Some(tree) => tree.line_index(),
        None => {
            fresh = LineIndex::new(text);
            &fresh
        }
    };
    let edit = InputEdit::replace(index, text_range(&(offset..offset), text.len())?, &block);

    let mut result = String::with_capacity(text.len() + block.len());
    result.push_str(&text[..offset]);
    result.push_str(&block);
    result.push_str(&text[offset..]);

    let edits = vec![edit];
    let tree = tree.map(|tree| reparse(&result, tree, &edits));
    tracing::debug!(offset, inserted = lines.len(), "inserted lines");
    Ok(Edited {
        text: result,
        tree,
        edits,
    })
}

/// Number of newline-inclusive segments; an unterminated last line counts.
pub fn line_count(text: &str) -> usize {
    let newlines = text.bytes().filter(|&b| b == b'\n').count();
    if text.is_empty() || text.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}

/// Offset just past line `line` (its newline included), clamped to the text.
fn line_end(text: &str, line: usize) -> usize {
    text.match_indices('\n')
        .nth(line)
        .map_or(text.len(), |(idx, _)| idx + 1)
}

fn check_range(text: &str, range: &Range<usize>) -> Result<(), EditError> {
    let valid = range.start <= range.end
        && range.end <= text.len()
        && text.is_char_boundary(range.start)
        && text.is_char_boundary(range.end);
    if valid {
        Ok(())
    } else {
        Err(EditError::OutOfBounds {
            range: range.clone(),
            len: text.len(),
        })
    }
}

/// `range` as tree offsets; trees address text with u32 offsets.
fn text_range(range: &Range<usize>, len: usize) -> Result<TextRange, EditError> {
    let out_of_bounds = || EditError::OutOfBounds {
        range: range.clone(),
        len,
    };
    let start = TextSize::try_from(range.start).map_err(|_| out_of_bounds())?;
    let end = TextSize::try_from(range.end).map_err(|_| out_of_bounds())?;
    if end < start {
        return Err(out_of_bounds());
    }
    Ok(TextRange::new(start, end))
}
