//! Recursive descent parser for IML
//!
//! Builds one rowan `GreenNode` per top-level item and assembles them under a
//! `compilation_unit` root. Items are built independently so an incremental
//! reparse can splice in green nodes from a previous tree.
//! Supports error recovery and produces a lossless CST.

use super::grammar::{self, ImlParser};
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, GreenToken, NodeOrToken, TextRange, TextSize};

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// An old top-level item offered for reuse at a given offset of the new text.
#[derive(Debug, Clone)]
pub(crate) struct ReuseCandidate {
    pub offset: TextSize,
    pub green: GreenNode,
    /// Errors raised while parsing the item, relative to its start
    pub errors: Vec<SyntaxError>,
}

/// Raw output of a parse before it is wrapped into a `Tree`.
pub(crate) struct ParseOutput {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
    /// Start offset of the item whose parse raised each error
    pub owners: Vec<TextSize>,
    pub reused: usize,
}

/// Parse IML source into a green tree, reusing verified candidates.
///
/// `candidates` must be sorted by offset.
pub(crate) fn parse_items(input: &str, candidates: &[ReuseCandidate]) -> ParseOutput {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    let mut children: Vec<NodeOrToken<GreenNode, GreenToken>> = Vec::new();
    let mut owners = Vec::new();
    let mut next_candidate = 0;
    let mut reused = 0;

    while let Some(token) = tokens.get(parser.pos) {
        if token.kind.is_trivia() || token.kind == SyntaxKind::SEMI_SEMI {
            children.push(NodeOrToken::Token(GreenToken::new(token.kind.into(), token.text)));
            parser.pos += 1;
            continue;
        }

        while next_candidate < candidates.len() && candidates[next_candidate].offset < token.offset {
            next_candidate += 1;
        }
        if let Some(candidate) = candidates.get(next_candidate).filter(|c| c.offset == token.offset) {
            if let Some(end_pos) = parser.reusable_until(input, candidate) {
                let shift = token.offset;
                parser.errors.extend(candidate.errors.iter().map(|e| {
                    SyntaxError::new(e.message.clone(), e.range + shift)
                }));
                owners.resize(parser.errors.len(), shift);
                children.push(NodeOrToken::Node(candidate.green.clone()));
                parser.pos = end_pos;
                next_candidate += 1;
                reused += 1;
                continue;
            }
        }

        let pos_before = parser.pos;
        let item = parser.parse_item();
        children.push(NodeOrToken::Node(item));
        // Errors may sit on the token after the item; they still belong to it.
        owners.resize(parser.errors.len(), token.offset);
        // Safety: top-level items always consume at least one token
        debug_assert!(parser.pos > pos_before);
    }

    ParseOutput {
        green: GreenNode::new(SyntaxKind::COMPILATION_UNIT.into(), children),
        errors: parser.errors,
        owners,
        reused,
    }
}

/// The parser state
pub(crate) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    /// Parse exactly one top-level item into its own green node.
    fn parse_item(&mut self) -> GreenNode {
        self.builder = GreenNodeBuilder::new();
        grammar::parse_item(self);
        std::mem::take(&mut self.builder).finish()
    }

    /// Check that `candidate` matches the tokens at the current position.
    ///
    /// Returns the token position right after the reused item. The item's
    /// text must reappear verbatim and end on a token boundary of the new
    /// input, otherwise the candidate is rejected.
    fn reusable_until(&self, input: &str, candidate: &ReuseCandidate) -> Option<usize> {
        let start = usize::from(candidate.offset);
        let end = start + usize::from(candidate.green.text_len());
        let slice = input.get(start..end)?;
        if candidate.green.to_string() != slice {
            return None;
        }
        let end = TextSize::try_from(end).ok()?;
        let mut pos = self.pos;
        while pos < self.tokens.len() && self.tokens[pos].offset < end {
            pos += 1;
        }
        let on_boundary = match self.tokens.get(pos) {
            Some(token) => token.offset == end,
            None => self.tokens.last().is_none_or(|t| t.end() == end),
        };
        on_boundary.then_some(pos)
    }

    /// Index of the first non-trivia token at or after `from`
    fn next_significant(&self, from: usize) -> usize {
        let mut idx = from;
        while idx < self.tokens.len() && self.tokens[idx].kind.is_trivia() {
            idx += 1;
        }
        idx
    }

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.next_significant(self.pos))
    }

    /// Emit trivia that precedes the next significant token into the
    /// currently open node.
    fn flush_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos).filter(|t| t.kind.is_trivia()) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }
}

impl ImlParser for Parser<'_> {
    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::__LAST)
    }

    fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.next_significant(self.pos) >= self.tokens.len()
    }

    fn peek_kind(&self, n: usize) -> SyntaxKind {
        let mut idx = self.next_significant(self.pos);
        for _ in 0..n {
            if idx >= self.tokens.len() {
                break;
            }
            idx = self.next_significant(idx + 1);
        }
        self.tokens.get(idx).map(|t| t.kind).unwrap_or(SyntaxKind::__LAST)
    }

    fn raw_next_kind(&self) -> SyntaxKind {
        let idx = self.next_significant(self.pos) + 1;
        self.tokens.get(idx).map(|t| t.kind).unwrap_or(SyntaxKind::__LAST)
    }

    fn get_pos(&self) -> usize {
        self.pos
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        self.flush_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Consume a string literal as `"` content `"` tokens
    fn bump_string(&mut self) {
        self.flush_trivia();
        let Some(token) = self.tokens.get(self.pos) else {
            return;
        };
        let text = token.text;
        self.pos += 1;
        let dquote: rowan::SyntaxKind = SyntaxKind::DQUOTE.into();
        let inner = text.strip_prefix('"').and_then(|t| t.strip_suffix('"'));
        match inner {
            Some(content) if text.len() >= 2 => {
                self.builder.token(dquote, "\"");
                if !content.is_empty() {
                    self.builder.start_node(SyntaxKind::STRING_CONTENT.into());
                    self.builder.token(SyntaxKind::STRING_TEXT.into(), content);
                    self.builder.finish_node();
                }
                self.builder.token(dquote, "\"");
            }
            _ => self.builder.token(SyntaxKind::ERROR.into(), text),
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or leave an empty error marker in its place
    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.missing(&format!("expected {}", kind));
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: &str) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| {
                let end = self.tokens.last().map(|t| t.end()).unwrap_or_default();
                TextRange::empty(end)
            });
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Wrap tokens up to (not including) a recovery token into an ERROR node.
    fn error_recover(&mut self, message: &str, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !(consumed && self.at_any(recovery)) {
            self.bump();
            consumed = true;
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParseOutput {
        parse_items(input, &[])
    }

    #[test]
    fn test_parse_empty() {
        let out = parse("");
        assert!(out.errors.is_empty());
        assert_eq!(out.green.children().count(), 0);
    }

    #[test]
    fn test_root_is_lossless() {
        let input = "(* header *)\nlet f x = x + 1\n\n;;\nverify (fun x -> f x > x)\n";
        let out = parse(input);
        assert!(out.errors.is_empty(), "errors: {:?}", out.errors);
        assert_eq!(out.green.to_string(), input);
    }

    #[test]
    fn test_items_exclude_trailing_trivia() {
        let out = parse("let f x = x\n\n  verify f  \n");
        let items: Vec<_> = out
            .green
            .children()
            .filter_map(|c| c.into_node())
            .map(|n| n.to_string())
            .collect();
        assert_eq!(items, vec!["let f x = x", "verify f"]);
    }

    #[test]
    fn test_reuse_requires_identical_text() {
        let first = parse("let a = 1\nlet b = 2\n");
        let item = first
            .green
            .children()
            .filter_map(|c| c.into_node())
            .nth(1)
            .map(|n| n.to_owned());
        let Some(green) = item else {
            panic!("second item missing");
        };
        let candidate = ReuseCandidate {
            offset: TextSize::new(10),
            green,
            errors: Vec::new(),
        };

        let same = parse_items("let a = 1\nlet b = 2\n", std::slice::from_ref(&candidate));
        assert_eq!(same.reused, 1);
        assert_eq!(same.green, first.green);

        let changed = parse_items("let a = 1\nlet b = 3\n", &[candidate]);
        assert_eq!(changed.reused, 0);
    }
}
