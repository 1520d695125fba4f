//! Tokenizer for query sources
//!
//! Whitespace and `;` line comments are skipped. Everything else becomes a
//! [`QueryToken`] carrying its byte offset so compile errors can point at it.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
pub(crate) enum QueryTokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,

    /// `@name`
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_.\-]*")]
    Capture,

    /// `#eq?`, `#not-eq?`, `#any-of?`, `#match?`
    #[regex(r"#[a-zA-Z_][a-zA-Z0-9_\-]*[?!]?")]
    Predicate,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    /// Node kinds, field names and the `_` wildcard
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QueryToken<'a> {
    pub kind: QueryTokenKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Tokenize `source`, failing at the first byte no token accepts.
pub(crate) fn tokenize(source: &str) -> Result<Vec<QueryToken<'_>>, usize> {
    let mut lexer = QueryTokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let offset = lexer.span().start;
        let kind = result.map_err(|()| offset)?;
        tokens.push(QueryToken {
            kind,
            text: lexer.slice(),
            offset,
        });
    }
    Ok(tokens)
}

/// Contents of a quoted string token with `\"`, `\\`, `\n` and `\t` resolved
pub(crate) fn unescape(quoted: &str) -> String {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(quoted);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
