//! `verify`, `instance` and `eval` statements
//!
//! The request source is the statement's own text with the keyword and one
//! wrapping pair of parentheses taken off. Nothing inside is reparsed or
//! normalized.

use super::Extractor;
use super::requests::{EvalRequest, InstanceRequest, VerifyRequest};
use crate::error::ExtractError;
use crate::parser::ast::{AstNode, Statement};
use crate::parser::{NodeExt, SyntaxKind, SyntaxNode, tokenize};
use crate::query::QueryMatch;

impl Extractor {
    pub fn verify_request(&self, m: &QueryMatch) -> Result<VerifyRequest, ExtractError> {
        let src = statement_source(m.single("statement")?, SyntaxKind::VERIFY_STATEMENT)?;
        Ok(VerifyRequest { src })
    }

    pub fn instance_request(&self, m: &QueryMatch) -> Result<InstanceRequest, ExtractError> {
        let src = statement_source(m.single("statement")?, SyntaxKind::INSTANCE_STATEMENT)?;
        Ok(InstanceRequest { src })
    }

    pub fn eval_request(&self, m: &QueryMatch) -> Result<EvalRequest, ExtractError> {
        let src = statement_source(m.single("statement")?, SyntaxKind::EVAL_STATEMENT)?;
        Ok(EvalRequest { src })
    }
}

/// Text between the statement keyword and the end of its goal expression
fn statement_source(node: &SyntaxNode, expected: SyntaxKind) -> Result<String, ExtractError> {
    if node.kind() != expected {
        return Err(ExtractError::UnexpectedNode {
            expected: expected.name(),
            found: node.kind().name(),
        });
    }
    let malformed = || ExtractError::Malformed {
        kind: expected.name(),
        range: node.text_range(),
    };
    if node.has_error() {
        return Err(malformed());
    }

    let statement = Statement::cast(node.clone()).ok_or_else(malformed)?;
    let keyword = node.first_token().ok_or_else(malformed)?;
    let expression = statement.expression().ok_or_else(malformed)?;

    let base = node.text_range().start();
    let start = usize::from(keyword.text_range().end() - base);
    let end = usize::from(expression.text_range().end() - base);
    let text = node.text().to_string();
    let src = text.get(start..end).ok_or_else(malformed)?;
    Ok(strip_wrapping_parens(src).to_string())
}

/// Trim `src` and drop one pair of parentheses if the opening one closes at
/// the very end.
///
/// `(a) + (b)` keeps its parentheses; `((a))` loses only the outer pair.
pub fn strip_wrapping_parens(src: &str) -> &str {
    let src = src.trim();
    if !src.starts_with('(') || !src.ends_with(')') {
        return src;
    }

    let mut depth = 0usize;
    for token in tokenize(src) {
        match token.kind {
            SyntaxKind::L_PAREN => depth += 1,
            SyntaxKind::R_PAREN => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if usize::from(token.end()) == src.len() {
                        return src[1..src.len() - 1].trim();
                    }
                    return src;
                }
            }
            _ => {}
        }
    }
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("(fun x -> x > 0)", "fun x -> x > 0")]
    #[case("  ( a  +  b )  ", "a  +  b")]
    #[case("(a) + (b)", "(a) + (b)")]
    #[case("((a))", "(a)")]
    #[case("f (x)", "f (x)")]
    #[case("(f \")\" x)", "f \")\" x")]
    #[case("(* c *) x", "(* c *) x")]
    #[case("()", "")]
    fn test_strip_wrapping_parens(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_wrapping_parens(input), expected);
    }
}
