//! Field names for child nodes
//!
//! A field labels the role a child plays inside its parent, e.g. the `body`
//! of a `let_binding`. Fields are not stored in the green tree; they are
//! derived from the parent's shape on demand, so they cannot drift from what
//! the parser produced.

use super::syntax_kind::{SyntaxKind, SyntaxNode};
use rowan::NodeOrToken;

/// All field names known to the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Pattern,
    Body,
    Function,
    Argument,
    Expression,
    Left,
    Right,
    Condition,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Pattern,
        Field::Body,
        Field::Function,
        Field::Argument,
        Field::Expression,
        Field::Left,
        Field::Right,
        Field::Condition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Pattern => "pattern",
            Field::Body => "body",
            Field::Function => "function",
            Field::Argument => "argument",
            Field::Expression => "expression",
            Field::Left => "left",
            Field::Right => "right",
            Field::Condition => "condition",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Parent kinds that can carry this field
    pub fn parents(self) -> &'static [SyntaxKind] {
        use SyntaxKind::*;
        match self {
            Field::Pattern => &[LET_BINDING, MATCH_CASE, PARAMETER],
            Field::Body => &[LET_BINDING, FUN_EXPRESSION, MATCH_CASE, LET_EXPRESSION],
            Field::Function | Field::Argument => &[APPLICATION_EXPRESSION],
            Field::Expression => &[LABELED_ARGUMENT, FIELD_GET_EXPRESSION],
            Field::Left => &[INFIX_EXPRESSION, CONS_EXPRESSION],
            Field::Right => &[INFIX_EXPRESSION, CONS_EXPRESSION, PREFIX_EXPRESSION, SIGN_EXPRESSION],
            Field::Condition => &[IF_EXPRESSION],
        }
    }

    pub fn applies_to(self, parent: SyntaxKind) -> bool {
        self.parents().contains(&parent)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Node children of `parent` paired with their field, in source order
pub fn children_with_fields(parent: &SyntaxNode) -> Vec<(SyntaxNode, Option<Field>)> {
    let kind = parent.kind();
    let mut result: Vec<(SyntaxNode, Option<Field>)> = Vec::new();
    // Token that switches the role of the next node (`=`, `->`, `in`)
    let mut after_marker = false;

    for element in parent.children_with_tokens() {
        let node = match element {
            NodeOrToken::Token(token) => {
                if is_body_marker(kind, token.kind()) {
                    after_marker = true;
                }
                continue;
            }
            NodeOrToken::Node(node) => node,
        };
        let first = result.is_empty();
        let field = match kind {
            SyntaxKind::LET_BINDING | SyntaxKind::MATCH_CASE if first => Some(Field::Pattern),
            SyntaxKind::LET_BINDING
            | SyntaxKind::MATCH_CASE
            | SyntaxKind::FUN_EXPRESSION
            | SyntaxKind::LET_EXPRESSION
                if after_marker =>
            {
                after_marker = false;
                Some(Field::Body)
            }
            SyntaxKind::APPLICATION_EXPRESSION if first => Some(Field::Function),
            SyntaxKind::APPLICATION_EXPRESSION => Some(Field::Argument),
            SyntaxKind::LABELED_ARGUMENT if node.kind() != SyntaxKind::LABEL_NAME => {
                Some(Field::Expression)
            }
            SyntaxKind::PARAMETER if node.kind() != SyntaxKind::LABEL_NAME && !has_pattern(&result) => {
                Some(Field::Pattern)
            }
            SyntaxKind::FIELD_GET_EXPRESSION if first => Some(Field::Expression),
            SyntaxKind::INFIX_EXPRESSION | SyntaxKind::CONS_EXPRESSION if first => Some(Field::Left),
            SyntaxKind::INFIX_EXPRESSION
            | SyntaxKind::CONS_EXPRESSION
            | SyntaxKind::PREFIX_EXPRESSION
            | SyntaxKind::SIGN_EXPRESSION => Some(Field::Right),
            SyntaxKind::IF_EXPRESSION if first => Some(Field::Condition),
            _ => None,
        };
        result.push((node, field));
    }
    result
}

fn has_pattern(fields: &[(SyntaxNode, Option<Field>)]) -> bool {
    fields.iter().any(|(_, field)| *field == Some(Field::Pattern))
}

fn is_body_marker(parent: SyntaxKind, token: SyntaxKind) -> bool {
    matches!(
        (parent, token),
        (SyntaxKind::LET_BINDING, SyntaxKind::EQ)
            | (SyntaxKind::MATCH_CASE, SyntaxKind::ARROW)
            | (SyntaxKind::FUN_EXPRESSION, SyntaxKind::ARROW)
            | (SyntaxKind::LET_EXPRESSION, SyntaxKind::IN_KW)
    )
}

/// Field of `node` within its parent, if any
pub fn field_of(node: &SyntaxNode) -> Option<Field> {
    let parent = node.parent()?;
    children_with_fields(&parent)
        .into_iter()
        .find(|(child, _)| child == node)
        .and_then(|(_, field)| field)
}
