//! Typed AST wrappers over the untyped rowan CST.
//!
//! Only the constructs the extractors and the outline read are wrapped;
//! everything else is reached through queries.

use super::fields::Field;
use super::syntax_kind::{SyntaxKind, SyntaxNode};
use super::tree::NodeExt;
use smol_str::SmolStr;

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Source text of a name-like node
fn leaf_text(node: &SyntaxNode) -> SmolStr {
    SmolStr::new(node.text().to_string())
}

// ============================================================================
// Definitions
// ============================================================================

ast_node!(ValueDefinition, VALUE_DEFINITION);

impl ValueDefinition {
    pub fn is_rec(&self) -> bool {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::REC_KW)
    }

    pub fn bindings(&self) -> impl Iterator<Item = LetBinding> + '_ {
        self.0.children().filter_map(LetBinding::cast)
    }

    /// Name of the first binding, for function-style definitions
    pub fn name(&self) -> Option<SmolStr> {
        self.bindings().next()?.name()
    }
}

ast_node!(LetBinding, LET_BINDING);

impl LetBinding {
    /// The bound `value_name`; `None` for destructuring patterns
    pub fn name_node(&self) -> Option<SyntaxNode> {
        self.0
            .child_by_field(Field::Pattern)
            .filter(|n| n.kind() == SyntaxKind::VALUE_NAME)
    }

    pub fn name(&self) -> Option<SmolStr> {
        self.name_node().map(|n| leaf_text(&n))
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        self.0.child_by_field(Field::Body)
    }

    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.0.children().filter_map(Attribute::cast)
    }
}

ast_node!(
    /// `axiom`, `theorem` and `lemma` definitions
    NamedDefinition,
    AXIOM_DEFINITION | THEOREM_DEFINITION | LEMMA_DEFINITION
);

impl NamedDefinition {
    pub fn binding(&self) -> Option<LetBinding> {
        self.0.children().find_map(LetBinding::cast)
    }
}

ast_node!(
    /// `verify`, `instance` and `eval` statements
    Statement,
    VERIFY_STATEMENT | INSTANCE_STATEMENT | EVAL_STATEMENT
);

impl Statement {
    /// The statement's goal expression
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.0.children().find(|n| n.kind() != SyntaxKind::ITEM_ATTRIBUTE)
    }

    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.0.children().filter_map(Attribute::cast)
    }
}

// ============================================================================
// Attributes and extensions
// ============================================================================

ast_node!(
    /// Any bracketed `[@@id ...]`, `[@@@id ...]`, `[@id ...]` or `[%id ...]`
    Attribute,
    ITEM_ATTRIBUTE | FLOATING_ATTRIBUTE | ATTRIBUTE | EXTENSION
);

impl Attribute {
    pub fn id(&self) -> Option<SmolStr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ATTRIBUTE_ID)
            .map(|n| leaf_text(&n))
    }

    pub fn payload(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ATTRIBUTE_PAYLOAD)
    }

    /// Expression inside `attribute_payload (expression_item ...)`
    pub fn payload_expression(&self) -> Option<SyntaxNode> {
        self.payload()?
            .children()
            .find(|n| n.kind() == SyntaxKind::EXPRESSION_ITEM)?
            .first_child()
    }
}

ast_node!(LabeledArgument, LABELED_ARGUMENT);

impl LabeledArgument {
    pub fn label(&self) -> Option<SmolStr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::LABEL_NAME)
            .map(|n| leaf_text(&n))
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        self.0.child_by_field(Field::Expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_value_definition_accessors() {
        let tree = parse("let rec f x = x [@@opaque] [@@measure x]");
        let def = tree.items().find_map(ValueDefinition::cast);
        let Some(def) = def else {
            panic!("no value definition");
        };
        assert!(def.is_rec());
        assert_eq!(def.name().as_deref(), Some("f"));
        let binding = def.bindings().next();
        let ids: Vec<_> = binding
            .iter()
            .flat_map(|b| b.attributes().filter_map(|a| a.id()).collect::<Vec<_>>())
            .collect();
        assert_eq!(ids, vec!["opaque", "measure"]);
    }

    #[test]
    fn test_statement_expression_excludes_attributes() {
        let tree = parse("verify (fun x -> x = x) [@@by auto]");
        let stmt = tree.items().find_map(Statement::cast);
        let expr = stmt.as_ref().and_then(Statement::expression);
        assert_eq!(
            expr.map(|e| e.kind()),
            Some(SyntaxKind::PARENTHESIZED_EXPRESSION)
        );
        let ids: Vec<_> = stmt
            .iter()
            .flat_map(|s| s.attributes().filter_map(|a| a.id()).collect::<Vec<_>>())
            .collect();
        assert_eq!(ids, vec!["by"]);
    }

    #[test]
    fn test_labeled_argument() {
        let tree = parse("let x = top ~prune:true ()");
        let arg = tree
            .root()
            .descendants()
            .find_map(LabeledArgument::cast);
        assert_eq!(arg.as_ref().and_then(LabeledArgument::label).as_deref(), Some("prune"));
        assert_eq!(
            arg.and_then(|a| a.value()).map(|v| v.kind()),
            Some(SyntaxKind::BOOLEAN)
        );
    }
}
