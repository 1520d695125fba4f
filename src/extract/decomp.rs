//! Decomposition requests
//!
//! The payload of `[@@decomp ...]` is a configuration call:
//!
//! ```text
//! top ~assuming:[%id p] ~basis:[[%id a] ; [%id b]] ~prune:true ~lift_bool:Default ()
//! ```
//!
//! Each labeled argument is parsed by its label; anything that is not such a
//! call (composition operators included) is rejected.

use super::Extractor;
use super::requests::{DecompositionRequest, LiftBool};
use crate::error::ExtractError;
use crate::parser::ast::{AstNode, Attribute, LabeledArgument};
use crate::parser::{Field, NodeExt, SyntaxKind, SyntaxNode};
use crate::query::QueryMatch;

/// Labels a configuration call may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecompLabel {
    Assuming,
    Basis,
    RuleSpecs,
    Prune,
    CtxSimp,
    LiftBool,
}

impl DecompLabel {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "assuming" => Self::Assuming,
            "basis" => Self::Basis,
            "rule_specs" => Self::RuleSpecs,
            "prune" => Self::Prune,
            "ctx_simp" => Self::CtxSimp,
            "lift_bool" => Self::LiftBool,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Assuming => "assuming",
            Self::Basis => "basis",
            Self::RuleSpecs => "rule_specs",
            Self::Prune => "prune",
            Self::CtxSimp => "ctx_simp",
            Self::LiftBool => "lift_bool",
        }
    }
}

impl Extractor {
    /// Request from a match of the decomposition query
    pub fn decomposition_request(&self, m: &QueryMatch) -> Result<DecompositionRequest, ExtractError> {
        let name = m.text("name")?;
        let attribute = m.single("attribute")?;
        if attribute.has_error() {
            return Err(ExtractError::Malformed {
                kind: SyntaxKind::ITEM_ATTRIBUTE.name(),
                range: attribute.text_range(),
            });
        }
        let payload = m.single("payload")?;
        let mut request = DecompositionRequest::new(name);
        self.parse_decomposition_payload(payload, &mut request)?;
        tracing::trace!(name = %request.name, "decomposition request");
        Ok(request)
    }

    /// Fill `request` from an `attribute_payload` node
    pub fn parse_decomposition_payload(
        &self,
        payload: &SyntaxNode,
        request: &mut DecompositionRequest,
    ) -> Result<(), ExtractError> {
        if payload.kind() != SyntaxKind::ATTRIBUTE_PAYLOAD {
            return Err(ExtractError::UnexpectedNode {
                expected: SyntaxKind::ATTRIBUTE_PAYLOAD.name(),
                found: payload.kind().name(),
            });
        }
        let expression = payload
            .children()
            .find(|n| n.kind() == SyntaxKind::EXPRESSION_ITEM)
            .and_then(|item| item.first_child())
            .ok_or_else(|| ExtractError::UnsupportedShape("empty decomposition payload".into()))?;

        match expression.kind() {
            SyntaxKind::APPLICATION_EXPRESSION => {}
            SyntaxKind::INFIX_EXPRESSION | SyntaxKind::PREFIX_EXPRESSION => {
                return Err(ExtractError::UnsupportedShape(
                    "composition operators are not supported yet".into(),
                ));
            }
            other => {
                return Err(ExtractError::UnsupportedShape(format!(
                    "expected a `{} ... ()` call, found {other}",
                    self.options().decomp_head
                )));
            }
        }

        let call = self
            .queries()
            .top_arguments
            .matches(&expression)
            .into_iter()
            .find(|m| m.node == expression)
            .filter(|m| is_plain_call(&expression, m))
            .ok_or_else(|| {
                ExtractError::UnsupportedShape(format!(
                    "expected a `{} ~label:value ... ()` call",
                    self.options().decomp_head
                ))
            })?;

        for argument in call.nodes("arguments") {
            let argument = LabeledArgument::cast(argument.clone()).ok_or(ExtractError::UnexpectedNode {
                expected: SyntaxKind::LABELED_ARGUMENT.name(),
                found: argument.kind().name(),
            })?;
            self.apply_argument(&argument, request)?;
        }
        Ok(())
    }

    fn apply_argument(
        &self,
        argument: &LabeledArgument,
        request: &mut DecompositionRequest,
    ) -> Result<(), ExtractError> {
        let label_text = argument.label().unwrap_or_default();
        let label = DecompLabel::from_name(&label_text)
            .ok_or_else(|| ExtractError::unexpected_label(&label_text))?;
        let value = argument
            .value()
            .ok_or_else(|| ExtractError::malformed_argument(label.name(), "given a value"))?;

        match label {
            DecompLabel::Assuming => {
                request.assuming = Some(self.reference(&value).ok_or_else(|| {
                    ExtractError::malformed_argument(label.name(), "an identifier reference like [%id name]")
                })?);
            }
            DecompLabel::Basis | DecompLabel::RuleSpecs => {
                let names = self.reference_list(&value).ok_or_else(|| {
                    ExtractError::malformed_argument(label.name(), "a list of identifier references")
                })?;
                if label == DecompLabel::Basis {
                    request.basis = names;
                } else {
                    request.rule_specs = names;
                }
            }
            DecompLabel::Prune | DecompLabel::CtxSimp => {
                if value.kind() != SyntaxKind::BOOLEAN {
                    return Err(ExtractError::malformed_argument(label.name(), "a boolean"));
                }
                let flag = value.text() == "true";
                if label == DecompLabel::Prune {
                    request.prune = flag;
                } else {
                    request.ctx_simp = Some(flag);
                }
            }
            DecompLabel::LiftBool => {
                // A lowercase name still gets the list of valid constructors.
                if !matches!(value.kind(), SyntaxKind::CONSTRUCTOR_PATH | SyntaxKind::VALUE_PATH) {
                    return Err(ExtractError::malformed_argument(label.name(), "a constructor name"));
                }
                request.lift_bool = Some(value.text().to_string().parse::<LiftBool>()?);
            }
        }
        Ok(())
    }

    /// Name inside `[%id name]`
    fn reference(&self, node: &SyntaxNode) -> Option<String> {
        if node.kind() != SyntaxKind::EXTENSION {
            return None;
        }
        let extension = Attribute::cast(node.clone())?;
        if extension.id()? != self.options().reference_extension {
            return None;
        }
        let target = extension.payload_expression()?;
        (target.kind() == SyntaxKind::VALUE_PATH).then(|| target.text().to_string())
    }

    /// Names inside `[[%id a] ; [%id b]]`; `[]` gives an empty list
    fn reference_list(&self, node: &SyntaxNode) -> Option<Vec<String>> {
        if node.kind() != SyntaxKind::LIST_EXPRESSION {
            return None;
        }
        node.children().map(|item| self.reference(&item)).collect()
    }
}

/// Every argument is labeled and the unit comes last
fn is_plain_call(application: &SyntaxNode, call: &QueryMatch) -> bool {
    let arguments = application.children_by_field(Field::Argument);
    let Some((last, labeled)) = arguments.split_last() else {
        return false;
    };
    call.nodes("unit").first() == Some(last)
        && labeled
            .iter()
            .all(|argument| argument.kind() == SyntaxKind::LABELED_ARGUMENT)
}
