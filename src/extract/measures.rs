//! Termination measures on nested functions
//!
//! A `[@@measure ...]` attribute is only honored on top-level definitions.
//! [`Extractor::find_nested_measures`] reports the ones hidden inside other
//! functions so they can be flagged.

use super::Extractor;
use crate::parser::ast::{AstNode, ValueDefinition};
use crate::parser::{SyntaxKind, SyntaxNode};

/// A measure attribute on a nested `let`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedMeasure {
    /// Name bound by the nested definition
    pub function_name: String,
    /// Value definitions between the nested one and the top-level one
    pub level: usize,
    pub node: SyntaxNode,
}

/// A top-level function with at least one nested measure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedMeasures {
    pub function_name: String,
    pub node: SyntaxNode,
    pub measures: Vec<NestedMeasure>,
}

/// Number of value definitions enclosing `node` up to and including
/// `ancestor`.
///
/// `Some(0)` when `node` is `ancestor`, `None` when `ancestor` does not
/// enclose `node`.
pub fn nesting_level(node: &SyntaxNode, ancestor: &SyntaxNode) -> Option<usize> {
    if node == ancestor {
        return Some(0);
    }
    let mut level = 0;
    for parent in node.ancestors().skip(1) {
        if parent.kind() == SyntaxKind::VALUE_DEFINITION {
            level += 1;
        }
        if &parent == ancestor {
            return Some(level);
        }
    }
    None
}

impl Extractor {
    /// Top-level functions whose body defines a local function with a
    /// measure attribute, in source order.
    pub fn find_nested_measures(&self, root: &SyntaxNode) -> Vec<NestedMeasures> {
        let mut found = Vec::new();
        for top in root.children().filter_map(ValueDefinition::cast) {
            let top = top.syntax();
            let measures: Vec<_> = self
                .queries()
                .measure
                .matches(top)
                .into_iter()
                .filter(|m| &m.node != top)
                .filter_map(|m| {
                    let function_name = m.text("name").ok()?;
                    let level = nesting_level(&m.node, top)?;
                    Some(NestedMeasure {
                        function_name,
                        level,
                        node: m.node,
                    })
                })
                .collect();
            if measures.is_empty() {
                continue;
            }
            let function_name = ValueDefinition::cast(top.clone())
                .and_then(|def| def.name())
                .map(|name| name.to_string())
                .unwrap_or_default();
            tracing::trace!(function = %function_name, nested = measures.len(), "nested measures");
            found.push(NestedMeasures {
                function_name,
                node: top.clone(),
                measures,
            });
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const SOURCE: &str = "\
let good_measure n =
  n + 1
[@@measure Ordinal.of_int n]

let build_fib (f : int list) (i : int) (n : int) : int list =
  let rec helper curr_f i =
    if i > n then curr_f
    else helper (curr_f @ [List.nth (i - 1) curr_f + List.nth (i - 2) curr_f]) (i + 1)
  [@@measure Ordinal.of_int (n - i)]
  in
  helper f i

let triple_nested (f : int list) (i : int) (n : int) : int list =
  let rec outer_helper curr_f i =
    let rec inner_helper x y =
      let rec deepest_helper z =
        if z <= 0 then 0 else deepest_helper (z - 1)
      in
      if x > y then x else inner_helper (x + 1) y
    [@@measure Ordinal.of_int (y - x)]
    in
    outer_helper curr_f (i + 1)
  in
  outer_helper f i
";

    fn definition(root: &SyntaxNode, name: &str) -> SyntaxNode {
        root.descendants()
            .filter_map(ValueDefinition::cast)
            .find(|def| def.name().as_deref() == Some(name))
            .map(|def| def.syntax().clone())
            .unwrap()
    }

    #[test]
    fn test_nesting_levels() {
        let tree = parse(SOURCE);
        let root = tree.root();
        let top = definition(&root, "triple_nested");
        assert_eq!(nesting_level(&top, &top), Some(0));
        assert_eq!(nesting_level(&definition(&root, "outer_helper"), &top), Some(1));
        assert_eq!(nesting_level(&definition(&root, "inner_helper"), &top), Some(2));
        assert_eq!(nesting_level(&definition(&root, "deepest_helper"), &top), Some(3));

        let unrelated = definition(&root, "build_fib");
        assert_eq!(nesting_level(&definition(&root, "inner_helper"), &unrelated), None);
    }

    #[test]
    fn test_find_nested_measures() {
        let tree = parse(SOURCE);
        let found = Extractor::new().unwrap().find_nested_measures(&tree.root());
        let summary: Vec<_> = found
            .iter()
            .map(|top| {
                let nested: Vec<_> = top
                    .measures
                    .iter()
                    .map(|m| (m.function_name.as_str(), m.level))
                    .collect();
                (top.function_name.as_str(), nested)
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("build_fib", vec![("helper", 1)]),
                ("triple_nested", vec![("inner_helper", 2)]),
            ]
        );
    }
}
