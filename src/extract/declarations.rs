//! Opaque functions, imports and theorem-like definitions

use super::Extractor;
use super::requests::{ImportDeclaration, OpaqueDeclaration, TheoremDeclaration, TheoremKind};
use crate::error::{ExtractError, Result};
use crate::parser::ast::{AstNode, NamedDefinition};
use crate::parser::{NodeExt, SyntaxKind, SyntaxNode, Tree};
use crate::query::{Query, QueryMatch};

impl Extractor {
    pub fn opaque_declaration(&self, m: &QueryMatch) -> Result<OpaqueDeclaration, ExtractError> {
        Ok(OpaqueDeclaration {
            name: m.text("name")?,
        })
    }

    /// `[@@@import "path"]`, `[@@@import Mod, "path"]` or
    /// `[@@@import Mod, "path", Extract]`
    pub fn import_declaration(&self, m: &QueryMatch) -> Result<ImportDeclaration, ExtractError> {
        let import = m.single("import")?;
        if import.has_error() {
            return Err(ExtractError::Malformed {
                kind: SyntaxKind::FLOATING_ATTRIBUTE.name(),
                range: import.text_range(),
            });
        }
        let expression = m
            .optional("payload")?
            .and_then(|payload| payload.children().find(|n| n.kind() == SyntaxKind::EXPRESSION_ITEM))
            .and_then(|item| item.first_child())
            .ok_or_else(|| ExtractError::UnsupportedShape("import without a path".into()))?;

        if expression.kind() == SyntaxKind::STRING {
            return Ok(ImportDeclaration {
                module_name: None,
                path: string_content(&expression),
                extract_name: None,
            });
        }

        let unsupported = || {
            ExtractError::UnsupportedShape(format!(
                "expected `\"path\"`, `Module, \"path\"` or `Module, \"path\", Name`, found `{}`",
                expression.text()
            ))
        };
        if expression.kind() != SyntaxKind::TUPLE_EXPRESSION {
            return Err(unsupported());
        }
        let parts = expression.named_children();
        let (module, path, extract) = match parts.as_slice() {
            [module, path] => (module, path, None),
            [module, path, extract] => (module, path, Some(extract)),
            _ => return Err(unsupported()),
        };
        if module.kind() != SyntaxKind::CONSTRUCTOR_PATH
            || path.kind() != SyntaxKind::STRING
            || extract.is_some_and(|e| e.kind() != SyntaxKind::CONSTRUCTOR_PATH)
        {
            return Err(unsupported());
        }

        Ok(ImportDeclaration {
            module_name: Some(module.text().to_string()),
            path: string_content(path),
            extract_name: extract.map(|e| e.text().to_string()),
        })
    }

    pub fn theorem_declaration(&self, m: &QueryMatch) -> Result<TheoremDeclaration, ExtractError> {
        let node = m.single("definition")?;
        let kind = match node.kind() {
            SyntaxKind::AXIOM_DEFINITION => TheoremKind::Axiom,
            SyntaxKind::THEOREM_DEFINITION => TheoremKind::Theorem,
            SyntaxKind::LEMMA_DEFINITION => TheoremKind::Lemma,
            other => {
                return Err(ExtractError::UnexpectedNode {
                    expected: "axiom, theorem or lemma definition",
                    found: other.name(),
                });
            }
        };
        let name = NamedDefinition::cast(node.clone())
            .and_then(|def| def.binding())
            .and_then(|binding| binding.name())
            .ok_or(ExtractError::Malformed {
                kind: node.kind().name(),
                range: node.text_range(),
            })?;
        Ok(TheoremDeclaration {
            kind,
            name: name.to_string(),
        })
    }

    pub fn opaque_declarations(&self, tree: &Tree) -> Result<Vec<OpaqueDeclaration>> {
        collect(&self.queries().opaque, tree, |m| self.opaque_declaration(m))
    }

    pub fn import_declarations(&self, tree: &Tree) -> Result<Vec<ImportDeclaration>> {
        collect(&self.queries().import, tree, |m| self.import_declaration(m))
    }

    pub fn theorem_declarations(&self, tree: &Tree) -> Result<Vec<TheoremDeclaration>> {
        collect(&self.queries().theorem, tree, |m| self.theorem_declaration(m))
    }
}

fn collect<R>(
    query: &Query,
    tree: &Tree,
    convert: impl Fn(&QueryMatch) -> Result<R, ExtractError>,
) -> Result<Vec<R>> {
    query
        .matches(&tree.root())
        .iter()
        .map(|m| convert(m).map_err(Into::into))
        .collect()
}

/// Raw text between the quotes; escapes are kept as written
fn string_content(node: &SyntaxNode) -> String {
    node.children()
        .find(|n| n.kind() == SyntaxKind::STRING_CONTENT)
        .map(|n| n.text().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use rstest::rstest;

    fn imports(source: &str) -> Result<Vec<ImportDeclaration>> {
        Extractor::new()?.import_declarations(&parse(source))
    }

    #[rstest]
    #[case(r#"[@@@import "path/to/file.iml"]"#, None, "path/to/file.iml", None)]
    #[case(r#"[@@@import Mod_name, "path/to/file.iml"]"#, Some("Mod_name"), "path/to/file.iml", None)]
    #[case(
        r#"[@@@import Mod_name, "path/to/file.iml", Extract_name]"#,
        Some("Mod_name"),
        "path/to/file.iml",
        Some("Extract_name")
    )]
    #[case(r#"[@@@import ""]"#, None, "", None)]
    fn test_import_forms(
        #[case] source: &str,
        #[case] module_name: Option<&str>,
        #[case] path: &str,
        #[case] extract_name: Option<&str>,
    ) {
        let found = imports(source).unwrap();
        assert_eq!(
            found,
            vec![ImportDeclaration {
                module_name: module_name.map(str::to_string),
                path: path.to_string(),
                extract_name: extract_name.map(str::to_string),
            }]
        );
    }

    #[test]
    fn test_import_rejects_other_shapes() {
        assert!(matches!(
            imports("[@@@import 42]"),
            Err(crate::Error::Extract(ExtractError::UnsupportedShape(_)))
        ));
        assert!(matches!(
            imports("[@@@import]"),
            Err(crate::Error::Extract(ExtractError::UnsupportedShape(_)))
        ));
    }

    #[test]
    fn test_other_floating_attributes_are_ignored() {
        assert!(imports("[@@@warning \"-8\"]\nlet x = 1\n").unwrap().is_empty());
    }

    #[test]
    fn test_opaque_declarations() {
        let tree = parse("let f x = x [@@opaque]\nlet g y = y\nlet rec h z = z\n[@@opaque]\n");
        let names: Vec<_> = Extractor::new()
            .unwrap()
            .opaque_declarations(&tree)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["f", "h"]);
    }

    #[test]
    fn test_theorem_declarations() {
        let tree = parse(
            "axiom pos x = x > 0\ntheorem comm x y = x + y = y + x\nlemma l (x : int) = x = x [@@by auto]\n",
        );
        let found = Extractor::new().unwrap().theorem_declarations(&tree).unwrap();
        let expected = [
            (TheoremKind::Axiom, "pos"),
            (TheoremKind::Theorem, "comm"),
            (TheoremKind::Lemma, "l"),
        ];
        assert_eq!(found.len(), expected.len());
        for (decl, (kind, name)) in found.iter().zip(expected) {
            assert_eq!(decl.kind, kind);
            assert_eq!(decl.name, name);
        }
    }
}
