//! Request records handed to the proof backend

use crate::error::ExtractError;
use std::fmt;
use std::str::FromStr;

/// `verify <src>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerifyRequest {
    pub src: String,
}

/// `instance <src>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceRequest {
    pub src: String,
}

/// `eval <src>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalRequest {
    pub src: String,
}

/// Boolean lifting strategy of a decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiftBool {
    Default,
    #[cfg_attr(feature = "serde", serde(rename = "Nested_equalities"))]
    NestedEqualities,
    Equalities,
    All,
}

impl LiftBool {
    pub const ALL: [LiftBool; 4] = [
        LiftBool::Default,
        LiftBool::NestedEqualities,
        LiftBool::Equalities,
        LiftBool::All,
    ];

    /// Constructor name as written in source
    pub fn as_str(self) -> &'static str {
        match self {
            LiftBool::Default => "Default",
            LiftBool::NestedEqualities => "Nested_equalities",
            LiftBool::Equalities => "Equalities",
            LiftBool::All => "All",
        }
    }
}

impl fmt::Display for LiftBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: `default` is not `Default`.
impl FromStr for LiftBool {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|value| value.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = Self::ALL.iter().map(|v| v.as_str()).collect();
                ExtractError::invalid_value("lift_bool", s, &valid)
            })
    }
}

/// `[@@decomp top ~label:value ... ()]` on a function definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecompositionRequest {
    /// The decomposed function
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub basis: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rule_specs: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub prune: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub ctx_simp: Option<bool>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub lift_bool: Option<LiftBool>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub assuming: Option<String>,
}

impl DecompositionRequest {
    /// Request with every option at its default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Render the options as a `top ... ()` application.
    ///
    /// Options at their default value are left out. Re-extracting the
    /// rendered text gives back an equal request.
    pub fn to_top_application(&self) -> String {
        self.render_top("top", "id")
    }

    /// `[@@decomp top ... ()]`
    pub fn to_attribute(&self) -> String {
        format!("[@@decomp {}]", self.to_top_application())
    }

    pub(crate) fn render_top(&self, head: &str, reference: &str) -> String {
        let refer = |name: &str| format!("[%{reference} {name}]");
        let list = |names: &[String]| {
            let items: Vec<_> = names.iter().map(|n| refer(n)).collect();
            format!("[{}]", items.join(" ; "))
        };

        let mut parts = vec![head.to_string()];
        if let Some(assuming) = &self.assuming {
            parts.push(format!("~assuming:{}", refer(assuming)));
        }
        if !self.basis.is_empty() {
            parts.push(format!("~basis:{}", list(&self.basis)));
        }
        if !self.rule_specs.is_empty() {
            parts.push(format!("~rule_specs:{}", list(&self.rule_specs)));
        }
        if self.prune {
            parts.push("~prune:true".to_string());
        }
        if let Some(ctx_simp) = self.ctx_simp {
            parts.push(format!("~ctx_simp:{ctx_simp}"));
        }
        if let Some(lift_bool) = self.lift_bool {
            parts.push(format!("~lift_bool:{lift_bool}"));
        }
        parts.push("()".to_string());
        parts.join(" ")
    }
}

/// Function marked `[@@opaque]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaqueDeclaration {
    pub name: String,
}

/// `[@@@import ...]` in one of its three forms:
///
/// ```text
/// [@@@import "path/to/file.iml"]
/// [@@@import Mod_name, "path/to/file.iml"]
/// [@@@import Mod_name, "path/to/file.iml", Extract_name]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportDeclaration {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub module_name: Option<String>,
    pub path: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub extract_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TheoremKind {
    Axiom,
    Theorem,
    Lemma,
}

/// `axiom`, `theorem` or `lemma` definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TheoremDeclaration {
    pub kind: TheoremKind,
    pub name: String,
}
