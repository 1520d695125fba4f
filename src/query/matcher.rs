//! Backtracking matcher for compiled patterns
//!
//! Every function returns all the binding lists under which its pattern
//! matches, in search order. Each solution extends the bindings it was
//! given, so outer captures stay visible to inner predicates.

use super::compile::{ChildPattern, Pattern, PatternKind, Predicate, PredicateArg, Quantifier};
use crate::parser::fields::children_with_fields;
use crate::parser::{Field, SyntaxElement, SyntaxNode};
use rowan::NodeOrToken;
use smol_str::SmolStr;

/// Capture names paired with the nodes bound to them, in binding order
pub(crate) type Bindings = Vec<(SmolStr, SyntaxNode)>;

/// A non-trivia child element with the field it occupies
type Candidate = (SyntaxElement, Option<Field>);

/// Every way `pattern` matches with `node` as its root
pub(crate) fn match_root(pattern: &Pattern, node: &SyntaxNode) -> Vec<Bindings> {
    match_element(pattern, &NodeOrToken::Node(node.clone()), &Vec::new())
}

fn match_element(pattern: &Pattern, element: &SyntaxElement, base: &Bindings) -> Vec<Bindings> {
    let mut bound = base.clone();
    if let NodeOrToken::Node(node) = element {
        for capture in &pattern.captures {
            bound.push((capture.clone(), node.clone()));
        }
    }

    match &pattern.kind {
        PatternKind::Any => match element {
            NodeOrToken::Node(_) => vec![bound],
            NodeOrToken::Token(_) => Vec::new(),
        },
        PatternKind::Token(text) => {
            if element.as_token().is_some_and(|token| token.text() == text.as_str()) {
                vec![bound]
            } else {
                Vec::new()
            }
        }
        PatternKind::Alternation(alternatives) => alternatives
            .iter()
            .flat_map(|alternative| match_element(alternative, element, &bound))
            .collect(),
        PatternKind::Node {
            kind,
            children,
            predicates,
        } => {
            let NodeOrToken::Node(node) = element else {
                return Vec::new();
            };
            if kind.is_some_and(|kind| node.kind() != kind) {
                return Vec::new();
            }
            let solutions = if children.is_empty() {
                vec![bound]
            } else {
                match_sequence(children, &candidates(node), 0, bound)
            };
            solutions
                .into_iter()
                .filter(|bindings| predicates.iter().all(|predicate| holds(predicate, bindings)))
                .collect()
        }
    }
}

fn match_child(child: &ChildPattern, candidate: &Candidate, base: &Bindings) -> Vec<Bindings> {
    let (element, field) = candidate;
    if child.field.is_some() && child.field != *field {
        return Vec::new();
    }
    match_element(&child.pattern, element, base)
}

/// Match `patterns` against `candidates[start..]`, skipping siblings as needed.
fn match_sequence(
    patterns: &[ChildPattern],
    candidates: &[Candidate],
    start: usize,
    base: Bindings,
) -> Vec<Bindings> {
    let Some((first, rest)) = patterns.split_first() else {
        return vec![base];
    };
    let mut solutions = Vec::new();

    match first.quantifier {
        Quantifier::One | Quantifier::Optional => {
            for index in start..candidates.len() {
                for bindings in match_child(first, &candidates[index], &base) {
                    solutions.extend(match_sequence(rest, candidates, index + 1, bindings));
                }
            }
            if first.quantifier == Quantifier::Optional {
                solutions.extend(match_sequence(rest, candidates, start, base));
            }
        }
        Quantifier::ZeroOrMore | Quantifier::OneOrMore => {
            for index in start..candidates.len() {
                if skippable(first, &candidates[index]) {
                    continue;
                }
                // (position after the item, bindings so far) per matched item;
                // each item keeps its first solution
                let mut ends: Vec<(usize, Bindings)> = Vec::new();
                let mut current = base.clone();
                let mut pos = index;
                while let Some(candidate) = candidates.get(pos) {
                    pos += 1;
                    if skippable(first, candidate) {
                        continue;
                    }
                    let Some(next) = match_child(first, candidate, &current).into_iter().next() else {
                        break;
                    };
                    current = next;
                    ends.push((pos, current.clone()));
                }
                // Longest run first
                while let Some((next, bindings)) = ends.pop() {
                    solutions.extend(match_sequence(rest, candidates, next, bindings));
                }
            }
            if first.quantifier == Quantifier::ZeroOrMore {
                solutions.extend(match_sequence(rest, candidates, start, base));
            }
        }
    }
    solutions
}

fn bound<'a>(bindings: &'a Bindings, capture: &'a SmolStr) -> impl Iterator<Item = &'a SyntaxNode> + 'a {
    bindings
        .iter()
        .filter(move |(name, _)| name == capture)
        .map(|(_, node)| node)
}

/// Unbound captures satisfy every predicate.
fn holds(predicate: &Predicate, bindings: &Bindings) -> bool {
    match predicate {
        Predicate::Eq {
            capture,
            value: PredicateArg::Text(text),
            negated,
        } => bound(bindings, capture).all(|node| (node.text() == text.as_str()) != *negated),
        Predicate::Eq {
            capture,
            value: PredicateArg::Capture(other),
            negated,
        } => {
            let others: Vec<String> = bound(bindings, other).map(|n| n.text().to_string()).collect();
            bound(bindings, capture).all(|node| {
                let text = node.text().to_string();
                others.iter().all(|o| (*o == text) != *negated)
            })
        }
        Predicate::AnyOf { capture, values } => bound(bindings, capture).all(|node| {
            let text = node.text().to_string();
            values.iter().any(|value| *value == text)
        }),
        Predicate::Match { capture, regex } => {
            bound(bindings, capture).all(|node| regex.is_match(&node.text().to_string()))
        }
    }
}

/// Quantified runs step over elements of the other sort (tokens vs. nodes)
fn skippable(child: &ChildPattern, candidate: &Candidate) -> bool {
    child.pattern.matches_tokens() != candidate.0.as_token().is_some()
}

fn candidates(node: &SyntaxNode) -> Vec<Candidate> {
    let mut fields = children_with_fields(node).into_iter().map(|(_, field)| field);
    node.children_with_tokens()
        .filter(|element| !element.kind().is_trivia())
        .map(|element| {
            let field = match &element {
                NodeOrToken::Node(_) => fields.next().flatten(),
                NodeOrToken::Token(_) => None,
            };
            (element, field)
        })
        .collect()
}
