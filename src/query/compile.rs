//! Query compiler
//!
//! Turns query source into [`Pattern`] trees, resolving node kinds and field
//! names against the grammar vocabulary as it goes.
//!
//! ```text
//! query     = pattern*
//! pattern   = atom quantifier? capture*
//! atom      = '(' (kind | '_') child* ')'
//!           | '(' pattern predicate* ')'
//!           | '[' pattern+ ']'
//!           | '_' | string
//! child     = (field ':')? pattern | predicate
//! predicate = '(' '#name' (capture | string)* ')'
//! ```

use super::lexer::{QueryToken, QueryTokenKind, tokenize, unescape};
use crate::error::QueryError;
use crate::parser::{Field, SyntaxKind};
use regex::Regex;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    pub kind: PatternKind,
    pub captures: Vec<SmolStr>,
}

#[derive(Debug, Clone)]
pub(crate) enum PatternKind {
    /// `(kind ...)`; `None` for `(_)`
    Node {
        kind: Option<SyntaxKind>,
        children: Vec<ChildPattern>,
        predicates: Vec<Predicate>,
    },
    /// `_`
    Any,
    /// `"text"`, matched against tokens
    Token(SmolStr),
    /// `[ p1 p2 ... ]`
    Alternation(Vec<Pattern>),
}

#[derive(Debug, Clone)]
pub(crate) struct ChildPattern {
    pub field: Option<Field>,
    pub pattern: Pattern,
    pub quantifier: Quantifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quantifier {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

#[derive(Debug, Clone)]
pub(crate) enum PredicateArg {
    Text(SmolStr),
    Capture(SmolStr),
}

#[derive(Debug, Clone)]
pub(crate) enum Predicate {
    Eq {
        capture: SmolStr,
        value: PredicateArg,
        negated: bool,
    },
    AnyOf {
        capture: SmolStr,
        values: Vec<SmolStr>,
    },
    Match {
        capture: SmolStr,
        regex: Regex,
    },
}

impl Pattern {
    fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            captures: Vec::new(),
        }
    }

    /// Does this pattern match tokens rather than nodes?
    pub fn matches_tokens(&self) -> bool {
        match &self.kind {
            PatternKind::Token(_) => true,
            PatternKind::Alternation(alternatives) => alternatives.iter().all(Pattern::matches_tokens),
            PatternKind::Node { .. } | PatternKind::Any => false,
        }
    }

    /// Captures that sit under a `?`, `*` or `+` child anywhere below this
    /// pattern.
    pub fn quantified_captures(&self) -> FxHashSet<SmolStr> {
        let mut names = FxHashSet::default();
        self.collect_quantified(false, &mut names);
        names
    }

    fn collect_quantified(&self, quantified: bool, names: &mut FxHashSet<SmolStr>) {
        if quantified {
            names.extend(self.captures.iter().cloned());
        }
        match &self.kind {
            PatternKind::Node { children, .. } => {
                for child in children {
                    let inner = quantified || child.quantifier != Quantifier::One;
                    child.pattern.collect_quantified(inner, names);
                }
            }
            PatternKind::Alternation(alternatives) => {
                for alternative in alternatives {
                    alternative.collect_quantified(quantified, names);
                }
            }
            PatternKind::Any | PatternKind::Token(_) => {}
        }
    }
}

/// Compile every top-level pattern in `source`
pub(crate) fn compile(source: &str) -> Result<Vec<Pattern>, QueryError> {
    let tokens = tokenize(source)
        .map_err(|offset| QueryError::syntax(offset, "unexpected character"))?;
    let mut compiler = Compiler {
        tokens,
        pos: 0,
        end: source.len(),
        declared: FxHashSet::default(),
        referenced: Vec::new(),
    };

    let mut patterns = Vec::new();
    while !compiler.at_end() {
        let offset = compiler.offset();
        let pattern = compiler.parse_pattern()?;
        if pattern.matches_tokens() {
            return Err(QueryError::syntax(offset, "top-level pattern must match a node"));
        }
        compiler.check_references()?;
        patterns.push(pattern);
    }
    Ok(patterns)
}

struct Compiler<'a> {
    tokens: Vec<QueryToken<'a>>,
    pos: usize,
    end: usize,
    /// Captures declared by the current top-level pattern
    declared: FxHashSet<SmolStr>,
    /// Captures used by its predicates, with their offsets
    referenced: Vec<(SmolStr, usize)>,
}

impl<'a> Compiler<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current(&self) -> Option<QueryToken<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek(&self, n: usize) -> Option<QueryToken<'a>> {
        self.tokens.get(self.pos + n).copied()
    }

    fn at(&self, kind: QueryTokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    fn offset(&self) -> usize {
        self.current().map_or(self.end, |t| t.offset)
    }

    fn bump(&mut self) -> Option<QueryToken<'a>> {
        let token = self.current();
        self.pos += 1;
        token
    }

    fn expect(&mut self, kind: QueryTokenKind, what: &str) -> Result<QueryToken<'a>, QueryError> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(QueryError::syntax(
                token.offset,
                format!("expected {what}, found `{}`", token.text),
            )),
            None => Err(QueryError::syntax(self.end, format!("expected {what}, found end of query"))),
        }
    }

    fn check_references(&mut self) -> Result<(), QueryError> {
        let declared = std::mem::take(&mut self.declared);
        for (name, offset) in self.referenced.drain(..) {
            if !declared.contains(&name) {
                return Err(QueryError::UnknownCapture {
                    name: name.to_string(),
                    offset,
                });
            }
        }
        Ok(())
    }

    fn parse_pattern(&mut self) -> Result<Pattern, QueryError> {
        let pattern = self.parse_atom()?;
        self.parse_captures(pattern)
    }

    fn parse_captures(&mut self, mut pattern: Pattern) -> Result<Pattern, QueryError> {
        while let Some(token) = self.current().filter(|t| t.kind == QueryTokenKind::Capture) {
            if pattern.matches_tokens() {
                return Err(QueryError::syntax(
                    token.offset,
                    "anonymous tokens cannot be captured",
                ));
            }
            self.pos += 1;
            let name = SmolStr::new(&token.text[1..]);
            self.declared.insert(name.clone());
            pattern.captures.push(name);
        }
        Ok(pattern)
    }

    fn parse_atom(&mut self) -> Result<Pattern, QueryError> {
        let Some(token) = self.current() else {
            return Err(QueryError::syntax(self.end, "expected pattern, found end of query"));
        };
        match token.kind {
            QueryTokenKind::LParen => self.parse_parenthesized(),
            QueryTokenKind::LBracket => self.parse_alternation(),
            QueryTokenKind::String => {
                self.pos += 1;
                Ok(Pattern::new(PatternKind::Token(SmolStr::new(unescape(token.text)))))
            }
            QueryTokenKind::Identifier if token.text == "_" => {
                self.pos += 1;
                Ok(Pattern::new(PatternKind::Any))
            }
            _ => Err(QueryError::syntax(
                token.offset,
                format!("expected pattern, found `{}`", token.text),
            )),
        }
    }

    fn parse_alternation(&mut self) -> Result<Pattern, QueryError> {
        let open = self.expect(QueryTokenKind::LBracket, "`[`")?;
        let mut alternatives = Vec::new();
        while !self.at(QueryTokenKind::RBracket) {
            if self.at_end() {
                return Err(QueryError::syntax(open.offset, "unclosed `[`"));
            }
            alternatives.push(self.parse_pattern()?);
        }
        self.pos += 1;
        if alternatives.is_empty() {
            return Err(QueryError::syntax(open.offset, "empty alternation"));
        }
        Ok(Pattern::new(PatternKind::Alternation(alternatives)))
    }

    fn parse_parenthesized(&mut self) -> Result<Pattern, QueryError> {
        let open = self.expect(QueryTokenKind::LParen, "`(`")?;
        let Some(head) = self.current() else {
            return Err(QueryError::syntax(open.offset, "unclosed `(`"));
        };

        let kind = match head.kind {
            QueryTokenKind::Identifier if head.text == "_" => None,
            QueryTokenKind::Identifier => Some(
                SyntaxKind::from_name(head.text)
                    .ok_or_else(|| QueryError::unknown_node_type(head.text, head.offset))?,
            ),
            QueryTokenKind::LParen | QueryTokenKind::LBracket => {
                return self.parse_wrapped(open.offset);
            }
            QueryTokenKind::Predicate => {
                return Err(QueryError::syntax(
                    head.offset,
                    "predicate must appear inside a node pattern",
                ));
            }
            _ => {
                return Err(QueryError::syntax(
                    head.offset,
                    format!("expected node type, found `{}`", head.text),
                ));
            }
        };
        self.pos += 1;

        let mut children = Vec::new();
        let mut predicates = Vec::new();
        loop {
            let Some(token) = self.current() else {
                return Err(QueryError::syntax(open.offset, "unclosed `(`"));
            };
            if token.kind == QueryTokenKind::RParen {
                self.pos += 1;
                break;
            }
            if token.kind == QueryTokenKind::LParen
                && self.peek(1).is_some_and(|t| t.kind == QueryTokenKind::Predicate)
            {
                predicates.push(self.parse_predicate()?);
                continue;
            }
            children.push(self.parse_child(kind)?);
        }

        Ok(Pattern::new(PatternKind::Node {
            kind,
            children,
            predicates,
        }))
    }

    /// `((kind ...) @cap (#eq? @cap "x"))`: one pattern with predicates attached
    fn parse_wrapped(&mut self, open: usize) -> Result<Pattern, QueryError> {
        let mut pattern = self.parse_pattern()?;
        let mut extra = Vec::new();
        while self.at(QueryTokenKind::LParen)
            && self.peek(1).is_some_and(|t| t.kind == QueryTokenKind::Predicate)
        {
            extra.push(self.parse_predicate()?);
        }
        if self.at_end() {
            return Err(QueryError::syntax(open, "unclosed `(`"));
        }
        if !self.at(QueryTokenKind::RParen) {
            return Err(QueryError::syntax(
                self.offset(),
                "grouped sibling sequences are not supported",
            ));
        }
        self.pos += 1;

        if !extra.is_empty() {
            match &mut pattern.kind {
                PatternKind::Node { predicates, .. } => predicates.extend(extra),
                _ => {
                    return Err(QueryError::syntax(
                        open,
                        "predicates need a node pattern to attach to",
                    ));
                }
            }
        }
        Ok(pattern)
    }

    fn parse_child(&mut self, parent: Option<SyntaxKind>) -> Result<ChildPattern, QueryError> {
        let mut field = None;
        if let (Some(name), Some(colon)) = (self.current(), self.peek(1)) {
            if name.kind == QueryTokenKind::Identifier && colon.kind == QueryTokenKind::Colon {
                let resolved = Field::from_name(name.text)
                    .ok_or_else(|| QueryError::unknown_field(name.text, name.offset))?;
                match parent {
                    Some(parent) if !resolved.applies_to(parent) => {
                        return Err(QueryError::field_not_applicable(
                            name.text,
                            parent.name(),
                            name.offset,
                        ));
                    }
                    _ => {}
                }
                field = Some(resolved);
                self.pos += 2;
            }
        }

        let atom = self.parse_atom()?;
        let quantifier = match self.current().map(|t| t.kind) {
            Some(QueryTokenKind::Question) => Quantifier::Optional,
            Some(QueryTokenKind::Star) => Quantifier::ZeroOrMore,
            Some(QueryTokenKind::Plus) => Quantifier::OneOrMore,
            _ => Quantifier::One,
        };
        if quantifier != Quantifier::One {
            self.pos += 1;
        }
        let pattern = self.parse_captures(atom)?;

        Ok(ChildPattern {
            field,
            pattern,
            quantifier,
        })
    }

    fn parse_predicate(&mut self) -> Result<Predicate, QueryError> {
        let open = self.expect(QueryTokenKind::LParen, "`(`")?;
        let name = self.expect(QueryTokenKind::Predicate, "predicate")?;

        let mut args: Vec<(PredicateArg, usize)> = Vec::new();
        loop {
            let Some(token) = self.bump() else {
                return Err(QueryError::syntax(open.offset, "unclosed predicate"));
            };
            match token.kind {
                QueryTokenKind::RParen => break,
                QueryTokenKind::Capture => {
                    let capture = SmolStr::new(&token.text[1..]);
                    self.referenced.push((capture.clone(), token.offset));
                    args.push((PredicateArg::Capture(capture), token.offset));
                }
                QueryTokenKind::String => {
                    args.push((PredicateArg::Text(SmolStr::new(unescape(token.text))), token.offset));
                }
                _ => {
                    return Err(QueryError::syntax(
                        token.offset,
                        format!("unexpected `{}` in predicate", token.text),
                    ));
                }
            }
        }

        let mut args = args.into_iter();
        let capture = match args.next() {
            Some((PredicateArg::Capture(capture), _)) => capture,
            Some((PredicateArg::Text(_), offset)) => {
                return Err(QueryError::syntax(offset, "predicate must start with a capture"));
            }
            None => {
                return Err(QueryError::syntax(name.offset, "predicate needs a capture"));
            }
        };
        let rest: Vec<_> = args.collect();

        match name.text {
            "#eq?" | "#not-eq?" => {
                let [(value, _)] = <[_; 1]>::try_from(rest).map_err(|_| {
                    QueryError::syntax(name.offset, format!("{} takes two arguments", name.text))
                })?;
                Ok(Predicate::Eq {
                    capture,
                    value,
                    negated: name.text == "#not-eq?",
                })
            }
            "#any-of?" => {
                let values = rest
                    .into_iter()
                    .map(|(arg, offset)| match arg {
                        PredicateArg::Text(text) => Ok(text),
                        PredicateArg::Capture(_) => Err(QueryError::syntax(
                            offset,
                            "#any-of? takes string arguments",
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Predicate::AnyOf { capture, values })
            }
            "#match?" => match rest.as_slice() {
                [(PredicateArg::Text(source), _)] => {
                    let regex = Regex::new(source).map_err(|err| QueryError::InvalidRegex {
                        pattern: source.to_string(),
                        message: err.to_string(),
                    })?;
                    Ok(Predicate::Match { capture, regex })
                }
                _ => Err(QueryError::syntax(
                    name.offset,
                    "#match? takes a capture and a regex string",
                )),
            },
            other => Err(QueryError::syntax(
                name.offset,
                format!("unknown predicate `{other}`"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_one(source: &str) -> Pattern {
        let mut patterns = compile(source).unwrap();
        assert_eq!(patterns.len(), 1);
        patterns.remove(0)
    }

    #[test]
    fn test_compile_nested_pattern() {
        let pattern = compile_one("(let_binding pattern: (value_name) @name body: (_) @body)");
        let PatternKind::Node { kind, children, .. } = pattern.kind else {
            panic!("expected node pattern");
        };
        assert_eq!(kind, Some(SyntaxKind::LET_BINDING));
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].field, Some(Field::Pattern));
        assert_eq!(children[0].pattern.captures, vec!["name"]);
        assert_eq!(children[1].field, Some(Field::Body));
    }

    #[test]
    fn test_quantifier_before_capture() {
        let pattern = compile_one("(application_expression (labeled_argument)* @args (unit))");
        let PatternKind::Node { children, .. } = pattern.kind else {
            panic!("expected node pattern");
        };
        assert_eq!(children[0].quantifier, Quantifier::ZeroOrMore);
        assert_eq!(children[0].pattern.captures, vec!["args"]);
        assert_eq!(children[1].quantifier, Quantifier::One);
    }

    #[test]
    fn test_wrapped_predicates_attach_to_inner_pattern() {
        let pattern = compile_one(r#"((attribute_id) @id (#eq? @id "decomp"))"#);
        let PatternKind::Node { predicates, .. } = pattern.kind else {
            panic!("expected node pattern");
        };
        assert_eq!(predicates.len(), 1);
    }

    #[test]
    fn test_unknown_node_type() {
        let err = compile("(verify_stmt)").unwrap_err();
        assert!(matches!(err, QueryError::GrammarMismatch { offset: 1, .. }));
    }

    #[test]
    fn test_field_not_valid_on_parent() {
        let err = compile("(value_path body: (_))").unwrap_err();
        assert!(matches!(err, QueryError::GrammarMismatch { .. }));
        assert!(err.to_string().contains("value_path"));
    }

    #[test]
    fn test_unknown_capture_in_predicate() {
        let err = compile(r#"(value_name (#eq? @missing "x"))"#).unwrap_err();
        assert!(matches!(err, QueryError::UnknownCapture { ref name, .. } if name == "missing"));
    }

    #[test]
    fn test_invalid_regex() {
        let err = compile(r#"((value_name) @n (#match? @n "("))"#).unwrap_err();
        assert!(matches!(err, QueryError::InvalidRegex { .. }));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(compile("(value_name"), Err(QueryError::Syntax { .. })));
        assert!(matches!(compile("\"let\""), Err(QueryError::Syntax { .. })));
        assert!(matches!(compile("(value_path \"x\" @c)"), Err(QueryError::Syntax { .. })));
        assert!(matches!(
            compile(r#"((value_name) @n (#frob? @n "x"))"#),
            Err(QueryError::Syntax { .. })
        ));
    }
}
