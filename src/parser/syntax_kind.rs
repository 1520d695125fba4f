//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all node and token kinds in an IML syntax tree. Node
//! kinds carry the snake_case names that structural queries refer to, so
//! the vocabulary here is the contract between the parser and every query.

/// All syntax kinds (tokens and nodes) in IML
///
/// Tokens are leaves (identifiers, keywords, punctuation).
/// Nodes are composite, including the named leaves such as `value_name`
/// which wrap a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,

    // =========================================================================
    // LITERALS AND NAMES
    // =========================================================================
    IDENT,              // lowercase identifier
    UIDENT,             // Capitalized identifier
    INT_LIT,            // 42, 0x1F, 3.14
    STRING_LIT,         // "hello" (split into quote/content tokens in the tree)
    STRING_TEXT,        // content of a string literal
    CHAR_LIT,           // 'c'
    TYPE_VAR,           // 'a
    DQUOTE,             // "

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACKET,          // [
    R_BRACKET,          // ]
    L_BRACE,            // {
    R_BRACE,            // }
    L_BRACKET_AT,       // [@
    L_BRACKET_AT_AT,    // [@@
    L_BRACKET_AT_AT_AT, // [@@@
    L_BRACKET_PERCENT,  // [%
    SEMICOLON,          // ;
    SEMI_SEMI,          // ;;
    COMMA,              // ,
    COLON,              // :
    COLON_COLON,        // ::
    DOT,                // .
    EQ,                 // =
    PIPE,               // |
    ARROW,              // ->
    TILDE,              // ~
    QUESTION,           // ?
    STAR,               // *
    MINUS,              // -
    MINUS_DOT,          // -.
    INFIX_OP,           // any other infix operator: + <> ==> << <|< || ...
    PREFIX_OP,          // ! ~| ?? ...

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    LET_KW,
    REC_KW,
    IN_KW,
    AND_KW,
    IF_KW,
    THEN_KW,
    ELSE_KW,
    FUN_KW,
    FUNCTION_KW,
    MATCH_KW,
    WITH_KW,
    WHEN_KW,
    AS_KW,
    OF_KW,
    TRUE_KW,
    FALSE_KW,
    TYPE_KW,
    OPEN_KW,
    MODULE_KW,
    STRUCT_KW,
    SIG_KW,
    BEGIN_KW,
    END_KW,
    MOD_KW,             // mod land lor lxor lsl lsr asr
    OR_KW,              // or
    VERIFY_KW,
    INSTANCE_KW,
    EVAL_KW,
    AXIOM_KW,
    THEOREM_KW,
    LEMMA_KW,

    // =========================================================================
    // NODES - items
    // =========================================================================
    COMPILATION_UNIT,
    VALUE_DEFINITION,
    LET_BINDING,
    PARAMETER,
    VERIFY_STATEMENT,
    INSTANCE_STATEMENT,
    EVAL_STATEMENT,
    AXIOM_DEFINITION,
    THEOREM_DEFINITION,
    LEMMA_DEFINITION,
    TYPE_DEFINITION,
    OPEN_MODULE,
    MODULE_DEFINITION,

    // Attributes and extensions
    ITEM_ATTRIBUTE,
    FLOATING_ATTRIBUTE,
    ATTRIBUTE,
    ATTRIBUTE_ID,
    ATTRIBUTE_PAYLOAD,
    EXPRESSION_ITEM,
    EXTENSION,

    // Expressions
    APPLICATION_EXPRESSION,
    LABELED_ARGUMENT,
    LABEL_NAME,
    INFIX_EXPRESSION,
    PREFIX_EXPRESSION,
    SIGN_EXPRESSION,
    IF_EXPRESSION,
    THEN_CLAUSE,
    ELSE_CLAUSE,
    FUN_EXPRESSION,
    FUNCTION_EXPRESSION,
    MATCH_EXPRESSION,
    MATCH_CASE,
    GUARD,
    LET_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
    SEQUENCE_EXPRESSION,
    TYPED_EXPRESSION,
    LIST_EXPRESSION,
    TUPLE_EXPRESSION,
    CONS_EXPRESSION,
    RECORD_EXPRESSION,
    FIELD_EXPRESSION,
    FIELD_GET_EXPRESSION,
    FIELD_PATH,
    FIELD_NAME,
    VALUE_PATH,
    VALUE_NAME,
    MODULE_PATH,
    MODULE_NAME,
    CONSTRUCTOR_PATH,
    CONSTRUCTOR_NAME,
    NUMBER,
    STRING,
    STRING_CONTENT,
    CHARACTER,
    BOOLEAN,
    UNIT,

    // Patterns
    VALUE_PATTERN,
    CONSTRUCTOR_PATTERN,
    TUPLE_PATTERN,
    CONS_PATTERN,
    LIST_PATTERN,
    OR_PATTERN,
    ALIAS_PATTERN,
    TYPED_PATTERN,
    PARENTHESIZED_PATTERN,
    RECORD_PATTERN,

    // Types (kept as loose token runs)
    TYPE_EXPRESSION,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::LET_KW as u16) && (self as u16) <= (Self::LEMMA_KW as u16)
    }

    /// Check if this kind is a node (as opposed to a token)
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::COMPILATION_UNIT as u16) && self != Self::__LAST
    }

    /// Keywords that start a top-level item
    pub fn starts_item(self) -> bool {
        matches!(
            self,
            Self::LET_KW
                | Self::VERIFY_KW
                | Self::INSTANCE_KW
                | Self::EVAL_KW
                | Self::AXIOM_KW
                | Self::THEOREM_KW
                | Self::LEMMA_KW
                | Self::TYPE_KW
                | Self::OPEN_KW
                | Self::MODULE_KW
                | Self::L_BRACKET_AT_AT_AT
        )
    }

    /// Every kind, in declaration order.
    pub fn all() -> impl Iterator<Item = SyntaxKind> {
        (0..Self::__LAST as u16).map(|raw| rowan::SyntaxKind(raw).into())
    }

    /// Look a node kind up by its query name.
    pub fn from_name(name: &str) -> Option<SyntaxKind> {
        Self::all().find(|kind| kind.is_node() && kind.name() == name)
    }

    /// The name used for this kind in queries and S-expressions.
    ///
    /// Tokens get their uppercase debug names; they are not addressable by
    /// node patterns.
    pub fn name(self) -> &'static str {
        use SyntaxKind::*;
        match self {
            WHITESPACE => "WHITESPACE",
            COMMENT => "COMMENT",
            IDENT => "IDENT",
            UIDENT => "UIDENT",
            INT_LIT => "INT_LIT",
            STRING_LIT => "STRING_LIT",
            STRING_TEXT => "STRING_TEXT",
            CHAR_LIT => "CHAR_LIT",
            TYPE_VAR => "TYPE_VAR",
            DQUOTE => "DQUOTE",
            L_PAREN => "L_PAREN",
            R_PAREN => "R_PAREN",
            L_BRACKET => "L_BRACKET",
            R_BRACKET => "R_BRACKET",
            L_BRACE => "L_BRACE",
            R_BRACE => "R_BRACE",
            L_BRACKET_AT => "L_BRACKET_AT",
            L_BRACKET_AT_AT => "L_BRACKET_AT_AT",
            L_BRACKET_AT_AT_AT => "L_BRACKET_AT_AT_AT",
            L_BRACKET_PERCENT => "L_BRACKET_PERCENT",
            SEMICOLON => "SEMICOLON",
            SEMI_SEMI => "SEMI_SEMI",
            COMMA => "COMMA",
            COLON => "COLON",
            COLON_COLON => "COLON_COLON",
            DOT => "DOT",
            EQ => "EQ",
            PIPE => "PIPE",
            ARROW => "ARROW",
            TILDE => "TILDE",
            QUESTION => "QUESTION",
            STAR => "STAR",
            MINUS => "MINUS",
            MINUS_DOT => "MINUS_DOT",
            INFIX_OP => "INFIX_OP",
            PREFIX_OP => "PREFIX_OP",
            LET_KW => "LET_KW",
            REC_KW => "REC_KW",
            IN_KW => "IN_KW",
            AND_KW => "AND_KW",
            IF_KW => "IF_KW",
            THEN_KW => "THEN_KW",
            ELSE_KW => "ELSE_KW",
            FUN_KW => "FUN_KW",
            FUNCTION_KW => "FUNCTION_KW",
            MATCH_KW => "MATCH_KW",
            WITH_KW => "WITH_KW",
            WHEN_KW => "WHEN_KW",
            AS_KW => "AS_KW",
            OF_KW => "OF_KW",
            TRUE_KW => "TRUE_KW",
            FALSE_KW => "FALSE_KW",
            TYPE_KW => "TYPE_KW",
            OPEN_KW => "OPEN_KW",
            MODULE_KW => "MODULE_KW",
            STRUCT_KW => "STRUCT_KW",
            SIG_KW => "SIG_KW",
            BEGIN_KW => "BEGIN_KW",
            END_KW => "END_KW",
            MOD_KW => "MOD_KW",
            OR_KW => "OR_KW",
            VERIFY_KW => "VERIFY_KW",
            INSTANCE_KW => "INSTANCE_KW",
            EVAL_KW => "EVAL_KW",
            AXIOM_KW => "AXIOM_KW",
            THEOREM_KW => "THEOREM_KW",
            LEMMA_KW => "LEMMA_KW",

            COMPILATION_UNIT => "compilation_unit",
            VALUE_DEFINITION => "value_definition",
            LET_BINDING => "let_binding",
            PARAMETER => "parameter",
            VERIFY_STATEMENT => "verify_statement",
            INSTANCE_STATEMENT => "instance_statement",
            EVAL_STATEMENT => "eval_statement",
            AXIOM_DEFINITION => "axiom_definition",
            THEOREM_DEFINITION => "theorem_definition",
            LEMMA_DEFINITION => "lemma_definition",
            TYPE_DEFINITION => "type_definition",
            OPEN_MODULE => "open_module",
            MODULE_DEFINITION => "module_definition",
            ITEM_ATTRIBUTE => "item_attribute",
            FLOATING_ATTRIBUTE => "floating_attribute",
            ATTRIBUTE => "attribute",
            ATTRIBUTE_ID => "attribute_id",
            ATTRIBUTE_PAYLOAD => "attribute_payload",
            EXPRESSION_ITEM => "expression_item",
            EXTENSION => "extension",
            APPLICATION_EXPRESSION => "application_expression",
            LABELED_ARGUMENT => "labeled_argument",
            LABEL_NAME => "label_name",
            INFIX_EXPRESSION => "infix_expression",
            PREFIX_EXPRESSION => "prefix_expression",
            SIGN_EXPRESSION => "sign_expression",
            IF_EXPRESSION => "if_expression",
            THEN_CLAUSE => "then_clause",
            ELSE_CLAUSE => "else_clause",
            FUN_EXPRESSION => "fun_expression",
            FUNCTION_EXPRESSION => "function_expression",
            MATCH_EXPRESSION => "match_expression",
            MATCH_CASE => "match_case",
            GUARD => "guard",
            LET_EXPRESSION => "let_expression",
            PARENTHESIZED_EXPRESSION => "parenthesized_expression",
            SEQUENCE_EXPRESSION => "sequence_expression",
            TYPED_EXPRESSION => "typed_expression",
            LIST_EXPRESSION => "list_expression",
            TUPLE_EXPRESSION => "tuple_expression",
            CONS_EXPRESSION => "cons_expression",
            RECORD_EXPRESSION => "record_expression",
            FIELD_EXPRESSION => "field_expression",
            FIELD_GET_EXPRESSION => "field_get_expression",
            FIELD_PATH => "field_path",
            FIELD_NAME => "field_name",
            VALUE_PATH => "value_path",
            VALUE_NAME => "value_name",
            MODULE_PATH => "module_path",
            MODULE_NAME => "module_name",
            CONSTRUCTOR_PATH => "constructor_path",
            CONSTRUCTOR_NAME => "constructor_name",
            NUMBER => "number",
            STRING => "string",
            STRING_CONTENT => "string_content",
            CHARACTER => "character",
            BOOLEAN => "boolean",
            UNIT => "unit",
            VALUE_PATTERN => "value_pattern",
            CONSTRUCTOR_PATTERN => "constructor_pattern",
            TUPLE_PATTERN => "tuple_pattern",
            CONS_PATTERN => "cons_pattern",
            LIST_PATTERN => "list_pattern",
            OR_PATTERN => "or_pattern",
            ALIAS_PATTERN => "alias_pattern",
            TYPED_PATTERN => "typed_pattern",
            PARENTHESIZED_PATTERN => "parenthesized_pattern",
            RECORD_PATTERN => "record_pattern",
            TYPE_EXPRESSION => "type_expression",
            ERROR => "ERROR",
            __LAST => "__LAST",
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImlLanguage {}

impl rowan::Language for ImlLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<ImlLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ImlLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ImlLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_names_resolve() {
        for name in [
            "verify_statement",
            "instance_statement",
            "axiom_definition",
            "theorem_definition",
            "lemma_definition",
            "eval_statement",
            "value_definition",
            "let_binding",
            "value_name",
            "item_attribute",
            "attribute_id",
            "attribute_payload",
            "expression_item",
            "application_expression",
            "value_path",
            "labeled_argument",
            "label_name",
            "list_expression",
            "extension",
            "boolean",
            "constructor_path",
            "constructor_name",
            "string",
            "string_content",
            "tuple_expression",
            "floating_attribute",
            "unit",
        ] {
            let kind = SyntaxKind::from_name(name);
            assert!(kind.is_some(), "missing kind for {name}");
            assert_eq!(kind.map(SyntaxKind::name), Some(name));
        }
    }

    #[test]
    fn test_tokens_are_not_addressable() {
        assert_eq!(SyntaxKind::from_name("IDENT"), None);
        assert_eq!(SyntaxKind::from_name("ERROR"), Some(SyntaxKind::ERROR));
        assert_eq!(SyntaxKind::from_name("verify_stmt"), None);
    }

    #[test]
    fn test_raw_round_trip() {
        for kind in SyntaxKind::all() {
            let raw: rowan::SyntaxKind = kind.into();
            assert_eq!(SyntaxKind::from(raw), kind);
        }
    }
}
