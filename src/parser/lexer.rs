//! Logos-based lexer for IML
//!
//! Fast tokenization using the logos crate. Every byte of the input ends up
//! in exactly one token, so the tree built on top is lossless.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Consume a (possibly nested) `(* ... *)` comment after its opening `(*`.
///
/// An unterminated comment runs to the end of the input.
fn lex_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"(*") {
            depth += 1;
            i += 2;
        } else if bytes[i..].starts_with(b"*)") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return true;
            }
        } else {
            i += 1;
        }
    }
    lex.bump(bytes.len());
    true
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token("(*", lex_comment)]
    Comment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-z_][a-zA-Z0-9_']*")]
    Ident,

    #[regex(r"[A-Z][a-zA-Z0-9_']*")]
    UIdent,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*")]
    Int,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\[\\'ntbr ]|\\[0-9][0-9][0-9])'")]
    Char,

    #[regex(r"'[a-z_][a-zA-Z0-9_]*")]
    TypeVar,

    // =========================================================================
    // ATTRIBUTE / EXTENSION OPENERS (must beat `[`)
    // =========================================================================
    #[token("[@@@")]
    LBracketAtAtAt,
    #[token("[@@")]
    LBracketAtAt,
    #[token("[@")]
    LBracketAt,
    #[token("[%")]
    LBracketPercent,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";;")]
    SemiSemi,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("=", priority = 3)]
    Eq,
    #[token("|", priority = 3)]
    Pipe,
    #[token("->")]
    Arrow,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token("*", priority = 3)]
    Star,
    #[token("-", priority = 3)]
    Minus,
    #[token("-.")]
    MinusDot,

    // =========================================================================
    // OPERATORS
    // =========================================================================
    #[regex(r"[=<>@^|&+\-*/$%][!$%&*+\-./:<=>?@^|~]*")]
    #[token("!=")]
    #[token(":=")]
    InfixOp,

    #[regex(r"![!$%&*+\-./:<=>?@^|~]*")]
    #[regex(r"[~?][!$%&*+\-./:<=>?@^|~]+")]
    PrefixOp,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("let")]
    LetKw,
    #[token("rec")]
    RecKw,
    #[token("in")]
    InKw,
    #[token("and")]
    AndKw,
    #[token("if")]
    IfKw,
    #[token("then")]
    ThenKw,
    #[token("else")]
    ElseKw,
    #[token("fun")]
    FunKw,
    #[token("function")]
    FunctionKw,
    #[token("match")]
    MatchKw,
    #[token("with")]
    WithKw,
    #[token("when")]
    WhenKw,
    #[token("as")]
    AsKw,
    #[token("of")]
    OfKw,
    #[token("true")]
    TrueKw,
    #[token("false")]
    FalseKw,
    #[token("type")]
    TypeKw,
    #[token("open")]
    OpenKw,
    #[token("module")]
    ModuleKw,
    #[token("struct")]
    StructKw,
    #[token("sig")]
    SigKw,
    #[token("begin")]
    BeginKw,
    #[token("end")]
    EndKw,
    #[token("mod")]
    #[token("land")]
    #[token("lor")]
    #[token("lxor")]
    #[token("lsl")]
    #[token("lsr")]
    #[token("asr")]
    ModKw,
    #[token("or")]
    OrKw,
    #[token("verify")]
    VerifyKw,
    #[token("instance")]
    InstanceKw,
    #[token("eval")]
    EvalKw,
    #[token("axiom")]
    AxiomKw,
    #[token("theorem")]
    TheoremKw,
    #[token("lemma")]
    LemmaKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            Comment => SyntaxKind::COMMENT,
            Ident => SyntaxKind::IDENT,
            UIdent => SyntaxKind::UIDENT,
            Int => SyntaxKind::INT_LIT,
            String => SyntaxKind::STRING_LIT,
            Char => SyntaxKind::CHAR_LIT,
            TypeVar => SyntaxKind::TYPE_VAR,
            LBracketAtAtAt => SyntaxKind::L_BRACKET_AT_AT_AT,
            LBracketAtAt => SyntaxKind::L_BRACKET_AT_AT,
            LBracketAt => SyntaxKind::L_BRACKET_AT,
            LBracketPercent => SyntaxKind::L_BRACKET_PERCENT,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            SemiSemi => SyntaxKind::SEMI_SEMI,
            Semicolon => SyntaxKind::SEMICOLON,
            Comma => SyntaxKind::COMMA,
            ColonColon => SyntaxKind::COLON_COLON,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Eq => SyntaxKind::EQ,
            Pipe => SyntaxKind::PIPE,
            Arrow => SyntaxKind::ARROW,
            Tilde => SyntaxKind::TILDE,
            Question => SyntaxKind::QUESTION,
            Star => SyntaxKind::STAR,
            Minus => SyntaxKind::MINUS,
            MinusDot => SyntaxKind::MINUS_DOT,
            InfixOp => SyntaxKind::INFIX_OP,
            PrefixOp => SyntaxKind::PREFIX_OP,
            LetKw => SyntaxKind::LET_KW,
            RecKw => SyntaxKind::REC_KW,
            InKw => SyntaxKind::IN_KW,
            AndKw => SyntaxKind::AND_KW,
            IfKw => SyntaxKind::IF_KW,
            ThenKw => SyntaxKind::THEN_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            FunKw => SyntaxKind::FUN_KW,
            FunctionKw => SyntaxKind::FUNCTION_KW,
            MatchKw => SyntaxKind::MATCH_KW,
            WithKw => SyntaxKind::WITH_KW,
            WhenKw => SyntaxKind::WHEN_KW,
            AsKw => SyntaxKind::AS_KW,
            OfKw => SyntaxKind::OF_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            TypeKw => SyntaxKind::TYPE_KW,
            OpenKw => SyntaxKind::OPEN_KW,
            ModuleKw => SyntaxKind::MODULE_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            SigKw => SyntaxKind::SIG_KW,
            BeginKw => SyntaxKind::BEGIN_KW,
            EndKw => SyntaxKind::END_KW,
            ModKw => SyntaxKind::MOD_KW,
            OrKw => SyntaxKind::OR_KW,
            VerifyKw => SyntaxKind::VERIFY_KW,
            InstanceKw => SyntaxKind::INSTANCE_KW,
            EvalKw => SyntaxKind::EVAL_KW,
            AxiomKw => SyntaxKind::AXIOM_KW,
            TheoremKw => SyntaxKind::THEOREM_KW,
            LemmaKw => SyntaxKind::LEMMA_KW,
        }
    }
}
