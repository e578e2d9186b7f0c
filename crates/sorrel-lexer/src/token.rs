//! Token types for the Sorrel lexer.
//!
//! Defines [`TokenKind`] covering every lexeme in the language and
//! [`Token`], which pairs a kind with a source [`Span`].

use sorrel_types::Span;
use std::fmt;

/// All 19 reserved identifiers in Sorrel.
///
/// These cannot be used as user-defined names. The lexer recognises each
/// one and emits a specific keyword token instead of
/// [`TokenKind::Identifier`]. The eight type keywords are here too; `func`
/// pulls double duty as the declaration keyword and the function type name.
pub const ALL_KEYWORDS: &[&str] = &[
    // Statements (9)
    "const", "mut", "func", "return", "if", "else", "while", "do", "for",
    // Literals (3)
    "true", "false", "null",
    // Type names (7; "func" is listed above)
    "int", "char", "float", "bool", "string", "obj", "void",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the Sorrel lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the Sorrel language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// Integer literal: `42`
    IntLit(i64),
    /// Float literal: `3.14`
    FloatLit(f64),
    /// String literal: `"hello"`
    StringLit(String),
    /// Char literal: `'a'`
    CharLit(char),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // ── Identifiers ──────────────────────────────────────────

    /// User-defined identifier: `my_var`, `total`
    Identifier(String),

    // ── Statement Keywords ───────────────────────────────────

    /// `const`
    Const,
    /// `mut`
    Mut,
    /// `func` (function declarations and the function type name)
    Func,
    /// `return`
    Return,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `do`
    Do,
    /// `for`
    For,

    // ── Type-Name Keywords ───────────────────────────────────

    /// `int`
    KwInt,
    /// `char`
    KwChar,
    /// `float`
    KwFloat,
    /// `bool`
    KwBool,
    /// `string`
    KwString,
    /// `obj`
    KwObj,
    /// `void`
    KwVoid,

    // ── Operators ────────────────────────────────────────────

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `=`
    Eq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,

    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `.`
    Dot,

    // ── Special ──────────────────────────────────────────────

    /// `#word` — an interpreter directive such as `#default` or `#silly`.
    /// Carries the word without the `#`.
    Directive(String),
    /// End of file
    Eof,
}

impl TokenKind {
    /// Look up a reserved identifier. Returns `Some(kind)` for all 19
    /// reserved words, `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            // Statements
            "const" => TokenKind::Const,
            "mut" => TokenKind::Mut,
            "func" => TokenKind::Func,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            // Literals
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            // Type names
            "int" => TokenKind::KwInt,
            "char" => TokenKind::KwChar,
            "float" => TokenKind::KwFloat,
            "bool" => TokenKind::KwBool,
            "string" => TokenKind::KwString,
            "obj" => TokenKind::KwObj,
            "void" => TokenKind::KwVoid,
            _ => return None,
        })
    }

    /// Returns `true` if this token kind is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Const
                | TokenKind::Mut
                | TokenKind::Func
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::KwInt
                | TokenKind::KwChar
                | TokenKind::KwFloat
                | TokenKind::KwBool
                | TokenKind::KwString
                | TokenKind::KwObj
                | TokenKind::KwVoid
        )
    }

    /// The textual type label a type keyword stands for, exactly as written
    /// in source. `None` for everything that is not a type keyword.
    ///
    /// This is the string the parser hands to the type resolver; `func`
    /// counts because a `func`-typed variable holds a function value.
    pub fn type_label(&self) -> Option<&'static str> {
        match self {
            TokenKind::KwInt => Some("int"),
            TokenKind::KwChar => Some("char"),
            TokenKind::KwFloat => Some("float"),
            TokenKind::KwBool => Some("bool"),
            TokenKind::KwString => Some("string"),
            TokenKind::KwObj => Some("obj"),
            TokenKind::Func => Some("func"),
            TokenKind::KwVoid => Some("void"),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Literals
            TokenKind::IntLit(n) => write!(f, "{n}"),
            TokenKind::FloatLit(n) => write!(f, "{n}"),
            TokenKind::StringLit(s) => write!(f, "\"{s}\""),
            TokenKind::CharLit(c) => write!(f, "'{c}'"),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::Null => f.write_str("null"),
            // Identifiers
            TokenKind::Identifier(s) => f.write_str(s),
            // Keywords — display the source text
            TokenKind::Const => f.write_str("const"),
            TokenKind::Mut => f.write_str("mut"),
            TokenKind::Func => f.write_str("func"),
            TokenKind::Return => f.write_str("return"),
            TokenKind::If => f.write_str("if"),
            TokenKind::Else => f.write_str("else"),
            TokenKind::While => f.write_str("while"),
            TokenKind::Do => f.write_str("do"),
            TokenKind::For => f.write_str("for"),
            TokenKind::KwInt => f.write_str("int"),
            TokenKind::KwChar => f.write_str("char"),
            TokenKind::KwFloat => f.write_str("float"),
            TokenKind::KwBool => f.write_str("bool"),
            TokenKind::KwString => f.write_str("string"),
            TokenKind::KwObj => f.write_str("obj"),
            TokenKind::KwVoid => f.write_str("void"),
            // Operators
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::StarStar => f.write_str("**"),
            TokenKind::PlusPlus => f.write_str("++"),
            TokenKind::MinusMinus => f.write_str("--"),
            TokenKind::PlusEq => f.write_str("+="),
            TokenKind::MinusEq => f.write_str("-="),
            TokenKind::StarEq => f.write_str("*="),
            TokenKind::SlashEq => f.write_str("/="),
            TokenKind::PercentEq => f.write_str("%="),
            TokenKind::AmpAmp => f.write_str("&&"),
            TokenKind::PipePipe => f.write_str("||"),
            TokenKind::Bang => f.write_str("!"),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::Eq => f.write_str("="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::GreaterEq => f.write_str(">="),
            // Punctuation
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Colon => f.write_str(":"),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Dot => f.write_str("."),
            // Special
            TokenKind::Directive(w) => write!(f, "#{w}"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
