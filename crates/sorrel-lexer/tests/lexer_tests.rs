//! Comprehensive lexer tests.
//!
//! Covers: all 19 reserved keywords, operators, literals (int, float,
//! string, char), comments, directives, whitespace handling, error
//! recovery, span positions, and the 100-iteration determinism test.

use sorrel_lexer::{Lexer, TokenKind};
use sorrel_types::{ErrorCode, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.sor", source);
    let result = Lexer::new(&sf).lex();
    result
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return all token kinds including Eof.
fn kinds_with_eof(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.sor", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/// Lex and return the error count.
fn error_count(source: &str) -> usize {
    let sf = SourceFile::new("test.sor", source);
    let result = Lexer::new(&sf).lex();
    result.errors.total_errors
}

/// Lex and return the first error message.
fn first_error(source: &str) -> String {
    let sf = SourceFile::new("test.sor", source);
    let result = Lexer::new(&sf).lex();
    result
        .errors
        .errors
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_default()
}

/// Lex and return the first error code.
fn first_code(source: &str) -> Option<ErrorCode> {
    let sf = SourceFile::new("test.sor", source);
    let result = Lexer::new(&sf).lex();
    result.errors.errors.first().map(|e| e.code)
}

// ─────────────────────────────────────────────────────────────────────
// All 19 reserved keywords
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_statement_keywords() {
    let pairs = [
        ("const", TokenKind::Const),
        ("mut", TokenKind::Mut),
        ("func", TokenKind::Func),
        ("return", TokenKind::Return),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("while", TokenKind::While),
        ("do", TokenKind::Do),
        ("for", TokenKind::For),
    ];
    for (src, expected) in &pairs {
        let k = kinds(src);
        assert_eq!(k, vec![expected.clone()], "keyword '{src}'");
    }
}

#[test]
fn test_literal_keywords() {
    let pairs = [
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("null", TokenKind::Null),
    ];
    for (src, expected) in &pairs {
        let k = kinds(src);
        assert_eq!(k, vec![expected.clone()], "keyword '{src}'");
    }
}

#[test]
fn test_type_name_keywords() {
    let pairs = [
        ("int", TokenKind::KwInt),
        ("char", TokenKind::KwChar),
        ("float", TokenKind::KwFloat),
        ("bool", TokenKind::KwBool),
        ("string", TokenKind::KwString),
        ("obj", TokenKind::KwObj),
        ("void", TokenKind::KwVoid),
    ];
    for (src, expected) in &pairs {
        let k = kinds(src);
        assert_eq!(k, vec![expected.clone()], "keyword '{src}'");
    }
}

#[test]
fn test_all_19_keywords() {
    // 9 statement + 3 literal + 7 type-name keywords
    let keywords: Vec<&str> = vec![
        "const", "mut", "func", "return", "if", "else", "while", "do", "for", "true", "false",
        "null", "int", "char", "float", "bool", "string", "obj", "void",
    ];
    assert_eq!(keywords.len(), 19);
    for kw in &keywords {
        let k = kinds(kw);
        assert_eq!(k.len(), 1, "keyword '{kw}' should lex to exactly 1 token");
        assert!(k[0].is_keyword(), "'{kw}' should be recognised as a keyword");
    }
}

#[test]
fn test_keywords_are_case_sensitive() {
    assert_eq!(kinds("Const"), vec![TokenKind::Identifier("Const".into())]);
    assert_eq!(kinds("INT"), vec![TokenKind::Identifier("INT".into())]);
    assert_eq!(kinds("While"), vec![TokenKind::Identifier("While".into())]);
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(
        kinds("constant"),
        vec![TokenKind::Identifier("constant".into())]
    );
    assert_eq!(kinds("iffy"), vec![TokenKind::Identifier("iffy".into())]);
    assert_eq!(
        kinds("donothing"),
        vec![TokenKind::Identifier("donothing".into())]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Operator tokens
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_all_operator_tokens() {
    let cases = [
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("%", TokenKind::Percent),
        ("**", TokenKind::StarStar),
        ("++", TokenKind::PlusPlus),
        ("--", TokenKind::MinusMinus),
        ("+=", TokenKind::PlusEq),
        ("-=", TokenKind::MinusEq),
        ("*=", TokenKind::StarEq),
        ("/=", TokenKind::SlashEq),
        ("%=", TokenKind::PercentEq),
        ("&&", TokenKind::AmpAmp),
        ("||", TokenKind::PipePipe),
        ("!", TokenKind::Bang),
        ("==", TokenKind::EqEq),
        ("!=", TokenKind::BangEq),
        ("=", TokenKind::Eq),
        ("<", TokenKind::Less),
        (">", TokenKind::Greater),
        ("<=", TokenKind::LessEq),
        (">=", TokenKind::GreaterEq),
    ];
    for (src, expected) in &cases {
        let k = kinds(src);
        assert_eq!(k, vec![expected.clone()], "operator '{src}'");
    }
}

#[test]
fn test_compound_operators_take_priority() {
    // Maximal munch: `++` is one token, the leftover `+` is another
    assert_eq!(
        kinds("x+++y"),
        vec![
            TokenKind::Identifier("x".into()),
            TokenKind::PlusPlus,
            TokenKind::Plus,
            TokenKind::Identifier("y".into()),
        ]
    );
    assert_eq!(
        kinds("2 ** 10"),
        vec![
            TokenKind::IntLit(2),
            TokenKind::StarStar,
            TokenKind::IntLit(10),
        ]
    );
}

#[test]
fn test_bang_is_a_token() {
    // `!` on its own is unary not
    assert_eq!(
        kinds("!done"),
        vec![TokenKind::Bang, TokenKind::Identifier("done".into())]
    );
    assert_eq!(error_count("!done"), 0);
}

#[test]
fn test_single_amp_and_pipe_error() {
    assert_eq!(error_count("a & b"), 1);
    assert!(first_error("a & b").contains("'&'"));

    assert_eq!(error_count("a | b"), 1);
    assert!(first_error("a | b").contains("'|'"));
}

// ─────────────────────────────────────────────────────────────────────
// Punctuation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_punctuation_tokens() {
    let cases = [
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("{", TokenKind::LBrace),
        ("}", TokenKind::RBrace),
        ("[", TokenKind::LBracket),
        ("]", TokenKind::RBracket),
        (",", TokenKind::Comma),
        (":", TokenKind::Colon),
        (";", TokenKind::Semicolon),
        (".", TokenKind::Dot),
    ];
    for (src, expected) in &cases {
        let k = kinds(src);
        assert_eq!(k, vec![expected.clone()], "punctuation '{src}'");
    }
}

// ─────────────────────────────────────────────────────────────────────
// Number literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_literals() {
    assert_eq!(kinds("0"), vec![TokenKind::IntLit(0)]);
    assert_eq!(kinds("42"), vec![TokenKind::IntLit(42)]);
    assert_eq!(kinds("999999"), vec![TokenKind::IntLit(999999)]);
}

#[test]
fn test_float_literals() {
    assert_eq!(kinds("3.15"), vec![TokenKind::FloatLit(3.15)]);
    assert_eq!(kinds("0.5"), vec![TokenKind::FloatLit(0.5)]);
    assert_eq!(kinds("100.0"), vec![TokenKind::FloatLit(100.0)]);
}

#[test]
fn test_number_followed_by_dot_no_digit() {
    // `42.` followed by something that isn't a digit: number + dot
    let k = kinds("42.field");
    assert_eq!(k[0], TokenKind::IntLit(42));
    assert_eq!(k[1], TokenKind::Dot);
    assert_eq!(k[2], TokenKind::Identifier("field".into()));
}

#[test]
fn test_largest_integer() {
    assert_eq!(
        kinds("9223372036854775807"),
        vec![TokenKind::IntLit(i64::MAX)]
    );
    assert_eq!(error_count("9223372036854775807"), 0);
}

#[test]
fn test_integer_overflow_is_an_error() {
    assert_eq!(error_count("9223372036854775808"), 1);
    assert_eq!(
        first_code("9223372036854775808"),
        Some(ErrorCode::INVALID_NUMBER)
    );
    // Error recovery still produces a token
    assert_eq!(kinds("9223372036854775808"), vec![TokenKind::IntLit(0)]);
}

// ─────────────────────────────────────────────────────────────────────
// String literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_plain_string() {
    assert_eq!(
        kinds(r#""hello""#),
        vec![TokenKind::StringLit("hello".into())]
    );
    assert_eq!(kinds(r#""""#), vec![TokenKind::StringLit("".into())]);
    assert_eq!(
        kinds(r#""hello world""#),
        vec![TokenKind::StringLit("hello world".into())]
    );
}

#[test]
fn test_string_escape_sequences() {
    assert_eq!(
        kinds(r#""a\"b""#),
        vec![TokenKind::StringLit("a\"b".into())]
    );
    assert_eq!(
        kinds(r#""a\\b""#),
        vec![TokenKind::StringLit("a\\b".into())]
    );
    assert_eq!(
        kinds(r#""a\nb""#),
        vec![TokenKind::StringLit("a\nb".into())]
    );
    assert_eq!(
        kinds(r#""a\tb""#),
        vec![TokenKind::StringLit("a\tb".into())]
    );
    assert_eq!(
        kinds(r#""a\rb""#),
        vec![TokenKind::StringLit("a\rb".into())]
    );
    assert_eq!(
        kinds(r#""a\0b""#),
        vec![TokenKind::StringLit("a\0b".into())]
    );
}

#[test]
fn test_string_with_unicode() {
    assert_eq!(
        kinds("\"héllo wörld\""),
        vec![TokenKind::StringLit("héllo wörld".into())]
    );
}

#[test]
fn test_unterminated_string_error() {
    assert_eq!(error_count(r#""unterminated"#), 1);
    assert_eq!(
        first_code(r#""unterminated"#),
        Some(ErrorCode::UNTERMINATED_STRING)
    );
    assert!(first_error(r#""unterminated"#).contains("Unterminated"));
}

#[test]
fn test_unterminated_string_stops_at_line_end() {
    // The string breaks at the newline; lexing resumes on the next line
    let k = kinds("\"abc\nconst");
    assert_eq!(
        k,
        vec![TokenKind::StringLit("abc".into()), TokenKind::Const]
    );
    assert_eq!(error_count("\"abc\nconst"), 1);
}

#[test]
fn test_invalid_escape_error() {
    assert_eq!(error_count(r#""\z""#), 1);
    assert_eq!(first_code(r#""\z""#), Some(ErrorCode::INVALID_ESCAPE));
    assert!(first_error(r#""\z""#).contains("escape sequence"));
}

#[test]
fn test_single_quote_escape_invalid_in_string() {
    // `\'` is a char-literal escape only
    assert_eq!(error_count(r#""don\'t""#), 1);
    assert_eq!(first_code(r#""don\'t""#), Some(ErrorCode::INVALID_ESCAPE));
    // Recovery keeps the character
    assert_eq!(
        kinds(r#""don\'t""#),
        vec![TokenKind::StringLit("don't".into())]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Character literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_char_literals() {
    assert_eq!(kinds("'a'"), vec![TokenKind::CharLit('a')]);
    assert_eq!(kinds("'Z'"), vec![TokenKind::CharLit('Z')]);
    assert_eq!(kinds("'0'"), vec![TokenKind::CharLit('0')]);
    assert_eq!(kinds("' '"), vec![TokenKind::CharLit(' ')]);
}

#[test]
fn test_char_escape_sequences() {
    assert_eq!(kinds(r"'\n'"), vec![TokenKind::CharLit('\n')]);
    assert_eq!(kinds(r"'\t'"), vec![TokenKind::CharLit('\t')]);
    assert_eq!(kinds(r"'\''"), vec![TokenKind::CharLit('\'')]);
    assert_eq!(kinds(r"'\\'"), vec![TokenKind::CharLit('\\')]);
    assert_eq!(kinds(r"'\0'"), vec![TokenKind::CharLit('\0')]);
}

#[test]
fn test_unicode_char_literal() {
    assert_eq!(kinds("'é'"), vec![TokenKind::CharLit('é')]);
}

#[test]
fn test_empty_char_literal_error() {
    assert_eq!(error_count("''"), 1);
    assert!(first_error("''").contains("Empty character literal"));
}

#[test]
fn test_overlong_char_literal_error() {
    assert_eq!(error_count("'ab'"), 1);
    assert_eq!(first_code("'ab'"), Some(ErrorCode::UNTERMINATED_CHAR));
    assert!(first_error("'ab'").contains("exactly one character"));
    // Recovery keeps the first character
    assert_eq!(kinds("'ab'"), vec![TokenKind::CharLit('a')]);
}

#[test]
fn test_unterminated_char_error() {
    assert_eq!(error_count("'a"), 1);
    assert_eq!(first_code("'a"), Some(ErrorCode::UNTERMINATED_CHAR));
    assert!(first_error("'a").contains("Unterminated character"));
}

// ─────────────────────────────────────────────────────────────────────
// Comments
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_single_line_comment_stripped() {
    let k = kinds("42 // this is a comment");
    assert_eq!(k, vec![TokenKind::IntLit(42)]);
}

#[test]
fn test_comment_only_line() {
    let k = kinds("// just a comment");
    assert!(k.is_empty());
}

#[test]
fn test_comment_before_code() {
    let k = kinds("// comment\n42");
    assert_eq!(k, vec![TokenKind::IntLit(42)]);
}

#[test]
fn test_block_comment_stripped() {
    let k = kinds("1 /* gone */ 2");
    assert_eq!(k, vec![TokenKind::IntLit(1), TokenKind::IntLit(2)]);
}

#[test]
fn test_block_comment_multiline() {
    let k = kinds("1 /* spans\nseveral\nlines */ 2");
    assert_eq!(k, vec![TokenKind::IntLit(1), TokenKind::IntLit(2)]);
    assert_eq!(error_count("1 /* spans\nseveral\nlines */ 2"), 0);
}

#[test]
fn test_block_comments_do_not_nest() {
    // The first `*/` closes the comment
    let k = kinds("/* a /* b */ x");
    assert_eq!(k, vec![TokenKind::Identifier("x".into())]);
}

#[test]
fn test_unterminated_block_comment_error() {
    assert_eq!(error_count("/* unclosed"), 1);
    assert_eq!(
        first_code("/* unclosed"),
        Some(ErrorCode::UNTERMINATED_COMMENT)
    );
}

#[test]
fn test_division_still_works() {
    let k = kinds("10 / 2");
    assert_eq!(
        k,
        vec![TokenKind::IntLit(10), TokenKind::Slash, TokenKind::IntLit(2)]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Whitespace handling
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_newlines_are_not_tokens() {
    let k = kinds("a\nb");
    assert_eq!(
        k,
        vec![
            TokenKind::Identifier("a".into()),
            TokenKind::Identifier("b".into()),
        ]
    );
}

#[test]
fn test_statements_split_across_lines() {
    let k = kinds("const int x\n  = 1;");
    assert_eq!(
        k,
        vec![
            TokenKind::Const,
            TokenKind::KwInt,
            TokenKind::Identifier("x".into()),
            TokenKind::Eq,
            TokenKind::IntLit(1),
            TokenKind::Semicolon,
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Directives
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_default_directive() {
    let k = kinds("#default const;");
    assert_eq!(
        k,
        vec![
            TokenKind::Directive("default".into()),
            TokenKind::Const,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_silly_directive() {
    let k = kinds("#silly;");
    assert_eq!(
        k,
        vec![TokenKind::Directive("silly".into()), TokenKind::Semicolon]
    );
}

#[test]
fn test_unknown_directive_word_still_lexes() {
    // The lexer carries any word; the parser decides whether it's known
    let k = kinds("#wibble;");
    assert_eq!(
        k,
        vec![TokenKind::Directive("wibble".into()), TokenKind::Semicolon]
    );
    assert_eq!(error_count("#wibble;"), 0);
}

#[test]
fn test_bare_hash_error() {
    assert_eq!(error_count("#"), 1);
    assert!(first_error("#").contains("directive name"));
}

#[test]
fn test_hash_with_space_error() {
    // `# default` is not a directive
    assert_eq!(error_count("# default"), 1);
    let k = kinds("# default");
    assert_eq!(k, vec![TokenKind::Identifier("default".into())]);
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_unexpected_character_error() {
    assert_eq!(error_count("@"), 1);
    assert_eq!(first_code("@"), Some(ErrorCode::UNEXPECTED_CHARACTER));
    assert!(first_error("@").contains("Unexpected character"));
}

#[test]
fn test_error_recovery_continues() {
    // Multiple errors should be collected, and lexing continues
    let sf = SourceFile::new("test.sor", "@ $ ~ 42");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 3);
    // Should still produce the 42 token
    assert!(result
        .tokens
        .iter()
        .any(|t| t.kind == TokenKind::IntLit(42)));
}

#[test]
fn test_max_errors_cap() {
    // Generate more than 20 errors; the lexer stops at MAX_ERRORS
    let source = "@ ".repeat(25);
    let sf = SourceFile::new("test.sor", &source);
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 20, "should cap at MAX_ERRORS");
}

#[test]
fn test_errors_never_panic() {
    // A pile of malformed input must produce diagnostics, not a panic
    let nasty = ["\"\\", "'", "'\\", "\"abc\\", "#", "@é@", "9999999999999999999999"];
    for src in &nasty {
        let sf = SourceFile::new("test.sor", *src);
        let result = Lexer::new(&sf).lex();
        assert!(result.errors.total_errors >= 1, "input {src:?}");
        assert_eq!(result.tokens.last().map(|t| t.kind.clone()), Some(TokenKind::Eof));
    }
}

// ─────────────────────────────────────────────────────────────────────
// Eof
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_eof_on_empty_source() {
    let k = kinds_with_eof("");
    assert_eq!(k, vec![TokenKind::Eof]);
}

#[test]
fn test_eof_on_whitespace_only() {
    let k = kinds_with_eof("  \n\t\n  ");
    assert_eq!(k, vec![TokenKind::Eof]);
}

#[test]
fn test_eof_always_last() {
    let k = kinds_with_eof("42 + 3;");
    assert_eq!(k.last(), Some(&TokenKind::Eof));
}

// ─────────────────────────────────────────────────────────────────────
// Complex real-world samples
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_variable_declaration() {
    let k = kinds("mut int count = 0;");
    assert_eq!(
        k,
        vec![
            TokenKind::Mut,
            TokenKind::KwInt,
            TokenKind::Identifier("count".into()),
            TokenKind::Eq,
            TokenKind::IntLit(0),
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_function_declaration() {
    let k = kinds("func add(int a, int b): int { return a + b; }");
    assert_eq!(
        k,
        vec![
            TokenKind::Func,
            TokenKind::Identifier("add".into()),
            TokenKind::LParen,
            TokenKind::KwInt,
            TokenKind::Identifier("a".into()),
            TokenKind::Comma,
            TokenKind::KwInt,
            TokenKind::Identifier("b".into()),
            TokenKind::RParen,
            TokenKind::Colon,
            TokenKind::KwInt,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::Identifier("a".into()),
            TokenKind::Plus,
            TokenKind::Identifier("b".into()),
            TokenKind::Semicolon,
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn test_for_loop_header() {
    let k = kinds("for (mut int i = 0; i < 10; i++)");
    assert_eq!(
        k,
        vec![
            TokenKind::For,
            TokenKind::LParen,
            TokenKind::Mut,
            TokenKind::KwInt,
            TokenKind::Identifier("i".into()),
            TokenKind::Eq,
            TokenKind::IntLit(0),
            TokenKind::Semicolon,
            TokenKind::Identifier("i".into()),
            TokenKind::Less,
            TokenKind::IntLit(10),
            TokenKind::Semicolon,
            TokenKind::Identifier("i".into()),
            TokenKind::PlusPlus,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_array_type_declaration() {
    let k = kinds("int[] xs = [1, 2];");
    assert_eq!(
        k,
        vec![
            TokenKind::KwInt,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Identifier("xs".into()),
            TokenKind::Eq,
            TokenKind::LBracket,
            TokenKind::IntLit(1),
            TokenKind::Comma,
            TokenKind::IntLit(2),
            TokenKind::RBracket,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_object_literal() {
    let k = kinds(r#"{name: string = "sorrel"}"#);
    assert_eq!(
        k,
        vec![
            TokenKind::LBrace,
            TokenKind::Identifier("name".into()),
            TokenKind::Colon,
            TokenKind::KwString,
            TokenKind::Eq,
            TokenKind::StringLit("sorrel".into()),
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn test_member_and_index_access() {
    let k = kinds(r#"team.lead; xs[0];"#);
    assert_eq!(
        k,
        vec![
            TokenKind::Identifier("team".into()),
            TokenKind::Dot,
            TokenKind::Identifier("lead".into()),
            TokenKind::Semicolon,
            TokenKind::Identifier("xs".into()),
            TokenKind::LBracket,
            TokenKind::IntLit(0),
            TokenKind::RBracket,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_compound_assignment() {
    let k = kinds("count += 1;");
    assert_eq!(
        k,
        vec![
            TokenKind::Identifier("count".into()),
            TokenKind::PlusEq,
            TokenKind::IntLit(1),
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_logical_expression() {
    let k = kinds("a && b || !c");
    assert_eq!(
        k,
        vec![
            TokenKind::Identifier("a".into()),
            TokenKind::AmpAmp,
            TokenKind::Identifier("b".into()),
            TokenKind::PipePipe,
            TokenKind::Bang,
            TokenKind::Identifier("c".into()),
        ]
    );
}

#[test]
fn test_comparison_chain() {
    let k = kinds("a >= b && c != d");
    assert_eq!(
        k,
        vec![
            TokenKind::Identifier("a".into()),
            TokenKind::GreaterEq,
            TokenKind::Identifier("b".into()),
            TokenKind::AmpAmp,
            TokenKind::Identifier("c".into()),
            TokenKind::BangEq,
            TokenKind::Identifier("d".into()),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Span correctness
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_span_positions() {
    let sf = SourceFile::new("test.sor", "const int x = 42;");
    let result = Lexer::new(&sf).lex();
    let tokens: Vec<_> = result
        .tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .collect();

    // `const` spans cols 1-5
    assert_eq!(tokens[0].span.start_line, 1);
    assert_eq!(tokens[0].span.start_col, 1);
    assert_eq!(tokens[0].span.end_col, 5);

    // `int` starts at col 7
    assert_eq!(tokens[1].span.start_col, 7);
    assert_eq!(tokens[1].span.end_col, 9);

    // `x` at col 11
    assert_eq!(tokens[2].span.start_col, 11);

    // `=` at col 13
    assert_eq!(tokens[3].span.start_col, 13);

    // `42` spans cols 15-16
    assert_eq!(tokens[4].span.start_col, 15);
    assert_eq!(tokens[4].span.end_col, 16);

    // `;` at col 17
    assert_eq!(tokens[5].span.start_col, 17);
}

#[test]
fn test_span_multiline() {
    let sf = SourceFile::new("test.sor", "a;\nb;");
    let result = Lexer::new(&sf).lex();
    let tokens: Vec<_> = result
        .tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .collect();

    assert_eq!(tokens[0].span.start_line, 1);
    assert_eq!(tokens[2].span.start_line, 2);
    assert_eq!(tokens[2].span.start_col, 1);
}

#[test]
fn test_error_span_points_at_offender() {
    let sf = SourceFile::new("test.sor", "mut int x = 1 @ 2;");
    let result = Lexer::new(&sf).lex();
    let err = &result.errors.errors[0];
    assert_eq!(err.span.start_line, 1);
    assert_eq!(err.span.start_col, 15);
    assert_eq!(err.source_line, "mut int x = 1 @ 2;");
}

// ─────────────────────────────────────────────────────────────────────
// 100-iteration determinism test
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_lexer_determinism_100_iterations() {
    let source = r#"
// Inventory tracking demo
#default const;

mut int count = 0;
const string name = "widgets";
float rate = 2.5;

func restock(int amount): int {
    count += amount;
    return count;
}

/* warehouse rules:
   never drop below zero */
for (mut int i = 0; i < 3; i++) {
    restock(i * 2);
}

while (count > 10) {
    count--;
}

do {
    count++;
} while (count < 5);

obj item = {sku: string = "W-1", qty: int = 0};
print(item.sku);
print(item["qty"]);
"#;

    let sf = SourceFile::new("inventory.sor", source);
    let baseline = Lexer::new(&sf).lex();
    let baseline_kinds: Vec<TokenKind> = baseline.tokens.into_iter().map(|t| t.kind).collect();

    for i in 1..100 {
        let sf = SourceFile::new("inventory.sor", source);
        let result = Lexer::new(&sf).lex();
        let result_kinds: Vec<TokenKind> = result.tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            baseline_kinds, result_kinds,
            "Determinism failed on iteration {i}: token streams differ"
        );
    }
}
