//! Core Sorrel lexer: converts source text to a token stream.
//!
//! Features:
//! - All Sorrel tokens (19 reserved words, operators, punctuation, literals)
//! - Single-line (`//`) and block (`/* ... */`) comments stripped
//! - `#word` directives lexed as a single token
//! - Error recovery: collects up to 20 errors instead of stopping at the first
//! - Semicolon-terminated statements (newlines are plain whitespace)

use sorrel_types::{CompileErrors, ErrorCode, SorrelError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The Sorrel lexer.
///
/// Converts source text into a vector of [`Token`]s, collecting up to
/// [`sorrel_types::MAX_ERRORS`] errors along the way.
pub struct Lexer<'src> {
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// File name (for errors).
    file_name: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Collected errors.
    errors: CompileErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            file_name: &source_file.name,
            pos: 0,
            line: 1,
            col: 1,
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume one full UTF-8 scalar value starting at the current byte.
    ///
    /// The source comes from a `String`, so the bytes are always valid
    /// UTF-8; `None` only at end of input.
    fn advance_char(&mut self) -> Option<char> {
        let first = self.peek()?;
        let len = match first {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => 4,
        };
        let end = (self.pos + len).min(self.source.len());
        let ch = std::str::from_utf8(&self.source[self.pos..end])
            .ok()
            .and_then(|s| s.chars().next());
        for _ in self.pos..end {
            self.advance();
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn source_line_at(&self, line: u32) -> String {
        self.source_file.line(line).unwrap_or("").to_string()
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_line_at(span.start_line);
        let err = SorrelError::new(self.file_name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    fn emit_error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let source_line = self.source_line_at(span.start_line);
        let err = SorrelError::new(self.file_name, code, message, span, source_line)
            .with_suggestion(suggestion);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace (including newlines) and comments. Statements end
    /// at `;`, so newlines carry no token.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    // Consume everything until end-of-line
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

    /// Skip a block comment (`/* ... */`). Block comments do not nest; an
    /// unterminated one is an error.
    fn skip_block_comment(&mut self) {
        let start_line = self.line;
        let start_col = self.col;
        // Consume `/*`
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNTERMINATED_COMMENT,
                        "Unterminated block comment",
                        span,
                        "Close the comment with '*/'",
                    );
                    break;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance();
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token.
    fn scan_token(&mut self) -> Token {
        self.skip_trivia();

        // If we've hit the error cap, stop immediately
        if self.errors.has_errors() && self.errors.total_errors >= sorrel_types::MAX_ERRORS {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        let start_line = self.line;
        let start_col = self.col;
        let start_pos = self.pos;
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, self.current_span()),
        };

        match ch {
            // ── Literals ──
            b'"' => self.scan_string(start_line, start_col),
            b'\'' => self.scan_char(start_line, start_col),
            b'0'..=b'9' => self.scan_number(start_pos, start_line, start_col),

            // ── Identifiers & keywords ──
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.scan_identifier(start_pos, start_line, start_col)
            }

            // ── Directives ──
            b'#' => {
                if matches!(self.peek(), Some(b'a'..=b'z' | b'A'..=b'Z' | b'_')) {
                    let word_start = self.pos;
                    while let Some(c) = self.peek() {
                        if c.is_ascii_alphanumeric() || c == b'_' {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    let word =
                        std::str::from_utf8(&self.source[word_start..self.pos]).unwrap_or("");
                    Token::new(
                        TokenKind::Directive(word.to_string()),
                        self.span_from(start_line, start_col),
                    )
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        "Expected a directive name after '#'",
                        span,
                        "Directives are written like '#default const;' or '#silly;'",
                    );
                    self.scan_token()
                }
            }

            // ── Operators & punctuation ──
            b'+' => {
                if self.peek() == Some(b'+') {
                    self.advance();
                    Token::new(TokenKind::PlusPlus, self.span_from(start_line, start_col))
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::PlusEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Plus, self.span_from(start_line, start_col))
                }
            }

            b'-' => {
                if self.peek() == Some(b'-') {
                    self.advance();
                    Token::new(TokenKind::MinusMinus, self.span_from(start_line, start_col))
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::MinusEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Minus, self.span_from(start_line, start_col))
                }
            }

            b'*' => {
                if self.peek() == Some(b'*') {
                    self.advance();
                    Token::new(TokenKind::StarStar, self.span_from(start_line, start_col))
                } else if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::StarEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Star, self.span_from(start_line, start_col))
                }
            }

            b'/' => {
                // Comments were consumed by skip_trivia, so bare / is division
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::SlashEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Slash, self.span_from(start_line, start_col))
                }
            }

            b'%' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::PercentEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Percent, self.span_from(start_line, start_col))
                }
            }

            b'=' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::EqEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Eq, self.span_from(start_line, start_col))
                }
            }

            b'!' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::BangEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Bang, self.span_from(start_line, start_col))
                }
            }

            b'<' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::LessEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Less, self.span_from(start_line, start_col))
                }
            }

            b'>' => {
                if self.peek() == Some(b'=') {
                    self.advance();
                    Token::new(TokenKind::GreaterEq, self.span_from(start_line, start_col))
                } else {
                    Token::new(TokenKind::Greater, self.span_from(start_line, start_col))
                }
            }

            b'&' => {
                if self.peek() == Some(b'&') {
                    self.advance();
                    Token::new(TokenKind::AmpAmp, self.span_from(start_line, start_col))
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        "Unexpected character '&'",
                        span,
                        "Use '&&' for logical and",
                    );
                    self.scan_token()
                }
            }

            b'|' => {
                if self.peek() == Some(b'|') {
                    self.advance();
                    Token::new(TokenKind::PipePipe, self.span_from(start_line, start_col))
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        "Unexpected character '|'",
                        span,
                        "Use '||' for logical or",
                    );
                    self.scan_token()
                }
            }

            b'(' => Token::new(TokenKind::LParen, self.span_from(start_line, start_col)),
            b')' => Token::new(TokenKind::RParen, self.span_from(start_line, start_col)),
            b'{' => Token::new(TokenKind::LBrace, self.span_from(start_line, start_col)),
            b'}' => Token::new(TokenKind::RBrace, self.span_from(start_line, start_col)),
            b'[' => Token::new(TokenKind::LBracket, self.span_from(start_line, start_col)),
            b']' => Token::new(TokenKind::RBracket, self.span_from(start_line, start_col)),
            b',' => Token::new(TokenKind::Comma, self.span_from(start_line, start_col)),
            b':' => Token::new(TokenKind::Colon, self.span_from(start_line, start_col)),
            b';' => Token::new(TokenKind::Semicolon, self.span_from(start_line, start_col)),
            b'.' => Token::new(TokenKind::Dot, self.span_from(start_line, start_col)),

            _ => {
                // Consume any UTF-8 continuation bytes so one bad character
                // produces one error
                while matches!(self.peek(), Some(0x80..=0xBF)) {
                    self.advance();
                }
                let span = self.span_from(start_line, start_col);
                let text = String::from_utf8_lossy(&self.source[start_pos..self.pos]);
                self.emit_error(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    format!("Unexpected character '{}'", text),
                    span,
                );
                // Error recovery: skip the character and try again
                self.scan_token()
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        // We already consumed the first digit
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }

        // Check for decimal point; a trailing `.` with no digit after it
        // belongs to the next token
        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.advance(); // consume '.'
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or("0");

        if is_float {
            let value: f64 = text.parse().unwrap_or(0.0);
            Token::new(TokenKind::FloatLit(value), span)
        } else {
            match text.parse::<i64>() {
                Ok(value) => Token::new(TokenKind::IntLit(value), span),
                Err(_) => {
                    self.emit_error_with_suggestion(
                        ErrorCode::INVALID_NUMBER,
                        format!("Integer literal '{}' is out of range", text),
                        span,
                        "The largest representable integer is 9223372036854775807",
                    );
                    Token::new(TokenKind::IntLit(0), span)
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start_pos: usize, start_line: u32, start_col: u32) -> Token {
        // First character was already consumed (letter or `_`)
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        let span = self.span_from(start_line, start_col);
        let text = std::str::from_utf8(&self.source[start_pos..self.pos]).unwrap_or("");

        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));

        Token::new(kind, span)
    }

    // ─────────────────────────────────────────────────────────────
    // String & character literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting after the opening `"`. Strings may
    /// not span lines; an unterminated one stops at the end of the line.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut buf = String::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    // Unterminated string
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNTERMINATED_STRING,
                        "Unterminated string literal",
                        span,
                        "Close the string with '\"' before the end of the line",
                    );
                    return Token::new(
                        TokenKind::StringLit(buf),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'"') => {
                    // End of string
                    self.advance();
                    return Token::new(
                        TokenKind::StringLit(buf),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'\\') => {
                    if let Some(escaped) = self.scan_escape(false) {
                        buf.push(escaped);
                    }
                }
                Some(_) => {
                    if let Some(ch) = self.advance_char() {
                        buf.push(ch);
                    }
                }
            }
        }
    }

    /// Scan a character literal starting after the opening `'`.
    fn scan_char(&mut self, start_line: u32, start_col: u32) -> Token {
        let value = match self.peek() {
            None | Some(b'\n') => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNTERMINATED_CHAR,
                    "Unterminated character literal",
                    span,
                );
                return Token::new(TokenKind::CharLit('\0'), span);
            }
            Some(b'\'') => {
                // Empty literal `''`
                self.advance();
                let span = self.span_from(start_line, start_col);
                self.emit_error_with_suggestion(
                    ErrorCode::UNEXPECTED_CHARACTER,
                    "Empty character literal",
                    span,
                    "A character literal holds exactly one character, like 'a'",
                );
                return Token::new(TokenKind::CharLit('\0'), span);
            }
            Some(b'\\') => self.scan_escape(true).unwrap_or('\0'),
            Some(_) => self.advance_char().unwrap_or('\0'),
        };

        match self.peek() {
            Some(b'\'') => {
                self.advance();
            }
            _ => {
                // Error recovery: consume up to the closing quote or the
                // end of the line
                let mut closed = false;
                while let Some(ch) = self.peek() {
                    if ch == b'\n' {
                        break;
                    }
                    self.advance();
                    if ch == b'\'' {
                        closed = true;
                        break;
                    }
                }
                let span = self.span_from(start_line, start_col);
                if closed {
                    self.emit_error_with_suggestion(
                        ErrorCode::UNTERMINATED_CHAR,
                        "Character literal must contain exactly one character",
                        span,
                        "Use a string literal (\"...\") for more than one character",
                    );
                } else {
                    self.emit_error(
                        ErrorCode::UNTERMINATED_CHAR,
                        "Unterminated character literal",
                        span,
                    );
                }
            }
        }

        Token::new(
            TokenKind::CharLit(value),
            self.span_from(start_line, start_col),
        )
    }

    /// Scan an escape sequence after the `\`. `in_char` is true inside a
    /// character literal, where `\'` is also valid.
    /// Returns the unescaped character, or `None` if the input ended.
    fn scan_escape(&mut self, in_char: bool) -> Option<char> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance(); // consume the '\'

        match self.advance() {
            Some(b'n') => Some('\n'),
            Some(b't') => Some('\t'),
            Some(b'r') => Some('\r'),
            Some(b'\\') => Some('\\'),
            Some(b'"') => Some('"'),
            Some(b'0') => Some('\0'),
            Some(b'\'') if in_char => Some('\''),
            Some(ch) => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INVALID_ESCAPE,
                    format!("Invalid escape sequence '\\{}'", ch as char),
                    span,
                );
                Some(ch as char) // error recovery: emit the char as-is
            }
            None => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INVALID_ESCAPE,
                    "Unexpected end of file in escape sequence",
                    span,
                );
                None
            }
        }
    }
}
