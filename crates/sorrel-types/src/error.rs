use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of errors stored per compilation unit; further errors are
/// counted but dropped.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic severity.
///
/// The front end currently only emits `Error`; `Warning` is reserved for
/// lint-style diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Type,
}

/// Numeric error code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNEXPECTED_CHARACTER: Self = Self(101);
    pub const UNTERMINATED_STRING: Self = Self(102);
    pub const UNTERMINATED_CHAR: Self = Self(103);
    pub const UNTERMINATED_COMMENT: Self = Self(104);
    pub const INVALID_ESCAPE: Self = Self(105);
    pub const INVALID_NUMBER: Self = Self(106);
    pub const UNKNOWN_DIRECTIVE: Self = Self(107);
    pub const STRUCTURAL_LIMIT_EXCEEDED: Self = Self(108);

    // ── Type errors (E200–E299) ──
    pub const UNKNOWN_TYPE: Self = Self(200);
    pub const UNKNOWN_OPERATOR: Self = Self(201);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Type,
            _ => ErrorCategory::Syntax, // fallback
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Type => write!(f, "type"),
        }
    }
}

/// A structured front-end diagnostic.
///
/// Tools consume these as JSON; the fields are the contract, not the
/// rendered message text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SorrelError {
    /// Source file name.
    pub file: String,
    /// Error code (e.g., E200).
    pub code: ErrorCode,
    pub severity: Severity,
    /// Derived from `code`.
    pub category: ErrorCategory,
    /// Human-readable message.
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The offending source line, quoted for context.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SorrelError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for SorrelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for SorrelError {}

/// Failure of one of the two textual resolvers.
///
/// Carries only the offending text; the parser owns the span and wraps this
/// into a [`SorrelError`] when it surfaces the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownLabel {
    #[error("unknown type label '{0}'")]
    Type(String),
    #[error("unknown operator '{0}'")]
    Operator(String),
}

impl UnknownLabel {
    /// The text that failed to resolve.
    pub fn label(&self) -> &str {
        match self {
            Self::Type(s) | Self::Operator(s) => s,
        }
    }

    /// The diagnostic code this failure maps to.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Type(_) => ErrorCode::UNKNOWN_TYPE,
            Self::Operator(_) => ErrorCode::UNKNOWN_OPERATOR,
        }
    }
}

/// Accumulated diagnostics for one compilation unit, serializable for
/// tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<SorrelError>,
    pub warnings: Vec<SorrelError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            total_errors: 0,
            total_warnings: 0,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: SorrelError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    pub fn push_warning(&mut self, warning: SorrelError) {
        self.warnings.push(warning);
        self.total_warnings += 1;
    }

    /// Number of errors dropped by the MAX_ERRORS cap.
    pub fn truncated(&self) -> usize {
        self.total_errors - self.errors.len()
    }
}
