use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span attached to every token, AST node and diagnostic.
///
/// Line and column values are 1-based so they can be shown to users as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Span covering `[start_col, end_col]` on one line.
    pub fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Self::new(line, start_col, line, end_col)
    }

    /// Smallest span covering both inputs.
    ///
    /// Endpoints compare lexicographically by (line, column).
    pub fn merge(self, other: Span) -> Span {
        let start = (self.start_line, self.start_col).min((other.start_line, other.start_col));
        let end = (self.end_line, self.end_col).max((other.end_line, other.end_col));
        Span::new(start.0, start.1, end.0, end.1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A named unit of source text, kept around so diagnostics can quote the
/// offending line.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte offset of each line start, cached at construction.
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Text of the given 1-based line, without its terminator.
    ///
    /// `None` when the line number is out of range.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)?;
        let rest = &self.source[start..];
        let line = match rest.find('\n') {
            Some(nl) => &rest[..nl],
            None => rest,
        };
        Some(line.trim_end_matches('\r'))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
