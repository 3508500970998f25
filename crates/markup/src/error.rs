//! Error types for markup parsing.

use thiserror::Error;

/// A fatal markup error.
///
/// `line` and `col` are 1-based and point at the token that caused the
/// failure. The column counts characters, not bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (line {line}, col {col})")]
pub struct MarkupError {
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl MarkupError {
    /// Build an error for the byte `offset` of `source`.
    pub fn at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, col) = line_col(source, offset);
        Self {
            line,
            col,
            message: message.into(),
        }
    }
}

/// Convert a byte offset into a 1-based (line, column) pair.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}
