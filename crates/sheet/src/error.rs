//! Error types for stylesheet parsing and rendering.

use thiserror::Error;

/// Malformed stylesheet input.
///
/// Raised for bad selectors, declarations, attribute filters, pseudo-class
/// arguments and at-rule heads. Parsing stops at the first error.
///
/// # Examples
///
/// ```rust
/// use sheet::parser::parse_stylesheet;
///
/// // Missing value after colon
/// let result = parse_stylesheet("p { color: }");
/// assert!(result.is_err());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("CSS syntax error: {message}")]
pub struct StyleSyntaxError {
    pub message: String,
}

impl StyleSyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Invalid use of [`RenderFlags`](crate::RenderFlags).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// `INLINE` and `AT_RULES` were requested together.
    #[error("INLINE and AT_RULES render flags can not be combined")]
    IncompatibleFlags,

    /// An at-rule has no inline form.
    #[error("at-rules can not be rendered inline")]
    InlineAtRule,
}
