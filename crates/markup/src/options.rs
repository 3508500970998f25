use crate::tags::DEFAULT_SELF_CLOSING;

/// Options controlling how strictly markup is parsed.
///
/// # Example
///
/// ```
/// use markup::ParseOptions;
///
/// let options = ParseOptions::default()
///     .with_auto_close(false)
///     .with_self_closing_tag("my-icon");
///
/// assert!(!options.auto_close);
/// assert!(options.allows_self_closing("MY-ICON"));
/// assert!(!options.allows_self_closing("td"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Close unterminated elements implicitly instead of failing.
    pub auto_close: bool,
    /// Non-void elements that may be written as `<name/>`.
    pub self_closing: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            auto_close: true,
            self_closing: DEFAULT_SELF_CLOSING.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ParseOptions {
    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = auto_close;
        self
    }

    pub fn with_self_closing_tag(mut self, name: impl Into<String>) -> Self {
        self.self_closing.push(name.into());
        self
    }

    pub fn allows_self_closing(&self, name: &str) -> bool {
        self.self_closing.iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}
