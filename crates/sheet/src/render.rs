use bitflags::bitflags;

use crate::error::RenderError;

bitflags! {
    /// Output modes for rendering declarations, styles and stylesheets.
    ///
    /// # Example
    ///
    /// ```
    /// use sheet::RenderFlags;
    ///
    /// let flags = RenderFlags::AT_RULES | RenderFlags::STYLES;
    /// assert!(flags.validate().is_ok());
    /// assert!((RenderFlags::INLINE | RenderFlags::AT_RULES).validate().is_err());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderFlags: u8 {
        /// Bare `name:value;` pairs, no selectors
        const INLINE    = 0b0000_0001;
        /// Include at-rule blocks
        const AT_RULES  = 0b0000_0010;
        /// Include ordinary style blocks
        const STYLES    = 0b0000_0100;
        /// Keep inherited declarations in inline output
        const INHERITED = 0b0000_1000;
    }
}

impl RenderFlags {
    /// Everything a stylesheet contains, in block form.
    pub fn all_blocks() -> Self {
        RenderFlags::AT_RULES | RenderFlags::STYLES
    }

    /// Rejects flag combinations that have no meaning.
    pub fn validate(self) -> Result<Self, RenderError> {
        if self.contains(RenderFlags::INLINE | RenderFlags::AT_RULES) {
            Err(RenderError::IncompatibleFlags)
        } else {
            Ok(self)
        }
    }
}

/// Prefix every non-empty line of `text` with a tab.
pub(crate) fn indent(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            out.push_str(line);
        } else {
            out.push('\t');
            out.push_str(line);
        }
    }
    out
}
