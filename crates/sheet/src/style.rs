//! Declarations and styles.

use crate::error::StyleSyntaxError;
use crate::parser::values::split_top_level;
use crate::render::RenderFlags;
use crate::selector::{Selector, Specificity};

/// A single `name: value` pair with its cascade flags.
///
/// Equality compares names only: two declarations are "the same" when one
/// would override the other.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
    /// Came from an inline `style` attribute.
    pub inline: bool,
    /// Passed down from an ancestor rather than matched directly.
    pub inherited: bool,
    /// Specificity of the selector of the style this declaration came from.
    pub origin: Specificity,
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
            inline: false,
            inherited: false,
            origin: Specificity::default(),
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// Parses `name: value`, optionally followed by `!important` and `;`.
    ///
    /// ```
    /// use sheet::Declaration;
    ///
    /// let d = Declaration::parse("Text-Align : right !IMPORTANT;").unwrap();
    /// assert_eq!(d.name, "text-align");
    /// assert_eq!(d.value, "right");
    /// assert!(d.important);
    /// ```
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        let body = text.trim();
        let body = body.strip_suffix(';').unwrap_or(body).trim_end();
        let (body, important) = strip_important(body);
        if body.is_empty() {
            return Err(StyleSyntaxError::new("empty declaration"));
        }

        let Some((name, value)) = body.split_once(':') else {
            return Err(StyleSyntaxError::new(format!(
                "expected ':' in declaration '{body}'"
            )));
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(StyleSyntaxError::new(format!(
                "invalid property name in '{body}'"
            )));
        }
        if value.is_empty() {
            return Err(StyleSyntaxError::new(format!("missing value for '{name}'")));
        }

        // Custom properties are case-sensitive.
        let name = if name.starts_with("--") {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };
        Ok(Self {
            important,
            ..Self::new(name, value)
        })
    }

    /// `name:value;` for [`RenderFlags::INLINE`], otherwise a tab-indented
    /// block line.
    pub fn render(&self, flags: RenderFlags) -> String {
        let important = if self.important { "!important" } else { "" };
        if flags.contains(RenderFlags::INLINE) {
            format!("{}:{}{};", self.name, self.value, important)
        } else {
            format!("\t{}:{}{};", self.name, self.value, important)
        }
    }
}

fn strip_important(body: &str) -> (&str, bool) {
    const IMPORTANT: &str = "!important";
    match body
        .len()
        .checked_sub(IMPORTANT.len())
        .and_then(|at| body.get(at..).map(|tail| (at, tail)))
    {
        Some((at, tail)) if tail.eq_ignore_ascii_case(IMPORTANT) => (body[..at].trim_end(), true),
        _ => (body, false),
    }
}

/// A selector with its declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub selector: Selector,
    pub(crate) declarations: Vec<Declaration>,
    inline: bool,
    inherited: bool,
}

impl Style {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            declarations: Vec::new(),
            inline: false,
            inherited: false,
        }
    }

    /// An empty `* {}` style, the starting point for resolved styles.
    pub fn universal() -> Self {
        Self::new(Selector::universal())
    }

    /// Builds a style from a selector and a declaration list body.
    ///
    /// ```
    /// use sheet::Style;
    ///
    /// let style = Style::parse("h1.title", "color: red; margin: 0").unwrap();
    /// assert_eq!(style.value("margin"), Some("0"));
    /// ```
    pub fn parse(selector: &str, body: &str) -> Result<Self, StyleSyntaxError> {
        Self::with_body(Selector::parse(selector)?, body)
    }

    pub fn with_body(selector: Selector, body: &str) -> Result<Self, StyleSyntaxError> {
        let mut style = Self::new(selector);
        for piece in split_top_level(body, ';') {
            if !piece.is_empty() {
                style.add_declaration(Declaration::parse(piece)?);
            }
        }
        Ok(style)
    }

    /// Parses the body of a `style` attribute into a universal style.
    pub fn from_declarations(text: &str) -> Result<Self, StyleSyntaxError> {
        Self::with_body(Selector::universal(), text)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Adds a declaration owned by this style. A repeated name overrides the
    /// earlier one unless that one is `!important`.
    pub fn add_declaration(&mut self, mut declaration: Declaration) {
        declaration.origin = self.selector.specificity();
        declaration.inline = self.inline;
        declaration.inherited = self.inherited;
        match self
            .declarations
            .iter_mut()
            .find(|d| d.name == declaration.name)
        {
            Some(existing) => existing.merge(&declaration),
            None => self.declarations.push(declaration),
        }
    }

    pub fn get_declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn has_declaration(&self, name: &str) -> bool {
        self.get_declaration(name).is_some()
    }

    /// The value of `name`, if declared.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get_declaration(name).map(|d| d.value.as_str())
    }

    /// Replaces the value of `name`, adding the declaration if missing.
    pub fn set_declaration(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.declarations.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.value = value,
            None => self.add_declaration(Declaration::new(name, value)),
        }
    }

    pub fn remove_declaration(&mut self, name: &str) -> Option<Declaration> {
        let index = self.declarations.iter().position(|d| d.name == name)?;
        Some(self.declarations.remove(index))
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Marks the style (and every declaration it owns) as inline.
    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
        for d in &mut self.declarations {
            d.inline = inline;
        }
    }

    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    /// Marks the style (and every declaration it owns) as inherited.
    pub fn set_inherited(&mut self, inherited: bool) {
        self.inherited = inherited;
        for d in &mut self.declarations {
            d.inherited = inherited;
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn specificity(&self) -> Specificity {
        self.selector.specificity()
    }

    /// Renders the style. With [`RenderFlags::INLINE`] only the declarations
    /// are emitted, and inherited ones are dropped unless
    /// [`RenderFlags::INHERITED`] is also set.
    pub fn render(&self, flags: RenderFlags) -> String {
        if flags.contains(RenderFlags::INLINE) {
            let keep_inherited = flags.contains(RenderFlags::INHERITED);
            return self
                .declarations
                .iter()
                .filter(|d| keep_inherited || !d.inherited)
                .map(|d| d.render(flags))
                .collect();
        }

        let mut out = format!("{} {{\n", self.selector);
        for d in &self.declarations {
            out.push_str(&d.render(flags));
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_malformed() {
        for text in ["", ";", "color", ": red", "color:", "color: !important", "a b: c"] {
            assert!(Declaration::parse(text).is_err(), "{text:?} should fail");
        }
    }

    #[test]
    fn parse_splits_on_first_colon() {
        let d = Declaration::parse("background: url(http://x/y.png)").unwrap();
        assert_eq!(d.name, "background");
        assert_eq!(d.value, "url(http://x/y.png)");
    }

    #[test]
    fn custom_property_keeps_case() {
        assert_eq!(Declaration::parse("--Main-Color: red").unwrap().name, "--Main-Color");
    }

    #[test]
    fn render_forms() {
        let d = Declaration::parse("text-align:right!important;").unwrap();
        assert_eq!(d.render(RenderFlags::INLINE), "text-align:right!important;");
        assert_eq!(d.render(RenderFlags::STYLES), "\ttext-align:right!important;");
        assert_eq!(
            Declaration::new("color", "red").render(RenderFlags::INLINE),
            "color:red;"
        );
    }

    #[test]
    fn inline_round_trip() {
        for text in ["color: red", "font-family: 'A; B', serif !important", "margin:0 auto;"] {
            let d = Declaration::parse(text).unwrap();
            let once = d.render(RenderFlags::INLINE);
            let again = Declaration::parse(&once).unwrap().render(RenderFlags::INLINE);
            assert_eq!(once, again);
        }
    }

    #[test]
    fn style_body_with_quoted_semicolon() {
        let style = Style::parse("p", "content: 'a;b'; color: red;").unwrap();
        assert_eq!(style.len(), 2);
        assert_eq!(style.value("content"), Some("'a;b'"));
    }

    #[test]
    fn repeated_declaration_last_wins() {
        let style = Style::parse("p", "color: red; color: blue").unwrap();
        assert_eq!(style.len(), 1);
        assert_eq!(style.value("color"), Some("blue"));
    }

    #[test]
    fn repeated_declaration_respects_important() {
        let style = Style::parse("p", "color: red !important; color: blue").unwrap();
        assert_eq!(style.value("color"), Some("red"));
    }

    #[test]
    fn declarations_carry_selector_specificity() {
        let style = Style::parse("#a .b", "color: red").unwrap();
        assert_eq!(style.declarations()[0].origin, Specificity::new(1, 1, 0));
    }

    #[test]
    fn flags_propagate() {
        let mut style = Style::from_declarations("color: red; margin: 0").unwrap();
        style.set_inline(true);
        assert!(style.declarations().iter().all(|d| d.inline));
        style.add_declaration(Declaration::new("padding", "1px"));
        assert!(style.get_declaration("padding").unwrap().inline);
    }

    #[test]
    fn set_and_remove() {
        let mut style = Style::universal();
        style.set_declaration("color", "red");
        style.set_declaration("color", "blue");
        assert_eq!(style.value("color"), Some("blue"));
        assert!(style.remove_declaration("color").is_some());
        assert!(style.is_empty());
    }

    #[test]
    fn render_block_and_inline() {
        let style = Style::parse("div > p", "color: red; margin: 0 !important").unwrap();
        assert_eq!(
            style.render(RenderFlags::STYLES),
            "div>p {\n\tcolor:red;\n\tmargin:0!important;\n}\n"
        );
        assert_eq!(
            style.render(RenderFlags::INLINE),
            "color:red;margin:0!important;"
        );
    }

    #[test]
    fn inline_render_drops_inherited() {
        let mut style = Style::from_declarations("color: red").unwrap();
        style.set_inherited(true);
        assert_eq!(style.render(RenderFlags::INLINE), "");
        assert_eq!(
            style.render(RenderFlags::INLINE | RenderFlags::INHERITED),
            "color:red;"
        );
    }
}
