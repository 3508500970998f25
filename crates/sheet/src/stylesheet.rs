//! Stylesheets: ordered collections of styles and at-rules.

use crate::at_rule::AtRule;
use crate::element::Element;
use crate::environment::Environment;
use crate::error::{RenderError, StyleSyntaxError};
use crate::render::RenderFlags;
use crate::style::Style;

/// A top-level entry of a [`StyleSheet`].
#[derive(Clone, Debug, PartialEq)]
pub enum RuleItem {
    Style(Style),
    AtRule(AtRule),
}

/// Styles and at-rules in registration order.
///
/// Styles are unique by selector: pushing a style whose selector is already
/// present merges it into the existing entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
    items: Vec<RuleItem>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Example
    ///
    /// ```
    /// use sheet::StyleSheet;
    ///
    /// let sheet = StyleSheet::parse("p { color: red } p { margin: 0 } @media print { p {} }")
    ///     .unwrap();
    /// assert_eq!(sheet.styles().count(), 1);
    /// assert_eq!(sheet.at_rules().count(), 1);
    /// ```
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        crate::parser::parse_stylesheet(text)
    }

    pub fn items(&self) -> &[RuleItem] {
        &self.items
    }

    /// Top-level styles.
    pub fn styles(&self) -> impl Iterator<Item = &Style> {
        self.items.iter().filter_map(|item| match item {
            RuleItem::Style(style) => Some(style),
            RuleItem::AtRule(_) => None,
        })
    }

    /// Top-level at-rules.
    pub fn at_rules(&self) -> impl Iterator<Item = &AtRule> {
        self.items.iter().filter_map(|item| match item {
            RuleItem::AtRule(rule) => Some(rule),
            RuleItem::Style(_) => None,
        })
    }

    pub fn push(&mut self, item: RuleItem) {
        match item {
            RuleItem::Style(style) => self.add_style(style),
            RuleItem::AtRule(rule) => self.add_at_rule(rule),
        }
    }

    pub fn add_style(&mut self, style: Style) {
        let existing = self.items.iter_mut().find_map(|item| match item {
            RuleItem::Style(s) if s.selector == style.selector => Some(s),
            _ => None,
        });
        match existing {
            Some(existing) => existing.merge(&style),
            None => self.items.push(RuleItem::Style(style)),
        }
    }

    pub fn add_at_rule(&mut self, rule: AtRule) {
        self.items.push(RuleItem::AtRule(rule));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-evaluates every at-rule, nested ones included.
    pub fn evaluate(&mut self, env: &Environment) {
        for item in &mut self.items {
            if let RuleItem::AtRule(rule) = item {
                rule.evaluate(env);
            }
        }
    }

    /// Styles whose selector matches `element`, in registration order.
    /// Styles inside hidden at-rules are skipped.
    pub fn matching<E: Element>(&self, element: &E) -> Vec<&Style> {
        let mut found = Vec::new();
        self.collect_matching(element, &mut found);
        found
    }

    fn collect_matching<'a, E: Element>(&'a self, element: &E, found: &mut Vec<&'a Style>) {
        for item in &self.items {
            match item {
                RuleItem::Style(style) if style.selector.matches(element) => found.push(style),
                RuleItem::Style(_) => {}
                RuleItem::AtRule(rule) if rule.is_visible() => {
                    rule.rules().collect_matching(element, found)
                }
                RuleItem::AtRule(_) => {}
            }
        }
    }

    /// Every visible style cascaded into one.
    pub fn flatten(&self) -> Style {
        let mut flat = Style::universal();
        self.cascade_into(&mut flat);
        flat
    }

    fn cascade_into(&self, flat: &mut Style) {
        for item in &self.items {
            match item {
                RuleItem::Style(style) => flat.cascade(style),
                RuleItem::AtRule(rule) if rule.is_visible() => rule.rules().cascade_into(flat),
                RuleItem::AtRule(_) => {}
            }
        }
    }

    /// Renders the stylesheet.
    ///
    /// With [`RenderFlags::INLINE`] the [`flatten`](Self::flatten)ed
    /// declarations are rendered inline. Otherwise items are rendered in
    /// order, at-rules when [`RenderFlags::AT_RULES`] is set and styles when
    /// [`RenderFlags::STYLES`] is set.
    pub fn render(&self, flags: RenderFlags) -> Result<String, RenderError> {
        let flags = flags.validate()?;
        if flags.contains(RenderFlags::INLINE) {
            return Ok(self.flatten().render(flags));
        }

        let mut out = String::new();
        for item in &self.items {
            match item {
                RuleItem::AtRule(rule) if flags.contains(RenderFlags::AT_RULES) => {
                    out.push_str(&rule.render(flags)?)
                }
                RuleItem::Style(style) if flags.contains(RenderFlags::STYLES) => {
                    out.push_str(&style.render(flags))
                }
                _ => {}
            }
        }
        Ok(out)
    }
}

impl FromIterator<RuleItem> for StyleSheet {
    fn from_iter<I: IntoIterator<Item = RuleItem>>(iter: I) -> Self {
        let mut sheet = StyleSheet::new();
        for item in iter {
            sheet.push(item);
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_selectors_merge() {
        let sheet = StyleSheet::parse("p { color: red } div {} p { color: blue; margin: 0 }").unwrap();
        assert_eq!(sheet.len(), 2);
        let p = sheet.styles().next().unwrap();
        assert_eq!(p.value("color"), Some("blue"));
        assert_eq!(p.value("margin"), Some("0"));
    }

    #[test]
    fn at_rules_always_append() {
        let sheet = StyleSheet::parse("@media print { p {} } @media print { p {} }").unwrap();
        assert_eq!(sheet.at_rules().count(), 2);
    }

    #[test]
    fn merge_sheets() {
        let mut a = StyleSheet::parse("p { color: red }").unwrap();
        let b = StyleSheet::parse("p { color: blue } a { x: y } @import url(z.css);").unwrap();
        a.merge(&b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.styles().next().unwrap().value("color"), Some("blue"));
    }

    #[test]
    fn flatten_skips_hidden_at_rules() {
        let mut sheet =
            StyleSheet::parse("p { color: red } @media print { p { color: black; margin: 0 } }")
                .unwrap();
        assert_eq!(sheet.flatten().value("color"), Some("red"));
        assert!(!sheet.flatten().has_declaration("margin"));

        sheet.evaluate(&Environment::default().with_device("print"));
        assert_eq!(sheet.flatten().value("color"), Some("black"));
    }

    #[test]
    fn flatten_respects_specificity() {
        let sheet = StyleSheet::parse("#a { color: red } .a { color: blue }").unwrap();
        assert_eq!(sheet.flatten().value("color"), Some("red"));
    }

    #[test]
    fn render_selects_items() {
        let sheet = StyleSheet::parse("@media print { a { b: c } } p { color: red }").unwrap();
        assert_eq!(
            sheet.render(RenderFlags::STYLES).unwrap(),
            "p {\n\tcolor:red;\n}\n"
        );
        assert_eq!(
            sheet.render(RenderFlags::all_blocks()).unwrap(),
            "@media print {\n\ta {\n\t\tb:c;\n\t}\n}\np {\n\tcolor:red;\n}\n"
        );
        assert_eq!(sheet.render(RenderFlags::INLINE).unwrap(), "color:red;");
    }

    #[test]
    fn render_rejects_inline_at_rules() {
        let sheet = StyleSheet::new();
        assert_eq!(
            sheet.render(RenderFlags::INLINE | RenderFlags::AT_RULES),
            Err(RenderError::IncompatibleFlags)
        );
    }
}
