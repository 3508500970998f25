//! Resolves the style of every element in a document.
//!
//! A single pre-order pass over the tree. At each element:
//!
//! 1. the inherited snapshot of the parent is cascaded in
//! 2. every matching style of every stylesheet (through visible at-rules)
//!    is cascaded in, in registration order
//! 3. the inline `style` attribute is parsed and cascaded in last
//! 4. the inheritable subset of the result becomes the snapshot handed to
//!    the element children
//!
//! Text nodes take no part: they are never matched and carry no style.

use std::rc::Rc;

use sheet::parser::values::split_top_level;
use sheet::{AtRule, Declaration, RenderFlags, RuleItem, Style, StyleSheet, StyleSyntaxError};

use crate::config::Config;
use crate::tree::{Document, NodeId};

/// Applies a set of stylesheets to documents.
///
/// # Example
///
/// ```
/// use cascada::{Config, Document, StyleApplier};
/// use sheet::StyleSheet;
///
/// let mut doc = Document::parse(r#"<div id="a" class="a"><p>x</p></div>"#).unwrap();
/// let mut applier = StyleApplier::new(Config::default());
/// applier.add_stylesheet(StyleSheet::parse("#a { color: red } .a { color: blue }").unwrap());
/// applier.apply(&mut doc);
///
/// let div = doc.select("div").unwrap()[0];
/// let p = doc.select("p").unwrap()[0];
/// assert_eq!(doc.style(div).value("color"), Some("red"));
/// assert_eq!(doc.style(p).value("color"), Some("red"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct StyleApplier {
    sheets: Vec<StyleSheet>,
    config: Config,
}

impl StyleApplier {
    pub fn new(config: Config) -> Self {
        Self {
            sheets: Vec::new(),
            config,
        }
    }

    /// Adds a stylesheet, evaluating its at-rules against the configured
    /// environment.
    pub fn add_stylesheet(&mut self, mut sheet: StyleSheet) {
        sheet.evaluate(&self.config.environment);
        self.sheets.push(sheet);
    }

    pub fn with_stylesheet(mut self, sheet: StyleSheet) -> Self {
        self.add_stylesheet(sheet);
        self
    }

    pub fn stylesheets(&self) -> &[StyleSheet] {
        &self.sheets
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves every attached element of `document`. Declarations are
    /// cascaded into whatever each element already holds; call
    /// [`Document::reset_styles`] first for a clean pass.
    pub fn apply(&self, document: &mut Document) {
        let empty = Rc::new(Style::universal());
        let mut stack: Vec<(NodeId, Rc<Style>)> = document
            .get_children_by_tag(document.root(), None)
            .into_iter()
            .rev()
            .map(|id| (id, Rc::clone(&empty)))
            .collect();

        while let Some((id, inherited)) = stack.pop() {
            let (resolved, inline) = self.resolve(document, id, &inherited);
            let snapshot = Rc::new(resolved.inherited_copy());
            document.set_styles(id, resolved, inline);

            for child in document.get_children_by_tag(id, None).into_iter().rev() {
                stack.push((child, Rc::clone(&snapshot)));
            }
        }
    }

    fn resolve(
        &self,
        document: &Document,
        id: NodeId,
        inherited: &Style,
    ) -> (Style, Option<Style>) {
        let node = document.get(id);
        let mut resolved = document.style(id).clone();
        resolved.cascade(inherited);

        let mut matched = 0;
        for sheet in &self.sheets {
            for style in sheet.matching(&node) {
                resolved.cascade(style);
                matched += 1;
            }
        }

        let inline = self.inline_style(document, id);
        if let Some(inline) = &inline {
            resolved.cascade(inline);
        }

        log::trace!(
            "CASCADE: node='{}' matched={} inline={} -> {}",
            node.name().unwrap_or_default(),
            matched,
            inline.as_ref().map_or(0, Style::len),
            resolved.render(RenderFlags::INLINE | RenderFlags::INHERITED)
        );
        (resolved, inline)
    }

    /// Parses the inline attribute, skipping malformed declarations.
    fn inline_style(&self, document: &Document, id: NodeId) -> Option<Style> {
        let body = document.get_attribute(id, &self.config.inline_attribute)?;
        let mut style = Style::universal();
        style.set_inline(true);
        for piece in split_top_level(body, ';') {
            if piece.is_empty() {
                continue;
            }
            match Declaration::parse(piece) {
                Ok(declaration) => style.add_declaration(declaration),
                Err(err) => log::warn!(
                    "skipping inline declaration '{}' on <{}>: {}",
                    piece,
                    document.name(id).unwrap_or_default(),
                    err
                ),
            }
        }
        Some(style)
    }
}

impl Document {
    /// Parses the text of every `<style>` element into a stylesheet, in
    /// document order. A `media` attribute wraps the rules in an equivalent
    /// `@media` block.
    pub fn collect_stylesheets(&self) -> Result<Vec<StyleSheet>, StyleSyntaxError> {
        let mut sheets = Vec::new();
        for id in self.elements() {
            if !self.name(id).is_some_and(|n| n.eq_ignore_ascii_case("style")) {
                continue;
            }
            let sheet = StyleSheet::parse(&self.inner_text(id))?;
            let sheet = match self.get_attribute(id, "media").map(str::trim) {
                Some(media) if !media.is_empty() => {
                    let rule = AtRule::group(&format!("@media {media}"), sheet)?;
                    std::iter::once(RuleItem::AtRule(rule)).collect()
                }
                _ => sheet,
            };
            sheets.push(sheet);
        }
        Ok(sheets)
    }

    /// Writes each element's resolved style into `attribute` as inline
    /// declarations. Elements without declarations to write are left
    /// untouched.
    pub fn inline_styles(&mut self, attribute: &str, flags: RenderFlags) {
        let flags = (flags | RenderFlags::INLINE) - RenderFlags::AT_RULES;
        for id in self.elements() {
            let rendered = self.style(id).render(flags);
            if !rendered.is_empty() {
                self.set_attribute(id, attribute, rendered);
            }
        }
    }
}
