//! Conditional and descriptor at-rules.
//!
//! Grouping rules (`@media`, `@supports`, `@document`) own a nested
//! [`StyleSheet`] whose styles only take part in matching while the rule is
//! visible. Descriptor rules such as `@font-face` keep their block as raw
//! text, and directives (`@import`, `@charset`, `@namespace`) have no block.

use std::fmt;

use phf::{Set, phf_set};

use crate::element::Element;
use crate::environment::Environment;
use crate::error::{RenderError, StyleSyntaxError};
use crate::parser::media::MediaQueryList;
use crate::parser::parse_stylesheet;
use crate::parser::values::is_ident_char;
use crate::render::{RenderFlags, indent};
use crate::style::Style;
use crate::stylesheet::StyleSheet;

pub static AT_RULE_KEYWORDS: Set<&'static str> = phf_set! {
    "charset", "import", "namespace", "media", "supports", "document", "page", "font-face",
    "keyframes", "viewport", "counter-style", "font-feature-values", "swash", "ornaments",
    "annotation", "stylistic", "styleset", "character-variant",
};

/// The `@keyword arguments` head of an at-rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtQuery {
    pub keyword: String,
    pub arguments: String,
    media: Option<MediaQueryList>,
}

impl AtQuery {
    /// Parses an at-rule head such as `@media screen and (max-width: 600px)`.
    pub fn parse(head: &str) -> Result<Self, StyleSyntaxError> {
        let head = head.trim();
        let body = head
            .strip_prefix('@')
            .ok_or_else(|| StyleSyntaxError::new(format!("at-rule must start with '@': '{head}'")))?;
        let split = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
        let (keyword, arguments) = body.split_at(split);
        let keyword = keyword.to_ascii_lowercase();
        if !AT_RULE_KEYWORDS.contains(keyword.as_str()) {
            return Err(StyleSyntaxError::new(format!("unknown at-rule '@{keyword}'")));
        }

        let arguments = arguments.trim().to_string();
        let media = if keyword == "media" {
            Some(MediaQueryList::parse(&arguments)?)
        } else {
            None
        };
        Ok(Self {
            keyword,
            arguments,
            media,
        })
    }

    /// Whether the block holds nested rules rather than descriptors.
    pub fn is_grouping(&self) -> bool {
        matches!(self.keyword.as_str(), "media" | "supports" | "document")
    }

    /// Whether the rule is a statement that never takes a block.
    pub fn is_directive(&self) -> bool {
        matches!(self.keyword.as_str(), "charset" | "import" | "namespace")
    }

    pub fn evaluate(&self, env: &Environment) -> bool {
        match self.keyword.as_str() {
            "media" => self.media.as_ref().is_some_and(|m| m.matches(env)),
            "supports" => true,
            _ => false,
        }
    }
}

impl fmt::Display for AtQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.keyword)?;
        if !self.arguments.is_empty() {
            write!(f, " {}", self.arguments)?;
        }
        Ok(())
    }
}

/// An at-rule together with its contents.
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    pub query: AtQuery,
    pub is_block: bool,
    rules: StyleSheet,
    raw_body: Option<String>,
    visible: bool,
}

impl AtRule {
    /// Builds an at-rule from its head and optional block body. Visibility
    /// starts out evaluated against [`Environment::default`].
    ///
    /// # Example
    ///
    /// ```
    /// use sheet::{AtRule, Environment};
    ///
    /// let mut rule = AtRule::parse("@media print", Some("p { color: black }")).unwrap();
    /// assert!(!rule.is_visible());
    /// assert!(rule.evaluate(&Environment::default().with_device("print")));
    /// assert_eq!(rule.styles().count(), 1);
    /// ```
    pub fn parse(head: &str, body: Option<&str>) -> Result<Self, StyleSyntaxError> {
        let query = AtQuery::parse(head)?;
        let (rules, raw_body) = match body {
            None if query.is_grouping() => {
                return Err(StyleSyntaxError::new(format!("'{query}' requires a block")));
            }
            Some(_) if query.is_directive() => {
                return Err(StyleSyntaxError::new(format!("'{query}' does not take a block")));
            }
            None => (StyleSheet::new(), None),
            Some(body) if query.is_grouping() => (parse_stylesheet(body)?, None),
            Some(body) => (StyleSheet::new(), Some(body.trim().to_string())),
        };

        let mut rule = Self {
            is_block: body.is_some(),
            query,
            rules,
            raw_body,
            visible: false,
        };
        rule.evaluate(&Environment::default());
        Ok(rule)
    }

    /// Wraps already parsed rules in a grouping at-rule.
    pub fn group(head: &str, rules: StyleSheet) -> Result<Self, StyleSyntaxError> {
        let query = AtQuery::parse(head)?;
        if !query.is_grouping() {
            return Err(StyleSyntaxError::new(format!("'{query}' can not group rules")));
        }
        let mut rule = Self {
            query,
            is_block: true,
            rules,
            raw_body: None,
            visible: false,
        };
        rule.evaluate(&Environment::default());
        Ok(rule)
    }

    /// Re-evaluates this rule and every nested rule. Returns the new
    /// visibility of this rule.
    pub fn evaluate(&mut self, env: &Environment) -> bool {
        self.visible = self.query.evaluate(env);
        self.rules.evaluate(env);
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn rules(&self) -> &StyleSheet {
        &self.rules
    }

    /// Styles directly inside this rule, visible or not.
    pub fn styles(&self) -> impl Iterator<Item = &Style> {
        self.rules.styles()
    }

    /// Styles inside this rule matching `element`, in registration order.
    /// Empty while the rule itself is hidden.
    pub fn matching<E: Element>(&self, element: &E) -> Vec<&Style> {
        if self.visible {
            self.rules.matching(element)
        } else {
            Vec::new()
        }
    }

    /// The visible styles inside this rule cascaded into one.
    pub fn flatten(&self) -> Style {
        if self.visible {
            self.rules.flatten()
        } else {
            Style::universal()
        }
    }

    /// The verbatim block of a descriptor rule like `@font-face`.
    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }

    /// Renders the rule in block form. Nested rules are always rendered in
    /// full.
    pub fn render(&self, flags: RenderFlags) -> Result<String, RenderError> {
        if flags.contains(RenderFlags::INLINE) {
            return Err(RenderError::InlineAtRule);
        }
        if !self.is_block {
            return Ok(format!("{};\n", self.query));
        }

        let inner = match &self.raw_body {
            Some(raw) if raw.is_empty() => String::new(),
            Some(raw) => format!("{raw}\n"),
            None => self.rules.render(flags | RenderFlags::all_blocks())?,
        };
        Ok(format!("{} {{\n{}}}\n", self.query, indent(&inner)))
    }
}
