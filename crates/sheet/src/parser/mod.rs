//! Stylesheet parsing.
//!
//! - [`parse_stylesheet`]: main entry point
//! - [`parse_selector_list`]: comma-separated selector groups
//!
//! ## Submodules
//!
//! - [`tokenizer`]: rule-level scanner producing `(head, body)` tokens
//! - [`selectors`]: nom grammar for compound selectors and combinators
//! - [`media`]: `@media` query lists
//! - [`values`]: identifiers, lengths and top-level splitting
//!
//! ## Example
//!
//! ```rust
//! use sheet::parser::parse_stylesheet;
//!
//! let sheet = parse_stylesheet("h1, h2 { margin: 0 } @media print { h1 { color: black } }").unwrap();
//! assert_eq!(sheet.styles().count(), 2);
//! assert_eq!(sheet.at_rules().count(), 1);
//! ```

pub mod media;
pub mod selectors;
pub mod tokenizer;
pub mod values;

use crate::at_rule::AtRule;
use crate::error::StyleSyntaxError;
use crate::selector::Selector;
use crate::style::Style;
use crate::stylesheet::{RuleItem, StyleSheet};

use self::tokenizer::{RuleToken, scan};
use self::values::split_top_level;

/// Parses stylesheet text. A rule with several selectors becomes one style
/// per selector.
pub fn parse_stylesheet(source: &str) -> Result<StyleSheet, StyleSyntaxError> {
    let items = parse_items(source)?;
    log::debug!("parsed stylesheet: {} rules", items.len());
    Ok(items.into_iter().collect())
}

/// Parses stylesheet text into items without de-duplicating selectors.
pub fn parse_items(source: &str) -> Result<Vec<RuleItem>, StyleSyntaxError> {
    let mut items = Vec::new();
    for token in scan(source) {
        let RuleToken {
            head,
            body,
            is_block,
        } = token?;

        if head.starts_with('@') {
            let body = is_block.then_some(body.as_str());
            items.push(RuleItem::AtRule(AtRule::parse(&head, body)?));
            continue;
        }
        if !is_block {
            return Err(StyleSyntaxError::new(format!("expected '{{' after '{head}'")));
        }
        for selector in parse_selector_list(&head)? {
            items.push(RuleItem::Style(Style::with_body(selector, &body)?));
        }
    }
    Ok(items)
}

/// Parses `a, b > c, d` into its selectors.
pub fn parse_selector_list(text: &str) -> Result<Vec<Selector>, StyleSyntaxError> {
    split_top_level(text, ',')
        .into_iter()
        .map(|piece| {
            if piece.is_empty() {
                Err(StyleSyntaxError::new(format!("empty selector in '{}'", text.trim())))
            } else {
                Selector::parse(piece)
            }
        })
        .collect()
}
