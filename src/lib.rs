//! # cascada-rs
//!
//! Parse markup and stylesheets, resolve the cascade for every element and
//! write the result back as inline `style` attributes.
//!
//! ```rust
//! use cascada_rs::{Config, inline_css};
//!
//! let html = r#"<style>p { color: red } .note { margin: 0 }</style><p class="note">Hi</p>"#;
//! let out = inline_css(html, &[], &Config::default()).unwrap();
//! assert_eq!(out, r#"<p class="note" style="color:red;margin:0;">Hi</p>"#);
//! ```
//!
//! The building blocks live in the member crates, re-exported here:
//!
//! - [`markup`]: tokenizer and scope-checking parser
//! - [`sheet`]: stylesheet parser, selector matching, cascade and at-rules
//! - [`cascada`]: document tree, queries and the style applier

pub use cascada::{
    self, Config, Document, Error, NodeId, NodeRef, Query, Result, StyleApplier, init_logger,
};
pub use markup::{self, MarkupError, ParseOptions};
pub use sheet::{self, Environment, RenderFlags, Selector, Style, StyleSheet, StyleSyntaxError};

/// Parses markup with default options.
pub fn parse_markup(text: &str) -> std::result::Result<Document, MarkupError> {
    Document::parse(text)
}

/// Parses stylesheet text.
pub fn parse_stylesheet(text: &str) -> std::result::Result<StyleSheet, StyleSyntaxError> {
    StyleSheet::parse(text)
}

/// Runs the whole pipeline over `html`: collects `<style>` elements, adds
/// `extra_css` after them, resolves every element, writes resolved styles
/// into the configured inline attribute and drops the `<style>` elements.
pub fn inline_css(html: &str, extra_css: &[&str], config: &Config) -> Result<String> {
    let mut document = Document::parse_with(html, &config.parse)?;

    let mut applier = StyleApplier::new(config.clone());
    for sheet in document.collect_stylesheets()? {
        applier.add_stylesheet(sheet);
    }
    for css in extra_css {
        applier.add_stylesheet(StyleSheet::parse(css)?);
    }
    applier.apply(&mut document);

    document.inline_styles(&config.inline_attribute, RenderFlags::empty());
    document.map(|doc, id| {
        if doc.name(id).is_some_and(|n| n.eq_ignore_ascii_case("style")) {
            if let Some(parent) = doc.get_parent(id) {
                doc.remove_child(parent, id);
            }
        }
    });
    Ok(document.render())
}
