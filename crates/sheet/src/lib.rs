//! # sheet - CSS parsing, selector matching and cascade
//!
//! Parses stylesheet text into a [`StyleSheet`], matches selectors against
//! any document that implements [`Element`], and merges the matching
//! declarations into resolved styles.
//!
//! ## Quick Start
//!
//! ```rust
//! use sheet::{RenderFlags, Style, StyleSheet};
//!
//! let sheet = StyleSheet::parse(
//!     r#"
//!     #title { color: red }
//!     .title { color: blue; margin: 0 }
//!     @media print { .title { color: black } }
//!     "#,
//! )
//! .expect("valid CSS");
//!
//! let resolved = sheet.flatten();
//! assert_eq!(resolved.value("color"), Some("red"));
//! assert_eq!(
//!     resolved.render(RenderFlags::INLINE),
//!     "color:red;margin:0;"
//! );
//! ```
//!
//! ## Supported Features
//!
//! ### Selectors
//! - Tag, class, id and universal compounds: `div`, `.note`, `#main`, `*`
//! - Combinators: `div.note` (also), `div p`, `div > p`, `h1 + p`, `h1 ~ p`
//! - Attribute filters: `[href]`, `[lang|=en]`, `[href^="https"]`, ...
//! - Structural pseudo-classes: `:first-child`, `:nth-child(2n+1)`,
//!   `:not(.x)`, `:empty`, `:root`, ...
//!
//! ### Cascade
//! - Ranking by [`Priority`]: direct over inherited, inline over rules,
//!   then selector [`Specificity`]
//! - `!important` declarations are only replaced by other important ones
//! - Inheritable properties flow to children via [`Style::inherited_copy`]
//!
//! ### At-rules
//! - `@media` queries evaluated against an [`Environment`]
//! - `@supports`, `@document`, descriptor blocks (`@font-face`, ...) and
//!   directives (`@import`, `@charset`, `@namespace`)
//!
//! ## Modules
//!
//! - [`parser`]: tokenizer and grammars
//! - [`cascade`]: priorities, merging and selector matching
//! - [`error`]: error types for parsing and rendering failures

pub mod at_rule;
pub mod cascade;
pub mod element;
pub mod environment;
pub mod error;
pub mod parser;
pub mod render;
pub mod selector;
pub mod style;
pub mod stylesheet;

pub use at_rule::{AtQuery, AtRule};
pub use cascade::{Priority, is_inherited_property};
pub use element::Element;
pub use environment::Environment;
pub use error::{RenderError, StyleSyntaxError};
pub use render::RenderFlags;
pub use selector::{
    AttributeFilter, Combinator, Compound, CompoundKind, MatchMode, Nth, Pseudo, PseudoArgument,
    Selector, SelectorPart, Specificity,
};
pub use style::{Declaration, Style};
pub use stylesheet::{RuleItem, StyleSheet};
