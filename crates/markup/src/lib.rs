//! # markup - HTML tokenizer and scope-checking parser
//!
//! Turns markup text into a balanced stream of element and text events.
//! The crate does not build a tree itself; a [`TreeSink`] receives the
//! events and owns whatever structure it builds from them.
//!
//! ## Quick Start
//!
//! ```rust
//! use markup::{Event, ParseOptions, parse_events};
//!
//! let events = parse_events("<div><img>text</div>", &ParseOptions::default()).unwrap();
//! assert_eq!(events.len(), 5);
//! ```
//!
//! ## Rules
//!
//! - Void elements (`br`, `img`, `input`, ...) never open a scope and
//!   reject end tags.
//! - `<x/>` is accepted for void elements and for the names listed in
//!   [`ParseOptions::self_closing`].
//! - An end tag must close the innermost open element. With
//!   [`ParseOptions::auto_close`] an end tag may close an outer element,
//!   implicitly closing everything opened inside it, and elements still
//!   open at end of input are closed.
//! - `script` and `style` contents are raw text.
//! - Comments and `<!...>` declarations are passed through as text.

pub mod error;
pub mod options;
pub mod parser;
pub mod sink;
pub mod tags;

pub use error::MarkupError;
pub use options::ParseOptions;
pub use parser::{Attribute, parse, parse_events};
pub use sink::{Event, TreeSink};
pub use tags::{is_raw_text, is_void};
