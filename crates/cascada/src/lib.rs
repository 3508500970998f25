mod builder;
pub mod config;
pub mod error;
mod log_init;
pub mod node;
mod serialize;
pub mod style_resolver;
pub mod tree;

pub use config::Config;
pub use error::{Error, Result};
pub use log_init::init_logger;
pub use node::NodeRef;
pub use style_resolver::StyleApplier;
pub use tree::{Document, ElementData, Node, NodeId, NodeKind, Query};

// Re-export the log crate so users can use cascada::log::info!, etc.
pub use log;
pub use markup::{MarkupError, ParseOptions};
pub use sheet::{Element, RenderFlags, StyleSheet};
