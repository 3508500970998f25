//! Static tag tables.

use phf::{Set, phf_set};

/// Elements that never have content and never take an end tag.
pub static VOID_ELEMENTS: Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Elements whose content is scanned as raw text up to the matching end tag.
pub static RAW_TEXT_ELEMENTS: Set<&'static str> = phf_set! {
    "script", "style",
};

/// MathML and SVG leaf elements that may be written in self-closing form
/// unless a caller supplies its own list.
pub const DEFAULT_SELF_CLOSING: &[&str] = &[
    "mglyph", "malignmark", "mspace", "mprescripts", "none", "maligngroup",
    "path", "circle", "rect", "line", "polyline", "polygon", "ellipse", "use",
    "stop", "image", "animate", "set",
];

/// Whether `name` is a void element (ASCII case-insensitive).
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(name.to_ascii_lowercase().as_str())
}

/// Whether the content of `name` is raw text.
pub fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(name.to_ascii_lowercase().as_str())
}

/// Characters allowed in a tag name.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}
