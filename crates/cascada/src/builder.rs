//! Builds a [`Document`] from markup parser events.

use markup::{Attribute, TreeSink};

use crate::tree::{Document, ElementData, NodeId, NodeKind};

/// Appends parsed nodes under the document root, tracking open elements
/// on an explicit stack.
pub(crate) struct TreeBuilder<'a> {
    document: &'a mut Document,
    open: Vec<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            open: Vec::new(),
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.document.root())
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current();
        let id = self.document.alloc(kind);
        self.document.nodes[id.index()].parent = Some(parent);
        self.document.nodes[parent.index()].children.push(id);
        id
    }
}

impl TreeSink for TreeBuilder<'_> {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>], self_closed: bool) {
        let mut data = ElementData::new(name);
        data.self_closed = self_closed;
        for attribute in attributes {
            // The first occurrence of a repeated attribute wins.
            data.attributes
                .entry(attribute.name.to_ascii_lowercase())
                .or_insert_with(|| attribute.value.to_string());
        }
        let id = self.append(NodeKind::Element(data));
        self.open.push(id);
    }

    fn end_element(&mut self) {
        self.open.pop();
    }

    fn text(&mut self, text: &str) {
        self.append(NodeKind::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_structure() {
        let mut doc = Document::new();
        {
            let mut builder = TreeBuilder::new(&mut doc);
            builder.start_element("div", &[Attribute::new("id", "a")], false);
            builder.text("hi");
            builder.start_element("br", &[], false);
            builder.end_element();
            builder.end_element();
            builder.text("tail");
        }
        let root = doc.root();
        assert_eq!(doc.children(root).len(), 2);
        let div = doc.children(root)[0];
        assert_eq!(doc.get_attribute(div, "id"), Some("a"));
        assert_eq!(doc.children(div).len(), 2);
        assert_eq!(doc.get_parent(div), Some(root));
        assert_eq!(doc.text(doc.children(root)[1]), Some("tail"));
    }

    #[test]
    fn repeated_attribute_keeps_first() {
        let mut doc = Document::new();
        TreeBuilder::new(&mut doc).start_element(
            "a",
            &[Attribute::new("href", "1"), Attribute::new("href", "2")],
            false,
        );
        let a = doc.children(doc.root())[0];
        assert_eq!(doc.get_attribute(a, "href"), Some("1"));
    }

    #[test]
    fn attribute_names_are_lowercased() {
        let mut doc = Document::new();
        TreeBuilder::new(&mut doc).start_element(
            "p",
            &[Attribute::new("ID", "a"), Attribute::new("id", "b")],
            false,
        );
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.get_attribute(p, "id"), Some("a"));
        assert_eq!(doc.get_attribute(p, "Id"), Some("a"));
    }
}
