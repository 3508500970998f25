//! Borrowed node handles for selector matching.

use sheet::Element;

use crate::tree::{Document, NodeId, NodeKind};

/// A node together with the document it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(document: &'a Document, id: NodeId) -> Self {
        Self { document, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn name(&self) -> Option<&'a str> {
        self.document.name(self.id)
    }

    fn elements(&self, ids: Vec<NodeId>) -> Vec<Self> {
        ids.into_iter()
            .map(|id| NodeRef::new(self.document, id))
            .collect()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document) && self.id == other.id
    }
}

impl Element for NodeRef<'_> {
    fn local_name(&self) -> &str {
        self.name().unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.document.get_attribute(self.id, name)
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.document.get_parent(self.id)?;
        match self.document.node(parent).kind() {
            NodeKind::Element(_) => Some(NodeRef::new(self.document, parent)),
            _ => None,
        }
    }

    fn preceding_element_siblings(&self) -> Vec<Self> {
        self.elements(self.document.get_preceding_siblings(self.id))
    }

    fn following_element_siblings(&self) -> Vec<Self> {
        self.elements(self.document.get_following_siblings(self.id))
    }

    fn is_empty(&self) -> bool {
        self.document.is_empty(self.id, false)
    }
}
