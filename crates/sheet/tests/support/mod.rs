//! A minimal element tree for matching tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sheet::Element;

struct NodeData {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    parent: RefCell<Weak<NodeData>>,
    children: RefCell<Vec<Node>>,
}

/// Shared handle to a mock element.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.0.name)
    }
}

/// Builds an element and adopts `children`.
pub fn el(name: &str, attributes: &[(&str, &str)], children: Vec<Node>) -> Node {
    build(name, attributes, "", children)
}

/// An element whose only content is text.
pub fn text_el(name: &str, attributes: &[(&str, &str)], text: &str) -> Node {
    build(name, attributes, text, Vec::new())
}

fn build(name: &str, attributes: &[(&str, &str)], text: &str, children: Vec<Node>) -> Node {
    let node = Node(Rc::new(NodeData {
        name: name.to_string(),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        text: text.to_string(),
        parent: RefCell::new(Weak::new()),
        children: RefCell::new(Vec::new()),
    }));
    for child in children {
        *child.0.parent.borrow_mut() = Rc::downgrade(&node.0);
        node.0.children.borrow_mut().push(child);
    }
    node
}

impl Node {
    pub fn children(&self) -> Vec<Node> {
        self.0.children.borrow().clone()
    }

    /// Depth-first search by `id` attribute.
    pub fn find(&self, id: &str) -> Option<Node> {
        if self.attribute("id") == Some(id) {
            return Some(self.clone());
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    fn siblings(&self) -> (Vec<Node>, Vec<Node>) {
        let Some(parent) = self.parent_element() else {
            return (Vec::new(), Vec::new());
        };
        let children = parent.children();
        let index = children.iter().position(|c| c == self).unwrap_or(0);
        (children[..index].to_vec(), children[index + 1..].to_vec())
    }
}

impl Element for Node {
    fn local_name(&self) -> &str {
        &self.0.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn parent_element(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    fn preceding_element_siblings(&self) -> Vec<Self> {
        self.siblings().0
    }

    fn following_element_siblings(&self) -> Vec<Self> {
        self.siblings().1
    }

    fn is_empty(&self) -> bool {
        self.0.children.borrow().is_empty() && self.0.text.trim().is_empty()
    }
}
