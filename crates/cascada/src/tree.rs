//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by the [`Document`] and refer to each
//! other by [`NodeId`]. Index `0` is the synthetic `#document` root that
//! wraps every top-level node.
//!
//! Nodes removed from the tree stay in the arena, detached: they keep
//! their subtree and can be re-inserted, but traversals from the root no
//! longer reach them.

use std::collections::BTreeMap;

use markup::{MarkupError, ParseOptions, is_void};
use sheet::Style;

use crate::builder::TreeBuilder;
use crate::node::NodeRef;

/// Handle to a node of a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// Written as `<name/>` in the source.
    pub self_closed: bool,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            self_closed: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
    /// Declarations resolved by the style applier.
    pub(crate) style: Style,
    /// The parsed inline `style` attribute from the last application.
    pub(crate) inline_style: Option<Style>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
            style: Style::universal(),
            inline_style: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }
}

/// What [`Document::filter`] selects on.
pub enum Query<'q> {
    Selector(&'q sheet::Selector),
    Predicate(&'q dyn Fn(NodeRef<'_>) -> bool),
}

/// A parsed markup document.
#[derive(Clone, Debug)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    /// Parses markup with [`ParseOptions::default`].
    ///
    /// # Example
    ///
    /// ```
    /// use cascada::Document;
    ///
    /// let doc = Document::parse("<ul><li>one</li><li>two</li></ul>").unwrap();
    /// let ul = doc.get_children_by_tag(doc.root(), Some("ul"))[0];
    /// assert_eq!(doc.get_children_by_tag(ul, Some("li")).len(), 2);
    /// assert_eq!(doc.inner_text(ul), "onetwo");
    /// ```
    pub fn parse(text: &str) -> Result<Self, MarkupError> {
        Self::parse_with(text, &ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Self, MarkupError> {
        let mut document = Self::new();
        markup::parse(text, options, &mut TreeBuilder::new(&mut document))?;
        log::debug!("parsed document: {} nodes", document.nodes.len());
        Ok(document)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// A borrowed handle usable for selector matching.
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).element().map(|data| data.name.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).element().is_some()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Text(_))
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// The parent node; the root for top-level nodes.
    pub fn get_parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Ancestors, nearest first, without the document root.
    pub fn get_parents(&self, id: NodeId) -> Vec<NodeId> {
        let mut parents = Vec::new();
        let mut current = self.get_parent(id);
        while let Some(parent) = current {
            if parent == self.root() {
                break;
            }
            parents.push(parent);
            current = self.get_parent(parent);
        }
        parents
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Element children, optionally only those named `name`
    /// (ASCII case-insensitive).
    pub fn get_children_by_tag(&self, id: NodeId, name: Option<&str>) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| match (self.name(child), name) {
                (Some(_), None) => true,
                (Some(tag), Some(name)) => tag.eq_ignore_ascii_case(name),
                (None, _) => false,
            })
            .collect()
    }

    fn split_siblings(&self, id: NodeId) -> (&[NodeId], &[NodeId]) {
        let Some(parent) = self.get_parent(id) else {
            return (&[], &[]);
        };
        let siblings = self.children(parent);
        match siblings.iter().position(|&s| s == id) {
            Some(index) => (&siblings[..index], &siblings[index + 1..]),
            None => (&[], &[]),
        }
    }

    /// Element siblings before `id`, in document order.
    pub fn get_preceding_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let (before, _) = self.split_siblings(id);
        before.iter().copied().filter(|&s| self.is_element(s)).collect()
    }

    /// Element siblings after `id`, in document order.
    pub fn get_following_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let (_, after) = self.split_siblings(id);
        after.iter().copied().filter(|&s| self.is_element(s)).collect()
    }

    pub fn get_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let mut siblings = self.get_preceding_siblings(id);
        siblings.extend(self.get_following_siblings(id));
        siblings
    }

    /// Text siblings before `id`.
    pub fn get_preceding_text(&self, id: NodeId) -> Vec<NodeId> {
        let (before, _) = self.split_siblings(id);
        before.iter().copied().filter(|&s| self.is_text(s)).collect()
    }

    /// Text siblings after `id`.
    pub fn get_following_text(&self, id: NodeId) -> Vec<NodeId> {
        let (_, after) = self.split_siblings(id);
        after.iter().copied().filter(|&s| self.is_text(s)).collect()
    }

    pub fn get_surrounding_text(&self, id: NodeId) -> Vec<NodeId> {
        let mut text = self.get_preceding_text(id);
        text.extend(self.get_following_text(id));
        text
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.get_parent(current) {
            current = parent;
        }
        current == self.root()
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get_parent(node);
        }
        false
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Attribute names are ASCII case-insensitive; they are stored lowercased.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .element()
            .and_then(|data| data.attributes.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Sets an attribute. Has no effect on text nodes or the root.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let NodeKind::Element(data) = &mut self.nodes[id.0].kind {
            data.attributes.insert(name.to_ascii_lowercase(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => data.attributes.remove(&name.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// No element children and no text beyond whitespace. With
    /// `ignore_void`, void elements such as `<img>` never count as empty.
    pub fn is_empty(&self, id: NodeId, ignore_void: bool) -> bool {
        if ignore_void && self.name(id).is_some_and(is_void) {
            return false;
        }
        self.children(id).iter().all(|&child| {
            self.text(child)
                .is_some_and(|text| text.trim().is_empty())
        })
    }

    /// Concatenated text of every descendant text node.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(text) = self.text(current) {
                out.push_str(text);
            }
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Creates a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(name)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Inserts `child` at `index` (clamped) under `parent`, detaching it
    /// from its current parent first.
    ///
    /// # Panics
    ///
    /// Panics if `child` is the root, or `parent` itself or one of its
    /// ancestors, or if `parent` is a text node.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        assert!(child != self.root(), "the document root can not be a child");
        assert!(
            !self.is_ancestor(child, parent),
            "inserting {child:?} under {parent:?} would create a cycle"
        );
        assert!(!self.is_text(parent), "text nodes can not have children");

        if let Some(old_parent) = self.nodes[child.0].parent {
            self.remove_child(old_parent, child);
        }
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detaches `child`. Returns whether it was a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.nodes[parent.0].children;
        let Some(index) = children.iter().position(|&c| c == child) else {
            return false;
        };
        children.remove(index);
        self.nodes[child.0].parent = None;
        true
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        for child in std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn has_child(&self, parent: NodeId, child: NodeId) -> bool {
        self.children(parent).contains(&child)
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Appends a text node to `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text);
        self.add_child(parent, id);
        id
    }

    /// Appends a new element to `parent`.
    pub fn add_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.create_element(name);
        self.add_child(parent, id);
        id
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// The resolved style of a node.
    pub fn style(&self, id: NodeId) -> &Style {
        &self.node(id).style
    }

    pub fn inline_style(&self, id: NodeId) -> Option<&Style> {
        self.node(id).inline_style.as_ref()
    }

    pub fn has_styles(&self, id: NodeId) -> bool {
        !self.style(id).is_empty()
    }

    pub(crate) fn set_styles(&mut self, id: NodeId, style: Style, inline: Option<Style>) {
        let node = &mut self.nodes[id.0];
        node.style = style;
        node.inline_style = inline;
    }

    /// Drops every resolved and inline style in the arena.
    pub fn reset_styles(&mut self) {
        for node in &mut self.nodes {
            node.style = Style::universal();
            node.inline_style = None;
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Visits every attached element in pre-order. The visitor may mutate
    /// the document: nodes it detaches are skipped, children it adds are
    /// visited.
    pub fn map<F>(&mut self, visit: F)
    where
        F: FnMut(&mut Document, NodeId),
    {
        self.map_from(self.root(), visit);
    }

    /// Like [`map`](Self::map), restricted to `start` (when it is an
    /// element) and the elements below it.
    pub fn map_from<F>(&mut self, start: NodeId, mut visit: F)
    where
        F: FnMut(&mut Document, NodeId),
    {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !self.is_ancestor(start, id) {
                continue;
            }
            if self.is_element(id) {
                visit(self, id);
            }
            if self.is_ancestor(start, id) {
                stack.extend(self.get_children_by_tag(id, None).into_iter().rev());
            }
        }
    }

    /// Every element in pre-order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.elements_from(self.root())
    }

    /// `start` (when it is an element) and every element below it, in
    /// pre-order.
    pub fn elements_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if self.is_element(id) {
                found.push(id);
            }
            stack.extend(self.get_children_by_tag(id, None).into_iter().rev());
        }
        found
    }

    /// Elements matching `query`, in pre-order.
    pub fn filter(&self, query: Query<'_>) -> Vec<NodeId> {
        self.filter_from(self.root(), query)
    }

    /// Elements of the subtree at `start` matching `query`, in pre-order.
    pub fn filter_from(&self, start: NodeId, query: Query<'_>) -> Vec<NodeId> {
        self.elements_from(start)
            .into_iter()
            .filter(|&id| {
                let node = self.get(id);
                match &query {
                    Query::Selector(selector) => selector.matches(&node),
                    Query::Predicate(predicate) => predicate(node),
                }
            })
            .collect()
    }

    /// Elements matching any selector of a comma-separated list.
    ///
    /// ```
    /// use cascada::Document;
    ///
    /// let doc = Document::parse("<div><p class=a>1</p><p>2</p><span>3</span></div>").unwrap();
    /// assert_eq!(doc.select("p.a, span").unwrap().len(), 2);
    /// ```
    pub fn select(&self, selectors: &str) -> Result<Vec<NodeId>, sheet::StyleSyntaxError> {
        let selectors = sheet::parser::parse_selector_list(selectors)?;
        Ok(self
            .elements()
            .into_iter()
            .filter(|&id| {
                let node = self.get(id);
                selectors.iter().any(|s| s.matches(&node))
            })
            .collect())
    }
}
