/// A document element as seen by selector matching.
///
/// Implementors are cheap handles into a document tree. Only element
/// nodes are visible through this trait: sibling lists never contain text
/// nodes, and [`parent_element`](Element::parent_element) is `None` for
/// top-level elements.
pub trait Element: Clone + PartialEq {
    /// The tag name as written in the source.
    fn local_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    fn parent_element(&self) -> Option<Self>;

    /// Element siblings before this one, in document order.
    fn preceding_element_siblings(&self) -> Vec<Self>;

    /// Element siblings after this one, in document order.
    fn following_element_siblings(&self) -> Vec<Self>;

    /// No element children and no text other than whitespace.
    fn is_empty(&self) -> bool;

    /// Whether this is a top-level element of the document.
    fn is_root(&self) -> bool {
        self.parent_element().is_none()
    }
}
