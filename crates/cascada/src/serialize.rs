//! Markup serialization.

use std::collections::BTreeMap;
use std::fmt::Write;

use markup::is_void;

use crate::tree::{Document, NodeId, NodeKind};

impl Document {
    /// Renders the whole document.
    ///
    /// ```
    /// use cascada::Document;
    ///
    /// let doc = Document::parse("<p class=x title='say \"hi\"'>a<br></p>").unwrap();
    /// assert_eq!(doc.render(), "<p class=\"x\" title='say \"hi\"'>a<br/></p>");
    /// ```
    pub fn render(&self) -> String {
        self.render_node(self.root())
    }

    /// Renders one node and its subtree. The root renders only its
    /// children.
    pub fn render_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let mut work = vec![Step::Open(id)];
        while let Some(step) = work.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(name) => {
                    let _ = write!(out, "</{name}>");
                    continue;
                }
            };
            let node = self.node(id);
            match node.kind() {
                NodeKind::Document => {
                    work.extend(node.children().iter().rev().map(|&c| Step::Open(c)));
                }
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element(data) => {
                    out.push('<');
                    out.push_str(&data.name);
                    write_attributes(&data.attributes, out);

                    let collapse =
                        is_void(&data.name) || (data.self_closed && node.children().is_empty());
                    if collapse {
                        out.push_str("/>");
                        continue;
                    }
                    out.push('>');
                    work.push(Step::Close(&data.name));
                    work.extend(node.children().iter().rev().map(|&c| Step::Open(c)));
                }
            }
        }
    }
}

/// Pending serialization work, popped from the back.
enum Step<'a> {
    Open(NodeId),
    Close(&'a str),
}

fn write_attributes(attributes: &BTreeMap<String, String>, out: &mut String) {
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        if value.is_empty() {
            continue;
        }
        match (value.contains('"'), value.contains('\'')) {
            (false, _) => {
                let _ = write!(out, "=\"{value}\"");
            }
            (true, false) => {
                let _ = write!(out, "='{value}'");
            }
            (true, true) => {
                let _ = write!(out, "=\"{}\"", value.replace('"', "&quot;"));
            }
        }
    }
}
