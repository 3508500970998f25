//! Receivers for parser events.

use crate::parser::Attribute;

/// Consumer of balanced parser events.
///
/// The parser guarantees that every `start_element` is matched by exactly
/// one `end_element`, in LIFO order, including for void elements.
pub trait TreeSink {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>], self_closed: bool);
    fn end_element(&mut self);
    fn text(&mut self, text: &str);
}

/// An owned parser event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        self_closed: bool,
    },
    End,
    Text(String),
}

impl Event {
    pub fn start(name: &str) -> Self {
        Event::Start {
            name: name.to_string(),
            attributes: Vec::new(),
            self_closed: false,
        }
    }

    pub fn text(text: &str) -> Self {
        Event::Text(text.to_string())
    }
}

impl TreeSink for Vec<Event> {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>], self_closed: bool) {
        self.push(Event::Start {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|a| (a.name.to_string(), a.value.to_string()))
                .collect(),
            self_closed,
        });
    }

    fn end_element(&mut self) {
        self.push(Event::End);
    }

    fn text(&mut self, text: &str) {
        self.push(Event::Text(text.to_string()));
    }
}
