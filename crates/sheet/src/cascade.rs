//! CSS cascade: priorities, merges, inheritance and selector matching.
//!
//! ## Priority
//!
//! Competing declarations are ranked by a [`Priority`] vector, compared
//! lexicographically:
//!
//! 1. directly matched beats inherited
//! 2. inline (`style` attribute) beats stylesheet rules
//! 3. selector [`Specificity`]
//!
//! `!important` acts as a gate in front of the vector: a normal declaration
//! never replaces an important one, and an important one always replaces a
//! normal one. Otherwise the destination adopts the incoming declaration when
//! its own priority is lower or equal, so on a tie the last merge wins.
//!
//! ## Selector Matching
//!
//! Selectors are matched right to left against any [`Element`]
//! implementation: the tail compound must match the subject, then each
//! combinator walks to the parent, ancestors or preceding siblings,
//! backtracking when a candidate fails further left.

use phf::{Set, phf_set};

use crate::element::Element;
use crate::selector::{
    Combinator, Compound, CompoundKind, Pseudo, PseudoArgument, Selector, SelectorPart,
    Specificity,
};
use crate::style::{Declaration, Style};
use crate::stylesheet::StyleSheet;

/// Properties whose values pass from parent to child.
pub static INHERITED_PROPERTIES: Set<&'static str> = phf_set! {
    "caption-side", "caret-color", "color", "cursor", "direction", "empty-cells", "font",
    "font-family", "font-feature-settings", "font-kerning", "font-language-override",
    "font-size", "font-size-adjust", "font-stretch", "font-style", "font-synthesis",
    "font-variant", "font-variant-alternates", "font-variant-caps", "font-variant-east-asian",
    "font-variant-ligatures", "font-variant-numeric", "font-variant-position", "font-weight",
    "hanging-punctuation", "hyphens", "image-orientation", "image-rendering", "letter-spacing",
    "line-height", "list-style", "list-style-image", "list-style-position", "list-style-type",
    "object-position", "orphans", "overflow-wrap", "pointer-events", "quotes", "ruby-align",
    "ruby-position", "tab-size", "text-align", "text-align-last", "text-combine-upright",
    "text-indent", "text-justify", "text-orientation", "text-rendering", "text-shadow",
    "text-transform", "text-underline-position", "visibility", "white-space", "widows",
    "word-break", "word-spacing", "word-wrap", "writing-mode",
};

/// Whether `name` is inheritable. Custom properties (`--x`) always are.
pub fn is_inherited_property(name: &str) -> bool {
    name.starts_with("--") || INHERITED_PROPERTIES.contains(name)
}

/// Ranking of a declaration, highest wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority {
    /// `false` for inherited declarations.
    pub direct: bool,
    pub inline: bool,
    pub specificity: Specificity,
}

impl Declaration {
    pub fn priority(&self) -> Priority {
        Priority {
            direct: !self.inherited,
            inline: self.inline,
            specificity: self.origin,
        }
    }

    /// Merges `other` into `self`, adopting it when it outranks `self`.
    ///
    /// # Panics
    ///
    /// Panics if the declarations are for different properties.
    pub fn merge(&mut self, other: &Declaration) {
        assert!(
            self.name == other.name,
            "cannot merge declaration '{}' into '{}'",
            other.name,
            self.name
        );
        if self.important && !other.important {
            return;
        }
        if other.important && !self.important || self.priority() <= other.priority() {
            *self = other.clone();
        }
    }
}

impl Style {
    /// Merges a style with an equal selector into this one.
    ///
    /// # Panics
    ///
    /// Panics if the selectors differ; use [`cascade`](Self::cascade) to
    /// accumulate styles of different selectors.
    pub fn merge(&mut self, other: &Style) {
        assert!(
            self.selector == other.selector,
            "cannot merge style '{}' into '{}'",
            other.selector,
            self.selector
        );
        self.cascade(other);
    }

    /// Merges every declaration of `other` into this style regardless of
    /// selector. Declarations missing here are copied in.
    pub fn cascade(&mut self, other: &Style) {
        for incoming in &other.declarations {
            match self
                .declarations
                .iter_mut()
                .find(|d| d.name == incoming.name)
            {
                Some(existing) => existing.merge(incoming),
                None => self.declarations.push(incoming.clone()),
            }
        }
    }

    /// The inheritable subset of this style, flagged as inherited.
    pub fn inherited_copy(&self) -> Style {
        let mut copy = Style::new(self.selector.clone());
        copy.declarations = self
            .declarations
            .iter()
            .filter(|d| is_inherited_property(&d.name))
            .cloned()
            .collect();
        copy.set_inherited(true);
        copy
    }
}

impl StyleSheet {
    /// Adds every rule of `other`. Styles whose selector already exists here
    /// are merged into the existing entry.
    pub fn merge(&mut self, other: &StyleSheet) {
        for item in other.items() {
            self.push(item.clone());
        }
    }
}

impl Selector {
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        matches_parts(&self.parts, element)
    }
}

fn matches_parts<E: Element>(parts: &[SelectorPart], element: &E) -> bool {
    let Some((last, head)) = parts.split_last() else {
        return false;
    };
    if !last.compound.matches(element) {
        return false;
    }
    let Some(link) = head.last() else {
        return true;
    };

    match link.combinator {
        Combinator::Also | Combinator::None => matches_parts(head, element),
        Combinator::Child => element
            .parent_element()
            .is_some_and(|parent| matches_parts(head, &parent)),
        Combinator::Descendant => {
            let mut ancestor = element.parent_element();
            while let Some(current) = ancestor {
                if matches_parts(head, &current) {
                    return true;
                }
                ancestor = current.parent_element();
            }
            false
        }
        Combinator::AdjacentSibling => element
            .preceding_element_siblings()
            .last()
            .is_some_and(|sibling| matches_parts(head, sibling)),
        Combinator::GeneralSibling => element
            .preceding_element_siblings()
            .iter()
            .any(|sibling| matches_parts(head, sibling)),
    }
}

impl Compound {
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        let kind = match &self.kind {
            CompoundKind::Tag(name) => element.local_name().eq_ignore_ascii_case(name),
            CompoundKind::Universal => true,
            CompoundKind::Id(id) => element.attribute("id") == Some(id.as_str()),
            CompoundKind::Class(class) => element
                .attribute("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
        };

        kind && self
            .filter
            .as_ref()
            .is_none_or(|filter| filter.matches(element.attribute(&filter.name)))
            && self
                .pseudo_class
                .as_ref()
                .is_none_or(|pseudo| pseudo.matches(element))
            // Pseudo-elements address generated content, never a node.
            && self.pseudo_element.is_none()
    }
}

fn same_type<E: Element>(a: &E, b: &E) -> bool {
    a.local_name().eq_ignore_ascii_case(b.local_name())
}

impl Pseudo {
    /// Evaluates a pseudo-class. Dynamic states (`:hover`, `:focus`, ...)
    /// never match a static document.
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        if self.element {
            return false;
        }
        let before = || element.preceding_element_siblings();
        let after = || element.following_element_siblings();
        let before_of_type = || before().iter().filter(|s| same_type(*s, element)).count();
        let after_of_type = || after().iter().filter(|s| same_type(*s, element)).count();
        let nth = |position: usize| match self.parsed_argument() {
            Some(PseudoArgument::Nth(nth)) => nth.matches(position),
            _ => false,
        };

        match self.name.as_str() {
            "empty" => element.is_empty(),
            "root" => element.is_root(),
            "first-child" => before().is_empty(),
            "last-child" => after().is_empty(),
            "only-child" => before().is_empty() && after().is_empty(),
            "first-of-type" => before_of_type() == 0,
            "last-of-type" => after_of_type() == 0,
            "only-of-type" => before_of_type() == 0 && after_of_type() == 0,
            "nth-child" => nth(before().len() + 1),
            "nth-last-child" => nth(after().len() + 1),
            "nth-of-type" => nth(before_of_type() + 1),
            "nth-last-of-type" => nth(after_of_type() + 1),
            "not" => match self.parsed_argument() {
                Some(PseudoArgument::Selector(inner)) => !inner.matches(element),
                _ => false,
            },
            _ => false,
        }
    }
}
