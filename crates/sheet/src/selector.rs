//! Selector data structures.
//!
//! A [`Selector`] is a flat chain of [`SelectorPart`]s read left to right.
//! Each part holds a [`Compound`] and the [`Combinator`] linking it to the
//! next part; the last part always carries [`Combinator::None`].
//!
//! ```text
//! div.note > p:first-child
//! [div]--Also-->[.note]--Child-->[p:first-child]--None
//! ```

use std::fmt;
use std::ops::{Add, AddAssign};

use smallvec::SmallVec;

use crate::error::StyleSyntaxError;
use crate::parser::selectors::{RawCompound, RawFilter, RawPseudo, combinator, compound};

/// CSS specificity for determining rule precedence.
///
/// Compared lexicographically: ids, then classes (including attribute
/// filters and pseudo-classes), then types (including pseudo-elements).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub types: u32,
}

impl Specificity {
    pub fn new(ids: u32, classes: u32, types: u32) -> Self {
        Self {
            ids,
            classes,
            types,
        }
    }
}

impl Add for Specificity {
    type Output = Specificity;

    fn add(self, other: Specificity) -> Specificity {
        Specificity {
            ids: self.ids + other.ids,
            classes: self.classes + other.classes,
            types: self.types + other.types,
        }
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, other: Specificity) {
        *self = *self + other;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// End of the chain.
    None,
    /// Both compounds apply to the same element (`div.note`).
    Also,
    Descendant,
    Child,
    AdjacentSibling, // +
    GeneralSibling,  // ~
}

impl Combinator {
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::None | Combinator::Also => "",
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::AdjacentSibling => "+",
            Combinator::GeneralSibling => "~",
        }
    }
}

/// What a compound selects on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompoundKind {
    Tag(String),
    Universal,
    Id(String),
    Class(String),
}

/// How an attribute filter compares values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// `[name]`
    Exists,
    /// `[name=value]`
    Equals,
    /// `[name^=value]`
    StartsWith,
    /// `[name|=value]`: equal, or followed by `-`
    StartsWithWord,
    /// `[name$=value]`
    EndsWith,
    /// `[name*=value]`
    Contains,
    /// `[name~=value]`: one of the whitespace-separated words
    ContainsWord,
}

impl MatchMode {
    fn from_operator(op: &str) -> Option<Self> {
        Some(match op {
            "=" => MatchMode::Equals,
            "^=" => MatchMode::StartsWith,
            "|=" => MatchMode::StartsWithWord,
            "$=" => MatchMode::EndsWith,
            "*=" => MatchMode::Contains,
            "~=" => MatchMode::ContainsWord,
            _ => return None,
        })
    }

    pub fn operator(self) -> &'static str {
        match self {
            MatchMode::Exists => "",
            MatchMode::Equals => "=",
            MatchMode::StartsWith => "^=",
            MatchMode::StartsWithWord => "|=",
            MatchMode::EndsWith => "$=",
            MatchMode::Contains => "*=",
            MatchMode::ContainsWord => "~=",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeFilter {
    pub name: String,
    pub mode: MatchMode,
    pub value: Option<String>,
}

impl AttributeFilter {
    /// Parses a bracketed filter such as `[href^="https"]`.
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        let text = text.trim();
        match crate::parser::selectors::attribute_filter(text) {
            Ok(("", raw)) => Self::from_raw(raw),
            _ => Err(StyleSyntaxError::new(format!(
                "malformed attribute filter '{text}'"
            ))),
        }
    }

    fn from_raw(raw: RawFilter<'_>) -> Result<Self, StyleSyntaxError> {
        let mode = match raw.operator {
            None => MatchMode::Exists,
            Some(op) => MatchMode::from_operator(op).ok_or_else(|| {
                StyleSyntaxError::new(format!("unknown attribute operator '{op}'"))
            })?,
        };
        Ok(Self {
            name: raw.name.to_string(),
            mode,
            value: raw.value.map(str::to_string),
        })
    }

    /// Tests an attribute value (`None` when the attribute is absent).
    pub fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        let value = self.value.as_deref().unwrap_or("");
        match self.mode {
            MatchMode::Exists => true,
            MatchMode::Equals => actual == value,
            MatchMode::StartsWith => !value.is_empty() && actual.starts_with(value),
            MatchMode::StartsWithWord => {
                actual == value
                    || actual
                        .strip_prefix(value)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            MatchMode::EndsWith => !value.is_empty() && actual.ends_with(value),
            MatchMode::Contains => !value.is_empty() && actual.contains(value),
            MatchMode::ContainsWord => actual.split_whitespace().any(|w| w == value),
        }
    }
}

impl fmt::Display for AttributeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) if self.mode != MatchMode::Exists => {
                write!(f, "[{}{}\"{}\"]", self.name, self.mode.operator(), value)
            }
            _ => write!(f, "[{}]", self.name),
        }
    }
}

/// An `An+B` position formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nth {
    pub step: i64,
    pub offset: i64,
}

impl Nth {
    /// Parses `2n+1`, `-n+3`, `odd`, `even`, `4`.
    ///
    /// ```
    /// use sheet::Nth;
    ///
    /// let odd = Nth::parse("odd").unwrap();
    /// assert!(odd.matches(1) && odd.matches(3) && !odd.matches(2));
    /// assert_eq!(Nth::parse("-n + 3").unwrap(), Nth { step: -1, offset: 3 });
    /// ```
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        let compact: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let invalid = || StyleSyntaxError::new(format!("invalid An+B formula '{}'", text.trim()));

        match compact.as_str() {
            "even" => return Ok(Nth { step: 2, offset: 0 }),
            "odd" => return Ok(Nth { step: 2, offset: 1 }),
            "" => return Err(invalid()),
            _ => {}
        }

        let Some((a, b)) = compact.split_once('n') else {
            let offset = compact.parse().map_err(|_| invalid())?;
            return Ok(Nth { step: 0, offset });
        };
        let step = match a {
            "" | "+" => 1,
            "-" => -1,
            _ => a.parse().map_err(|_| invalid())?,
        };
        let offset = if b.is_empty() {
            0
        } else if b.starts_with(['+', '-']) {
            b.parse().map_err(|_| invalid())?
        } else {
            return Err(invalid());
        };
        Ok(Nth { step, offset })
    }

    /// Whether some `k >= 0` gives `position = step * k + offset`.
    /// Positions are 1-based.
    pub fn matches(&self, position: usize) -> bool {
        // Widened so that offsets near the i64 limits cannot overflow.
        let position = position as i128;
        let step = i128::from(self.step);
        let offset = i128::from(self.offset);
        if step == 0 {
            return position == offset;
        }
        let diff = position - offset;
        diff % step == 0 && diff / step >= 0
    }
}

/// The parsed form of a pseudo-class argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PseudoArgument {
    Nth(Nth),
    Selector(Box<Selector>),
    Text(String),
}

/// Pseudo selectors written with a parenthesised argument.
fn takes_argument(name: &str) -> bool {
    matches!(
        name,
        "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" | "not" | "lang"
            | "dir" | "any" | "cue"
    )
}

fn read_argument(name: &str, argument: &str) -> Result<PseudoArgument, StyleSyntaxError> {
    match name {
        "not" => Ok(PseudoArgument::Selector(Box::new(Selector::parse(argument)?))),
        name if name.starts_with("nth-") => Nth::parse(argument).map(PseudoArgument::Nth),
        _ => Ok(PseudoArgument::Text(argument.to_string())),
    }
}

/// A pseudo-class (`:hover`) or pseudo-element (`::before`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pseudo {
    pub name: String,
    pub argument: Option<String>,
    pub element: bool,
    parsed: Option<PseudoArgument>,
}

impl Pseudo {
    /// Parses `:name`, `:name(arg)` or `::name`.
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        use crate::parser::selectors::{pseudo_class, pseudo_element};

        let text = text.trim();
        if let Ok(("", raw)) = pseudo_class(text) {
            return Self::from_raw(raw, false);
        }
        if let Ok(("", raw)) = pseudo_element(text) {
            return Self::from_raw(raw, true);
        }
        Err(StyleSyntaxError::new(format!("unknown pseudo selector '{text}'")))
    }

    fn from_raw(raw: RawPseudo<'_>, element: bool) -> Result<Self, StyleSyntaxError> {
        let name = raw.name.to_ascii_lowercase();
        let parsed = match (takes_argument(&name), raw.argument) {
            (true, Some(arg)) => Some(read_argument(&name, arg)?),
            (true, None) => {
                return Err(StyleSyntaxError::new(format!(
                    "':{name}' requires an argument"
                )));
            }
            (false, Some(_)) => {
                return Err(StyleSyntaxError::new(format!(
                    "':{name}' does not take an argument"
                )));
            }
            (false, None) => None,
        };
        Ok(Self {
            name,
            argument: raw.argument.map(str::to_string),
            element,
            parsed,
        })
    }

    pub fn parsed_argument(&self) -> Option<&PseudoArgument> {
        self.parsed.as_ref()
    }

    pub(crate) fn specificity(&self) -> Specificity {
        match &self.parsed {
            Some(PseudoArgument::Selector(inner)) => inner.specificity(),
            _ if self.element => Specificity::new(0, 0, 1),
            _ => Specificity::new(0, 1, 0),
        }
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.element { "::" } else { ":" })?;
        f.write_str(&self.name)?;
        if let Some(arg) = &self.argument {
            write!(f, "({arg})")?;
        }
        Ok(())
    }
}

/// A single selector term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compound {
    pub kind: CompoundKind,
    pub filter: Option<AttributeFilter>,
    pub pseudo_class: Option<Pseudo>,
    pub pseudo_element: Option<Pseudo>,
}

impl Compound {
    pub fn new(kind: CompoundKind) -> Self {
        Self {
            kind,
            filter: None,
            pseudo_class: None,
            pseudo_element: None,
        }
    }

    pub fn universal() -> Self {
        Self::new(CompoundKind::Universal)
    }

    /// Parses exactly one compound term, e.g. `a[href]:hover`.
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        let text = text.trim();
        match compound(text) {
            Ok(("", raw)) if !raw.is_empty() => Self::from_raw(raw),
            Ok((rest, _)) => Err(unexpected(text, rest)),
            Err(_) => Err(StyleSyntaxError::new(format!("malformed selector '{text}'"))),
        }
    }

    fn from_raw(raw: RawCompound<'_>) -> Result<Self, StyleSyntaxError> {
        let kind = match (raw.prefix, raw.name) {
            (Some(p), Some("*")) | (Some(p), None) => {
                return Err(StyleSyntaxError::new(format!("expected a name after '{p}'")));
            }
            (Some('#'), Some(name)) => CompoundKind::Id(name.to_string()),
            (Some(_), Some(name)) => CompoundKind::Class(name.to_string()),
            (None, Some("*")) | (None, None) => CompoundKind::Universal,
            (None, Some(name)) => CompoundKind::Tag(name.to_string()),
        };
        Ok(Self {
            kind,
            filter: raw.filter.map(AttributeFilter::from_raw).transpose()?,
            pseudo_class: raw
                .pseudo_class
                .map(|p| Pseudo::from_raw(p, false))
                .transpose()?,
            pseudo_element: raw
                .pseudo_element
                .map(|p| Pseudo::from_raw(p, true))
                .transpose()?,
        })
    }

    pub fn specificity(&self) -> Specificity {
        let mut total = match self.kind {
            CompoundKind::Id(_) => Specificity::new(1, 0, 0),
            CompoundKind::Class(_) => Specificity::new(0, 1, 0),
            CompoundKind::Tag(_) => Specificity::new(0, 0, 1),
            CompoundKind::Universal => Specificity::default(),
        };
        if self.filter.is_some() {
            total.classes += 1;
        }
        if let Some(pseudo) = &self.pseudo_class {
            total += pseudo.specificity();
        }
        if let Some(pseudo) = &self.pseudo_element {
            total += pseudo.specificity();
        }
        total
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CompoundKind::Tag(name) => f.write_str(name)?,
            CompoundKind::Universal => f.write_str("*")?,
            CompoundKind::Id(id) => write!(f, "#{id}")?,
            CompoundKind::Class(class) => write!(f, ".{class}")?,
        }
        if let Some(filter) = &self.filter {
            write!(f, "{filter}")?;
        }
        if let Some(pseudo) = &self.pseudo_class {
            write!(f, "{pseudo}")?;
        }
        if let Some(pseudo) = &self.pseudo_element {
            write!(f, "{pseudo}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorPart {
    pub compound: Compound,
    pub combinator: Combinator,
}

impl SelectorPart {
    pub fn new(compound: Compound, combinator: Combinator) -> Self {
        Self {
            compound,
            combinator,
        }
    }
}

/// A complex selector such as `ul > li.item + li`.
///
/// Two selectors are equal when their chains are equal part for part,
/// which is what stylesheet de-duplication relies on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub parts: SmallVec<[SelectorPart; 4]>,
}

impl Selector {
    /// Parses a single complex selector (no commas).
    ///
    /// # Example
    ///
    /// ```
    /// use sheet::{Combinator, Selector};
    ///
    /// let selector = Selector::parse("div.note > p").unwrap();
    /// assert_eq!(selector.parts.len(), 3);
    /// assert_eq!(selector.combinator(), Some(Combinator::Child));
    /// assert_eq!(selector.to_string(), "div.note>p");
    /// ```
    pub fn parse(text: &str) -> Result<Self, StyleSyntaxError> {
        let source = text.trim();
        if source.is_empty() {
            return Err(StyleSyntaxError::new("empty selector"));
        }

        let mut parts = SmallVec::new();
        let mut input = source;
        loop {
            let (rest, raw) = compound(input)
                .map_err(|_| StyleSyntaxError::new(format!("malformed selector '{source}'")))?;
            if raw.is_empty() {
                return Err(unexpected(source, input));
            }
            let current = Compound::from_raw(raw)?;
            if rest.is_empty() {
                parts.push(SelectorPart::new(current, Combinator::None));
                break;
            }
            match combinator(rest) {
                Ok((after, link)) => {
                    if after.is_empty() {
                        return Err(StyleSyntaxError::new(format!(
                            "dangling combinator in '{source}'"
                        )));
                    }
                    parts.push(SelectorPart::new(current, link));
                    input = after;
                }
                Err(_) => {
                    parts.push(SelectorPart::new(current, Combinator::Also));
                    input = rest;
                }
            }
        }
        Ok(Self { parts })
    }

    /// `*`
    pub fn universal() -> Self {
        Self::from_compound(Compound::universal())
    }

    pub fn from_compound(compound: Compound) -> Self {
        let mut parts = SmallVec::new();
        parts.push(SelectorPart::new(compound, Combinator::None));
        Self { parts }
    }

    /// The rightmost compound: the one that must match the subject element.
    pub fn tail(&self) -> &Compound {
        &self.parts[self.parts.len() - 1].compound
    }

    /// Everything left of the tail.
    pub fn head(&self) -> &[SelectorPart] {
        &self.parts[..self.parts.len() - 1]
    }

    /// The combinator between [`head`](Self::head) and [`tail`](Self::tail).
    pub fn combinator(&self) -> Option<Combinator> {
        self.head().last().map(|part| part.combinator)
    }

    /// Specificity summed across the chain.
    pub fn specificity(&self) -> Specificity {
        self.parts
            .iter()
            .map(|p| p.compound.specificity())
            .fold(Specificity::default(), |acc, s| acc + s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{}{}", part.compound, part.combinator.as_str())?;
        }
        Ok(())
    }
}

fn unexpected(source: &str, rest: &str) -> StyleSyntaxError {
    if rest.starts_with(':') {
        let name: String = rest
            .trim_start_matches(':')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        StyleSyntaxError::new(format!("unknown pseudo selector ':{name}' in '{source}'"))
    } else {
        StyleSyntaxError::new(format!("unexpected '{rest}' in selector '{source}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(selector: &Selector) -> Vec<(CompoundKind, Combinator)> {
        selector
            .parts
            .iter()
            .map(|p| (p.compound.kind.clone(), p.combinator))
            .collect()
    }

    #[test]
    fn also_chain_for_adjacent_compounds() {
        let s = Selector::parse("div.foo#bar").unwrap();
        assert_eq!(
            kinds(&s),
            vec![
                (CompoundKind::Tag("div".into()), Combinator::Also),
                (CompoundKind::Class("foo".into()), Combinator::Also),
                (CompoundKind::Id("bar".into()), Combinator::None),
            ]
        );
    }

    #[test]
    fn all_combinators() {
        let s = Selector::parse("a b>c + d ~ e").unwrap();
        let links: Vec<_> = s.parts.iter().map(|p| p.combinator).collect();
        assert_eq!(
            links,
            vec![
                Combinator::Descendant,
                Combinator::Child,
                Combinator::AdjacentSibling,
                Combinator::GeneralSibling,
                Combinator::None,
            ]
        );
        assert_eq!(s.to_string(), "a b>c+d~e");
    }

    #[test]
    fn head_and_tail() {
        let s = Selector::parse("ul li").unwrap();
        assert_eq!(s.tail().kind, CompoundKind::Tag("li".into()));
        assert_eq!(s.head().len(), 1);
        assert_eq!(Selector::parse("li").unwrap().combinator(), None);
    }

    #[test]
    fn bare_filter_and_pseudo_are_universal() {
        assert_eq!(Compound::parse("[href]").unwrap().kind, CompoundKind::Universal);
        assert_eq!(Compound::parse(":hover").unwrap().kind, CompoundKind::Universal);
    }

    #[test]
    fn specificity_accumulates() {
        assert_eq!(
            Selector::parse("#a .b c").unwrap().specificity(),
            Specificity::new(1, 1, 1)
        );
        assert_eq!(
            Selector::parse("a[href]:hover::before").unwrap().specificity(),
            Specificity::new(0, 2, 2)
        );
        assert_eq!(Selector::universal().specificity(), Specificity::default());
        assert_eq!(
            Selector::parse("p:not(#x)").unwrap().specificity(),
            Specificity::new(1, 0, 1)
        );
    }

    #[test]
    fn extra_class_never_lowers_specificity() {
        let base = Selector::parse("div .a").unwrap().specificity();
        let more = Selector::parse("div .a.b").unwrap().specificity();
        assert!(more > base);
        let id = Selector::parse("#x div .a").unwrap().specificity();
        assert!(id.ids > base.ids);
    }

    #[test]
    fn malformed_selectors() {
        for text in ["", "div >", "#", ".*", "a:bogus", "a,b", "a:nth-child(x)", "p:not()"] {
            assert!(Selector::parse(text).is_err(), "{text:?} should fail");
        }
    }

    #[test]
    fn pseudo_argument_rules() {
        assert!(Pseudo::parse(":hover(1)").is_err());
        assert!(Pseudo::parse(":nth-child").is_err());
        let p = Pseudo::parse(":nth-child(2n+1)").unwrap();
        assert_eq!(p.parsed_argument(), Some(&PseudoArgument::Nth(Nth { step: 2, offset: 1 })));
        let e = Pseudo::parse("::before").unwrap();
        assert!(e.element);
        assert_eq!(e.to_string(), "::before");
    }

    #[test]
    fn nth_formulas() {
        assert_eq!(Nth::parse("even").unwrap(), Nth { step: 2, offset: 0 });
        assert_eq!(Nth::parse("n").unwrap(), Nth { step: 1, offset: 0 });
        assert_eq!(Nth::parse("3").unwrap(), Nth { step: 0, offset: 3 });
        assert_eq!(Nth::parse("-2n+5").unwrap(), Nth { step: -2, offset: 5 });
        assert!(Nth::parse("2n3").is_err());
        assert!(Nth::parse("").is_err());

        let first_three = Nth::parse("-n+3").unwrap();
        let hits: Vec<_> = (1..=5).filter(|p| first_three.matches(*p)).collect();
        assert_eq!(hits, vec![1, 2, 3]);

        let from_four = Nth::parse("n+4").unwrap();
        assert!(!from_four.matches(3));
        assert!(from_four.matches(4) && from_four.matches(9));
    }

    #[test]
    fn nth_extreme_coefficients() {
        let low = Nth { step: 1, offset: i64::MIN };
        assert!(low.matches(1) && low.matches(usize::MAX));
        assert!(!Nth { step: -1, offset: i64::MIN }.matches(1));
        assert!(Nth { step: i64::MIN, offset: 1 }.matches(1));
        assert!(!Nth { step: i64::MAX, offset: i64::MAX }.matches(3));
        assert!(!Nth { step: 0, offset: i64::MIN }.matches(0));
    }

    #[test]
    fn attribute_modes() {
        let f = AttributeFilter::parse("[lang|=en]").unwrap();
        assert!(f.matches(Some("en")));
        assert!(f.matches(Some("en-US")));
        assert!(!f.matches(Some("english")));

        let f = AttributeFilter::parse("[class~=\"b\"]").unwrap();
        assert!(f.matches(Some("a b c")));
        assert!(!f.matches(Some("abc")));

        let f = AttributeFilter::parse("[href$='.pdf']").unwrap();
        assert!(f.matches(Some("/doc.pdf")));
        assert!(!f.matches(None));

        assert_eq!(f.to_string(), "[href$=\".pdf\"]");
        assert!(AttributeFilter::parse("[href").is_err());
    }

    #[test]
    fn render_round_trip() {
        for text in ["div.a>p:first-child", "ul li+li", "*[href^=\"http\"]", "a:not(.x)::after"] {
            let s = Selector::parse(text).unwrap();
            assert_eq!(s.to_string(), text);
            assert_eq!(Selector::parse(&s.to_string()).unwrap(), s);
        }
    }
}
