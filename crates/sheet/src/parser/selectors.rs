//! Selector grammar.
//!
//! These combinators recognise selector syntax and return borrowed raw
//! pieces. Turning the pieces into [`Compound`](crate::Compound) values
//! (and validating pseudo-class arguments) happens in [`crate::selector`].

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, multispace0, multispace1, one_of},
    combinator::{map, opt},
    error::{Error, ErrorKind},
    sequence::{delimited, tuple},
};
use once_cell::sync::Lazy;

use crate::parser::values::{is_ident_char, parse_ident};
use crate::selector::Combinator;

/// Pseudo-class names, longest first.
pub static PSEUDO_CLASSES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    longest_first(&[
        "active", "any", "checked", "default", "dir", "disabled", "empty", "enabled", "first",
        "first-child", "first-of-type", "fullscreen", "focus", "hover", "indeterminate",
        "in-range", "invalid", "lang", "last-child", "last-of-type", "left", "link", "not",
        "nth-child", "nth-last-child", "nth-last-of-type", "nth-of-type", "only-child",
        "only-of-type", "optional", "out-of-range", "read-only", "read-write", "required",
        "right", "root", "scope", "target", "valid", "visited",
    ])
});

/// Pseudo-element names, longest first.
pub static PSEUDO_ELEMENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    longest_first(&[
        "after", "before", "cue", "first-letter", "first-line", "selection", "backdrop",
        "placeholder", "marker", "spelling-error", "grammar-error",
    ])
});

fn longest_first(names: &[&'static str]) -> Vec<&'static str> {
    let mut names = names.to_vec();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    names
}

/// `[name]` or `[name op value]` before validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFilter<'a> {
    pub name: &'a str,
    pub operator: Option<&'a str>,
    pub value: Option<&'a str>,
}

/// `:name` / `::name` with an optional parenthesised argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawPseudo<'a> {
    pub name: &'a str,
    pub argument: Option<&'a str>,
}

/// One compound term before validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawCompound<'a> {
    pub prefix: Option<char>,
    pub name: Option<&'a str>,
    pub filter: Option<RawFilter<'a>>,
    pub pseudo_class: Option<RawPseudo<'a>>,
    pub pseudo_element: Option<RawPseudo<'a>>,
}

impl RawCompound<'_> {
    pub fn is_empty(&self) -> bool {
        *self == RawCompound::default()
    }
}

/// Match the longest table name at the start of `input`, ASCII
/// case-insensitively, requiring an identifier boundary after it.
fn table_name<'a>(table: &[&'static str], input: &'a str) -> IResult<&'a str, &'a str> {
    for name in table {
        let Some(head) = input.get(..name.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(name) {
            continue;
        }
        let rest = &input[name.len()..];
        if rest.chars().next().is_some_and(is_ident_char) {
            continue;
        }
        return Ok((rest, head));
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Tag)))
}

/// Parenthesised text with balanced nesting; returns the trimmed inside.
fn parenthesized(input: &str) -> IResult<&str, &str> {
    let (body, _) = char('(')(input)?;
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&body[i + 1..], body[..i].trim()));
                }
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

/// Parses `:name(arg)?` for a name in the pseudo-class table.
pub fn pseudo_class(input: &str) -> IResult<&str, RawPseudo<'_>> {
    let (rest, _) = char(':')(input)?;
    if rest.starts_with(':') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    }
    let (rest, name) = table_name(&PSEUDO_CLASSES, rest)?;
    let (rest, argument) = opt(parenthesized)(rest)?;
    Ok((rest, RawPseudo { name, argument }))
}

/// Parses `::name(arg)?`, or the legacy single-colon form, for a name in the
/// pseudo-element table.
pub fn pseudo_element(input: &str) -> IResult<&str, RawPseudo<'_>> {
    let (rest, _) = alt((tag("::"), tag(":")))(input)?;
    let (rest, name) = table_name(&PSEUDO_ELEMENTS, rest)?;
    let (rest, argument) = opt(parenthesized)(rest)?;
    Ok((rest, RawPseudo { name, argument }))
}

fn match_operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag("^="),
        tag("|="),
        tag("$="),
        tag("*="),
        tag("~="),
        tag("="),
    ))(input)
}

fn filter_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        take_while1(is_ident_char),
    ))(input)
}

/// Parses an attribute filter: `[href]`, `[type="text"]`, `[lang|=en]`.
pub fn attribute_filter(input: &str) -> IResult<&str, RawFilter<'_>> {
    let (input, _) = char('[')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, name) = take_while1(|c: char| is_ident_char(c) || c == ':')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, operation) = opt(tuple((
        match_operator,
        delimited(multispace0, filter_value, multispace0),
    )))(input)?;
    let (input, _) = char(']')(input)?;

    let (operator, value) = match operation {
        Some((op, value)) => (Some(op), Some(value)),
        None => (None, None),
    };
    Ok((
        input,
        RawFilter {
            name,
            operator,
            value,
        },
    ))
}

/// Parses one compound term: `div`, `.note`, `#main`, `*`, `a[href]:hover`,
/// `p::first-line`. Every part is optional; check
/// [`RawCompound::is_empty`] for progress.
pub fn compound(input: &str) -> IResult<&str, RawCompound<'_>> {
    let (input, prefix) = opt(one_of("#."))(input)?;
    let (input, name) = match prefix {
        Some(_) => opt(take_while1(is_ident_char))(input)?,
        None => opt(alt((tag("*"), parse_ident)))(input)?,
    };
    let (input, filter) = opt(attribute_filter)(input)?;
    let (input, pseudo_class) = opt(pseudo_class)(input)?;
    let (input, pseudo_element) = opt(pseudo_element)(input)?;
    Ok((
        input,
        RawCompound {
            prefix,
            name,
            filter,
            pseudo_class,
            pseudo_element,
        },
    ))
}

/// Parses a combinator: `>`, `+`, `~` with optional whitespace around, or
/// plain whitespace (descendant).
pub fn combinator(input: &str) -> IResult<&str, Combinator> {
    alt((
        map(
            delimited(multispace0, one_of(">+~"), multispace0),
            |c| match c {
                '>' => Combinator::Child,
                '+' => Combinator::AdjacentSibling,
                _ => Combinator::GeneralSibling,
            },
        ),
        map(multispace1, |_| Combinator::Descendant),
    ))(input)
}
