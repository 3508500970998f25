//! Shared low-level parsers.

use nom::{
    IResult,
    bytes::complete::take_while,
    character::complete::{char, satisfy},
    combinator::{opt, recognize},
    sequence::tuple,
};

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Parses a CSS identifier: `div`, `my-widget`, `-webkit-box`, `_x`.
pub fn parse_ident(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        satisfy(is_ident_start),
        take_while(is_ident_char),
    )))(input)
}

/// Parses a CSS length into pixels: `600px`, `40em`, `2.5rem`, `0`.
///
/// `em` and `rem` use a 16px base.
pub fn parse_length(text: &str) -> Option<f64> {
    let text = text.trim().to_ascii_lowercase();
    let (number, scale) = if let Some(n) = text.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = text.strip_suffix("rem") {
        (n, 16.0)
    } else if let Some(n) = text.strip_suffix("em") {
        (n, 16.0)
    } else {
        (text.as_str(), 1.0)
    };
    number.trim().parse::<f64>().ok().map(|n| n * scale)
}

/// Split `text` on `separator` where it is not nested in quotes, brackets
/// or parentheses. Pieces are trimmed; empty pieces are kept.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                pieces.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(text[start..].trim());
    pieces
}
