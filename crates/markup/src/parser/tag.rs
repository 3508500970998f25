//! Attribute scanning inside a start tag.
//!
//! The scanner is a small state machine over the characters between the
//! tag name and the closing `>`. It accepts unquoted, single-quoted and
//! double-quoted values and treats a bare name as present with an empty
//! value.

/// A single `name=value` pair as written in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// The scanned remainder of a start tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagBody<'a> {
    pub attributes: Vec<Attribute<'a>>,
    pub self_closing: bool,
    /// Byte offset just past the closing `>`.
    pub end: usize,
}

/// A failure at a byte offset, converted to a `MarkupError` by the lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub offset: usize,
    pub message: String,
}

impl ScanError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    BeforeName,
    Name(usize),
    AfterName,
    BeforeValue,
    Quoted(char, usize),
    Unquoted(usize),
    AfterQuoted,
    SelfClosing,
}

/// Characters that may not appear outside quotes.
fn is_reserved(c: char) -> bool {
    matches!(c, '\'' | '"' | '=' | '<' | '>' | '`' | '\0')
}

/// Scan attributes starting at byte `start` of `input`, stopping after `>`.
pub fn scan_attributes(input: &str, start: usize) -> Result<TagBody<'_>, ScanError> {
    let mut attributes = Vec::new();
    let mut state = State::BeforeName;
    let mut pending: &str = "";

    for (rel, c) in input[start..].char_indices() {
        let i = start + rel;
        state = match state {
            State::BeforeName => match c {
                c if c.is_whitespace() => State::BeforeName,
                '>' => return Ok(done(attributes, false, i)),
                '/' => State::SelfClosing,
                c if is_reserved(c) => {
                    return Err(ScanError::new(i, format!("Unexpected character '{c}' in tag")));
                }
                _ => State::Name(i),
            },
            State::Name(s) => match c {
                c if c.is_whitespace() => {
                    pending = &input[s..i];
                    State::AfterName
                }
                '=' => {
                    pending = &input[s..i];
                    State::BeforeValue
                }
                '>' => {
                    attributes.push(Attribute::new(&input[s..i], ""));
                    return Ok(done(attributes, false, i));
                }
                '/' => {
                    attributes.push(Attribute::new(&input[s..i], ""));
                    State::SelfClosing
                }
                c if is_reserved(c) => {
                    return Err(ScanError::new(
                        i,
                        format!("Unexpected character '{c}' in attribute name"),
                    ));
                }
                _ => State::Name(s),
            },
            State::AfterName => match c {
                c if c.is_whitespace() => State::AfterName,
                '=' => State::BeforeValue,
                '>' => {
                    attributes.push(Attribute::new(pending, ""));
                    return Ok(done(attributes, false, i));
                }
                '/' => {
                    attributes.push(Attribute::new(pending, ""));
                    State::SelfClosing
                }
                c if is_reserved(c) => {
                    return Err(ScanError::new(i, format!("Unexpected character '{c}' in tag")));
                }
                _ => {
                    attributes.push(Attribute::new(pending, ""));
                    State::Name(i)
                }
            },
            State::BeforeValue => match c {
                c if c.is_whitespace() => State::BeforeValue,
                '"' | '\'' => State::Quoted(c, i + 1),
                '>' => {
                    return Err(ScanError::new(
                        i,
                        format!("Missing value for attribute '{pending}'"),
                    ));
                }
                c if is_reserved(c) => {
                    return Err(ScanError::new(
                        i,
                        format!("Unexpected character '{c}' in attribute value"),
                    ));
                }
                _ => State::Unquoted(i),
            },
            State::Quoted(quote, s) => {
                if c == quote {
                    attributes.push(Attribute::new(pending, &input[s..i]));
                    State::AfterQuoted
                } else {
                    State::Quoted(quote, s)
                }
            }
            State::Unquoted(s) => match c {
                c if c.is_whitespace() => {
                    attributes.push(Attribute::new(pending, &input[s..i]));
                    State::BeforeName
                }
                '>' => {
                    attributes.push(Attribute::new(pending, &input[s..i]));
                    return Ok(done(attributes, false, i));
                }
                c if is_reserved(c) => {
                    return Err(ScanError::new(
                        i,
                        format!("Unexpected character '{c}' in unquoted attribute value"),
                    ));
                }
                _ => State::Unquoted(s),
            },
            State::AfterQuoted => match c {
                c if c.is_whitespace() => State::BeforeName,
                '>' => return Ok(done(attributes, false, i)),
                '/' => State::SelfClosing,
                _ => {
                    return Err(ScanError::new(
                        i,
                        format!("Expected whitespace after attribute value, got '{c}'"),
                    ));
                }
            },
            State::SelfClosing => match c {
                '>' => return Ok(done(attributes, true, i)),
                _ => {
                    return Err(ScanError::new(i, format!("Expected '>' after '/', got '{c}'")));
                }
            },
        };
    }

    match state {
        State::Quoted(_, s) => Err(ScanError::new(
            s.saturating_sub(1),
            format!("Unterminated value for attribute '{pending}'"),
        )),
        _ => Err(ScanError::new(input.len(), "Unexpected end of input inside tag")),
    }
}

fn done(attributes: Vec<Attribute<'_>>, self_closing: bool, gt: usize) -> TagBody<'_> {
    TagBody {
        attributes,
        self_closing,
        end: gt + 1,
    }
}
