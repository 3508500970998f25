//! Lexer for HTML markup.
//!
//! Converts input text into a stream of tokens.

use crate::error::MarkupError;
use crate::tags::{is_name_char, is_raw_text};

use super::tag::{Attribute, scan_attributes};

/// A start tag with its scanned attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
    pub self_closing: bool,
    /// Byte offset of the opening `<`.
    pub offset: usize,
}

/// A token produced by the lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Free text between tags.
    Text(&'a str),
    /// `<name attrs>` or `<name attrs/>`
    StartTag(StartTag<'a>),
    /// `</name>`
    EndTag { name: &'a str, offset: usize },
    /// `<!-- ... -->` including delimiters.
    Comment(&'a str),
    /// `<!DOCTYPE ...>` and other `<!...>` declarations.
    Declaration(&'a str),
}

/// Lexer for markup text.
///
/// # Examples
///
/// ```
/// use markup::parser::Lexer;
///
/// let tokens: Vec<_> = Lexer::new("<b>Hello</b>").collect();
/// assert_eq!(tokens.len(), 3);
/// ```
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a `script`/`style` start tag: scan raw text until `</name`.
    raw_text: Option<&'a str>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text: None,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> MarkupError {
        MarkupError::at(self.input, offset, message)
    }

    /// Whether a `<` at byte `at` opens markup rather than being literal text.
    fn opens_markup(&self, at: usize) -> bool {
        let mut rest = self.input[at..].chars();
        if rest.next() != Some('<') {
            return false;
        }
        match rest.next() {
            Some('/') => rest.next().is_some_and(is_name_char),
            Some('!') => true,
            Some(c) => is_name_char(c),
            None => false,
        }
    }

    fn consume_text(&mut self) -> &'a str {
        let start = self.pos;
        let mut iter = self.remaining().char_indices().skip(1);
        let end = loop {
            match iter.next() {
                Some((i, '<')) if self.opens_markup(start + i) => break start + i,
                Some(_) => continue,
                None => break self.input.len(),
            }
        };
        self.pos = end;
        &self.input[start..end]
    }

    fn consume_raw_text(&mut self, element: &str) -> Option<&'a str> {
        let input = self.input;
        let start = self.pos;
        let needle = format!("</{}", element.to_ascii_lowercase());
        let end = self
            .remaining()
            .to_ascii_lowercase()
            .find(&needle)
            .map_or(input.len(), |i| start + i);
        self.pos = end;
        (end > start).then(|| &input[start..end])
    }

    fn consume_bang(&mut self) -> Result<Token<'a>, MarkupError> {
        let start = self.pos;
        if self.remaining().starts_with("<!--") {
            let Some(i) = self.input[start + 4..].find("-->") else {
                return Err(self.error(start, "Unterminated comment"));
            };
            self.pos = start + 4 + i + 3;
            return Ok(Token::Comment(&self.input[start..self.pos]));
        }
        let Some(i) = self.remaining().find('>') else {
            return Err(self.error(start, "Unterminated declaration"));
        };
        self.pos = start + i + 1;
        Ok(Token::Declaration(&self.input[start..self.pos]))
    }

    fn take_name(&mut self) -> &'a str {
        let start = self.pos;
        let len = self
            .remaining()
            .find(|c: char| !is_name_char(c))
            .unwrap_or(self.remaining().len());
        self.pos += len;
        &self.input[start..self.pos]
    }

    fn consume_end_tag(&mut self) -> Result<Token<'a>, MarkupError> {
        let offset = self.pos;
        self.pos += 2; // "</"
        let name = self.take_name();
        let trimmed = self.remaining().trim_start();
        if !trimmed.starts_with('>') {
            return Err(self.error(offset, format!("Malformed end tag '</{name}'")));
        }
        self.pos = self.input.len() - trimmed.len() + 1;
        Ok(Token::EndTag { name, offset })
    }

    fn consume_start_tag(&mut self) -> Result<Token<'a>, MarkupError> {
        let offset = self.pos;
        self.pos += 1; // "<"
        let name = self.take_name();
        let body = scan_attributes(self.input, self.pos).map_err(|e| {
            if e.offset >= self.input.len() {
                self.error(offset, format!("Unclosed tag '<{name}'"))
            } else {
                self.error(e.offset, e.message)
            }
        })?;
        self.pos = body.end;
        if !body.self_closing && is_raw_text(name) {
            self.raw_text = Some(name);
        }
        Ok(Token::StartTag(StartTag {
            name,
            attributes: body.attributes,
            self_closing: body.self_closing,
            offset,
        }))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(element) = self.raw_text.take() {
            if let Some(text) = self.consume_raw_text(element) {
                return Some(Ok(Token::Text(text)));
            }
        }

        if self.pos >= self.input.len() {
            return None;
        }

        if !self.opens_markup(self.pos) {
            return Some(Ok(Token::Text(self.consume_text())));
        }

        let token = if self.remaining().starts_with("<!") {
            self.consume_bang()
        } else if self.remaining().starts_with("</") {
            self.consume_end_tag()
        } else {
            self.consume_start_tag()
        };
        if token.is_err() {
            // Stop after the first error.
            self.pos = self.input.len();
        }
        Some(token)
    }
}
