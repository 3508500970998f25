//! Markup parsing.
//!
//! - [`Lexer`]: splits markup into tags, text, comments and declarations
//! - [`scan_attributes`]: attribute state machine used by the lexer
//! - [`parse`]: checks element scopes and drives a [`TreeSink`]

pub mod lexer;
pub mod tag;

pub use lexer::{Lexer, StartTag, Token};
pub use tag::{Attribute, TagBody, scan_attributes};

use crate::error::MarkupError;
use crate::options::ParseOptions;
use crate::sink::{Event, TreeSink};
use crate::tags::is_void;

/// Parses markup and feeds balanced events into `sink`.
///
/// # Examples
///
/// ```
/// use markup::{Event, ParseOptions, parse};
///
/// let mut events: Vec<Event> = Vec::new();
/// parse("<p>Hi", &ParseOptions::default(), &mut events).unwrap();
/// assert_eq!(events, vec![Event::start("p"), Event::text("Hi"), Event::End]);
/// ```
pub fn parse<S: TreeSink>(
    input: &str,
    options: &ParseOptions,
    sink: &mut S,
) -> Result<(), MarkupError> {
    let mut parser = Parser {
        input,
        options,
        sink,
        scopes: Vec::new(),
    };
    for token in Lexer::new(input) {
        parser.process_token(token?)?;
    }
    parser.finish()
}

/// Parses markup into an owned event list.
pub fn parse_events(input: &str, options: &ParseOptions) -> Result<Vec<Event>, MarkupError> {
    let mut events = Vec::new();
    parse(input, options, &mut events)?;
    Ok(events)
}

/// An element whose end tag has not been seen yet.
#[derive(Clone, Copy, Debug)]
struct OpenScope<'a> {
    name: &'a str,
    offset: usize,
}

struct Parser<'a, 'o, S> {
    input: &'a str,
    options: &'o ParseOptions,
    sink: &'o mut S,
    scopes: Vec<OpenScope<'a>>,
}

impl<'a, S: TreeSink> Parser<'a, '_, S> {
    fn error(&self, offset: usize, message: impl Into<String>) -> MarkupError {
        MarkupError::at(self.input, offset, message)
    }

    fn process_token(&mut self, token: Token<'a>) -> Result<(), MarkupError> {
        match token {
            Token::Text(text) | Token::Comment(text) | Token::Declaration(text) => {
                self.sink.text(text);
            }
            Token::StartTag(tag) => self.process_start_tag(tag)?,
            Token::EndTag { name, offset } => self.process_end_tag(name, offset)?,
        }
        Ok(())
    }

    fn process_start_tag(&mut self, tag: StartTag<'a>) -> Result<(), MarkupError> {
        let void = is_void(tag.name);
        if tag.self_closing && !void && !self.options.allows_self_closing(tag.name) {
            return Err(self.error(
                tag.offset,
                format!("'{}' is not a void element and can not be self-closed", tag.name),
            ));
        }

        self.sink
            .start_element(tag.name, &tag.attributes, tag.self_closing);
        if void || tag.self_closing {
            self.sink.end_element();
        } else {
            self.scopes.push(OpenScope {
                name: tag.name,
                offset: tag.offset,
            });
        }
        Ok(())
    }

    fn process_end_tag(&mut self, name: &str, offset: usize) -> Result<(), MarkupError> {
        if is_void(name) {
            return Err(self.error(offset, format!("'{name}' can not have an end tag")));
        }

        let Some(top) = self.scopes.last().copied() else {
            return Err(self.error(offset, format!("Unexpected end tag '</{name}>'")));
        };
        if top.name.eq_ignore_ascii_case(name) {
            self.scopes.pop();
            self.sink.end_element();
            return Ok(());
        }

        let found = self
            .scopes
            .iter()
            .rposition(|s| s.name.eq_ignore_ascii_case(name));
        match found {
            Some(index) if self.options.auto_close => {
                let closed = self.scopes.split_off(index);
                for scope in closed.iter().rev() {
                    if !scope.name.eq_ignore_ascii_case(name) {
                        log::debug!("auto-closing <{}> before </{}>", scope.name, name);
                    }
                    self.sink.end_element();
                }
                Ok(())
            }
            _ => Err(self.error(
                offset,
                format!("Expected '</{}>', got '</{}>'", top.name, name),
            )),
        }
    }

    fn finish(mut self) -> Result<(), MarkupError> {
        if let Some(scope) = self.scopes.last().copied() {
            if !self.options.auto_close {
                return Err(self.error(
                    scope.offset,
                    format!("Missing end tag for '<{}>'", scope.name),
                ));
            }
        }
        while let Some(scope) = self.scopes.pop() {
            log::debug!("auto-closing <{}> at end of input", scope.name);
            self.sink.end_element();
        }
        Ok(())
    }
}
