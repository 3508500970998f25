//! Rule-level stylesheet scanner.
//!
//! Splits stylesheet text into `(head, body, is_block)` tokens:
//!
//! ```css
//! @import url(base.css);        /* head "@import url(base.css)", no block */
//! div > p { color: red; }       /* head "div > p", body "color: red;" */
//! @media print { p { x: y } }   /* body "p { x: y }", nested rules untouched */
//! ```
//!
//! Comments are dropped from heads and bodies. Quoted strings are copied
//! verbatim, so braces, semicolons and comment markers inside them are not
//! interpreted.

use crate::error::StyleSyntaxError;

/// One rule as found by [`scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleToken {
    pub head: String,
    pub body: String,
    pub is_block: bool,
}

/// Scans `input` lazily. Each call starts a fresh scan.
///
/// # Example
///
/// ```
/// use sheet::parser::tokenizer::scan;
///
/// let tokens: Vec<_> = scan("a { b: c } @charset 'x';")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].body, "b: c");
/// assert!(!tokens[1].is_block);
/// ```
pub fn scan(input: &str) -> Tokenizer<'_> {
    Tokenizer { input, pos: 0 }
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip a comment whose `/*` is at the cursor. An unterminated comment
    /// runs to end of input.
    fn skip_comment(&mut self) {
        match self.input[self.pos + 2..].find("*/") {
            Some(i) => self.pos += 2 + i + 2,
            None => self.pos = self.input.len(),
        }
    }

    /// Copy a quoted string starting at the cursor into `out`.
    fn copy_string(&mut self, out: &mut String) {
        let Some(quote) = self.advance() else {
            return;
        };
        out.push(quote);
        while let Some(c) = self.advance() {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = self.advance() {
                    out.push(escaped);
                }
            } else if c == quote {
                return;
            }
        }
    }

    /// Collect a block body after its opening `{`, up to the matching `}`.
    fn consume_block(&mut self, head: &str) -> Result<String, StyleSyntaxError> {
        let mut body = String::new();
        let mut depth = 1usize;

        while let Some(c) = self.peek() {
            match c {
                '/' if self.remaining().starts_with("/*") => self.skip_comment(),
                '"' | '\'' => self.copy_string(&mut body),
                '\\' => {
                    self.advance();
                    body.push(c);
                    if let Some(escaped) = self.advance() {
                        body.push(escaped);
                    }
                }
                '{' => {
                    depth += 1;
                    self.advance();
                    body.push(c);
                }
                '}' => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return Ok(body.trim().to_string());
                    }
                    body.push(c);
                }
                _ => {
                    self.advance();
                    body.push(c);
                }
            }
        }

        Err(StyleSyntaxError::new(format!(
            "unclosed block after '{}'",
            head.trim()
        )))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<RuleToken, StyleSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut head = String::new();

        let result = loop {
            let Some(c) = self.peek() else {
                if head.trim().is_empty() {
                    return None;
                }
                break Err(StyleSyntaxError::new(format!(
                    "expected '{{' or ';' after '{}'",
                    head.trim()
                )));
            };

            match c {
                '/' if self.remaining().starts_with("/*") => self.skip_comment(),
                '"' | '\'' => self.copy_string(&mut head),
                '\\' => {
                    self.advance();
                    head.push(c);
                    if let Some(escaped) = self.advance() {
                        head.push(escaped);
                    }
                }
                '{' => {
                    self.advance();
                    break self.consume_block(&head).map(|body| RuleToken {
                        head: head.trim().to_string(),
                        body,
                        is_block: true,
                    });
                }
                ';' => {
                    self.advance();
                    if head.trim().is_empty() {
                        continue;
                    }
                    break Ok(RuleToken {
                        head: head.trim().to_string(),
                        body: String::new(),
                        is_block: false,
                    });
                }
                '}' => break Err(StyleSyntaxError::new("unexpected '}'")),
                _ => {
                    self.advance();
                    head.push(c);
                }
            }
        };

        if result.is_err() {
            self.pos = self.input.len();
        }
        Some(result)
    }
}
