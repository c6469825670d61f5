//! Character cursor over formula source text.

use crate::errors::{Error, ParseError, ParseErrorKind};
use crate::timeout::TimeoutManager;

/// A position within the source plus single-character lookahead.
///
/// Every [`advance`](Cursor::advance) checks in with the timeout manager, so
/// no input can keep the parser busy past its deadline.
pub struct Cursor<'src, 't> {
    source: &'src str,
    pos: usize,
    timeout: &'t TimeoutManager,
}

impl<'src, 't> Cursor<'src, 't> {
    pub fn new(source: &'src str, timeout: &'t TimeoutManager) -> Self {
        Self {
            source,
            pos: 0,
            timeout,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Byte offset of the current character.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn timeout(&self) -> &'t TimeoutManager {
        self.timeout
    }

    /// The current character, or `None` at end of input.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// The character `n` positions after the current one.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Move one character forward.
    pub fn advance(&mut self) -> Result<(), Error> {
        self.timeout.check()?;
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
        Ok(())
    }

    pub fn skip_whitespace(&mut self) -> Result<(), Error> {
        while self.current().is_some_and(char::is_whitespace) {
            self.advance()?;
        }
        Ok(())
    }

    /// Skip whitespace and consume `expected` if it is next.
    ///
    /// On a mismatch the position is left where it was.
    pub fn eat(&mut self, expected: char) -> Result<bool, Error> {
        let start = self.pos;
        self.skip_whitespace()?;
        if self.current() == Some(expected) {
            self.advance()?;
            Ok(true)
        } else {
            self.pos = start;
            Ok(false)
        }
    }

    /// Skip whitespace and consume the literal `expected` if it is next.
    pub fn eat_str(&mut self, expected: &str) -> Result<bool, Error> {
        let start = self.pos;
        self.skip_whitespace()?;
        if self.source[self.pos..].starts_with(expected) {
            for _ in expected.chars() {
                self.advance()?;
            }
            Ok(true)
        } else {
            self.pos = start;
            Ok(false)
        }
    }

    /// Peek at the next non-whitespace character without consuming anything.
    pub fn peek_token(&self) -> Option<char> {
        self.source[self.pos..].chars().find(|c| !c.is_whitespace())
    }

    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.source[start..end]
    }

    /// Build a parse error at the current position.
    pub fn error(&self, kind: ParseErrorKind) -> Error {
        self.error_at(kind, self.pos)
    }

    pub fn error_at(&self, kind: ParseErrorKind, position: usize) -> Error {
        ParseError::new(kind, position, self.source).into()
    }

    /// Error describing whatever is at the current position.
    pub fn unexpected(&self) -> Error {
        match self.current() {
            Some(found) => self.error(ParseErrorKind::UnexpectedCharacter { found }),
            None => self.error(ParseErrorKind::UnexpectedEnd),
        }
    }
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

/// Characters that may start an identifier.
pub fn is_letter_or_underscore(c: char) -> bool {
    is_letter(c) || c == '_'
}

pub fn is_identifier_char(c: char) -> bool {
    is_letter_or_underscore(c) || is_digit(c)
}
