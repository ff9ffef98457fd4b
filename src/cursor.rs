//! A positioned view over an immutable input buffer.
//!
//! The parser never indexes the input directly; it peeks, matches literals,
//! searches forward and captures labelled spans through [`Cursor`].
//!
//! ```rust
//! use serde_xml_tree::cursor::Cursor;
//!
//! let mut cursor = Cursor::new(b"<!-- note -->rest");
//! assert!(cursor.is_at(b"<!--"));
//! cursor.advance(4);
//!
//! let label = cursor.put_label();
//! assert!(cursor.find_literal(b"-->"));
//! assert_eq!(cursor.label_str(label), " note ");
//! ```

use memchr::{memchr, memmem};

/// Bytes treated as blank between tokens.
#[inline]
pub fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// A marker for a later span capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label {
    start: usize,
}

impl Label {
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }
}

#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Cursor { data, position: 0 }
    }

    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves to an absolute offset, clamped to the end of the buffer.
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.data.len());
    }

    /// The unread part of the buffer.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.get(self.position + offset).copied()
    }

    #[must_use]
    pub fn is_at_char(&self, c: u8) -> bool {
        self.peek() == Some(c)
    }

    /// Case-sensitive match of `literal` at the current position.
    #[must_use]
    pub fn is_at(&self, literal: &[u8]) -> bool {
        self.remaining().starts_with(literal)
    }

    #[must_use]
    pub fn is_at_ignore_case(&self, literal: &[u8]) -> bool {
        let rest = self.remaining();
        rest.len() >= literal.len() && rest[..literal.len()].eq_ignore_ascii_case(literal)
    }

    /// Advances past `c` if it is the next byte.
    pub fn consume_char(&mut self, c: u8) -> bool {
        if self.is_at_char(c) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Advances past `literal` if it is next.
    pub fn consume(&mut self, literal: &[u8]) -> bool {
        if self.is_at(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }

    /// Advances by `n` bytes, stopping at the end of the buffer.
    pub fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.data.len());
    }

    /// Moves to the next occurrence of `c`. Leaves the position unchanged if there is none.
    pub fn find_char(&mut self, c: u8) -> bool {
        match memchr(c, self.remaining()) {
            Some(offset) => {
                self.position += offset;
                true
            }
            None => false,
        }
    }

    /// Moves to the start of the next occurrence of `literal`.
    /// Leaves the position unchanged if there is none.
    pub fn find_literal(&mut self, literal: &[u8]) -> bool {
        match memmem::find(self.remaining(), literal) {
            Some(offset) => {
                self.position += offset;
                true
            }
            None => false,
        }
    }

    pub fn skip_blank_chars(&mut self) {
        while let Some(b) = self.peek() {
            if !is_blank(b) {
                break;
            }
            self.position += 1;
        }
    }

    #[must_use]
    pub fn put_label(&self) -> Label {
        Label {
            start: self.position,
        }
    }

    /// Bytes from `label` up to the current position.
    #[must_use]
    pub fn label_bytes(&self, label: Label) -> &'a [u8] {
        let start = label.start.min(self.position);
        &self.data[start..self.position]
    }

    /// The labelled span as text, replacing invalid UTF-8 if the input had any.
    #[must_use]
    pub fn label_str(&self, label: Label) -> String {
        String::from_utf8_lossy(self.label_bytes(label)).into_owned()
    }

    /// One-based line and column of the current position.
    #[must_use]
    pub fn line_col(&self) -> (usize, usize) {
        let consumed = &self.data[..self.position];
        let line = memchr::memchr_iter(b'\n', consumed).count() + 1;
        let line_start = memchr::memrchr(b'\n', consumed).map_or(0, |i| i + 1);
        let column = String::from_utf8_lossy(&consumed[line_start..])
            .chars()
            .count()
            + 1;
        (line, column)
    }
}
