//! Configuration options for parsing and serialization.
//!
//! - [`SerializerOptions`]: controls how a tree is written out
//! - [`ParserOptions`]: controls how markup text is read
//! - [`EscapeFlags`]: escaping mode bitmask (only the standard mode is implemented)
//!
//! ## Examples
//!
//! ```rust
//! use serde_xml_tree::{to_string_with_options, Node, SerializerOptions};
//!
//! let tree = Node::from(vec![Node::from("a"), Node::null()]);
//!
//! let options = SerializerOptions::new().with_include_null_elements(false);
//! let xml = to_string_with_options(&tree, options).unwrap();
//! assert_eq!(xml, "<item>a</item>");
//! ```

use std::ops::BitOr;

/// Escaping mode bitmask.
///
/// Only [`EscapeFlags::STANDARD`] is implemented; other bits are carried but have no effect.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::EscapeFlags;
///
/// assert_eq!(EscapeFlags::default(), EscapeFlags::STANDARD);
/// assert_eq!(EscapeFlags::STANDARD.bits(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct EscapeFlags(u32);

impl EscapeFlags {
    /// Escape `&`, `<`, `>`, the enclosing attribute quote, and every non-ASCII character.
    pub const STANDARD: EscapeFlags = EscapeFlags(0);

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        EscapeFlags(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: EscapeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no bit outside the standard mode is set.
    #[must_use]
    pub const fn is_standard(self) -> bool {
        self.0 == EscapeFlags::STANDARD.0
    }
}

impl BitOr for EscapeFlags {
    type Output = EscapeFlags;

    fn bitor(self, rhs: EscapeFlags) -> EscapeFlags {
        EscapeFlags(self.0 | rhs.0)
    }
}

/// Configuration options for serialization.
///
/// The beautifier fields are accepted so configurations can be shared with a
/// pretty-printing post-process, but the serializer itself never indents.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::SerializerOptions;
///
/// let options = SerializerOptions::new();
/// assert!(options.include_null_elements);
/// assert!(!options.use_beautifier);
///
/// let options = SerializerOptions::new()
///     .with_include_null_elements(false)
///     .with_beautifier("    ", "\r\n");
/// assert_eq!(options.beautifier_indent, "    ");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SerializerOptions {
    /// Emit `Null`/`Undefined` container entries. When `false` they are skipped entirely.
    pub include_null_elements: bool,
    pub escape_flags: EscapeFlags,
    pub use_beautifier: bool,
    pub beautifier_indent: String,
    pub beautifier_new_line: String,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        SerializerOptions {
            include_null_elements: true,
            escape_flags: EscapeFlags::STANDARD,
            use_beautifier: false,
            beautifier_indent: "  ".to_string(),
            beautifier_new_line: "\n".to_string(),
        }
    }
}

impl SerializerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether `Null`/`Undefined` entries of vectors, maps and pairs are written.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_xml_tree::SerializerOptions;
    ///
    /// let options = SerializerOptions::new().with_include_null_elements(false);
    /// assert!(!options.include_null_elements);
    /// ```
    #[must_use]
    pub fn with_include_null_elements(mut self, include: bool) -> Self {
        self.include_null_elements = include;
        self
    }

    #[must_use]
    pub fn with_escape_flags(mut self, flags: EscapeFlags) -> Self {
        self.escape_flags = flags;
        self
    }

    /// Enables the beautifier settings with the given indent and line break.
    ///
    /// These are recorded for downstream formatters only.
    #[must_use]
    pub fn with_beautifier(mut self, indent: &str, new_line: &str) -> Self {
        self.use_beautifier = true;
        self.beautifier_indent = indent.to_string();
        self.beautifier_new_line = new_line.to_string();
        self
    }
}

/// Configuration options for parsing.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::{from_str_with_options, ParserOptions};
///
/// let options = ParserOptions::new().with_max_depth(2);
/// assert!(from_str_with_options("<a><b/></a>", options.clone()).is_ok());
/// assert!(from_str_with_options("<a><b><c/></b></a>", options).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest element nesting accepted before the parse fails with a syntax error.
    /// Defaults to 128.
    ///
    /// The parser recurses once per open element. Each level takes a few KiB
    /// of stack, up to about 7 KiB in unoptimized builds, so the default stays
    /// well inside a 2 MiB thread. Parse on a thread
    /// with a larger stack (`std::thread::Builder::stack_size`) before raising
    /// the limit far beyond it.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { max_depth: 128 }
    }
}

impl ParserOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_flags_bit_ops() {
        let custom = EscapeFlags::from_bits(0b10);
        let combined = EscapeFlags::STANDARD | custom;
        assert!(combined.contains(custom));
        assert!(!combined.is_standard());
        assert!(EscapeFlags::default().is_standard());
    }

    #[test]
    fn test_serializer_defaults() {
        let options = SerializerOptions::default();
        assert!(options.include_null_elements);
        assert_eq!(options.escape_flags, EscapeFlags::STANDARD);
        assert_eq!(options.beautifier_indent, "  ");
        assert_eq!(options.beautifier_new_line, "\n");
    }

    #[test]
    fn test_parser_defaults() {
        assert_eq!(ParserOptions::new().max_depth, 128);
        assert_eq!(ParserOptions::new(), ParserOptions::default());
        assert_eq!(ParserOptions::new().with_max_depth(8).max_depth, 8);
    }
}
