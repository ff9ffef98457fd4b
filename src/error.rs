//! Error types for markup parsing and serialization.
//!
//! Every failure is reported as an [`Error`]: an [`ErrorKind`] describing what
//! went wrong at the point of failure, plus a stack of [`Frame`]s added by each
//! enclosing parse or serialize step on the way out. Frames are ordered
//! deepest-first, so the first frame names the innermost operation.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: malformed names, attributes or quotes, unterminated
//!   constructs, mismatched closing tags, nesting deeper than the configured limit
//! - **Type Mismatches**: a `!CDATA`, `!COMMENT` or `?name` entry whose value is not a string
//! - **Unknown Node Types**: an unrecognized special key such as `!FOO`
//! - **Encoding Errors**: a UTF-8 sequence cut short by the end of the input
//! - **I/O Errors**: reader or writer failures in the `*_reader` / `*_writer` entry points
//!
//! ## Examples
//!
//! ```rust
//! use serde_xml_tree::{from_str, ErrorKind};
//!
//! let err = from_str("<a></b>").unwrap_err();
//! assert!(matches!(err.kind(), ErrorKind::Syntax { .. }));
//! assert!(err.frames().iter().any(|f| f.to_string().contains("'a'")));
//! ```

use std::fmt;
use thiserror::Error;

/// What went wrong at the point of failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// Malformed markup
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A special entry whose value has the wrong type
    #[error("Type mismatch for '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    /// Unrecognized special node
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Truncated or invalid UTF-8 sequence
    #[error("Encoding error at byte {offset}: {message}")]
    Encoding { offset: usize, message: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

/// One step of context added while an error propagates outward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    operation: &'static str,
    detail: Option<String>,
}

impl Frame {
    pub fn new(operation: &'static str, detail: Option<String>) -> Self {
        Frame { operation, detail }
    }

    /// Name of the parse or serialize step that added this frame.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// The tag, key or index the step was working on, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "[{}]: {}", self.operation, detail),
            None => write!(f, "[{}]", self.operation),
        }
    }
}

/// An error kind together with its accumulated context frames.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::Error;
///
/// let err = Error::syntax(1, 4, "'=' is missing")
///     .with_frame("parse_attributes", "key='k'");
/// assert!(err.is_syntax());
/// assert_eq!(err.frames().len(), 1);
/// assert!(err.to_string().contains("key='k'"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}{}", render_frames(.frames))]
pub struct Error {
    kind: ErrorKind,
    frames: Vec<Frame>,
}

fn render_frames(frames: &[Frame]) -> String {
    let mut out = String::new();
    for frame in frames {
        out.push_str("\n  at ");
        out.push_str(&frame.to_string());
    }
    out
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            frames: Vec::new(),
        }
    }

    /// Creates a syntax error at the given line and column.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_xml_tree::Error;
    ///
    /// let err = Error::syntax(10, 5, "'<' expected");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, column: usize, message: &str) -> Self {
        Error::new(ErrorKind::Syntax {
            line,
            column,
            message: message.to_string(),
        })
    }

    /// Creates a type mismatch error for a special entry.
    pub fn type_mismatch(key: &str, expected: &str, found: &str) -> Self {
        Error::new(ErrorKind::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }

    pub fn unknown_node_type(msg: &str) -> Self {
        Error::new(ErrorKind::UnknownNodeType(msg.to_string()))
    }

    /// Creates an encoding error at a byte offset of the text being escaped.
    pub fn encoding(offset: usize, message: &str) -> Self {
        Error::new(ErrorKind::Encoding {
            offset,
            message: message.to_string(),
        })
    }

    pub fn io(msg: &str) -> Self {
        Error::new(ErrorKind::Io(msg.to_string()))
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_xml_tree::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::new(ErrorKind::Custom(msg.to_string()))
    }

    /// Appends a context frame naming `operation` and what it was working on.
    #[must_use]
    pub fn with_frame(mut self, operation: &'static str, detail: impl Into<String>) -> Self {
        self.frames.push(Frame::new(operation, Some(detail.into())));
        self
    }

    /// Appends a context frame with no detail.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.frames.push(Frame::new(operation, None));
        self
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Context frames, deepest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The kind followed by every frame, one per line.
    #[must_use]
    pub fn stacktrace(&self) -> String {
        let mut out = self.kind.to_string();
        for frame in &self.frames {
            out.push('\n');
            out.push_str(&frame.to_string());
        }
        out
    }

    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, ErrorKind::Syntax { .. })
    }

    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }

    #[must_use]
    pub fn is_unknown_node_type(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownNodeType(_))
    }

    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self.kind, ErrorKind::Encoding { .. })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::new(ErrorKind::Custom(msg.to_string()))
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::new(ErrorKind::Custom(msg.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Frame-appending shorthand for `Result`s inside the parser and serializer.
pub(crate) trait Context<T> {
    fn frame<F>(self, operation: &'static str, detail: F) -> Result<T>
    where
        F: FnOnce() -> String;

    fn operation(self, operation: &'static str) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[inline]
    fn frame<F>(self, operation: &'static str, detail: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_frame(operation, detail()))
    }

    #[inline]
    fn operation(self, operation: &'static str) -> Result<T> {
        self.map_err(|e| e.with_operation(operation))
    }
}
