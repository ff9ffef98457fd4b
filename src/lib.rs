//! # serde_xml_tree
//!
//! A bidirectional codec between markup text and a generic, ordered tree value.
//!
//! ## What does it do?
//!
//! Parsing turns markup into a [`Node`] tree that keeps everything a document
//! can carry: elements with ordered attributes, repeated sibling tags, mixed
//! text, comments, CDATA blocks and processing instructions. Serializing walks
//! any `Node` (including maps and vectors built from Rust types) back into
//! markup text.
//!
//! ## Key Features
//!
//! - **Order Preserving**: siblings and attributes keep document order
//! - **Lossless Structure**: comments, CDATA and processing instructions survive a round trip
//! - **Serde Bridge**: any `#[derive(Serialize)]` type converts to a tree via [`to_node`]
//! - **Context-Rich Errors**: each failure carries the chain of tags and keys it happened under
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_xml_tree = "0.1"
//! ```
//!
//! ### Parsing and Serializing
//!
//! ```rust
//! use serde_xml_tree::{from_str, to_string};
//!
//! let doc = from_str(r#"<book id="1"><title>Dune</title><tag>sf</tag><tag>classic</tag></book>"#).unwrap();
//!
//! let book = doc.get("book").unwrap();
//! assert_eq!(book.attributes().get("id"), Some("1"));
//! assert_eq!(book.get("title").and_then(|t| t.as_str()), Some("Dune"));
//! assert_eq!(book.get_all("tag").count(), 2);
//!
//! assert_eq!(
//!     to_string(&doc).unwrap(),
//!     r#"<book id="1"><title>Dune</title><tag>sf</tag><tag>classic</tag></book>"#
//! );
//! ```
//!
//! ### From Rust Types
//!
//! ```rust
//! use serde::Serialize;
//! use serde_xml_tree::{to_node, to_string};
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     roles: Vec<String>,
//! }
//!
//! let user = User { id: 7, name: "Ann".to_string(), roles: vec!["admin".to_string()] };
//! let text = to_string(&to_node(&user).unwrap()).unwrap();
//! assert_eq!(text, "<id>7</id><name>Ann</name><roles><item>admin</item></roles>");
//! ```
//!
//! ### Building Trees with the node! Macro
//!
//! ```rust
//! use serde_xml_tree::{node, to_string};
//!
//! let tree = node!({
//!     "name": "Alice",
//!     "langs": ["rust", "c"]
//! });
//! assert_eq!(
//!     to_string(&tree).unwrap(),
//!     "<name>Alice</name><langs><item>rust</item><item>c</item></langs>"
//! );
//! ```
//!
//! ## Round-trip notes
//!
//! - A `Null` value is written as the text `null` and reads back as the string `"null"`.
//! - An element holding only text reads back as a string, not as a one-entry `Pairs`.
//! - Numbers and booleans read back as strings; the markup carries no type information.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`roundtrip.rs`** - parse a document, inspect it, write it back
//! - **`build_tree.rs`** - build trees by hand and from Rust types
//!
//! Run one with: `cargo run --example <name>`

pub mod cursor;
pub mod de;
pub mod error;
pub mod escape;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Parser;
pub use error::{Error, ErrorKind, Frame, Result};
pub use map::{Attributes, NodeMap};
pub use options::{EscapeFlags, ParserOptions, SerializerOptions};
pub use ser::{to_node, NodeSerializer, Serializer};
pub use value::{Node, Number, Value, CDATA_KEY, COMMENT_KEY, PI_PREFIX, TEXT_KEY};

use std::io;

/// Serialize a tree to a markup string.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::{to_string, Node};
///
/// let doc = Node::pairs(vec![("a".to_string(), Node::pairs(vec![]).with_attribute("k", "v"))]);
/// assert_eq!(to_string(&doc).unwrap(), r#"<a k="v"></a>"#);
/// ```
///
/// # Errors
///
/// Returns an error for special entries with the wrong value type, unknown
/// special keys, or processing instructions without a name.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(node: &Node) -> Result<String> {
    to_string_with_options(node, SerializerOptions::default())
}

/// Serialize a tree to a markup string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::{to_string_with_options, Node, NodeMap, SerializerOptions};
///
/// let mut map = NodeMap::new();
/// map.insert("a".to_string(), Node::from(1));
/// map.insert("b".to_string(), Node::null());
///
/// let options = SerializerOptions::new().with_include_null_elements(false);
/// assert_eq!(to_string_with_options(&Node::from(map), options).unwrap(), "<a>1</a>");
/// ```
///
/// # Errors
///
/// Returns an error if the tree cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(node: &Node, options: SerializerOptions) -> Result<String> {
    let mut serializer = Serializer::new(options);
    serializer.serialize(node)?;
    Ok(serializer.into_inner())
}

/// Serialize a tree to markup bytes.
///
/// # Errors
///
/// Returns an error if the tree cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(node: &Node) -> Result<Vec<u8>> {
    to_string(node).map(String::into_bytes)
}

/// Serialize a tree as markup into a writer.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, node: &Node) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, node, SerializerOptions::default())
}

/// Serialize a tree as markup into a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, node: &Node, options: SerializerOptions) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(node, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parse markup text into a tree whose root is [`Value::Pairs`].
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::from_str;
///
/// let doc = from_str("<?xml blah?><text>this is text</text>").unwrap();
/// assert_eq!(doc.get("?xml").and_then(|n| n.as_str()), Some("blah"));
/// assert_eq!(doc.get("text").and_then(|n| n.as_str()), Some("this is text"));
/// ```
///
/// # Errors
///
/// Returns a syntax error with line and column information if the input is
/// not well-formed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Node> {
    from_str_with_options(s, ParserOptions::default())
}

/// Parse markup text into a tree with custom options.
///
/// # Errors
///
/// Returns a syntax error if the input is not well-formed or nests deeper
/// than [`ParserOptions::max_depth`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: ParserOptions) -> Result<Node> {
    Parser::new(s, options).parse_document()
}

/// Parse markup from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::from_reader;
/// use std::io::Cursor;
///
/// let doc = from_reader(Cursor::new(b"<a>1</a>")).unwrap();
/// assert_eq!(doc.get("a").and_then(|n| n.as_str()), Some("1"));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not UTF-8, or the markup is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Node>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Parse markup from bytes.
///
/// # Errors
///
/// Returns an encoding error if the bytes are not valid UTF-8, or a syntax
/// error if the markup is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Node> {
    let s = std::str::from_utf8(v)
        .map_err(|e| Error::encoding(e.valid_up_to(), &e.to_string()))?;
    from_str(s)
}
