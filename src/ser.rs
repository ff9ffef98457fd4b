//! Markup serialization.
//!
//! This module provides the [`Serializer`] that writes a [`Node`] tree as
//! markup text, and [`NodeSerializer`], a `serde` serializer that builds a
//! tree from any `Serialize` type.
//!
//! ## Overview
//!
//! - **Scalars** are written as decimal text; strings are escaped
//! - **Vectors** become one `<item>` element per entry
//! - **Maps** become one element per key, in map order
//! - **Pairs** become one element per entry, with `!TEXT`, `!CDATA`,
//!   `!COMMENT` and `?name` keys written as text, CDATA, comments and
//!   processing instructions
//!
//! Attributes of a child node go on the element that wraps it. Elements are
//! always written with an explicit closing tag.
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_xml_tree::{Node, Serializer, SerializerOptions};
//!
//! let doc = Node::pairs(vec![
//!     ("?xml".to_string(), Node::from(r#"version="1.0""#)),
//!     ("a".to_string(), Node::pairs(vec![]).with_attribute("k", "v")),
//! ]);
//!
//! let mut serializer = Serializer::new(SerializerOptions::new());
//! serializer.serialize(&doc).unwrap();
//! assert_eq!(serializer.into_inner(), r#"<?xml version="1.0"?><a k="v"></a>"#);
//! ```

use crate::error::Context;
use crate::escape::{escape_attribute_text, escape_element_text};
use crate::value::{CDATA_KEY, COMMENT_KEY, PI_PREFIX, TEXT_KEY};
use crate::{Attributes, Error, Node, NodeMap, Number, Result, SerializerOptions, Value};
use serde::{ser, Serialize};

const ITEM_TAG: &str = "item";

/// The markup serializer.
///
/// Created via [`Serializer::new`]; call [`serialize`](Serializer::serialize)
/// one or more times, then take the text with [`into_inner`](Serializer::into_inner).
pub struct Serializer {
    output: String,
    options: SerializerOptions,
}

impl Serializer {
    pub fn new(options: SerializerOptions) -> Self {
        if options.use_beautifier {
            log::debug!("beautifier requested; output is written without indentation");
        }
        if !options.escape_flags.is_standard() {
            log::debug!(
                "escape flags {:#x} requested; standard escaping is applied",
                options.escape_flags.bits()
            );
        }
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the markup for `node` to the output.
    ///
    /// The node's own attributes are not written: there is no enclosing
    /// element to carry them.
    ///
    /// # Errors
    ///
    /// Returns an error for a special entry whose value is not a string, an
    /// unknown `!` key, or a processing instruction with an empty name.
    pub fn serialize(&mut self, node: &Node) -> Result<()> {
        log::trace!("serializing {} node", node.value().type_name());
        self.serialize_value(node).operation("serialize")?;
        log::trace!("serialized {} bytes", self.output.len());
        Ok(())
    }

    fn is_skipped(&self, node: &Node) -> bool {
        !self.options.include_null_elements && (node.is_null() || node.is_undefined())
    }

    fn serialize_value(&mut self, node: &Node) -> Result<()> {
        match node.value() {
            Value::Undefined => {}
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.serialize_number(n)?,
            Value::String(s) => self.serialize_string(s)?,
            Value::Vector(items) => self.serialize_vector(items)?,
            Value::Map(map) => self.serialize_map(map)?,
            Value::Pairs(pairs) => self.serialize_pairs(pairs)?,
        }
        Ok(())
    }

    /// NaN and the infinities have no decimal form and are rejected.
    fn serialize_number(&mut self, n: &Number) -> Result<()> {
        if n.is_float() && !n.as_f64().is_finite() {
            return Err(Error::custom(format!("non-finite number '{}' cannot be written", n))
                .with_operation("serialize_number"));
        }
        self.output.push_str(&n.to_string());
        Ok(())
    }

    fn serialize_string(&mut self, s: &str) -> Result<()> {
        let escaped = escape_element_text(s).operation("serialize_string")?;
        self.output.push_str(&escaped);
        Ok(())
    }

    fn start_node(&mut self, name: &str, attributes: &Attributes) -> Result<()> {
        self.output.push('<');
        self.output.push_str(name);
        for (key, value) in attributes.iter() {
            let escaped =
                escape_attribute_text(value, '"').frame("start_node", || format!("key='{}'", key))?;
            self.output.push(' ');
            self.output.push_str(key);
            self.output.push_str("=\"");
            self.output.push_str(&escaped);
            self.output.push('"');
        }
        self.output.push('>');
        Ok(())
    }

    fn end_node(&mut self, name: &str) {
        self.output.push_str("</");
        self.output.push_str(name);
        self.output.push('>');
    }

    fn serialize_element(&mut self, name: &str, node: &Node) -> Result<()> {
        self.start_node(name, node.attributes())?;
        self.serialize_value(node)?;
        self.end_node(name);
        Ok(())
    }

    fn serialize_vector(&mut self, items: &[Node]) -> Result<()> {
        for (index, item) in items.iter().enumerate() {
            if self.is_skipped(item) {
                continue;
            }
            self.serialize_element(ITEM_TAG, item)
                .frame("serialize_vector", || format!("index={}", index))?;
        }
        Ok(())
    }

    fn serialize_map(&mut self, map: &NodeMap) -> Result<()> {
        for (key, node) in map {
            if self.is_skipped(node) {
                continue;
            }
            self.serialize_element(key, node)
                .frame("serialize_map", || format!("key='{}'", key))?;
        }
        Ok(())
    }

    fn serialize_pairs(&mut self, pairs: &[(String, Node)]) -> Result<()> {
        for (key, node) in pairs {
            if self.is_skipped(node) {
                continue;
            }
            let result = if key.starts_with('!') || key.starts_with(PI_PREFIX) {
                self.serialize_special(key, node)
            } else {
                self.serialize_element(key, node)
            };
            result.frame("serialize_pairs", || format!("key='{}'", key))?;
        }
        Ok(())
    }

    fn serialize_text(&mut self, key: &str, node: &Node) -> Result<()> {
        match node.value() {
            Value::Null | Value::Undefined => Ok(()),
            Value::String(s) => self.serialize_string(s),
            other => Err(Error::type_mismatch(key, "string", other.type_name())
                .with_operation("serialize_text")),
        }
    }

    fn serialize_special(&mut self, key: &str, node: &Node) -> Result<()> {
        match key {
            TEXT_KEY => self.serialize_text(key, node),
            CDATA_KEY => self.serialize_raw(key, node, "<![CDATA[", "]]>"),
            COMMENT_KEY => self.serialize_raw(key, node, "<!--", "-->"),
            _ => match key.strip_prefix(PI_PREFIX) {
                Some(name) => self.serialize_pi(key, name, node),
                None => Err(Error::unknown_node_type(key).with_operation("serialize_special")),
            },
        }
    }

    fn serialize_raw(&mut self, key: &str, node: &Node, open: &str, close: &str) -> Result<()> {
        match node.value() {
            Value::Null => Ok(()),
            Value::String(s) => {
                self.output.push_str(open);
                self.output.push_str(s);
                self.output.push_str(close);
                Ok(())
            }
            other => Err(Error::type_mismatch(key, "string", other.type_name())
                .with_operation("serialize_raw")),
        }
    }

    fn serialize_pi(&mut self, key: &str, name: &str, node: &Node) -> Result<()> {
        if name.is_empty() {
            return Err(Error::syntax(0, 0, "invalid tag name").with_operation("serialize_pi"));
        }
        let body = match node.value() {
            Value::String(s) => s.as_str(),
            other => {
                return Err(Error::type_mismatch(key, "string", other.type_name())
                    .with_operation("serialize_pi"))
            }
        };

        self.output.push_str("<?");
        self.output.push_str(name);
        if !body.is_empty() {
            self.output.push(' ');
            self.output.push_str(body);
        }
        self.output.push_str("?>");
        Ok(())
    }
}

/// A `serde` serializer that produces a [`Node`] instead of text.
///
/// Used by [`to_node`](crate::to_node). Integer and float widths are kept;
/// structs and maps become [`Value::Map`], sequences and tuples
/// [`Value::Vector`], `None` and unit [`Value::Null`]. Enum variants carrying
/// data become a single-entry map keyed by the variant name.
pub struct NodeSerializer;

pub struct SerializeVec {
    vec: Vec<Node>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: NodeMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn wrap_variant(variant: Option<&'static str>, node: Node) -> Node {
    match variant {
        Some(name) => {
            let mut map = NodeMap::with_capacity(1);
            map.insert(name.to_string(), node);
            Node::from(map)
        }
        None => node,
    }
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        let vec = v.iter().map(|&b| Node::from(b)).collect::<Vec<_>>();
        Ok(Node::from(vec))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Ok(wrap_variant(Some(variant), to_node(value)?))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::new(),
            variant,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_node(value)?);
        Ok(())
    }

    fn finish(self) -> Node {
        wrap_variant(self.variant, Node::from(self.vec))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: NodeMap::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Node {
        wrap_variant(self.variant, Node::from(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = to_node(key)?;
        let name = match key.value() {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(Error::custom(format!(
                    "map keys must be strings, found {}",
                    other.type_name()
                )))
            }
        };
        self.current_key = Some(name);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(self.finish())
    }
}

/// Converts any `Serialize` value into a [`Node`] tree.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_xml_tree::{to_node, Number};
///
/// #[derive(Serialize)]
/// struct Point { x: u8, y: f32 }
///
/// let node = to_node(&Point { x: 3, y: 0.5 }).unwrap();
/// assert_eq!(node.get("x").and_then(|n| n.as_number()), Some(&Number::U8(3)));
/// assert_eq!(node.get("y").and_then(|n| n.as_number()), Some(&Number::F32(0.5)));
/// ```
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Node> {
    value.serialize(NodeSerializer)
}
