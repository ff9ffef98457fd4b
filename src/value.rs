//! The generic tree value.
//!
//! A [`Node`] is a [`Value`] plus an ordered [`Attributes`] list. Parsing
//! produces a `Node` whose value is [`Value::Pairs`]; serialization accepts any
//! `Node`.
//!
//! ## Core Types
//!
//! - [`Node`]: a value together with its attributes
//! - [`Value`]: the tagged union (null, bool, number, string, vector, map, pairs, undefined)
//! - [`Number`]: every scalar numeric width, plus generic integer and float
//!
//! ## Special keys
//!
//! Inside `Pairs`, a handful of keys mark non-element content:
//!
//! | key | content |
//! |-----|---------|
//! | [`TEXT_KEY`] (`!TEXT`) | character data |
//! | [`CDATA_KEY`] (`!CDATA`) | a CDATA block |
//! | [`COMMENT_KEY`] (`!COMMENT`) | a comment |
//! | `?name` ([`PI_PREFIX`]) | a processing instruction named `name` |
//!
//! ## Usage Patterns
//!
//! ```rust
//! use serde_xml_tree::{Node, Value};
//!
//! let name = Node::from("Oat").with_attribute("lang", "en");
//! let doc = Node::pairs(vec![("name".to_string(), name)]);
//!
//! let entry = doc.get("name").unwrap();
//! assert_eq!(entry.as_str(), Some("Oat"));
//! assert_eq!(entry.attributes().get("lang"), Some("en"));
//! ```

use crate::{Attributes, NodeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Key of a character-data entry.
pub const TEXT_KEY: &str = "!TEXT";
/// Key of a CDATA entry.
pub const CDATA_KEY: &str = "!CDATA";
/// Key of a comment entry.
pub const COMMENT_KEY: &str = "!COMMENT";
/// Prefix of a processing-instruction key (`?xml`, `?php`, ...).
pub const PI_PREFIX: char = '?';

/// A numeric scalar.
///
/// The fixed-width variants come from typed sources (Rust integers through
/// [`to_node`](crate::to_node)); `Integer` and `Float` are the generic forms
/// used when the width is unknown, such as values read from JSON.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::Number;
///
/// assert_eq!(Number::U8(7).as_i64(), Some(7));
/// assert_eq!(Number::U64(u64::MAX).as_i64(), None);
/// assert_eq!(Number::F32(1.5).as_f64(), 1.5);
/// assert_eq!(Number::Integer(-3).to_string(), "-3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Integer(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        !self.is_float()
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_) | Number::Float(_))
    }

    /// Converts to `i64` if the value is an integer that fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::I8(v) => Some(v as i64),
            Number::I16(v) => Some(v as i64),
            Number::I32(v) => Some(v as i64),
            Number::I64(v) | Number::Integer(v) => Some(v),
            Number::U8(v) => Some(v as i64),
            Number::U16(v) => Some(v as i64),
            Number::U32(v) => Some(v as i64),
            Number::U64(v) => i64::try_from(v).ok(),
            Number::F32(_) | Number::F64(_) | Number::Float(_) => None,
        }
    }

    /// Converts to `u64` if the value is a non-negative integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::U64(v) => Some(v),
            _ => self.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Converts to `f64`. Always succeeds; wide integers may lose precision.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::F32(v) => v as f64,
            Number::F64(v) | Number::Float(v) => v,
            Number::U64(v) => v as f64,
            _ => self.as_i64().map(|v| v as f64).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I8(v) => write!(f, "{}", v),
            Number::I16(v) => write!(f, "{}", v),
            Number::I32(v) => write!(f, "{}", v),
            Number::I64(v) | Number::Integer(v) => write!(f, "{}", v),
            Number::U8(v) => write!(f, "{}", v),
            Number::U16(v) => write!(f, "{}", v),
            Number::U32(v) => write!(f, "{}", v),
            Number::U64(v) => write!(f, "{}", v),
            Number::F32(v) => write!(f, "{}", v),
            Number::F64(v) | Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// The tagged value carried by a [`Node`].
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered list, written as repeated `<item>` elements.
    Vector(Vec<Node>),
    /// Unique keys, written as one element per key.
    Map(NodeMap),
    /// Ordered entries with repeatable keys; the shape produced by parsing.
    Pairs(Vec<(String, Node)>),
    /// Marks an absent value; the serializer skips it entirely.
    #[default]
    Undefined,
}

impl Value {
    /// A short lowercase name of the active variant, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.is_float() => "float",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Pairs(_) => "pairs",
            Value::Undefined => "undefined",
        }
    }
}

/// A tree node: a [`Value`] and its ordered attribute list.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::{Node, Value};
///
/// let null = Node::null();
/// let num = Node::from(42);
/// let text = Node::from("hello");
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert!(matches!(Node::default().value(), Value::Undefined));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Node {
    value: Value,
    attributes: Attributes,
}

impl Node {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Node {
            value,
            attributes: Attributes::new(),
        }
    }

    #[must_use]
    pub fn null() -> Self {
        Node::new(Value::Null)
    }

    #[must_use]
    pub fn undefined() -> Self {
        Node::new(Value::Undefined)
    }

    /// A node holding ordered, possibly repeated, named entries.
    #[must_use]
    pub fn pairs(entries: Vec<(String, Node)>) -> Self {
        Node::new(Value::Pairs(entries))
    }

    /// Adds an attribute and returns the node, for building trees inline.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Splits the node into its value and attributes.
    #[must_use]
    pub fn into_parts(self) -> (Value, Attributes) {
        (self.value, self.attributes)
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self.value, Value::Undefined)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self.value, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self.value, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self.value, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_vector(&self) -> bool {
        matches!(self.value, Value::Vector(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.value, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_pairs(&self) -> bool {
        matches!(self.value, Value::Pairs(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_xml_tree::Node;
    ///
    /// assert_eq!(Node::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Node::from(42).as_str(), None);
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match &self.value {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    #[must_use]
    pub fn as_vector(&self) -> Option<&Vec<Node>> {
        match &self.value {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&NodeMap> {
        match &self.value {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_pairs(&self) -> Option<&[(String, Node)]> {
        match &self.value {
            Value::Pairs(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_pairs_mut(&mut self) -> Option<&mut Vec<(String, Node)>> {
        match &mut self.value {
            Value::Pairs(p) => Some(p),
            _ => None,
        }
    }

    /// Looks up a child by key: the map entry, or the first pairs entry with that key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_xml_tree::from_str;
    ///
    /// let doc = from_str("<root><a>1</a><a>2</a></root>").unwrap();
    /// let root = doc.get("root").unwrap();
    /// assert_eq!(root.get("a").and_then(|n| n.as_str()), Some("1"));
    /// assert_eq!(root.get_all("a").count(), 2);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        match &self.value {
            Value::Map(m) => m.get(key),
            Value::Pairs(p) => p.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Every pairs entry (or the single map entry) with the given key, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        let pairs: &'a [(String, Node)] = self.as_pairs().unwrap_or(&[]);
        let mapped = self.as_map().and_then(|m| m.get(key));
        pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
            .chain(mapped)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::new(value)
    }
}

impl From<Number> for Node {
    fn from(value: Number) -> Self {
        Node::new(Value::Number(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::new(Value::Bool(value))
    }
}

macro_rules! impl_from_number {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::$variant(value)
                }
            }

            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::new(Value::Number(Number::$variant(value)))
                }
            }
        )*
    };
}

impl_from_number! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::new(Value::String(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::new(Value::String(value.to_string()))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::new(Value::Vector(value))
    }
}

impl From<NodeMap> for Node {
    fn from(value: NodeMap) -> Self {
        Node::new(Value::Map(value))
    }
}

impl TryFrom<Node> for i64 {
    type Error = crate::Error;

    fn try_from(node: Node) -> crate::Result<Self> {
        node.as_i64().ok_or_else(|| {
            crate::Error::custom(format!(
                "expected integer, found {}",
                node.value().type_name()
            ))
        })
    }
}

impl TryFrom<Node> for f64 {
    type Error = crate::Error;

    fn try_from(node: Node) -> crate::Result<Self> {
        node.as_f64().ok_or_else(|| {
            crate::Error::custom(format!(
                "expected number, found {}",
                node.value().type_name()
            ))
        })
    }
}

impl TryFrom<Node> for bool {
    type Error = crate::Error;

    fn try_from(node: Node) -> crate::Result<Self> {
        node.as_bool().ok_or_else(|| {
            crate::Error::custom(format!("expected bool, found {}", node.value().type_name()))
        })
    }
}

impl TryFrom<Node> for String {
    type Error = crate::Error;

    fn try_from(node: Node) -> crate::Result<Self> {
        match node.into_value() {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.type_name()
            ))),
        }
    }
}

// Attributes have no place in serde's data model; only the value is visited.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match &self.value {
            Value::Null | Value::Undefined => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match *n {
                Number::I8(v) => serializer.serialize_i8(v),
                Number::I16(v) => serializer.serialize_i16(v),
                Number::I32(v) => serializer.serialize_i32(v),
                Number::I64(v) | Number::Integer(v) => serializer.serialize_i64(v),
                Number::U8(v) => serializer.serialize_u8(v),
                Number::U16(v) => serializer.serialize_u16(v),
                Number::U32(v) => serializer.serialize_u32(v),
                Number::U64(v) => serializer.serialize_u64(v),
                Number::F32(v) => serializer.serialize_f32(v),
                Number::F64(v) | Number::Float(v) => serializer.serialize_f64(v),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Vector(vec) => {
                let mut seq = serializer.serialize_seq(Some(vec.len()))?;
                for element in vec {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Pairs(pairs) => {
                let mut out = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any tree value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Node, E> {
                Ok(Node::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Node, E> {
                Ok(Node::from(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Node, E> {
                match i64::try_from(value) {
                    Ok(v) => Ok(Node::from(Number::Integer(v))),
                    Err(_) => Ok(Node::from(Number::U64(value))),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Node, E> {
                Ok(Node::from(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Node, E> {
                Ok(Node::from(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Node, E> {
                Ok(Node::from(value))
            }

            fn visit_unit<E>(self) -> Result<Node, E> {
                Ok(Node::null())
            }

            fn visit_none<E>(self) -> Result<Node, E> {
                Ok(Node::null())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Node::from(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = NodeMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Node::from(values))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_i64() {
        assert_eq!(i64::try_from(Node::from(42u16)).unwrap(), 42);
        assert_eq!(i64::try_from(Node::from(Number::Integer(-7))).unwrap(), -7);
        assert!(i64::try_from(Node::from("test")).is_err());
        assert!(i64::try_from(Node::from(u64::MAX)).is_err());
    }

    #[test]
    fn test_tryfrom_f64() {
        assert_eq!(f64::try_from(Node::from(3.5f64)).unwrap(), 3.5);
        assert_eq!(f64::try_from(Node::from(42i32)).unwrap(), 42.0);
        assert!(f64::try_from(Node::null()).is_err());
    }

    #[test]
    fn test_tryfrom_bool_and_string() {
        assert!(bool::try_from(Node::from(true)).unwrap());
        assert!(bool::try_from(Node::from(1i32)).is_err());
        assert_eq!(String::try_from(Node::from("hello")).unwrap(), "hello");
        assert!(String::try_from(Node::from(42i32)).is_err());
    }

    #[test]
    fn test_from_primitives_keep_width() {
        assert_eq!(Node::from(1i8).into_value(), Value::Number(Number::I8(1)));
        assert_eq!(Node::from(1u32).into_value(), Value::Number(Number::U32(1)));
        assert_eq!(Node::from(1.5f32).into_value(), Value::Number(Number::F32(1.5)));
        assert_eq!(Node::from("x").into_value(), Value::String("x".to_string()));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Node::from(1i32).value().type_name(), "integer");
        assert_eq!(Node::from(1.0f64).value().type_name(), "float");
        assert_eq!(Node::pairs(vec![]).value().type_name(), "pairs");
        assert_eq!(Node::default().value().type_name(), "undefined");
    }

    #[test]
    fn test_get_on_map_and_pairs() {
        let mut map = NodeMap::new();
        map.insert("k".to_string(), Node::from(1i32));
        let node = Node::from(map);
        assert_eq!(node.get("k").and_then(Node::as_i64), Some(1));
        assert_eq!(node.get_all("k").count(), 1);

        let pairs = Node::pairs(vec![
            ("k".to_string(), Node::from("a")),
            ("j".to_string(), Node::from("b")),
            ("k".to_string(), Node::from("c")),
        ]);
        let all: Vec<_> = pairs.get_all("k").filter_map(Node::as_str).collect();
        assert_eq!(all, vec!["a", "c"]);
        assert!(pairs.get("missing").is_none());
    }

    #[test]
    fn test_deserialize_from_json() {
        let node: Node = serde_json::from_str(r#"{"a": [1, 2.5, "x", null, true]}"#).unwrap();
        let items = node.get("a").and_then(Node::as_vector).unwrap();
        assert_eq!(items[0].as_number(), Some(&Number::Integer(1)));
        assert_eq!(items[1].as_number(), Some(&Number::Float(2.5)));
        assert_eq!(items[2].as_str(), Some("x"));
        assert!(items[3].is_null());
        assert_eq!(items[4].as_bool(), Some(true));
    }

    #[test]
    fn test_serialize_pairs_as_json_map() {
        let node = Node::pairs(vec![
            ("a".to_string(), Node::from(1i64)),
            ("b".to_string(), Node::from("two")),
        ]);
        assert_eq!(serde_json::to_string(&node).unwrap(), r#"{"a":1,"b":"two"}"#);
    }
}
