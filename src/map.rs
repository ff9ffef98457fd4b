//! Ordered collections used by the tree.
//!
//! - [`NodeMap`]: unique string keys to [`Node`]s, in insertion order
//! - [`Attributes`]: a node's ordered `(name, value)` attribute list
//!
//! Both wrap [`IndexMap`] so iteration order is insertion order, which keeps
//! serialized output deterministic.
//!
//! ## Examples
//!
//! ```rust
//! use serde_xml_tree::{NodeMap, Node};
//!
//! let mut map = NodeMap::new();
//! map.insert("name".to_string(), Node::from("Alice"));
//! map.insert("age".to_string(), Node::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::Node;
use indexmap::IndexMap;

/// An ordered map of unique string keys to nodes.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::{NodeMap, Node};
///
/// let mut map = NodeMap::new();
/// map.insert("first".to_string(), Node::from(1));
/// map.insert("second".to_string(), Node::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMap(IndexMap<String, Node>);

impl NodeMap {
    #[must_use]
    pub fn new() -> Self {
        NodeMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        NodeMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and the
    /// key keeps its original position.
    pub fn insert(&mut self, key: String, value: Node) -> Option<Node> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.0.get_mut(key)
    }

    /// Removes a key, shifting later entries down to keep the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Node> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Node> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.0.iter()
    }
}

impl IntoIterator for NodeMap {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeMap {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Node)> for NodeMap {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        NodeMap(IndexMap::from_iter(iter))
    }
}

/// A node's attribute list: `(name, value)` string pairs in document order.
///
/// Names are unique. Setting an existing name replaces its value in place.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::Attributes;
///
/// let mut attrs = Attributes::new();
/// attrs.insert("lang", "en");
/// attrs.insert("charset", "utf-8");
/// attrs.insert("lang", "de");
///
/// let pairs: Vec<_> = attrs.iter().collect();
/// assert_eq!(pairs, vec![("lang", "de"), ("charset", "utf-8")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Attributes(IndexMap::new())
    }

    /// Sets an attribute, returning the previous value for that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Attributes(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
