/// Builds a [`Node`](crate::Node) tree from a JSON-like literal.
///
/// Arrays become vectors, objects become maps (keys in written order), and any
/// other expression goes through [`to_node`](crate::to_node).
///
/// ```rust
/// use serde_xml_tree::{node, Number};
///
/// let tree = node!({ "id": 7u8, "tags": ["a", "b"], "parent": null });
/// assert_eq!(tree.get("id").and_then(|n| n.as_number()), Some(&Number::U8(7)));
/// assert_eq!(tree.get("tags").and_then(|n| n.as_vector()).map(Vec::len), Some(2));
/// assert!(tree.get("parent").unwrap().is_null());
/// ```
#[macro_export]
macro_rules! node {
    (null) => {
        $crate::Node::null()
    };

    (true) => {
        $crate::Node::from(true)
    };

    (false) => {
        $crate::Node::from(false)
    };

    ([]) => {
        $crate::Node::from(::std::vec::Vec::<$crate::Node>::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Node::from(vec![$($crate::node!($elem)),*])
    };

    ({}) => {
        $crate::Node::from($crate::NodeMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::NodeMap::new();
        $(
            map.insert($key.to_string(), $crate::node!($value));
        )*
        $crate::Node::from(map)
    }};

    ($s:expr) => {{
        $crate::to_node(&$s).unwrap_or($crate::Node::null())
    }};
}
