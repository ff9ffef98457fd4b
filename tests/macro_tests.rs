use serde_xml_tree::{node, to_string, Node, NodeMap, Number, Value};

#[test]
fn test_node_macro_null() {
    assert_eq!(node!(null), Node::null());
}

#[test]
fn test_node_macro_booleans() {
    assert_eq!(node!(true), Node::from(true));
    assert_eq!(node!(false), Node::from(false));
}

#[test]
fn test_node_macro_numbers() {
    assert_eq!(node!(42), Node::from(Number::I32(42)));
    assert_eq!(node!(3.5), Node::from(Number::F64(3.5)));
    assert_eq!(node!(-123), Node::from(Number::I32(-123)));
    assert_eq!(node!(7u64), Node::from(Number::U64(7)));
}

#[test]
fn test_node_macro_strings() {
    assert_eq!(node!("hello world"), Node::from("hello world"));
    assert_eq!(node!(""), Node::from(""));
}

#[test]
fn test_node_macro_vectors() {
    assert_eq!(node!([]), Node::from(Vec::<Node>::new()));

    let mixed = node!([1, "hello", true, null]);
    assert_eq!(
        mixed,
        Node::from(vec![
            Node::from(1i32),
            Node::from("hello"),
            Node::from(true),
            Node::null(),
        ])
    );
}

#[test]
fn test_node_macro_nested() {
    let nested = node!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    let map = nested.as_map().unwrap();
    assert_eq!(map.len(), 3);

    let user = map.get("user").and_then(Node::as_map).unwrap();
    assert_eq!(user.get("id"), Some(&Node::from(123i32)));
    assert_eq!(user.get("name").and_then(Node::as_str), Some("Bob"));
    assert_eq!(user.get("active").and_then(Node::as_bool), Some(true));

    match map.get("tags").map(Node::value) {
        Some(Value::Vector(tags)) => {
            assert_eq!(tags.len(), 2);
            assert_eq!(tags[1].as_str(), Some("developer"));
        }
        other => panic!("expected tags vector, found {:?}", other),
    }
}

#[test]
fn test_node_macro_serializes() {
    let tree = node!({
        "server": { "host": "localhost", "port": 8080 },
        "features": ["auth", "logging"],
        "proxy": null
    });
    assert_eq!(
        to_string(&tree).unwrap(),
        "<server><host>localhost</host><port>8080</port></server>\
         <features><item>auth</item><item>logging</item></features><proxy>null</proxy>"
    );
}

#[test]
fn test_node_methods() {
    let null = node!(null);
    assert!(null.is_null());
    assert!(!null.is_bool());
    assert!(!null.is_number());
    assert!(!null.is_string());
    assert!(!null.is_vector());
    assert!(!null.is_map());
    assert!(!null.is_pairs());

    let text = node!("hello");
    assert!(text.is_string());
    assert_eq!(text.as_str(), Some("hello"));

    let items = node!([1, 2, 3]);
    assert!(items.is_vector());
    assert_eq!(items.as_vector().map(Vec::len), Some(3));

    let map = node!({"key": "value"});
    assert!(map.is_map());
    assert_eq!(map.as_map().map(NodeMap::len), Some(1));
}
