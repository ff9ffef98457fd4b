use serde::Serialize;
use serde_xml_tree::{
    from_str, from_str_with_options, to_node, to_string, to_string_with_options, Node, NodeMap,
    Number, ParserOptions, SerializerOptions, Value,
};

#[derive(Serialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    note: Option<String>,
}

fn sample_order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.5,
                quantity: 1,
            },
        ],
        note: None,
    }
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let xml = to_string(&to_node(&user).unwrap()).unwrap();
    assert_eq!(
        xml,
        "<id>123</id><name>Alice</name><active>true</active>\
         <tags><item>admin</item><item>developer</item></tags>"
    );
}

#[test]
fn test_nested_struct_reads_back() {
    let node = to_node(&sample_order()).unwrap();
    let xml = to_string(&node).unwrap();

    let doc = from_str(&format!("<order>{}</order>", xml)).unwrap();
    let order = doc.get("order").unwrap();
    assert_eq!(order.get("order_id").and_then(Node::as_str), Some("12345"));
    assert_eq!(order.get("note").and_then(Node::as_str), Some("null"));

    let customer = order.get("customer").unwrap();
    assert_eq!(customer.get("name").and_then(Node::as_str), Some("Alice"));

    let items: Vec<_> = order.get("items").unwrap().get_all("item").collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].get("price").and_then(Node::as_str), Some("49.5"));
}

#[test]
fn test_skip_null_fields() {
    let node = to_node(&sample_order()).unwrap();
    let options = SerializerOptions::new().with_include_null_elements(false);
    let xml = to_string_with_options(&node, options).unwrap();
    assert!(!xml.contains("<note>"));
    assert!(to_string(&node).unwrap().ends_with("<note>null</note>"));
}

#[test]
fn test_numeric_widths_survive_to_node() {
    #[derive(Serialize)]
    struct Widths {
        a: i8,
        b: u64,
        c: f32,
    }

    let node = to_node(&Widths {
        a: -1,
        b: u64::MAX,
        c: 0.25,
    })
    .unwrap();
    assert_eq!(node.get("a").and_then(Node::as_number), Some(&Number::I8(-1)));
    assert_eq!(node.get("b").and_then(Node::as_number), Some(&Number::U64(u64::MAX)));
    assert_eq!(to_string(&node).unwrap(), "<a>-1</a><b>18446744073709551615</b><c>0.25</c>");
}

#[test]
fn test_document_with_everything() {
    let xml = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "<!-- generated -->",
        r#"<feed xmlns:media="urn:m" lang='en'>"#,
        "<title>News &amp; Views</title>",
        r#"<entry id="1"><summary><![CDATA[<b>bold</b>]]></summary></entry>"#,
        r#"<entry id="2"/>"#,
        "<p>Hello <em>world</em>!</p>",
        "</feed>",
    );

    let doc = from_str(xml).unwrap();
    let top: Vec<_> = doc.as_pairs().unwrap().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(top, vec!["?xml", "!COMMENT", "feed"]);

    let feed = doc.get("feed").unwrap();
    let attrs: Vec<_> = feed.attributes().iter().collect();
    assert_eq!(attrs, vec![("xmlns:media", "urn:m"), ("lang", "en")]);
    assert_eq!(feed.get("title").and_then(Node::as_str), Some("News & Views"));

    let entries: Vec<_> = feed.get_all("entry").collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].get("summary").and_then(|s| s.get("!CDATA")).and_then(Node::as_str),
        Some("<b>bold</b>")
    );
    assert_eq!(entries[1].value(), &Value::Pairs(vec![]));

    let p = feed.get("p").and_then(Node::as_pairs).unwrap();
    let keys: Vec<_> = p.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["!TEXT", "em", "!TEXT"]);

    let expected = xml
        .replace("lang='en'", r#"lang="en""#)
        .replace(r#"<entry id="2"/>"#, r#"<entry id="2"></entry>"#);
    assert_eq!(to_string(&doc).unwrap(), expected);
}

#[test]
fn test_edit_parsed_tree() {
    let mut doc = from_str("<config><port>80</port></config>").unwrap();

    let config = doc
        .as_pairs_mut()
        .and_then(|entries| entries.iter_mut().find(|(k, _)| k == "config"))
        .map(|(_, node)| node)
        .unwrap();
    config.attributes_mut().insert("version", "2");
    if let Some(entries) = config.as_pairs_mut() {
        entries.push(("host".to_string(), Node::from("localhost")));
    }

    assert_eq!(
        to_string(&doc).unwrap(),
        r#"<config version="2"><port>80</port><host>localhost</host></config>"#
    );
}

#[test]
fn test_map_and_vector_nodes() {
    let mut map = NodeMap::new();
    map.insert(
        "nums".to_string(),
        Node::from(vec![Node::from(1i64), Node::from(2.5f64)]),
    );
    map.insert("flag".to_string(), Node::from(false));
    let xml = to_string(&Node::from(map)).unwrap();
    assert_eq!(xml, "<nums><item>1</item><item>2.5</item></nums><flag>false</flag>");
}

#[test]
fn test_unicode_text_is_escaped_and_restored() {
    let doc = Node::pairs(vec![("msg".to_string(), Node::from("héllo ❤"))]);
    let xml = to_string(&doc).unwrap();
    assert_eq!(xml, "<msg>h&#233;llo &#10084;</msg>");
    assert_eq!(from_str(&xml).unwrap(), doc);
}

#[test]
fn test_error_context_chain() {
    let err = from_str("<root>\n  <list>\n    <item>1</itm>\n  </list>\n</root>").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("line 3"), "{}", text);
    assert!(text.contains("tag='item'"), "{}", text);
    assert!(text.contains("tag='list'"), "{}", text);
    assert!(text.contains("tag='root'"), "{}", text);

    let trace = err.stacktrace();
    let item = trace.find("tag='item'").unwrap();
    let root = trace.find("tag='root'").unwrap();
    assert!(item < root);
}

fn nested(depth: usize) -> String {
    "<a>".repeat(depth) + &"</a>".repeat(depth)
}

#[test]
fn test_depth_limit() {
    assert!(from_str(&nested(128)).is_ok());

    let err = from_str(&nested(129)).unwrap_err();
    assert!(err.is_syntax());
    assert!(err.to_string().contains("depth"));

    let err = from_str(&nested(300)).unwrap_err();
    assert!(err.to_string().contains("maximum nesting depth of 128 exceeded"));
}

#[test]
fn test_raised_depth_limit_on_large_stack() {
    let parsed = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let options = ParserOptions::new().with_max_depth(1000);
            let doc = from_str_with_options(&nested(1000), options)?;
            let mut depth = 0;
            let mut node = &doc;
            while let Some(child) = node.get("a") {
                depth += 1;
                node = child;
            }
            Ok::<_, serde_xml_tree::Error>(depth)
        })
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(parsed.unwrap(), 1000);
}
