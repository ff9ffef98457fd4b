//! Build trees by hand, with the node! macro, and from Rust types.
//!
//! Run with: cargo run --example build_tree

use serde::Serialize;
use serde_xml_tree::{node, to_node, to_string, to_string_with_options, Node, SerializerOptions};
use std::error::Error;

#[derive(Serialize)]
enum Role {
    Admin,
    Guest { until: String },
}

#[derive(Serialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<Role>,
    manager: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Pairs keep order and allow repeated keys.
    let doc = Node::pairs(vec![
        ("?xml".to_string(), Node::from(r#"version="1.0""#)),
        (
            "note".to_string(),
            Node::pairs(vec![
                ("to".to_string(), Node::from("Tove")),
                ("to".to_string(), Node::from("Jani")),
                ("!COMMENT".to_string(), Node::from(" draft ")),
                ("body".to_string(), Node::from("Don't forget <me>!")),
            ])
            .with_attribute("priority", "high"),
        ),
    ]);
    println!("By hand:\n{}\n", to_string(&doc)?);

    let config = node!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging"],
        "debug": true
    });
    println!("From node!:\n{}\n", to_string(&config)?);

    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec![
            Role::Admin,
            Role::Guest {
                until: "2030-01-01".to_string(),
            },
        ],
        manager: None,
    };
    let tree = to_node(&user)?;
    println!("From a struct:\n{}\n", to_string(&tree)?);

    let compact = SerializerOptions::new().with_include_null_elements(false);
    println!(
        "Without null fields:\n{}",
        to_string_with_options(&tree, compact)?
    );

    Ok(())
}
