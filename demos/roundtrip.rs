//! Parse a document, walk the tree, edit it and write it back.
//!
//! Run with: cargo run --example roundtrip

use serde_xml_tree::{from_str, to_string, Node, Value};
use std::error::Error;

const FEED: &str = r#"<?xml version="1.0"?>
<feed lang="en">
  <!-- generated nightly -->
  <title>News &amp; Views</title>
  <entry id="1"><summary><![CDATA[<b>bold</b> claims]]></summary></entry>
  <entry id="2"/>
  <p>Hello <em>world</em>!</p>
</feed>"#;

fn describe(key: &str, node: &Node, depth: usize) {
    let pad = "  ".repeat(depth);
    let attrs: Vec<String> = node
        .attributes()
        .iter()
        .map(|(k, v)| format!("{}={:?}", k, v))
        .collect();

    match node.value() {
        Value::Pairs(entries) => {
            println!("{}{} [{}]", pad, key, attrs.join(" "));
            for (child_key, child) in entries {
                describe(child_key, child, depth + 1);
            }
        }
        Value::String(s) => println!("{}{} [{}] = {:?}", pad, key, attrs.join(" "), s),
        other => println!("{}{} = <{}>", pad, key, other.type_name()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = from_str(FEED)?;

    println!("Parsed tree:");
    if let Some(entries) = doc.as_pairs() {
        for (key, node) in entries {
            describe(key, node, 1);
        }
    }

    // Mark every entry as read.
    if let Some((_, feed)) = doc
        .as_pairs_mut()
        .and_then(|entries| entries.iter_mut().find(|(k, _)| k == "feed"))
    {
        if let Some(children) = feed.as_pairs_mut() {
            for (key, child) in children.iter_mut() {
                if key == "entry" {
                    child.attributes_mut().insert("read", "true");
                }
            }
        }
    }

    println!("\nWritten back:\n{}", to_string(&doc)?);

    match from_str("<feed><title>x</titel></feed>") {
        Ok(_) => println!("\nunexpectedly parsed"),
        Err(e) => println!("\nBroken input reports:\n{}", e.stacktrace()),
    }

    Ok(())
}
