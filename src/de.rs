//! Markup parsing.
//!
//! [`Parser`] is a recursive-descent reader that turns markup text into a
//! [`Node`] tree. The document root is always a [`Value::Pairs`] holding every
//! top-level construct in order: elements, comments, CDATA blocks and
//! processing instructions.
//!
//! ## Tree shape
//!
//! - An element becomes an entry keyed by its tag name. Its attributes land on
//!   the entry's node, its content becomes a `Pairs` value.
//! - Character data becomes a `!TEXT` entry; whitespace-only runs between
//!   child constructs are dropped.
//! - An element whose only content is text collapses to a plain string value.
//! - `<!--c-->`, `<![CDATA[d]]>` and `<?name body?>` become `!COMMENT`, `!CDATA`
//!   and `?name` entries holding their raw text.
//!
//! ```rust
//! use serde_xml_tree::{from_str, Value};
//!
//! let doc = from_str(r#"<?xml version="1.0"?><user id="7"><name>Alice</name><!-- x --></user>"#).unwrap();
//!
//! let entries = doc.as_pairs().unwrap();
//! assert_eq!(entries[0].0, "?xml");
//! assert_eq!(entries[0].1.as_str(), Some(r#"version="1.0""#));
//!
//! let user = doc.get("user").unwrap();
//! assert_eq!(user.attributes().get("id"), Some("7"));
//! assert_eq!(user.get("name").and_then(|n| n.as_str()), Some("Alice"));
//! assert_eq!(user.get("!COMMENT").and_then(|n| n.as_str()), Some(" x "));
//! ```
//!
//! ## Errors
//!
//! The first problem ends the parse. Each enclosing step adds a
//! [`Frame`](crate::Frame) naming itself and the tag or attribute it was on.

use crate::cursor::{is_blank, Cursor, Label};
use crate::error::Context;
use crate::escape::unescape_text;
use crate::value::{CDATA_KEY, COMMENT_KEY, PI_PREFIX, TEXT_KEY};
use crate::{Attributes, Error, Node, ParserOptions, Result, Value};

const ELEMENT_NAME_TERMINATORS: &[u8] = b"/> \t\n\r\x0c";
const ATTRIBUTE_NAME_TERMINATORS: &[u8] = b"= \t\n\r\x0c";
const PI_NAME_TERMINATORS: &[u8] = b"? \t\n\r\x0c";

/// Returns `true` for bytes allowed anywhere in an element or attribute name.
#[inline]
pub fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b':' | b'.' | b'_' | b'-') || c > 127
}

/// The markup parser.
///
/// Created via [`Parser::from_str`] or [`Parser::new`]; each instance
/// parses one input buffer.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    options: ParserOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Parser::new(input, ParserOptions::default())
    }

    pub fn new(input: &'a str, options: ParserOptions) -> Self {
        Parser {
            cursor: Cursor::new(input.as_bytes()),
            options,
            depth: 0,
        }
    }

    /// Parses every top-level construct until the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for malformed markup or nesting deeper than
    /// [`ParserOptions::max_depth`].
    pub fn parse_document(&mut self) -> Result<Node> {
        log::trace!("parsing document of {} bytes", self.cursor.data().len());

        let mut entries = Vec::new();
        loop {
            self.cursor.skip_blank_chars();
            if self.cursor.is_at_end() {
                break;
            }
            let index = entries.len();
            self.parse_node(&mut entries)
                .frame("deserialize", || format!("index={}", index))?;
        }

        log::trace!("parsed {} top-level nodes", entries.len());
        Ok(Node::pairs(entries))
    }

    fn syntax_error(&self, msg: &str) -> Error {
        let (line, column) = self.cursor.line_col();
        Error::syntax(line, column, msg)
    }

    /// Reads a name made of name bytes, ending just before one of `terminators`.
    #[inline(never)]
    fn scan_name(&mut self, terminators: &[u8], what: &str) -> Result<String> {
        let data = self.cursor.remaining();
        for (i, &c) in data.iter().enumerate() {
            if i > 0 && terminators.contains(&c) {
                let name = String::from_utf8_lossy(&data[..i]).into_owned();
                self.cursor.advance(i);
                return Ok(name);
            }
            if !is_name_byte(c) {
                let partial = String::from_utf8_lossy(&data[..=i]);
                return Err(self.syntax_error(&format!("invalid {} name '{}'", what, partial)));
            }
        }
        Err(self.syntax_error(&format!("invalid {} name", what)))
    }

    fn parse_element_name(&mut self) -> Result<String> {
        self.scan_name(ELEMENT_NAME_TERMINATORS, "element")
            .operation("parse_element_name")
    }

    fn parse_attribute_name(&mut self) -> Result<String> {
        self.scan_name(ATTRIBUTE_NAME_TERMINATORS, "attribute")
            .operation("parse_attribute_name")
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.peek() {
            Some(q @ (b'\'' | b'"')) => q,
            _ => {
                return Err(self
                    .syntax_error("\"'\" or '\"' is missing")
                    .with_operation("parse_attribute_value"))
            }
        };
        self.cursor.advance(1);

        let label = self.cursor.put_label();
        if !self.cursor.find_char(quote) {
            return Err(self
                .syntax_error("unterminated attribute value")
                .with_operation("parse_attribute_value"));
        }
        let raw = self.cursor.label_str(label);
        self.cursor.advance(1);

        Ok(unescape_text(&raw))
    }

    #[inline(never)]
    fn parse_attributes(&mut self, attributes: &mut Attributes) -> Result<()> {
        loop {
            self.cursor.skip_blank_chars();
            if self.cursor.is_at_end() || self.cursor.is_at_char(b'/') || self.cursor.is_at_char(b'>')
            {
                return Ok(());
            }

            let key = self.parse_attribute_name().operation("parse_attributes")?;

            self.cursor.skip_blank_chars();
            if !self.cursor.consume_char(b'=') {
                return Err(self
                    .syntax_error(&format!("'=' is missing for '{}'", key))
                    .with_frame("parse_attributes", format!("key='{}'", key)));
            }

            self.cursor.skip_blank_chars();
            let value = self
                .parse_attribute_value()
                .frame("parse_attributes", || format!("key='{}'", key))?;

            attributes.insert(key, value);
        }
    }

    /// Parses one construct and appends it to `entries`.
    fn parse_node(&mut self, entries: &mut Vec<(String, Node)>) -> Result<()> {
        let entry = if self.cursor.is_at(b"<?") {
            self.parse_pi_node()
        } else if self.cursor.is_at(b"<!--") {
            self.parse_comment_node()
        } else if self.cursor.is_at(b"<![CDATA[") {
            self.parse_cdata_node()
        } else if self.cursor.is_at_char(b'<') {
            return self.parse_element_node(entries).operation("parse_node");
        } else {
            Err(self.syntax_error("'<' expected"))
        };
        entries.push(entry.operation("parse_node")?);
        Ok(())
    }

    #[inline(never)]
    fn parse_pi_node(&mut self) -> Result<(String, Node)> {
        self.cursor.advance(2);
        let name = self
            .scan_name(PI_NAME_TERMINATORS, "processing instruction")
            .operation("parse_pi_node")?;
        let tag = format!("{}{}", PI_PREFIX, name);

        self.cursor.skip_blank_chars();
        let label = self.cursor.put_label();
        if !self.cursor.find_literal(b"?>") {
            return Err(self
                .syntax_error("unterminated processing instruction, '?>' expected")
                .with_frame("parse_pi_node", format!("tag='{}'", tag)));
        }
        let body = self.cursor.label_str(label);
        self.cursor.advance(2);

        Ok((tag, Node::from(body)))
    }

    #[inline(never)]
    fn parse_comment_node(&mut self) -> Result<(String, Node)> {
        self.cursor.advance(4);
        let label = self.cursor.put_label();
        if !self.cursor.find_literal(b"-->") {
            return Err(self
                .syntax_error("unterminated comment, '-->' expected")
                .with_operation("parse_comment_node"));
        }
        let text = self.cursor.label_str(label);
        self.cursor.advance(3);

        Ok((COMMENT_KEY.to_string(), Node::from(text)))
    }

    #[inline(never)]
    fn parse_cdata_node(&mut self) -> Result<(String, Node)> {
        self.cursor.advance(9);
        let label = self.cursor.put_label();
        if !self.cursor.find_literal(b"]]>") {
            return Err(self
                .syntax_error("unterminated CDATA section, ']]>' expected")
                .with_operation("parse_cdata_node"));
        }
        let text = self.cursor.label_str(label);
        self.cursor.advance(3);

        Ok((CDATA_KEY.to_string(), Node::from(text)))
    }

    // Out of line: the recursive frames must not carry formatting temporaries.
    #[cold]
    #[inline(never)]
    fn depth_error(&self) -> Error {
        self.syntax_error(&format!(
            "maximum nesting depth of {} exceeded",
            self.options.max_depth
        ))
        .with_operation("parse_element_node")
    }

    #[cold]
    #[inline(never)]
    fn element_error<F>(&self, operation: &'static str, name: &str, message: F) -> Error
    where
        F: FnOnce() -> String,
    {
        self.syntax_error(&message())
            .with_frame(operation, format!("tag='{}'", name))
    }

    /// Parses one element and appends it to `entries`.
    ///
    /// `depth` counts the open ancestors: it is raised only while the
    /// element's content is being read.
    fn parse_element_node(&mut self, entries: &mut Vec<(String, Node)>) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(self.depth_error());
        }

        self.cursor.advance(1);
        let name = self.parse_element_name().operation("parse_element_node")?;

        let mut node = Node::pairs(Vec::new());
        self.parse_attributes(node.attributes_mut())
            .frame("parse_element_node", || format!("tag='{}'", name))?;

        if !self.cursor.consume(b"/>") {
            if !self.cursor.consume_char(b'>') {
                return Err(self.element_error("parse_element_node", &name, || {
                    format!("'>' or '/>' expected for '<{}'", name)
                }));
            }

            self.depth += 1;
            let value = self.parse_element_content(&name);
            self.depth -= 1;
            node.set_value(value.frame("parse_element_node", || format!("tag='{}'", name))?);
        }

        entries.push((name, node));
        Ok(())
    }

    /// Parses content up to and including the matching `</name>`.
    fn parse_element_content(&mut self, name: &str) -> Result<Value> {
        let mut entries: Vec<(String, Node)> = Vec::new();

        loop {
            let text_label = self.cursor.put_label();
            if !self.cursor.find_char(b'<') {
                self.cursor.set_position(self.cursor.data().len());
                return Err(self.element_error("parse_element_content", name, || {
                    format!("unterminated element, '</{}>' expected", name)
                }));
            }

            let has_text = self
                .cursor
                .label_bytes(text_label)
                .iter()
                .any(|&b| !is_blank(b));
            if has_text {
                self.push_text(&mut entries, text_label);
            }

            if self.cursor.is_at(b"</") {
                if self.consume_closing_tag(name) {
                    break;
                }
                return Err(self.element_error("parse_element_content", name, || {
                    format!("'</{}>' expected", name)
                }));
            }

            self.parse_node(&mut entries)
                .frame("parse_element_content", || format!("tag='{}'", name))?;
        }

        if entries.len() == 1 && entries[0].0 == TEXT_KEY {
            if let Some((_, text)) = entries.pop() {
                return Ok(text.into_value());
            }
        }
        Ok(Value::Pairs(entries))
    }

    #[inline(never)]
    fn push_text(&self, entries: &mut Vec<(String, Node)>, label: Label) {
        let text = unescape_text(&self.cursor.label_str(label));
        entries.push((TEXT_KEY.to_string(), Node::from(text)));
    }

    fn consume_closing_tag(&mut self, name: &str) -> bool {
        let start = self.cursor.position();
        if self.cursor.consume(b"</") && self.cursor.consume(name.as_bytes()) {
            self.cursor.skip_blank_chars();
            if self.cursor.consume_char(b'>') {
                return true;
            }
        }
        self.cursor.set_position(start);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn parse(input: &str) -> Result<Node> {
        Parser::from_str(input).parse_document()
    }

    fn root<'a>(doc: &'a Node, tag: &str) -> &'a Node {
        doc.get(tag).expect("missing top-level element")
    }

    #[test]
    fn test_attributes_in_order() {
        let doc = parse(r#"<a attr1='v1' attr2="v2"/>"#).unwrap();
        let attrs: Vec<_> = root(&doc, "a").attributes().iter().collect();
        assert_eq!(attrs, vec![("attr1", "v1"), ("attr2", "v2")]);
    }

    #[test]
    fn test_attribute_blanks_around_equals() {
        let doc = parse("<a k \t= \n'v' >x</a>").unwrap();
        assert_eq!(root(&doc, "a").attributes().get("k"), Some("v"));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let doc = parse(r#"<a k="&lt;&#65;&quot;" q='say "hi"'/>"#).unwrap();
        let a = root(&doc, "a");
        assert_eq!(a.attributes().get("k"), Some("<A\""));
        assert_eq!(a.attributes().get("q"), Some("say \"hi\""));
    }

    #[test]
    fn test_text_only_element_collapses() {
        let doc = parse("<text>this is text</text>").unwrap();
        assert_eq!(root(&doc, "text").value(), &Value::String("this is text".to_string()));
    }

    #[test]
    fn test_text_is_unescaped_and_keeps_whitespace() {
        let doc = parse("<t> a &amp; b </t>").unwrap();
        assert_eq!(root(&doc, "t").as_str(), Some(" a & b "));
    }

    #[test]
    fn test_empty_elements() {
        let doc = parse(r#"<a k="v"/><b></b><c>  </c>"#).unwrap();
        for tag in ["a", "b", "c"] {
            assert_eq!(root(&doc, tag).value(), &Value::Pairs(vec![]), "tag {}", tag);
        }
        assert_eq!(root(&doc, "a").attributes().get("k"), Some("v"));
    }

    #[test]
    fn test_mixed_content_order() {
        let doc = parse("<p>one<b>two</b> three <i/></p>").unwrap();
        let entries = root(&doc, "p").as_pairs().unwrap();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["!TEXT", "b", "!TEXT", "i"]);
        assert_eq!(entries[0].1.as_str(), Some("one"));
        assert_eq!(entries[1].1.as_str(), Some("two"));
        assert_eq!(entries[2].1.as_str(), Some(" three "));
    }

    #[test]
    fn test_whitespace_between_children_dropped() {
        let doc = parse("<list>\n  <item>1</item>\n  <item>2</item>\n</list>").unwrap();
        let entries = root(&doc, "list").as_pairs().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|(k, _)| k == "item"));
    }

    #[test]
    fn test_multiple_top_level_nodes() {
        let doc = parse("<?xml blah?>\n<!-- c -->\n<root/>\n<![CDATA[<raw>]]>").unwrap();
        let entries = doc.as_pairs().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], ("?xml".to_string(), Node::from("blah")));
        assert_eq!(entries[1], ("!COMMENT".to_string(), Node::from(" c ")));
        assert_eq!(entries[2].0, "root");
        assert_eq!(entries[3], ("!CDATA".to_string(), Node::from("<raw>")));
    }

    #[test]
    fn test_pi_without_body() {
        let doc = parse("<?xml?>").unwrap();
        assert_eq!(doc.get("?xml").and_then(Node::as_str), Some(""));
    }

    #[test]
    fn test_cdata_inside_element_is_not_collapsed() {
        let doc = parse("<a><![CDATA[1 < 2]]></a>").unwrap();
        let entries = root(&doc, "a").as_pairs().unwrap();
        assert_eq!(entries, &[("!CDATA".to_string(), Node::from("1 < 2"))]);
    }

    #[test]
    fn test_closing_tag_with_trailing_blanks() {
        let doc = parse("<a>x</a  \n>").unwrap();
        assert_eq!(root(&doc, "a").as_str(), Some("x"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse("").unwrap(), Node::pairs(vec![]));
        assert_eq!(parse(" \n\t").unwrap(), Node::pairs(vec![]));
    }

    #[test]
    fn test_non_ascii_names() {
        let doc = parse("<имя>значение</имя>").unwrap();
        assert_eq!(root(&doc, "имя").as_str(), Some("значение"));
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse("<a></b>").unwrap_err();
        assert!(err.is_syntax());
        assert!(err
            .frames()
            .iter()
            .any(|f| f.detail() == Some("tag='a'")));
    }

    #[test]
    fn test_closing_tag_prefix_is_not_a_match() {
        assert!(parse("<a>x</ab>").unwrap_err().is_syntax());
    }

    #[test]
    fn test_missing_equals() {
        let err = parse("<a key 'v'/>").unwrap_err();
        match err.kind() {
            ErrorKind::Syntax { message, .. } => assert!(message.contains("'key'")),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_missing_or_unterminated_quote() {
        let err = parse("<a k=v/>").unwrap_err();
        assert!(err.frames().iter().any(|f| f.detail() == Some("key='k'")));
        assert!(parse("<a k=\"v/>").unwrap_err().is_syntax());
    }

    #[test]
    fn test_invalid_names() {
        let err = parse("<a b$='1'/>").unwrap_err();
        match err.kind() {
            ErrorKind::Syntax { message, .. } => assert!(message.contains("'b$'")),
            other => panic!("unexpected kind {:?}", other),
        }
        assert!(parse("< a/>").is_err());
        assert!(parse("<>").is_err());
        assert!(parse("<abc").is_err());
        assert!(parse("<!DOCTYPE html>").is_err());
    }

    #[test]
    fn test_unterminated_constructs() {
        for input in ["<?xml", "<!-- c", "<![CDATA[x", "<a>text", "<a><b></b>", "<a"] {
            assert!(parse(input).unwrap_err().is_syntax(), "input {:?}", input);
        }
    }

    #[test]
    fn test_text_outside_element() {
        let err = parse("hello").unwrap_err();
        match err.kind() {
            ErrorKind::Syntax { message, line, column } => {
                assert_eq!(message, "'<' expected");
                assert_eq!((*line, *column), (1, 1));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_frames_are_deepest_first() {
        let err = parse("<a><b x='1' y></b></a>").unwrap_err();
        let ops: Vec<_> = err.frames().iter().map(|f| f.operation()).collect();
        assert_eq!(&ops[..2], &["parse_attribute_name", "parse_attributes"]);
        assert_eq!(ops.last(), Some(&"deserialize"));
        assert_eq!(err.frames()[2].detail(), Some("tag='b'"));
        let content = ops.iter().position(|op| *op == "parse_element_content").unwrap();
        assert_eq!(err.frames()[content].detail(), Some("tag='a'"));
    }

    #[test]
    fn test_max_depth() {
        let deep = "<a>".repeat(10) + &"</a>".repeat(10);
        let options = ParserOptions::new().with_max_depth(9);
        assert!(Parser::new(&deep, options).parse_document().is_err());

        let options = ParserOptions::new().with_max_depth(10);
        assert!(Parser::new(&deep, options).parse_document().is_ok());
    }

    #[test]
    fn test_depth_counts_open_ancestors() {
        let options = ParserOptions::new().with_max_depth(2);
        let siblings = "<a><b/><b>x</b><b/></a><c><d/></c>";
        assert!(Parser::new(siblings, options.clone()).parse_document().is_ok());

        let err = Parser::new("<a><b/></a><a><b><c/></b></a>", options)
            .parse_document()
            .unwrap_err();
        assert!(err.to_string().contains("maximum nesting depth of 2 exceeded"));
        assert_eq!(err.frames()[0].operation(), "parse_element_node");
    }
}
