//! Character escaping and entity decoding.
//!
//! Escaping writes the three markup-reserved characters as predefined entities,
//! the enclosing quote of an attribute as `&quot;`/`&apos;`, and every character
//! outside printable ASCII as a decimal character reference:
//!
//! ```rust
//! use serde_xml_tree::escape::{escape_attribute_text, escape_element_text, unescape_text};
//!
//! assert_eq!(escape_element_text("a < b & \"c\"").unwrap(), "a &lt; b &amp; \"c\"");
//! assert_eq!(escape_attribute_text("it's \"x\"", '"').unwrap(), "it's &quot;x&quot;");
//! assert_eq!(escape_element_text("❤").unwrap(), "&#10084;");
//!
//! assert_eq!(unescape_text("&#10084; &amp; &#x41;"), "❤ & A");
//! ```
//!
//! Unescaping never fails. A reference that is malformed, unterminated or
//! unknown is copied to the output unchanged.

use crate::{Error, Result};
use memchr::memchr;

/// Escapes the character starting at `input[0]` into `out`.
///
/// `input` runs to the end of the text being escaped, so its length bounds the
/// UTF-8 sequence the leading byte announces. Returns the number of input bytes
/// consumed.
///
/// # Errors
///
/// Returns an encoding error if the sequence is truncated or not valid UTF-8.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::escape::escape_char;
///
/// let mut out = String::new();
/// assert_eq!(escape_char(&mut out, b"&rest").unwrap(), 1);
/// assert_eq!(escape_char(&mut out, "é".as_bytes()).unwrap(), 2);
/// assert_eq!(out, "&amp;&#233;");
///
/// // The lead byte promises two bytes but only one remains.
/// assert!(escape_char(&mut out, &"é".as_bytes()[..1]).is_err());
/// ```
pub fn escape_char(out: &mut String, input: &[u8]) -> Result<usize> {
    escape_char_at(out, input, 0)
}

fn escape_char_at(out: &mut String, text: &[u8], pos: usize) -> Result<usize> {
    let input = &text[pos..];
    let Some(&c) = input.first() else {
        return Ok(0);
    };

    match c {
        b'&' => out.push_str("&amp;"),
        b'<' => out.push_str("&lt;"),
        b'>' => out.push_str("&gt;"),
        32..=127 => out.push(c as char),
        _ => {
            let len = utf8_sequence_len(c)
                .ok_or_else(|| Error::encoding(pos, "invalid UTF-8 lead byte"))?;
            if input.len() < len {
                return Err(Error::encoding(pos, "truncated UTF-8 sequence"));
            }
            let ch = std::str::from_utf8(&input[..len])
                .ok()
                .and_then(|s| s.chars().next())
                .ok_or_else(|| Error::encoding(pos, "invalid UTF-8 sequence"))?;
            out.push_str("&#");
            out.push_str(&(ch as u32).to_string());
            out.push(';');
            return Ok(len);
        }
    }

    Ok(1)
}

#[inline]
fn utf8_sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

/// Escapes text for use as element content.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::escape::escape_element_text;
///
/// assert_eq!(escape_element_text("1 > 0").unwrap(), "1 &gt; 0");
/// assert_eq!(escape_element_text("Line1\nLine2").unwrap(), "Line1&#10;Line2");
/// ```
pub fn escape_element_text(text: &str) -> Result<String> {
    escape_element_bytes(text.as_bytes())
}

/// Escapes raw bytes for use as element content.
///
/// Unlike [`escape_element_text`], the input may be arbitrary bytes, so a cut-off
/// UTF-8 sequence at the end is reported rather than impossible.
pub fn escape_element_bytes(bytes: &[u8]) -> Result<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        i += escape_char_at(&mut out, bytes, i)?;
    }
    Ok(out)
}

/// Escapes text for an attribute value enclosed in `quote` (`"` or `'`).
///
/// Only the quote matching `quote` is escaped; the other passes through.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::escape::escape_attribute_text;
///
/// assert_eq!(escape_attribute_text("a\"b'c", '"').unwrap(), "a&quot;b'c");
/// assert_eq!(escape_attribute_text("a\"b'c", '\'').unwrap(), "a\"b&apos;c");
/// ```
pub fn escape_attribute_text(text: &str, quote: char) -> Result<String> {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if quote == '"' => {
                out.push_str("&quot;");
                i += 1;
            }
            b'\'' if quote == '\'' => {
                out.push_str("&apos;");
                i += 1;
            }
            _ => i += escape_char_at(&mut out, bytes, i)?,
        }
    }
    Ok(out)
}

/// Decodes character and predefined entity references.
///
/// # Examples
///
/// ```rust
/// use serde_xml_tree::escape::unescape_text;
///
/// assert_eq!(unescape_text("&amp;&lt;&gt;&quot;&apos;"), "&<>\"'");
/// assert_eq!(unescape_text("&#65;&#x41;"), "AA");
/// assert_eq!(unescape_text("A & B"), "A & B");
/// assert_eq!(unescape_text("&nbsp;"), "&nbsp;");
/// ```
pub fn unescape_text(text: &str) -> String {
    let bytes = text.as_bytes();
    if memchr(b'&', bytes).is_none() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(offset) = memchr(b'&', &bytes[pos..]) {
        let start = pos + offset;
        out.push_str(&text[pos..start]);

        let mut end = start + 1;
        while end < bytes.len() && is_reference_byte(bytes[end]) {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b';' {
            end += 1;
        }

        // The span is ASCII-only, so both ends sit on char boundaries.
        let span = &text[start..end];
        match decode_reference(span) {
            Some(ch) => out.push(ch),
            None => out.push_str(span),
        }
        pos = end;
    }

    out.push_str(&text[pos..]);
    out
}

#[inline]
fn is_reference_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'#'
}

/// Decodes a complete `&...;` span, or `None` if it should pass through.
fn decode_reference(span: &str) -> Option<char> {
    let body = span.strip_prefix('&')?.strip_suffix(';')?;

    if let Some(hex) = body.strip_prefix("#x") {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }

    if let Some(dec) = body.strip_prefix('#') {
        if dec.is_empty() || !dec.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }

    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}
