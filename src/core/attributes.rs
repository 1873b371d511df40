//! XML Attribute Parsing
//!
//! Parses XML attributes from tag content. Names are kept verbatim; LENEX is
//! namespace-unaware, so `name.en` or `xmlns:x` are just names.

use super::entities::{decode_text, validate_xml_bytes};
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    /// Attribute name
    pub name: Cow<'a, [u8]>,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute {
            name: Cow::Borrowed(name),
            value,
        }
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'.
/// Fails on the first well-formedness problem.
pub fn parse_attributes(input: &[u8]) -> Result<Vec<Attribute<'_>>, &'static str> {
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut pos = 0;

    loop {
        let before_ws = pos;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() {
            break;
        }

        // Attributes must be separated from the name and from each other
        if pos == before_ws && pos > 0 {
            return Err("Whitespace required between attributes");
        }

        let name_start = pos;
        if !is_name_start_char(input[pos]) {
            return Err("Attribute name must start with letter, underscore, or colon");
        }
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] != b'=' {
            return Err("Attribute value required");
        }
        pos += 1; // Skip '='

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        let quote = match input.get(pos) {
            Some(&q) if q == b'"' || q == b'\'' => q,
            _ => return Err("Attribute value must be quoted"),
        };
        pos += 1; // Skip opening quote

        let value_start = pos;
        let value_len = memchr::memchr(quote, &input[value_start..])
            .ok_or("Attribute value has mismatched quotes")?;
        let raw = &input[value_start..value_start + value_len];
        pos = value_start + value_len + 1;

        if memchr::memchr(b'<', raw).is_some() {
            return Err("Attribute value cannot contain '<'");
        }
        validate_xml_bytes(raw)?;
        let value = decode_text(raw)?;

        if attrs.iter().any(|a| a.name.as_ref() == name) {
            return Err("Duplicate attribute");
        }
        attrs.push(Attribute::new(name, value));
    }

    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_attributes() {
        let attrs = parse_attributes(b" id=\"test\" class=\"foo\"").unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("test"));
        assert_eq!(attrs[1].name_str(), Some("class"));
        assert_eq!(attrs[1].value_str(), Some("foo"));
    }

    #[test]
    fn test_single_quoted() {
        let attrs = parse_attributes(b" id='te\"st'").unwrap();
        assert_eq!(attrs[0].value_str(), Some("te\"st"));
    }

    #[test]
    fn test_dotted_name() {
        let attrs = parse_attributes(b" name.en=\"Spring Cup\" result.url=\"http://x\"").unwrap();
        assert_eq!(attrs[0].name_str(), Some("name.en"));
        assert_eq!(attrs[1].value_str(), Some("http://x"));
    }

    #[test]
    fn test_entity_in_value() {
        let attrs = parse_attributes(b" title=\"&lt;hello&gt;\"").unwrap();
        assert_eq!(attrs[0].value_str(), Some("<hello>"));
    }

    #[test]
    fn test_empty_attributes() {
        assert!(parse_attributes(b"").unwrap().is_empty());
        assert!(parse_attributes(b"   ").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_handling() {
        let attrs = parse_attributes(b"  id  =  \"test\"  ").unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value_str(), Some("test"));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_attributes(b" id=test"), Err("Attribute value must be quoted"));
        assert_eq!(parse_attributes(b" id=\"a\" id=\"b\""), Err("Duplicate attribute"));
        assert_eq!(parse_attributes(b" id=\"a"), Err("Attribute value has mismatched quotes"));
        assert_eq!(parse_attributes(b" a=\"1\"b=\"2\""), Err("Whitespace required between attributes"));
        assert_eq!(parse_attributes(b" checked"), Err("Attribute value required"));
    }
}
