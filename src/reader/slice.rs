//! Zero-Copy Slice Reader
//!
//! Parses XML from a byte slice with zero-copy semantics.
//! Input references are maintained directly in the output.
//!
//! The same reader serves both parsing paths: over a whole fragment
//! ([`SliceReader::new`]) and over the decoded prefix of a stream
//! ([`SliceReader::partial`]), so there is one well-formedness checker.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::{parse_attributes, Attribute};
use crate::core::tokenizer::{ParseError, Token, TokenKind, Tokenizer};
use std::borrow::Cow;

/// Zero-copy XML reader from a byte slice
pub struct SliceReader<'a> {
    tokenizer: Tokenizer<'a>,
    offset: usize,
    error: Option<ParseError>,
}

impl<'a> SliceReader<'a> {
    /// Reader over a complete document or fragment
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            tokenizer: Tokenizer::new(input),
            offset: 0,
            error: None,
        }
    }

    /// Reader over a stream prefix that starts at absolute `offset`
    pub fn partial(input: &'a [u8], offset: usize) -> Self {
        SliceReader {
            tokenizer: Tokenizer::partial(input, offset),
            offset,
            error: None,
        }
    }

    /// Get parse error, from the tokenizer or from attribute parsing
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref().or_else(|| self.tokenizer.error())
    }

    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take().or_else(|| self.tokenizer.take_error())
    }

    /// Bytes of the input consumed by complete events
    pub fn consumed(&self) -> usize {
        self.tokenizer.position()
    }

    /// Absolute stream position after the last complete event
    pub fn position(&self) -> usize {
        self.offset + self.tokenizer.position()
    }

    /// Get the next XML event
    pub fn next_event(&mut self) -> Option<XmlEvent<'a>> {
        if self.error.is_some() {
            return None;
        }

        let token = self.tokenizer.next_token()?;

        match token.kind {
            TokenKind::Eof => Some(XmlEvent::EndDocument),

            TokenKind::StartTag => {
                let attrs = self.parse_tag_attributes(&token)?;
                let name = token.name?;
                Some(XmlEvent::StartElement(StartElement::from_cow(name, attrs)))
            }

            TokenKind::EmptyTag => {
                let attrs = self.parse_tag_attributes(&token)?;
                let name = token.name?;
                Some(XmlEvent::EmptyElement(StartElement::from_cow(name, attrs)))
            }

            TokenKind::EndTag => {
                let name = token.name?;
                Some(XmlEvent::EndElement(EndElement::from_cow(name)))
            }

            TokenKind::Text => Some(XmlEvent::Text(token.content?)),

            TokenKind::CData => Some(XmlEvent::CData(token.content?)),

            TokenKind::Comment => Some(XmlEvent::Comment(token.content?)),

            TokenKind::ProcessingInstruction => Some(XmlEvent::ProcessingInstruction {
                target: token.name?,
                data: token.content.unwrap_or(Cow::Borrowed(b"")),
            }),

            TokenKind::XmlDeclaration => Some(XmlEvent::XmlDeclaration),

            TokenKind::DocType => Some(XmlEvent::DocType),
        }
    }

    /// Parse attributes from a tag token; records the error and stops on failure
    fn parse_tag_attributes(&mut self, token: &Token<'a>) -> Option<Vec<Attribute<'a>>> {
        let raw: &'a [u8] = match &token.content {
            Some(Cow::Borrowed(raw)) => *raw,
            _ => return Some(Vec::new()),
        };

        match parse_attributes(raw) {
            Ok(attrs) => Some(attrs),
            Err(msg) => {
                let name = token.name_str();
                self.error = Some(ParseError::new(
                    format!("{} in <{}>", msg, name),
                    self.offset + token.span.0,
                ));
                None
            }
        }
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = XmlEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.next_event()?;
        if matches!(event, XmlEvent::EndDocument) {
            None
        } else {
            Some(event)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let events: Vec<_> = SliceReader::new(b"<root>hello</root>").collect();
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], XmlEvent::StartElement(e) if e.name_str() == Some("root")));
        assert!(matches!(&events[1], XmlEvent::Text(t) if t.as_ref() == b"hello"));
        assert!(matches!(&events[2], XmlEvent::EndElement(e) if e.name_str() == Some("root")));
    }

    #[test]
    fn test_empty_element() {
        let events: Vec<_> = SliceReader::new(b"<br/>").collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], XmlEvent::EmptyElement(e) if e.name_str() == Some("br")));
    }

    #[test]
    fn test_attributes() {
        let events: Vec<_> = SliceReader::new(b"<MEET name=\"Spring &amp; Summer\" city=\"Bern\"/>").collect();
        assert_eq!(events.len(), 1);

        if let XmlEvent::EmptyElement(e) = &events[0] {
            assert_eq!(e.get_attribute_value("name"), Some("Spring & Summer"));
            assert_eq!(e.get_attribute_value("city"), Some("Bern"));
        } else {
            panic!("Expected EmptyElement");
        }
    }

    #[test]
    fn test_attribute_error_is_reported() {
        let mut reader = SliceReader::new(b"<A x=1/>");
        assert!(reader.next_event().is_none());
        let err = reader.error().unwrap();
        assert_eq!(err.message, "Attribute value must be quoted in <A>");
    }

    #[test]
    fn test_cdata() {
        let events: Vec<_> = SliceReader::new(b"<script><![CDATA[alert('hi')]]></script>").collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[1], XmlEvent::CData(c) if c.as_ref() == b"alert('hi')"));
    }

    #[test]
    fn test_partial_stops_before_unfinished_tag() {
        let input = b"<A><B/><C name=\"x";
        let mut reader = SliceReader::partial(input, 10);
        let events: Vec<_> = reader.by_ref().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(reader.consumed(), 7);
        assert_eq!(reader.position(), 17);
        assert!(reader.error().is_none());
    }
}
