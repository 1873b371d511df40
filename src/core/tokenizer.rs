//! XML Tokenizer - State machine for XML token extraction
//!
//! Implements a pull-parser style tokenizer that extracts XML tokens:
//! - Element start/end tags
//! - Text content (entities decoded)
//! - CDATA sections
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (skipped over, never resolved)
//!
//! The tokenizer runs in one of two modes. A *complete* tokenizer owns the
//! whole input and reports truncated markup as an error. A *partial*
//! tokenizer sees a prefix of a stream: when a construct runs past the end of
//! its input it stops without an error and [`Tokenizer::position`] points at
//! the start of the unfinished construct so the caller can resume there.

use super::entities::{decode_text, validate_xml_bytes};
use super::scanner::{is_whitespace, Scanner};
use std::borrow::Cow;

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// Processing instruction: <?target ...?>
    ProcessingInstruction,
    /// XML declaration: <?xml ...?>
    XmlDeclaration,
    /// DOCTYPE declaration
    DocType,
    /// End of file
    Eof,
}

/// A parsed XML token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags and PIs: the name / target
    pub name: Option<Cow<'a, [u8]>>,
    /// For text: decoded content. For CDATA/comments: raw content.
    /// For start/empty tags, PIs and the XML declaration: the raw bytes after the name.
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(Cow::Borrowed(name));
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }

    /// Name as UTF-8, lossy for malformed bytes
    pub fn name_str(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => String::from_utf8_lossy(name),
            None => Cow::Borrowed(""),
        }
    }
}

/// Well-formedness failure reported by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    /// Input exhausted, truncated or rejected
    done: bool,
    /// Input is a prefix of a longer stream
    partial: bool,
    /// Set when a partial tokenizer stopped at an unfinished construct
    incomplete: bool,
    /// Absolute offset of `input[0]`, for error positions
    offset: usize,
    error: Option<ParseError>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over a complete document or fragment
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            done: false,
            partial: false,
            incomplete: false,
            offset: 0,
            error: None,
        }
    }

    /// Create a tokenizer over a stream prefix starting at absolute `offset`
    pub fn partial(input: &'a [u8], offset: usize) -> Self {
        Tokenizer {
            partial: true,
            offset,
            ..Tokenizer::new(input)
        }
    }

    /// Get any parse error
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Take the parse error, leaving none behind
    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    /// True when a partial tokenizer stopped because it needs more input
    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    /// Position just past the last complete token (relative to the input)
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    fn set_error(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            let position = self.offset + self.scanner.position();
            self.error = Some(ParseError::new(message, position));
        }
        self.done = true;
    }

    /// Unfinished construct starting at `start`: rewind in partial mode, fail otherwise
    fn truncated(&mut self, start: usize, message: &str) -> Option<Token<'a>> {
        if self.partial {
            self.scanner.set_position(start);
            self.incomplete = true;
            self.done = true;
        } else {
            self.set_error(message);
        }
        None
    }

    /// Get the next token, or None if at end of input or on error
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }

        if self.scanner.is_eof() {
            self.done = true;
            if self.partial {
                return None;
            }
            let pos = self.scanner.position();
            return Some(Token::new(TokenKind::Eof, (pos, pos)));
        }

        match self.scanner.peek() {
            Some(b'<') => self.parse_markup(),
            _ => self.parse_text(),
        }
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        self.scanner.advance(1); // Skip '<'

        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_pi(start),
            Some(_) => self.parse_start_tag(start),
            None => self.truncated(start, "Unexpected end of input after '<'"),
        }
    }

    /// Parse a start tag or empty element tag
    fn parse_start_tag(&mut self, start: usize) -> Option<Token<'a>> {
        let Some(name) = self.scanner.read_name() else {
            self.set_error("Invalid element name: must start with letter, underscore, or colon");
            return None;
        };
        let name_end = self.scanner.position();

        // Find the end of the tag, handling quoted attributes
        let Some(end) = self.scanner.find_tag_end_quoted() else {
            return self.truncated(start, "Unclosed start tag");
        };

        let is_empty = end > name_end && self.scanner.slice(end - 1, end) == b"/";
        let attr_end = if is_empty { end - 1 } else { end };
        let raw_attributes = self.scanner.slice(name_end, attr_end);

        if let Some(&first) = raw_attributes.first() {
            if !is_whitespace(first) {
                self.set_error("Invalid character in element name");
                return None;
            }
        }

        self.scanner.set_position(end + 1);

        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };
        Some(
            Token::new(kind, (start, end + 1))
                .with_name(name)
                .with_content(Cow::Borrowed(raw_attributes)),
        )
    }

    /// Parse an end tag
    fn parse_end_tag(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '/'

        let Some(name) = self.scanner.read_name() else {
            if self.scanner.is_eof() {
                return self.truncated(start, "Unclosed end tag");
            }
            self.set_error("Invalid element name in end tag: must start with letter, underscore, or colon");
            return None;
        };

        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some(b'>') => {}
            None => return self.truncated(start, "Unclosed end tag"),
            Some(_) => {
                self.set_error("End tag cannot have attributes or other content");
                return None;
            }
        }

        self.scanner.advance(1); // Skip '>'
        Some(Token::new(TokenKind::EndTag, (start, self.scanner.position())).with_name(name))
    }

    /// Parse markup starting with '!' (comment, CDATA, DOCTYPE)
    fn parse_bang_markup(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '!'

        if self.scanner.starts_with(b"--") {
            self.parse_comment(start)
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.parse_cdata(start)
        } else if self.scanner.starts_with(b"DOCTYPE") {
            self.parse_doctype(start)
        } else if self.partial && self.scanner.remaining().len() < b"[CDATA[".len() {
            self.truncated(start, "Invalid declaration - expected comment, CDATA, or DOCTYPE")
        } else {
            self.set_error("Invalid declaration - expected comment, CDATA, or DOCTYPE");
            None
        }
    }

    /// Parse a comment <!--...-->
    fn parse_comment(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(2); // Skip '--'
        let content_start = self.scanner.position();

        let Some(end) = self.scanner.find_sequence(b"-->") else {
            return self.truncated(start, "Unterminated comment");
        };
        let content = self.scanner.slice(content_start, end);

        if memchr::memmem::find(content, b"--").is_some() || content.last() == Some(&b'-') {
            self.set_error("Comment cannot contain '--'");
            return None;
        }

        self.scanner.set_position(end + 3);
        Some(
            Token::new(TokenKind::Comment, (start, self.scanner.position()))
                .with_content(Cow::Borrowed(content)),
        )
    }

    /// Parse a CDATA section <![CDATA[...]]>
    fn parse_cdata(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(7); // Skip '[CDATA['
        let content_start = self.scanner.position();

        let Some(end) = self.scanner.find_sequence(b"]]>") else {
            return self.truncated(start, "Unterminated CDATA section");
        };
        let content = self.scanner.slice(content_start, end);

        if let Err(msg) = validate_xml_bytes(content) {
            self.set_error(msg);
            return None;
        }

        self.scanner.set_position(end + 3);
        Some(
            Token::new(TokenKind::CData, (start, self.scanner.position()))
                .with_content(Cow::Borrowed(content)),
        )
    }

    /// Skip a DOCTYPE declaration, including an internal subset
    fn parse_doctype(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(7); // Skip 'DOCTYPE'

        let mut quote: Option<u8> = None;
        let mut depth = 0usize;
        let remaining = self.scanner.remaining();
        for (i, &b) in remaining.iter().enumerate() {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => {
                    let end = self.scanner.position() + i + 1;
                    self.scanner.set_position(end);
                    return Some(Token::new(TokenKind::DocType, (start, end)));
                }
                _ => {}
            }
        }
        self.truncated(start, "Unterminated DOCTYPE declaration")
    }

    /// Parse a processing instruction or the XML declaration
    fn parse_pi(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '?'

        let Some(name) = self.scanner.read_name() else {
            if self.scanner.is_eof() {
                return self.truncated(start, "Unterminated processing instruction");
            }
            self.set_error("Processing instruction target cannot be empty");
            return None;
        };
        let content_start = self.scanner.position();

        let Some(end) = self.scanner.find_sequence(b"?>") else {
            return self.truncated(start, "Unterminated processing instruction");
        };
        let content = self.scanner.slice(content_start, end);

        let is_xml_decl = name.eq_ignore_ascii_case(b"xml");
        if is_xml_decl && (name != b"xml" || start != 0 || self.offset != 0) {
            self.set_error("XML declaration allowed only at the start of the document");
            return None;
        }

        self.scanner.set_position(end + 2);
        let kind = if is_xml_decl { TokenKind::XmlDeclaration } else { TokenKind::ProcessingInstruction };
        Some(
            Token::new(kind, (start, self.scanner.position()))
                .with_name(name)
                .with_content(Cow::Borrowed(content)),
        )
    }

    /// Parse text content
    fn parse_text(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();

        let end = match self.scanner.find_tag_start() {
            Some(end) => end,
            // Text may continue in the next chunk
            None if self.partial => return self.truncated(start, ""),
            None => start + self.scanner.remaining().len(),
        };

        let content = self.scanner.slice(start, end);

        if let Err(msg) = validate_xml_bytes(content) {
            self.set_error(msg);
            return None;
        }
        if memchr::memmem::find(content, b"]]>").is_some() {
            self.set_error("Text content cannot contain ']]>'");
            return None;
        }

        let decoded = match decode_text(content) {
            Ok(decoded) => decoded,
            Err(msg) => {
                self.set_error(msg);
                return None;
            }
        };

        self.scanner.set_position(end);
        Some(Token::new(TokenKind::Text, (start, end)).with_content(decoded))
    }
}

/// Iterator adapter for tokenizer
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
