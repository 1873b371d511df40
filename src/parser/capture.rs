//! Streaming capture parser
//!
//! Processes decoded input in chunks with bounded memory. Only the subtrees
//! that become top-level entities (`CONSTRUCTOR`, `MEET`, `RECORDLIST`,
//! `TIMESTANDARDLIST`) are buffered, one at a time, re-serialized from the
//! event stream. When a capture closes it is re-parsed as a standalone
//! fragment and handed to the entity builder.

use crate::core::entities::{encode_attribute, encode_text};
use crate::core::tokenizer::ParseError;
use crate::diagnostics::DiagnosticSink;
use crate::document::Document;
use crate::dom::Element;
use crate::error::{Error, Result, SchemaError};
use crate::model::{Constructor, Meet, RecordList, TimeStandardList};
use crate::reader::{EndElement, SliceReader, StartElement, StructureCheck, XmlEvent};
use crate::schema::{Entity, Scope};
use crate::serializer::ROOT_ELEMENT;
use memchr::memrchr;
use std::borrow::Cow;
use tracing::{debug, trace};

/// Top-level entities captured from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Captured {
    Constructor,
    Meet,
    RecordList,
    TimeStandardList,
}

impl Captured {
    const ALL: [Captured; 4] = [
        Captured::Constructor,
        Captured::Meet,
        Captured::RecordList,
        Captured::TimeStandardList,
    ];

    fn element(self) -> &'static str {
        match self {
            Captured::Constructor => Constructor::ELEMENT,
            Captured::Meet => Meet::ELEMENT,
            Captured::RecordList => RecordList::ELEMENT,
            Captured::TimeStandardList => TimeStandardList::ELEMENT,
        }
    }

    fn from_name(name: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.element().as_bytes() == name)
    }
}

/// Counters describing one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Captured fragments re-parsed, one per top-level entity
    pub fragments_parsed: usize,
    /// Largest capture buffer seen, in bytes
    pub peak_capture_bytes: usize,
    /// Raw bytes read from the source
    pub bytes_read: usize,
}

/// Subtree being buffered
struct Capture {
    kind: Captured,
    buffer: Vec<u8>,
    /// Open elements inside the capture, the captured element included
    depth: usize,
}

/// Stateful streaming parser that fills a [`Document`]
pub struct CaptureParser<'s> {
    /// Decoded input not yet tokenized
    buffer: Vec<u8>,
    /// Absolute position of `buffer[0]`
    offset: usize,
    /// Buffer length to wait for before re-tokenizing a stalled construct
    retry_at: usize,
    /// Tokenizer passes over the buffer
    passes: usize,
    state: CaptureState<'s>,
}

/// Everything except the input buffer, so events borrowed from the buffer
/// can be handled while the state is mutated
struct CaptureState<'s> {
    structure: StructureCheck,
    capture: Option<Capture>,
    document: Document,
    sink: &'s dyn DiagnosticSink,
    max_capture_bytes: Option<usize>,
    stats: ParseStats,
}

impl<'s> CaptureParser<'s> {
    pub fn new(sink: &'s dyn DiagnosticSink, max_capture_bytes: Option<usize>) -> Self {
        CaptureParser {
            buffer: Vec::with_capacity(8192),
            offset: 0,
            retry_at: 0,
            passes: 0,
            state: CaptureState {
                structure: StructureCheck::new(),
                capture: None,
                document: Document::new(),
                sink,
                max_capture_bytes,
                stats: ParseStats::default(),
            },
        }
    }

    /// Feed a chunk of decoded (UTF-8) input
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(chunk);
        trace!(chunk = chunk.len(), pending = self.buffer.len(), "feeding chunk");
        self.process_buffer()
    }

    /// End of input: flush what is left and check the document structure
    pub fn finish(&mut self) -> Result<Document> {
        let mut reader = SliceReader::new(&self.buffer);
        while let Some(event) = reader.next_event() {
            if matches!(event, XmlEvent::EndDocument) {
                break;
            }
            self.state.handle(event, self.offset + reader.position())?;
        }
        if let Some(err) = reader.take_error() {
            return Err(relocate(err, self.offset).into());
        }

        let end = self.offset + self.buffer.len();
        self.buffer.clear();
        self.offset = end;

        self.state.structure.finish(end)?;
        if !self.state.structure.seen_root() {
            return Err(SchemaError::root_mismatch().into());
        }
        Ok(std::mem::take(&mut self.state.document))
    }

    pub fn stats(&self) -> ParseStats {
        self.state.stats
    }

    /// Tokenize up to the last complete tag and drop what was consumed
    ///
    /// A construct can hold `>` bytes before its real end (comments,
    /// quoted attribute values). When a pass stops inside one, the next pass
    /// waits until the buffer has doubled, so a long construct is rescanned
    /// a logarithmic number of times.
    fn process_buffer(&mut self) -> Result<()> {
        if self.buffer.len() < self.retry_at {
            return Ok(());
        }
        let boundary = self.find_safe_boundary();
        if boundary == 0 {
            return Ok(());
        }

        self.passes += 1;
        let mut reader = SliceReader::partial(&self.buffer[..boundary], self.offset);
        while let Some(event) = reader.next_event() {
            let position = reader.position();
            self.state.handle(event, position)?;
        }
        if let Some(err) = reader.take_error() {
            return Err(err.into());
        }

        let consumed = reader.consumed();
        self.buffer.drain(..consumed);
        self.offset += consumed;
        if consumed < boundary {
            self.retry_at = self.buffer.len() * 2;
            trace!(pending = self.buffer.len(), passes = self.passes, "construct spans chunks");
        } else {
            self.retry_at = 0;
        }
        Ok(())
    }

    /// Everything up to the last `>` may hold complete markup; what follows
    /// cannot end a construct yet
    fn find_safe_boundary(&self) -> usize {
        memrchr(b'>', &self.buffer).map_or(0, |pos| pos + 1)
    }
}

impl CaptureState<'_> {
    fn handle(&mut self, event: XmlEvent<'_>, position: usize) -> Result<()> {
        let before_root = !self.structure.seen_root();
        self.structure.observe(&event, position)?;

        match event {
            XmlEvent::StartElement(start) if before_root => self.open_root(&start),
            XmlEvent::EmptyElement(start) if before_root => self.open_root(&start),
            XmlEvent::StartElement(start) => self.start_element(&start, false),
            XmlEvent::EmptyElement(start) => self.start_element(&start, true),
            XmlEvent::EndElement(end) => self.end_element(&end),
            XmlEvent::Text(text) => {
                if let Some(capture) = self.capture.as_mut() {
                    capture
                        .buffer
                        .extend_from_slice(encode_text(&String::from_utf8_lossy(&text)).as_bytes());
                }
                self.check_capture_size()
            }
            XmlEvent::CData(data) => {
                if let Some(capture) = self.capture.as_mut() {
                    capture.buffer.extend_from_slice(b"<![CDATA[");
                    capture.buffer.extend_from_slice(&data);
                    capture.buffer.extend_from_slice(b"]]>");
                }
                self.check_capture_size()
            }
            _ => Ok(()),
        }
    }

    /// The root must be `LENEX` with a non-blank `version`
    fn open_root(&mut self, start: &StartElement<'_>) -> Result<()> {
        if start.name.as_ref() != ROOT_ELEMENT.as_bytes() {
            return Err(SchemaError::root_mismatch().into());
        }

        let version = start
            .get_attribute_value("version")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SchemaError::missing_attribute(ROOT_ELEMENT, "version"))?;
        self.document.set_version(version);
        if let Some(revision) = start
            .get_attribute_value("revision")
            .filter(|v| !v.trim().is_empty())
        {
            self.document.set_revision(revision);
        }
        debug!(version, "LENEX root opened");
        Ok(())
    }

    fn start_element(&mut self, start: &StartElement<'_>, empty: bool) -> Result<()> {
        if self.capture.is_none() {
            let Some(kind) = Captured::from_name(&start.name) else {
                return Ok(());
            };
            debug!(element = kind.element(), "capture started");
            self.capture = Some(Capture {
                kind,
                buffer: Vec::with_capacity(1024),
                depth: 0,
            });
        }

        let Some(capture) = self.capture.as_mut() else {
            return Ok(());
        };
        write_start_tag(&mut capture.buffer, start, empty);
        if !empty {
            capture.depth += 1;
        }
        self.check_capture_size()?;

        if empty && capture_depth(&self.capture) == 0 {
            return self.complete_capture();
        }
        Ok(())
    }

    fn end_element(&mut self, end: &EndElement<'_>) -> Result<()> {
        let Some(capture) = self.capture.as_mut() else {
            return Ok(());
        };
        capture.buffer.extend_from_slice(b"</");
        capture.buffer.extend_from_slice(&end.name);
        capture.buffer.push(b'>');
        capture.depth = capture.depth.saturating_sub(1);
        self.check_capture_size()?;

        if capture_depth(&self.capture) == 0 {
            return self.complete_capture();
        }
        Ok(())
    }

    fn check_capture_size(&mut self) -> Result<()> {
        let Some(capture) = self.capture.as_ref() else {
            return Ok(());
        };

        let size = capture.buffer.len();
        self.stats.peak_capture_bytes = self.stats.peak_capture_bytes.max(size);
        match self.max_capture_bytes {
            Some(limit) if size > limit => Err(Error::Source(format!(
                "Captured {} element exceeds {} bytes",
                capture.kind.element(),
                limit
            ))),
            _ => Ok(()),
        }
    }

    /// Re-parse the finished capture on its own and add the built entity
    fn complete_capture(&mut self) -> Result<()> {
        let Some(capture) = self.capture.take() else {
            return Ok(());
        };

        let element = Element::parse_fragment(&capture.buffer)?;
        self.stats.fragments_parsed += 1;
        debug!(
            element = capture.kind.element(),
            bytes = capture.buffer.len(),
            "capture complete"
        );

        let scope = Scope::root(&element, self.sink);
        match capture.kind {
            Captured::Constructor => {
                self.document.set_constructor(Constructor::build(&scope)?);
            }
            Captured::Meet => {
                self.document.add_meet(Meet::build(&scope)?);
            }
            Captured::RecordList => {
                self.document.add_record_list(RecordList::build(&scope)?);
            }
            Captured::TimeStandardList => {
                self.document.add_time_standard_list(TimeStandardList::build(&scope)?);
            }
        }
        Ok(())
    }
}

fn capture_depth(capture: &Option<Capture>) -> usize {
    capture.as_ref().map_or(0, |c| c.depth)
}

fn write_start_tag(buffer: &mut Vec<u8>, start: &StartElement<'_>, empty: bool) {
    buffer.push(b'<');
    buffer.extend_from_slice(&start.name);
    for attr in &start.attributes {
        buffer.push(b' ');
        buffer.extend_from_slice(&attr.name);
        buffer.extend_from_slice(b"=\"");
        let value: Cow<'_, str> = String::from_utf8_lossy(&attr.value);
        buffer.extend_from_slice(encode_attribute(&value).as_bytes());
        buffer.push(b'"');
    }
    if empty {
        buffer.extend_from_slice(b"/>");
    } else {
        buffer.push(b'>');
    }
}

/// Move a position from buffer-relative to stream-absolute
fn relocate(mut err: ParseError, offset: usize) -> ParseError {
    err.position += offset;
    err
}
