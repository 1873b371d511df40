//! Parser Module - streaming LENEX parsing
//!
//! Source resolution, chunked decoding and the capture parser wired
//! together. [`Parser`] keeps its options between parses and reports
//! [`ParseStats`] for the last one.

pub mod capture;

pub use capture::{CaptureParser, ParseStats};

use crate::document::LenexDocument;
use crate::error::Result;
use crate::options::ParseOptions;
use crate::reader::BufferedReader;
use crate::source::{Source, SourceResolver};
use std::io::Read;
use tracing::debug;

/// Reusable, configured LENEX parser
#[derive(Debug, Default)]
pub struct Parser {
    options: ParseOptions,
    resolver: SourceResolver,
    stats: ParseStats,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Parser {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Counters from the most recent call to [`Parser::parse`], successful or not
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Parse one source into a finalized document
    pub fn parse<'a>(&mut self, source: impl Into<Source<'a>>) -> Result<LenexDocument> {
        self.stats = ParseStats::default();
        let resolved = self.resolver.resolve(source.into())?;
        debug!(kind = ?resolved.kind(), chunk_size = self.options.chunk_size, "parsing source");

        let mut reader = BufferedReader::with_capacity(resolved, self.options.chunk_size);
        let mut parser = CaptureParser::new(&*self.options.diagnostics, self.options.max_capture_bytes);

        let result = drive(&mut reader, &mut parser);
        self.stats = ParseStats {
            bytes_read: reader.bytes_read(),
            ..parser.stats()
        };

        let document = result?.finalize()?;
        debug!(
            meets = document.meets().len(),
            record_lists = document.record_lists().len(),
            time_standard_lists = document.time_standard_lists().len(),
            fragments = self.stats.fragments_parsed,
            "parse complete"
        );
        Ok(document)
    }
}

/// Pump decoded chunks from the reader into the capture parser
fn drive<R: Read>(
    reader: &mut BufferedReader<R>,
    parser: &mut CaptureParser<'_>,
) -> Result<crate::document::Document> {
    let mut chunk = Vec::new();
    loop {
        chunk.clear();
        let more = reader.fill_buffer(&mut chunk)?;
        parser.feed(&chunk)?;
        if !more {
            break;
        }
    }
    parser.finish()
}
