//! lenex - streaming LENEX codec
//!
//! Parses LENEX swim-meet documents (inline XML, files, streams or ZIP
//! containers) into typed values and writes them back as canonical XML.
//!
//! Layers:
//! - `core` / `reader`: tokenizer, encoding detection, event readers
//! - `source`: input classification and ZIP extraction
//! - `parser`: bounded-memory capture of top-level subtrees
//! - `schema` / `model`: declarative entity contracts and the entity catalog
//! - `document` / `serializer`: the aggregate and its XML form
//!
//! ```no_run
//! let document = lenex::parse("meet.lxf")?;
//! for meet in document.meets() {
//!     println!("{:?}", meet.name);
//! }
//! # Ok::<(), lenex::Error>(())
//! ```

pub mod core;
pub mod diagnostics;
pub mod document;
pub mod dom;
pub mod error;
pub mod model;
pub mod options;
pub mod parser;
pub mod reader;
pub mod schema;
pub mod serializer;
pub mod source;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use document::{Document, LenexDocument};
pub use error::{Error, Result, SchemaError, SyntaxError};
pub use options::ParseOptions;
pub use parser::{ParseStats, Parser};
pub use source::{Source, SourceKind, SourceResolver};

/// Parse a LENEX document with default options
pub fn parse<'a>(source: impl Into<Source<'a>>) -> Result<LenexDocument> {
    Parser::new().parse(source)
}

/// Parse a LENEX document with the given options
pub fn parse_with<'a>(source: impl Into<Source<'a>>, options: &ParseOptions) -> Result<LenexDocument> {
    Parser::with_options(options.clone()).parse(source)
}

/// Serialize a finalized document to canonical XML
pub fn to_xml(document: &LenexDocument) -> String {
    serializer::to_xml(document)
}
