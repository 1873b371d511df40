//! Core XML primitives
//!
//! The well-formedness layer shared by the streaming parser and the fragment
//! parser:
//! - `scanner`: byte cursor with memchr-backed delimiter search
//! - `tokenizer`: markup tokens from complete input or a stream prefix
//! - `entities`: entity decoding on read, escaping on write
//! - `attributes`: attribute lists with duplicate and quoting checks
//! - `encoding`: BOM/declaration detection and chunked transcoding to UTF-8

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
