//! Error family for the LENEX codec
//!
//! Every public operation returns [`Error`]. The variant is the sub-kind:
//! - `Source`: input could not be read or classified
//! - `Container`: ZIP archive problems
//! - `Syntax`: malformed XML, message kept from the tokenizer
//! - `Schema`: LENEX structure violations (missing attributes/elements, wrong root)

use crate::core::tokenizer::ParseError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Base error type for parsing and serializing LENEX documents
#[derive(Debug, Error)]
pub enum Error {
    /// Input could not be opened, read or classified
    #[error("{0}")]
    Source(String),

    /// ZIP container could not be read or holds no payload
    #[error("{0}")]
    Container(String),

    /// Malformed XML
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Well-formed XML that violates the LENEX structure
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Underlying I/O failure while streaming input
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema(_))
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Error::Container(_))
    }
}

/// Malformed XML, reported with the tokenizer's message verbatim
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset into the (decoded) input where the problem was noticed
    pub position: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

impl From<ParseError> for SyntaxError {
    fn from(err: ParseError) -> Self {
        SyntaxError::new(err.message, err.position)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Syntax(err.into())
    }
}

/// LENEX structure violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SchemaError {
    pub message: String,
}

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        SchemaError {
            message: message.into(),
        }
    }

    /// `<ELEMENT> <attribute> attribute is required`
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        SchemaError::new(format!("{} {} attribute is required", element, attribute))
    }

    /// `<context> element is required`
    pub fn missing_element(context: &str) -> Self {
        SchemaError::new(format!("{} element is required", context))
    }

    /// Root element was not `LENEX` (or no root was seen at all)
    pub fn root_mismatch() -> Self {
        SchemaError::new("Root element must be LENEX")
    }
}
