//! Parser configuration

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::reader::buffered::DEFAULT_BUFFER_SIZE;
use std::fmt;
use std::sync::Arc;

/// Options for [`crate::Parser`] and [`crate::parse_with`]
#[derive(Clone)]
pub struct ParseOptions {
    /// Bytes requested from the input per read
    pub chunk_size: usize,
    /// Upper bound for a single captured subtree, in bytes
    pub max_capture_bytes: Option<usize>,
    /// Receiver for soft-requirement reports
    pub diagnostics: Arc<dyn DiagnosticSink + Send + Sync>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn max_capture_bytes(mut self, limit: usize) -> Self {
        self.max_capture_bytes = Some(limit);
        self
    }

    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink + Send + Sync>) -> Self {
        self.diagnostics = sink;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            chunk_size: DEFAULT_BUFFER_SIZE,
            max_capture_bytes: None,
            diagnostics: Arc::new(TracingSink),
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("chunk_size", &self.chunk_size)
            .field("max_capture_bytes", &self.max_capture_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.chunk_size, 8192);
        assert_eq!(options.max_capture_bytes, None);
    }

    #[test]
    fn test_builder() {
        let sink = Arc::new(CollectingSink::new());
        let options = ParseOptions::new()
            .chunk_size(0)
            .max_capture_bytes(1024)
            .diagnostics(sink);
        assert_eq!(options.chunk_size, 1);
        assert_eq!(options.max_capture_bytes, Some(1024));
        assert!(format!("{:?}", options).contains("chunk_size: 1"));
    }
}
