//! Buffered XML Reader
//!
//! Reads XML from any source implementing Read trait, using a fixed-size
//! internal buffer, and hands out UTF-8 chunks through [`Decoder`].

use crate::core::encoding::Decoder;
use crate::core::tokenizer::ParseError;
use crate::error::Result;
use std::io::{ErrorKind, Read};

/// Buffer size for reading chunks
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Buffered XML reader for streaming input
pub struct BufferedReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    decoder: Decoder,
    eof: bool,
    bytes_read: usize,
}

impl<R: Read> BufferedReader<R> {
    /// Create a new buffered reader
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new buffered reader with specified buffer capacity
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        BufferedReader {
            reader,
            buffer: vec![0u8; capacity.max(16)],
            decoder: Decoder::new(),
            eof: false,
            bytes_read: 0,
        }
    }

    /// Read one chunk and append its UTF-8 form to `out`.
    /// Returns `Ok(false)` once the input is exhausted.
    pub fn fill_buffer(&mut self, out: &mut Vec<u8>) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }

        let read = loop {
            match self.reader.read(&mut self.buffer) {
                Ok(read) => break read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };

        self.eof = read == 0;
        self.bytes_read += read;
        self.decoder
            .decode(&self.buffer[..read], out, self.eof)
            .map_err(|msg| ParseError::new(msg, self.bytes_read))?;
        Ok(!self.eof)
    }

    /// Check if we've reached end of input
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Raw bytes pulled from the underlying reader so far
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}
