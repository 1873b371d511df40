//! XML Encoding Detection and Conversion
//!
//! Handles detection of UTF-16 and other encodings based on BOM and XML declaration.
//! Converts non-UTF-8 encodings to UTF-8 chunk by chunk, so a streamed document
//! never has to be held in memory to be transcoded.

use memchr::memmem;

/// Bytes examined for an XML declaration before giving up on one
const DECLARATION_LIMIT: usize = 512;

/// Windows-1252 code points for bytes 0x80..=0x9F (0 = undefined, passed through as C1)
const WINDOWS_1252_HIGH: [u16; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021,
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0, 0x017D, 0,
    0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014,
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// Detected or declared document encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
    Windows1252,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes.
    /// Returns the encoding and the BOM length to skip.
    pub fn detect(input: &[u8]) -> Option<(Self, usize)> {
        match input {
            [0xEF, 0xBB, 0xBF, ..] => Some((XmlEncoding::Utf8, 3)),
            [0xFF, 0xFE, ..] => Some((XmlEncoding::Utf16Le, 2)),
            [0xFE, 0xFF, ..] => Some((XmlEncoding::Utf16Be, 2)),
            // No BOM - UTF-16 pattern (< followed by null or null followed by <)
            [0x00, b'<', ..] => Some((XmlEncoding::Utf16Be, 0)),
            [b'<', 0x00, ..] => Some((XmlEncoding::Utf16Le, 0)),
            _ => None,
        }
    }

    /// Map an `encoding="..."` label to a supported ASCII-compatible encoding.
    /// UTF-16 is only recognized from the byte pattern, never from a label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "us-ascii" | "ascii" => Some(XmlEncoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" => Some(XmlEncoding::Latin1),
            "windows-1252" | "cp1252" => Some(XmlEncoding::Windows1252),
            _ => None,
        }
    }
}

/// Incremental transcoder from the document encoding to UTF-8
#[derive(Debug, Default)]
pub struct Decoder {
    encoding: Option<XmlEncoding>,
    /// Bytes held back: undecided prefix, split UTF-8 sequence or split UTF-16 unit
    pending: Vec<u8>,
    /// Bytes consumed so far, for error positions
    consumed: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and append UTF-8 to `out`. Pass `last = true` with the final chunk.
    pub fn decode(&mut self, chunk: &[u8], out: &mut Vec<u8>, last: bool) -> Result<(), String> {
        self.pending.extend_from_slice(chunk);

        let encoding = match self.encoding {
            Some(encoding) => encoding,
            None => match self.sniff(last)? {
                Some(encoding) => encoding,
                None => return Ok(()),
            },
        };

        let input = std::mem::take(&mut self.pending);
        let used = match encoding {
            XmlEncoding::Utf8 => decode_utf8(&input, out, last, self.consumed)?,
            XmlEncoding::Utf16Le => decode_utf16(&input, out, last, u16::from_le_bytes)?,
            XmlEncoding::Utf16Be => decode_utf16(&input, out, last, u16::from_be_bytes)?,
            XmlEncoding::Latin1 => decode_single_byte(&input, out, |b| b as u32),
            XmlEncoding::Windows1252 => decode_single_byte(&input, out, windows_1252),
        };
        self.consumed += used;
        self.pending.extend_from_slice(&input[used..]);
        Ok(())
    }

    /// Decide the encoding once enough of the prefix is buffered
    fn sniff(&mut self, last: bool) -> Result<Option<XmlEncoding>, String> {
        if self.pending.len() < 4 && !last {
            return Ok(None);
        }

        if let Some((encoding, bom)) = XmlEncoding::detect(&self.pending) {
            self.pending.drain(..bom);
            self.consumed += bom;
            self.encoding = Some(encoding);
            return Ok(Some(encoding));
        }

        let encoding = if self.pending.starts_with(b"<?xml") {
            match memmem::find(&self.pending, b"?>") {
                Some(end) => declared_encoding(&self.pending[..end])?,
                None if !last && self.pending.len() < DECLARATION_LIMIT => return Ok(None),
                None => XmlEncoding::Utf8,
            }
        } else {
            XmlEncoding::Utf8
        };

        self.encoding = Some(encoding);
        Ok(Some(encoding))
    }
}

/// Read the `encoding` pseudo-attribute of an XML declaration
fn declared_encoding(declaration: &[u8]) -> Result<XmlEncoding, String> {
    let Some(start) = memmem::find(declaration, b"encoding") else {
        return Ok(XmlEncoding::Utf8);
    };
    let rest = &declaration[start + b"encoding".len()..];
    let Some(quote_pos) = rest.iter().position(|&b| b == b'"' || b == b'\'') else {
        return Ok(XmlEncoding::Utf8);
    };
    let quote = rest[quote_pos];
    let value = &rest[quote_pos + 1..];
    let end = value.iter().position(|&b| b == quote).unwrap_or(value.len());
    let label = String::from_utf8_lossy(&value[..end]);

    XmlEncoding::from_label(&label).ok_or_else(|| format!("Unsupported encoding: {}", label))
}

/// Pass valid UTF-8 through; hold back a sequence split across chunks
fn decode_utf8(input: &[u8], out: &mut Vec<u8>, last: bool, consumed: usize) -> Result<usize, String> {
    match std::str::from_utf8(input) {
        Ok(_) => {
            out.extend_from_slice(input);
            Ok(input.len())
        }
        Err(err) => {
            let valid = err.valid_up_to();
            if err.error_len().is_none() && !last {
                out.extend_from_slice(&input[..valid]);
                return Ok(valid);
            }
            Err(format!("Invalid UTF-8 sequence at byte {}", consumed + valid))
        }
    }
}

fn decode_utf16(
    input: &[u8],
    out: &mut Vec<u8>,
    last: bool,
    to_unit: fn([u8; 2]) -> u16,
) -> Result<usize, String> {
    let mut units: Vec<u16> = input.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]])).collect();

    // Keep a trailing high surrogate for the next chunk
    if !last && matches!(units.last(), Some(0xD800..=0xDBFF)) {
        units.pop();
    }
    if last && input.len() % 2 != 0 {
        return Err("Invalid UTF-16: odd number of bytes".to_string());
    }

    let mut utf8 = [0u8; 4];
    for decoded in char::decode_utf16(units.iter().copied()) {
        let c = decoded.map_err(|e| format!("Invalid UTF-16: {}", e))?;
        out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }
    Ok(units.len() * 2)
}

fn decode_single_byte(input: &[u8], out: &mut Vec<u8>, map: fn(u8) -> u32) -> usize {
    let mut utf8 = [0u8; 4];
    for &b in input {
        if b < 0x80 {
            out.push(b);
        } else {
            let c = char::from_u32(map(b)).unwrap_or(char::REPLACEMENT_CHARACTER);
            out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        }
    }
    input.len()
}

fn windows_1252(b: u8) -> u32 {
    match b {
        0x80..=0x9F => match WINDOWS_1252_HIGH[(b - 0x80) as usize] {
            0 => b as u32,
            cp => cp as u32,
        },
        _ => b as u32,
    }
}
