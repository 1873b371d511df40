//! Source Module - input classification
//!
//! Turns whatever the caller hands in (inline XML, a path, bytes, a reader)
//! into one byte stream positioned at the start of the XML payload:
//! - text is a path only when it does not look like XML or ZIP and names a
//!   readable file
//! - the first four bytes decide between XML and a ZIP container
//! - ZIP payloads are extracted by [`self::zip::extract_payload`]
//!
//! Seekable inputs are returned to their original position when the resolved
//! stream is dropped, whatever the outcome of the parse.

pub mod zip;

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local file header signature that starts every ZIP archive
pub const ZIP_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

/// Anything that can both read and seek
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Input accepted by [`crate::parse`]
pub enum Source<'a> {
    /// Inline XML, or a path when it names a readable file
    Text(Cow<'a, str>),
    /// Raw bytes: XML or a ZIP archive
    Bytes(Cow<'a, [u8]>),
    /// Always treated as a filesystem path
    Path(PathBuf),
    /// Forward-only stream
    Reader(Box<dyn Read + 'a>),
    /// Stream that can be rewound
    Seekable(Box<dyn ReadSeek + 'a>),
}

impl<'a> Source<'a> {
    pub fn reader(reader: impl Read + 'a) -> Self {
        Source::Reader(Box::new(reader))
    }

    pub fn seekable(reader: impl Read + Seek + 'a) -> Self {
        Source::Seekable(Box::new(reader))
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Source<'_> {
    fn from(text: String) -> Self {
        Source::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(Cow::Borrowed(bytes))
    }
}

impl From<Vec<u8>> for Source<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(Cow::Owned(bytes))
    }
}

impl<'a> From<&'a Path> for Source<'a> {
    fn from(path: &'a Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source<'_> {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

/// What the resolver found behind the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Xml,
    Zip,
}

/// Byte stream positioned at the start of the XML payload
pub struct ResolvedSource<'a> {
    reader: Box<dyn Read + 'a>,
    kind: SourceKind,
}

impl ResolvedSource<'_> {
    pub fn kind(&self) -> SourceKind {
        self.kind
    }
}

impl std::fmt::Debug for ResolvedSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSource")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Read for ResolvedSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Classifies and normalizes inputs
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceResolver;

impl SourceResolver {
    pub fn new() -> Self {
        SourceResolver
    }

    pub fn resolve<'a>(&self, source: Source<'a>) -> Result<ResolvedSource<'a>> {
        match source {
            Source::Text(text) => {
                if looks_like_path(&text) {
                    debug!(path = %text, "treating text source as a file path");
                    let path = PathBuf::from(text.as_ref());
                    return self.resolve_path(&path);
                }
                debug!(len = text.len(), "treating text source as inline XML");
                let bytes = match text {
                    Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
                    Cow::Owned(text) => Cow::Owned(text.into_bytes()),
                };
                self.resolve_bytes(bytes)
            }
            Source::Bytes(bytes) => self.resolve_bytes(bytes),
            Source::Path(path) => self.resolve_path(&path),
            Source::Reader(reader) => self.resolve_reader(reader),
            Source::Seekable(reader) => self.resolve_seekable(reader),
        }
    }

    fn resolve_path<'a>(&self, path: &Path) -> Result<ResolvedSource<'a>> {
        let file = File::open(path)
            .map_err(|err| Error::Source(format!("Unable to open {}: {}", path.display(), err)))?;
        self.resolve_seekable(Box::new(file))
    }

    fn resolve_bytes<'a>(&self, bytes: Cow<'a, [u8]>) -> Result<ResolvedSource<'a>> {
        if bytes.starts_with(ZIP_SIGNATURE) {
            debug!(len = bytes.len(), "in-memory ZIP archive");
            let payload = self::zip::extract_payload(Cursor::new(bytes))?;
            return Ok(zip_source(payload));
        }
        Ok(ResolvedSource {
            reader: Box::new(Cursor::new(bytes)),
            kind: SourceKind::Xml,
        })
    }

    fn resolve_seekable<'a>(&self, reader: Box<dyn ReadSeek + 'a>) -> Result<ResolvedSource<'a>> {
        let mut guard = Rewind::new(reader)?;

        let mut prefix = [0u8; 4];
        let len = read_prefix(&mut guard, &mut prefix)?;
        guard.rewind_to_origin()?;

        if &prefix[..len] == ZIP_SIGNATURE {
            debug!("seekable ZIP archive");
            // the guard restores the caller's position once the payload is out
            let payload = self::zip::extract_payload(&mut guard)?;
            return Ok(zip_source(payload));
        }

        Ok(ResolvedSource {
            reader: Box::new(guard),
            kind: SourceKind::Xml,
        })
    }

    fn resolve_reader<'a>(&self, mut reader: Box<dyn Read + 'a>) -> Result<ResolvedSource<'a>> {
        let mut prefix = [0u8; 4];
        let len = read_prefix(&mut reader, &mut prefix)?;

        if &prefix[..len] == ZIP_SIGNATURE {
            // the central directory sits at the end, so the archive is buffered
            let mut archive = prefix.to_vec();
            reader.read_to_end(&mut archive)?;
            debug!(len = archive.len(), "buffered ZIP archive from stream");
            let payload = self::zip::extract_payload(Cursor::new(archive))?;
            return Ok(zip_source(payload));
        }

        Ok(ResolvedSource {
            reader: Box::new(Cursor::new(prefix[..len].to_vec()).chain(reader)),
            kind: SourceKind::Xml,
        })
    }
}

fn zip_source<'a>(payload: Vec<u8>) -> ResolvedSource<'a> {
    ResolvedSource {
        reader: Box::new(Cursor::new(payload)),
        kind: SourceKind::Zip,
    }
}

/// Path only when the text is not inline XML or ZIP bytes and a readable file exists
fn looks_like_path(text: &str) -> bool {
    let content = text.strip_prefix('\u{feff}').unwrap_or(text).trim_start();
    if content.is_empty() || content.starts_with('<') || text.as_bytes().starts_with(ZIP_SIGNATURE) {
        return false;
    }

    let path = Path::new(text);
    path.is_file() && File::open(path).is_ok()
}

/// Read up to `buf.len()` bytes, stopping early only at end of input
fn read_prefix<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Restores a seekable stream to where it was found when dropped
struct Rewind<S: Read + Seek> {
    inner: S,
    origin: u64,
}

impl<S: Read + Seek> Rewind<S> {
    fn new(mut inner: S) -> io::Result<Self> {
        let origin = inner.stream_position()?;
        Ok(Rewind { inner, origin })
    }

    fn rewind_to_origin(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(self.origin)).map(|_| ())
    }
}

impl<S: Read + Seek> Read for Rewind<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<S: Read + Seek> Seek for Rewind<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<S: Read + Seek> Drop for Rewind<S> {
    fn drop(&mut self) {
        if let Err(err) = self.rewind_to_origin() {
            debug!(error = %err, "could not restore source position");
        }
    }
}
