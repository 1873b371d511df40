//! ZIP container extraction
//!
//! LENEX files are commonly shipped as `.lxf`, a ZIP archive holding one
//! `.lef` (or `.xml`) payload. The first matching file entry wins.

use crate::error::{Error, Result};
use std::io::{Read, Seek};

/// Payload extensions, compared against lowercased entry names
pub const PAYLOAD_EXTENSIONS: [&str; 2] = [".lef", ".xml"];

pub const MISSING_ZIP_FEATURE: &str =
    "ZIP archives require the `zip` feature. Rebuild lenex with --features zip and try again.";

#[cfg(feature = "zip")]
pub fn extract_payload<R: Read + Seek>(reader: R) -> Result<Vec<u8>> {
    let mut archive = ::zip::ZipArchive::new(reader).map_err(archive_error)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(archive_error)?;
        if entry.is_dir() || !is_payload_name(entry.name()) {
            continue;
        }

        tracing::debug!(entry = entry.name(), size = entry.size(), "extracting Lenex payload");
        let mut payload = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut payload).map_err(archive_error)?;
        if payload.is_empty() {
            return Err(Error::Container("Lenex archive is missing XML payload".to_string()));
        }
        return Ok(payload);
    }

    Err(Error::Container(
        "Lenex archive does not contain a .lef or .xml payload".to_string(),
    ))
}

#[cfg(not(feature = "zip"))]
pub fn extract_payload<R: Read + Seek>(_reader: R) -> Result<Vec<u8>> {
    Err(Error::Container(MISSING_ZIP_FEATURE.to_string()))
}

pub fn is_payload_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    PAYLOAD_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

#[cfg(feature = "zip")]
fn archive_error(err: impl std::fmt::Display) -> Error {
    Error::Container(format!("Unable to read Lenex archive: {}", err))
}


#[cfg(all(test, not(feature = "zip")))]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_missing_feature() {
        let err = extract_payload(Cursor::new(b"PK\x03\x04".to_vec())).unwrap_err();
        assert_eq!(err.to_string(), MISSING_ZIP_FEATURE);
    }
}
