use lenex::{Error, ParseOptions, Parser, Source};
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

const SAMPLE: &str = r#"<LENEX version="3.0"><CONSTRUCTOR name="X" registration="Y" version="1"><CONTACT email="a@b.c"/></CONSTRUCTOR><MEETS><MEET name="M" city="C" nation="N"/></MEETS></LENEX>"#;

/// Hands out at most `step` bytes per read
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.step.min(buf.len()).min(self.data.len());
        buf[..len].copy_from_slice(&self.data[..len]);
        self.data = &self.data[len..];
        Ok(len)
    }
}

fn many_meets(count: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<LENEX version="3.0">
  <CONSTRUCTOR name="X" registration="Y" version="1"><CONTACT email="a@b.c"/></CONSTRUCTOR>
  <MEETS>
"#,
    );
    for n in 0..count {
        xml.push_str(&format!(
            r#"    <MEET name="Meet {n}" city="City {n}" nation="SUI">
      <CLUBS><CLUB name="Club {n}"><ATHLETES>
        <ATHLETE athleteid="{n}" birthdate="2000-01-01" firstname="A{n}" lastname="B{n}" gender="F"/>
      </ATHLETES></CLUB></CLUBS>
    </MEET>
"#
        ));
    }
    xml.push_str("  </MEETS>\n</LENEX>\n");
    xml
}

#[test]
fn test_end_to_end_sample() {
    let document = lenex::parse(SAMPLE).unwrap();

    assert_eq!(document.version(), "3.0");
    assert_eq!(document.revision(), None);
    assert_eq!(document.constructor().name.as_deref(), Some("X"));
    assert_eq!(document.meets().len(), 1);
    assert_eq!(document.meets()[0].name.as_deref(), Some("M"));
    assert!(document.record_lists().is_empty());
    assert!(document.time_standard_lists().is_empty());
}

#[test]
fn test_bytes_and_readers_match_inline_text() {
    let expected = lenex::parse(SAMPLE).unwrap();

    assert_eq!(lenex::parse(SAMPLE.as_bytes()).unwrap(), expected);
    assert_eq!(lenex::parse(SAMPLE.as_bytes().to_vec()).unwrap(), expected);
    assert_eq!(lenex::parse(Source::reader(Cursor::new(SAMPLE))).unwrap(), expected);
    assert_eq!(lenex::parse(Source::seekable(Cursor::new(SAMPLE))).unwrap(), expected);

    let trickle = Trickle {
        data: SAMPLE.as_bytes(),
        step: 3,
    };
    let options = ParseOptions::new().chunk_size(5);
    assert_eq!(lenex::parse_with(Source::reader(trickle), &options).unwrap(), expected);
}

#[test]
fn test_file_path_source() {
    let mut file = tempfile::Builder::new().suffix(".lef").tempfile().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let expected = lenex::parse(SAMPLE).unwrap();
    let path = file.path().to_str().unwrap();
    assert_eq!(lenex::parse(path).unwrap(), expected);
    assert_eq!(lenex::parse(file.path()).unwrap(), expected);
}

#[test]
fn test_text_starting_with_angle_bracket_is_inline() {
    // relative name so the text itself both starts with '<' and names a file
    let file = tempfile::Builder::new().prefix("<lenex").tempfile_in(".").unwrap();
    std::fs::write(file.path(), SAMPLE).unwrap();
    let name = file.path().file_name().unwrap().to_str().unwrap().to_string();
    assert!(Path::new(&name).is_file());

    assert!(lenex::parse(Path::new(&name)).is_ok());
    let err = lenex::parse(name.as_str()).unwrap_err();
    assert!(!matches!(err, Error::Source(_)), "text was opened as a path: {err}");
}

#[test]
fn test_unreadable_path_is_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = lenex::parse(dir.path().join("missing.lef")).unwrap_err();
    assert!(matches!(err, Error::Source(ref msg) if msg.starts_with("Unable to open")));
}

#[test]
fn test_seekable_source_is_rewound_after_failure() {
    let mut cursor = Cursor::new(br#"<LENEX version="3.0"><MEETS><MEET/></MEETS></LENEX>"#.to_vec());
    let err = lenex::parse(Source::seekable(&mut cursor)).unwrap_err();
    assert!(err.is_schema());
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_deeply_nested_unknown_elements() {
    let depth = 100_000;
    let xml = format!(
        r#"<LENEX version="3.0"><CONSTRUCTOR name="X" registration="Y" version="1"><CONTACT email="a@b.c"/></CONSTRUCTOR><MEETS><MEET name="M" city="C" nation="N">{}{}</MEET></MEETS></LENEX>"#,
        "<X>".repeat(depth),
        "</X>".repeat(depth)
    );

    let document = lenex::parse(xml).unwrap();
    assert_eq!(document.meets().len(), 1);
    assert_eq!(document.meets()[0].name.as_deref(), Some("M"));
}

#[test]
fn test_many_meets_stream_one_fragment_each() {
    let xml = many_meets(250);
    let mut parser = Parser::with_options(ParseOptions::new().chunk_size(1024));

    let document = parser.parse(xml.as_str()).unwrap();
    assert_eq!(document.meets().len(), 250);
    assert_eq!(document.meets()[249].name.as_deref(), Some("Meet 249"));
    assert_eq!(document.meets()[17].clubs[0].athletes[0].last_name.as_deref(), Some("B17"));

    let stats = parser.stats();
    assert_eq!(stats.fragments_parsed, 251);
    assert_eq!(stats.bytes_read, xml.len());
    assert!(stats.peak_capture_bytes * 50 < xml.len(), "peak capture {} too large", stats.peak_capture_bytes);
}

#[test]
fn test_capture_limit() {
    let xml = many_meets(3);
    let options = ParseOptions::new().max_capture_bytes(64);
    let err = lenex::parse_with(xml.as_str(), &options).unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert!(err.to_string().starts_with("Captured "));
}

#[test]
fn test_age_group_id_depends_on_parent() {
    let header = r#"<LENEX version="3.0"><CONSTRUCTOR name="X" registration="Y" version="1"><CONTACT email="a@b.c"/></CONSTRUCTOR>"#;

    let time_standards = format!(
        r#"{header}<TIMESTANDARDLISTS><TIMESTANDARDLIST timestandardlistid="1" name="L" course="LCM" gender="M">
             <AGEGROUP agemin="10" agemax="11"/>
           </TIMESTANDARDLIST></TIMESTANDARDLISTS></LENEX>"#
    );
    let document = lenex::parse(time_standards).unwrap();
    let group = document.time_standard_lists()[0].age_group.as_ref().unwrap();
    assert_eq!(group.age_group_id, None);
    assert_eq!(group.age_min.as_deref(), Some("10"));

    let records = format!(
        r#"{header}<RECORDLISTS><RECORDLIST course="LCM" gender="F" name="R">
             <AGEGROUP agemin="-1" agemax="-1"/>
           </RECORDLIST></RECORDLISTS></LENEX>"#
    );
    assert!(lenex::parse(records).is_ok());

    let event = format!(
        r#"{header}<MEETS><MEET name="M" city="C" nation="N"><SESSIONS><SESSION date="d" number="1"><EVENTS>
             <EVENT eventid="1" number="1"><SWIMSTYLE distance="50" relaycount="1" stroke="FREE"/>
               <AGEGROUPS><AGEGROUP agemin="10" agemax="11"/></AGEGROUPS>
             </EVENT>
           </EVENTS></SESSION></SESSIONS></MEET></MEETS></LENEX>"#
    );
    let err = lenex::parse(event).unwrap_err();
    assert_eq!(err.to_string(), "AGEGROUP agegroupid attribute is required");
}

#[test]
fn test_syntax_errors() {
    let cases = [
        (r#"<LENEX version="3.0"><MEETS></MEET></LENEX>"#, "Tag mismatch"),
        (r#"<LENEX version="3.0"><MEETS>"#, ""),
        (r#"<LENEX version="3.0" version="3.1"/>"#, ""),
    ];
    for (xml, fragment) in cases {
        let err = lenex::parse(xml).unwrap_err();
        assert!(err.is_syntax(), "{xml}: expected syntax error, got {err:?}");
        assert!(err.to_string().contains(fragment), "{xml}: {err}");
    }
}

#[test]
fn test_root_must_be_lenex() {
    let err = lenex::parse(r#"<MEETS version="3.0"/>"#).unwrap_err();
    assert!(err.is_schema());
    assert_eq!(err.to_string(), "Root element must be LENEX");
}

#[test]
fn test_missing_version() {
    let err = lenex::parse(r#"<LENEX><CONSTRUCTOR name="X" registration="Y" version="1"><CONTACT email="a@b.c"/></CONSTRUCTOR></LENEX>"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "LENEX version attribute is required");
}

#[test]
fn test_utf16_input() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in SAMPLE.replace("\"M\"", "\"Zürich\"").encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let document = lenex::parse(bytes).unwrap();
    assert_eq!(document.meets()[0].name.as_deref(), Some("Zürich"));
}

#[test]
fn test_latin1_declaration() {
    let text = format!(
        r#"<?xml version="1.0" encoding="ISO-8859-1"?>{}"#,
        SAMPLE.replace("\"M\"", "\"Genève\"")
    );
    // every char is below U+0100, so each maps to its Latin-1 byte
    let bytes: Vec<u8> = text.chars().map(|c| c as u8).collect();

    let document = lenex::parse(bytes).unwrap();
    assert_eq!(document.meets()[0].name.as_deref(), Some("Genève"));
}

#[cfg(feature = "zip")]
mod zipped {
    use super::*;
    use zip::write::SimpleFileOptions;

    fn archive(name: &str, content: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_zip_matches_raw_xml() {
        let expected = lenex::parse(SAMPLE).unwrap();
        let data = archive("d.lef", SAMPLE);

        assert_eq!(lenex::parse(data.as_slice()).unwrap(), expected);
        assert_eq!(lenex::parse(Source::reader(Cursor::new(data.clone()))).unwrap(), expected);
        assert_eq!(lenex::parse(Source::seekable(Cursor::new(data.clone()))).unwrap(), expected);

        let mut file = tempfile::Builder::new().suffix(".lxf").tempfile().unwrap();
        file.write_all(&data).unwrap();
        assert_eq!(lenex::parse(file.path()).unwrap(), expected);
    }

    #[test]
    fn test_zip_without_payload() {
        let data = archive("notes.txt", SAMPLE);
        let err = lenex::parse(data).unwrap_err();
        assert!(err.is_container());
        assert_eq!(err.to_string(), "Lenex archive does not contain a .lef or .xml payload");
    }

    #[test]
    fn test_zip_without_payload_rewinds_seekable_source() {
        let mut data = b"xx".to_vec();
        data.extend(archive("notes.txt", SAMPLE));
        let mut cursor = Cursor::new(data);
        cursor.set_position(2);

        let err = lenex::parse(Source::seekable(&mut cursor)).unwrap_err();
        assert!(err.is_container());
        assert_eq!(err.to_string(), "Lenex archive does not contain a .lef or .xml payload");
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_classification_uses_signature_only() {
        // a .lxf name with plain XML inside is still XML
        let mut file = tempfile::Builder::new().suffix(".lxf").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        assert!(lenex::parse(file.path()).is_ok());

        let err = lenex::parse(b"PK\x03\x04 not really an archive".to_vec()).unwrap_err();
        assert!(err.is_container());
    }
}
