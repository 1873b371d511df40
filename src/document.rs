//! Document aggregate
//!
//! [`Document`] collects the pieces of a LENEX file as they become
//! available, either from the streaming parser or from code building a file
//! by hand. [`Document::finalize`] checks the root-level invariants and
//! produces the immutable [`LenexDocument`].

use crate::error::{Result, SchemaError};
use crate::model::{Constructor, Meet, RecordList, TimeStandardList};

/// Mutable accumulator for a LENEX document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    version: Option<String>,
    revision: Option<String>,
    constructor: Option<Constructor>,
    meets: Vec<Meet>,
    record_lists: Vec<RecordList>,
    time_standard_lists: Vec<TimeStandardList>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    pub fn set_revision(&mut self, revision: impl Into<String>) {
        self.revision = Some(revision.into());
    }

    pub fn set_constructor(&mut self, constructor: Constructor) -> &Constructor {
        self.constructor.insert(constructor)
    }

    pub fn add_meet(&mut self, meet: Meet) -> &Meet {
        push(&mut self.meets, meet)
    }

    pub fn add_record_list(&mut self, record_list: RecordList) -> &RecordList {
        push(&mut self.record_lists, record_list)
    }

    pub fn add_time_standard_list(&mut self, time_standard_list: TimeStandardList) -> &TimeStandardList {
        push(&mut self.time_standard_lists, time_standard_list)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    pub fn meets(&self) -> &[Meet] {
        &self.meets
    }

    pub fn record_lists(&self) -> &[RecordList] {
        &self.record_lists
    }

    pub fn time_standard_lists(&self) -> &[TimeStandardList] {
        &self.time_standard_lists
    }

    /// Check root-level invariants and freeze the document.
    ///
    /// The constructor is checked before the version.
    pub fn finalize(self) -> std::result::Result<LenexDocument, SchemaError> {
        let constructor = self
            .constructor
            .ok_or_else(|| SchemaError::missing_element("CONSTRUCTOR"))?;
        let version = self
            .version
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SchemaError::missing_attribute("LENEX", "version"))?;

        Ok(LenexDocument {
            version,
            revision: self.revision,
            constructor,
            meets: self.meets,
            record_lists: self.record_lists,
            time_standard_lists: self.time_standard_lists,
        })
    }

    /// Serialize a finalized copy of this document
    pub fn to_xml(&self) -> Result<String> {
        let document = self.clone().finalize()?;
        Ok(crate::serializer::to_xml(&document))
    }
}

fn push<T>(items: &mut Vec<T>, item: T) -> &T {
    items.push(item);
    &items[items.len() - 1]
}

/// Finalized, read-only LENEX document
#[derive(Debug, Clone, PartialEq)]
pub struct LenexDocument {
    version: String,
    revision: Option<String>,
    constructor: Constructor,
    meets: Vec<Meet>,
    record_lists: Vec<RecordList>,
    time_standard_lists: Vec<TimeStandardList>,
}

impl LenexDocument {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    pub fn meets(&self) -> &[Meet] {
        &self.meets
    }

    pub fn record_lists(&self) -> &[RecordList] {
        &self.record_lists
    }

    pub fn time_standard_lists(&self) -> &[TimeStandardList] {
        &self.time_standard_lists
    }

    pub fn to_xml(&self) -> String {
        crate::serializer::to_xml(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contact;

    fn constructor() -> Constructor {
        Constructor {
            name: Some("Tool".into()),
            registration: Some("Reg".into()),
            version: Some("1".into()),
            contact: Contact {
                email: Some("a@b.c".into()),
                ..Contact::default()
            },
        }
    }

    #[test]
    fn test_finalize_requires_constructor_first() {
        let err = Document::new().finalize().unwrap_err();
        assert_eq!(err.message, "CONSTRUCTOR element is required");
    }

    #[test]
    fn test_finalize_requires_version() {
        let mut document = Document::new();
        document.set_constructor(constructor());
        document.set_version("  ");
        let err = document.finalize().unwrap_err();
        assert_eq!(err.message, "LENEX version attribute is required");
    }

    #[test]
    fn test_add_returns_stored_value() {
        let mut document = Document::new();
        let meet = document.add_meet(Meet {
            name: Some("Open".into()),
            ..Meet::default()
        });
        assert_eq!(meet.name.as_deref(), Some("Open"));

        document.add_meet(Meet::default());
        document.set_version("3.0");
        document.set_constructor(constructor());
        let finalized = document.finalize().unwrap();
        assert_eq!(finalized.meets().len(), 2);
        assert_eq!(finalized.meets()[0].name.as_deref(), Some("Open"));
        assert_eq!(finalized.version(), "3.0");
        assert_eq!(finalized.revision(), None);
    }

    #[test]
    fn test_to_xml_reports_missing_constructor() {
        let mut document = Document::new();
        document.set_version("3.0");
        let err = document.to_xml().unwrap_err();
        assert!(err.is_schema());
    }
}
