//! Canonical XML output
//!
//! Walks finalized documents through the [`Node`] view every entity exposes.
//! Element names come from association field names via
//! [`element_name_for`]/[`singular_element`], the same mapping the builder
//! reads with. Uses an explicit stack rather than recursion.

use crate::core::entities::encode_attribute;
use crate::document::LenexDocument;
use crate::schema::naming::{element_name_for, singular_element};
use crate::schema::{Association, Entity, Node};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const ROOT_ELEMENT: &str = "LENEX";

const INDENT: &str = "  ";

/// Serialize a finalized document
pub fn to_xml(document: &LenexDocument) -> String {
    let mut writer = XmlWriter::new();

    let mut root_attributes = vec![("version", document.version())];
    if let Some(revision) = document.revision().filter(|r| !r.trim().is_empty()) {
        root_attributes.push(("revision", revision));
    }

    writer.open(ROOT_ELEMENT, &root_attributes, 0);
    writer.write_node(crate::model::Constructor::ELEMENT, document.constructor(), 1);
    writer.write_collection("MEETS", document.meets().iter().map(|m| m as &dyn Node), 1);
    writer.write_collection(
        "RECORDLISTS",
        document.record_lists().iter().map(|r| r as &dyn Node),
        1,
    );
    writer.write_collection(
        "TIMESTANDARDLISTS",
        document.time_standard_lists().iter().map(|t| t as &dyn Node),
        1,
    );
    writer.close(ROOT_ELEMENT, 0);

    writer.finish()
}

struct XmlWriter {
    buf: String,
}

enum StackEntry<'n> {
    Enter(String, &'n dyn Node, usize),
    EnterWrapper(String, Vec<&'n dyn Node>, usize),
    Close(String, usize),
}

impl XmlWriter {
    fn new() -> Self {
        let mut buf = String::with_capacity(4096);
        buf.push_str(XML_DECLARATION);
        buf.push('\n');
        XmlWriter { buf }
    }

    fn finish(self) -> String {
        self.buf
    }

    fn write_collection<'n>(&mut self, container: &str, items: impl Iterator<Item = &'n dyn Node>, depth: usize) {
        let items: Vec<&dyn Node> = items.collect();
        if items.is_empty() {
            return;
        }
        let item_name = singular_element(container);
        self.open(container, &[], depth);
        for item in items {
            self.write_node(&item_name, item, depth + 1);
        }
        self.close(container, depth);
    }

    /// Write one entity subtree
    fn write_node(&mut self, name: &str, node: &dyn Node, depth: usize) {
        let mut stack = vec![StackEntry::Enter(name.to_string(), node, depth)];

        while let Some(entry) = stack.pop() {
            match entry {
                StackEntry::Close(name, depth) => self.close(&name, depth),
                StackEntry::EnterWrapper(name, items, depth) => {
                    let item_name = singular_element(&name);
                    self.open(&name, &[], depth);
                    stack.push(StackEntry::Close(name, depth));
                    for item in items.into_iter().rev() {
                        stack.push(StackEntry::Enter(item_name.clone(), item, depth + 1));
                    }
                }
                StackEntry::Enter(name, node, depth) => {
                    let mut attributes = node.attributes();
                    let mut children = Vec::new();

                    for (field, association) in node.associations() {
                        match association {
                            Association::Inline(Some(inline)) => attributes.extend(inline.attributes()),
                            Association::One(Some(child)) => {
                                children.push(StackEntry::Enter(element_name_for(field), child, depth + 1));
                            }
                            Association::Many(items) if !items.is_empty() => {
                                children.push(StackEntry::EnterWrapper(element_name_for(field), items, depth + 1));
                            }
                            _ => {}
                        }
                    }

                    if children.is_empty() {
                        self.empty(&name, &attributes, depth);
                    } else {
                        self.open(&name, &attributes, depth);
                        stack.push(StackEntry::Close(name, depth));
                        stack.extend(children.into_iter().rev());
                    }
                }
            }
        }
    }

    fn start_tag(&mut self, name: &str, attributes: &[(&str, &str)], depth: usize) {
        for _ in 0..depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push('<');
        self.buf.push_str(name);
        for (attr_name, value) in attributes {
            self.buf.push(' ');
            self.buf.push_str(attr_name);
            self.buf.push_str("=\"");
            self.buf.push_str(&encode_attribute(value));
            self.buf.push('"');
        }
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)], depth: usize) {
        self.start_tag(name, attributes, depth);
        self.buf.push_str(">\n");
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)], depth: usize) {
        self.start_tag(name, attributes, depth);
        self.buf.push_str("/>\n");
    }

    fn close(&mut self, name: &str, depth: usize) {
        for _ in 0..depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push_str(">\n");
    }
}
