//! Owned element tree for captured fragments
//!
//! A captured LENEX subtree (one MEET, one RECORDLIST, ...) is re-parsed on
//! its own into this small tree, which the entity builders then walk. Only
//! element structure, attributes and character data are kept.
//!
//! Nesting depth is not bounded by the tokenizer, so dropping a tree must not
//! recurse once per level.

use crate::core::tokenizer::ParseError;
use crate::reader::{SliceReader, StartElement, StructureCheck, XmlEvent};

/// Element node: name, attributes in document order, element children, text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated character data (text and CDATA) directly inside this element
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn from_start(start: &StartElement<'_>) -> Self {
        let mut element = Element::new(String::from_utf8_lossy(&start.name));
        element.attributes = owned_attributes(&start.attributes);
        element
    }

    /// Builder-style attribute setter, mostly for tests and programmatic trees
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style child setter
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Raw attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with the given name, in document order
    pub fn children_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Element> + 's {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Parse a standalone fragment (exactly one root element) into a tree
    pub fn parse_fragment(input: &[u8]) -> Result<Element, ParseError> {
        let mut reader = SliceReader::new(input);
        let mut structure = StructureCheck::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        while let Some(event) = reader.next_event() {
            if matches!(event, XmlEvent::EndDocument) {
                break;
            }
            structure.observe(&event, reader.position())?;

            match event {
                XmlEvent::StartElement(start) => {
                    stack.push(Element::from_start(&start));
                }
                XmlEvent::EmptyElement(start) => {
                    attach(&mut stack, &mut root, Element::from_start(&start));
                }
                XmlEvent::EndElement(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                XmlEvent::Text(content) | XmlEvent::CData(content) => {
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&String::from_utf8_lossy(&content));
                    }
                }
                _ => {}
            }
        }

        if let Some(err) = reader.take_error() {
            return Err(err);
        }
        structure.finish(input.len())?;
        root.ok_or_else(|| ParseError::new("Fragment has no root element", 0))
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

fn owned_attributes(attributes: &[crate::core::attributes::Attribute<'_>]) -> Vec<(String, String)> {
    attributes
        .iter()
        .map(|a| {
            (
                String::from_utf8_lossy(&a.name).into_owned(),
                String::from_utf8_lossy(&a.value).into_owned(),
            )
        })
        .collect()
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
