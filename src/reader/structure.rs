//! Document structure checks shared by the streaming and fragment paths
//!
//! Tokens only prove that each construct is well formed on its own. This
//! tracks the open element stack so that:
//! - every end tag matches the innermost open element by name
//! - there is exactly one root element
//! - no character data appears outside the root
//! - nothing is left open at end of input

use super::events::XmlEvent;
use crate::core::tokenizer::ParseError;

/// Open-element stack with root bookkeeping
#[derive(Debug, Default)]
pub struct StructureCheck {
    /// Open element names, innermost last
    stack: Vec<String>,
    seen_root: bool,
}

impl StructureCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the root element has been opened
    pub fn seen_root(&self) -> bool {
        self.seen_root
    }

    /// Feed one event; `position` is used for error reporting
    pub fn observe(&mut self, event: &XmlEvent<'_>, position: usize) -> Result<(), ParseError> {
        match event {
            XmlEvent::StartElement(elem) => {
                self.open_element(position)?;
                self.stack.push(String::from_utf8_lossy(&elem.name).into_owned());
            }
            XmlEvent::EmptyElement(_) => self.open_element(position)?,
            XmlEvent::EndElement(end) => match self.stack.pop() {
                Some(open) if open.as_bytes() == end.name.as_ref() => {}
                Some(open) => {
                    let end_str = String::from_utf8_lossy(&end.name);
                    return Err(ParseError::new(
                        format!("Tag mismatch: <{}> closed with </{}>", open, end_str),
                        position,
                    ));
                }
                None => {
                    let end_str = String::from_utf8_lossy(&end.name);
                    return Err(ParseError::new(
                        format!("Unexpected end tag: </{}> without matching start tag", end_str),
                        position,
                    ));
                }
            },
            XmlEvent::Text(_) if self.stack.is_empty() && !event.is_blank() => {
                return Err(ParseError::new("Text content not allowed at document level", position));
            }
            XmlEvent::CData(_) if self.stack.is_empty() => {
                return Err(ParseError::new("CDATA section not allowed at document level", position));
            }
            XmlEvent::DocType if self.seen_root => {
                return Err(ParseError::new("DOCTYPE not allowed after root element", position));
            }
            _ => {}
        }
        Ok(())
    }

    /// End of input: the root must exist and be closed
    pub fn finish(&self, position: usize) -> Result<(), ParseError> {
        match self.stack.last() {
            Some(open) => Err(ParseError::new(format!("Unclosed element: <{}>", open), position)),
            None => Ok(()),
        }
    }

    fn open_element(&mut self, position: usize) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err(ParseError::new("Content not allowed after root element", position));
            }
            self.seen_root = true;
        }
        Ok(())
    }
}
