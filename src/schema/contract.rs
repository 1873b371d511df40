//! Attribute contracts and build scopes

use crate::diagnostics::DiagnosticSink;
use crate::dom::Element;

/// When an attribute must carry a non-blank value
#[derive(Clone, Copy)]
pub enum Requirement {
    Always,
    Never,
    /// Required when the predicate holds for the element being built
    When(fn(&Scope<'_>) -> bool),
    /// Missing values are reported to the diagnostics sink, the build continues
    Soft,
}

impl std::fmt::Debug for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::Always => f.write_str("Always"),
            Requirement::Never => f.write_str("Never"),
            Requirement::When(_) => f.write_str("When(..)"),
            Requirement::Soft => f.write_str("Soft"),
        }
    }
}

/// One attribute contract entry: source attribute name plus requiredness
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    /// XML attribute name as it appears on the wire, e.g. `name.en`
    pub name: &'static str,
    /// Struct field the value lands in
    pub field: &'static str,
    pub requirement: Requirement,
}

impl AttributeSpec {
    pub const fn new(name: &'static str, field: &'static str, requirement: Requirement) -> Self {
        AttributeSpec {
            name,
            field,
            requirement,
        }
    }
}

/// Element being built plus its ancestor chain
///
/// Scopes live on the stack of the recursive build; wrapper elements such as
/// `AGEGROUPS` get a scope of their own so predicates see the direct parent.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub element: &'a Element,
    pub parent: Option<&'a Scope<'a>>,
    pub sink: &'a dyn DiagnosticSink,
}

impl<'a> Scope<'a> {
    pub fn root(element: &'a Element, sink: &'a dyn DiagnosticSink) -> Self {
        Scope {
            element,
            parent: None,
            sink,
        }
    }

    /// Scope for a child element of this one
    pub fn enter<'b>(&'b self, element: &'b Element) -> Scope<'b> {
        Scope {
            element,
            parent: Some(self),
            sink: self.sink,
        }
    }

    /// Name of the direct parent element, if any
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.map(|p| p.element.name.as_str())
    }

    /// Raw attribute of the element being built
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.element.attribute(name)
    }

    /// Ancestors from the direct parent outwards
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Scope<'a>> {
        std::iter::successors(self.parent, |scope| scope.parent)
    }
}
