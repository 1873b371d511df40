//! Entity traits and the declaration macro
//!
//! An entity is declared once with [`entity!`]: its element name, its
//! attribute contract and its associations. The macro generates the struct,
//! the [`Entity`] impl the builder drives and the [`Node`] impl the serializer
//! walks, so both directions share one declaration.

use super::contract::{AttributeSpec, Scope};
use crate::diagnostics::DiagnosticSink;
use crate::dom::Element;
use crate::error::SchemaError;

/// Serializer view of a built value
pub trait Node {
    /// `(source attribute name, value)` pairs in contract order, absent values skipped
    fn attributes(&self) -> Vec<(&'static str, &str)>;

    /// `(field name, association)` pairs in declaration order
    fn associations(&self) -> Vec<(&'static str, Association<'_>)>;
}

/// One association of a value, as seen by the serializer
pub enum Association<'a> {
    /// Singular child element
    One(Option<&'a dyn Node>),
    /// Wrapper element with one child per item
    Many(Vec<&'a dyn Node>),
    /// Attributes written onto the owning element
    Inline(Option<&'a dyn Node>),
}

/// A value built from one element under a declared contract
pub trait Entity: Node + Sized {
    /// Element name used in error messages, e.g. `MEET`
    const ELEMENT: &'static str;

    /// Attribute contract, in the order values are checked and written
    const ATTRIBUTES: &'static [AttributeSpec];

    fn build(scope: &Scope<'_>) -> Result<Self, SchemaError>;

    /// Build from a standalone element with no ancestors
    fn from_element(element: &Element, sink: &dyn DiagnosticSink) -> Result<Self, SchemaError> {
        Self::build(&Scope::root(element, sink))
    }
}

/// Declare an entity struct together with its contract
///
/// ```ignore
/// entity! {
///     pub struct Split: "SPLIT" {
///         attributes {
///             distance: "distance" => Always,
///             swim_time: "swimtime" => Always,
///         }
///     }
/// }
/// ```
///
/// Association kinds: `one` (`Option<T>`), `required` (`T`), `many`
/// (`Vec<T>`), `nonempty` (`Vec<T>`, wrapper and one item required) and
/// `inline` (`Option<T>` read from the owner's attributes).
macro_rules! entity {
    (
        $(#[$meta:meta])*
        pub struct $name:ident : $element:literal {
            attributes {
                $( $(#[$fmeta:meta])* $attr:ident : $xml:literal $(=> $req:expr)? ),* $(,)?
            }
            $( associations {
                $( $(#[$ameta:meta])* $assoc:ident : $kind:ident $ty:ty ),* $(,)?
            } )?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $attr: Option<String>, )*
            $($( $(#[$ameta])* pub $assoc: $crate::schema::entity::child_type!($kind $ty), )*)?
        }

        impl $crate::schema::Entity for $name {
            const ELEMENT: &'static str = $element;

            const ATTRIBUTES: &'static [$crate::schema::AttributeSpec] = &[
                $( $crate::schema::AttributeSpec::new(
                    $xml,
                    stringify!($attr),
                    $crate::schema::entity::requirement!($($req)?),
                ), )*
            ];

            fn build(
                scope: &$crate::schema::Scope<'_>,
            ) -> Result<Self, $crate::error::SchemaError> {
                let mut values =
                    $crate::schema::builder::attributes(scope, $element, Self::ATTRIBUTES)?.into_iter();
                Ok($name {
                    $( $attr: values.next().flatten(), )*
                    $($( $assoc: $crate::schema::entity::build_child!($kind, scope, $element, $assoc, $ty), )*)?
                })
            }
        }

        impl $crate::schema::Node for $name {
            fn attributes(&self) -> Vec<(&'static str, &str)> {
                let mut out = Vec::new();
                $( if let Some(value) = self.$attr.as_deref() {
                    out.push(($xml, value));
                } )*
                out
            }

            fn associations(&self) -> Vec<(&'static str, $crate::schema::Association<'_>)> {
                vec![
                    $($( (stringify!($assoc), $crate::schema::entity::association!($kind, self.$assoc)), )*)?
                ]
            }
        }
    };
}

macro_rules! requirement {
    () => {
        $crate::schema::Requirement::Never
    };
    ($req:expr) => {
        $req
    };
}

macro_rules! child_type {
    (one $ty:ty) => { Option<$ty> };
    (required $ty:ty) => { $ty };
    (many $ty:ty) => { Vec<$ty> };
    (nonempty $ty:ty) => { Vec<$ty> };
    (inline $ty:ty) => { Option<$ty> };
}

macro_rules! build_child {
    (one, $scope:ident, $owner:expr, $field:ident, $ty:ty) => {
        $crate::schema::builder::one::<$ty>($scope, stringify!($field))?
    };
    (required, $scope:ident, $owner:expr, $field:ident, $ty:ty) => {
        $crate::schema::builder::required::<$ty>($scope, $owner, stringify!($field))?
    };
    (many, $scope:ident, $owner:expr, $field:ident, $ty:ty) => {
        $crate::schema::builder::many::<$ty>($scope, stringify!($field))?
    };
    (nonempty, $scope:ident, $owner:expr, $field:ident, $ty:ty) => {
        $crate::schema::builder::nonempty::<$ty>($scope, $owner, stringify!($field))?
    };
    (inline, $scope:ident, $owner:expr, $field:ident, $ty:ty) => {
        $crate::schema::builder::inline::<$ty>($scope)?
    };
}

macro_rules! association {
    (one, $value:expr) => {
        $crate::schema::Association::One($value.as_ref().map(|v| v as &dyn $crate::schema::Node))
    };
    (required, $value:expr) => {
        $crate::schema::Association::One(Some(&$value as &dyn $crate::schema::Node))
    };
    (many, $value:expr) => {
        $crate::schema::Association::Many($value.iter().map(|v| v as &dyn $crate::schema::Node).collect())
    };
    (nonempty, $value:expr) => {
        $crate::schema::Association::Many($value.iter().map(|v| v as &dyn $crate::schema::Node).collect())
    };
    (inline, $value:expr) => {
        $crate::schema::Association::Inline($value.as_ref().map(|v| v as &dyn $crate::schema::Node))
    };
}

pub(crate) use {association, build_child, child_type, entity, requirement};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::schema::Requirement::{Always, Soft};

    entity! {
        pub struct Leaf: "LEAF" {
            attributes {
                code: "code" => Always,
                label_en: "label.en",
            }
        }
    }

    entity! {
        pub struct Branch: "BRANCH" {
            attributes {
                note: "note" => Soft,
            }
            associations {
                leaf: one Leaf,
                leaves: many Leaf,
            }
        }
    }

    #[test]
    fn test_generated_contract() {
        let names: Vec<_> = Leaf::ATTRIBUTES.iter().map(|a| (a.name, a.field)).collect();
        assert_eq!(names, vec![("code", "code"), ("label.en", "label_en")]);
        assert_eq!(Leaf::ELEMENT, "LEAF");
    }

    #[test]
    fn test_build_and_view() {
        let element = Element::new("BRANCH")
            .with_child(Element::new("LEAF").with_attribute("code", "a"))
            .with_child(
                Element::new("LEAVES")
                    .with_child(Element::new("LEAF").with_attribute("code", "b"))
                    .with_child(Element::new("LEAF").with_attribute("code", "c").with_attribute("label.en", "C")),
            );
        let sink = CollectingSink::new();
        let branch = Branch::from_element(&element, &sink).unwrap();

        assert_eq!(branch.note, None);
        assert_eq!(sink.messages(), vec!["BRANCH note attribute is required"]);
        assert_eq!(branch.leaf.as_ref().and_then(|l| l.code.as_deref()), Some("a"));
        assert_eq!(branch.leaves.len(), 2);
        assert_eq!(branch.leaves[1].attributes(), vec![("code", "c"), ("label.en", "C")]);

        let associations = branch.associations();
        assert_eq!(associations.len(), 2);
        assert!(matches!(&associations[1], ("leaves", Association::Many(items)) if items.len() == 2));
    }

    #[test]
    fn test_nested_failure_is_atomic() {
        let element = Element::new("BRANCH").with_child(Element::new("LEAVES").with_child(Element::new("LEAF")));
        let err = Branch::from_element(&element, &CollectingSink::new()).unwrap_err();
        assert_eq!(err.message, "LEAF code attribute is required");
    }
}
