//! Generic entity builder
//!
//! Every entity type funnels through the same few functions: attribute
//! extraction over its contract, then one helper per association kind.
//! A failure anywhere aborts the whole subtree; nothing partially built is
//! returned.

use super::contract::{AttributeSpec, Requirement, Scope};
use super::entity::Entity;
use super::naming::{element_name_for, singular_element};
use crate::diagnostics::Diagnostic;
use crate::error::SchemaError;

/// Read the contract's attributes in declared order.
///
/// The first missing required value fails the build; later entries are not
/// looked at. Blank optional values come back as `None`.
pub fn attributes(
    scope: &Scope<'_>,
    element: &str,
    contract: &[AttributeSpec],
) -> Result<Vec<Option<String>>, SchemaError> {
    let mut values = Vec::with_capacity(contract.len());

    for spec in contract {
        let value = scope
            .attribute(spec.name)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string);

        if value.is_none() {
            match spec.requirement {
                Requirement::Always => {
                    return Err(SchemaError::missing_attribute(element, spec.name));
                }
                Requirement::When(required) if required(scope) => {
                    return Err(SchemaError::missing_attribute(element, spec.name));
                }
                Requirement::Soft => {
                    scope
                        .sink
                        .warn(&Diagnostic::missing_attribute(element, spec.name));
                }
                _ => {}
            }
        }

        values.push(value);
    }

    Ok(values)
}

/// Optional singular child
pub fn one<T: Entity>(scope: &Scope<'_>, field: &str) -> Result<Option<T>, SchemaError> {
    let name = element_name_for(field);
    match scope.element.child(&name) {
        Some(child) => T::build(&scope.enter(child)).map(Some),
        None => Ok(None),
    }
}

/// Singular child that must be present
pub fn required<T: Entity>(scope: &Scope<'_>, owner: &str, field: &str) -> Result<T, SchemaError> {
    let name = element_name_for(field);
    match scope.element.child(&name) {
        Some(child) => T::build(&scope.enter(child)),
        None => Err(SchemaError::missing_element(&format!("{} {}", owner, name))),
    }
}

/// Collection under a wrapper element; an absent wrapper is an empty collection
pub fn many<T: Entity>(scope: &Scope<'_>, field: &str) -> Result<Vec<T>, SchemaError> {
    let wrapper_name = element_name_for(field);
    match scope.element.child(&wrapper_name) {
        Some(wrapper) => items(scope, wrapper, &wrapper_name),
        None => Ok(Vec::new()),
    }
}

/// Collection whose wrapper must exist and hold at least one item
pub fn nonempty<T: Entity>(scope: &Scope<'_>, owner: &str, field: &str) -> Result<Vec<T>, SchemaError> {
    let wrapper_name = element_name_for(field);
    let wrapper = scope
        .element
        .child(&wrapper_name)
        .ok_or_else(|| SchemaError::missing_element(&format!("{} {}", owner, wrapper_name)))?;

    let built: Vec<T> = items(scope, wrapper, &wrapper_name)?;
    if built.is_empty() {
        return Err(SchemaError::new(format!(
            "{} must include at least one {} element",
            owner,
            singular_element(&wrapper_name)
        )));
    }
    Ok(built)
}

/// Association stored in the owner's own attributes
pub fn inline<T: Entity>(scope: &Scope<'_>) -> Result<Option<T>, SchemaError> {
    let value = T::build(scope)?;
    if value.attributes().is_empty() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

fn items<T: Entity>(
    scope: &Scope<'_>,
    wrapper: &crate::dom::Element,
    wrapper_name: &str,
) -> Result<Vec<T>, SchemaError> {
    let wrapper_scope = scope.enter(wrapper);
    let item_name = singular_element(wrapper_name);
    wrapper
        .children_named(&item_name)
        .map(|item| T::build(&wrapper_scope.enter(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, TracingSink};
    use crate::dom::Element;

    fn no_type_unattached(scope: &Scope<'_>) -> bool {
        scope.attribute("type") != Some("UNATTACHED")
    }

    const CONTRACT: &[AttributeSpec] = &[
        AttributeSpec::new("name", "name", Requirement::When(no_type_unattached)),
        AttributeSpec::new("code", "code", Requirement::Never),
        AttributeSpec::new("nation", "nation", Requirement::Always),
        AttributeSpec::new("region", "region", Requirement::Soft),
    ];

    #[test]
    fn test_blank_optional_is_none() {
        let element = Element::new("CLUB")
            .with_attribute("name", "Club")
            .with_attribute("code", "  ")
            .with_attribute("nation", "SUI")
            .with_attribute("region", "BE");
        let values = attributes(&Scope::root(&element, &TracingSink), "CLUB", CONTRACT).unwrap();
        assert_eq!(
            values,
            vec![Some("Club".into()), None, Some("SUI".into()), Some("BE".into())]
        );
    }

    #[test]
    fn test_first_missing_wins() {
        let element = Element::new("CLUB");
        let err = attributes(&Scope::root(&element, &TracingSink), "CLUB", CONTRACT).unwrap_err();
        assert_eq!(err.message, "CLUB name attribute is required");
    }

    #[test]
    fn test_predicate_can_waive() {
        let element = Element::new("CLUB")
            .with_attribute("type", "UNATTACHED")
            .with_attribute("nation", "SUI");
        let sink = CollectingSink::new();
        let values = attributes(&Scope::root(&element, &sink), "CLUB", CONTRACT).unwrap();
        assert_eq!(values[0], None);
        assert_eq!(sink.messages(), vec!["CLUB region attribute is required"]);
    }
}
