//! Field name to element name mapping
//!
//! Builders and the serializer both derive element names from association
//! field names through these two functions, so what one reads the other writes.

/// `meet_info` -> `MEETINFO`, `relay_positions` -> `RELAYPOSITIONS`
pub fn element_name_for(field: &str) -> String {
    field
        .chars()
        .filter(|&c| c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Per-item element name for a collection wrapper
///
/// `AGEGROUPS` -> `AGEGROUP`, `ENTRIES` -> `ENTRY`. A double trailing `S`
/// loses only one character.
pub fn singular_element(container: &str) -> String {
    if !container.ends_with('S') {
        return container.to_string();
    }
    if container.ends_with("SS") {
        return container[..container.len() - 1].to_string();
    }

    let mut name = match container.strip_suffix("IES") {
        Some(stem) => format!("{}Y", stem),
        None => container.to_string(),
    };
    if name.ends_with('S') {
        name.pop();
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_name_for() {
        assert_eq!(element_name_for("meet_info"), "MEETINFO");
        assert_eq!(element_name_for("time_standard_refs"), "TIMESTANDARDREFS");
        assert_eq!(element_name_for("contact"), "CONTACT");
    }

    #[test]
    fn test_singular_element() {
        assert_eq!(singular_element("MEETS"), "MEET");
        assert_eq!(singular_element("ENTRIES"), "ENTRY");
        assert_eq!(singular_element("RELAYPOSITIONS"), "RELAYPOSITION");
        assert_eq!(singular_element("FEES"), "FEE");
        assert_eq!(singular_element("ADDRESS"), "ADDRES");
        assert_eq!(singular_element("CONTACT"), "CONTACT");
    }
}
