//! Name-bearing Wikidata properties and the human-name abbreviation
//! heuristic used when building the label vocabulary.

/// Wikidata properties whose claim values are themselves names worth
/// indexing as labels (catalog codes, pseudonyms, nicknames, and
/// similar). Deduplicated from the source configuration's property
/// list.
pub const WD_ENTITY_NAME_PROPS: &[&str] = &[
    "P528",  // catalog code
    "P3083", // SIMBAD ID
    "P3382", // GeneDB ID
    "P742",  // pseudonym
    "P1845", // anti-virus alias
    "P8338", // applies to name of value
    "P5168", // applies to name of item
    "P1449", // nickname
    "P4970", // alternate names
    "P2561", // name
    "P1448", // official name
    "P1813", // short name
    "P1843", // taxon common name
    "P1476", // title
    "P735",  // given name
    "P1533", // family name identical to this given name
    "P1950", // second family name in Spanish name
    "P8253", // OSM Name Suggestion Index identifier
    "P960",  // Tropicos scientific name ID
    "P9382", // Unicode character name
    "P4633", // name of the character role
];

/// `true` if `pid` is one of [`WD_ENTITY_NAME_PROPS`].
#[must_use]
pub fn is_entity_name_prop(pid: &str) -> bool {
    WD_ENTITY_NAME_PROPS.contains(&pid)
}

/// Derive an abbreviated "F. Lastname" form of a human's full label,
/// for a `Q5` (human) entity whose canonical label has more than one
/// space-separated token. Returns `None` when the label is a single
/// token (nothing to abbreviate) or empty.
#[must_use]
pub fn human_name_abbreviation(label: &str) -> Option<String> {
    let parts: Vec<&str> = label.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    let first_initial = parts[0].chars().next()?;
    Some(format!("{first_initial}. {}", parts[1..].join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_props_are_deduplicated() {
        let mut seen = std::collections::HashSet::new();
        for pid in WD_ENTITY_NAME_PROPS {
            assert!(seen.insert(*pid), "duplicate {pid}");
        }
    }

    #[test]
    fn abbreviates_multi_word_name() {
        assert_eq!(
            human_name_abbreviation("Barack Obama").as_deref(),
            Some("B. Obama")
        );
        assert_eq!(
            human_name_abbreviation("Jean Baptiste Poquelin").as_deref(),
            Some("J. Baptiste Poquelin")
        );
    }

    #[test]
    fn single_token_label_has_no_abbreviation() {
        assert_eq!(human_name_abbreviation("Madonna"), None);
        assert_eq!(human_name_abbreviation(""), None);
    }
}
