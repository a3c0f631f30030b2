//! DBpedia triple namespace stripping and short-abstract text cleanup.

/// Namespace IRIs stripped from a DBpedia/Wikidata triple's
/// subject/predicate/object when normalizing a parsed (already
/// tokenized) N-Triples/Turtle line.
pub const KNOWN_PREFIXES: &[&str] = &[
    "http://www.wikidata.org/entity/",
    "http://www.wikidata.org/prop/direct/",
    "http://www.wikidata.org/prop/statement/",
    "http://dbpedia.org/resource/",
    "http://dbpedia.org/ontology/",
    "http://dbpedia.org/property/",
    "http://en.wikipedia.org/wiki/",
    "http://xmlns.com/foaf/0.1/",
    "http://purl.org/dc/elements/1.1/",
];

/// Strip a `<...>`-bracketed IRI down to its bare local name by
/// removing a matching entry from [`KNOWN_PREFIXES`], if any.
#[must_use]
pub fn strip_known_prefix(namespace: &str) -> String {
    let unbracketed = namespace
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(namespace);
    for prefix in KNOWN_PREFIXES {
        if let Some(stripped) = unbracketed.strip_prefix(prefix) {
            return stripped.to_string();
        }
    }
    unbracketed.to_string()
}

/// Clean a DBpedia short-abstract/description string of leftover
/// wikitext link markup and stray unmatched parentheses.
#[must_use]
pub fn clean_text_brackets(text: &str) -> String {
    let mut text = text.to_string();

    if text.contains("[[") && text.contains("]]") && text.contains('#') {
        let stripped = strip_double_bracket_span(&text);
        text = if stripped == text { String::new() } else { stripped.trim().to_string() };
    }
    if text.contains("[[") && text.contains('#') && !text.contains("]]") {
        text = strip_from_open_bracket(&text).trim().to_string();
    }
    if text.contains("]]") && !text.contains("[[") {
        text = strip_to_close_bracket(&text).trim().to_string();
    }

    if text.to_lowercase().contains("see") {
        return String::new();
    }

    if text.contains('(') && !text.contains(')') {
        text = text.replace('(', "").trim().to_string();
    }
    if text.contains(')') && !text.contains('(') {
        text = text.replace(')', "").trim().to_string();
    }
    text
}

fn strip_double_bracket_span(text: &str) -> String {
    match (text.find("[["), text.rfind("]]")) {
        (Some(start), Some(end)) if end + 2 > start => {
            format!("{}{}", &text[..start], &text[end + 2..])
        }
        _ => text.to_string(),
    }
}

fn strip_from_open_bracket(text: &str) -> String {
    match text.find("[[") {
        Some(start) => text[..start].to_string(),
        None => text.to_string(),
    }
}

fn strip_to_close_bracket(text: &str) -> String {
    match text.rfind("]]") {
        Some(end) => text[end + 2..].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_wikidata_prefix() {
        assert_eq!(
            strip_known_prefix("<http://www.wikidata.org/entity/Q1490>"),
            "Q1490"
        );
    }

    #[test]
    fn unknown_namespace_passes_through_unbracketed() {
        assert_eq!(strip_known_prefix("<http://example.org/x>"), "http://example.org/x");
    }

    #[test]
    fn removes_unmatched_open_paren() {
        assert_eq!(clean_text_brackets("a city (in Japan"), "a city in Japan");
    }

    #[test]
    fn removes_unmatched_close_paren() {
        assert_eq!(clean_text_brackets("a city) in Japan"), "a city in Japan");
    }

    #[test]
    fn see_reference_text_becomes_empty() {
        assert_eq!(clean_text_brackets("See also: Other Article"), "");
    }
}
