//! Wikipedia page-title normalization and namespace filtering.

/// Namespace prefixes (lowercase, trailing colon) that are never
/// content articles and get skipped during ingestion.
pub const IGNORED_NAMESPACES: &[&str] = &[
    "wikipedia:",
    "file:",
    "portal:",
    "template:",
    "mediawiki:",
    "user:",
    "help:",
    "book:",
    "draft:",
    "module:",
    "timedtext:",
];

/// `true` if `title` starts with one of [`IGNORED_NAMESPACES`],
/// case-insensitively.
#[must_use]
pub fn is_ignored_namespace(title: &str) -> bool {
    let lower = title.to_lowercase();
    IGNORED_NAMESPACES.iter().any(|ns| lower.starts_with(ns))
}

/// Normalize a raw Wikipedia page title: upper-case the first
/// character and replace underscores with spaces, the canonical form
/// MediaWiki stores titles in internally. A single-character title is
/// just upper-cased. Empty input is returned unchanged.
#[must_use]
pub fn norm_wikipedia_title(title: &str) -> String {
    let mut chars = title.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let rest: String = chars.collect();
            if rest.is_empty() {
                first.to_uppercase().collect()
            } else {
                format!("{}{}", first.to_uppercase(), rest.replace('_', " "))
            }
        }
    }
}
