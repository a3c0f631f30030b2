//! QID/PID pattern recognition.
//!
//! Pattern: `[QP][0-9]+`, length >= 2, no spaces. Used both to
//! short-circuit search (`Q17` is always its own answer) and to skip
//! interning identifier-looking strings as free-text labels.

use thiserror::Error;

/// Error returned when a string fails the QID/PID pattern check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityIdError {
    /// The string was empty or shorter than the minimum `[QP]<digit>` length.
    #[error("identifier too short")]
    TooShort,
    /// The first character was not `Q` or `P`.
    #[error("missing Q/P prefix")]
    BadPrefix,
    /// A character after the prefix was not an ASCII digit.
    #[error("non-digit suffix")]
    NonDigitSuffix,
}

/// Returns `true` if `text` matches the Wikidata QID/PID pattern:
/// a leading `Q` or `P`, followed by one or more ASCII digits, overall
/// length at least 2, and no whitespace.
///
/// ```
/// use kgdb_core::is_identifier_pattern;
///
/// assert!(is_identifier_pattern("Q17"));
/// assert!(is_identifier_pattern("P31"));
/// assert!(!is_identifier_pattern("Q"));
/// assert!(!is_identifier_pattern("Tokyo"));
/// assert!(!is_identifier_pattern("Q1 7"));
/// ```
#[must_use]
pub fn is_identifier_pattern(text: &str) -> bool {
    parse_identifier_pattern(text).is_ok()
}

/// Same check as [`is_identifier_pattern`] but returns the reason for
/// rejection, useful when logging skipped ingest records at `debug`.
pub fn parse_identifier_pattern(text: &str) -> Result<(), EntityIdError> {
    if text.len() < 2 {
        return Err(EntityIdError::TooShort);
    }
    let mut chars = text.chars();
    match chars.next() {
        Some('Q' | 'P') => {}
        _ => return Err(EntityIdError::BadPrefix),
    }
    let rest = &text[1..];
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err(EntityIdError::NonDigitSuffix);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_qid_and_pid() {
        assert!(is_identifier_pattern("Q1490"));
        assert!(is_identifier_pattern("P31"));
        assert!(is_identifier_pattern("Q1"));
    }

    #[test]
    fn rejects_too_short() {
        assert_eq!(parse_identifier_pattern("Q"), Err(EntityIdError::TooShort));
        assert_eq!(parse_identifier_pattern(""), Err(EntityIdError::TooShort));
    }

    #[test]
    fn rejects_bad_prefix() {
        assert_eq!(
            parse_identifier_pattern("X17"),
            Err(EntityIdError::BadPrefix)
        );
    }

    #[test]
    fn rejects_embedded_whitespace() {
        assert_eq!(
            parse_identifier_pattern("Q1 7"),
            Err(EntityIdError::NonDigitSuffix)
        );
    }

    #[test]
    fn rejects_non_digit_suffix() {
        assert_eq!(
            parse_identifier_pattern("Qabc"),
            Err(EntityIdError::NonDigitSuffix)
        );
    }

    #[test]
    fn lowercase_is_rejected() {
        assert!(!is_identifier_pattern("q17"));
    }
}
