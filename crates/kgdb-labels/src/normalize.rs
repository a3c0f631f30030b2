//! Label normalization pipeline (§4.7): text repair, NFKC, casefolding,
//! duplicate-letter collapse, article/punctuation stripping, whitespace
//! collapse. Run twice per label (punctuation preserved and stripped)
//! since both forms get indexed.

use unicode_normalization::UnicodeNormalization;

/// Invisible/format (Unicode category `Cf`) code points stripped before
/// NFKC. Not an exhaustive `Cf` table — covers the BOM, bidi controls,
/// and zero-width joiners that actually show up in scraped dump text,
/// which is what the original's `ftfy`/`unicodedata` pass catches in
/// practice.
const FORMAT_CODEPOINTS: &[char] = &[
    '\u{00AD}', '\u{200B}', '\u{200C}', '\u{200D}', '\u{200E}', '\u{200F}', '\u{202A}',
    '\u{202B}', '\u{202C}', '\u{202D}', '\u{202E}', '\u{2060}', '\u{2061}', '\u{2062}',
    '\u{2063}', '\u{2064}', '\u{FEFF}', '\u{FFF9}', '\u{FFFA}', '\u{FFFB}',
];

const ARTICLES: &[&str] = &["a", "an", "the", "and"];

/// Options controlling one normalization pass.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    /// Strip ASCII punctuation, but only if the result is non-empty.
    pub strip_punctuation: bool,
    /// Drop whole-word `a`/`an`/`the`/`and` tokens.
    pub remove_article: bool,
    /// Casefold to lowercase.
    pub lower: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions { strip_punctuation: false, remove_article: false, lower: true }
    }
}

/// Best-effort mojibake repair: recover a UTF-8 string that was
/// mis-decoded as Latin-1 (the common "â€™" pattern) by round-tripping
/// every character's low byte back through UTF-8. A no-op when the
/// round-trip isn't valid UTF-8, which is the common case for clean
/// input.
#[must_use]
pub fn repair_mojibake(text: &str) -> String {
    if !text.chars().any(|c| c as u32 > 0x7F && (c as u32) < 0x100) {
        return text.to_string();
    }
    let bytes: Vec<u8> = text.chars().filter_map(|c| u8::try_from(c as u32).ok()).collect();
    if bytes.len() != text.chars().count() {
        return text.to_string();
    }
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}

fn strip_format_codepoints(text: &str) -> String {
    text.chars().filter(|c| !FORMAT_CODEPOINTS.contains(c)).collect()
}

fn collapse_repeated_letters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;
    for c in text.chars() {
        let is_letter = c.is_ascii_alphabetic();
        if is_letter && Some(c) == run_char {
            run_len += 1;
        } else {
            run_char = if is_letter { Some(c) } else { None };
            run_len = 1;
        }
        if run_len <= 2 {
            out.push(c);
        }
    }
    out
}

fn remove_articles(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !ARTICLES.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_ascii_punctuation(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    if stripped.trim().is_empty() {
        text.to_string()
    } else {
        stripped
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run the full §4.7 normalization pipeline, in the order the
/// specification lists it: repair, NFKC, casefold, collapse repeated
/// letters, optional article removal, optional punctuation stripping,
/// whitespace collapse.
#[must_use]
pub fn normalize(text: &str, opts: NormalizeOptions) -> String {
    let repaired = repair_mojibake(text);
    let no_format = strip_format_codepoints(&repaired);
    let nfkc: String = no_format.nfkc().collect();
    let mut out = if opts.lower { nfkc.to_lowercase() } else { nfkc };
    out = collapse_repeated_letters(&out);
    if opts.remove_article {
        out = remove_articles(&out);
    }
    if opts.strip_punctuation {
        out = strip_ascii_punctuation(&out);
    }
    collapse_whitespace(&out)
}

/// Produce both indexed forms of `text`: punctuation-preserving and
/// punctuation-stripped, both lowercased with articles kept (matching
/// the vocabulary builder's `get_lid` two-form insert).
#[must_use]
pub fn normalize_forms(text: &str) -> (String, String) {
    let base = NormalizeOptions { strip_punctuation: false, remove_article: false, lower: true };
    let with_punct = normalize(text, base);
    let without_punct =
        normalize(text, NormalizeOptions { strip_punctuation: true, ..base });
    (with_punct, without_punct)
}

/// `true` if `text` decodes as pure ASCII, used to route a label into
/// the `*_EN` vs `*_ALL` columns.
#[must_use]
pub fn is_ascii(text: &str) -> bool {
    text.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_long_repeated_runs_to_two() {
        assert_eq!(collapse_repeated_letters("floridaaa"), "floridaa");
        assert_eq!(collapse_repeated_letters("aaaa"), "aa");
    }

    #[test]
    fn keeps_short_runs_untouched() {
        assert_eq!(collapse_repeated_letters("book"), "book");
    }

    #[test]
    fn article_removal_drops_whole_words_only() {
        assert_eq!(remove_articles("the cat and the hat"), "cat hat");
        assert_eq!(remove_articles("andorra"), "andorra");
    }

    #[test]
    fn punctuation_stripped_unless_result_is_empty() {
        assert_eq!(strip_ascii_punctuation("hello, world!"), "hello world");
        assert_eq!(strip_ascii_punctuation("@l%bam$"), "lbam");
        assert_eq!(strip_ascii_punctuation("..."), "...");
    }

    #[test]
    fn normalize_lowercases_and_collapses_whitespace() {
        let out = normalize("  Tokyo   City  ", NormalizeOptions::default());
        assert_eq!(out, "tokyo city");
    }

    #[test]
    fn normalize_forms_differ_only_in_punctuation() {
        let (with_punct, without_punct) = normalize_forms("Tokyo, Japan");
        assert_eq!(with_punct, "tokyo, japan");
        assert_eq!(without_punct, "tokyo japan");
    }

    #[test]
    fn is_ascii_detects_non_ascii_labels() {
        assert!(is_ascii("Tokyo"));
        assert!(!is_ascii("東京"));
    }

    #[test]
    fn nfkc_folds_compatibility_characters() {
        let out = normalize("ﬁle", NormalizeOptions::default());
        assert_eq!(out, "file");
    }
}
