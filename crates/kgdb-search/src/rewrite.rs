//! Query-string rewriting (§4.9 step 3): drop bracketed asides before
//! searching, and try a quoted-in-parens aside as an alternative query
//! whose hits get unioned in.

/// Drop content inside `(...)` and `[...]`, collapsing the surrounding
/// whitespace left behind. Unbalanced brackets pass the rest of the
/// string through unchanged rather than swallowing it.
#[must_use]
pub fn strip_bracketed(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = (depth - 1).max(0),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the content of a `("...")` aside, if present, as an
/// alternative query candidate.
#[must_use]
pub fn quoted_paren_alternative(text: &str) -> Option<String> {
    let start = text.find("(\"")? + 2;
    let end = start + text[start..].find("\")")?;
    let inner = text[start..end].trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// Every variant of `text` worth searching: the bracket-stripped base
/// query, plus a quoted-parenthetical alternative when present.
#[must_use]
pub fn query_variants(text: &str) -> Vec<String> {
    let mut variants = vec![strip_bracketed(text)];
    if let Some(alt) = quoted_paren_alternative(text) {
        if !variants.contains(&alt) {
            variants.push(alt);
        }
    }
    variants.retain(|v| !v.is_empty());
    if variants.is_empty() {
        variants.push(text.to_string());
    }
    variants
}
