//! Small lexical helpers shared by the deterministic analyzers.

/// True when `term` occurs in `haystack` on word boundaries.
///
/// Both inputs are expected lowercase. Boundaries are any non-alphanumeric
/// character, so "go" does not match inside "google" but "node.js" matches
/// in "built node.js services".
pub fn contains_term(haystack: &str, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(term) {
        let start = from + pos;
        let end = start + term.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        from = start + term.chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Lowercase word tokens (letters, digits and `+ # . /` joined).
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/' | '-')))
        .map(|t| t.trim_matches(|c: char| matches!(c, '.' | '-' | '/')))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `text` opens with one of `phrases` (case-insensitive, word-bounded).
pub fn opening_phrase<'a>(text: &str, phrases: &[&'a str]) -> Option<&'a str> {
    let lower = text.trim_start().to_lowercase();
    phrases.iter().copied().find(|p| {
        lower.starts_with(p)
            && lower[p.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}
