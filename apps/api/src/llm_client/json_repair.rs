//! Extraction and repair of JSON-shaped text returned by the completion service.
//!
//! The model does not guarantee well-formed output: JSON may sit inside a
//! fenced block, follow a line of prose, use single quotes or bare keys,
//! carry trailing commas, or be cut off mid-object. `extract_json` finds the
//! most plausible JSON span and `repair_json` normalises it with a single
//! tolerant tokenizing pass (no fixed-iteration regex passes, so nesting
//! depth is unbounded).

use serde::de::DeserializeOwned;

use crate::errors::TailorError;

const FENCE: &str = "```";

/// Returns the most plausible JSON object span in `text`.
///
/// Tried in order: a fenced block ending the text, any fenced block, a
/// string-aware balanced-brace scan from the first `{`, and finally the
/// span from the first `{` to the last `}` (or to the end if unterminated).
pub fn extract_json(text: &str) -> String {
    trailing_fenced_block(text)
        .or_else(|| first_fenced_block(text))
        .or_else(|| balanced_object(text))
        .or_else(|| outer_brace_span(text))
        .unwrap_or(text)
        .trim()
        .to_string()
}

/// Normalises common malformations so the result parses as strict JSON.
///
/// Always safe to apply to already-valid JSON.
pub fn repair_json(text: &str) -> String {
    Repairer::new(text.trim()).run()
}

/// Extracts, repairs, and deserializes model output.
///
/// Failure is a `PARSE_ERROR` carrying excerpts of both raw and repaired text.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, TailorError> {
    let extracted = extract_json(raw);
    let repaired = repair_json(&extracted);
    serde_json::from_str(&repaired).map_err(|e| TailorError::parse(e.to_string(), raw, &repaired))
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

fn looks_like_json(candidate: &str) -> bool {
    candidate.contains('{') || candidate.trim_start().starts_with('[')
}

/// Skips a language tag line (```json) directly after an opening fence.
fn fence_body(after_open: &str) -> &str {
    match after_open.find('\n') {
        Some(i) if after_open[..i].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &after_open[i + 1..]
        }
        _ => after_open,
    }
}

fn trailing_fenced_block(text: &str) -> Option<&str> {
    let body = text.trim_end().strip_suffix(FENCE)?;
    let open = body.rfind(FENCE)?;
    let content = fence_body(&body[open + FENCE.len()..]);
    looks_like_json(content).then_some(content)
}

fn first_fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let rest = fence_body(&text[open + FENCE.len()..]);
    let close = rest.find(FENCE)?;
    let content = &rest[..close];
    looks_like_json(content).then_some(content)
}

/// Scans from the first `{` to its matching `}`, ignoring braces inside strings.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn outer_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        // Truncated output: keep everything after the first brace for repair.
        _ => Some(&text[start..]),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Repair
// ────────────────────────────────────────────────────────────────────────────

struct Repairer {
    chars: Vec<char>,
    out: String,
    /// Expected closing characters for currently open containers.
    closers: Vec<char>,
    /// Quote character of the string being copied, if inside one.
    quote: Option<char>,
    string_is_key: bool,
    last_token_was_key: bool,
}

impl Repairer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            out: String::with_capacity(text.len() + 8),
            closers: Vec::new(),
            quote: None,
            string_is_key: false,
            last_token_was_key: false,
        }
    }

    fn run(mut self) -> String {
        let mut i = 0;
        while i < self.chars.len() {
            i = if self.quote.is_some() {
                self.string_char(i)
            } else {
                self.structural_char(i)
            };
        }
        self.finish()
    }

    fn string_char(&mut self, i: usize) -> usize {
        let c = self.chars[i];
        let quote = self.quote.unwrap_or('"');
        match c {
            '\\' => {
                match self.chars.get(i + 1) {
                    // \' is not a valid JSON escape; emit the bare apostrophe.
                    Some('\'') => self.out.push('\''),
                    Some(&next) => {
                        self.out.push('\\');
                        self.out.push(next);
                    }
                    // Dangling backslash at the end of truncated output.
                    None => {}
                }
                return i + 2;
            }
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            '"' if quote == '\'' => self.out.push_str("\\\""),
            c if c == quote => {
                self.out.push('"');
                self.quote = None;
                self.last_token_was_key = self.string_is_key;
            }
            c if (c as u32) < 0x20 => self.out.push_str(&format!("\\u{:04x}", c as u32)),
            c => self.out.push(c),
        }
        i + 1
    }

    fn structural_char(&mut self, i: usize) -> usize {
        let c = self.chars[i];
        if !c.is_whitespace() {
            self.last_token_was_key = false;
        }
        match c {
            '"' | '\'' => {
                self.string_is_key = self.in_key_position();
                self.quote = Some(c);
                self.out.push('"');
            }
            '{' => {
                self.closers.push('}');
                self.out.push(c);
            }
            '[' => {
                self.closers.push(']');
                self.out.push(c);
            }
            '}' | ']' => self.close_container(c),
            c if c.is_alphabetic() || c == '_' || c == '$' => return self.bare_word(i),
            c => self.out.push(c),
        }
        i + 1
    }

    /// Copies an unquoted word, quoting it when it is used as an object key.
    fn bare_word(&mut self, start: usize) -> usize {
        let mut end = start;
        while end < self.chars.len() && is_word_char(self.chars[end]) {
            end += 1;
        }
        let word: String = self.chars[start..end].iter().collect();

        let next = self.chars[end..].iter().find(|c| !c.is_whitespace());
        if next == Some(&':') && self.in_key_position() {
            self.out.push('"');
            self.out.push_str(&word);
            self.out.push('"');
        } else {
            self.out.push_str(match word.as_str() {
                "True" => "true",
                "False" => "false",
                "None" => "null",
                other => other,
            });
        }
        end
    }

    fn close_container(&mut self, closer: char) {
        if !self.closers.contains(&closer) {
            // Stray closer with nothing to match.
            return;
        }
        while let Some(expected) = self.closers.pop() {
            self.seal_dangling();
            self.out.push(expected);
            if expected == closer {
                break;
            }
        }
    }

    /// Removes a trailing comma and completes a dangling key or colon.
    fn seal_dangling(&mut self) {
        let trimmed = self.out.trim_end().len();
        self.out.truncate(trimmed);
        if self.out.ends_with(',') {
            self.out.pop();
        }
        if self.last_token_was_key {
            self.out.push_str(": null");
            self.last_token_was_key = false;
        } else if self.out.ends_with(':') {
            self.out.push_str(" null");
        }
    }

    fn in_key_position(&self) -> bool {
        self.closers.last() == Some(&'}')
            && matches!(self.out.trim_end().chars().last(), Some('{') | Some(','))
    }

    fn finish(mut self) -> String {
        if self.quote.take().is_some() {
            self.out.push('"');
            self.last_token_was_key = self.string_is_key;
        }
        while let Some(closer) = self.closers.pop() {
            self.seal_dangling();
            self.out.push(closer);
        }
        self.out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '-' | '.')
}
