//! Notation entry helpers for bol text fields.
//!
//! These shape typed text only; they never validate notation.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Separator inserted between bols of one beat group.
pub const BAL_SEPARATOR: &str = "| ";

static WORD_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w").expect("valid word regex"));
static SENTENCE_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[.!?]\s+)([a-z])").expect("valid sentence regex"));

/// Uppercases the first character of every word: `"dha dhin"` -> `"Dha Dhin"`.
pub fn capitalize_words(text: &str) -> String {
    WORD_START_RE
        .replace_all(text, |caps: &Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// Uppercases the first lowercase ASCII letter of each sentence.
pub fn auto_capitalize(text: &str) -> String {
    SENTENCE_START_RE
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .into_owned()
}

/// Replaces the char range `[start, end)` of `text` with `BAL_SEPARATOR`.
///
/// Offsets count chars, not bytes, and are clamped to the text. Returns the
/// new text and the cursor position right after the separator.
pub fn insert_bal_separator(text: &str, start: usize, end: usize) -> (String, usize) {
    let len = text.chars().count();
    let start = start.min(len);
    let end = end.clamp(start, len);

    let mut out = String::with_capacity(text.len() + BAL_SEPARATOR.len());
    out.extend(text.chars().take(start));
    out.push_str(BAL_SEPARATOR);
    out.extend(text.chars().skip(end));

    (out, start + BAL_SEPARATOR.chars().count())
}
