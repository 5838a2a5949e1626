//! Text normalization ahead of sentence and word counting

use regex::Regex;
use std::sync::OnceLock;

fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s.!?]").unwrap())
}

/// Replace every character that is not a word character, whitespace, or a
/// sentence terminator (`.`, `!`, `?`) with a space.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    punctuation().replace_all(text, " ").into_owned()
}
