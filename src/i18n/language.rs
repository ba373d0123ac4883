//! Language detection by script.
//!
//! A word is classified by matching the whole input against one
//! character class per supported language. Mixed-script input, digits,
//! punctuation and the empty string all fall through to `Language::Other`.

use regex::Regex;
use std::sync::OnceLock;

/// Language of a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Russian,
    Greek,
    Other,
}

impl Language {
    /// Short lowercase code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Russian => "rus",
            Language::Greek => "greek",
            Language::Other => "other",
        }
    }
}

/// Detection rules, checked in order. The classes do not overlap, so at
/// most one rule can match.
fn rules() -> &'static [(Language, Regex)] {
    static RULES: OnceLock<Vec<(Language, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            (
                Language::Russian,
                Regex::new(r"(?i)^[а-яё]+$").expect("valid Cyrillic pattern"),
            ),
            (
                Language::Greek,
                Regex::new(r"(?i)^[α-ωάέήίόύώ]+$").expect("valid Greek pattern"),
            ),
        ]
    })
}

/// Classify `text` as Russian, Greek or other.
pub fn detect_language(text: &str) -> Language {
    rules()
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(language, _)| *language)
        .unwrap_or(Language::Other)
}
