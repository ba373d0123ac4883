//! Lexicon: the fixed set of Russian/Greek translation pairs.
//!
//! The pairs are seeded once and never change. Their order is the order in
//! which training sessions present words.

use crate::i18n::Language;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A Russian word and its Greek translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationPair {
    pub russian: &'static str,
    pub greek: &'static str,
}

/// Global lexicon singleton.
pub struct Lexicon {
    pairs: Vec<TranslationPair>,
    russian_to_greek: HashMap<&'static str, &'static str>,
    greek_to_russian: HashMap<&'static str, &'static str>,
}

static LEXICON: OnceLock<Lexicon> = OnceLock::new();

impl Lexicon {
    /// Get the global lexicon instance.
    pub fn get() -> &'static Lexicon {
        LEXICON.get_or_init(|| Lexicon::new(default_pairs()))
    }

    /// Build a lexicon from an ordered list of pairs.
    pub fn new(pairs: Vec<TranslationPair>) -> Self {
        let russian_to_greek = pairs.iter().map(|p| (p.russian, p.greek)).collect();
        let greek_to_russian = pairs.iter().map(|p| (p.greek, p.russian)).collect();
        Self {
            pairs,
            russian_to_greek,
            greek_to_russian,
        }
    }

    /// Look up the translation of `word`, written in `language`.
    ///
    /// Exact key match only. `Language::Other` never has a translation;
    /// callers reject it before looking anything up.
    pub fn translate(&self, language: Language, word: &str) -> Option<&'static str> {
        match language {
            Language::Russian => self.russian_to_greek.get(word).copied(),
            Language::Greek => self.greek_to_russian.get(word).copied(),
            Language::Other => None,
        }
    }

    /// Number of known pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Greek word at position `index` of the training order.
    pub fn training_word(&self, index: usize) -> Option<&'static str> {
        self.pairs.get(index).map(|p| p.greek)
    }

    pub fn pairs(&self) -> &[TranslationPair] {
        &self.pairs
    }
}

fn default_pairs() -> Vec<TranslationPair> {
    vec![
        TranslationPair {
            russian: "привет",
            greek: "γεια",
        },
        TranslationPair {
            russian: "мир",
            greek: "κόσμος",
        },
        TranslationPair {
            russian: "кот",
            greek: "γάτα",
        },
    ]
}
