//! Language handling for the Russian/Greek word pairs.
//!
//! # Architecture
//!
//! - `language`: Script detection that classifies a word as Russian, Greek or other
//! - `lexicon`: Single source of truth for the seeded translation pairs
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{detect_language, Language, Lexicon};
//!
//! assert_eq!(detect_language("кот"), Language::Russian);
//! assert_eq!(Lexicon::get().translate(Language::Russian, "кот"), Some("γάτα"));
//! ```

mod language;
mod lexicon;

pub use language::{detect_language, Language};
pub use lexicon::{Lexicon, TranslationPair};
