//! Built-in linguistic data, compiled into the binary.
//!
//! The tables live as TOML under `data/` so they read like the reference
//! charts they encode. They are parsed and validated once at startup.

use crate::catalog::{Catalog, CatalogSources};
use crate::error::{BankError, ParadigmError};
use crate::prepositions::PrepositionBook;
use crate::quiz::QuizBank;

pub(crate) const NOUNS: &str = include_str!("../data/nouns.toml");
pub(crate) const ADJECTIVES: &str = include_str!("../data/adjectives.toml");
pub(crate) const PRONOUNS: &str = include_str!("../data/pronouns.toml");
pub(crate) const NUMERALS: &str = include_str!("../data/numerals.toml");
const PREPOSITIONS: &str = include_str!("../data/prepositions.toml");
const QUIZ: &str = include_str!("../data/quiz.toml");

/// All paradigm tables, with every selectable path checked.
pub fn builtin_catalog() -> Result<Catalog, ParadigmError> {
  Catalog::load(CatalogSources {
    noun: NOUNS,
    adjective: ADJECTIVES,
    pronoun: PRONOUNS,
    numeral: NUMERALS,
  })
}

pub fn builtin_prepositions() -> Result<PrepositionBook, ParadigmError> {
  PrepositionBook::from_toml(PREPOSITIONS)
}

/// The 30 noun/adjective ending questions.
pub fn builtin_bank() -> Result<QuizBank, BankError> {
  QuizBank::from_toml(QUIZ)
}
