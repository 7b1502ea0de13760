//! Grammatical dimensions shared by the paradigm tables, the preposition
//! reference and the quiz bank.
//!
//! Every dimension is a closed enum with a stable snake_case key. The key is
//! what appears in data paths (`masculine.singular.genitive`), on the wire,
//! and in reveal keys.

use serde::{Deserialize, Serialize};

/// Declares a dimension enum with its key table.
///
/// Keys must equal the serde snake_case rename of each variant so that the
/// path segment, the JSON value and `as_str()` never disagree.
macro_rules! dimension {
  ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum $name {
      $($variant),+
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$variant),+];

      pub fn as_str(self) -> &'static str {
        match self {
          $($name::$variant => $key),+
        }
      }

      /// Inverse of `as_str`.
      #[allow(dead_code)]
      pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == key)
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }
  };
}

dimension! {
  /// Word classes that own a paradigm table. Prepositions are a flat reference
  /// list, not a paradigm.
  WordClass {
    Noun => "noun",
    Adjective => "adjective",
    Pronoun => "pronoun",
    Numeral => "numeral",
  }
}

dimension! {
  /// The six grammatical cases, in table row order.
  Case {
    Nominative => "nominative",
    Genitive => "genitive",
    Dative => "dative",
    Accusative => "accusative",
    Instrumental => "instrumental",
    Prepositional => "prepositional",
  }
}

impl Case {
  /// Russian row label.
  pub fn label(self) -> &'static str {
    match self {
      Case::Nominative => "Именительный",
      Case::Genitive => "Родительный",
      Case::Dative => "Дательный",
      Case::Accusative => "Винительный",
      Case::Instrumental => "Творительный",
      Case::Prepositional => "Предложный",
    }
  }

  /// Question words a learner uses to find the case.
  pub fn questions(self) -> &'static str {
    match self {
      Case::Nominative => "кто? что?",
      Case::Genitive => "кого? чего?",
      Case::Dative => "кому? чему?",
      Case::Accusative => "кого? что?",
      Case::Instrumental => "кем? чем?",
      Case::Prepositional => "о ком? о чём?",
    }
  }
}

dimension! {
  Number {
    Singular => "singular",
    Plural => "plural",
  }
}

impl Default for Number {
  fn default() -> Self { Number::Singular }
}

dimension! {
  Gender {
    Masculine => "masculine",
    Feminine => "feminine",
    Neuter => "neuter",
  }
}

dimension! {
  Person {
    First => "first",
    Second => "second",
    Third => "third",
  }
}

dimension! {
  /// Possessive pronouns: мой, твой, наш, ваш, свой, его, её, их.
  Possessor {
    My => "my",
    Your => "your",
    Our => "our",
    YourPlural => "your_plural",
    Reflexive => "reflexive",
    His => "his",
    Her => "her",
    Their => "their",
  }
}

impl Possessor {
  /// его / её / их do not decline.
  pub fn is_invariant(self) -> bool {
    matches!(self, Possessor::His | Possessor::Her | Possessor::Their)
  }
}

dimension! {
  /// этот / тот
  Demonstrative {
    This => "this",
    That => "that",
  }
}

dimension! {
  /// кто / что / какой / чей
  Interrogative {
    Who => "who",
    What => "what",
    Which => "which",
    Whose => "whose",
  }
}

impl Interrogative {
  /// какой and чей agree in number and gender; кто and что only decline by case.
  pub fn agrees(self) -> bool {
    matches!(self, Interrogative::Which | Interrogative::Whose)
  }
}

dimension! {
  /// никто / ничто / некого / нечего
  Negative {
    Nobody => "nobody",
    Nothing => "nothing",
    NoOneTo => "no_one_to",
    NothingTo => "nothing_to",
  }
}

dimension! {
  /// себя / друг друга
  Reflexive {
    Oneself => "oneself",
    EachOther => "each_other",
  }
}

dimension! {
  Cardinal {
    One => "one",
    Two => "two",
    Three => "three",
    Four => "four",
    Five => "five",
    Ten => "ten",
    Twenty => "twenty",
    Forty => "forty",
    Fifty => "fifty",
    Hundred => "hundred",
    TwoHundred => "two_hundred",
  }
}

dimension! {
  Ordinal {
    First => "first",
    Second => "second",
    Third => "third",
    Fifth => "fifth",
    Tenth => "tenth",
  }
}

dimension! {
  /// оба/обе and двое … десятеро.
  Collective {
    Both => "both",
    Dvoe => "dvoe",
    Troe => "troe",
    Chetvero => "chetvero",
    Pyatero => "pyatero",
    Shestero => "shestero",
    Semero => "semero",
    Vosmero => "vosmero",
    Devyatero => "devyatero",
    Desyatero => "desyatero",
  }
}
