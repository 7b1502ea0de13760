//! What a user can pick above each table, and which columns that yields.
//!
//! A `Selection` is the typed set of dimension values for one table view.
//! Dimensions a word does not inflect for are simply absent (кто has no
//! gender, его/её/их have neither number nor gender). Each selection maps to
//! one or more columns; a column is a path prefix and the six cases complete
//! it into cell paths.

use serde::{Deserialize, Serialize};

use crate::domain::{
  Cardinal, Case, Collective, Demonstrative, Gender, Interrogative, Negative, Number, Ordinal, Person, Possessor,
  Reflexive, WordClass,
};
use crate::paradigm::CellKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
  Noun {
    gender: Gender,
  },
  Adjective {
    gender: Gender,
  },
  Personal {
    number: Number,
    person: Person,
    #[serde(default)]
    gender: Option<Gender>,
  },
  Possessive {
    possessor: Possessor,
    #[serde(default)]
    number: Number,
    #[serde(default)]
    gender: Option<Gender>,
  },
  Demonstrative {
    pronoun: Demonstrative,
    #[serde(default)]
    number: Number,
    #[serde(default)]
    gender: Option<Gender>,
  },
  Interrogative {
    pronoun: Interrogative,
    #[serde(default)]
    number: Number,
    #[serde(default)]
    gender: Option<Gender>,
  },
  Negative {
    pronoun: Negative,
  },
  Reflexive {
    pronoun: Reflexive,
  },
  Cardinal {
    numeral: Cardinal,
  },
  Ordinal {
    numeral: Ordinal,
    #[serde(default)]
    number: Number,
    #[serde(default)]
    gender: Option<Gender>,
  },
  Collective {
    numeral: Collective,
  },
}

/// One displayed column: a label and the path prefix its cells share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
  pub label: String,
  pub path: String,
}

impl Column {
  fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
    Self { label: label.into(), path: path.into() }
  }

  /// Full path of this column's cell for `case`.
  pub fn cell_path(&self, case: Case) -> String {
    format!("{}.{}", self.path, case)
  }
}

/// `singular.<gender>` or `plural`: the number/gender tail shared by every
/// adjective-like pronoun and the ordinals.
fn agreement_tail(number: Number, gender: Gender) -> String {
  match number {
    Number::Singular => format!("singular.{}", gender),
    Number::Plural => "plural".to_string(),
  }
}

fn agreement_label(number: Number, gender: Gender) -> String {
  match number {
    Number::Singular => format!("singular {}", gender),
    Number::Plural => "plural".to_string(),
  }
}

impl Selection {
  pub fn word_class(&self) -> WordClass {
    match self {
      Selection::Noun { .. } => WordClass::Noun,
      Selection::Adjective { .. } => WordClass::Adjective,
      Selection::Personal { .. }
      | Selection::Possessive { .. }
      | Selection::Demonstrative { .. }
      | Selection::Interrogative { .. }
      | Selection::Negative { .. }
      | Selection::Reflexive { .. } => WordClass::Pronoun,
      Selection::Cardinal { .. } | Selection::Ordinal { .. } | Selection::Collective { .. } => WordClass::Numeral,
    }
  }

  /// Drop dimensions the word does not inflect for and fill in the ones it
  /// needs. Two selections that show the same columns canonicalize equal.
  pub fn canonical(self) -> Self {
    let agreeing = |number: Number, gender: Option<Gender>| match number {
      Number::Singular => (Number::Singular, Some(gender.unwrap_or(Gender::Masculine))),
      Number::Plural => (Number::Plural, None),
    };

    match self {
      Selection::Personal { number, person, gender } => {
        let gender = match (number, person) {
          (Number::Singular, Person::Third) => Some(gender.unwrap_or(Gender::Masculine)),
          _ => None,
        };
        Selection::Personal { number, person, gender }
      }
      Selection::Possessive { possessor, number, gender } => {
        if possessor.is_invariant() {
          Selection::Possessive { possessor, number: Number::Singular, gender: None }
        } else {
          let (number, gender) = agreeing(number, gender);
          Selection::Possessive { possessor, number, gender }
        }
      }
      Selection::Demonstrative { pronoun, number, gender } => {
        let (number, gender) = agreeing(number, gender);
        Selection::Demonstrative { pronoun, number, gender }
      }
      Selection::Interrogative { pronoun, number, gender } => {
        if pronoun.agrees() {
          let (number, gender) = agreeing(number, gender);
          Selection::Interrogative { pronoun, number, gender }
        } else {
          Selection::Interrogative { pronoun, number: Number::Singular, gender: None }
        }
      }
      Selection::Ordinal { numeral, number, gender } => {
        let (number, gender) = agreeing(number, gender);
        Selection::Ordinal { numeral, number, gender }
      }
      other => other,
    }
  }

  /// Columns shown for this selection, left to right.
  pub fn columns(&self) -> Vec<Column> {
    let gender_or_default = |g: Option<Gender>| g.unwrap_or(Gender::Masculine);

    match self.canonical() {
      Selection::Noun { gender } => vec![
        Column::new("singular", format!("{}.singular", gender)),
        Column::new("plural", format!("{}.plural", gender)),
      ],
      Selection::Adjective { gender } => vec![
        Column::new(format!("singular {}", gender), format!("singular.{}", gender)),
        Column::new("plural", "plural.all"),
      ],
      Selection::Personal { number, person, gender } => {
        let path = match gender {
          Some(g) => format!("personal.{}.{}.{}", number, person, g),
          None => format!("personal.{}.{}", number, person),
        };
        let label = path.trim_start_matches("personal.").replace('.', " ");
        vec![Column::new(label, path)]
      }
      Selection::Possessive { possessor, number, gender } => {
        if possessor.is_invariant() {
          vec![Column::new(possessor.as_str(), format!("possessive.{}", possessor))]
        } else {
          let g = gender_or_default(gender);
          vec![Column::new(
            agreement_label(number, g),
            format!("possessive.{}.{}", possessor, agreement_tail(number, g)),
          )]
        }
      }
      Selection::Demonstrative { pronoun, number, gender } => {
        let g = gender_or_default(gender);
        vec![Column::new(
          agreement_label(number, g),
          format!("demonstrative.{}.{}", pronoun, agreement_tail(number, g)),
        )]
      }
      Selection::Interrogative { pronoun, number, gender } => {
        if pronoun.agrees() {
          let g = gender_or_default(gender);
          vec![Column::new(
            agreement_label(number, g),
            format!("interrogative.{}.{}", pronoun, agreement_tail(number, g)),
          )]
        } else {
          vec![Column::new(pronoun.as_str(), format!("interrogative.{}", pronoun))]
        }
      }
      Selection::Negative { pronoun } => vec![Column::new(pronoun.as_str(), format!("negative.{}", pronoun))],
      Selection::Reflexive { pronoun } => vec![Column::new(pronoun.as_str(), format!("reflexive.{}", pronoun))],
      Selection::Cardinal { numeral } => match numeral {
        Cardinal::One => ["masculine", "feminine", "neuter", "plural"]
          .iter()
          .map(|g| Column::new(*g, format!("cardinal.one.{}", g)))
          .collect::<Vec<_>>(),
        Cardinal::Two => vec![
          Column::new("masculine/neuter", "cardinal.two.masculine_neuter"),
          Column::new("feminine", "cardinal.two.feminine"),
        ],
        other => vec![Column::new(other.as_str(), format!("cardinal.{}", other))],
      },
      Selection::Ordinal { numeral, number, gender } => {
        let g = gender_or_default(gender);
        vec![Column::new(
          agreement_label(number, g),
          format!("ordinal.{}.{}", numeral, agreement_tail(number, g)),
        )]
      }
      Selection::Collective { numeral } => match numeral {
        Collective::Both => vec![
          Column::new("masculine/neuter", "collective.both.masculine_neuter"),
          Column::new("feminine", "collective.both.feminine"),
        ],
        other => vec![Column::new(other.as_str(), format!("collective.{}", other))],
      },
    }
  }

  /// Reveal keys of every cell shown for this selection, column-major.
  pub fn cell_keys(&self) -> Vec<CellKey> {
    let class = self.word_class();
    self
      .columns()
      .iter()
      .flat_map(|col| Case::ALL.iter().map(move |case| CellKey::new(class, &col.cell_path(*case))))
      .collect()
  }

  /// A sensible starting selection per word class.
  pub fn default_for(class: WordClass) -> Self {
    match class {
      WordClass::Noun => Selection::Noun { gender: Gender::Masculine },
      WordClass::Adjective => Selection::Adjective { gender: Gender::Masculine },
      WordClass::Pronoun => Selection::Personal { number: Number::Singular, person: Person::First, gender: None },
      WordClass::Numeral => Selection::Cardinal { numeral: Cardinal::One },
    }
  }

  /// Every canonical selection a user can build.
  pub fn space() -> Vec<Selection> {
    let mut out = Vec::new();

    // (number, gender) combinations for words that agree with their noun.
    let agreement: Vec<(Number, Option<Gender>)> = Gender::ALL
      .iter()
      .map(|g| (Number::Singular, Some(*g)))
      .chain(std::iter::once((Number::Plural, None)))
      .collect();

    for g in Gender::ALL {
      out.push(Selection::Noun { gender: *g });
    }
    for g in Gender::ALL {
      out.push(Selection::Adjective { gender: *g });
    }

    for number in Number::ALL {
      for person in Person::ALL {
        if *number == Number::Singular && *person == Person::Third {
          for g in Gender::ALL {
            out.push(Selection::Personal { number: *number, person: *person, gender: Some(*g) });
          }
        } else {
          out.push(Selection::Personal { number: *number, person: *person, gender: None });
        }
      }
    }

    for possessor in Possessor::ALL {
      if possessor.is_invariant() {
        out.push(Selection::Possessive { possessor: *possessor, number: Number::Singular, gender: None });
      } else {
        for (number, gender) in &agreement {
          out.push(Selection::Possessive { possessor: *possessor, number: *number, gender: *gender });
        }
      }
    }

    for pronoun in Demonstrative::ALL {
      for (number, gender) in &agreement {
        out.push(Selection::Demonstrative { pronoun: *pronoun, number: *number, gender: *gender });
      }
    }

    for pronoun in Interrogative::ALL {
      if pronoun.agrees() {
        for (number, gender) in &agreement {
          out.push(Selection::Interrogative { pronoun: *pronoun, number: *number, gender: *gender });
        }
      } else {
        out.push(Selection::Interrogative { pronoun: *pronoun, number: Number::Singular, gender: None });
      }
    }

    out.extend(Negative::ALL.iter().map(|p| Selection::Negative { pronoun: *p }));
    out.extend(Reflexive::ALL.iter().map(|p| Selection::Reflexive { pronoun: *p }));
    out.extend(Cardinal::ALL.iter().map(|n| Selection::Cardinal { numeral: *n }));

    for numeral in Ordinal::ALL {
      for (number, gender) in &agreement {
        out.push(Selection::Ordinal { numeral: *numeral, number: *number, gender: *gender });
      }
    }

    out.extend(Collective::ALL.iter().map(|n| Selection::Collective { numeral: *n }));
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[test]
  fn space_is_canonical_and_unique() {
    let space = Selection::space();
    for s in &space {
      assert_eq!(s.canonical(), *s, "{s:?} is not canonical");
    }
    let unique: std::collections::HashSet<_> = space.iter().collect();
    assert_eq!(unique.len(), space.len());
    // 3 + 3 nouns/adjectives, 8 personal, 23 possessive, 8 demonstrative,
    // 10 interrogative, 4 negative, 2 reflexive, 11 cardinal, 20 ordinal, 10 collective.
    assert_eq!(space.len(), 102);
  }

  #[test]
  fn noun_selection_has_twelve_cells() {
    let keys = Selection::Noun { gender: Gender::Feminine }.cell_keys();
    assert_eq!(keys.len(), 12);
    assert_eq!(keys[0].as_str(), "noun:feminine.singular.nominative");
    assert_eq!(keys[11].as_str(), "noun:feminine.plural.prepositional");
  }

  #[rstest]
  #[case(Selection::Personal { number: Number::Plural, person: Person::Third, gender: Some(Gender::Feminine) }, "personal.plural.third")]
  #[case(Selection::Personal { number: Number::Singular, person: Person::Third, gender: None }, "personal.singular.third.masculine")]
  #[case(Selection::Possessive { possessor: Possessor::Her, number: Number::Plural, gender: Some(Gender::Neuter) }, "possessive.her")]
  #[case(Selection::Possessive { possessor: Possessor::Our, number: Number::Plural, gender: Some(Gender::Neuter) }, "possessive.our.plural")]
  #[case(Selection::Interrogative { pronoun: Interrogative::Who, number: Number::Plural, gender: None }, "interrogative.who")]
  #[case(Selection::Interrogative { pronoun: Interrogative::Whose, number: Number::Singular, gender: Some(Gender::Feminine) }, "interrogative.whose.singular.feminine")]
  #[case(Selection::Ordinal { numeral: Ordinal::Third, number: Number::Singular, gender: None }, "ordinal.third.singular.masculine")]
  fn columns_ignore_dimensions_the_word_lacks(#[case] selection: Selection, #[case] path: &str) {
    let columns = selection.columns();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].path, path);
  }

  #[test]
  fn multi_column_numerals() {
    let one: Vec<String> = Selection::Cardinal { numeral: Cardinal::One }.columns().into_iter().map(|c| c.path).collect();
    assert_eq!(
      one,
      vec!["cardinal.one.masculine", "cardinal.one.feminine", "cardinal.one.neuter", "cardinal.one.plural"]
    );
    assert_eq!(Selection::Collective { numeral: Collective::Both }.columns().len(), 2);
    assert_eq!(Selection::Collective { numeral: Collective::Troe }.columns()[0].path, "collective.troe");
  }

  #[test]
  fn selection_wire_format() {
    let s: Selection = serde_json::from_str(r#"{"kind":"possessive","possessor":"your_plural","number":"plural"}"#)
      .expect("deserialize");
    assert_eq!(s, Selection::Possessive { possessor: Possessor::YourPlural, number: Number::Plural, gender: None });
    let s: Selection = serde_json::from_str(r#"{"kind":"negative","pronoun":"no_one_to"}"#).expect("deserialize");
    assert_eq!(s.word_class(), WordClass::Pronoun);
  }
}
