//! Paradigm tables: nested dimension maps ending in cells.
//!
//! A table is parsed from TOML. Any table holding a `form` key is a cell; every
//! other table is a branch keyed by dimension values. A cell path is the
//! dotted list of keys from the root to the cell, e.g.
//! `masculine.singular.accusative` in the noun table.
//!
//! Invariable words (его/её/их) are cells marked `invariant = true`. They
//! accept any number/gender segments after them, and must be followed by a case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Case, Gender, Number, WordClass};
use crate::error::ParadigmError;

/// A surface form. Accusative cells that distinguish animacy carry both
/// variants; everything else is plain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", from = "RawForm")]
pub enum Form {
  Plain { text: String },
  Split { animate: String, inanimate: String },
}

/// On-disk shape: a bare string or an `{ animate, inanimate }` table.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawForm {
  Plain(String),
  Split { animate: String, inanimate: String },
}

impl From<RawForm> for Form {
  fn from(raw: RawForm) -> Self {
    match raw {
      RawForm::Plain(text) => Form::Plain { text },
      RawForm::Split { animate, inanimate } => Form::Split { animate, inanimate },
    }
  }
}

impl Form {
  #[cfg(test)]
  pub fn plain(text: impl Into<String>) -> Self {
    Form::Plain { text: text.into() }
  }

  pub fn is_split(&self) -> bool {
    matches!(self, Form::Split { .. })
  }
}

impl std::fmt::Display for Form {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Form::Plain { text } => f.write_str(text),
      Form::Split { animate, inanimate } => write!(f, "{inanimate} (неодуш.) / {animate} (одуш.)"),
    }
  }
}

/// One table cell: the form and a parallel example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
  pub form: Form,
  pub example: Form,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub invariant: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Node {
  Leaf(Cell),
  Branch(BTreeMap<String, Node>),
}

/// A read-only paradigm for one word class.
#[derive(Clone, Debug)]
pub struct ParadigmTable {
  class: WordClass,
  root: BTreeMap<String, Node>,
}

impl ParadigmTable {
  /// Parse a table from its TOML declaration.
  pub fn from_toml(class: WordClass, src: &str) -> Result<Self, ParadigmError> {
    let root: BTreeMap<String, Node> = toml::from_str(src).map_err(|e| ParadigmError::Data {
      source_name: class.as_str().to_string(),
      message: e.to_string(),
    })?;
    let table = Self { class, root };
    debug!(target: "declension", table = %class, cells = table.cell_count(), "Paradigm table parsed");
    Ok(table)
  }

  /// Walk `path` (dot separated) down to a cell.
  #[instrument(level = "trace", skip(self), fields(table = %self.class))]
  pub fn resolve(&self, path: &str) -> Result<&Cell, ParadigmError> {
    let segments: Vec<&str> = path.split('.').collect();
    let mut children = &self.root;

    for (i, segment) in segments.iter().enumerate() {
      let node = children.get(*segment).ok_or_else(|| ParadigmError::UnknownSegment {
        parent: parent_label(self.class, &segments[..i]),
        segment: segment.to_string(),
      })?;

      match node {
        Node::Branch(next) => children = next,
        Node::Leaf(cell) => {
          let rest = &segments[i + 1..];
          let fits = if cell.invariant { is_agreement_suffix(rest) } else { rest.is_empty() };
          if fits {
            return Ok(cell);
          }
          if cell.invariant && rest.is_empty() {
            return Err(ParadigmError::MissingCase(path.to_string()));
          }
          return Err(ParadigmError::PastLeaf {
            path: path.to_string(),
            leaf: segments[..=i].join("."),
          });
        }
      }
    }

    Err(ParadigmError::EndsAtBranch(path.to_string()))
  }

  /// Number of cells declared in the table.
  pub fn cell_count(&self) -> usize {
    fn count(nodes: &BTreeMap<String, Node>) -> usize {
      nodes
        .values()
        .map(|n| match n {
          Node::Leaf(_) => 1,
          Node::Branch(children) => count(children),
        })
        .sum()
    }
    count(&self.root)
  }
}

/// `[number|gender]*.case`: what may follow an invariable cell.
fn is_agreement_suffix(rest: &[&str]) -> bool {
  let Some((last, agreement)) = rest.split_last() else {
    return false;
  };
  Case::from_key(last).is_some()
    && agreement
      .iter()
      .all(|s| Number::from_key(s).is_some() || Gender::from_key(s).is_some())
}

fn parent_label(class: WordClass, segments: &[&str]) -> String {
  if segments.is_empty() {
    class.as_str().to_string()
  } else {
    format!("{}:{}", class, segments.join("."))
  }
}

/// Reveal key of a cell: `<word class>:<dotted path>`.
///
/// The key carries the whole dimension tuple, so hiding a cell under one
/// gender never hides the cell in the same position under another.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellKey(String);

impl CellKey {
  pub fn new(class: WordClass, path: &str) -> Self {
    CellKey(format!("{}:{}", class, path))
  }

  /// Split into word class and path, rejecting anything malformed.
  pub fn parse(raw: &str) -> Result<(WordClass, &str), ParadigmError> {
    let (class, path) = raw
      .split_once(':')
      .ok_or_else(|| ParadigmError::MalformedKey(raw.to_string()))?;
    let class = WordClass::from_key(class).ok_or_else(|| ParadigmError::MalformedKey(raw.to_string()))?;
    if path.is_empty() {
      return Err(ParadigmError::MalformedKey(raw.to_string()));
    }
    Ok((class, path))
  }

  #[cfg(test)]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Word class and path of this key.
  #[cfg(test)]
  pub fn parts(&self) -> Result<(WordClass, &str), ParadigmError> {
    Self::parse(&self.0)
  }
}

impl std::fmt::Display for CellKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}
