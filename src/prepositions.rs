//! Preposition reference: which case each preposition governs.
//!
//! Entries are filtered by a free-text search and an optional case. In test
//! mode the case and the meaning of each entry can be hidden independently;
//! the hidden set is keyed by the entry's position in the full list, so
//! changing the filter never moves a hidden mark onto another entry.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::Case;
use crate::error::ParadigmError;
use crate::reveal::RevealBoard;
use crate::util::contains_ci;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepositionEntry {
    #[serde(default)]
    pub id: usize,
    pub preposition: String,
    pub case: Case,
    pub meaning: String,
    pub examples: String,
    pub notes: String,
}

/// Hideable part of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepositionField {
    Case,
    Meaning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrepositionCell {
    pub entry: usize,
    pub field: PrepositionField,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PrepositionFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub case: Option<Case>,
    /// Include the examples and notes columns. Off by default.
    #[serde(default)]
    pub show_examples: bool,
}

/// Rendered reference list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrepositionView {
    pub cases: Vec<Case>,
    pub search: String,
    pub case_filter: Option<Case>,
    pub show_examples: bool,
    pub entries: Vec<PrepositionRow>,
    pub total: usize,
    pub any_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrepositionRow {
    pub id: usize,
    pub preposition: String,
    pub case_hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_label: Option<&'static str>,
    pub meaning_hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
struct PrepositionFile {
    prepositions: Vec<PrepositionEntry>,
}

#[derive(Clone, Debug)]
pub struct PrepositionBook {
    entries: Vec<PrepositionEntry>,
}

impl PrepositionBook {
    pub fn from_toml(src: &str) -> Result<Self, ParadigmError> {
        let file: PrepositionFile = toml::from_str(src).map_err(|e| ParadigmError::Data {
            source_name: "preposition".into(),
            message: e.to_string(),
        })?;
        Ok(Self::new(file.prepositions))
    }

    /// Ids are reassigned to list positions.
    pub fn new(mut entries: Vec<PrepositionEntry>) -> Self {
        for (i, e) in entries.iter_mut().enumerate() {
            e.id = i;
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: usize) -> Option<&PrepositionEntry> {
        self.entries.get(id)
    }

    /// Distinct governed cases in first-appearance order.
    pub fn cases(&self) -> Vec<Case> {
        let mut out: Vec<Case> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.case) {
                out.push(e.case);
            }
        }
        out
    }

    /// Entries whose preposition or meaning contains `search` (case
    /// insensitive) and, if set, that govern the filtered case.
    pub fn filter(&self, filter: &PrepositionFilter) -> Vec<&PrepositionEntry> {
        let needle = filter.search.trim();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || contains_ci(&e.preposition, needle) || contains_ci(&e.meaning, needle))
            .filter(|e| filter.case.map_or(true, |c| c == e.case))
            .collect()
    }

    /// Both fields of every entry in the filtered list.
    pub fn cells(&self, filter: &PrepositionFilter) -> Vec<PrepositionCell> {
        self.filter(filter)
            .into_iter()
            .flat_map(|e| {
                [PrepositionField::Case, PrepositionField::Meaning]
                    .map(|field| PrepositionCell { entry: e.id, field })
            })
            .collect()
    }

    #[instrument(level = "debug", skip(self, board))]
    pub fn render(&self, filter: &PrepositionFilter, board: &RevealBoard<PrepositionCell>) -> PrepositionView {
        let entries: Vec<PrepositionRow> = self
            .filter(filter)
            .into_iter()
            .map(|e| {
                let case_hidden = board.is_hidden(&PrepositionCell { entry: e.id, field: PrepositionField::Case });
                let meaning_hidden =
                    board.is_hidden(&PrepositionCell { entry: e.id, field: PrepositionField::Meaning });
                PrepositionRow {
                    id: e.id,
                    preposition: e.preposition.clone(),
                    case_hidden,
                    case: (!case_hidden).then_some(e.case),
                    case_label: (!case_hidden).then(|| e.case.label()),
                    meaning_hidden,
                    meaning: (!meaning_hidden).then(|| e.meaning.clone()),
                    examples: filter.show_examples.then(|| e.examples.clone()),
                    notes: filter.show_examples.then(|| e.notes.clone()),
                }
            })
            .collect();

        debug!(target: "declension", shown = entries.len(), total = self.len(), "Preposition list rendered");
        PrepositionView {
            cases: self.cases(),
            search: filter.search.clone(),
            case_filter: filter.case,
            show_examples: filter.show_examples,
            total: self.len(),
            any_hidden: board.any_hidden(),
            entries,
        }
    }
}
