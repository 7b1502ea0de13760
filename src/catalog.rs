//! The set of paradigm tables plus table rendering.
//!
//! `Catalog::validate` walks the whole selection space at startup so that a
//! selection the UI can build never lands on a missing cell at runtime.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{Case, WordClass};
use crate::error::ParadigmError;
use crate::paradigm::{Cell, CellKey, Form, ParadigmTable};
use crate::reveal::RevealBoard;
use crate::selection::Selection;

/// TOML source for each paradigm table.
pub struct CatalogSources<'a> {
    pub noun: &'a str,
    pub adjective: &'a str,
    pub pronoun: &'a str,
    pub numeral: &'a str,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    noun: ParadigmTable,
    adjective: ParadigmTable,
    pronoun: ParadigmTable,
    numeral: ParadigmTable,
}

/// A rendered table: one row per case, one cell per column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableView {
    pub word_class: WordClass,
    pub selection: Selection,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub show_examples: bool,
    pub any_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnView {
    pub label: String,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowView {
    pub case: Case,
    pub label: &'static str,
    pub questions: &'static str,
    pub cells: Vec<CellView>,
}

/// Hidden cells carry neither form nor example.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellView {
    pub key: CellKey,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Form>,
}

impl Catalog {
    /// Parse all four tables and check every reachable path.
    #[instrument(level = "info", skip_all)]
    pub fn load(sources: CatalogSources<'_>) -> Result<Self, ParadigmError> {
        let catalog = Self {
            noun: ParadigmTable::from_toml(WordClass::Noun, sources.noun)?,
            adjective: ParadigmTable::from_toml(WordClass::Adjective, sources.adjective)?,
            pronoun: ParadigmTable::from_toml(WordClass::Pronoun, sources.pronoun)?,
            numeral: ParadigmTable::from_toml(WordClass::Numeral, sources.numeral)?,
        };
        let checked = catalog.validate()?;
        for class in WordClass::ALL {
            info!(
                target: "declension",
                table = %class,
                cells = catalog.table(*class).cell_count(),
                "Paradigm table loaded"
            );
        }
        info!(target: "declension", checked_paths = checked, "All selectable paths resolve");
        Ok(catalog)
    }

    pub fn table(&self, class: WordClass) -> &ParadigmTable {
        match class {
            WordClass::Noun => &self.noun,
            WordClass::Adjective => &self.adjective,
            WordClass::Pronoun => &self.pronoun,
            WordClass::Numeral => &self.numeral,
        }
    }

    pub fn resolve(&self, class: WordClass, path: &str) -> Result<&Cell, ParadigmError> {
        self.table(class).resolve(path)
    }

    /// Resolve a reveal key such as `noun:neuter.plural.genitive`.
    pub fn resolve_key(&self, raw: &str) -> Result<&Cell, ParadigmError> {
        let (class, path) = CellKey::parse(raw)?;
        self.resolve(class, path)
    }

    /// Resolve every (selection, column, case) triple. Returns how many paths
    /// were checked. Animacy splits are only allowed in the accusative, and a
    /// cell's example must split exactly when its form does.
    pub fn validate(&self) -> Result<usize, ParadigmError> {
        let mut checked = 0;
        for selection in Selection::space() {
            let class = selection.word_class();
            let table = self.table(class);
            for column in selection.columns() {
                for case in Case::ALL {
                    let path = column.cell_path(*case);
                    let cell = table.resolve(&path)?;
                    let split = cell.form.is_split();
                    if split != cell.example.is_split() || (split && *case != Case::Accusative) {
                        return Err(ParadigmError::Data {
                            source_name: class.as_str().to_string(),
                            message: format!("misplaced animacy split at `{path}`"),
                        });
                    }
                    checked += 1;
                }
            }
        }
        Ok(checked)
    }

    /// Render `selection` against the hidden set in `board`.
    #[instrument(level = "debug", skip(self, board))]
    pub fn render(
        &self,
        selection: Selection,
        board: &RevealBoard<CellKey>,
        show_examples: bool,
    ) -> Result<TableView, ParadigmError> {
        let selection = selection.canonical();
        let class = selection.word_class();
        let table = self.table(class);
        let columns = selection.columns();

        let mut rows = Vec::with_capacity(Case::ALL.len());
        let mut any_hidden = false;
        for case in Case::ALL {
            let mut cells = Vec::with_capacity(columns.len());
            for column in &columns {
                let path = column.cell_path(*case);
                let cell = table.resolve(&path)?;
                let key = CellKey::new(class, &path);
                let hidden = board.is_hidden(&key);
                any_hidden |= hidden;
                cells.push(CellView {
                    key,
                    hidden,
                    form: (!hidden).then(|| cell.form.clone()),
                    example: (!hidden && show_examples).then(|| cell.example.clone()),
                });
            }
            rows.push(RowView {
                case: *case,
                label: case.label(),
                questions: case.questions(),
                cells,
            });
        }

        debug!(target: "declension", table = %class, columns = columns.len(), any_hidden, "Table rendered");
        Ok(TableView {
            word_class: class,
            selection,
            columns: columns
                .into_iter()
                .map(|c| ColumnView { label: c.label, path: c.path })
                .collect(),
            rows,
            show_examples,
            any_hidden,
        })
    }
}
