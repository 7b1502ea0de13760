//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::catalog::TableView;
use crate::domain::{Case, WordClass};
use crate::paradigm::{Cell, Form};
use crate::prepositions::{PrepositionCell, PrepositionFilter, PrepositionView};
use crate::quiz::QuizView;
use crate::selection::{Column, Selection};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ViewTable {
        selection: Selection,
        #[serde(default)]
        show_examples: Option<bool>,
    },
    ToggleCell {
        key: String,
    },
    SetAllHidden {
        word_class: WordClass,
        hidden: bool,
    },
    RevealAll {
        word_class: WordClass,
    },
    ViewPrepositions {
        #[serde(default)]
        filter: Option<PrepositionFilter>,
    },
    TogglePreposition {
        cell: PrepositionCell,
    },
    SetAllPrepositionsHidden {
        hidden: bool,
    },
    QuizState,
    QuizSelect {
        option: String,
    },
    QuizSubmit,
    QuizAdvance,
    QuizRestart,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Table {
        table: TableView,
    },
    Prepositions {
        prepositions: PrepositionView,
    },
    Quiz {
        quiz: QuizView,
    },
    Error {
        message: String,
    },
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct CellOut {
    pub key: String,
    pub form: Form,
    pub example: Form,
    pub invariant: bool,
}

pub fn cell_out(key: &str, cell: &Cell) -> CellOut {
    CellOut {
        key: key.to_string(),
        form: cell.form.clone(),
        example: cell.example.clone(),
        invariant: cell.invariant,
    }
}

#[derive(Debug, Deserialize)]
pub struct TableIn {
    pub selection: Selection,
    #[serde(default)]
    pub show_examples: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SelectionOut {
    pub word_class: WordClass,
    pub selection: Selection,
    pub columns: Vec<Column>,
}

#[derive(Debug, Serialize)]
pub struct SelectionsOut {
    pub selections: Vec<SelectionOut>,
}

pub fn selections_out(selections: Vec<Selection>) -> SelectionsOut {
    SelectionsOut {
        selections: selections
            .into_iter()
            .map(|s| SelectionOut { word_class: s.word_class(), columns: s.columns(), selection: s })
            .collect(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PrepositionQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub case: Option<Case>,
    #[serde(default)]
    pub show_examples: Option<bool>,
}

impl PrepositionQuery {
    pub fn into_filter(self) -> PrepositionFilter {
        PrepositionFilter {
            search: self.search.unwrap_or_default(),
            case: self.case,
            show_examples: self.show_examples.unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub id: String,
    pub quiz: QuizView,
}

#[derive(Debug, Deserialize)]
pub struct QuizSelectIn {
    pub option: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_messages_parse() {
        let m: ClientWsMessage =
            serde_json::from_str(r#"{"type":"view_table","selection":{"kind":"noun","gender":"neuter"}}"#)
                .expect("view_table");
        match m {
            ClientWsMessage::ViewTable { selection, show_examples } => {
                assert_eq!(selection, Selection::Noun { gender: Gender::Neuter });
                assert_eq!(show_examples, None);
            }
            other => panic!("unexpected {other:?}"),
        }

        let m: ClientWsMessage =
            serde_json::from_str(r#"{"type":"toggle_preposition","cell":{"entry":3,"field":"meaning"}}"#)
                .expect("toggle_preposition");
        assert!(matches!(m, ClientWsMessage::TogglePreposition { cell } if cell.entry == 3));

        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"quiz_submit"}"#).expect("quiz_submit");
        assert!(matches!(m, ClientWsMessage::QuizSubmit));

        let m: ClientWsMessage =
            serde_json::from_str(r#"{"type":"view_prepositions","filter":{"case":"dative"}}"#).expect("filter");
        assert!(matches!(m, ClientWsMessage::ViewPrepositions { filter: Some(f) } if f.case == Some(Case::Dative)));
    }

    #[test]
    fn server_messages_are_tagged() {
        let out = serde_json::to_value(ServerWsMessage::Quiz { quiz: QuizView::Loading }).expect("serialize");
        assert_eq!(out, serde_json::json!({ "type": "quiz", "quiz": { "status": "loading" } }));
        let out = serde_json::to_value(ServerWsMessage::Pong).expect("serialize");
        assert_eq!(out, serde_json::json!({ "type": "pong" }));
    }
}
