//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Rendering paradigm tables for a selection (with or without hidden cells)
//!   - The per-connection `Workspace`: reveal boards, current selections,
//!     preposition filter and the connection's quiz session
//!   - Applying quiz actions to any session (WS-owned or HTTP-stored)

use std::collections::HashMap;

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::catalog::TableView;
use crate::domain::WordClass;
use crate::error::{ParadigmError, QuizError};
use crate::paradigm::{Cell, CellKey};
use crate::prepositions::{PrepositionCell, PrepositionFilter, PrepositionView};
use crate::quiz::{QuizBank, QuizSession, QuizView};
use crate::reveal::RevealBoard;
use crate::selection::Selection;
use crate::state::AppState;

/// A quiz transition requested by a client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QuizAction {
  Select { option: String },
  Submit,
  Advance,
  Restart,
}

/// Apply one action. Rejections leave the session as it was.
pub fn apply_quiz_action<R: Rng + ?Sized>(
  session: &mut QuizSession,
  bank: &QuizBank,
  action: &QuizAction,
  rng: &mut R,
) -> Result<(), QuizError> {
  match action {
    QuizAction::Select { option } => session.select_answer(bank, option),
    QuizAction::Submit => session.submit(bank).map(|_| ()),
    QuizAction::Advance => session.advance(bank, rng).map(|_| ()),
    QuizAction::Restart => {
      session.restart(bank, rng);
      Ok(())
    }
  }
}

/// Stateless lookup of one cell by reveal key.
#[instrument(level = "info", skip(state))]
pub fn resolve_key<'a>(state: &'a AppState, key: &str) -> Result<&'a Cell, ParadigmError> {
  state.catalog.resolve_key(key)
}

/// Render a table with nothing hidden.
#[instrument(level = "info", skip(state))]
pub fn render_plain_table(state: &AppState, selection: Selection, show_examples: bool) -> Result<TableView, ParadigmError> {
  state.catalog.render(selection, &RevealBoard::new(), show_examples)
}

/// Page-session state for one WebSocket connection. Owned by the connection
/// task; dropped on disconnect.
#[derive(Debug)]
pub struct Workspace {
  boards: HashMap<WordClass, RevealBoard<CellKey>>,
  selections: HashMap<WordClass, Selection>,
  show_examples: bool,
  preposition_board: RevealBoard<PrepositionCell>,
  preposition_filter: PrepositionFilter,
  quiz: QuizSession,
}

impl Workspace {
  pub fn new(state: &AppState) -> Self {
    Self {
      boards: HashMap::new(),
      selections: HashMap::new(),
      show_examples: state.show_examples,
      preposition_board: RevealBoard::new(),
      preposition_filter: PrepositionFilter::default(),
      quiz: QuizSession::loading(),
    }
  }

  fn selection(&self, class: WordClass) -> Selection {
    self.selections.get(&class).copied().unwrap_or_else(|| Selection::default_for(class))
  }

  fn board(&mut self, class: WordClass) -> &mut RevealBoard<CellKey> {
    self.boards.entry(class).or_default()
  }

  fn render(&self, state: &AppState, class: WordClass) -> Result<TableView, ParadigmError> {
    let empty = RevealBoard::new();
    let board = self.boards.get(&class).unwrap_or(&empty);
    state.catalog.render(self.selection(class), board, self.show_examples)
  }

  /// Switch the selection of one table. Hidden cells of other selections stay
  /// hidden and reappear when the user switches back.
  #[instrument(level = "debug", skip(self, state))]
  pub fn view_table(
    &mut self,
    state: &AppState,
    selection: Selection,
    show_examples: Option<bool>,
  ) -> Result<TableView, ParadigmError> {
    let selection = selection.canonical();
    if let Some(show) = show_examples {
      self.show_examples = show;
    }
    self.selections.insert(selection.word_class(), selection);
    self.render(state, selection.word_class())
  }

  #[instrument(level = "debug", skip(self, state))]
  pub fn toggle_cell(&mut self, state: &AppState, key: &str) -> Result<TableView, ParadigmError> {
    // Reject keys that name no real cell, or a cell the current table does not show.
    state.catalog.resolve_key(key)?;
    let (class, path) = CellKey::parse(key)?;
    let key = CellKey::new(class, path);
    if !self.selection(class).cell_keys().contains(&key) {
      return Err(ParadigmError::NotDisplayed(key.to_string()));
    }
    let hidden = self.board(class).toggle(key.clone());
    debug!(target: "declension", %key, hidden, "Cell toggled");
    self.render(state, class)
  }

  /// Test-mode switch: hide every cell of the current selection, or reveal all.
  #[instrument(level = "debug", skip(self, state))]
  pub fn set_all_hidden(&mut self, state: &AppState, class: WordClass, hidden: bool) -> Result<TableView, ParadigmError> {
    let keys = self.selection(class).cell_keys();
    let board = self.board(class);
    board.set_all(hidden, keys);
    debug!(target: "declension", table = %class, hidden, hidden_cells = board.len(), "Bulk reveal switch");
    self.render(state, class)
  }

  pub fn reveal_all(&mut self, state: &AppState, class: WordClass) -> Result<TableView, ParadigmError> {
    self.set_all_hidden(state, class, false)
  }

  pub fn view_prepositions(&mut self, state: &AppState, filter: Option<PrepositionFilter>) -> PrepositionView {
    if let Some(filter) = filter {
      self.preposition_filter = filter;
    }
    state.prepositions.render(&self.preposition_filter, &self.preposition_board)
  }

  /// `None` if `cell.entry` is not a known entry id.
  pub fn toggle_preposition(&mut self, state: &AppState, cell: PrepositionCell) -> Option<PrepositionView> {
    state.prepositions.get(cell.entry)?;
    self.preposition_board.toggle(cell);
    Some(self.view_prepositions(state, None))
  }

  pub fn set_all_prepositions_hidden(&mut self, state: &AppState, hidden: bool) -> PrepositionView {
    let cells = state.prepositions.cells(&self.preposition_filter);
    self.preposition_board.set_all(hidden, cells);
    debug!(target: "declension", hidden, hidden_cells = self.preposition_board.len(), "Preposition bulk switch");
    self.view_prepositions(state, None)
  }

  /// Current quiz view; the first call shuffles a new session.
  pub fn quiz_state<R: Rng + ?Sized>(&mut self, state: &AppState, rng: &mut R) -> QuizView {
    if matches!(self.quiz.view(&state.bank), QuizView::Loading) {
      self.quiz = QuizSession::start(&state.bank, rng);
      info!(target: "quiz", questions = state.bank.len(), "WS quiz session started");
    }
    self.quiz.view(&state.bank)
  }

  #[instrument(level = "debug", skip(self, state, rng))]
  pub fn quiz_action<R: Rng + ?Sized>(
    &mut self,
    state: &AppState,
    action: &QuizAction,
    rng: &mut R,
  ) -> Result<QuizView, QuizError> {
    apply_quiz_action(&mut self.quiz, &state.bank, action, rng)?;
    Ok(self.quiz.view(&state.bank))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::TrainerConfig;
  use crate::domain::{Case, Gender, Number, Possessor};
  use crate::prepositions::PrepositionField;
  use pretty_assertions::assert_eq;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn setup() -> (AppState, Workspace) {
    let state = AppState::from_config(TrainerConfig::default()).expect("state");
    let ws = Workspace::new(&state);
    (state, ws)
  }

  #[test]
  fn switching_gender_keeps_hidden_cells_per_gender() {
    let (state, mut ws) = setup();
    ws.view_table(&state, Selection::Noun { gender: Gender::Feminine }, None).expect("view");
    let view = ws.set_all_hidden(&state, WordClass::Noun, true).expect("hide");
    assert!(view.rows.iter().flat_map(|r| &r.cells).all(|c| c.hidden));

    let masc = ws.view_table(&state, Selection::Noun { gender: Gender::Masculine }, None).expect("view");
    assert!(!masc.any_hidden);

    let fem = ws.view_table(&state, Selection::Noun { gender: Gender::Feminine }, None).expect("view");
    assert!(fem.rows.iter().flat_map(|r| &r.cells).all(|c| c.hidden));

    let cleared = ws.reveal_all(&state, WordClass::Noun).expect("reveal");
    assert!(!cleared.any_hidden);
  }

  #[test]
  fn toggle_cell_validates_keys() {
    let (state, mut ws) = setup();
    let view = ws.toggle_cell(&state, "noun:masculine.singular.genitive").expect("toggle");
    assert!(view.rows[1].cells[0].hidden);
    let view = ws.toggle_cell(&state, "noun:masculine.singular.genitive").expect("toggle back");
    assert!(!view.any_hidden);

    assert!(ws.toggle_cell(&state, "noun:masculine.dual.genitive").is_err());
    assert!(ws.toggle_cell(&state, "garbage").is_err());
  }

  #[test]
  fn toggle_cell_only_accepts_cells_on_screen() {
    let (state, mut ws) = setup();
    assert_eq!(
      ws.toggle_cell(&state, "noun:feminine.plural.dative"),
      Err(ParadigmError::NotDisplayed("noun:feminine.plural.dative".into()))
    );
    assert!(ws.toggle_cell(&state, "pronoun:possessive.his.whatever").is_err());

    let his = Selection::Possessive { possessor: Possessor::His, number: Number::Plural, gender: None };
    ws.view_table(&state, his, None).expect("view");
    let view = ws.toggle_cell(&state, "pronoun:possessive.his.dative").expect("toggle");
    assert!(view.any_hidden);
    assert!(view.rows[2].cells[0].hidden);
    // Same constant cell reached through an agreement prefix is not what the table shows.
    assert!(ws.toggle_cell(&state, "pronoun:possessive.his.plural.dative").is_err());
  }

  #[test]
  fn examples_toggle_sticks_for_the_connection() {
    let (state, mut ws) = setup();
    let view = ws.view_table(&state, Selection::Adjective { gender: Gender::Neuter }, Some(false)).expect("view");
    assert!(view.rows.iter().flat_map(|r| &r.cells).all(|c| c.example.is_none()));
    let again = ws.toggle_cell(&state, "adjective:plural.all.dative").expect("toggle");
    assert!(!again.show_examples);
  }

  #[test]
  fn preposition_hiding_follows_the_filter() {
    let (state, mut ws) = setup();
    let filter = PrepositionFilter { search: String::new(), case: Some(Case::Genitive), ..Default::default() };
    let view = ws.view_prepositions(&state, Some(filter));
    let shown = view.entries.len();

    let hidden = ws.set_all_prepositions_hidden(&state, true);
    assert!(hidden.entries.iter().all(|e| e.case_hidden && e.meaning_hidden));

    let everything = ws.view_prepositions(&state, Some(PrepositionFilter::default()));
    assert_eq!(everything.entries.iter().filter(|e| e.case_hidden).count(), shown);

    let id = everything.entries.iter().find(|e| !e.case_hidden).map(|e| e.id).expect("visible entry");
    let toggled = ws
      .toggle_preposition(&state, PrepositionCell { entry: id, field: PrepositionField::Case })
      .expect("known entry");
    assert_eq!(toggled.entries.iter().filter(|e| e.case_hidden).count(), shown + 1);
    assert!(ws
      .toggle_preposition(&state, PrepositionCell { entry: 10_000, field: PrepositionField::Meaning })
      .is_none());

    let cleared = ws.set_all_prepositions_hidden(&state, false);
    assert!(!cleared.any_hidden);
  }

  #[test]
  fn workspace_quiz_runs_through_actions() {
    let (state, mut ws) = setup();
    let mut rng = StdRng::seed_from_u64(42);

    let QuizView::Question(first) = ws.quiz_state(&state, &mut rng) else { panic!("expected a question") };
    assert_eq!(first.position, 1);
    assert_eq!(first.total, 30);

    let correct = state.bank.get(first.id).expect("question").correct_answer.clone();
    ws.quiz_action(&state, &QuizAction::Select { option: correct }, &mut rng).expect("select");
    let QuizView::Question(answered) = ws.quiz_action(&state, &QuizAction::Submit, &mut rng).expect("submit") else {
      panic!("expected a question")
    };
    assert_eq!(answered.score, 1);
    assert_eq!(
      ws.quiz_action(&state, &QuizAction::Submit, &mut rng),
      Err(QuizError::AlreadyAnswered)
    );

    let QuizView::Question(next) = ws.quiz_action(&state, &QuizAction::Advance, &mut rng).expect("advance") else {
      panic!("expected a question")
    };
    assert_eq!(next.position, 2);

    // quiz_state does not reshuffle a running session.
    let QuizView::Question(same) = ws.quiz_state(&state, &mut rng) else { panic!("expected a question") };
    assert_eq!(same.id, next.id);
  }

  #[test]
  fn quiz_actions_deserialize() {
    let a: QuizAction = serde_json::from_str(r#"{"action":"select","option":"-у"}"#).expect("deserialize");
    assert_eq!(a, QuizAction::Select { option: "-у".into() });
    let b: QuizAction = serde_json::from_str(r#"{"action":"restart"}"#).expect("deserialize");
    assert_eq!(b, QuizAction::Restart);
  }
}
