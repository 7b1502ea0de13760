//! Multiple-choice quiz over a fixed bank of ending questions.
//!
//! `QuizSession` is a small state machine:
//!
//! ```text
//!   start ──► unanswered ──select──► unanswered(selected) ──submit──► answered
//!                 ▲                                                      │
//!                 └───────────── advance (not last) ◄────────────────────┤
//!   start ◄──────────────────── advance (last) / restart ◄───────────────┘
//! ```
//!
//! Rejected transitions return a `QuizError` and leave the session untouched.
//! An empty question order is the transient loading state.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::domain::{Case, Gender, Number, WordClass};
use crate::error::{BankError, QuizError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub id: u32,
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: String,
  pub explanation: String,
  pub category: WordClass,
  pub case: Case,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gender: Option<Gender>,
  pub number: Number,
}

impl QuizQuestion {
  fn validate(&self) -> Result<(), BankError> {
    if self.question.trim().is_empty() {
      return Err(BankError::EmptyQuestion(self.id));
    }
    if self.options.len() != 4 {
      return Err(BankError::OptionCount { id: self.id, count: self.options.len() });
    }
    for (i, opt) in self.options.iter().enumerate() {
      if self.options[..i].contains(opt) {
        return Err(BankError::DuplicateOption { id: self.id, option: opt.clone() });
      }
    }
    if !self.options.contains(&self.correct_answer) {
      return Err(BankError::CorrectNotInOptions { id: self.id, answer: self.correct_answer.clone() });
    }
    Ok(())
  }
}

/// A validated, immutable question bank.
#[derive(Clone, Debug)]
pub struct QuizBank {
  questions: Vec<QuizQuestion>,
  by_id: HashMap<u32, usize>,
}

#[derive(Deserialize)]
struct BankFile {
  questions: Vec<QuizQuestion>,
}

impl QuizBank {
  pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, BankError> {
    if questions.is_empty() {
      return Err(BankError::Empty);
    }
    let mut by_id = HashMap::with_capacity(questions.len());
    for (i, q) in questions.iter().enumerate() {
      q.validate()?;
      if by_id.insert(q.id, i).is_some() {
        return Err(BankError::DuplicateId(q.id));
      }
    }
    info!(target: "quiz", questions = questions.len(), "Quiz bank validated");
    Ok(Self { questions, by_id })
  }

  pub fn from_toml(src: &str) -> Result<Self, BankError> {
    let file: BankFile = toml::from_str(src).map_err(|e| BankError::Parse(e.to_string()))?;
    Self::new(file.questions)
  }

  pub fn len(&self) -> usize {
    self.questions.len()
  }

  pub fn get(&self, id: u32) -> Option<&QuizQuestion> {
    self.by_id.get(&id).map(|i| &self.questions[*i])
  }

  #[cfg(test)]
  pub fn questions(&self) -> &[QuizQuestion] {
    &self.questions
  }

  /// Uniformly shuffled question ids.
  fn shuffled_ids<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u32> {
    let mut ids: Vec<u32> = self.questions.iter().map(|q| q.id).collect();
    ids.shuffle(rng);
    ids
  }
}

/// What `advance` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advance {
  Next,
  Restarted,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSession {
  order: Vec<u32>,
  current_index: usize,
  selected_answer: Option<String>,
  is_answered: bool,
  score: u32,
}

impl QuizSession {
  /// A session with no questions yet; renders as loading.
  pub fn loading() -> Self {
    Self::default()
  }

  #[instrument(level = "debug", skip_all, fields(questions = bank.len()))]
  pub fn start<R: Rng + ?Sized>(bank: &QuizBank, rng: &mut R) -> Self {
    let order = bank.shuffled_ids(rng);
    debug!(target: "quiz", first = ?order.first(), "Quiz session shuffled");
    Self { order, ..Self::default() }
  }

  #[cfg(test)]
  pub fn order(&self) -> &[u32] {
    &self.order
  }

  pub fn current_index(&self) -> usize {
    self.current_index
  }

  #[cfg(test)]
  pub fn selected_answer(&self) -> Option<&str> {
    self.selected_answer.as_deref()
  }

  #[cfg(test)]
  pub fn is_answered(&self) -> bool {
    self.is_answered
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  pub fn is_last(&self) -> bool {
    self.current_index + 1 >= self.order.len()
  }

  /// `None` while loading.
  pub fn current_question<'b>(&self, bank: &'b QuizBank) -> Option<&'b QuizQuestion> {
    self.order.get(self.current_index).and_then(|id| bank.get(*id))
  }

  pub fn select_answer(&mut self, bank: &QuizBank, option: &str) -> Result<(), QuizError> {
    let question = self.current_question(bank).ok_or(QuizError::Loading)?;
    if self.is_answered {
      return Err(QuizError::AlreadyAnswered);
    }
    if !question.options.iter().any(|o| o == option) {
      return Err(QuizError::UnknownOption(option.to_string()));
    }
    self.selected_answer = Some(option.to_string());
    Ok(())
  }

  /// Lock in the selected answer. Returns whether it was correct.
  pub fn submit(&mut self, bank: &QuizBank) -> Result<bool, QuizError> {
    let question = self.current_question(bank).ok_or(QuizError::Loading)?;
    if self.is_answered {
      return Err(QuizError::AlreadyAnswered);
    }
    let selected = self.selected_answer.as_deref().ok_or(QuizError::NothingSelected)?;
    let correct = selected == question.correct_answer;
    if correct {
      self.score += 1;
    }
    self.is_answered = true;
    debug!(target: "quiz", id = question.id, correct, score = self.score, "Answer submitted");
    Ok(correct)
  }

  /// Move on after an answer. Past the last question this is a full restart.
  pub fn advance<R: Rng + ?Sized>(&mut self, bank: &QuizBank, rng: &mut R) -> Result<Advance, QuizError> {
    if self.current_question(bank).is_none() {
      return Err(QuizError::Loading);
    }
    if !self.is_answered {
      return Err(QuizError::NotAnswered);
    }
    if self.is_last() {
      info!(target: "quiz", score = self.score, total = self.order.len(), "Quiz finished");
      self.restart(bank, rng);
      return Ok(Advance::Restarted);
    }
    self.current_index += 1;
    self.selected_answer = None;
    self.is_answered = false;
    Ok(Advance::Next)
  }

  pub fn restart<R: Rng + ?Sized>(&mut self, bank: &QuizBank, rng: &mut R) {
    *self = Self::start(bank, rng);
  }

  pub fn view(&self, bank: &QuizBank) -> QuizView {
    let Some(q) = self.current_question(bank) else {
      return QuizView::Loading;
    };
    let total = self.order.len();
    let options = q
      .options
      .iter()
      .map(|text| {
        let selected = self.selected_answer.as_deref() == Some(text.as_str());
        let mark = if !self.is_answered {
          None
        } else if *text == q.correct_answer {
          Some(OptionMark::Correct)
        } else if selected {
          Some(OptionMark::Wrong)
        } else {
          None
        };
        OptionView { text: text.clone(), selected, mark }
      })
      .collect();

    QuizView::Question(QuestionView {
      id: q.id,
      question: q.question.clone(),
      category: q.category,
      case: q.case,
      options,
      selected_answer: self.selected_answer.clone(),
      is_answered: self.is_answered,
      is_correct: self.is_answered.then(|| self.selected_answer.as_deref() == Some(q.correct_answer.as_str())),
      explanation: self.is_answered.then(|| q.explanation.clone()),
      score: self.score,
      answered_count: self.current_index + usize::from(self.is_answered),
      position: self.current_index + 1,
      total,
      progress: (self.current_index + 1) as f64 / total as f64,
      next_label: if self.is_last() { "Finish Quiz" } else { "Next Question" },
    })
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMark {
  Correct,
  Wrong,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionView {
  pub text: String,
  pub selected: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mark: Option<OptionMark>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionView {
  pub id: u32,
  pub question: String,
  pub category: WordClass,
  pub case: Case,
  pub options: Vec<OptionView>,
  pub selected_answer: Option<String>,
  pub is_answered: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_correct: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  pub score: u32,
  pub answered_count: usize,
  pub position: usize,
  pub total: usize,
  pub progress: f64,
  pub next_label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizView {
  Loading,
  Question(QuestionView),
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::builtin_bank;
  use pretty_assertions::assert_eq;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use rstest::rstest;

  fn question(id: u32, correct: &str) -> QuizQuestion {
    QuizQuestion {
      id,
      question: format!("Question {id}?"),
      options: vec!["-а".into(), "-у".into(), "-ом".into(), "-е".into()],
      correct_answer: correct.into(),
      explanation: format!("Because of rule {id}."),
      category: WordClass::Noun,
      case: Case::Dative,
      gender: Some(Gender::Masculine),
      number: Number::Singular,
    }
  }

  fn three() -> QuizBank {
    QuizBank::new(vec![question(1, "-а"), question(2, "-у"), question(3, "-е")]).expect("valid bank")
  }

  #[test]
  fn builtin_bank_is_valid() {
    let bank = builtin_bank().expect("built-in bank");
    assert_eq!(bank.len(), 30);
    for q in bank.questions() {
      assert_eq!(q.options.len(), 4);
      assert!(q.options.contains(&q.correct_answer), "question {}", q.id);
      let distinct: std::collections::HashSet<_> = q.options.iter().collect();
      assert_eq!(distinct.len(), 4, "question {}", q.id);
    }
  }

  #[rstest]
  #[case(vec![question(1, "-а"), question(1, "-у")], BankError::DuplicateId(1))]
  #[case(vec![QuizQuestion { options: vec!["-а".into(), "-у".into(), "-е".into()], ..question(2, "-а") }], BankError::OptionCount { id: 2, count: 3 })]
  #[case(vec![QuizQuestion { options: vec!["-а".into(), "-у".into(), "-а".into(), "-е".into()], ..question(3, "-у") }], BankError::DuplicateOption { id: 3, option: "-а".into() })]
  #[case(vec![question(4, "-ы")], BankError::CorrectNotInOptions { id: 4, answer: "-ы".into() })]
  #[case(vec![QuizQuestion { question: "  ".into(), ..question(5, "-а") }], BankError::EmptyQuestion(5))]
  #[case(vec![], BankError::Empty)]
  fn invalid_banks_are_rejected(#[case] questions: Vec<QuizQuestion>, #[case] expected: BankError) {
    assert_eq!(QuizBank::new(questions).unwrap_err(), expected);
  }

  #[test]
  fn start_yields_a_permutation() {
    let bank = builtin_bank().expect("built-in bank");
    let mut rng = StdRng::seed_from_u64(7);
    let session = QuizSession::start(&bank, &mut rng);
    let mut ids = session.order().to_vec();
    ids.sort_unstable();
    let mut expected: Vec<u32> = bank.questions().iter().map(|q| q.id).collect();
    expected.sort_unstable();
    assert_eq!(ids, expected);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.score(), 0);
    assert!(!session.is_answered());
    assert_eq!(session.selected_answer(), None);
  }

  #[test]
  fn shuffle_positions_are_roughly_uniform() {
    let bank = QuizBank::new((1..=4).map(|id| question(id, "-а")).collect()).expect("valid bank");
    let mut rng = StdRng::seed_from_u64(2024);
    let runs = 8000;
    let mut first_at = [0usize; 4];
    for _ in 0..runs {
      let session = QuizSession::start(&bank, &mut rng);
      let pos = session.order().iter().position(|id| *id == 1).expect("id 1 present");
      first_at[pos] += 1;
    }
    // Expected 2000 each; sd is about 39.
    for count in first_at {
      assert!((1800..=2200).contains(&count), "position counts {first_at:?}");
    }
  }

  #[test]
  fn three_question_scenario() {
    let bank = three();
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = QuizSession::start(&bank, &mut rng);

    // First question: answer correctly.
    let q = session.current_question(&bank).expect("question").clone();
    session.select_answer(&bank, &q.correct_answer).expect("select");
    assert_eq!(session.submit(&bank), Ok(true));
    assert_eq!(session.score(), 1);
    assert_eq!(session.advance(&bank, &mut rng), Ok(Advance::Next));

    // Second and third: answer wrong.
    for _ in 0..2 {
      let q = session.current_question(&bank).expect("question").clone();
      let wrong = q.options.iter().find(|o| **o != q.correct_answer).expect("a wrong option").clone();
      session.select_answer(&bank, &wrong).expect("select");
      assert_eq!(session.submit(&bank), Ok(false));
      assert_eq!(session.score(), 1);
      if !session.is_last() {
        assert_eq!(session.advance(&bank, &mut rng), Ok(Advance::Next));
      }
    }

    match session.view(&bank) {
      QuizView::Question(v) => {
        assert_eq!(v.next_label, "Finish Quiz");
        assert_eq!(v.answered_count, 3);
        assert_eq!(v.position, 3);
        assert_eq!(v.score, 1);
      }
      QuizView::Loading => panic!("expected a question"),
    }

    assert_eq!(session.advance(&bank, &mut rng), Ok(Advance::Restarted));
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.score(), 0);
    assert!(!session.is_answered());
    assert_eq!(session.selected_answer(), None);
    assert_eq!(session.order().len(), 3);
  }

  #[test]
  fn answer_is_frozen_once_submitted() {
    let bank = three();
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = QuizSession::start(&bank, &mut rng);
    let q = session.current_question(&bank).expect("question").clone();

    session.select_answer(&bank, &q.correct_answer).expect("select");
    session.submit(&bank).expect("submit");
    let snapshot = session.clone();

    let other = q.options.iter().find(|o| **o != q.correct_answer).expect("other").clone();
    assert_eq!(session.select_answer(&bank, &other), Err(QuizError::AlreadyAnswered));
    assert_eq!(session.submit(&bank), Err(QuizError::AlreadyAnswered));
    assert_eq!(session, snapshot);
    assert_eq!(session.score(), 1);
  }

  #[test]
  fn rejected_transitions_leave_state_unchanged() {
    let bank = three();
    let mut rng = StdRng::seed_from_u64(5);
    let mut session = QuizSession::start(&bank, &mut rng);
    let snapshot = session.clone();

    assert_eq!(session.submit(&bank), Err(QuizError::NothingSelected));
    assert_eq!(session.advance(&bank, &mut rng), Err(QuizError::NotAnswered));
    assert_eq!(session.select_answer(&bank, "-ами"), Err(QuizError::UnknownOption("-ами".into())));
    assert_eq!(session, snapshot);

    // Changing the selection before submitting is allowed.
    session.select_answer(&bank, "-у").expect("select");
    session.select_answer(&bank, "-е").expect("reselect");
    assert_eq!(session.selected_answer(), Some("-е"));
  }

  #[test]
  fn loading_session_renders_placeholder_and_rejects_moves() {
    let bank = three();
    let mut rng = StdRng::seed_from_u64(9);
    let mut session = QuizSession::loading();
    assert_eq!(session.view(&bank), QuizView::Loading);
    assert_eq!(session.select_answer(&bank, "-а"), Err(QuizError::Loading));
    assert_eq!(session.submit(&bank), Err(QuizError::Loading));
    assert_eq!(session.advance(&bank, &mut rng), Err(QuizError::Loading));

    session.restart(&bank, &mut rng);
    assert!(matches!(session.view(&bank), QuizView::Question(_)));
  }

  #[test]
  fn view_marks_options_only_after_answering() {
    let bank = three();
    let mut rng = StdRng::seed_from_u64(11);
    let mut session = QuizSession::start(&bank, &mut rng);
    let q = session.current_question(&bank).expect("question").clone();
    let wrong = q.options.iter().find(|o| **o != q.correct_answer).expect("wrong").clone();
    session.select_answer(&bank, &wrong).expect("select");

    let QuizView::Question(before) = session.view(&bank) else { panic!("expected a question") };
    assert!(before.options.iter().all(|o| o.mark.is_none()));
    assert_eq!(before.explanation, None);
    assert_eq!(before.answered_count, 0);
    assert!((before.progress - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(before.next_label, "Next Question");

    session.submit(&bank).expect("submit");
    let QuizView::Question(after) = session.view(&bank) else { panic!("expected a question") };
    let marks: Vec<(String, Option<OptionMark>)> = after.options.iter().map(|o| (o.text.clone(), o.mark)).collect();
    for (text, mark) in marks {
      if text == q.correct_answer {
        assert_eq!(mark, Some(OptionMark::Correct));
      } else if text == wrong {
        assert_eq!(mark, Some(OptionMark::Wrong));
      } else {
        assert_eq!(mark, None);
      }
    }
    assert_eq!(after.explanation, Some(q.explanation.clone()));
    assert_eq!(after.is_correct, Some(false));
    assert_eq!(after.answered_count, 1);
  }
}
