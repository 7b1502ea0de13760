//! Loading trainer configuration (display defaults + optional quiz bank) from TOML.
//!
//! Schema:
//! ```toml
//! show_examples = true        # initial state of the examples toggle
//! static_dir = "./static"     # UI shell served as SPA fallback
//! max_quiz_sessions = 1000    # HTTP quiz sessions kept; the least recently used is evicted
//!
//! [[questions]]               # optional: replaces the built-in quiz bank
//! id = 1
//! question = "..."
//! options = ["-а", "-у", "-ом", "-е"]
//! correct_answer = "-у"
//! explanation = "..."
//! category = "noun"
//! case = "dative"
//! gender = "masculine"        # optional
//! number = "singular"
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::quiz::QuizQuestion;

#[derive(Clone, Debug, Deserialize)]
pub struct TrainerConfig {
  #[serde(default = "default_show_examples")]
  pub show_examples: bool,
  #[serde(default = "default_static_dir")]
  pub static_dir: String,
  #[serde(default = "default_max_quiz_sessions")]
  pub max_quiz_sessions: usize,
  #[serde(default)]
  pub questions: Vec<QuizQuestion>,
}

fn default_show_examples() -> bool { true }

fn default_static_dir() -> String { "./static".into() }

fn default_max_quiz_sessions() -> usize { 1000 }

impl Default for TrainerConfig {
  fn default() -> Self {
    Self {
      show_examples: default_show_examples(),
      static_dir: default_static_dir(),
      max_quiz_sessions: default_max_quiz_sessions(),
      questions: Vec::new(),
    }
  }
}

/// Attempt to load `TrainerConfig` from TRAINER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_trainer_config_from_env() -> Option<TrainerConfig> {
  let path = std::env::var("TRAINER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => parse_config(&path, &s),
    Err(e) => {
      error!(target: "declension_trainer", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

fn parse_config(path: &str, src: &str) -> Option<TrainerConfig> {
  match toml::from_str::<TrainerConfig>(src) {
    Ok(cfg) => {
      info!(
        target: "declension_trainer",
        %path,
        show_examples = cfg.show_examples,
        static_dir = %cfg.static_dir,
        max_quiz_sessions = cfg.max_quiz_sessions,
        questions = cfg.questions.len(),
        "Loaded trainer config (TOML)"
      );
      Some(cfg)
    }
    Err(e) => {
      error!(target: "declension_trainer", %path, error = %e, "Failed to parse TOML config");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Case, WordClass};
  use pretty_assertions::assert_eq;

  #[test]
  fn empty_file_yields_defaults() {
    let cfg = parse_config("inline", "").expect("empty config parses");
    assert!(cfg.show_examples);
    assert_eq!(cfg.static_dir, "./static");
    assert_eq!(cfg.max_quiz_sessions, 1000);
    assert!(cfg.questions.is_empty());
  }

  #[test]
  fn questions_override_parses() {
    let src = r#"
show_examples = false

[[questions]]
id = 7
question = "Dative plural ending?"
options = ["-ам, -ям", "-ах, -ях", "-ами, -ями", "-ов, -ев"]
correct_answer = "-ам, -ям"
explanation = "All genders share -ам/-ям."
category = "noun"
case = "dative"
number = "plural"
"#;
    let cfg = parse_config("inline", src).expect("parses");
    assert!(!cfg.show_examples);
    assert_eq!(cfg.questions.len(), 1);
    assert_eq!(cfg.questions[0].case, Case::Dative);
    assert_eq!(cfg.questions[0].category, WordClass::Noun);
    assert_eq!(cfg.questions[0].gender, None);
  }

  #[test]
  fn malformed_file_is_ignored() {
    assert!(parse_config("inline", "show_examples = \"yes\"").is_none());
  }
}
