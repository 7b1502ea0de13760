//! Application state: immutable reference data plus the HTTP quiz session store.
//!
//! This module owns:
//!   - the paradigm catalog and the preposition book (shared, read-only)
//!   - the quiz bank (built-in, or the `[[questions]]` override from config)
//!   - quiz sessions created over HTTP, keyed by UUID and capped at
//!     `max_quiz_sessions` (least recently used goes first)
//!   - display defaults from config
//!
//! WebSocket clients do not touch the session store; each connection owns its
//! own `Workspace` (see `logic`).

use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::{load_trainer_config_from_env, TrainerConfig};
use crate::error::{QuizError, StartupError};
use crate::prepositions::PrepositionBook;
use crate::quiz::{QuizBank, QuizSession, QuizView};
use crate::seeds::{builtin_bank, builtin_catalog, builtin_prepositions};

/// HTTP quiz sessions with a least-recently-used cap.
#[derive(Debug)]
pub struct QuizStore {
    sessions: HashMap<String, StoredQuiz>,
    clock: u64,
    capacity: usize,
}

#[derive(Debug)]
struct StoredQuiz {
    session: QuizSession,
    touched: u64,
}

impl QuizStore {
    pub fn new(capacity: usize) -> Self {
        Self { sessions: HashMap::new(), clock: 0, capacity: capacity.max(1) }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Store a session, evicting the least recently used one when full.
    fn insert(&mut self, id: String, session: QuizSession) -> Option<String> {
        let evicted = if self.sessions.len() >= self.capacity {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, stored)| stored.touched)
                .map(|(id, _)| id.clone());
            if let Some(old) = &oldest {
                self.sessions.remove(old);
            }
            oldest
        } else {
            None
        };
        let touched = self.tick();
        self.sessions.insert(id, StoredQuiz { session, touched });
        evicted
    }

    fn touch(&mut self, id: &str) -> Option<&mut QuizSession> {
        let now = self.tick();
        let stored = self.sessions.get_mut(id)?;
        stored.touched = now;
        Some(&mut stored.session)
    }

    fn remove(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub prepositions: Arc<PrepositionBook>,
    pub bank: Arc<QuizBank>,
    pub sessions: Arc<RwLock<QuizStore>>,
    pub show_examples: bool,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Build state from env: load config, parse and validate built-in data.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, StartupError> {
        let cfg = load_trainer_config_from_env().unwrap_or_default();
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: TrainerConfig) -> Result<Self, StartupError> {
        let catalog = builtin_catalog()?;
        let prepositions = builtin_prepositions()?;
        info!(
            target: "declension",
            entries = prepositions.len(),
            cases = prepositions.cases().len(),
            "Preposition reference loaded"
        );

        // A broken override falls back to the built-in bank instead of failing startup.
        let bank = if cfg.questions.is_empty() {
            builtin_bank()?
        } else {
            match QuizBank::new(cfg.questions.clone()) {
                Ok(bank) => {
                    info!(target: "quiz", questions = bank.len(), "Using quiz bank from config");
                    bank
                }
                Err(e) => {
                    error!(target: "quiz", error = %e, "Invalid quiz bank in config; using built-in bank.");
                    builtin_bank()?
                }
            }
        };

        Ok(Self {
            catalog: Arc::new(catalog),
            prepositions: Arc::new(prepositions),
            bank: Arc::new(bank),
            sessions: Arc::new(RwLock::new(QuizStore::new(cfg.max_quiz_sessions))),
            show_examples: cfg.show_examples,
            static_dir: PathBuf::from(cfg.static_dir),
        })
    }

    /// Start a freshly shuffled quiz session and return its id.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_quiz(&self) -> (String, QuizView) {
        let session = QuizSession::start(&self.bank, &mut rand::thread_rng());
        let view = session.view(&self.bank);
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        if let Some(evicted) = sessions.insert(id.clone(), session) {
            warn!(target: "quiz", %evicted, capacity = sessions.capacity, "Quiz session store full; evicted least recently used");
        }
        info!(target: "quiz", %id, stored = sessions.len(), "Quiz session created");
        (id, view)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn quiz_view(&self, id: &str) -> Option<QuizView> {
        let mut sessions = self.sessions.write().await;
        sessions.touch(id).map(|s| s.view(&self.bank))
    }

    /// Drop a stored session. `false` if the id is unknown.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_quiz(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(id);
        if removed {
            info!(target: "quiz", %id, stored = sessions.len(), "Quiz session deleted");
        }
        removed
    }

    /// Apply `f` to a stored session. `None` if the id is unknown.
    pub async fn with_quiz<F>(&self, id: &str, f: F) -> Option<Result<QuizView, QuizError>>
    where
        F: FnOnce(&mut QuizSession, &QuizBank) -> Result<(), QuizError>,
    {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.touch(id) else {
            warn!(target: "quiz", %id, "Unknown quiz session");
            return None;
        };
        let res = f(session, &self.bank);
        debug!(target: "quiz", %id, index = session.current_index(), score = session.score(), "Quiz session updated");
        Some(res.map(|()| session.view(&self.bank)))
    }
}
