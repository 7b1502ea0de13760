//! Declension Trainer · Russian case reference and quiz backend
//!
//! - Axum HTTP + WebSocket API
//! - Paradigm tables (nouns, adjectives, pronouns, numerals) with per-cell hide/reveal
//! - Preposition reference with case filter
//! - Multiple-choice ending quiz
//! - Static SPA fallback (<static_dir>/index.html)
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000)
//!   TRAINER_CONFIG_PATH  : path to TOML config (display defaults + optional quiz bank)
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod paradigm;
mod selection;
mod reveal;
mod catalog;
mod prepositions;
mod quiz;
mod config;
mod seeds;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Parse and validate built-in data; invalid tables abort startup.
  let state = Arc::new(AppState::new()?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(
    target: "declension_trainer",
    %addr,
    questions = state.bank.len(),
    show_examples = state.show_examples,
    static_dir = %state.static_dir.display(),
    "HTTP server listening"
  );
  axum::serve(listener, app).await?;
  Ok(())
}
