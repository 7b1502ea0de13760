//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::logic::*;
use crate::protocol::*;
use crate::selection::Selection;
use crate::state::AppState;

fn error_response(status: StatusCode, message: impl std::fmt::Display) -> Response {
  (status, Json(ErrorOut { error: message.to_string() })).into_response()
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(key = %q.key))]
pub async fn http_get_resolve(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ResolveQuery>,
) -> Response {
  match resolve_key(&state, &q.key) {
    Ok(cell) => Json(cell_out(&q.key, cell)).into_response(),
    Err(e) => {
      warn!(target: "declension", key = %q.key, error = %e, "HTTP resolve rejected");
      error_response(StatusCode::NOT_FOUND, e)
    }
  }
}

#[instrument(level = "info", skip(state, body), fields(selection = ?body.selection))]
pub async fn http_post_table(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TableIn>,
) -> Response {
  let show_examples = body.show_examples.unwrap_or(state.show_examples);
  match render_plain_table(&state, body.selection, show_examples) {
    Ok(table) => Json(table).into_response(),
    Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e),
  }
}

#[instrument(level = "info")]
pub async fn http_get_selections() -> impl IntoResponse {
  Json(selections_out(Selection::space()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_prepositions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PrepositionQuery>,
) -> impl IntoResponse {
  let filter = q.into_filter();
  let view = state.prepositions.render(&filter, &Default::default());
  info!(target: "declension", shown = view.entries.len(), "HTTP prepositions served");
  Json(view)
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_quiz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let (id, quiz) = state.create_quiz().await;
  (StatusCode::CREATED, Json(QuizOut { id, quiz }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  match state.quiz_view(&id).await {
    Some(quiz) => Json(QuizOut { id, quiz }).into_response(),
    None => error_response(StatusCode::NOT_FOUND, format!("Unknown quiz session: {}", id)),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  if state.delete_quiz(&id).await {
    StatusCode::NO_CONTENT.into_response()
  } else {
    error_response(StatusCode::NOT_FOUND, format!("Unknown quiz session: {}", id))
  }
}

async fn run_quiz_action(state: &AppState, id: String, action: QuizAction) -> Response {
  let res = state
    .with_quiz(&id, |session, bank| apply_quiz_action(session, bank, &action, &mut rand::thread_rng()))
    .await;
  match res {
    None => error_response(StatusCode::NOT_FOUND, format!("Unknown quiz session: {}", id)),
    Some(Ok(quiz)) => {
      info!(target: "quiz", %id, ?action, "HTTP quiz action applied");
      Json(QuizOut { id, quiz }).into_response()
    }
    Some(Err(e)) => {
      warn!(target: "quiz", %id, ?action, error = %e, "HTTP quiz action rejected");
      error_response(StatusCode::CONFLICT, e)
    }
  }
}

#[instrument(level = "info", skip(state, body), fields(option = %body.option))]
pub async fn http_post_quiz_select(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<QuizSelectIn>,
) -> Response {
  run_quiz_action(&state, id, QuizAction::Select { option: body.option }).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_quiz_submit(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
  run_quiz_action(&state, id, QuizAction::Submit).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_quiz_advance(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
  run_quiz_action(&state, id, QuizAction::Advance).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_quiz_restart(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
  run_quiz_action(&state, id, QuizAction::Restart).await
}
