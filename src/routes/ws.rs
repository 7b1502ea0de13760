//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! applied to the connection's own `Workspace`. We reply with a single JSON
//! message per request; rejected actions come back as `error` and the
//! connection stays open.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument, warn};

use crate::logic::{QuizAction, Workspace};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "declension_trainer", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "declension_trainer", "WebSocket connected");
  let mut workspace = Workspace::new(&state);

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "declension_trainer", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut workspace)
          }
          Err(e) => {
            warn!(target: "declension_trainer", payload = %trunc_for_log(&txt, 200), error = %e, "WS invalid JSON");
            ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "declension_trainer", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "declension_trainer", "WebSocket disconnected");
}

fn table_reply(res: Result<crate::catalog::TableView, crate::error::ParadigmError>) -> ServerWsMessage {
  match res {
    Ok(table) => ServerWsMessage::Table { table },
    Err(e) => {
      warn!(target: "declension", error = %e, "WS table request rejected");
      ServerWsMessage::Error { message: e.to_string() }
    }
  }
}

fn quiz_reply(res: Result<crate::quiz::QuizView, crate::error::QuizError>) -> ServerWsMessage {
  match res {
    Ok(quiz) => ServerWsMessage::Quiz { quiz },
    Err(e) => {
      debug!(target: "quiz", error = %e, "WS quiz action rejected");
      ServerWsMessage::Error { message: e.to_string() }
    }
  }
}

#[instrument(level = "info", skip(state, ws))]
fn handle_client_ws(msg: ClientWsMessage, state: &AppState, ws: &mut Workspace) -> ServerWsMessage {
  let mut rng = rand::thread_rng();
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ViewTable { selection, show_examples } => {
      table_reply(ws.view_table(state, selection, show_examples))
    }

    ClientWsMessage::ToggleCell { key } => table_reply(ws.toggle_cell(state, &key)),

    ClientWsMessage::SetAllHidden { word_class, hidden } => {
      table_reply(ws.set_all_hidden(state, word_class, hidden))
    }

    ClientWsMessage::RevealAll { word_class } => table_reply(ws.reveal_all(state, word_class)),

    ClientWsMessage::ViewPrepositions { filter } => {
      ServerWsMessage::Prepositions { prepositions: ws.view_prepositions(state, filter) }
    }

    ClientWsMessage::TogglePreposition { cell } => match ws.toggle_preposition(state, cell) {
      Some(prepositions) => ServerWsMessage::Prepositions { prepositions },
      None => ServerWsMessage::Error { message: format!("Unknown preposition entry: {}", cell.entry) },
    },

    ClientWsMessage::SetAllPrepositionsHidden { hidden } => {
      ServerWsMessage::Prepositions { prepositions: ws.set_all_prepositions_hidden(state, hidden) }
    }

    ClientWsMessage::QuizState => ServerWsMessage::Quiz { quiz: ws.quiz_state(state, &mut rng) },

    ClientWsMessage::QuizSelect { option } => {
      quiz_reply(ws.quiz_action(state, &QuizAction::Select { option }, &mut rng))
    }

    ClientWsMessage::QuizSubmit => quiz_reply(ws.quiz_action(state, &QuizAction::Submit, &mut rng)),

    ClientWsMessage::QuizAdvance => quiz_reply(ws.quiz_action(state, &QuizAction::Advance, &mut rng)),

    ClientWsMessage::QuizRestart => quiz_reply(ws.quiz_action(state, &QuizAction::Restart, &mut rng)),
  }
}
