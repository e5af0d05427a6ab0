//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! The connection IS the session: a fresh `Session` is created on upgrade and
//! destroyed when the socket closes, so WS clients never juggle session ids.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::FlowError;
use crate::logic::*;
use crate::protocol::{to_out, ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "prep_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let session_id = state.create_session().await;
  info!(target: "prep_backend", session = %session_id, "WebSocket connected");

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "prep_backend", session = %session_id, "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &session_id).await
          }
          Err(e) => ServerWsMessage::Error {
            kind: "invalid_json".into(),
            message: format!("Invalid JSON: {}", e),
            excerpt: None,
          },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "kind": "internal", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "prep_backend", session = %session_id, error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }

  state.end_session(&session_id).await;
  info!(target: "prep_backend", session = %session_id, "WebSocket disconnected");
}

fn err_to_ws(e: FlowError) -> ServerWsMessage {
  ServerWsMessage::Error {
    kind: e.kind().into(),
    excerpt: e.excerpt().map(str::to_string),
    message: e.to_string(),
  }
}

#[instrument(level = "info", skip(state, msg), fields(session = %session_id))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session_id: &str) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Configure { api_key } => {
      match configure_session(state, session_id, &api_key).await {
        Ok(()) => ServerWsMessage::Configured,
        Err(e) => err_to_ws(e),
      }
    }

    ClientWsMessage::GenerateQuestions { company, role, interview_type } => {
      match generate_questions(state, session_id, &company, &role, interview_type).await {
        Ok(questions) => {
          tracing::info!(target: "interview", session = %session_id, total = questions.len(), "WS question set served");
          ServerWsMessage::Questions { questions }
        }
        Err(e) => err_to_ws(e),
      }
    }

    ClientWsMessage::SelectQuestion { index } => {
      match select_question(state, session_id, index).await {
        Ok(question) => ServerWsMessage::QuestionSelected { index, question },
        Err(e) => err_to_ws(e),
      }
    }

    ClientWsMessage::SaveAnswer { index, answer } => {
      match save_answer(state, session_id, index, &answer).await {
        Ok(()) => ServerWsMessage::AnswerSaved { index },
        Err(e) => err_to_ws(e),
      }
    }

    ClientWsMessage::Evaluate { index } => {
      match evaluate_answer(state, session_id, index).await {
        Ok(evaluation) => {
          tracing::info!(target: "interview", session = %session_id, %index, score = evaluation.score, "WS evaluation served");
          ServerWsMessage::Evaluation { index, evaluation: to_out(&evaluation) }
        }
        Err(e) => err_to_ws(e),
      }
    }

    ClientWsMessage::Progress => {
      match session_progress(state, session_id).await {
        Ok(progress) => ServerWsMessage::Progress { progress },
        Err(e) => err_to_ws(e),
      }
    }
  }
}
