//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; failures map to JSON error bodies via `FlowError`.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::FlowError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let session_id = state.create_session().await;
  info!(target: "interview", session = %session_id, "HTTP session created");
  Json(SessionOut { session_id })
}

#[instrument(level = "info", skip(state), fields(session = %id))]
pub async fn http_end_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<OkOut>, FlowError> {
  if state.end_session(&id).await {
    Ok(Json(OkOut { ok: true }))
  } else {
    Err(FlowError::UnknownSession(id))
  }
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id))]
pub async fn http_configure(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ConfigureIn>,
) -> Result<Json<OkOut>, FlowError> {
  configure_session(&state, &body.session_id, &body.api_key).await?;
  Ok(Json(OkOut { ok: true }))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, company = %body.company, role = %body.role))]
pub async fn http_generate_questions(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateIn>,
) -> Result<Json<QuestionsOut>, FlowError> {
  let questions =
    generate_questions(&state, &body.session_id, &body.company, &body.role, body.interview_type).await?;
  info!(target: "interview", session = %body.session_id, total = questions.len(), "HTTP question set served");
  Ok(Json(QuestionsOut { questions }))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, index = body.index))]
pub async fn http_select_question(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SelectIn>,
) -> Result<Json<SelectOut>, FlowError> {
  let question = select_question(&state, &body.session_id, body.index).await?;
  Ok(Json(SelectOut { index: body.index, question }))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, index = body.index, answer_len = body.answer.len()))]
pub async fn http_save_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SaveAnswerIn>,
) -> Result<Json<OkOut>, FlowError> {
  save_answer(&state, &body.session_id, body.index, &body.answer).await?;
  Ok(Json(OkOut { ok: true }))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, index = body.index))]
pub async fn http_evaluate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EvaluateIn>,
) -> Result<Json<EvaluationHttpOut>, FlowError> {
  let evaluation = evaluate_answer(&state, &body.session_id, body.index).await?;
  info!(target: "interview", session = %body.session_id, index = body.index, score = evaluation.score, "HTTP evaluation served");
  Ok(Json(EvaluationHttpOut { index: body.index, evaluation: to_out(&evaluation) }))
}

#[instrument(level = "info", skip(state), fields(session = %q.session_id))]
pub async fn http_progress(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ProgressQuery>,
) -> Result<Json<ProgressOut>, FlowError> {
  let progress = session_progress(&state, &q.session_id).await?;
  Ok(Json(progress))
}
