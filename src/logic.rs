//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Configuring the per-session API key
//!   - Generating the question set (one model call, replaces prior state)
//!   - Saving answers and navigating questions
//!   - Evaluating a saved answer (one model call per evaluation)
//!
//! Every flow checks its preconditions before any network activity and only
//! mutates session state after the model output parsed successfully, so a
//! failed action always leaves prior state untouched.

use tracing::{error, info, instrument};

use crate::domain::{Evaluation, InterviewSetup, InterviewType};
use crate::error::FlowError;
use crate::extract;
use crate::protocol::{ProgressOut, QuestionStatus};
use crate::state::AppState;
use crate::util::trunc_for_log;

/// Set (or replace) the API key for a session. Blank keys are rejected.
#[instrument(level = "info", skip(state, api_key), fields(session = %session_id))]
pub async fn configure_session(state: &AppState, session_id: &str, api_key: &str) -> Result<(), FlowError> {
  let api_key = api_key.trim();
  if api_key.is_empty() {
    return Err(FlowError::MissingInput("api_key"));
  }
  let mut sessions = state.sessions.write().await;
  let session = sessions
    .get_mut(session_id)
    .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
  session.api_key = Some(api_key.to_string());
  info!(target: "interview", session = %session_id, "API key configured");
  Ok(())
}

/// Generate a fresh question set for the given setup.
///
/// On success the session's question set is replaced (truncated to the cap),
/// the cursor resets to 0, and saved answers/evaluations are cleared.
#[instrument(level = "info", skip(state), fields(session = %session_id, %company, %role))]
pub async fn generate_questions(
  state: &AppState,
  session_id: &str,
  company: &str,
  role: &str,
  interview_type: InterviewType,
) -> Result<Vec<String>, FlowError> {
  let api_key = {
    let sessions = state.sessions.read().await;
    let session = sessions
      .get(session_id)
      .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
    session.api_key.clone().ok_or(FlowError::MissingApiKey)?
  };

  let company = company.trim();
  let role = role.trim();
  if company.is_empty() {
    return Err(FlowError::MissingInput("company"));
  }
  if role.is_empty() {
    return Err(FlowError::MissingInput("role"));
  }

  let raw = state
    .gemini
    .generate_questions_text(&api_key, &state.prompts, company, role, interview_type)
    .await
    .map_err(FlowError::Remote)?;
  let questions = questions_from_raw(&raw).map_err(|e| {
    error!(target: "interview", session = %session_id, raw = %trunc_for_log(&raw, 200), "Question parse failed");
    e
  })?;

  let mut sessions = state.sessions.write().await;
  let session = sessions
    .get_mut(session_id)
    .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
  session.setup = Some(InterviewSetup {
    company: company.to_string(),
    role: role.to_string(),
    interview_type,
  });
  session.replace_questions(questions);
  info!(target: "interview", session = %session_id, total = session.questions.len(), "Question set replaced");
  Ok(session.questions.clone())
}

/// Move the session cursor. Returns the selected question text.
#[instrument(level = "info", skip(state), fields(session = %session_id, %index))]
pub async fn select_question(state: &AppState, session_id: &str, index: usize) -> Result<String, FlowError> {
  let mut sessions = state.sessions.write().await;
  let session = sessions
    .get_mut(session_id)
    .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
  let question = session
    .questions
    .get(index)
    .cloned()
    .ok_or(FlowError::UnknownQuestion(index))?;
  session.current = index;
  Ok(question)
}

/// Save (or overwrite) the user's answer at the given index.
#[instrument(level = "info", skip(state, answer), fields(session = %session_id, %index, answer_len = answer.len()))]
pub async fn save_answer(state: &AppState, session_id: &str, index: usize, answer: &str) -> Result<(), FlowError> {
  if answer.trim().is_empty() {
    return Err(FlowError::MissingInput("answer"));
  }
  let mut sessions = state.sessions.write().await;
  let session = sessions
    .get_mut(session_id)
    .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
  if index >= session.questions.len() {
    return Err(FlowError::UnknownQuestion(index));
  }
  session.answers.insert(index, answer.to_string());
  info!(target: "interview", session = %session_id, %index, "Answer saved");
  Ok(())
}

/// Evaluate the saved answer at the given index via one model call.
///
/// Precondition (checked before any call): an answer must already be saved
/// at that index.
#[instrument(level = "info", skip(state), fields(session = %session_id, %index))]
pub async fn evaluate_answer(state: &AppState, session_id: &str, index: usize) -> Result<Evaluation, FlowError> {
  let (api_key, question, role, answer) = {
    let sessions = state.sessions.read().await;
    let session = sessions
      .get(session_id)
      .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
    let api_key = session.api_key.clone().ok_or(FlowError::MissingApiKey)?;
    let question = session
      .questions
      .get(index)
      .cloned()
      .ok_or(FlowError::UnknownQuestion(index))?;
    let answer = session
      .answers
      .get(&index)
      .cloned()
      .ok_or(FlowError::UnsavedAnswer(index))?;
    let role = session
      .setup
      .as_ref()
      .map(|s| s.role.clone())
      .unwrap_or_default();
    (api_key, question, role, answer)
  };

  let raw = state
    .gemini
    .evaluate_answer_text(&api_key, &state.prompts, &question, &role, &answer)
    .await
    .map_err(FlowError::Remote)?;
  let evaluation = evaluation_from_raw(&raw).map_err(|e| {
    error!(target: "interview", session = %session_id, raw = %trunc_for_log(&raw, 200), "Evaluation parse failed");
    e
  })?;

  let mut sessions = state.sessions.write().await;
  let session = sessions
    .get_mut(session_id)
    .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
  session.evaluations.insert(index, evaluation.clone());
  info!(target: "interview", session = %session_id, %index, score = evaluation.score, "Answer evaluated");
  Ok(evaluation)
}

/// Snapshot for the question navigator and the progress bar.
#[instrument(level = "debug", skip(state), fields(session = %session_id))]
pub async fn session_progress(state: &AppState, session_id: &str) -> Result<ProgressOut, FlowError> {
  let sessions = state.sessions.read().await;
  let session = sessions
    .get(session_id)
    .ok_or_else(|| FlowError::UnknownSession(session_id.to_string()))?;
  let questions = session
    .questions
    .iter()
    .enumerate()
    .map(|(i, q)| QuestionStatus {
      index: i,
      question: q.clone(),
      answered: session.answers.contains_key(&i),
      evaluated: session.evaluations.contains_key(&i),
    })
    .collect();
  Ok(ProgressOut {
    total: session.questions.len(),
    answered: session.answered_count(),
    current: session.current,
    questions,
  })
}

// -------- Model-output parsing (pure, shared by the flows above) --------

/// Parse the question-generation output: lenient bracket extraction, then a
/// dense list of strings. Empty lists are an error (the model answered with
/// something, just not questions).
pub fn questions_from_raw(raw: &str) -> Result<Vec<String>, FlowError> {
  let value = extract::extract_array(raw)?;
  let questions: Vec<String> = serde_json::from_value(value).map_err(|e| FlowError::Parse {
    message: format!("question list: {e}"),
    excerpt: extract::excerpt_of(raw),
  })?;
  if questions.is_empty() {
    return Err(FlowError::Parse {
      message: "model returned an empty question list".into(),
      excerpt: extract::excerpt_of(raw),
    });
  }
  Ok(questions)
}

/// Parse the evaluation output. Missing fields default (score 0, empty text);
/// trailing commentary around the object is ignored by the extractor.
pub fn evaluation_from_raw(raw: &str) -> Result<Evaluation, FlowError> {
  let value = extract::extract_object(raw)?;
  serde_json::from_value(value).map_err(|e| FlowError::Parse {
    message: format!("evaluation: {e}"),
    excerpt: extract::excerpt_of(raw),
  })
}
