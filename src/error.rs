//! Typed flow errors shared by HTTP and WebSocket handlers.
//!
//! Every user action resolves to either a success value or one of these
//! variants; no handler catches blindly. Precondition errors (missing key,
//! missing input, unsaved answer, bad index) are raised before any network
//! call, so a rejected action never mutates session state.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::extract::ExtractError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("No API key configured for this session")]
    MissingApiKey,

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("No saved answer for question {0}")]
    UnsavedAnswer(usize),

    #[error("No question at index {0}")]
    UnknownQuestion(usize),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Model call failed: {0}")]
    Remote(String),

    #[error("Could not parse model output: {message}")]
    Parse { message: String, excerpt: String },
}

impl FlowError {
    /// Stable machine-readable tag, used in WS error frames and JSON bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::MissingApiKey => "missing_api_key",
            FlowError::MissingInput(_) => "missing_input",
            FlowError::UnsavedAnswer(_) => "unsaved_answer",
            FlowError::UnknownQuestion(_) => "unknown_question",
            FlowError::UnknownSession(_) => "unknown_session",
            FlowError::Remote(_) => "remote_error",
            FlowError::Parse { .. } => "parse_error",
        }
    }

    /// Raw-output excerpt for parse failures (≤ 200 chars), absent otherwise.
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            FlowError::Parse { excerpt, .. } => Some(excerpt.as_str()),
            _ => None,
        }
    }
}

impl From<ExtractError> for FlowError {
    fn from(e: ExtractError) -> Self {
        FlowError::Parse {
            message: e.to_string(),
            excerpt: e.excerpt().to_string(),
        }
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            FlowError::MissingApiKey => StatusCode::UNAUTHORIZED,
            FlowError::MissingInput(_)
            | FlowError::UnsavedAnswer(_)
            | FlowError::UnknownQuestion(_) => StatusCode::BAD_REQUEST,
            FlowError::UnknownSession(_) => StatusCode::NOT_FOUND,
            FlowError::Remote(_) | FlowError::Parse { .. } => StatusCode::BAD_GATEWAY,
        };

        let mut body = json!({ "kind": self.kind(), "error": self.to_string() });
        if let Some(excerpt) = self.excerpt() {
            body["excerpt"] = json!(excerpt);
        }
        (status, Json(body)).into_response()
    }
}
