//! Minimal Gemini client for our use-cases.
//!
//! We only call `models/{model}:generateContent` with a single user text part
//! and read back the first candidate's text. Calls are instrumented and log
//! model names, latencies, and response sizes (not contents).
//!
//! NOTE: The API key travels in the `x-goog-api-key` header, is supplied per
//! session, and is never logged.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{instrument, info};

use crate::config::Prompts;
use crate::domain::InterviewType;
use crate::util::fill_template;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub base_url: String,
  pub model: String,
}

impl Gemini {
  /// Construct the client from env (base URL and model only; no key here).
  pub fn from_env() -> Self {
    let base_url =
      std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .unwrap_or_else(|_| reqwest::Client::new());

    Self { client, base_url, model }
  }

  /// One text-in/text-out generation call. No retries, no fallback model.
  #[instrument(level = "info", skip(self, api_key, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  pub async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, String> {
    let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
    let req = GenerateContentRequest {
      contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "interview-prep-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-goog-api-key", api_key)
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_gemini_error(&body).unwrap_or(body);
      return Err(format!("Gemini HTTP {}: {}", status, msg));
    }

    let body: GenerateContentResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }

    let text = body.candidates.into_iter().next()
      .and_then(|c| c.content)
      .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join(""))
      .unwrap_or_default();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Gemini response received");
    Ok(text)
  }

  // --- High-level helpers (domain-specialized) ---

  /// Ask for the 20-question set. Returns raw model text; extraction happens
  /// at the call site so parse failures can surface the raw output.
  #[instrument(level = "info", skip(self, api_key, prompts), fields(%company, %role, interview_type = interview_type.label()))]
  pub async fn generate_questions_text(
    &self,
    api_key: &str,
    prompts: &Prompts,
    company: &str,
    role: &str,
    interview_type: InterviewType,
  ) -> Result<String, String> {
    let prompt = fill_template(
      &prompts.question_template,
      &[("company", company), ("role", role), ("interview_type", interview_type.label())],
    );
    self.generate(api_key, &prompt).await
  }

  /// Ask for the evaluation of one saved answer. Raw text out, same as above.
  #[instrument(level = "info", skip(self, api_key, prompts, question, answer), fields(question_len = question.len(), answer_len = answer.len()))]
  pub async fn evaluate_answer_text(
    &self,
    api_key: &str,
    prompts: &Prompts,
    question: &str,
    role: &str,
    answer: &str,
  ) -> Result<String, String> {
    let prompt = fill_template(
      &prompts.eval_template,
      &[("question", question), ("role", role), ("answer", answer)],
    );
    self.generate(api_key, &prompt).await
  }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest {
  contents: Vec<Content>,
}
#[derive(Serialize)]
struct Content {
  parts: Vec<Part>,
}
#[derive(Serialize)]
struct Part {
  text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate {
  #[serde(default)] content: Option<CandidateContent>,
}
#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)] parts: Vec<CandidatePart>,
}
#[derive(Deserialize)]
struct CandidatePart {
  #[serde(default)] text: Option<String>,
}
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a Gemini error body.
fn extract_gemini_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_body_message_extracted() {
    let body = "{\"error\":{\"code\":429,\"message\":\"Resource exhausted\",\"status\":\"RESOURCE_EXHAUSTED\"}}";
    assert_eq!(extract_gemini_error(body).as_deref(), Some("Resource exhausted"));
    assert_eq!(extract_gemini_error("not json"), None);
  }

  #[test]
  fn response_parses_candidate_text() {
    let raw = "{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"[\\\"Q1\\\"]\"}],\"role\":\"model\"}}],\"usageMetadata\":{\"promptTokenCount\":10,\"totalTokenCount\":25}}";
    let body: GenerateContentResponse = serde_json::from_str(raw).unwrap();
    let text = body.candidates.into_iter().next()
      .and_then(|c| c.content)
      .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join(""))
      .unwrap_or_default();
    assert_eq!(text, "[\"Q1\"]");
  }
}
