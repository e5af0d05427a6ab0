//! Best-effort extraction of a JSON payload embedded in free-form model text.
//!
//! The model is asked for raw JSON but routinely wraps it in markdown fences
//! or surrounds it with commentary. We strip the fences, slice from the first
//! opening bracket to the last matching closing bracket, and hand the slice to
//! serde_json. There is deliberately no recursive bracket balancing: a
//! mismatched bracket inside the payload yields a parse failure or a wrong
//! slice. That limitation is part of the contract; the model output format is
//! not guaranteed, so a stricter parser would not help.

use serde_json::Value;

/// How much raw model output we surface on failure for diagnosis.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
  #[error("no JSON payload found in model output")]
  NoPayload { excerpt: String },

  #[error("invalid JSON in model output: {message}")]
  BadJson { message: String, excerpt: String },
}

impl ExtractError {
  pub fn excerpt(&self) -> &str {
    match self {
      ExtractError::NoPayload { excerpt } | ExtractError::BadJson { excerpt, .. } => excerpt,
    }
  }
}

/// Remove markdown code fences (```json ... ```) and trim whitespace.
pub fn strip_fences(raw: &str) -> String {
  raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Extract a JSON array (`[...]`) from raw model output.
pub fn extract_array(raw: &str) -> Result<Value, ExtractError> {
  extract_delimited(raw, '[', ']')
}

/// Extract a JSON object (`{...}`) from raw model output.
pub fn extract_object(raw: &str) -> Result<Value, ExtractError> {
  extract_delimited(raw, '{', '}')
}

/// Up to `EXCERPT_CHARS` chars of raw output, for error reporting.
pub fn excerpt_of(raw: &str) -> String {
  raw.chars().take(EXCERPT_CHARS).collect()
}

fn extract_delimited(raw: &str, open: char, close: char) -> Result<Value, ExtractError> {
  let cleaned = strip_fences(raw);

  let start = cleaned.find(open);
  let end = cleaned.rfind(close);
  let slice = match (start, end) {
    (Some(s), Some(e)) if s < e => &cleaned[s..=e],
    _ => {
      return Err(ExtractError::NoPayload { excerpt: excerpt_of(raw) });
    }
  };

  serde_json::from_str::<Value>(slice).map_err(|e| ExtractError::BadJson {
    message: e.to_string(),
    excerpt: excerpt_of(raw),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn fenced_array_matches_unfenced() {
    let fenced = "```json\n[\"Q1\",\"Q2\"]\n```";
    let plain = "[\"Q1\",\"Q2\"]";
    assert_eq!(extract_array(fenced).unwrap(), extract_array(plain).unwrap());
    assert_eq!(extract_array(fenced).unwrap(), json!(["Q1", "Q2"]));
  }

  #[test]
  fn no_brackets_is_no_payload() {
    let err = extract_array("The model is overloaded, please retry.").unwrap_err();
    assert!(matches!(err, ExtractError::NoPayload { .. }));
  }

  #[test]
  fn empty_output_is_no_payload() {
    assert!(matches!(extract_array("").unwrap_err(), ExtractError::NoPayload { .. }));
    assert!(matches!(extract_object("   \n ").unwrap_err(), ExtractError::NoPayload { .. }));
  }

  #[test]
  fn object_with_trailing_commentary() {
    let raw = "{\"score\":8,\"feedback\":\"Good\",\"improvements\":[\"Be concise\"],\"ideal_answer\":\"...\"}\nHope this helps!";
    let v = extract_object(raw).unwrap();
    assert_eq!(v["score"], json!(8));
    assert_eq!(v["improvements"], json!(["Be concise"]));
  }

  #[test]
  fn object_with_leading_prose() {
    let raw = "Sure! Here is the evaluation you asked for:\n{\"score\": 5, \"feedback\": \"ok\"}";
    let v = extract_object(raw).unwrap();
    assert_eq!(v["score"], json!(5));
  }

  #[test]
  fn malformed_json_inside_slice() {
    let err = extract_array("[\"Q1\", \"Q2\"").unwrap_err();
    // No closing bracket at all -> NoPayload.
    assert!(matches!(err, ExtractError::NoPayload { .. }));

    let err = extract_array("[\"Q1\", Q2]").unwrap_err();
    assert!(matches!(err, ExtractError::BadJson { .. }));
  }

  #[test]
  fn excerpt_is_capped_at_200_chars() {
    let raw = "x".repeat(500);
    let err = extract_object(&raw).unwrap_err();
    assert_eq!(err.excerpt().chars().count(), 200);
  }

  #[test]
  fn closing_before_opening_is_no_payload() {
    let err = extract_array("] nothing here [").unwrap_err();
    assert!(matches!(err, ExtractError::NoPayload { .. }));
  }
}
