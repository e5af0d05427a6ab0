//! Application state: the session store, prompt templates, and Gemini client.
//!
//! This module owns:
//!   - the session map (session id → `Session`)
//!   - the prompts struct (from TOML or defaults)
//!   - the shared Gemini client (base URL + model; keys live on sessions)
//!
//! A `Session` is the explicit lifecycle object for one interactive user:
//! created on session start (WS connect or POST /session), its answer and
//! evaluation maps are cleared whenever the question set is regenerated, and
//! the whole thing is destroyed on session end.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{load_agent_config_from_env, Prompts};
use crate::domain::{Evaluation, InterviewSetup};
use crate::gemini::Gemini;

/// Hard cap on the question set; longer model output is truncated.
pub const MAX_QUESTIONS: usize = 20;

/// In-memory state for one interactive session. No persistence.
#[derive(Clone, Default)]
pub struct Session {
    pub api_key: Option<String>,
    pub setup: Option<InterviewSetup>,
    pub questions: Vec<String>,
    pub current: usize,
    pub answers: HashMap<usize, String>,
    pub evaluations: HashMap<usize, Evaluation>,
}

impl Session {
    /// Install a freshly generated question set.
    ///
    /// Invariant: answers and evaluations are indexed against the current
    /// question set, so replacing it truncates to `MAX_QUESTIONS`, clears both
    /// maps, and resets the cursor. Stale indices must never survive.
    pub fn replace_questions(&mut self, mut questions: Vec<String>) {
        questions.truncate(MAX_QUESTIONS);
        self.questions = questions;
        self.current = 0;
        self.answers.clear();
        self.evaluations.clear();
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, Session>>>,
    pub gemini: Gemini,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load prompt config and the Gemini settings.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let prompts = load_agent_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let gemini = Gemini::from_env();
        info!(target: "prep_backend", base_url = %gemini.base_url, model = %gemini.model, "Gemini client configured (keys are per-session)");

        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            gemini,
            prompts,
        }
    }

    /// Start a new session and return its id.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(id.clone(), Session::default());
        info!(target: "interview", session = %id, "Session created");
        id
    }

    /// Destroy a session. Returns false if it was already gone.
    #[instrument(level = "info", skip(self), fields(session = %id))]
    pub async fn end_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(target: "interview", session = %id, "Session ended");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_questions_truncates_to_cap() {
        let mut s = Session::default();
        let many: Vec<String> = (0..30).map(|i| format!("Q{i}")).collect();
        s.replace_questions(many);
        assert_eq!(s.questions.len(), MAX_QUESTIONS);
        assert_eq!(s.questions[0], "Q0");
        assert_eq!(s.questions[19], "Q19");
    }

    #[test]
    fn replace_questions_clears_stale_state() {
        let mut s = Session::default();
        s.replace_questions(vec!["old one".into(), "old two".into()]);
        s.current = 1;
        s.answers.insert(1, "my answer".into());
        s.evaluations.insert(1, Evaluation { score: 7, ..Default::default() });

        s.replace_questions(vec!["new one".into()]);
        assert_eq!(s.current, 0);
        assert!(s.answers.get(&1).is_none());
        assert!(s.evaluations.get(&1).is_none());
        assert_eq!(s.answered_count(), 0);
    }

    #[test]
    fn session_lifecycle_create_and_end() {
        let state = AppState::new();
        tokio_test::block_on(async {
            let id = state.create_session().await;
            assert!(state.sessions.read().await.contains_key(&id));
            assert!(state.end_session(&id).await);
            assert!(!state.end_session(&id).await);
            assert!(!state.sessions.read().await.contains_key(&id));
        });
    }
}
