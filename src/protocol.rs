//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Evaluation, InterviewType};

/// Messages the client can send over WebSocket. One session per connection,
/// so no session id travels on the wire here.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Configure {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    GenerateQuestions {
        company: String,
        role: String,
        #[serde(rename = "interviewType")]
        interview_type: InterviewType,
    },
    SelectQuestion {
        index: usize,
    },
    SaveAnswer {
        index: usize,
        answer: String,
    },
    Evaluate {
        index: usize,
    },
    Progress,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Configured,
    Questions {
        questions: Vec<String>,
    },
    QuestionSelected {
        index: usize,
        question: String,
    },
    AnswerSaved {
        index: usize,
    },
    Evaluation {
        index: usize,
        evaluation: EvaluationOut,
    },
    Progress {
        progress: ProgressOut,
    },
    Error {
        kind: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        excerpt: Option<String>,
    },
}

/// DTO used by both WS and HTTP for evaluation delivery.
#[derive(Debug, Serialize)]
pub struct EvaluationOut {
    pub score: i64,
    pub feedback: String,
    pub improvements: Vec<String>,
    #[serde(rename = "idealAnswer")]
    pub ideal_answer: String,
}

/// Convert the internal `Evaluation` to the public DTO.
pub fn to_out(e: &Evaluation) -> EvaluationOut {
    EvaluationOut {
        score: e.score,
        feedback: e.feedback.clone(),
        improvements: e.improvements.clone(),
        ideal_answer: e.ideal_answer.clone(),
    }
}

/// Navigator/progress snapshot for one session.
#[derive(Debug, Serialize)]
pub struct ProgressOut {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    pub questions: Vec<QuestionStatus>,
}

#[derive(Debug, Serialize)]
pub struct QuestionStatus {
    pub index: usize,
    pub question: String,
    pub answered: bool,
    pub evaluated: bool,
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct ConfigureIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct GenerateIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub company: String,
    pub role: String,
    #[serde(rename = "interviewType")]
    pub interview_type: InterviewType,
}
#[derive(Serialize)]
pub struct QuestionsOut {
    pub questions: Vec<String>,
}

#[derive(Deserialize)]
pub struct SelectIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub index: usize,
}
#[derive(Serialize)]
pub struct SelectOut {
    pub index: usize,
    pub question: String,
}

#[derive(Deserialize)]
pub struct SaveAnswerIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub index: usize,
    pub answer: String,
}

#[derive(Deserialize)]
pub struct EvaluateIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub index: usize,
}
#[derive(Serialize)]
pub struct EvaluationHttpOut {
    pub index: usize,
    pub evaluation: EvaluationOut,
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Serialize)]
pub struct OkOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
