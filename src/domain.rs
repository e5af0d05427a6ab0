//! Domain models: interview round types, the evaluation record, and the
//! per-session interview setup.

use serde::{Deserialize, Serialize};

/// The four fixed interview round categories offered by the type selector.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    TechnicalSoftware,
    TechnicalHardware,
    Hr,
    Management,
}

impl InterviewType {
    /// Human-readable label, used verbatim inside the generation prompt.
    pub fn label(&self) -> &'static str {
        match self {
            InterviewType::TechnicalSoftware => "Technical (Software)",
            InterviewType::TechnicalHardware => "Technical (Hardware)",
            InterviewType::Hr => "HR",
            InterviewType::Management => "Management",
        }
    }
}

/// What the user entered before generating questions. Kept on the session so
/// the evaluation prompt can reference the role later.
#[derive(Clone, Debug)]
pub struct InterviewSetup {
    pub company: String,
    pub role: String,
    pub interview_type: InterviewType,
}

/// Per-answer evaluation returned by the model.
///
/// Every field is defaulted: the model is asked for this exact structure but
/// absent fields display as 0 / empty rather than failing the whole record.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Evaluation {
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub ideal_answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_type_snake_case_wire_format() {
        let t: InterviewType = serde_json::from_str("\"technical_software\"").unwrap();
        assert_eq!(t, InterviewType::TechnicalSoftware);
        assert_eq!(serde_json::to_string(&InterviewType::Hr).unwrap(), "\"hr\"");
    }

    #[test]
    fn evaluation_missing_fields_default() {
        let e: Evaluation = serde_json::from_str("{\"feedback\":\"Good\"}").unwrap();
        assert_eq!(e.score, 0);
        assert_eq!(e.feedback, "Good");
        assert!(e.improvements.is_empty());
        assert!(e.ideal_answer.is_empty());
    }

    #[test]
    fn evaluation_ignores_extra_fields() {
        let e: Evaluation =
            serde_json::from_str("{\"score\":8,\"feedback\":\"ok\",\"confidence\":0.9}").unwrap();
        assert_eq!(e.score, 8);
    }
}
