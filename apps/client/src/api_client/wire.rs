//! Request bodies and response shapes for the job-board backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientError;
use crate::models::job::{Job, JobId};
use crate::models::quiz::{option_text, Difficulty, Question};

// ────────────────────────────────────────────────────────────────────────────
// Request bodies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct StartQuizRequest<'a> {
    pub field: &'a str,
    pub job_id: Option<JobId>,
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NextQuestionRequest<'a> {
    pub session_id: &'a str,
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerRequest<'a> {
    pub session_id: &'a str,
    pub answer: &'a str,
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

/// What `/post_job` gave back.
#[derive(Debug, Clone, PartialEq)]
pub enum PostedJob {
    /// The backend echoed the stored record.
    Created(Job),
    /// The backend only acknowledged the insert.
    Acknowledged { message: Option<String> },
}

impl PostedJob {
    pub(crate) fn from_value(value: Value) -> Result<Self, ClientError> {
        let looks_like_job = value
            .as_object()
            .is_some_and(|obj| obj.contains_key("job_id") || obj.contains_key("title"));
        if looks_like_job {
            return Ok(PostedJob::Created(serde_json::from_value(value)?));
        }
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(PostedJob::Acknowledged { message })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplyReceipt {
    pub matching_score: f64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizStart {
    /// Absent or blank ids leave the quiz without a session handle.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One step of `/next_question`.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionStep {
    Question(Question),
    Finished { message: String },
}

#[derive(Debug, Deserialize)]
struct NextQuestionResponse {
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    q_number: Option<u32>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Option<BTreeMap<String, Value>>,
}

impl QuestionStep {
    pub(crate) fn from_value(value: Value) -> Result<Self, ClientError> {
        let raw: NextQuestionResponse = serde_json::from_value(value)?;
        if raw.finished {
            return Ok(QuestionStep::Finished {
                message: raw.message.unwrap_or_else(|| "Quiz completed!".to_string()),
            });
        }
        match (raw.q_number, raw.question, raw.options) {
            (Some(q_number), Some(question), Some(options)) => {
                Ok(QuestionStep::Question(Question {
                    q_number,
                    question,
                    options: options
                        .into_iter()
                        .map(|(letter, value)| (letter, option_text(value)))
                        .collect(),
                }))
            }
            _ => Err(ClientError::Application(
                "question payload is incomplete".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerFeedback {
    pub feedback: String,
    pub score: u32,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub result_message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Status discriminator
// ────────────────────────────────────────────────────────────────────────────

/// Extracts the human-readable error from a backend body.
/// Accepts `{"error": "..."}` and `{"error": {"message": "..."}}`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(msg) => Some(msg.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Rejects bodies whose `status` is anything but `"success"`.
pub(crate) fn ensure_success(value: &Value) -> Result<(), ClientError> {
    if value.get("status").and_then(Value::as_str) == Some("success") {
        return Ok(());
    }
    let message = match value.get("error") {
        Some(Value::String(msg)) => msg.clone(),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string(),
        _ => "Unknown error".to_string(),
    };
    Err(ClientError::Application(message))
}
