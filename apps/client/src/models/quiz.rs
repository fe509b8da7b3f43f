use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Questions per quiz session, as tracked by the backend.
pub const MAX_QUESTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Handle for one quiz attempt. Passed explicitly to every quiz call and dropped
/// when the attempt ends; the backend is never told.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub session_id: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub question_index: u32,
}

impl QuizSession {
    pub fn new(session_id: impl Into<String>, difficulty: Difficulty) -> Self {
        QuizSession {
            session_id: session_id.into(),
            difficulty,
            score: 0,
            question_index: 0,
        }
    }

    /// Records one answered question. Returns `false` if the backend reported a lower
    /// score than already held; the held score is kept in that case.
    pub fn record_answer(&mut self, reported_score: u32) -> bool {
        self.question_index += 1;
        if reported_score < self.score {
            return false;
        }
        self.score = reported_score;
        true
    }
}

/// A multiple-choice question as served by `/next_question`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub q_number: u32,
    pub question: String,
    /// Letter → option text. Ordered by letter for rendering.
    #[serde(deserialize_with = "options_as_text")]
    pub options: BTreeMap<String, String>,
}

/// Option values come straight from a generated payload and may be numbers or
/// booleans (`{"A": 3, "B": 4}`); they are kept as their text.
pub(crate) fn option_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn options_as_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(letter, value)| (letter, option_text(value)))
        .collect())
}

impl Question {
    pub fn chat_text(&self) -> String {
        let mut text = format!(
            "🌱 Question {}/{}\n{}",
            self.q_number, MAX_QUESTIONS, self.question
        );
        for (letter, option) in &self.options {
            text.push_str(&format!("\n{letter}) {option}"));
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn bot(text: impl Into<String>) -> Self {
        ChatMessage {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage {
            sender: Sender::User,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
