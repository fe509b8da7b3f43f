use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::quiz::Difficulty;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
/// Placeholder identity sent to `/start_quiz`. The backend only needs a non-empty value.
const DEFAULT_QUIZ_USER_ID: &str = "omar";

/// Client configuration loaded from environment variables.
/// Every variable has a default, so an empty environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub quiz_user_id: String,
    pub quiz_difficulty: Difficulty,
    /// No timeout unless explicitly configured; reqwest's defaults apply otherwise.
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let request_timeout = match optional_env("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            None => None,
        };

        let quiz_difficulty = match optional_env("QUIZ_DIFFICULTY") {
            Some(raw) => raw
                .parse::<Difficulty>()
                .map_err(anyhow::Error::msg)
                .context("QUIZ_DIFFICULTY must be one of easy, medium, hard")?,
            None => Difficulty::default(),
        };

        Ok(Config {
            api_base_url: normalize_base_url(
                &optional_env("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            ),
            quiz_user_id: optional_env("QUIZ_USER_ID")
                .unwrap_or_else(|| DEFAULT_QUIZ_USER_ID.to_string()),
            quiz_difficulty,
            request_timeout,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            quiz_user_id: DEFAULT_QUIZ_USER_ID.to_string(),
            quiz_difficulty: Difficulty::default(),
            request_timeout: None,
            rust_log: "info".to_string(),
        }
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
