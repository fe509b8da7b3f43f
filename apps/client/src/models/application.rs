use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientError;

/// Scores strictly below this are rejected; the boundary itself passes.
pub const PASS_THRESHOLD: f64 = 0.4;

/// A candidate's submission against one job, as listed by `/applications/{job_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub applicant_name: String,
    pub email: String,
    /// Either a link/filename string or the backend's structured résumé extract.
    #[serde(default)]
    pub resume: Option<Value>,
    pub matching_score: f64,
}

impl Application {
    /// What the viewer shows in the résumé column.
    pub fn resume_summary(&self) -> String {
        match &self.resume {
            Some(Value::String(link)) if !link.trim().is_empty() => link.clone(),
            Some(Value::Object(extract)) => match extract.get("skills") {
                Some(Value::Array(skills)) if !skills.is_empty() => {
                    let skills: Vec<&str> = skills.iter().filter_map(Value::as_str).collect();
                    format!("skills: {}", skills.join(", "))
                }
                _ => "résumé on file".to_string(),
            },
            _ => "no résumé".to_string(),
        }
    }
}

/// Outcome shown on the score card after a successful application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreVerdict {
    Rejected,
    Eligible,
}

impl ScoreVerdict {
    pub fn from_score(matching_score: f64) -> Self {
        if matching_score < PASS_THRESHOLD {
            ScoreVerdict::Rejected
        } else {
            ScoreVerdict::Eligible
        }
    }
}

/// An uploaded résumé file held in memory until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        ResumeUpload {
            content_type: content_type_for(&file_name),
            file_name,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::Validation(format!("'{}' is not a file path", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(ResumeUpload::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    if file_name.to_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// The applicant's fields in the apply dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantField {
    Name,
    Email,
}

/// Client-only form state for one application, bound to the selected job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationDraft {
    pub name: String,
    pub email: String,
    pub resume: Option<ResumeUpload>,
}

impl ApplicationDraft {
    pub fn set(&mut self, field: ApplicantField, value: impl Into<String>) {
        match field {
            ApplicantField::Name => self.name = value.into(),
            ApplicantField::Email => self.email = value.into(),
        }
    }

    /// Labels of required inputs that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.resume.is_none() {
            missing.push("resume");
        }
        missing
    }
}
