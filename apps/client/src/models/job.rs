use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(JobId)
    }
}

/// A posted position, as the backend returns it. The client never edits one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// `None` only for a locally prepended job the backend acknowledged without echoing it back.
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub salary_range: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub experience_level: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub job_type: String,
}

impl Job {
    pub fn salary_display(&self) -> &str {
        if self.salary_range.trim().is_empty() {
            "N/A"
        } else {
            &self.salary_range
        }
    }

    /// Stand-in for a job the backend accepted but did not return.
    pub fn from_draft(draft: &JobDraft) -> Self {
        Job {
            job_id: None,
            title: draft.title.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            salary_range: draft.salary_range.clone(),
            experience_level: draft.experience_level.clone(),
            job_type: draft.job_type.clone(),
        }
    }
}

/// Rows from the backend may carry `null` text columns.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The editable fields of the posting form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Title,
    Description,
    Location,
    SalaryRange,
    ExperienceLevel,
    JobType,
}

impl JobField {
    pub const ALL: [JobField; 6] = [
        JobField::Title,
        JobField::Description,
        JobField::Location,
        JobField::SalaryRange,
        JobField::ExperienceLevel,
        JobField::JobType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::Description => "description",
            JobField::Location => "location",
            JobField::SalaryRange => "salary_range",
            JobField::ExperienceLevel => "experience_level",
            JobField::JobType => "job_type",
        }
    }
}

impl FromStr for JobField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown job field '{s}'"))
    }
}

/// Client-only mirror of the posting form. Serializes to the `/post_job` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary_range: String,
    pub experience_level: String,
    pub job_type: String,
}

impl JobDraft {
    pub fn set(&mut self, field: JobField, value: impl Into<String>) {
        let slot = match field {
            JobField::Title => &mut self.title,
            JobField::Description => &mut self.description,
            JobField::Location => &mut self.location,
            JobField::SalaryRange => &mut self.salary_range,
            JobField::ExperienceLevel => &mut self.experience_level,
            JobField::JobType => &mut self.job_type,
        };
        *slot = value.into();
    }

    pub fn get(&self, field: JobField) -> &str {
        match field {
            JobField::Title => &self.title,
            JobField::Description => &self.description,
            JobField::Location => &self.location,
            JobField::SalaryRange => &self.salary_range,
            JobField::ExperienceLevel => &self.experience_level,
            JobField::JobType => &self.job_type,
        }
    }

    /// All six fields are required.
    pub fn missing_fields(&self) -> Vec<JobField> {
        JobField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}
