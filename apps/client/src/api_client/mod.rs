//! Backend client: the single point of entry for every HTTP call the job board makes.
//!
//! No other module talks to the backend directly. The view model only sees the
//! `JobBoardApi` trait, so it can run against an in-memory fake in tests.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::ClientError;
use crate::models::application::{Application, ApplicationDraft};
use crate::models::job::{Job, JobDraft, JobId};
use crate::models::quiz::QuizSession;

pub mod wire;

pub use wire::{AnswerFeedback, ApplyReceipt, PostedJob, QuestionStep, QuizStart};
use wire::{error_message, ensure_success, AnswerRequest, NextQuestionRequest, StartQuizRequest};

/// The backend contract the board depends on.
#[async_trait]
pub trait JobBoardApi: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<Job>, ClientError>;

    async fn post_job(&self, draft: &JobDraft) -> Result<PostedJob, ClientError>;

    async fn apply(
        &self,
        job_id: JobId,
        draft: &ApplicationDraft,
    ) -> Result<ApplyReceipt, ClientError>;

    async fn list_applications(&self, job_id: JobId) -> Result<Vec<Application>, ClientError>;

    async fn start_quiz(
        &self,
        field: &str,
        job_id: Option<JobId>,
        user_id: &str,
    ) -> Result<QuizStart, ClientError>;

    async fn next_question(&self, session: &QuizSession) -> Result<QuestionStep, ClientError>;

    async fn answer(
        &self,
        session: &QuizSession,
        answer: &str,
    ) -> Result<AnswerFeedback, ClientError>;
}

/// reqwest-backed implementation of `JobBoardApi`.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and returns the parsed JSON body.
    /// Non-2xx statuses become `ClientError::Http` carrying the body's `error` text when present.
    async fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// For endpoints whose body carries a `status` discriminator.
    async fn send_checked<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let value = self.send(request).await?;
        ensure_success(&value)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl JobBoardApi for BackendClient {
    async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        debug!("GET /jobs");
        let value = self.send(self.client.get(self.url("/jobs"))).await?;
        let jobs: Vec<Job> = serde_json::from_value(value)?;
        info!("Fetched {} jobs", jobs.len());
        Ok(jobs)
    }

    async fn post_job(&self, draft: &JobDraft) -> Result<PostedJob, ClientError> {
        debug!("POST /post_job title={:?}", draft.title);
        let value = self
            .send(self.client.post(self.url("/post_job")).json(draft))
            .await?;
        PostedJob::from_value(value)
    }

    async fn apply(
        &self,
        job_id: JobId,
        draft: &ApplicationDraft,
    ) -> Result<ApplyReceipt, ClientError> {
        let resume = draft
            .resume
            .as_ref()
            .ok_or_else(|| ClientError::Validation("Please attach a résumé.".to_string()))?;

        let resume_part = Part::bytes(resume.bytes.to_vec())
            .file_name(resume.file_name.clone())
            .mime_str(resume.content_type)?;

        let form = Form::new()
            .text("name", draft.name.clone())
            .text("email", draft.email.clone())
            .part("resume", resume_part)
            .text("job_id", job_id.to_string());

        debug!(
            "POST /apply job_id={job_id} resume={} ({} bytes)",
            resume.file_name,
            resume.bytes.len()
        );
        self.send_checked(self.client.post(self.url("/apply")).multipart(form))
            .await
    }

    async fn list_applications(&self, job_id: JobId) -> Result<Vec<Application>, ClientError> {
        debug!("GET /applications/{job_id}");
        let value = self
            .send(self.client.get(self.url(&format!("/applications/{job_id}"))))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn start_quiz(
        &self,
        field: &str,
        job_id: Option<JobId>,
        user_id: &str,
    ) -> Result<QuizStart, ClientError> {
        debug!("POST /start_quiz field={field:?}");
        let body = StartQuizRequest {
            field,
            job_id,
            user_id,
        };
        self.send_checked(self.client.post(self.url("/start_quiz")).json(&body))
            .await
    }

    async fn next_question(&self, session: &QuizSession) -> Result<QuestionStep, ClientError> {
        debug!("POST /next_question difficulty={}", session.difficulty);
        let body = NextQuestionRequest {
            session_id: &session.session_id,
            difficulty: session.difficulty,
        };
        let value = self
            .send(self.client.post(self.url("/next_question")).json(&body))
            .await?;
        ensure_success(&value)?;
        QuestionStep::from_value(value)
    }

    async fn answer(
        &self,
        session: &QuizSession,
        answer: &str,
    ) -> Result<AnswerFeedback, ClientError> {
        debug!("POST /answer answer={answer:?}");
        let body = AnswerRequest {
            session_id: &session.session_id,
            answer,
        };
        self.send_checked(self.client.post(self.url("/answer")).json(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Multipart, Path},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::models::application::ResumeUpload;
    use crate::models::quiz::Difficulty;

    type Reply = (StatusCode, Json<Value>);

    async fn jobs() -> Reply {
        (
            StatusCode::OK,
            Json(json!([
                {
                    "job_id": 1, "title": "Rust Engineer", "description": "Async services",
                    "cleaned_description": "async service", "location": "Remote",
                    "salary_range": "100k", "experience_level": "Senior", "job_type": "Full-time"
                },
                {
                    "job_id": 2, "title": "Data Analyst", "description": "Dashboards",
                    "cleaned_description": "dashboard", "location": "Cairo",
                    "salary_range": null, "experience_level": "Junior", "job_type": "Contract"
                }
            ])),
        )
    }

    async fn post_job(Json(body): Json<Value>) -> Reply {
        if body.get("title").and_then(Value::as_str) == Some("") {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Missing required fields"})),
            );
        }
        (
            StatusCode::CREATED,
            Json(json!({"message": "Job posted successfully!"})),
        )
    }

    /// Echoes what it received in `message` so tests can assert on the multipart body.
    async fn apply(mut multipart: Multipart) -> Reply {
        let mut name = String::new();
        let mut email = String::new();
        let mut job_id = String::new();
        let mut resume = String::new();

        while let Some(field) = multipart.next_field().await.unwrap() {
            let field_name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.unwrap();
            match field_name.as_str() {
                "name" => name = String::from_utf8_lossy(&data).into_owned(),
                "email" => email = String::from_utf8_lossy(&data).into_owned(),
                "job_id" => job_id = String::from_utf8_lossy(&data).into_owned(),
                "resume" => {
                    resume = format!(
                        "{}:{}:{}",
                        file_name.unwrap_or_default(),
                        content_type.unwrap_or_default(),
                        data.len()
                    )
                }
                _ => {}
            }
        }

        if job_id == "404" {
            return (StatusCode::NOT_FOUND, Json(json!({"error": "Job not found"})));
        }

        (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "matching_score": 0.62,
                "message": format!("{name}|{email}|{job_id}|{resume}")
            })),
        )
    }

    async fn applications(Path(job_id): Path<i64>) -> Reply {
        if job_id == 1 {
            (
                StatusCode::OK,
                Json(json!([{
                    "applicant_name": "Mona",
                    "email": "mona@example.com",
                    "matching_score": 0.81,
                    "resume": {"skills": ["rust"], "education": [], "experience": []}
                }])),
            )
        } else {
            (StatusCode::OK, Json(json!([])))
        }
    }

    async fn start_quiz(Json(body): Json<Value>) -> Reply {
        if body.get("user_id").and_then(Value::as_str).unwrap_or_default().is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "User ID (applicant name) is required.", "status": "error"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "message": format!("Starting {} quiz!", body["field"].as_str().unwrap_or_default()),
                "session_id": uuid::Uuid::new_v4().to_string(),
                "status": "success"
            })),
        )
    }

    async fn next_question(Json(body): Json<Value>) -> Reply {
        match body["session_id"].as_str() {
            Some("done") => (
                StatusCode::OK,
                Json(json!({"finished": true, "message": "Quiz completed!", "status": "success"})),
            ),
            Some("missing") => (
                StatusCode::OK,
                Json(json!({"error": "Session not found.", "status": "error"})),
            ),
            _ => (
                StatusCode::OK,
                Json(json!({
                    "question": format!("A {} question?", body["difficulty"].as_str().unwrap_or_default()),
                    "options": {"A": "yes", "B": "no", "C": "maybe", "D": "never"},
                    "q_number": 1,
                    "finished": false,
                    "status": "success"
                })),
            ),
        }
    }

    async fn answer(Json(body): Json<Value>) -> Reply {
        let correct = body["answer"].as_str() == Some("A");
        (
            StatusCode::OK,
            Json(json!({
                "feedback": if correct { "Correct!" } else { "Incorrect. Correct answer was A" },
                "score": if correct { 1 } else { 0 },
                "finished": false,
                "status": "success"
            })),
        )
    }

    async fn spawn_backend() -> BackendClient {
        let app = Router::new()
            .route("/jobs", get(jobs))
            .route("/post_job", post(post_job))
            .route("/apply", post(apply))
            .route("/applications/:job_id", get(applications))
            .route("/start_quiz", post(start_quiz))
            .route("/next_question", post(next_question))
            .route("/answer", post(answer));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = Config {
            api_base_url: format!("http://{addr}"),
            ..Config::default()
        };
        BackendClient::new(&config).unwrap()
    }

    fn draft_for(name: &str) -> ApplicationDraft {
        ApplicationDraft {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            resume: Some(ResumeUpload::new("cv.pdf", b"%PDF-1.4 resume".to_vec())),
        }
    }

    #[tokio::test]
    async fn test_list_jobs() {
        let client = spawn_backend().await;
        let jobs = client.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_id, Some(JobId(1)));
        assert_eq!(jobs[1].salary_display(), "N/A");
    }

    #[tokio::test]
    async fn test_post_job_acknowledged() {
        let client = spawn_backend().await;
        let draft = JobDraft {
            title: "SRE".to_string(),
            description: "Keep it up".to_string(),
            location: "Berlin".to_string(),
            salary_range: "90k".to_string(),
            experience_level: "Senior".to_string(),
            job_type: "Full-time".to_string(),
        };
        let posted = client.post_job(&draft).await.unwrap();
        assert_eq!(
            posted,
            PostedJob::Acknowledged {
                message: Some("Job posted successfully!".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_post_job_rejected_with_backend_error() {
        let client = spawn_backend().await;
        let err = client.post_job(&JobDraft::default()).await.unwrap_err();
        match err {
            ClientError::Http { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing required fields");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_apply_sends_multipart_form() {
        let client = spawn_backend().await;
        let receipt = client.apply(JobId(1), &draft_for("Omar")).await.unwrap();
        assert!((receipt.matching_score - 0.62).abs() < f64::EPSILON);
        assert_eq!(
            receipt.message.as_deref(),
            Some("Omar|omar@example.com|1|cv.pdf:application/pdf:15")
        );
    }

    #[tokio::test]
    async fn test_apply_unknown_job() {
        let client = spawn_backend().await;
        let err = client.apply(JobId(404), &draft_for("Omar")).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 404, .. }));
        assert_eq!(err.alert_text(), "Request failed: Job not found");
    }

    #[tokio::test]
    async fn test_apply_without_resume_makes_no_request() {
        let config = Config {
            // nothing listens here; a request would fail with a network error
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let client = BackendClient::new(&config).unwrap();
        let mut draft = draft_for("Omar");
        draft.resume = None;
        let err = client.apply(JobId(1), &draft).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_applications() {
        let client = spawn_backend().await;
        let apps = client.list_applications(JobId(1)).await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].resume_summary(), "skills: rust");
        assert!(client.list_applications(JobId(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quiz_round_trip() {
        let client = spawn_backend().await;
        let start = client
            .start_quiz("Rust Engineer", Some(JobId(1)), "omar")
            .await
            .unwrap();
        let session_id = start.session_id.unwrap();
        assert_eq!(start.message.as_deref(), Some("Starting Rust Engineer quiz!"));

        let session = QuizSession::new(session_id, Difficulty::Hard);
        match client.next_question(&session).await.unwrap() {
            QuestionStep::Question(q) => {
                assert_eq!(q.question, "A hard question?");
                assert_eq!(q.options.len(), 4);
            }
            other => panic!("expected a question, got {other:?}"),
        }

        let feedback = client.answer(&session, "A").await.unwrap();
        assert_eq!(feedback.feedback, "Correct!");
        assert_eq!(feedback.score, 1);
        assert!(!feedback.finished);
    }

    #[tokio::test]
    async fn test_start_quiz_requires_user_id() {
        let client = spawn_backend().await;
        let err = client
            .start_quiz("Rust Engineer", Some(JobId(1)), "")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_next_question_finished_and_error_status() {
        let client = spawn_backend().await;

        let done = QuizSession::new("done", Difficulty::Medium);
        assert_eq!(
            client.next_question(&done).await.unwrap(),
            QuestionStep::Finished {
                message: "Quiz completed!".to_string()
            }
        );

        let missing = QuizSession::new("missing", Difficulty::Medium);
        match client.next_question(&missing).await.unwrap_err() {
            ClientError::Application(msg) => assert_eq!(msg, "Session not found."),
            other => panic!("expected Application error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let client = BackendClient::new(&config).unwrap();
        let err = client.list_jobs().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
