//! The job-board view model.
//!
//! Owns every piece of UI state and exposes one operation per user action. Operations
//! take `&mut self` across their network call, so actions against one board run one at
//! a time. A failed operation returns its error and leaves the state consistent; the
//! caller turns the error into an alert.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api_client::{JobBoardApi, PostedJob};
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::application::{ApplicantField, ResumeUpload, ScoreVerdict};
use crate::models::job::{Job, JobField, JobId};
use crate::models::quiz::Difficulty;

pub mod filter;
pub mod quiz;
pub mod state;

use filter::filter_jobs;
pub use quiz::SendOutcome;
use state::{ChatPanel, JobForm, Modal};

/// How long the "job posted" banner stays up.
pub const BANNER_DURATION: Duration = Duration::from_secs(3);

pub struct JobBoard {
    api: Arc<dyn JobBoardApi>,
    quiz_user_id: String,
    default_difficulty: Difficulty,
    jobs: Vec<Job>,
    filter: String,
    form: JobForm,
    banner_until: Option<Instant>,
    modal: Modal,
}

impl JobBoard {
    pub fn new(api: Arc<dyn JobBoardApi>, config: &Config) -> Self {
        JobBoard {
            api,
            quiz_user_id: config.quiz_user_id.clone(),
            default_difficulty: config.quiz_difficulty,
            jobs: Vec::new(),
            filter: String::new(),
            form: JobForm::Closed,
            banner_until: None,
            modal: Modal::None,
        }
    }

    // ── Listing ────────────────────────────────────────────────────────────

    /// Fetches the full listing. On failure the current listing is kept as is.
    pub async fn load_jobs(&mut self) -> Result<usize, ClientError> {
        let jobs = self.api.list_jobs().await?;
        self.jobs = jobs;
        Ok(self.jobs.len())
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_lowercase();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn visible_jobs(&self) -> Vec<&Job> {
        filter_jobs(&self.jobs, &self.filter)
    }

    fn find_job(&self, job_id: JobId) -> Result<Job, ClientError> {
        self.jobs
            .iter()
            .find(|job| job.job_id == Some(job_id))
            .cloned()
            .ok_or_else(|| ClientError::Validation(format!("No job with id {job_id}.")))
    }

    // ── Job posting ────────────────────────────────────────────────────────

    pub fn form(&self) -> &JobForm {
        &self.form
    }

    pub fn open_job_form(&mut self) {
        if matches!(self.form, JobForm::Closed) {
            self.form = JobForm::Open(Default::default());
        }
    }

    pub fn update_job_field(&mut self, field: JobField, value: &str) -> Result<(), ClientError> {
        match &mut self.form {
            JobForm::Open(draft) => {
                draft.set(field, value);
                Ok(())
            }
            JobForm::Submitting(_) => Err(ClientError::Validation(
                "The job is being posted, please wait.".to_string(),
            )),
            JobForm::Closed => Err(ClientError::Validation(
                "Open the job form first.".to_string(),
            )),
        }
    }

    pub fn cancel_job_form(&mut self) {
        self.form = JobForm::Closed;
    }

    /// Posts the drafted job. On success the job is prepended, the form closes and the
    /// banner shows; on failure the form stays open with the draft intact.
    pub async fn submit_job(&mut self) -> Result<(), ClientError> {
        let draft = match std::mem::take(&mut self.form) {
            JobForm::Open(draft) => draft,
            JobForm::Submitting(draft) => {
                debug!("submit ignored: a job post is already in flight");
                self.form = JobForm::Submitting(draft);
                return Ok(());
            }
            JobForm::Closed => {
                return Err(ClientError::Validation(
                    "Open the job form first.".to_string(),
                ))
            }
        };

        let missing = draft.missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(JobField::as_str).collect();
            self.form = JobForm::Open(draft);
            return Err(ClientError::Validation(format!(
                "Please fill in: {}",
                names.join(", ")
            )));
        }

        self.form = JobForm::Submitting(draft.clone());
        match self.api.post_job(&draft).await {
            Ok(posted) => {
                let job = match posted {
                    PostedJob::Created(job) => job,
                    PostedJob::Acknowledged { message } => {
                        debug!("post_job acknowledged without a record: {message:?}");
                        Job::from_draft(&draft)
                    }
                };
                info!("Posted job {:?}", job.title);
                self.jobs.insert(0, job);
                self.form = JobForm::Closed;
                self.banner_until = Some(Instant::now() + BANNER_DURATION);
                Ok(())
            }
            Err(e) => {
                self.form = JobForm::Open(draft);
                Err(e)
            }
        }
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_until
            .is_some_and(|deadline| Instant::now() < deadline)
    }

    // ── Dialogs ────────────────────────────────────────────────────────────

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.modal.selected_job()
    }

    fn ensure_no_modal(&self) -> Result<(), ClientError> {
        if self.modal.is_open() {
            return Err(ClientError::ModalBusy);
        }
        Ok(())
    }

    pub fn open_details(&mut self, job_id: JobId) -> Result<(), ClientError> {
        self.ensure_no_modal()?;
        let job = self.find_job(job_id)?;
        self.modal = Modal::Details { job };
        Ok(())
    }

    /// Closes whatever dialog is open and clears the selection. Closing the chat drops
    /// its messages and the quiz session handle.
    pub fn close_modal(&mut self) {
        if let Modal::Chat(chat) = &self.modal {
            if let Some(session) = chat.quiz.session() {
                debug!("abandoning quiz session {}", session.session_id);
            }
        }
        self.modal = Modal::None;
    }

    // ── Applying ───────────────────────────────────────────────────────────

    pub fn open_apply(&mut self, job_id: JobId) -> Result<(), ClientError> {
        self.ensure_no_modal()?;
        let job = self.find_job(job_id)?;
        self.modal = Modal::Apply {
            job,
            draft: Default::default(),
        };
        Ok(())
    }

    pub fn update_applicant(&mut self, field: ApplicantField, value: &str) -> Result<(), ClientError> {
        match &mut self.modal {
            Modal::Apply { draft, .. } => {
                draft.set(field, value);
                Ok(())
            }
            _ => Err(ClientError::NoJobSelected),
        }
    }

    pub fn attach_resume(&mut self, upload: ResumeUpload) -> Result<(), ClientError> {
        match &mut self.modal {
            Modal::Apply { draft, .. } => {
                draft.resume = Some(upload);
                Ok(())
            }
            _ => Err(ClientError::NoJobSelected),
        }
    }

    pub fn cancel_apply(&mut self) {
        if matches!(self.modal, Modal::Apply { .. }) {
            self.modal = Modal::None;
        }
    }

    /// Submits the application. Incomplete drafts are refused without a request and stay
    /// open. Once sent, the dialog closes and the draft is discarded whatever the outcome;
    /// on success the score card opens.
    pub async fn submit_application(&mut self) -> Result<ScoreVerdict, ClientError> {
        let Modal::Apply { job, draft } = &self.modal else {
            return Err(ClientError::NoJobSelected);
        };

        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(ClientError::Validation(format!(
                "Please fill in: {}",
                missing.join(", ")
            )));
        }
        let job_id = job.job_id.ok_or_else(|| {
            ClientError::Validation(
                "This job has not been assigned an id yet; refresh the listing first.".to_string(),
            )
        })?;

        let Modal::Apply { job, draft } = std::mem::take(&mut self.modal) else {
            return Err(ClientError::NoJobSelected);
        };

        let receipt = self.api.apply(job_id, &draft).await?;
        let verdict = ScoreVerdict::from_score(receipt.matching_score);
        info!(
            "Application for job {job_id} scored {:.2} ({verdict:?})",
            receipt.matching_score
        );
        if let Some(message) = &receipt.message {
            debug!("apply: {message}");
        }
        self.modal = Modal::ScoreCard {
            job,
            matching_score: receipt.matching_score,
        };
        Ok(verdict)
    }

    // ── Applications viewer ────────────────────────────────────────────────

    pub async fn open_applications(&mut self, job_id: JobId) -> Result<usize, ClientError> {
        self.ensure_no_modal()?;
        let applications = self.api.list_applications(job_id).await?;
        let count = applications.len();
        self.modal = Modal::Applications {
            job_id,
            applications,
        };
        Ok(count)
    }

    // ── Chat ───────────────────────────────────────────────────────────────

    /// Moves from an eligible score card to the chatbot for the same job.
    pub fn open_chat(&mut self) -> Result<(), ClientError> {
        match self.modal.verdict() {
            Some(ScoreVerdict::Eligible) => {}
            Some(ScoreVerdict::Rejected) => {
                return Err(ClientError::Validation(
                    "This application did not qualify for the quiz.".to_string(),
                ))
            }
            None => return Err(ClientError::NoJobSelected),
        }
        let Modal::ScoreCard { job, .. } = std::mem::take(&mut self.modal) else {
            return Err(ClientError::NoJobSelected);
        };
        self.modal = Modal::Chat(ChatPanel::new(job, self.default_difficulty));
        Ok(())
    }

    pub fn chat(&self) -> Option<&ChatPanel> {
        match &self.modal {
            Modal::Chat(chat) => Some(chat),
            _ => None,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), ClientError> {
        let Modal::Chat(chat) = &mut self.modal else {
            return Err(ClientError::NoJobSelected);
        };
        chat.difficulty = difficulty;
        if let Some(session) = chat.quiz.session_mut() {
            session.difficulty = difficulty;
        }
        if chat.quiz.is_finished() {
            warn!("difficulty changed after the quiz finished; it has no effect");
        }
        Ok(())
    }
}
