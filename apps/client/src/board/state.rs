//! The board's view state, one enum per concern.

use crate::models::application::{Application, ApplicationDraft, ScoreVerdict};
use crate::models::job::{Job, JobDraft, JobId};
use crate::models::quiz::{ChatMessage, Difficulty, Question, QuizSession};

const WELCOME: &str =
    "👋 Welcome to the TalentMatch Quiz! Let's test your knowledge. Type 'start' to begin.";

/// The job-posting form.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JobForm {
    #[default]
    Closed,
    Open(JobDraft),
    /// A `/post_job` request is in flight; further submits are ignored.
    Submitting(JobDraft),
}

impl JobForm {
    pub fn draft(&self) -> Option<&JobDraft> {
        match self {
            JobForm::Closed => None,
            JobForm::Open(draft) | JobForm::Submitting(draft) => Some(draft),
        }
    }
}

/// The single dialog on screen. Every variant that names a job is the current selection.
#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    None,
    Details {
        job: Job,
    },
    Apply {
        job: Job,
        draft: ApplicationDraft,
    },
    ScoreCard {
        job: Job,
        matching_score: f64,
    },
    Applications {
        job_id: JobId,
        applications: Vec<Application>,
    },
    Chat(ChatPanel),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }

    pub fn selected_job(&self) -> Option<&Job> {
        match self {
            Modal::Details { job }
            | Modal::Apply { job, .. }
            | Modal::ScoreCard { job, .. } => Some(job),
            Modal::Chat(chat) => Some(&chat.job),
            Modal::None | Modal::Applications { .. } => None,
        }
    }

    pub fn verdict(&self) -> Option<ScoreVerdict> {
        match self {
            Modal::ScoreCard { matching_score, .. } => {
                Some(ScoreVerdict::from_score(*matching_score))
            }
            _ => None,
        }
    }
}

/// Quiz progress inside the chat dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum QuizState {
    #[default]
    Idle,
    /// Waiting for the next question. `session` is `None` if the backend issued no id.
    Started { session: Option<QuizSession> },
    AwaitingAnswer {
        session: Option<QuizSession>,
        question: Question,
    },
    Finished { score: u32 },
}

impl QuizState {
    pub fn session(&self) -> Option<&QuizSession> {
        match self {
            QuizState::Started { session } | QuizState::AwaitingAnswer { session, .. } => {
                session.as_ref()
            }
            QuizState::Idle | QuizState::Finished { .. } => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut QuizSession> {
        match self {
            QuizState::Started { session } | QuizState::AwaitingAnswer { session, .. } => {
                session.as_mut()
            }
            QuizState::Idle | QuizState::Finished { .. } => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self {
            QuizState::AwaitingAnswer { question, .. } => Some(question),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, QuizState::Finished { .. })
    }

    /// Whether "start" is offered: before the quiz, or after it started without a session.
    pub fn can_start(&self) -> bool {
        matches!(self, QuizState::Idle | QuizState::Started { session: None })
    }
}

/// The chatbot dialog for one job.
#[derive(Debug, Clone)]
pub struct ChatPanel {
    pub job: Job,
    pub messages: Vec<ChatMessage>,
    pub quiz: QuizState,
    pub difficulty: Difficulty,
}

impl ChatPanel {
    pub fn new(job: Job, difficulty: Difficulty) -> Self {
        ChatPanel {
            job,
            messages: vec![ChatMessage::bot(WELCOME)],
            quiz: QuizState::Idle,
            difficulty,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn job() -> Job {
        Job {
            job_id: Some(JobId(9)),
            title: "ML Engineer".to_string(),
            description: String::new(),
            location: String::new(),
            salary_range: String::new(),
            experience_level: String::new(),
            job_type: String::new(),
        }
    }

    #[test]
    fn test_applications_modal_selects_no_job() {
        let modal = Modal::Applications {
            job_id: JobId(9),
            applications: Vec::new(),
        };
        assert!(modal.is_open());
        assert!(modal.selected_job().is_none());
    }

    #[test]
    fn test_score_card_verdict() {
        let modal = Modal::ScoreCard {
            job: job(),
            matching_score: 0.39,
        };
        assert_eq!(modal.verdict(), Some(ScoreVerdict::Rejected));
        assert_eq!(modal.selected_job().and_then(|j| j.job_id), Some(JobId(9)));
    }

    #[test]
    fn test_quiz_state_accessors() {
        let question = Question {
            q_number: 1,
            question: "?".to_string(),
            options: BTreeMap::new(),
        };
        let state = QuizState::AwaitingAnswer {
            session: Some(QuizSession::new("s1", Difficulty::Easy)),
            question: question.clone(),
        };
        assert_eq!(state.session().map(|s| s.session_id.as_str()), Some("s1"));
        assert_eq!(state.current_question(), Some(&question));
        assert!(!state.can_start());
        assert!(QuizState::Started { session: None }.can_start());
        assert!(QuizState::Finished { score: 3 }.is_finished());
    }

    #[test]
    fn test_chat_panel_opens_with_welcome() {
        let chat = ChatPanel::new(job(), Difficulty::Medium);
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.quiz, QuizState::Idle);
    }
}
