//! Quiz chatbot: `Idle → Started → AwaitingAnswer ⇄ Started → Finished`.
//!
//! The session handle lives in the chat's `QuizState` and is passed explicitly to each
//! backend call. Every step checks for it before touching the network.

use tracing::{info, warn};

use super::state::{ChatPanel, Modal, QuizState};
use super::JobBoard;
use crate::api_client::{JobBoardApi, QuestionStep};
use crate::errors::ClientError;
use crate::models::quiz::{ChatMessage, QuizSession, MAX_QUESTIONS};

/// What happened to a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text, or no question to answer.
    Ignored,
    Answered,
}

impl JobBoard {
    /// Starts the quiz for the chat's job and fetches the first question.
    ///
    /// If the quiz already holds a session but no question (a previous fetch failed),
    /// this retries the fetch instead of starting over.
    pub async fn start_quiz(&mut self) -> Result<(), ClientError> {
        let Modal::Chat(chat) = &mut self.modal else {
            return Err(ClientError::NoJobSelected);
        };

        let retry = match &chat.quiz {
            QuizState::Idle | QuizState::Started { session: None } => false,
            QuizState::Started { session: Some(_) } => true,
            QuizState::AwaitingAnswer { .. } | QuizState::Finished { .. } => return Ok(()),
        };
        if retry {
            return fetch_next_question(self.api.as_ref(), chat).await;
        }

        let start = self
            .api
            .start_quiz(&chat.job.title, chat.job.job_id, &self.quiz_user_id)
            .await?;

        let session = start
            .session_id
            .filter(|id| !id.trim().is_empty())
            .map(|id| QuizSession::new(id, chat.difficulty));
        match &session {
            Some(session) => info!(
                "Quiz started for {:?} (session {}): {}",
                chat.job.title,
                session.session_id,
                start.message.as_deref().unwrap_or("")
            ),
            None => warn!("start_quiz succeeded without a session id"),
        }
        chat.quiz = QuizState::Started { session };

        fetch_next_question(self.api.as_ref(), chat).await
    }

    /// Answers the current question. The answer is upper-cased before it is sent. After a
    /// non-final answer the next question is fetched straight away.
    pub async fn send_message(&mut self, text: &str) -> Result<SendOutcome, ClientError> {
        let Modal::Chat(chat) = &mut self.modal else {
            return Ok(SendOutcome::Ignored);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        let QuizState::AwaitingAnswer { session, .. } = &chat.quiz else {
            return Ok(SendOutcome::Ignored);
        };
        let mut session = session.clone().ok_or(ClientError::SessionExpired)?;

        let answer = text.to_uppercase();
        chat.push(ChatMessage::user(answer.clone()));

        let feedback = self.api.answer(&session, &answer).await?;
        chat.push(ChatMessage::bot(feedback.feedback));

        if !session.record_answer(feedback.score) {
            warn!(
                "backend lowered the quiz score from {} to {}; keeping {}",
                session.score, feedback.score, session.score
            );
        }

        if feedback.finished {
            let result = feedback.result_message.unwrap_or_else(|| {
                format!(
                    "Quiz finished with a score of {}/{}.",
                    session.score, MAX_QUESTIONS
                )
            });
            info!("Quiz finished with score {}", session.score);
            chat.push(ChatMessage::bot(result));
            chat.quiz = QuizState::Finished {
                score: session.score,
            };
            return Ok(SendOutcome::Answered);
        }

        chat.quiz = QuizState::Started {
            session: Some(session),
        };
        fetch_next_question(self.api.as_ref(), chat).await?;
        Ok(SendOutcome::Answered)
    }
}

/// `Started → AwaitingAnswer`, or `Started → Finished` when the backend has no more questions.
async fn fetch_next_question(
    api: &dyn JobBoardApi,
    chat: &mut ChatPanel,
) -> Result<(), ClientError> {
    let QuizState::Started { session } = &chat.quiz else {
        return Ok(());
    };
    let session = session.clone().ok_or(ClientError::SessionExpired)?;

    match api.next_question(&session).await? {
        QuestionStep::Question(question) => {
            chat.push(ChatMessage::bot(question.chat_text()));
            chat.quiz = QuizState::AwaitingAnswer {
                session: Some(session),
                question,
            };
        }
        QuestionStep::Finished { message } => {
            chat.push(ChatMessage::bot(message));
            chat.quiz = QuizState::Finished {
                score: session.score,
            };
        }
    }
    Ok(())
}
