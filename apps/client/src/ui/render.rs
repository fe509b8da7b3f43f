//! Plain-text rendering of the board. Pure: reads the board, returns a string.

use std::fmt::Write;

use crate::board::state::{ChatPanel, JobForm, Modal, QuizState};
use crate::board::JobBoard;
use crate::models::application::{Application, ScoreVerdict};
use crate::models::job::{Job, JobField, JobId};
use crate::models::quiz::{Sender, MAX_QUESTIONS};

const RULE: &str = "────────────────────────────────────────────────────────";

pub fn render(board: &JobBoard) -> String {
    let mut out = String::new();

    if board.banner_visible() {
        out.push_str("✔ Job posted successfully!\n\n");
    }

    render_form(&mut out, board.form());
    render_jobs(&mut out, board);

    match board.modal() {
        Modal::None => {}
        modal => {
            out.push('\n');
            out.push_str(RULE);
            out.push('\n');
            if let Some(job) = board.selected_job() {
                let _ = writeln!(out, "Selected: {} {}", job_label(job), job.title);
            }
            match board.chat() {
                Some(chat) => render_chat(&mut out, chat),
                None => render_modal(&mut out, modal),
            }
            out.push_str(RULE);
            out.push('\n');
        }
    }
    out
}

fn render_form(out: &mut String, form: &JobForm) {
    let Some(draft) = form.draft() else {
        return;
    };
    let title = if matches!(form, JobForm::Submitting(_)) {
        "Post a job (posting…)"
    } else {
        "Post a job"
    };
    let _ = writeln!(out, "{title}");
    for field in JobField::ALL {
        let value = draft.get(field);
        let value = if value.is_empty() { "—" } else { value };
        let _ = writeln!(out, "  {:<17} {value}", field.as_str());
    }
    out.push('\n');
}

fn render_jobs(out: &mut String, board: &JobBoard) {
    let jobs = board.visible_jobs();
    if board.filter().is_empty() {
        let _ = writeln!(out, "Available Jobs ({})", jobs.len());
    } else {
        let _ = writeln!(
            out,
            "Available Jobs ({} of {})",
            jobs.len(),
            board.jobs().len()
        );
        let _ = writeln!(out, "  search: {}", board.filter());
    }
    if jobs.is_empty() {
        out.push_str("  No jobs found matching your search.\n");
        return;
    }
    for job in jobs {
        render_job_card(out, job);
    }
}

fn job_label(job: &Job) -> String {
    match job.job_id {
        Some(id) => format!("[{id}]"),
        None => "[pending]".to_string(),
    }
}

fn render_job_card(out: &mut String, job: &Job) {
    let _ = writeln!(out, "{} {} · {}", job_label(job), job.title, job.job_type);
    let _ = writeln!(
        out,
        "    📍 {}   💰 {}   🎯 {}",
        job.location,
        job.salary_display(),
        job.experience_level
    );
    if !job.description.is_empty() {
        let _ = writeln!(out, "    {}", job.description);
    }
}

fn render_modal(out: &mut String, modal: &Modal) {
    match modal {
        Modal::None => {}
        Modal::Details { job } => {
            let _ = writeln!(out, "{} {}", job_label(job), job.title);
            let _ = writeln!(out, "  Location:    {}", job.location);
            let _ = writeln!(out, "  Salary:      {}", job.salary_display());
            let _ = writeln!(out, "  Experience:  {}", job.experience_level);
            let _ = writeln!(out, "  Type:        {}", job.job_type);
            let _ = writeln!(out, "  {}", job.description);
        }
        Modal::Apply { job, draft } => {
            let _ = writeln!(out, "Apply for {}", job.title);
            let _ = writeln!(out, "  name:   {}", draft.name);
            let _ = writeln!(out, "  email:  {}", draft.email);
            let resume = draft
                .resume
                .as_ref()
                .map(|r| r.file_name.as_str())
                .unwrap_or("—");
            let _ = writeln!(out, "  resume: {resume}");
            out.push_str("  (submit / cancel)\n");
        }
        Modal::ScoreCard {
            job,
            matching_score,
        } => {
            let _ = writeln!(out, "Application for {} submitted successfully!", job.title);
            let _ = writeln!(out, "  Matching Score: {matching_score:.2}");
            match ScoreVerdict::from_score(*matching_score) {
                ScoreVerdict::Rejected => out.push_str(
                    "  You are rejected because your resume doesn't align with the job you applied for.\n  (close to return)\n",
                ),
                ScoreVerdict::Eligible => out.push_str(
                    "  Your resume is aligned with the job. Would you like to take the chatbot test?\n  (quiz / close)\n",
                ),
            }
        }
        Modal::Applications {
            job_id,
            applications,
        } => render_applications(out, *job_id, applications),
        Modal::Chat(chat) => render_chat(out, chat),
    }
}

fn render_applications(out: &mut String, job_id: JobId, applications: &[Application]) {
    let _ = writeln!(out, "Applications for job {job_id}");
    if applications.is_empty() {
        out.push_str("  No applications yet for this job.\n");
        return;
    }
    for app in applications {
        let _ = writeln!(
            out,
            "  {} <{}>  score {:.2}  {}",
            app.applicant_name,
            app.email,
            app.matching_score,
            app.resume_summary()
        );
    }
}

fn render_chat(out: &mut String, chat: &ChatPanel) {
    let _ = writeln!(out, "Chatbot Assistant · {} · {}", chat.job.title, chat.difficulty);
    for message in &chat.messages {
        let who = match message.sender {
            Sender::Bot => "bot",
            Sender::User => "you",
        };
        let _ = writeln!(out, "  [{}] {who}:", message.time_label());
        for line in message.text.lines() {
            let _ = writeln!(out, "      {line}");
        }
    }
    match &chat.quiz {
        state if state.can_start() => out.push_str("  (start / difficulty <level> / close)\n"),
        QuizState::AwaitingAnswer { session, .. } => {
            let (score, answered) = session
                .as_ref()
                .map(|s| (s.score, s.question_index))
                .unwrap_or_default();
            let letters = chat
                .quiz
                .current_question()
                .map(|q| q.options.keys().cloned().collect::<Vec<_>>().join("/"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  answered {answered}/{MAX_QUESTIONS}  score {score}  (say {letters})"
            );
        }
        QuizState::Finished { score } => {
            let _ = writeln!(out, "  final score {score}/{MAX_QUESTIONS}  (close)");
        }
        QuizState::Started { .. } => out.push_str("  (start to fetch the next question)\n"),
        QuizState::Idle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::{Difficulty, Question, QuizSession};

    fn job() -> Job {
        Job {
            job_id: Some(JobId(5)),
            title: "Data Analyst".to_string(),
            description: "Dashboards".to_string(),
            location: "Cairo".to_string(),
            salary_range: String::new(),
            experience_level: "Junior".to_string(),
            job_type: "Contract".to_string(),
        }
    }

    #[test]
    fn test_job_card_shows_na_salary() {
        let mut out = String::new();
        render_job_card(&mut out, &job());
        assert!(out.starts_with("[5] Data Analyst · Contract\n"));
        assert!(out.contains("💰 N/A"));
    }

    #[test]
    fn test_pending_job_label() {
        let mut pending = job();
        pending.job_id = None;
        assert_eq!(job_label(&pending), "[pending]");
    }

    #[test]
    fn test_applications_empty_state() {
        let mut out = String::new();
        render_applications(&mut out, JobId(5), &[]);
        assert!(out.contains("No applications yet for this job."));
    }

    #[test]
    fn test_score_card_branches() {
        let mut rejected = String::new();
        render_modal(
            &mut rejected,
            &Modal::ScoreCard {
                job: job(),
                matching_score: 0.39,
            },
        );
        assert!(rejected.contains("You are rejected"));

        let mut eligible = String::new();
        render_modal(
            &mut eligible,
            &Modal::ScoreCard {
                job: job(),
                matching_score: 0.4,
            },
        );
        assert!(eligible.contains("take the chatbot test"));
    }

    #[test]
    fn test_finished_chat_hides_quiz_controls() {
        let mut chat = ChatPanel::new(job(), Default::default());
        chat.quiz = QuizState::Finished { score: 4 };
        let mut out = String::new();
        render_chat(&mut out, &chat);
        assert!(out.contains("final score 4/5"));
        assert!(!out.contains("(start"));
        assert!(!out.contains("(say"));
    }

    #[test]
    fn test_chat_footer_shows_progress_and_letters() {
        let mut session = QuizSession::new("s1", Difficulty::Medium);
        session.record_answer(1);
        session.record_answer(1);
        let question = Question {
            q_number: 3,
            question: "Pick one".to_string(),
            options: [("A", "x"), ("B", "y"), ("C", "z")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        let mut chat = ChatPanel::new(job(), Difficulty::Medium);
        chat.quiz = QuizState::AwaitingAnswer {
            session: Some(session),
            question,
        };
        let mut out = String::new();
        render_chat(&mut out, &chat);
        assert!(out.contains("answered 2/5  score 1  (say A/B/C)"));
    }
}
