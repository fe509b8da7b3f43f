//! Terminal front-end: one command per line, rendered as plain text.

use std::path::PathBuf;

use crate::board::{JobBoard, SendOutcome};
use crate::errors::ClientError;
use crate::models::application::{ApplicantField, ResumeUpload};
use crate::models::job::{JobField, JobId};
use crate::models::quiz::Difficulty;

pub mod render;

pub const HELP: &str = "\
Commands:
  jobs                     show the listing
  refresh                  reload the listing from the backend
  filter [text]            live search on title, location, description (empty clears)
  details <job_id>         show one job
  post                     open the job form
  set <field> <value>      fill a form field (title, description, location,
                           salary_range, experience_level, job_type)
  submit                   post the job, or send the open application
  cancel                   close the job form or the application dialog
  apply <job_id>           open the application dialog
  name <value>             applicant name
  email <value>            applicant email
  resume <path>            attach a résumé file
  applications <job_id>    list applications for a job
  quiz                     take the chatbot quiz from the score card
  start                    start the quiz
  difficulty <level>       easy, medium or hard
  say <answer>             answer the current question
  close                    close the open dialog
  help                     show this help
  quit                     exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Jobs,
    Refresh,
    Filter(String),
    Details(JobId),
    Post,
    Set(JobField, String),
    Submit,
    Cancel,
    Apply(JobId),
    Name(String),
    Email(String),
    Resume(PathBuf),
    Applications(JobId),
    Quiz,
    Start,
    Difficulty(Difficulty),
    Say(String),
    Close,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "jobs" | "ls" => Command::Jobs,
            "refresh" => Command::Refresh,
            "filter" | "search" => Command::Filter(rest.to_string()),
            "details" => Command::Details(job_id(rest)?),
            "post" => Command::Post,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: set <field> <value>".to_string())?;
                Command::Set(field.parse()?, value.trim().to_string())
            }
            "submit" => Command::Submit,
            "cancel" => Command::Cancel,
            "apply" => Command::Apply(job_id(rest)?),
            "name" => Command::Name(rest.to_string()),
            "email" => Command::Email(rest.to_string()),
            "resume" => {
                if rest.is_empty() {
                    return Err("usage: resume <path>".to_string());
                }
                Command::Resume(PathBuf::from(rest))
            }
            "applications" => Command::Applications(job_id(rest)?),
            "quiz" => Command::Quiz,
            "start" => Command::Start,
            "difficulty" => Command::Difficulty(rest.parse()?),
            "say" | "answer" => Command::Say(rest.to_string()),
            "close" => Command::Close,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(command)
    }
}

fn job_id(raw: &str) -> Result<JobId, String> {
    raw.parse()
        .map_err(|_| format!("'{raw}' is not a job id"))
}

/// Applies one command to the board. Returns a short note for the user, if any.
pub async fn dispatch(
    board: &mut JobBoard,
    command: Command,
) -> Result<Option<String>, ClientError> {
    use crate::board::state::Modal;

    let note = match command {
        Command::Jobs | Command::Help | Command::Quit => None,
        Command::Refresh => Some(format!("Loaded {} jobs.", board.load_jobs().await?)),
        Command::Filter(query) => {
            board.set_filter(&query);
            None
        }
        Command::Details(id) => {
            board.open_details(id)?;
            None
        }
        Command::Post => {
            board.open_job_form();
            None
        }
        Command::Set(field, value) => {
            board.update_job_field(field, &value)?;
            None
        }
        Command::Submit => {
            if matches!(board.modal(), Modal::Apply { .. }) {
                board.submit_application().await?;
            } else {
                board.submit_job().await?;
            }
            None
        }
        Command::Cancel => {
            if matches!(board.modal(), Modal::Apply { .. }) {
                board.cancel_apply();
            } else {
                board.cancel_job_form();
            }
            None
        }
        Command::Apply(id) => {
            board.open_apply(id)?;
            None
        }
        Command::Name(value) => {
            board.update_applicant(ApplicantField::Name, &value)?;
            None
        }
        Command::Email(value) => {
            board.update_applicant(ApplicantField::Email, &value)?;
            None
        }
        Command::Resume(path) => {
            let upload = ResumeUpload::from_path(&path).await?;
            let note = format!("Attached {} ({} bytes).", upload.file_name, upload.bytes.len());
            board.attach_resume(upload)?;
            Some(note)
        }
        Command::Applications(id) => {
            board.open_applications(id).await?;
            None
        }
        Command::Quiz => {
            board.open_chat()?;
            None
        }
        Command::Start => {
            board.start_quiz().await?;
            None
        }
        Command::Difficulty(level) => {
            board.set_difficulty(level)?;
            Some(format!("Difficulty set to {level}."))
        }
        Command::Say(text) => match board.send_message(&text).await? {
            SendOutcome::Answered => None,
            SendOutcome::Ignored => Some("Nothing to answer right now.".to_string()),
        },
        Command::Close => {
            board.close_modal();
            None
        }
    };
    Ok(note)
}
