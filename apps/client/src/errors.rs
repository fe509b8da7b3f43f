use thiserror::Error;

/// Client-level error type.
/// Every variant is recoverable: the UI shows an alert and the board keeps its last consistent state.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("Backend error: {0}")]
    Application(String),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Quiz session expired")]
    SessionExpired,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No job selected")]
    NoJobSelected,

    #[error("Another dialog is already open")]
    ModalBusy,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The message shown to the user in the blocking alert.
    pub fn alert_text(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Could not reach the job board. Please try again later.".to_string()
            }
            ClientError::Http { message, .. } | ClientError::Application(message) => {
                format!("Request failed: {message}")
            }
            ClientError::Decode(_) => {
                "The job board sent a response this client does not understand.".to_string()
            }
            ClientError::SessionExpired => "Session expired. Please restart the quiz.".to_string(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::NoJobSelected => "No job selected!".to_string(),
            ClientError::ModalBusy => "Close the open dialog first.".to_string(),
            ClientError::Io(e) => format!("Could not read the file: {e}"),
        }
    }
}

/// The UI boundary: logs the failure for the operator and returns the alert text for the user.
pub fn alert(context: &str, err: &ClientError) -> String {
    match err {
        ClientError::Validation(_) | ClientError::ModalBusy | ClientError::NoJobSelected => {
            tracing::warn!("{context}: {err}");
        }
        _ => tracing::error!("{context}: {err:?}"),
    }
    err.alert_text()
}
