use thiserror::Error;

/// Failure of a single backend request.
///
/// Both kinds are surfaced inline at the point of the failed action. Results
/// that arrive for a superseded request never become an error value: they are
/// dropped by generation comparison before reaching any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request could not complete, or the reply could not be decoded.
    #[error("{0}")]
    Network(String),

    /// Non-2xx reply, with the backend's `error` message when it sent one.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl BackendError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;
