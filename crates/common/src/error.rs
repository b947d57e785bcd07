use thiserror::Error;

/// Errors raised while polling the status API and relaying verdicts.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Status API request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Status API responded with HTTP {0}")]
    StatusCode(u16),

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Response is missing expected key \"{0}\"")]
    MissingField(String),

    #[error("Unexpected homework status \"{0}\"")]
    UnknownStatus(String),

    #[error("Failed to send Telegram message: {0}")]
    Dispatch(String),
}

impl WatchError {
    /// Whether the watch loop must stop instead of retrying on the next cycle.
    ///
    /// Only a broken notification channel is fatal: there is nowhere left to
    /// report further failures to.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WatchError::Dispatch(_))
    }
}
