use thiserror::Error;

/// Failures surfaced by the filter/extraction pipeline and the remote sources.
///
/// Empty results are never reported through this type; an empty `Table` or
/// an empty navigator is the signal for "nothing there".
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configured column name does not exist in the table being processed.
    #[error("Column '{0}' not found in table")]
    MissingColumn(String),

    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed payload from {url}: {message}")]
    Payload { url: String, message: String },
}

impl CoreError {
    /// Coarse category used by the orchestrator to pick a user-facing message.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoreError::MissingColumn(_) => ErrorCategory::Configuration,
            CoreError::Transport { .. } => ErrorCategory::Connection,
            CoreError::Payload { .. } => ErrorCategory::Unexpected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Configuration,
    Unexpected,
}
