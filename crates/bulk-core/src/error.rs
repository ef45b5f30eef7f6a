//! Error types for Bulk Builder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Request errors
    #[error("Invalid selection criterion: {0}")]
    InvalidSelectionToken(String),

    #[error("Invalid build action: {0}")]
    InvalidAction(String),

    #[error("Missing request field: {0}")]
    MissingField(&'static str),

    // Job errors
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Build submission failed for {job}: {message}")]
    SubmissionFailed { job: String, message: String },

    // Pattern errors
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    // Infrastructure errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the error rejects a request before any job is touched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::InvalidSelectionToken(_)
                | Error::InvalidAction(_)
                | Error::MissingField(_)
                | Error::InvalidPattern { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
