use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to attach listener to {control}: {reason}")]
    SourceRegistration {
        control: &'static str,
        reason: String,
    },
    #[error("search failed for {query:?}: {message}")]
    SearchFailure { query: String, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    pub fn registration(control: &'static str, reason: impl Into<String>) -> Self {
        Error::SourceRegistration {
            control,
            reason: reason.into(),
        }
    }

    pub fn search(query: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::SearchFailure {
            query: query.into(),
            message: err.to_string(),
        }
    }
}
