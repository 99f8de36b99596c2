use slidegen_sdk::LanguageModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend is disabled or its credentials are absent or a placeholder.
    #[error("{0} is not configured: {1}")]
    NotConfigured(&'static str, String),
    #[error("Language model error: {0}")]
    LanguageModel(#[from] LanguageModelError),
    /// The model answered, but nothing usable could be extracted from it.
    #[error("Failed to parse response from {0}: {1}")]
    Parse(&'static str, #[source] ParseError),
    /// The model answered with an empty or structurally wrong payload.
    #[error("Invalid response from {0}: {1}")]
    InvalidResponse(&'static str, String),
    #[error("Generation cancelled")]
    Cancelled,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Why the response parser rejected a model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("extracted title is empty")]
    EmptyTitle,
    #[error("extracted content is empty")]
    EmptyContent,
    #[error("no slides found in deck output")]
    NoSlides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
