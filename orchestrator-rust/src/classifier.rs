//! Normalizes backend failures into a small taxonomy that decides
//! retryability.
use crate::BackendError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use slidegen_sdk::LanguageModelError;
use std::{fmt, sync::LazyLock, time::Duration};

pub const DEFAULT_MAX_RETRIES: u32 = 2;

const BASE_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationError,
    ApiError,
    ParsingError,
    TimeoutError,
    QuotaExceeded,
    InvalidResponse,
    NetworkError,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration_error",
            Self::ApiError => "api_error",
            Self::ParsingError => "parsing_error",
            Self::TimeoutError => "timeout_error",
            Self::QuotaExceeded => "quota_exceeded",
            Self::InvalidResponse => "invalid_response",
            Self::NetworkError => "network_error",
        }
    }

    /// One short sentence suitable for showing to an end user.
    #[must_use]
    pub fn user_message(self) -> &'static str {
        match self {
            Self::ConfigurationError => {
                "AI service is not configured correctly. Please check your settings."
            }
            Self::ApiError => "AI service returned an error. Please try again.",
            Self::ParsingError => "Could not understand the AI response. Please try again.",
            Self::TimeoutError => "AI service took too long to respond. Please try again.",
            Self::QuotaExceeded => "AI service quota exceeded. Please try again later.",
            Self::InvalidResponse => "AI service returned an invalid response. Please try again.",
            Self::NetworkError => "Could not reach the AI service. Please check your connection.",
        }
    }

    fn is_transient(self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::TimeoutError | Self::ApiError | Self::QuotaExceeded
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backend operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GenerateSlide,
    GenerateFreeformDeck,
    GenerateChat,
    Status,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateSlide => "generate_slide",
            Self::GenerateFreeformDeck => "generate_freeform_deck",
            Self::GenerateChat => "generate_chat",
            Self::Status => "status",
        }
    }
}

#[derive(Debug)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub retryable: bool,
    pub provider: String,
    pub operation: Operation,
    pub cause: BackendError,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} during {} on {}: {}",
            self.kind,
            self.operation.as_str(),
            self.provider,
            self.cause
        )
    }
}

impl std::error::Error for ClassifiedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Classify a failed backend call.
#[must_use]
pub fn classify(error: BackendError, provider: &str, operation: Operation) -> ClassifiedError {
    let (kind, retryable) = classify_error(&error);
    ClassifiedError {
        kind,
        retryable,
        provider: provider.to_string(),
        operation,
        cause: error,
    }
}

fn classify_error(error: &BackendError) -> (ErrorKind, bool) {
    match error {
        BackendError::NotConfigured(..) => (ErrorKind::ConfigurationError, false),
        BackendError::Parse(..) => (ErrorKind::ParsingError, false),
        BackendError::InvalidResponse(..) => (ErrorKind::InvalidResponse, false),
        BackendError::Cancelled => (ErrorKind::ApiError, false),
        BackendError::LanguageModel(error) => classify_language_model_error(error),
    }
}

fn classify_language_model_error(error: &LanguageModelError) -> (ErrorKind, bool) {
    match error {
        LanguageModelError::Transport(error) => {
            if error.is_connect() {
                (ErrorKind::NetworkError, true)
            } else if error.is_timeout() {
                (ErrorKind::TimeoutError, true)
            } else if let Some(status) = error.status() {
                classify_status(status.as_u16())
            } else if error.is_decode() {
                (ErrorKind::InvalidResponse, false)
            } else {
                classify_message(&error.to_string())
            }
        }
        LanguageModelError::StatusCode(status, _) => classify_status(status.as_u16()),
        LanguageModelError::Invariant(..) => (ErrorKind::InvalidResponse, false),
        LanguageModelError::Refusal(_) => (ErrorKind::ApiError, false),
        LanguageModelError::InvalidInput(message) => classify_message(message),
    }
}

/// Classification by HTTP status code.
#[must_use]
pub fn classify_status(status: u16) -> (ErrorKind, bool) {
    match status {
        401 => (ErrorKind::ConfigurationError, false),
        429 => (ErrorKind::QuotaExceeded, true),
        500..=599 => (ErrorKind::ApiError, true),
        _ => (ErrorKind::ApiError, false),
    }
}

static STATUS_IN_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:status|http)(?:[ _]?code)?[\s:=]*(\d{3})\b")
        .expect("status regex is valid")
});

/// Fallback for causes that carry nothing but a message.
#[must_use]
pub fn classify_message(message: &str) -> (ErrorKind, bool) {
    let message = message.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|needle| message.contains(needle));

    if contains_any(&[
        "connection refused",
        "econnrefused",
        "enotfound",
        "dns error",
        "failed to lookup address",
        "getaddrinfo",
    ]) {
        return (ErrorKind::NetworkError, true);
    }
    if contains_any(&["timeout", "timed out", "etimedout"]) {
        return (ErrorKind::TimeoutError, true);
    }
    if let Some(status) = STATUS_IN_MESSAGE
        .captures(&message)
        .and_then(|captures| captures[1].parse::<u16>().ok())
    {
        return classify_status(status);
    }
    if contains_any(&["rate limit", "too many requests"]) {
        return (ErrorKind::QuotaExceeded, true);
    }
    if contains_any(&["parse", "invalid response"]) {
        return (ErrorKind::ParsingError, false);
    }
    if contains_any(&["not configured", "missing api key"]) {
        return (ErrorKind::ConfigurationError, false);
    }
    (ErrorKind::ApiError, false)
}

/// Whether a failure deserves another attempt.
#[must_use]
pub fn should_retry(error: &ClassifiedError, attempt_count: u32, max_retries: u32) -> bool {
    attempt_count < max_retries && error.kind.is_transient()
}

/// Exponential backoff: 1s, 2s, 4s, 8s, then capped at 10s.
#[must_use]
pub fn backoff_delay(attempt_count: u32) -> Duration {
    BASE_BACKOFF
        .saturating_mul(2u32.saturating_pow(attempt_count))
        .min(MAX_BACKOFF)
}
