use std::fmt::{Display, Formatter};
use std::time::Duration;

use thiserror::Error;

/// Input validation errors raised before any request leaves the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("company name cannot be empty")]
    EmptyCompanyName,
    #[error("website cannot be empty")]
    EmptyWebsite,

    #[error("LEI code must be exactly {expected} characters, got {len}")]
    InvalidLeiLength { len: usize, expected: usize },
    #[error("LEI code contains invalid character '{ch}' at index {index}")]
    InvalidLeiChar { ch: char, index: usize },

    #[error("country filter must be a 2-letter ISO 3166-1 code: '{value}'")]
    InvalidCountry { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Malformed input detected before any network call.
    InvalidRequest,
    /// Transport failure, timeout, or a retryable upstream status.
    Unavailable,
    /// Upstream quota exhausted.
    RateLimited,
    /// Unexpected upstream payload or non-retryable upstream status.
    Internal,
}

/// Structured error returned by the registry and verifier adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
    retry_after: Option<Duration>,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message, false)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message, true)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message, true)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message, false)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            retry_after: None,
        }
    }

    /// Attaches a server-directed delay to wait before the next attempt.
    pub fn with_retry_after(mut self, delay: Duration) -> Self {
        self.retry_after = Some(delay);
        self
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}
