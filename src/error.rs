use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while fetching a market rate.
///
/// These never escape the rate resolver: they are folded into
/// [`RateOutcome::Error`](crate::app::RateOutcome::Error) for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("{0}")]
    Rejected(String),

    #[error("quote request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("quote service unreachable: {0}")]
    Transport(String),

    #[error("invalid quote response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while approving or submitting an order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("token approval failed: {0}")]
    ApprovalFailed(String),

    #[error("order submission failed: {0}")]
    SubmissionFailed(String),

    #[error("invalid {field}: {reason}")]
    InvalidAmount { field: &'static str, reason: String },

    #[error("{step} timed out after {timeout_ms}ms")]
    Timeout { step: &'static str, timeout_ms: u64 },
}

/// Errors raised while reading order history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("order query failed: {0}")]
    Query(String),

    #[error("invalid order record: {0}")]
    InvalidResponse(String),

    #[error("order query timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("unknown token: {0}")]
    UnknownToken(String),

    #[error("order not ready: {0}")]
    NotReady(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
