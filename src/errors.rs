//! # Trainer Error Types Module
//!
//! This module defines the error type shared by the translation, quiz and session
//! components. Every variant is recoverable: bot handlers turn it into a notice for the
//! user instead of letting it escape to the dispatcher.

/// Custom error types for trainer operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainerError {
    /// Translation provider failed, answered with a non-success status, or the circuit is open
    Gateway(String),
    /// Callback refers to a request or quiz message that is no longer tracked
    StaleRequest(String),
    /// Quiz requested with an empty vocabulary
    EmptyVocabulary,
    /// Translation provider answered but produced no candidates
    NoCandidates(String),
    /// Session store I/O, serialization or database failure
    Storage(String),
}

impl std::fmt::Display for TrainerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainerError::Gateway(msg) => write!(f, "Gateway error: {msg}"),
            TrainerError::StaleRequest(signal) => write!(f, "Stale request: {signal}"),
            TrainerError::EmptyVocabulary => write!(f, "Vocabulary is empty"),
            TrainerError::NoCandidates(term) => write!(f, "No translation candidates for: {term}"),
            TrainerError::Storage(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for TrainerError {}

impl From<reqwest::Error> for TrainerError {
    fn from(err: reqwest::Error) -> Self {
        TrainerError::Gateway(err.to_string())
    }
}

impl From<serde_json::Error> for TrainerError {
    fn from(err: serde_json::Error) -> Self {
        TrainerError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for TrainerError {
    fn from(err: std::io::Error) -> Self {
        TrainerError::Storage(err.to_string())
    }
}

impl From<sqlx::Error> for TrainerError {
    fn from(err: sqlx::Error) -> Self {
        TrainerError::Storage(err.to_string())
    }
}

/// Result type for trainer operations
pub type TrainerResult<T> = Result<T, TrainerError>;
