//! Domain Layer - Errors
//!
//! Every failure the store can observe. Errors are `Clone` so that
//! sync outcomes can carry them into user-facing notices.

use thiserror::Error;

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("No cached snapshot under key '{0}'")]
    CacheMiss(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Remote failures are absorbed by the store, everything else reaches the caller.
    pub fn is_remote(&self) -> bool {
        matches!(self, StoreError::Remote(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Remote(RemoteError::from(err))
    }
}

/// Input rejected before any mutation happens
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    EmptyLabel(String),

    #[error("Amount is required")]
    MissingAmount,

    #[error("Amount must be a number, got '{0}'")]
    AmountNotNumber(String),

    #[error("Amount must be a finite number")]
    AmountNotFinite,

    #[error("Priority must be an integer, got '{0}'")]
    PriorityNotInteger(String),

    #[error("Priority must not be negative, got {0}")]
    NegativePriority(i64),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    BadDate(String),
}

/// Failure of a call against the remote collection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("remote collection is offline")]
    Offline,

    #[error("network failure: {0}")]
    Network(String),

    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::Status {
                code: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}
