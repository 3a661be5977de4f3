use patentwise_core::{AlertId, UserId};
use thiserror::Error;

/// Session lookup and sign-in failures. Absence of a session is not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account {0} is inactive")]
    AccountInactive(String),

    #[error("registration rejected: {0}")]
    Rejected(String),

    #[error("session provider unavailable: {0}")]
    Unavailable(String),
}

/// Content store upload failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("upload of {file_name} failed: {reason}")]
    Upload { file_name: String, reason: String },

    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

/// Submission ingestion failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestionError {
    #[error("submission rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("ingestion service unavailable: {0}")]
    Unavailable(String),

    #[error("submission request was interrupted")]
    Interrupted,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("alert not found: {0}")]
    NotFound(AlertId),

    #[error("alert store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("domain keywords not found: {0}")]
    DomainNotFound(String),

    #[error("invalid domain keywords: {0}")]
    InvalidEntry(String),

    #[error("admin directory unavailable: {0}")]
    Unavailable(String),
}
