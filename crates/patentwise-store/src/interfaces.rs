//! Contracts for the external collaborators the core talks to.
//!
//! Each trait has an in-memory fixture implementation in this crate and a
//! networked one in `patentwise-sync`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use patentwise_core::{
    Alert, AlertId, AnalysisResult, DocumentRef, DomainKeywords, LogEntry, LogFilter, Principal,
    Registration, Submission, SubmissionId, SubmissionRecord, SystemLog, UserAccount, UserId,
    UserStatus,
};
use serde::{Deserialize, Serialize};

use crate::error::{AlertError, DirectoryError, IngestionError, SessionError, StoreError};

/// A file chosen by the user, before it reaches the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Build an upload, inferring the MIME type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Outcome of an analysis lookup. Pending and missing are not failures.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisLookup {
    Ready(AnalysisResult),
    Pending,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The signed-in user, or `None` when there is no session.
    async fn current_session(&self) -> Result<Option<Principal>, SessionError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, SessionError>;

    /// Create an account and open a session for it.
    async fn sign_up(&self, registration: &Registration) -> Result<Principal, SessionError>;

    async fn sign_out(&self) -> Result<(), SessionError>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn store(&self, owner: &UserId, upload: DocumentUpload) -> Result<DocumentRef, StoreError>;
}

#[async_trait]
pub trait SubmissionIngestion: Send + Sync {
    async fn create(&self, submission: Submission) -> Result<SubmissionId, IngestionError>;

    async fn get(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, IngestionError>;

    async fn get_analysis(&self, id: &SubmissionId) -> Result<AnalysisLookup, IngestionError>;

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<SubmissionRecord>, IngestionError>;
}

#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn list(&self, user: &UserId) -> Result<Vec<Alert>, AlertError>;

    async fn mark_read(&self, id: &AlertId) -> Result<(), AlertError>;
}

#[async_trait]
pub trait AdminDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserAccount>, DirectoryError>;

    async fn update_user_status(&self, id: &UserId, status: UserStatus) -> Result<(), DirectoryError>;

    async fn list_domain_keywords(&self) -> Result<Vec<DomainKeywords>, DirectoryError>;

    async fn upsert_domain_keywords(
        &self,
        entry: DomainKeywords,
    ) -> Result<UpsertAction, DirectoryError>;

    async fn delete_domain_keywords(&self, domain_id: &str) -> Result<(), DirectoryError>;

    /// Record an event and return its log id.
    async fn log_event(&self, entry: LogEntry) -> Result<String, DirectoryError>;

    async fn system_logs(&self, filter: &LogFilter) -> Result<Vec<SystemLog>, DirectoryError>;

    /// Delete records older than `older_than`, or every record when `None`.
    /// Returns how many were removed.
    async fn clear_system_logs(
        &self,
        older_than: Option<NaiveDateTime>,
    ) -> Result<usize, DirectoryError>;
}

/// One implementation of every external interface, chosen together.
#[derive(Clone)]
pub struct Backend {
    pub sessions: Arc<dyn SessionProvider>,
    pub content: Arc<dyn ContentStore>,
    pub ingestion: Arc<dyn SubmissionIngestion>,
    pub alerts: Arc<dyn AlertStore>,
    pub directory: Arc<dyn AdminDirectory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_infers_content_type() {
        assert_eq!(DocumentUpload::new("a.PDF", vec![]).content_type, "application/pdf");
        assert_eq!(DocumentUpload::new("claims.txt", vec![1, 2]).content_type, "text/plain");
        assert_eq!(
            DocumentUpload::new("blob", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn upload_reports_size() {
        assert_eq!(DocumentUpload::new("a.txt", vec![0; 42]).size_bytes(), 42);
    }
}
