//! Admin console: user status, domain keyword management and the system log.
//!
//! Only constructible for an admin session, so no directory call can be made
//! on behalf of anyone else.

use std::sync::Arc;

use chrono::NaiveDateTime;
use patentwise_core::{
    DomainKeywords, LogEntry, LogFilter, Principal, SystemLog, UserAccount, UserId, UserStatus,
};
use patentwise_risk::{DomainSuggestion, suggest_domain};
use patentwise_store::{AdminDirectory, Backend, DirectoryError, UpsertAction};
use tracing::info;

use crate::gate::{GateError, IdentityGate};

pub struct AdminConsole {
    admin: Principal,
    directory: Arc<dyn AdminDirectory>,
}

impl AdminConsole {
    pub fn new(gate: &IdentityGate, backend: &Backend) -> Result<Self, GateError> {
        let admin = gate.require_admin().map_err(|e| match e {
            GateError::SignInRequired => GateError::AccessDenied,
            other => other,
        })?;
        Ok(Self {
            admin: admin.clone(),
            directory: backend.directory.clone(),
        })
    }

    pub async fn users(&self) -> Result<Vec<UserAccount>, DirectoryError> {
        self.directory.list_users().await
    }

    pub async fn set_user_status(&self, id: &UserId, status: UserStatus) -> Result<(), DirectoryError> {
        self.directory.update_user_status(id, status).await?;
        info!(admin = %self.admin.user_id, user = %id, status = status.as_str(), "user status changed");
        Ok(())
    }

    pub async fn domain_keywords(&self) -> Result<Vec<DomainKeywords>, DirectoryError> {
        self.directory.list_domain_keywords().await
    }

    /// Create or replace a keyword list. Keywords are normalized first and
    /// the list must keep at least one.
    pub async fn save_domain_keywords(&self, entry: DomainKeywords) -> Result<UpsertAction, DirectoryError> {
        let entry = entry.normalized();
        if entry.domain_id.trim().is_empty() || entry.domain.is_empty() {
            return Err(DirectoryError::InvalidEntry(
                "domain id and name are required".into(),
            ));
        }
        if entry.keywords.is_empty() {
            return Err(DirectoryError::InvalidEntry(format!(
                "{} has no keywords",
                entry.domain
            )));
        }
        let domain_id = entry.domain_id.clone();
        let action = self.directory.upsert_domain_keywords(entry).await?;
        info!(admin = %self.admin.user_id, domain = %domain_id, ?action, "domain keywords saved");
        Ok(action)
    }

    pub async fn delete_domain_keywords(&self, domain_id: &str) -> Result<(), DirectoryError> {
        self.directory.delete_domain_keywords(domain_id).await?;
        info!(admin = %self.admin.user_id, domain = %domain_id, "domain keywords deleted");
        Ok(())
    }

    /// Newest-first system log records matching `filter`.
    pub async fn system_logs(&self, filter: &LogFilter) -> Result<Vec<SystemLog>, DirectoryError> {
        self.directory.system_logs(filter).await
    }

    pub async fn record_log(&self, entry: LogEntry) -> Result<String, DirectoryError> {
        if let Some(field) = entry.missing_field() {
            return Err(DirectoryError::InvalidEntry(format!("{field} is required")));
        }
        self.directory.log_event(entry).await
    }

    /// Drop records older than `older_than`, or the whole log when `None`.
    pub async fn clear_system_logs(
        &self,
        older_than: Option<NaiveDateTime>,
    ) -> Result<usize, DirectoryError> {
        let deleted = self.directory.clear_system_logs(older_than).await?;
        info!(admin = %self.admin.user_id, deleted, ?older_than, "system logs cleared");
        Ok(deleted)
    }

    /// Try the current keyword lists against a sample text.
    pub async fn preview_suggestion(&self, text: &str) -> Result<Option<DomainSuggestion>, DirectoryError> {
        let keyword_sets = self.directory.list_domain_keywords().await?;
        Ok(suggest_domain(text, &keyword_sets))
    }
}
