//! HTTP backend for the Patentwise API.
//!
//! Implements every external interface over the REST endpoints the web
//! service exposes. The bearer token returned by `/api/auth/login` or
//! `/api/auth/register` is kept in memory and attached to every later request.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use patentwise_core::config::BackendConfig;
use patentwise_core::{
    Alert, AlertId, AnalysisResult, DocumentRef, DomainKeywords, LogEntry, LogFilter, Principal,
    Registration, Submission, SubmissionId, SubmissionRecord, SystemLog, UserAccount, UserId,
    UserStatus,
};
use patentwise_store::{
    AdminDirectory, AlertError, AlertStore, AnalysisLookup, Backend, ContentStore,
    DirectoryError, DocumentUpload, IngestionError, SessionError, SessionProvider, StoreError,
    SubmissionIngestion, UpsertAction,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Json(_) => None,
        }
    }
}

impl From<SyncError> for SessionError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Server { status: 401, .. } => SessionError::InvalidCredentials,
            SyncError::Server {
                status: 400 | 409,
                body,
            } => SessionError::Rejected(error_message(&body)),
            other => match other.status() {
                Some(401) => SessionError::InvalidCredentials,
                _ => SessionError::Unavailable(other.to_string()),
            },
        }
    }
}

/// Login failures name the account. The server answers 401 for inactive
/// accounts too, with the reason in the body.
fn login_error(err: SyncError, email: &str) -> SessionError {
    let inactive = match &err {
        SyncError::Server { status: 403, .. } => true,
        SyncError::Server { status: 401, body } => body.to_lowercase().contains("inactive"),
        _ => false,
    };
    if inactive {
        SessionError::AccountInactive(email.to_string())
    } else {
        err.into()
    }
}

/// The `error` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string())
}

impl From<SyncError> for StoreError {
    fn from(err: SyncError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<SyncError> for IngestionError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Server { status, body } if (400..500).contains(&status) => {
                IngestionError::Rejected { status, body }
            }
            other => IngestionError::Unavailable(other.to_string()),
        }
    }
}

impl From<SyncError> for AlertError {
    fn from(err: SyncError) -> Self {
        AlertError::Unavailable(err.to_string())
    }
}

impl From<SyncError> for DirectoryError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Server { status: 400, body } => DirectoryError::InvalidEntry(body),
            other => DirectoryError::Unavailable(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: Principal,
}

#[derive(Deserialize)]
struct SessionResponse {
    user: Principal,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(alias = "patent_id")]
    submission_id: SubmissionId,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: UserStatus,
}

#[derive(Deserialize)]
struct UpsertResponse {
    action: UpsertAction,
}

const LOG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize)]
struct LogQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
    limit: usize,
}

impl<'a> LogQuery<'a> {
    fn new(filter: &'a LogFilter) -> Self {
        Self {
            level: filter.level.map(|l| l.as_str()),
            service: filter.service.as_deref(),
            start_date: filter.start.map(|t| t.format(LOG_TIME_FORMAT).to_string()),
            end_date: filter.end.map(|t| t.format(LOG_TIME_FORMAT).to_string()),
            limit: filter.limit,
        }
    }
}

#[derive(Deserialize)]
struct LogEventResponse {
    log_id: String,
}

#[derive(Serialize)]
struct ClearLogsRequest {
    older_than: Option<String>,
}

#[derive(Deserialize)]
struct ClearLogsResponse {
    deleted_count: usize,
}

/// REST client for the Patentwise API. Cloning shares the session token.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Arc<Mutex<Option<String>>>,
}

impl HttpBackend {
    /// Create a client for the configured base URL.
    ///
    /// A trailing slash on `base_url` is ignored.
    pub fn new(config: &BackendConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: Arc::new(Mutex::new(None)),
        })
    }

    /// Bundle this client behind every interface.
    pub fn into_backend(self) -> Backend {
        Backend {
            sessions: Arc::new(self.clone()),
            content: Arc::new(self.clone()),
            ingestion: Arc::new(self.clone()),
            alerts: Arc::new(self.clone()),
            directory: Arc::new(self),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, url = %url, "api request");
        let builder = self.client.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and fail on any non-success status.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, SyncError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    /// Send, treating 404 as `None`.
    async fn send_optional(&self, builder: RequestBuilder) -> Result<Option<Response>, SyncError> {
        match self.send(builder).await {
            Ok(resp) => Ok(Some(resp)),
            Err(SyncError::Server { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SessionProvider for HttpBackend {
    async fn current_session(&self) -> Result<Option<Principal>, SessionError> {
        if self.token().is_none() {
            return Ok(None);
        }
        let resp = self
            .request(Method::GET, "/api/auth/session")
            .send()
            .await
            .map_err(SyncError::from)?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            self.set_token(None);
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SessionError::Unavailable(format!("{status}: {body}")));
        }
        let session: SessionResponse = resp.json().await.map_err(SyncError::from)?;
        Ok(Some(session.user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, SessionError> {
        let req = self
            .request(Method::POST, "/api/auth/login")
            .json(&LoginRequest { email, password });
        let resp = self.send(req).await.map_err(|e| login_error(e, email))?;
        let login: LoginResponse = resp.json().await.map_err(SyncError::from)?;
        self.set_token(Some(login.token));
        info!(user = %login.user.user_id, "signed in");
        Ok(login.user)
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Principal, SessionError> {
        let req = self
            .request(Method::POST, "/api/auth/register")
            .json(registration);
        let resp = self.send(req).await?;
        let login: LoginResponse = resp.json().await.map_err(SyncError::from)?;
        self.set_token(Some(login.token));
        info!(user = %login.user.user_id, role = %login.user.role, "registered");
        Ok(login.user)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        let result = self
            .send(self.request(Method::POST, "/api/auth/logout"))
            .await;
        self.set_token(None);
        result?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for HttpBackend {
    async fn store(&self, owner: &UserId, upload: DocumentUpload) -> Result<DocumentRef, StoreError> {
        info!(file = %upload.file_name, bytes = upload.bytes.len(), "uploading document");
        let file_name = upload.file_name.clone();
        let req = self
            .request(Method::POST, "/api/uploads")
            .query(&[("owner", owner.as_str()), ("file_name", file_name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, upload.content_type)
            .body(upload.bytes);
        let resp = self.send(req).await.map_err(|e| StoreError::Upload {
            file_name: file_name.clone(),
            reason: e.to_string(),
        })?;
        Ok(resp.json().await.map_err(SyncError::from)?)
    }
}

#[async_trait]
impl SubmissionIngestion for HttpBackend {
    async fn create(&self, submission: Submission) -> Result<SubmissionId, IngestionError> {
        info!(title = %submission.title, domain = %submission.domain, "submitting disclosure");
        let req = self
            .request(Method::POST, "/api/patents/submit")
            .json(&submission);
        let resp = self.send(req).await?;
        let created: SubmitResponse = resp.json().await.map_err(SyncError::from)?;
        info!(submission = %created.submission_id, "submission accepted");
        Ok(created.submission_id)
    }

    async fn get(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, IngestionError> {
        let req = self.request(Method::GET, &format!("/api/patents/{id}"));
        match self.send_optional(req).await? {
            Some(resp) => Ok(Some(resp.json().await.map_err(SyncError::from)?)),
            None => Ok(None),
        }
    }

    async fn get_analysis(&self, id: &SubmissionId) -> Result<AnalysisLookup, IngestionError> {
        let req = self.request(Method::GET, &format!("/api/analysis/{id}"));
        let Some(resp) = self.send_optional(req).await? else {
            return Ok(AnalysisLookup::NotFound);
        };
        if resp.status() == StatusCode::ACCEPTED {
            return Ok(AnalysisLookup::Pending);
        }
        let result: AnalysisResult = resp.json().await.map_err(SyncError::from)?;
        Ok(AnalysisLookup::Ready(result))
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<SubmissionRecord>, IngestionError> {
        let req = self.request(Method::GET, &format!("/api/patents/user/{owner}"));
        let resp = self.send(req).await?;
        Ok(resp.json().await.map_err(SyncError::from)?)
    }
}

#[async_trait]
impl AlertStore for HttpBackend {
    async fn list(&self, user: &UserId) -> Result<Vec<Alert>, AlertError> {
        let req = self.request(Method::GET, &format!("/api/alerts/user/{user}"));
        let resp = self.send(req).await?;
        Ok(resp.json().await.map_err(SyncError::from)?)
    }

    async fn mark_read(&self, id: &AlertId) -> Result<(), AlertError> {
        let req = self.request(Method::PUT, &format!("/api/alerts/{id}/read"));
        match self.send_optional(req).await? {
            Some(_) => Ok(()),
            None => Err(AlertError::NotFound(id.clone())),
        }
    }
}

#[async_trait]
impl AdminDirectory for HttpBackend {
    async fn list_users(&self) -> Result<Vec<UserAccount>, DirectoryError> {
        let resp = self
            .send(self.request(Method::GET, "/api/admin/users"))
            .await?;
        Ok(resp.json().await.map_err(SyncError::from)?)
    }

    async fn update_user_status(&self, id: &UserId, status: UserStatus) -> Result<(), DirectoryError> {
        let req = self
            .request(Method::PUT, &format!("/api/admin/users/{id}/status"))
            .json(&StatusUpdate { status });
        match self.send_optional(req).await? {
            Some(_) => Ok(()),
            None => Err(DirectoryError::UserNotFound(id.clone())),
        }
    }

    async fn list_domain_keywords(&self) -> Result<Vec<DomainKeywords>, DirectoryError> {
        let resp = self
            .send(self.request(Method::GET, "/api/admin/domain-keywords"))
            .await?;
        Ok(resp.json().await.map_err(SyncError::from)?)
    }

    async fn upsert_domain_keywords(
        &self,
        entry: DomainKeywords,
    ) -> Result<UpsertAction, DirectoryError> {
        let req = self
            .request(Method::POST, "/api/admin/domain-keywords")
            .json(&entry);
        let resp = self.send(req).await?;
        let result: UpsertResponse = resp.json().await.map_err(SyncError::from)?;
        Ok(result.action)
    }

    async fn delete_domain_keywords(&self, domain_id: &str) -> Result<(), DirectoryError> {
        let req = self.request(
            Method::DELETE,
            &format!("/api/admin/domain-keywords/{domain_id}"),
        );
        match self.send_optional(req).await? {
            Some(_) => Ok(()),
            None => Err(DirectoryError::DomainNotFound(domain_id.to_string())),
        }
    }

    async fn log_event(&self, entry: LogEntry) -> Result<String, DirectoryError> {
        let req = self
            .request(Method::POST, "/api/admin/system-logs")
            .json(&entry);
        let resp = self.send(req).await?;
        let created: LogEventResponse = resp.json().await.map_err(SyncError::from)?;
        Ok(created.log_id)
    }

    async fn system_logs(&self, filter: &LogFilter) -> Result<Vec<SystemLog>, DirectoryError> {
        let req = self
            .request(Method::GET, "/api/admin/system-logs")
            .query(&LogQuery::new(filter));
        let resp = self.send(req).await?;
        Ok(resp.json().await.map_err(SyncError::from)?)
    }

    async fn clear_system_logs(
        &self,
        older_than: Option<NaiveDateTime>,
    ) -> Result<usize, DirectoryError> {
        let body = ClearLogsRequest {
            older_than: older_than.map(|t| t.format(LOG_TIME_FORMAT).to_string()),
        };
        let req = self
            .request(Method::POST, "/api/admin/system-logs/clear")
            .json(&body);
        let resp = self.send(req).await?;
        let cleared: ClearLogsResponse = resp.json().await.map_err(SyncError::from)?;
        info!(deleted = cleared.deleted_count, "system logs cleared");
        Ok(cleared.deleted_count)
    }
}
