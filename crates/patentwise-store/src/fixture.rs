//! In-memory backend seeded with demo data.
//!
//! Implements every interface in [`crate::interfaces`] over a single mutex so
//! the app can run without a network. Tests use the failure and latency knobs
//! to drive the error paths.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use patentwise_core::keywords::default_domain_keywords;
use patentwise_core::{
    Alert, AlertId, AlertKind, AnalysisMetrics, AnalysisResult, AnalysisStatus, DocumentRef,
    Domain, DomainKeywords, Entity, InfringementRisk, LogEntry, LogFilter, LogLevel, PriorArtMatch,
    Principal, Registration, Role, Submission, SubmissionContent, SubmissionId, SubmissionRecord,
    SystemLog, UserAccount, UserId, UserStatus,
};

use crate::error::{AlertError, DirectoryError, IngestionError, SessionError, StoreError};
use crate::interfaces::{
    AdminDirectory, AlertStore, AnalysisLookup, Backend, ContentStore, DocumentUpload,
    SessionProvider, SubmissionIngestion, UpsertAction,
};

/// Password accepted for every seeded account.
pub const FIXTURE_PASSWORD: &str = "patentwise";

#[derive(Default)]
struct FixtureState {
    session: Option<Principal>,
    passwords: BTreeMap<String, String>,
    users: Vec<UserAccount>,
    submissions: Vec<SubmissionRecord>,
    analyses: BTreeMap<SubmissionId, AnalysisResult>,
    alerts: BTreeMap<UserId, Vec<Alert>>,
    keywords: Vec<DomainKeywords>,
    documents: BTreeMap<String, Vec<u8>>,
    logs: Vec<SystemLog>,
    next_log_id: u64,

    create_calls: usize,
    create_delay: Option<Duration>,
    create_failures: VecDeque<IngestionError>,
    session_failure: Option<SessionError>,
    upload_failure: Option<StoreError>,
}

/// Shared in-memory backend. Cloning shares state.
#[derive(Clone, Default)]
pub struct FixtureBackend {
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureBackend {
    /// An empty backend: no users, no submissions, no session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A backend seeded with demo users, submissions, alerts and keywords.
    pub fn seeded() -> Self {
        let backend = Self::empty();
        {
            let mut state = backend.state();
            for user in seed_users() {
                state
                    .passwords
                    .insert(user.email.clone(), FIXTURE_PASSWORD.to_string());
                state.users.push(user);
            }
            let owner = UserId::from("2");
            state.submissions = seed_submissions(&owner);
            state
                .analyses
                .insert(SubmissionId::from("1"), seed_high_risk_analysis());
            state
                .analyses
                .insert(SubmissionId::from("2"), seed_low_risk_analysis());
            state.alerts.insert(owner, seed_alerts());
            state.keywords = default_domain_keywords();
            state.logs = seed_logs();
            state.next_log_id = state.logs.len() as u64;
        }
        backend
    }

    /// Bundle this backend behind every interface.
    pub fn into_backend(self) -> Backend {
        Backend {
            sessions: Arc::new(self.clone()),
            content: Arc::new(self.clone()),
            ingestion: Arc::new(self.clone()),
            alerts: Arc::new(self.clone()),
            directory: Arc::new(self),
        }
    }

    fn state(&self) -> MutexGuard<'_, FixtureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an analysis result and mark its submission analyzed.
    pub fn complete_analysis(&self, result: AnalysisResult) {
        let mut state = self.state();
        if let Some(record) = state
            .submissions
            .iter_mut()
            .find(|r| r.submission.id == result.submission_id)
        {
            record.status = AnalysisStatus::Analyzed;
        }
        state.analyses.insert(result.submission_id.clone(), result);
    }

    /// Number of `create` calls that reached the backend.
    pub fn create_calls(&self) -> usize {
        self.state().create_calls
    }

    /// Hold every `create` call open for `delay` before answering.
    pub fn set_create_delay(&self, delay: Duration) {
        self.state().create_delay = Some(delay);
    }

    /// Fail the next `create` call with `error`.
    pub fn fail_next_create(&self, error: IngestionError) {
        self.state().create_failures.push_back(error);
    }

    /// Fail every session lookup with `error` until cleared.
    pub fn set_session_failure(&self, error: Option<SessionError>) {
        self.state().session_failure = error;
    }

    pub fn set_upload_failure(&self, error: Option<StoreError>) {
        self.state().upload_failure = error;
    }

    pub fn stored_document(&self, key: &str) -> Option<Vec<u8>> {
        self.state().documents.get(key).cloned()
    }
}

#[async_trait]
impl SessionProvider for FixtureBackend {
    async fn current_session(&self) -> Result<Option<Principal>, SessionError> {
        let state = self.state();
        if let Some(err) = &state.session_failure {
            return Err(err.clone());
        }
        Ok(state.session.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, SessionError> {
        let mut state = self.state();
        let email = email.trim().to_lowercase();
        if state.passwords.get(&email).map(String::as_str) != Some(password) {
            return Err(SessionError::InvalidCredentials);
        }
        let account = state
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(SessionError::InvalidCredentials)?;
        if account.status == UserStatus::Inactive {
            return Err(SessionError::AccountInactive(email));
        }
        account.last_login = Some(Utc::now());
        let principal = account.principal();
        state.session = Some(principal.clone());
        tracing::debug!(user = %principal.user_id, role = %principal.role, "fixture sign-in");
        Ok(principal)
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Principal, SessionError> {
        let email = registration.email.trim().to_lowercase();
        let name = registration.name.trim();
        if email.is_empty() || registration.password.is_empty() || name.is_empty() {
            return Err(SessionError::Rejected(
                "email, password and name are required".into(),
            ));
        }
        let mut state = self.state();
        if state.passwords.contains_key(&email) {
            return Err(SessionError::Rejected(format!("{email} is already registered")));
        }
        let account = UserAccount {
            id: UserId(format!("{}", state.users.len() + 1)),
            email: email.clone(),
            name: name.to_string(),
            role: registration.role,
            status: UserStatus::Active,
            last_login: Some(Utc::now()),
        };
        let principal = account.principal();
        state.passwords.insert(email, registration.password.clone());
        state.users.push(account);
        state.session = Some(principal.clone());
        tracing::debug!(user = %principal.user_id, role = %principal.role, "fixture sign-up");
        Ok(principal)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        self.state().session = None;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FixtureBackend {
    async fn store(&self, owner: &UserId, upload: DocumentUpload) -> Result<DocumentRef, StoreError> {
        let mut state = self.state();
        if let Some(err) = &state.upload_failure {
            return Err(err.clone());
        }
        let key = format!(
            "patents/{owner}/{}-{}",
            Utc::now().timestamp_millis(),
            upload.file_name
        );
        let reference = DocumentRef {
            key: key.clone(),
            file_name: upload.file_name,
            size_bytes: upload.bytes.len() as u64,
        };
        state.documents.insert(key, upload.bytes);
        Ok(reference)
    }
}

#[async_trait]
impl SubmissionIngestion for FixtureBackend {
    async fn create(&self, submission: Submission) -> Result<SubmissionId, IngestionError> {
        let delay = {
            let mut state = self.state();
            state.create_calls += 1;
            state.create_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if let Some(err) = state.create_failures.pop_front() {
            return Err(err);
        }
        let id = submission.id.clone();
        state.submissions.push(SubmissionRecord {
            submission,
            status: AnalysisStatus::Submitted,
        });
        Ok(id)
    }

    async fn get(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, IngestionError> {
        Ok(self
            .state()
            .submissions
            .iter()
            .find(|r| &r.submission.id == id)
            .cloned())
    }

    async fn get_analysis(&self, id: &SubmissionId) -> Result<AnalysisLookup, IngestionError> {
        let state = self.state();
        if let Some(result) = state.analyses.get(id) {
            return Ok(AnalysisLookup::Ready(result.clone()));
        }
        let lookup = match state.submissions.iter().find(|r| &r.submission.id == id) {
            Some(record) if record.status != AnalysisStatus::AnalysisFailed => {
                AnalysisLookup::Pending
            }
            _ => AnalysisLookup::NotFound,
        };
        Ok(lookup)
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<SubmissionRecord>, IngestionError> {
        Ok(self
            .state()
            .submissions
            .iter()
            .filter(|r| &r.submission.owner == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AlertStore for FixtureBackend {
    async fn list(&self, user: &UserId) -> Result<Vec<Alert>, AlertError> {
        Ok(self.state().alerts.get(user).cloned().unwrap_or_default())
    }

    async fn mark_read(&self, id: &AlertId) -> Result<(), AlertError> {
        let mut state = self.state();
        let alert = state
            .alerts
            .values_mut()
            .flat_map(|alerts| alerts.iter_mut())
            .find(|a| &a.id == id)
            .ok_or_else(|| AlertError::NotFound(id.clone()))?;
        alert.read = true;
        Ok(())
    }
}

#[async_trait]
impl AdminDirectory for FixtureBackend {
    async fn list_users(&self) -> Result<Vec<UserAccount>, DirectoryError> {
        Ok(self.state().users.clone())
    }

    async fn update_user_status(&self, id: &UserId, status: UserStatus) -> Result<(), DirectoryError> {
        let mut state = self.state();
        let user = state
            .users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| DirectoryError::UserNotFound(id.clone()))?;
        user.status = status;
        Ok(())
    }

    async fn list_domain_keywords(&self) -> Result<Vec<DomainKeywords>, DirectoryError> {
        Ok(self.state().keywords.clone())
    }

    async fn upsert_domain_keywords(
        &self,
        entry: DomainKeywords,
    ) -> Result<UpsertAction, DirectoryError> {
        let entry = entry.normalized();
        if entry.domain_id.trim().is_empty() || entry.domain.is_empty() {
            return Err(DirectoryError::InvalidEntry(
                "domain id and name are required".into(),
            ));
        }
        let mut state = self.state();
        match state
            .keywords
            .iter()
            .position(|k| k.domain_id == entry.domain_id)
        {
            Some(idx) => {
                state.keywords[idx] = entry;
                Ok(UpsertAction::Updated)
            }
            None => {
                state.keywords.push(entry);
                Ok(UpsertAction::Created)
            }
        }
    }

    async fn delete_domain_keywords(&self, domain_id: &str) -> Result<(), DirectoryError> {
        let mut state = self.state();
        let before = state.keywords.len();
        state.keywords.retain(|k| k.domain_id != domain_id);
        if state.keywords.len() == before {
            return Err(DirectoryError::DomainNotFound(domain_id.to_string()));
        }
        Ok(())
    }

    async fn log_event(&self, entry: LogEntry) -> Result<String, DirectoryError> {
        if let Some(field) = entry.missing_field() {
            return Err(DirectoryError::InvalidEntry(format!("{field} is required")));
        }
        let mut state = self.state();
        state.next_log_id += 1;
        let id = state.next_log_id.to_string();
        let log = entry.into_log(id.clone(), Local::now().naive_local());
        state.logs.push(log);
        Ok(id)
    }

    async fn system_logs(&self, filter: &LogFilter) -> Result<Vec<SystemLog>, DirectoryError> {
        Ok(filter.apply(&self.state().logs))
    }

    async fn clear_system_logs(
        &self,
        older_than: Option<NaiveDateTime>,
    ) -> Result<usize, DirectoryError> {
        let mut state = self.state();
        let before = state.logs.len();
        match older_than {
            Some(cutoff) => state.logs.retain(|l| l.timestamp >= cutoff),
            None => state.logs.clear(),
        }
        Ok(before - state.logs.len())
    }
}

fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().unwrap_or_default()
}

fn seed_users() -> Vec<UserAccount> {
    let user = |id: &str, email: &str, name: &str, role, status, last_login: &str| UserAccount {
        id: UserId::from(id),
        email: email.to_string(),
        name: name.to_string(),
        role,
        status,
        last_login: Some(at(last_login)),
    };
    vec![
        user("1", "admin@example.com", "Admin User", Role::Admin, UserStatus::Active, "2023-04-15T10:30:45Z"),
        user("2", "inventor1@example.com", "John Inventor", Role::Inventor, UserStatus::Active, "2023-04-14T15:22:10Z"),
        user("3", "analyst1@example.com", "Jane Analyst", Role::Analyst, UserStatus::Active, "2023-04-13T09:15:33Z"),
        user("4", "inventor2@example.com", "Bob Smith", Role::Inventor, UserStatus::Inactive, "2023-03-25T11:45:20Z"),
    ]
}

fn seed_submissions(owner: &UserId) -> Vec<SubmissionRecord> {
    let record = |id: &str, title: &str, description: &str, domain, date: &str, status| {
        SubmissionRecord {
            submission: Submission {
                id: SubmissionId::from(id),
                owner: owner.clone(),
                title: title.to_string(),
                description: description.to_string(),
                inventors: None,
                domain,
                content: SubmissionContent::RawText(description.to_string()),
                submitted_at: at(date),
            },
            status,
        }
    };
    let mut nlp = record(
        "1",
        "Method for Natural Language Processing",
        "A method for processing natural language using machine learning techniques to extract meaning and context from text data.",
        Domain::Ai,
        "2023-04-15T00:00:00Z",
        AnalysisStatus::Analyzed,
    );
    nlp.submission.inventors = Some("John Doe, Jane Smith".into());
    vec![
        nlp,
        record(
            "2",
            "System for Automated Patent Analysis",
            "A system that compares disclosures against granted patents to flag overlapping claims.",
            Domain::Software,
            "2023-04-10T00:00:00Z",
            AnalysisStatus::Analyzed,
        ),
        record(
            "3",
            "Device for Wireless Communication",
            "A transceiver that adapts its modulation to channel conditions.",
            Domain::Electronics,
            "2023-04-05T00:00:00Z",
            AnalysisStatus::Processing,
        ),
    ]
}

fn seed_alerts() -> Vec<Alert> {
    let alert = |id: &str, kind, message: &str, submission: &str, read, date: &str| Alert {
        id: AlertId::from(id),
        kind,
        message: message.to_string(),
        related_submission_id: SubmissionId::from(submission),
        read,
        created_at: at(date),
    };
    vec![
        alert(
            "1",
            AlertKind::Infringement,
            "Potential infringement detected for \"Method for Natural Language Processing\"",
            "1",
            false,
            "2023-04-16T00:00:00Z",
        ),
        alert(
            "2",
            AlertKind::NewMatch,
            "New matching patent filed in AI domain",
            "1",
            true,
            "2023-04-14T00:00:00Z",
        ),
        alert(
            "3",
            AlertKind::CriticalChange,
            "Critical change in monitored Electronics category",
            "3",
            false,
            "2023-04-12T00:00:00Z",
        ),
    ]
}

fn seed_logs() -> Vec<SystemLog> {
    let log = |id: &str, ts: &str, level, message: &str, service: &str| {
        LogEntry::new(level, service, message)
            .into_log(id.to_string(), ts.parse().unwrap_or_default())
    };
    vec![
        log("1", "2023-04-15T10:30:45", LogLevel::Info, "User admin@example.com logged in", "auth"),
        log("2", "2023-04-15T10:35:22", LogLevel::Info, "Patent analysis started for submission ID: 12345", "analysis"),
        log("3", "2023-04-15T10:38:15", LogLevel::Warning, "High CPU usage detected (85%)", "monitoring"),
        log("4", "2023-04-15T10:40:33", LogLevel::Error, "Failed to connect to DynamoDB", "database"),
        log("5", "2023-04-15T10:42:10", LogLevel::Info, "DynamoDB connection restored", "database"),
        log("6", "2023-04-15T10:45:55", LogLevel::Info, "Patent analysis completed for submission ID: 12345", "analysis"),
    ]
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn seed_high_risk_analysis() -> AnalysisResult {
    let entity = |text: &str, entity_type: &str, confidence_score| Entity {
        text: text.to_string(),
        entity_type: entity_type.to_string(),
        confidence_score,
    };
    let prior_art = |patent_id: &str, title: &str, similarity_score, claims: &[u32], overlap: &[&str]| {
        PriorArtMatch {
            patent_id: patent_id.to_string(),
            title: Some(title.to_string()),
            similarity_score,
            matched_claims: claims.iter().copied().collect(),
            key_overlap: strings(overlap),
        }
    };
    AnalysisResult {
        submission_id: SubmissionId::from("1"),
        key_phrases: strings(&[
            "natural language processing",
            "machine learning",
            "text extraction",
            "semantic analysis",
            "context recognition",
            "neural networks",
            "language model",
        ]),
        entities: vec![
            entity("natural language processing", "TECHNICAL_TERM", 0.95),
            entity("machine learning", "TECHNICAL_TERM", 0.92),
            entity("neural networks", "TECHNICAL_TERM", 0.88),
            entity("text data", "DATA_TYPE", 0.85),
        ],
        prior_art_matches: vec![
            prior_art(
                "US10839159B2",
                "System and Method for Natural Language Understanding",
                0.85,
                &[1, 5, 8],
                &["natural language processing", "semantic analysis", "neural networks"],
            ),
            prior_art(
                "US9852136B1",
                "Method for Contextual Language Processing",
                0.72,
                &[3, 4],
                &["context recognition", "language model"],
            ),
            prior_art(
                "US10346488B2",
                "Neural Network-Based Text Analysis System",
                0.68,
                &[2],
                &["neural networks", "text extraction"],
            ),
        ],
        infringement_risks: vec![
            InfringementRisk {
                patent_id: "US10839159B2".into(),
                title: Some("System and Method for Natural Language Understanding".into()),
                owner: "Tech Innovations Inc.".into(),
                risk_score: 0.85,
                conflicting_elements: strings(&[
                    "Use of bidirectional neural networks for context analysis",
                    "Semantic extraction methodology",
                    "Training process for language models",
                ]),
            },
            InfringementRisk {
                patent_id: "US9852136B1".into(),
                title: Some("Method for Contextual Language Processing".into()),
                owner: "AI Research Group LLC".into(),
                risk_score: 0.65,
                conflicting_elements: strings(&["Context recognition algorithm"]),
            },
        ],
        ipc_codes: strings(&["G06F 40/30", "G06N 3/08"]),
        metrics: AnalysisMetrics {
            overall_risk_score: 0.78,
            novelty_score: 0.45,
            technical_overlap_score: 0.82,
            domain_distribution: BTreeMap::from([
                ("AI".to_string(), 65.0),
                ("Software".to_string(), 25.0),
                ("Telecommunications".to_string(), 10.0),
            ]),
        },
    }
}

fn seed_low_risk_analysis() -> AnalysisResult {
    AnalysisResult {
        submission_id: SubmissionId::from("2"),
        key_phrases: strings(&["patent analysis", "claim comparison"]),
        entities: Vec::new(),
        prior_art_matches: vec![PriorArtMatch {
            patent_id: "US11087296B1".into(),
            title: Some("Automated Claim Charting".into()),
            similarity_score: 0.31,
            matched_claims: [2].into_iter().collect(),
            key_overlap: strings(&["claim comparison"]),
        }],
        infringement_risks: Vec::new(),
        ipc_codes: strings(&["G06Q 50/18"]),
        metrics: AnalysisMetrics {
            overall_risk_score: 0.22,
            novelty_score: 0.81,
            technical_overlap_score: 0.18,
            domain_distribution: BTreeMap::from([
                ("Software".to_string(), 80.0),
                ("AI".to_string(), 20.0),
            ]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(owner: &str) -> Submission {
        Submission {
            id: SubmissionId::generate(),
            owner: UserId::from(owner),
            title: "Widget".into(),
            description: "A widget".into(),
            inventors: None,
            domain: Domain::Mechanical,
            content: SubmissionContent::RawText("claims".into()),
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sign_in_checks_password_and_status() {
        let backend = FixtureBackend::seeded();
        assert_eq!(backend.current_session().await.unwrap(), None);

        let err = backend
            .sign_in("admin@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::InvalidCredentials);

        let err = backend
            .sign_in("inventor2@example.com", FIXTURE_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::AccountInactive(_)));

        let principal = backend
            .sign_in("Admin@Example.com", FIXTURE_PASSWORD)
            .await
            .unwrap();
        assert_eq!(principal.role, Role::Admin);
        assert_eq!(backend.current_session().await.unwrap(), Some(principal));

        backend.sign_out().await.unwrap();
        assert_eq!(backend.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_failure_is_reported() {
        let backend = FixtureBackend::seeded();
        backend.set_session_failure(Some(SessionError::Unavailable("down".into())));
        assert!(backend.current_session().await.is_err());
    }

    #[tokio::test]
    async fn create_then_lookup_is_pending() {
        let backend = FixtureBackend::empty();
        let id = backend.create(draft("7")).await.unwrap();
        assert_eq!(backend.create_calls(), 1);

        let record = backend.get(&id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Submitted);
        assert_eq!(backend.get_analysis(&id).await.unwrap(), AnalysisLookup::Pending);
        assert_eq!(
            backend.get_analysis(&SubmissionId::from("nope")).await.unwrap(),
            AnalysisLookup::NotFound
        );
        assert_eq!(backend.list_for_owner(&UserId::from("7")).await.unwrap().len(), 1);
        assert!(backend.list_for_owner(&UserId::from("8")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queued_create_failure_fires_once() {
        let backend = FixtureBackend::empty();
        backend.fail_next_create(IngestionError::Unavailable("503".into()));
        assert!(backend.create(draft("1")).await.is_err());
        assert!(backend.create(draft("1")).await.is_ok());
        assert_eq!(backend.create_calls(), 2);
    }

    #[tokio::test]
    async fn completing_analysis_makes_it_ready() {
        let backend = FixtureBackend::empty();
        let id = backend.create(draft("1")).await.unwrap();
        let mut result = seed_low_risk_analysis();
        result.submission_id = id.clone();
        backend.complete_analysis(result);

        assert!(matches!(
            backend.get_analysis(&id).await.unwrap(),
            AnalysisLookup::Ready(_)
        ));
        let record = backend.get(&id).await.unwrap().unwrap();
        assert_eq!(record.status, AnalysisStatus::Analyzed);
    }

    #[tokio::test]
    async fn stores_documents_under_owner_prefix() {
        let backend = FixtureBackend::empty();
        let reference = backend
            .store(&UserId::from("2"), DocumentUpload::new("claims.pdf", vec![1, 2, 3]))
            .await
            .unwrap();
        assert!(reference.key.starts_with("patents/2/"));
        assert!(reference.key.ends_with("-claims.pdf"));
        assert_eq!(reference.size_bytes, 3);
        assert_eq!(backend.stored_document(&reference.key), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn mark_read_flips_flag() {
        let backend = FixtureBackend::seeded();
        let user = UserId::from("2");
        backend.mark_read(&AlertId::from("1")).await.unwrap();
        let alerts = backend.list(&user).await.unwrap();
        assert!(alerts.iter().find(|a| a.id.as_str() == "1").unwrap().read);

        let err = backend.mark_read(&AlertId::from("99")).await.unwrap_err();
        assert_eq!(err, AlertError::NotFound(AlertId::from("99")));
    }

    #[tokio::test]
    async fn keyword_upsert_and_delete() {
        let backend = FixtureBackend::seeded();
        let action = backend
            .upsert_domain_keywords(DomainKeywords::new("ai", "AI", ["transformer"]))
            .await
            .unwrap();
        assert_eq!(action, UpsertAction::Updated);

        let action = backend
            .upsert_domain_keywords(DomainKeywords::new("mech", "Mechanical", ["gear", "Gear"]))
            .await
            .unwrap();
        assert_eq!(action, UpsertAction::Created);

        let all = backend.list_domain_keywords().await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all.last().unwrap().keywords, vec!["gear"]);

        backend.delete_domain_keywords("mech").await.unwrap();
        assert!(matches!(
            backend.delete_domain_keywords("mech").await,
            Err(DirectoryError::DomainNotFound(_))
        ));
        assert!(matches!(
            backend
                .upsert_domain_keywords(DomainKeywords::new("", "x", ["y"]))
                .await,
            Err(DirectoryError::InvalidEntry(_))
        ));
    }

    #[tokio::test]
    async fn update_user_status() {
        let backend = FixtureBackend::seeded();
        backend
            .update_user_status(&UserId::from("4"), UserStatus::Active)
            .await
            .unwrap();
        backend
            .sign_in("inventor2@example.com", FIXTURE_PASSWORD)
            .await
            .unwrap();
        assert!(matches!(
            backend.update_user_status(&UserId::from("99"), UserStatus::Active).await,
            Err(DirectoryError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn sign_up_creates_active_account_and_session() {
        let backend = FixtureBackend::seeded();
        let registration = Registration {
            email: "New@Example.com".into(),
            password: "s3cret".into(),
            name: "New Inventor".into(),
            role: Role::Inventor,
        };
        let principal = backend.sign_up(&registration).await.unwrap();
        assert_eq!(principal.email, "new@example.com");
        assert_eq!(principal.user_id.as_str(), "5");
        assert_eq!(backend.current_session().await.unwrap(), Some(principal));

        backend.sign_out().await.unwrap();
        backend.sign_in("new@example.com", "s3cret").await.unwrap();

        let err = backend.sign_up(&registration).await.unwrap_err();
        assert!(matches!(err, SessionError::Rejected(_)));

        let blank = Registration {
            name: " ".into(),
            email: "other@example.com".into(),
            ..registration
        };
        assert!(matches!(
            backend.sign_up(&blank).await,
            Err(SessionError::Rejected(_))
        ));
        assert_eq!(backend.list_users().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn system_logs_filter_record_and_clear() {
        let backend = FixtureBackend::seeded();
        let database = LogFilter {
            service: Some("database".into()),
            ..LogFilter::default()
        };
        let logs = backend.system_logs(&database).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "DynamoDB connection restored");

        let id = backend
            .log_event(LogEntry::new(LogLevel::Error, "auth", "token store offline"))
            .await
            .unwrap();
        assert_eq!(id, "7");
        let newest = &backend.system_logs(&LogFilter::default()).await.unwrap()[0];
        assert_eq!(newest.id, "7");
        assert!(matches!(
            backend.log_event(LogEntry::new(LogLevel::Info, "auth", "")).await,
            Err(DirectoryError::InvalidEntry(_))
        ));

        let cutoff = "2023-04-15T10:40:00".parse().unwrap();
        assert_eq!(backend.clear_system_logs(Some(cutoff)).await.unwrap(), 3);
        assert_eq!(backend.clear_system_logs(None).await.unwrap(), 4);
        assert!(backend.system_logs(&LogFilter::default()).await.unwrap().is_empty());
    }

    #[test]
    fn seeded_analysis_matches_submission() {
        let result = seed_high_risk_analysis();
        assert_eq!(result.submission_id.as_str(), "1");
        let total: f64 = result.metrics.domain_distribution.values().sum();
        assert_eq!(total, 100.0);
    }
}
