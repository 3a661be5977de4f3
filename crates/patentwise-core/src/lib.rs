pub mod alert;
pub mod analysis;
pub mod config;
pub mod domain;
pub mod identity;
pub mod keywords;
pub mod logs;
pub mod submission;

pub use alert::{Alert, AlertId, AlertKind};
pub use analysis::{AnalysisMetrics, AnalysisResult, Entity, InfringementRisk, PriorArtMatch};
pub use config::{BackendKind, ConfigError, PatentwiseConfig};
pub use domain::Domain;
pub use identity::{Principal, Registration, Role, SessionState, UserAccount, UserId, UserStatus};
pub use keywords::DomainKeywords;
pub use logs::{LogEntry, LogFilter, LogLevel, SystemLog};
pub use submission::{
    AnalysisStatus, DocumentRef, Submission, SubmissionContent, SubmissionId, SubmissionRecord,
};
