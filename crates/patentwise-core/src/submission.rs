//! Finalized invention disclosures and their stored records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::identity::UserId;

/// Opaque identifier assigned to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmissionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Reference to a document held by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Store key, e.g. `patents/{user}/{millis}-{file_name}`.
    pub key: String,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Disclosure body: an uploaded document or pasted text, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionContent {
    DocumentRef(DocumentRef),
    RawText(String),
}

impl SubmissionContent {
    pub fn document_ref(&self) -> Option<&DocumentRef> {
        match self {
            Self::DocumentRef(doc) => Some(doc),
            Self::RawText(_) => None,
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::DocumentRef(_) => None,
            Self::RawText(text) => Some(text),
        }
    }
}

/// An invention disclosure handed to the ingestion API.
///
/// Produced only by the submission workflow's finalize step and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub inventors: Option<String>,
    pub domain: Domain,
    pub content: SubmissionContent,
    pub submitted_at: DateTime<Utc>,
}

/// Progress of the external analysis for a stored submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Submitted,
    Processing,
    Analyzed,
    AnalysisFailed,
}

impl AnalysisStatus {
    /// Whether the analysis has not yet reached a terminal status.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Submitted | Self::Processing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Processing => "processing",
            Self::Analyzed => "analyzed",
            Self::AnalysisFailed => "analysis_failed",
        }
    }
}

/// A submission as held by the ingestion API, with its analysis status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission: Submission,
    pub status: AnalysisStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(content: SubmissionContent) -> Submission {
        Submission {
            id: SubmissionId::from("sub-1"),
            owner: UserId::from("user-1"),
            title: "Method X".into(),
            description: "desc".into(),
            inventors: None,
            domain: Domain::Ai,
            content,
            submitted_at: "2026-03-01T09:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn content_accessors_are_exclusive() {
        let text = SubmissionContent::RawText("claims".into());
        assert_eq!(text.raw_text(), Some("claims"));
        assert!(text.document_ref().is_none());

        let doc = SubmissionContent::DocumentRef(DocumentRef {
            key: "patents/u/1-a.pdf".into(),
            file_name: "a.pdf".into(),
            size_bytes: 10,
        });
        assert!(doc.raw_text().is_none());
        assert_eq!(doc.document_ref().unwrap().file_name, "a.pdf");
    }

    #[test]
    fn submission_json_carries_single_content_key() {
        let json = serde_json::to_value(sample(SubmissionContent::RawText("t".into()))).unwrap();
        let content = json["content"].as_object().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content["raw_text"], "t");
        assert_eq!(json["domain"], "ai");
    }

    #[test]
    fn pending_statuses() {
        assert!(AnalysisStatus::Submitted.is_pending());
        assert!(AnalysisStatus::Processing.is_pending());
        assert!(!AnalysisStatus::Analyzed.is_pending());
        assert!(!AnalysisStatus::AnalysisFailed.is_pending());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(SubmissionId::generate(), SubmissionId::generate());
    }
}
