//! The in-progress disclosure and its per-step validators.

use chrono::{DateTime, Utc};
use patentwise_core::config::UploadConfig;
use patentwise_core::{DocumentRef, Domain, Submission, SubmissionContent, SubmissionId, UserId};
use patentwise_store::DocumentUpload;
use serde::Serialize;
use thiserror::Error;

use super::step::Step;

/// Pasted text longer than this is cut in the review recap.
pub const RECAP_TEXT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("description is required")]
    MissingDescription,
    #[error("attach a document or paste the disclosure text")]
    MissingContent,
    #[error("select a technology domain")]
    MissingDomain,
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("file is {size} bytes, the limit is {max}")]
    FileTooLarge { size: u64, max: u64 },
    #[error("file is empty")]
    EmptyFile,
}

/// Fields collected so far. Holds at most one of document and text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub inventors: String,
    document: Option<DocumentRef>,
    raw_text: String,
    pub domain: Option<Domain>,
}

/// Read-only summary shown on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recap {
    pub title: String,
    pub description: String,
    pub inventors: Option<String>,
    pub domain: Option<String>,
    pub document: Option<String>,
    pub text_preview: Option<String>,
}

impl Draft {
    pub fn document(&self) -> Option<&DocumentRef> {
        self.document.as_ref()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Attaching a document clears any pasted text.
    pub(crate) fn attach_document(&mut self, document: DocumentRef) {
        self.raw_text.clear();
        self.document = Some(document);
    }

    pub(crate) fn clear_document(&mut self) {
        self.document = None;
    }

    /// Non-empty text replaces an attached document. Blank text only clears
    /// the text.
    pub(crate) fn set_raw_text(&mut self, text: String) {
        if !text.trim().is_empty() {
            self.document = None;
        }
        self.raw_text = text;
    }

    /// The content variant, if exactly one is present.
    pub fn content(&self) -> Option<SubmissionContent> {
        match (&self.document, self.raw_text.trim().is_empty()) {
            (Some(doc), true) => Some(SubmissionContent::DocumentRef(doc.clone())),
            (None, false) => Some(SubmissionContent::RawText(self.raw_text.clone())),
            _ => None,
        }
    }

    /// Check the fields owned by `step`. Steps with no fields always pass.
    pub fn validate(&self, step: Step) -> Result<(), ValidationError> {
        match step {
            Step::CollectingInfo => {
                if self.title.trim().is_empty() {
                    return Err(ValidationError::MissingTitle);
                }
                if self.description.trim().is_empty() {
                    return Err(ValidationError::MissingDescription);
                }
                Ok(())
            }
            Step::CollectingDocument => match self.content() {
                Some(_) => Ok(()),
                None => Err(ValidationError::MissingContent),
            },
            Step::SelectingDomain => match self.domain {
                Some(_) => Ok(()),
                None => Err(ValidationError::MissingDomain),
            },
            Step::Review | Step::Submitting | Step::Complete => Ok(()),
        }
    }

    /// Re-run every input validator and build the immutable submission.
    pub fn finalize(&self, owner: &UserId, now: DateTime<Utc>) -> Result<Submission, ValidationError> {
        for step in [Step::CollectingInfo, Step::CollectingDocument, Step::SelectingDomain] {
            self.validate(step)?;
        }
        let content = self.content().ok_or(ValidationError::MissingContent)?;
        let domain = self.domain.ok_or(ValidationError::MissingDomain)?;
        let inventors = self.inventors.trim();
        Ok(Submission {
            id: SubmissionId::generate(),
            owner: owner.clone(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            inventors: (!inventors.is_empty()).then(|| inventors.to_string()),
            domain,
            content,
            submitted_at: now,
        })
    }

    pub fn recap(&self) -> Recap {
        let inventors = self.inventors.trim();
        let text = self.raw_text.trim();
        Recap {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            inventors: (!inventors.is_empty()).then(|| inventors.to_string()),
            domain: self.domain.map(|d| d.label().to_string()),
            document: self.document.as_ref().map(|d| d.file_name.clone()),
            text_preview: (!text.is_empty()).then(|| preview(text)),
        }
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(RECAP_TEXT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Reject files the content store should never see.
pub fn validate_upload(upload: &DocumentUpload, limits: &UploadConfig) -> Result<(), ValidationError> {
    if !limits.allows(&upload.file_name) {
        return Err(ValidationError::UnsupportedFileType(upload.file_name.clone()));
    }
    if upload.bytes.is_empty() {
        return Err(ValidationError::EmptyFile);
    }
    if upload.size_bytes() > limits.max_bytes {
        return Err(ValidationError::FileTooLarge {
            size: upload.size_bytes(),
            max: limits.max_bytes,
        });
    }
    Ok(())
}
