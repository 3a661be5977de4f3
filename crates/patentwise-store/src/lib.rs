//! External interface contracts and the in-memory fixture backend.

mod error;
mod fixture;
mod interfaces;

pub use error::{AlertError, DirectoryError, IngestionError, SessionError, StoreError};
pub use fixture::{FIXTURE_PASSWORD, FixtureBackend};
pub use interfaces::{
    AdminDirectory, AlertStore, AnalysisLookup, Backend, ContentStore, DocumentUpload,
    SessionProvider, SubmissionIngestion, UpsertAction,
};
