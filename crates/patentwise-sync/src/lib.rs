//! Network transport: a REST client implementing the external interfaces.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpBackend, SyncError};
