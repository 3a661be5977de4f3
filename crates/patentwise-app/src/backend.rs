//! Backend selection from configuration.

use patentwise_core::BackendKind;
use patentwise_core::config::BackendConfig;
use patentwise_store::{Backend, FixtureBackend};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend.kind = \"http\" needs the `http` feature")]
    HttpDisabled,
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] patentwise_sync::SyncError),
}

/// Build the configured backend: seeded fixtures or the REST API.
pub fn backend_from_config(config: &BackendConfig) -> Result<Backend, BackendError> {
    match config.kind {
        BackendKind::Fixture => {
            info!("using in-memory fixture backend");
            Ok(FixtureBackend::seeded().into_backend())
        }
        BackendKind::Http => connect_http(config),
    }
}

#[cfg(feature = "http")]
fn connect_http(config: &BackendConfig) -> Result<Backend, BackendError> {
    info!(base_url = %config.base_url, timeout_secs = config.request_timeout_secs, "using HTTP backend");
    Ok(patentwise_sync::HttpBackend::new(config)?.into_backend())
}

#[cfg(not(feature = "http"))]
fn connect_http(_config: &BackendConfig) -> Result<Backend, BackendError> {
    Err(BackendError::HttpDisabled)
}
