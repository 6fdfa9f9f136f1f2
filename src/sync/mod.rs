pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SyncConfig;
use crate::error::SyncError;

pub use http::HttpSync;

/// Pushes the outcome of a run to the remote profile service.
#[async_trait]
pub trait ResultsSync: Send + Sync {
    async fn sync(
        &self,
        failed: Vec<String>,
        passed: Vec<String>,
        project_id: &str,
    ) -> Result<(), SyncError>;
}

/// Stand-in used when no endpoint is configured.
pub struct OfflineSync;

#[async_trait]
impl ResultsSync for OfflineSync {
    async fn sync(
        &self,
        _failed: Vec<String>,
        _passed: Vec<String>,
        _project_id: &str,
    ) -> Result<(), SyncError> {
        Err(SyncError::NotConfigured)
    }
}

/// Build the sync client described by the config.
pub fn from_config(config: &SyncConfig) -> Arc<dyn ResultsSync> {
    match &config.endpoint {
        Some(endpoint) => Arc::new(HttpSync::new(endpoint.clone(), config.token.clone())),
        None => Arc::new(OfflineSync),
    }
}
