use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SyncError;

use super::ResultsSync;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncPayload<'a> {
    project_id: &'a str,
    failed_tests: Vec<String>,
    passed_tests: Vec<String>,
}

/// Posts results as JSON to the profile service.
pub struct HttpSync {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSync {
    pub fn new(endpoint: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
        }
    }
}

#[async_trait]
impl ResultsSync for HttpSync {
    async fn sync(
        &self,
        failed: Vec<String>,
        passed: Vec<String>,
        project_id: &str,
    ) -> Result<(), SyncError> {
        let payload = SyncPayload {
            project_id,
            failed_tests: failed,
            passed_tests: passed,
        };
        debug!(endpoint = %self.endpoint, ?payload, "syncing results");

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(project_id, "results synced");
        Ok(())
    }
}
