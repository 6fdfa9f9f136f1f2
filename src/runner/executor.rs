use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Level, debug, info};

use crate::app::{AppEvent, RunProgress};
use crate::config::PathsConfig;
use crate::error::PipelineError;
use crate::locator;
use crate::models::{ParseResult, Project};
use crate::report;

use super::Harness;

/// Locates a project, runs its harness, and parses the resulting report.
pub struct TestExecutor {
    harness: Arc<dyn Harness>,
    paths: PathsConfig,
}

impl TestExecutor {
    pub fn new(harness: Arc<dyn Harness>, paths: PathsConfig) -> Self {
        Self { harness, paths }
    }

    /// One complete run. Blocks until the harness exits; there is no timeout.
    pub async fn execute(
        &self,
        project: &Project,
        tx: &mpsc::UnboundedSender<AppEvent>,
    ) -> Result<ParseResult, PipelineError> {
        let dir = locator::locate(&self.paths.exercises_root, project)?;
        info!(project = %project.name, dir = %dir.display(), "running harness");
        let _ = tx.send(AppEvent::Progress(RunProgress::Located { dir: dir.clone() }));

        let _ = tx.send(AppEvent::Progress(RunProgress::HarnessStarted {
            harness: self.harness.name().to_string(),
        }));
        let status = self.harness.run(&dir, tx).await?;
        let _ = tx.send(AppEvent::Progress(RunProgress::HarnessCompleted {
            code: status.code,
        }));

        if !status.success() {
            let code = status
                .code
                .map_or_else(|| "a signal".to_string(), |c| format!("code {}", c));
            return Err(PipelineError::Execution(format!(
                "`{}` exited with {}",
                self.harness.name(),
                code
            )));
        }

        let report_path = report::find_report(&self.paths.report_dir(project))?;
        let result = tokio::task::spawn_blocking(move || report::parse_report_file(&report_path))
            .await
            .map_err(|e| PipelineError::Decode(format!("report parser stopped: {}", e)))??;

        if tracing::enabled!(Level::DEBUG) {
            match result.to_json() {
                Ok(json) => debug!(report = %json, "parsed report"),
                Err(e) => debug!(error = %e, "could not serialize report"),
            }
        }

        info!(
            project = %project.name,
            passed = result.passed_tests.len(),
            failed = result.failed_tests.len(),
            "run complete"
        );
        Ok(result)
    }
}
