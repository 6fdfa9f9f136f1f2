pub mod command;
pub mod executor;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::app::AppEvent;
use crate::config::HarnessConfig;
use crate::error::PipelineError;

pub use command::CommandHarness;
pub use executor::TestExecutor;

/// How the harness process ended. `code` is `None` when it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub code: Option<i32>,
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Boundary around the external test harness.
#[async_trait]
pub trait Harness: Send + Sync {
    /// Run the harness inside `dir` and wait for it to exit.
    /// Output lines may be forwarded over `tx` while it runs.
    async fn run(
        &self,
        dir: &Path,
        tx: &mpsc::UnboundedSender<AppEvent>,
    ) -> Result<ExitStatus, PipelineError>;

    /// Display name for this harness (e.g., the program name).
    fn name(&self) -> &str;
}

/// Construct the harness described by the config.
pub fn from_config(config: &HarnessConfig) -> Result<Arc<dyn Harness>> {
    let words = shell_words::split(&config.command)
        .with_context(|| format!("invalid harness command `{}`", config.command))?;
    let (program, args) = words
        .split_first()
        .context("harness command is empty")?;
    Ok(Arc::new(CommandHarness::new(program.clone(), args.to_vec())))
}
