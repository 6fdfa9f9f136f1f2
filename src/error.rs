use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while locating, running, or parsing a test run.
/// All of them are recovered by the app and shown as status text.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{what} not found: {}", .path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("could not decode test report: {0}")]
    Decode(String),

    #[error("invalid suite timestamp {value:?} (expected YYYY-MM-DDTHH:MM:SS)")]
    TimestampFormat { value: String },

    #[error("test harness failed: {0}")]
    Execution(String),
}

impl PipelineError {
    pub fn not_found(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what,
            path: path.into(),
        }
    }
}

/// Failures from pushing results to the profile service.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Raised locally when no project is bound; the remote call is never attempted.
    #[error("no current project")]
    NoProject,

    #[error("sync endpoint not configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service rejected results (HTTP {status})")]
    Rejected { status: u16 },
}
