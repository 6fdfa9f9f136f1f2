use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::AppEvent;
use crate::error::PipelineError;

use super::{ExitStatus, Harness};

/// Guard that kills the child process (and its entire process group) on drop.
struct ChildGuard {
    child: Option<tokio::process::Child>,
    /// Process group ID saved at spawn time so we can kill the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
}

impl ChildGuard {
    fn new(child: tokio::process::Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child: Some(child),
            #[cfg(unix)]
            pgid,
        }
    }

    async fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        match self.child.as_mut() {
            Some(child) => {
                let status = child.wait().await?;
                self.child = None;
                Ok(status)
            }
            None => Err(std::io::Error::other("harness already reaped")),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        // Also reaps helpers the harness left behind in its group.
        #[cfg(unix)]
        if let Some(pgid) = self.pgid {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
        }
        if let Some(ref mut child) = self.child {
            let _ = child.start_kill();
        }
    }
}

/// Runs a fixed command line as the test harness.
pub struct CommandHarness {
    program: String,
    args: Vec<String>,
}

impl CommandHarness {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    fn spawn_error(&self, e: std::io::Error) -> PipelineError {
        PipelineError::Execution(format!("failed to spawn `{}`: {}", self.program, e))
    }
}

#[async_trait]
impl Harness for CommandHarness {
    async fn run(
        &self,
        dir: &Path,
        tx: &mpsc::UnboundedSender<AppEvent>,
    ) -> Result<ExitStatus, PipelineError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group, so the guard can take out anything the harness forks.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.as_std_mut().process_group(0);
        }

        debug!(cmd = ?cmd.as_std(), cwd = %dir.display(), "spawning harness");
        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let mut child_guard = ChildGuard::new(child);

        let stderr_handle = stderr.map(|stderr| {
            let tx_err = tx.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    let _ = tx_err.send(AppEvent::Output { line });
                }
            })
        });

        if let Some(stdout) = stdout {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let _ = tx.send(AppEvent::Output { line });
            }
        }

        if let Some(handle) = stderr_handle {
            handle.await.ok();
        }

        let status = child_guard.wait().await.map_err(|e| {
            PipelineError::Execution(format!("failed to wait for `{}`: {}", self.program, e))
        })?;

        info!(program = %self.program, code = ?status.code(), "harness exited");
        Ok(status.into())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
