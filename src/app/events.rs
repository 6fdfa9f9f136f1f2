use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    app::{App, Command, RunPhase, RunState},
    error::{PipelineError, SyncError},
    models::ParseResult,
};

const SYNCED_TOAST_TTL: Duration = Duration::from_secs(2);

/// Progress notifications from the executor.
#[derive(Debug)]
pub enum RunProgress {
    Located { dir: PathBuf },
    HarnessStarted { harness: String },
    HarnessCompleted { code: Option<i32> },
}

/// Messages delivered to the app by background work.
#[derive(Debug)]
pub enum AppEvent {
    Progress(RunProgress),
    Output {
        line: String,
    },
    RunFinished(Result<ParseResult, PipelineError>),
    /// Animation tick; only meaningful while a run is in progress.
    Tick,
    /// Outcome of the fire-and-forget results sync. May arrive in any state,
    /// including after a later run, so it names the project it was for.
    SyncFinished {
        project_id: Option<String>,
        result: Result<(), SyncError>,
    },
}

/// Process an event from background work.
pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Progress(progress) => {
            let RunState::Running { phase, .. } = &mut app.state else {
                return;
            };
            let (next, line) = match progress {
                RunProgress::Located { dir } => {
                    (RunPhase::Locating, format!("» exercise at {}", dir.display()))
                }
                RunProgress::HarnessStarted { harness } => {
                    (RunPhase::Testing, format!("» $ {}", harness))
                }
                RunProgress::HarnessCompleted { code } => (
                    RunPhase::Parsing,
                    match code {
                        Some(code) => format!("» harness exited with code {}", code),
                        None => "» harness terminated by signal".to_string(),
                    },
                ),
            };
            *phase = next;
            app.push_output(line);
        }

        AppEvent::Output { line } => {
            if app.state.is_running() {
                app.push_output(line);
            }
        }

        AppEvent::RunFinished(result) => {
            let RunState::Running { started, .. } = app.state else {
                warn!("run result arrived while no run was active");
                return;
            };
            match result {
                Ok(report) => finish_run(app, report, started.elapsed()),
                Err(e) => {
                    let message = e.to_string();
                    debug!(error = %message, "run failed");
                    app.notifier.error(message.clone());
                    app.state = RunState::Error { message };
                }
            }
        }

        AppEvent::Tick => {
            if app.state.is_running() {
                app.spinner_tick = app.spinner_tick.wrapping_add(1);
                app.pending.push(Command::ScheduleTick);
            }
        }

        AppEvent::SyncFinished { project_id, result } => {
            if result.is_ok() {
                app.notifier.info("Results synced", SYNCED_TOAST_TTL);
            }
            let status = sync_status(project_id.as_deref(), &result);
            match app.summary.as_mut() {
                Some(summary) => {
                    summary.push_str(" · ");
                    summary.push_str(&status);
                }
                None => app.summary = Some(status),
            }
        }
    }
}

fn finish_run(app: &mut App, report: ParseResult, elapsed: Duration) {
    app.summary = Some(summary_line(app, &report));

    let sync = app.current_project.as_ref().map(|project| Command::Sync {
        project_id: project.id.clone(),
        failed: report.failed_tests.clone(),
        passed: report.passed_tests.clone(),
    });
    match sync {
        Some(command) => app.pending.push(command),
        None => handle_event(
            app,
            AppEvent::SyncFinished {
                project_id: None,
                result: Err(SyncError::NoProject),
            },
        ),
    }

    app.state = RunState::Displaying {
        report: Box::new(report),
        elapsed,
    };
}

fn summary_line(app: &App, report: &ParseResult) -> String {
    let name = app
        .current_project
        .as_ref()
        .map_or(report.suite.name.as_str(), |p| p.name.as_str());
    let mut line = format!(
        "{}: {}/{} passed",
        name,
        report.passed_tests.len(),
        report.total()
    );
    if !report.all_passed() {
        line.push_str(&format!(", {} failed", report.failed_tests.len()));
    }
    line.push_str(&format!(" in {:.2}s", report.suite.time));
    line
}

fn sync_status(project_id: Option<&str>, result: &Result<(), SyncError>) -> String {
    let (label, detail) = match result {
        Ok(()) => ("synced", None),
        Err(e @ (SyncError::NoProject | SyncError::NotConfigured)) => ("sync skipped", Some(e)),
        Err(e) => ("sync failed", Some(e)),
    };
    let mut status = label.to_string();
    if let Some(id) = project_id {
        status.push_str(&format!(" ({})", id));
    }
    if let Some(e) = detail {
        status.push_str(&format!(": {}", e));
    }
    status
}
