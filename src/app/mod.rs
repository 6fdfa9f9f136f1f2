use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::{
    app::notifier::Notifier,
    models::{ParseResult, Project},
};

pub mod actions;
pub mod events;
pub mod notifier;

pub use actions::{Action, handle_action, trigger_action};
pub use events::{AppEvent, RunProgress, handle_event};
pub use notifier::NotificationKind;

/// Harness output kept for the running view.
const MAX_OUTPUT_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Locating,
    Testing,
    Parsing,
}

impl RunPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RunPhase::Locating => "locating project",
            RunPhase::Testing => "running tests",
            RunPhase::Parsing => "reading report",
        }
    }
}

/// Where the app is in the run lifecycle. Exactly one at a time.
#[derive(Debug)]
pub enum RunState {
    Idle,
    Running { started: Instant, phase: RunPhase },
    Displaying { report: Box<ParseResult>, elapsed: Duration },
    /// Idle, carrying the message of the last failed run.
    Error { message: String },
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }

    pub fn report(&self) -> Option<&ParseResult> {
        match self {
            RunState::Displaying { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Idle or Error: ready to start a run.
    pub fn accepts_runs(&self) -> bool {
        matches!(self, RunState::Idle | RunState::Error { .. })
    }
}

/// Side effects requested by the state machine, executed by the event loop.
#[derive(Debug)]
pub enum Command {
    StartRun(Project),
    ScheduleTick,
    Sync {
        project_id: String,
        failed: Vec<String>,
        passed: Vec<String>,
    },
}

pub struct App {
    pub workspace: PathBuf,
    pub projects: Vec<Project>,
    pub selected_project: usize,
    pub project_scroll_offset: usize,
    pub project_viewport_height: usize,
    pub state: RunState,
    /// Project bound to the current (or last) run; sync needs it.
    pub current_project: Option<Project>,
    /// One-line outcome of the last run. Sync status is appended to it.
    pub summary: Option<String>,
    pub output_lines: VecDeque<String>,
    pub spinner_tick: usize,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    pub pending: Vec<Command>,
    pub should_quit: bool,
    pub notifier: Notifier,
}

impl App {
    pub fn new(
        workspace: PathBuf,
        projects: Vec<Project>,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let app = Self {
            workspace,
            projects,
            selected_project: 0,
            project_scroll_offset: 0,
            project_viewport_height: 0,
            state: RunState::Idle,
            current_project: None,
            summary: None,
            output_lines: VecDeque::new(),
            spinner_tick: 0,
            event_tx,
            pending: Vec::new(),
            should_quit: false,
            notifier: Notifier::new(),
        };
        (app, event_rx)
    }

    /// Move the selection to the project whose id or name equals `key`.
    pub fn select_project(&mut self, key: &str) -> bool {
        let Some(index) = self
            .projects
            .iter()
            .position(|p| p.id == key || p.name.eq_ignore_ascii_case(key))
        else {
            return false;
        };
        self.selected_project = index;
        self.adjust_project_scroll();
        true
    }

    pub fn selected(&self) -> Option<&Project> {
        self.projects.get(self.selected_project)
    }

    fn start_run(&mut self, project: Project) {
        self.state = RunState::Running {
            started: Instant::now(),
            phase: RunPhase::Locating,
        };
        self.current_project = Some(project.clone());
        self.summary = None;
        self.output_lines.clear();
        self.spinner_tick = 0;
        self.pending.push(Command::StartRun(project));
        self.pending.push(Command::ScheduleTick);
    }

    fn push_output(&mut self, line: String) {
        if self.output_lines.len() == MAX_OUTPUT_LINES {
            self.output_lines.pop_front();
        }
        self.output_lines.push_back(line);
    }

    fn adjust_project_scroll(&mut self) {
        if self.project_viewport_height == 0 {
            return;
        }
        if self.selected_project < self.project_scroll_offset {
            self.project_scroll_offset = self.selected_project;
        } else if self.selected_project >= self.project_scroll_offset + self.project_viewport_height
        {
            self.project_scroll_offset = self.selected_project - self.project_viewport_height + 1;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_project_by_id_or_name() {
        let mut app = test_support::app();
        assert!(app.select_project("p-3"));
        assert_eq!(app.selected_project, 2);
        assert!(app.select_project("binary tree"));
        assert_eq!(app.selected_project, 1);
        assert!(!app.select_project("missing"));
        assert_eq!(app.selected_project, 1);
    }

    #[test]
    fn output_tail_is_bounded() {
        let mut app = test_support::app();
        for i in 0..(MAX_OUTPUT_LINES + 5) {
            app.push_output(format!("line {}", i));
        }
        assert_eq!(app.output_lines.len(), MAX_OUTPUT_LINES);
        assert_eq!(app.output_lines.front().map(String::as_str), Some("line 5"));
    }
}
