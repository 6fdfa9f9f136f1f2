use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, RunState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NavigateUp,
    NavigateDown,
    JumpToStart,
    JumpToEnd,
    Confirm,
    Dismiss,
}

/// Process a keyboard action.
pub fn handle_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,

        // No cancellation: a run always finishes on its own.
        _ if app.state.is_running() => {}

        Action::Dismiss => {
            if app.state.report().is_some() {
                app.state = RunState::Idle;
            }
        }

        // Everything below is project-list navigation, only live while idle.
        _ if !app.state.accepts_runs() => {}

        Action::NavigateUp => {
            app.selected_project = app.selected_project.saturating_sub(1);
            app.adjust_project_scroll();
        }

        Action::NavigateDown => {
            let max = app.projects.len().saturating_sub(1);
            app.selected_project = (app.selected_project + 1).min(max);
            app.adjust_project_scroll();
        }

        Action::JumpToStart => {
            app.selected_project = 0;
            app.project_scroll_offset = 0;
        }

        Action::JumpToEnd => {
            app.selected_project = app.projects.len().saturating_sub(1);
            app.adjust_project_scroll();
        }

        Action::Confirm => {
            if let Some(project) = app.selected().cloned() {
                app.start_run(project);
            } else {
                app.notifier.error("No projects configured");
            }
        }
    }
}

/// Map a key press to an action for the current state.
pub fn trigger_action(key: KeyEvent, state: &RunState) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match state {
        RunState::Running { .. } => None,
        RunState::Displaying { .. } => Some(Action::Dismiss),
        RunState::Idle | RunState::Error { .. } => map_key(key),
    }
}

fn map_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::JumpToStart),
        KeyCode::Char('G') | KeyCode::End => Some(Action::JumpToEnd),
        KeyCode::Enter => Some(Action::Confirm),
        _ => None,
    }
}
