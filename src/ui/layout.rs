use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, RunState};

use super::notifications;
use super::project_list;
use super::report_view;
use super::run_panel;
use super::status_bar;
use super::theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
            .areas(main_area);

    project_list::draw(frame, app, list_area);

    match &app.state {
        RunState::Running { started, phase } => {
            run_panel::draw(frame, app, *started, *phase, detail_area)
        }
        RunState::Displaying { report, elapsed } => {
            report_view::draw(frame, report, *elapsed, detail_area)
        }
        RunState::Idle | RunState::Error { .. } => draw_idle(frame, app, detail_area),
    }

    status_bar::draw(frame, app, status_area);
    notifications::draw(frame, app);
}

fn draw_idle(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Run ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE2));

    let mut lines = Vec::new();
    match app.selected() {
        Some(project) => {
            lines.push(Line::from(vec![
                Span::styled(&project.name, Style::default().fg(theme::TEXT).bold()),
                Span::styled(
                    format!("  ({})", project.language),
                    Style::default().fg(theme::OVERLAY0),
                ),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[enter]", Style::default().fg(theme::YELLOW)),
                Span::raw(" run the exercise's tests"),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "No projects configured. Add [[projects]] entries to kata.toml.",
            Style::default().fg(theme::SUBTEXT0),
        ))),
    }
    lines.push(Line::from(Span::styled(
        format!("workspace {}", app.workspace.display()),
        Style::default().fg(theme::OVERLAY0),
    )));

    if let RunState::Error { message } = &app.state {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("✘ last run failed: ", Style::default().fg(theme::RED)),
            Span::styled(message.as_str(), Style::default().fg(theme::RED)),
        ]));
    } else if let Some(summary) = &app.summary {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            summary.as_str(),
            Style::default().fg(theme::SUBTEXT0),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
