use ratatui::{prelude::*, widgets::Paragraph};

use super::theme;
use crate::app::{App, RunState};

fn hint<'a>(key: &'a str, label: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(key, Style::default().fg(theme::YELLOW)),
        Span::raw(label),
    ]
}

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();

    match &app.state {
        RunState::Running { phase, .. } => {
            spans.push(Span::styled(
                format!(" {} {}...", theme::spinner(app.spinner_tick), phase.label()),
                Style::default().fg(theme::YELLOW),
            ));
            spans.extend(hint("  [ctrl-c]", " quit"));
        }
        RunState::Displaying { .. } => {
            spans.extend(hint(" [any key]", " back  "));
            spans.extend(hint("[ctrl-c]", " quit"));
        }
        RunState::Idle | RunState::Error { .. } => {
            spans.extend(hint(" [↑↓]", " select  "));
            spans.extend(hint("[enter]", " run  "));
            spans.extend(hint("[q]", " quit"));
        }
    }

    match &app.state {
        RunState::Error { message } => spans.push(Span::styled(
            format!("  ✘ {}", message),
            Style::default().fg(theme::RED),
        )),
        RunState::Idle | RunState::Displaying { .. } => {
            if let Some(summary) = &app.summary {
                spans.push(Span::styled(
                    format!("  {}", summary),
                    Style::default().fg(theme::MAUVE),
                ));
            }
        }
        RunState::Running { .. } => {}
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::SURFACE0));
    frame.render_widget(paragraph, area);
}
