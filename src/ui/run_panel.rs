use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, RunPhase};

pub fn draw(frame: &mut Frame, app: &App, started: Instant, phase: RunPhase, area: Rect) {
    let title = match &app.current_project {
        Some(project) => format!(" Running: {} ", project.name),
        None => " Running ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::YELLOW));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [header_area, output_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

    let header = Line::from(vec![
        Span::styled(
            format!("{} {}", theme::spinner(app.spinner_tick), phase.label()),
            Style::default().fg(theme::YELLOW),
        ),
        Span::styled(
            format!("  {:.1}s", started.elapsed().as_secs_f64()),
            Style::default().fg(theme::OVERLAY0),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), header_area);

    // Tail of the harness output that fits the panel
    let visible = output_area.height as usize;
    let skip = app.output_lines.len().saturating_sub(visible);
    let lines: Vec<Line> = app
        .output_lines
        .iter()
        .skip(skip)
        .map(|line| {
            Line::from(Span::styled(
                line.as_str(),
                Style::default().fg(theme::SUBTEXT0),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), output_area);
}
