use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
};

use super::theme;
use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.state.accepts_runs();
    let border_style = if focused {
        Style::default().fg(theme::BLUE)
    } else {
        Style::default().fg(theme::SURFACE2)
    };

    let block = Block::default()
        .title(" Projects ")
        .borders(Borders::ALL)
        .border_style(border_style);

    // Calculate viewport height (inner area minus borders)
    let inner_height = block.inner(area).height as usize;
    app.project_viewport_height = inner_height;

    let running_id = app
        .state
        .is_running()
        .then(|| app.current_project.as_ref().map(|p| p.id.as_str()))
        .flatten();

    let end = (app.project_scroll_offset + inner_height).min(app.projects.len());
    let start = app.project_scroll_offset.min(end);
    let items: Vec<ListItem> = app.projects[start..end]
        .iter()
        .enumerate()
        .map(|(view_i, project)| {
            let absolute_i = view_i + start;
            let selected = absolute_i == app.selected_project;

            let marker = if running_id == Some(project.id.as_str()) {
                Span::styled(
                    format!("{} ", theme::spinner(app.spinner_tick)),
                    Style::default().fg(theme::YELLOW),
                )
            } else {
                Span::raw("  ")
            };

            let item = ListItem::new(Line::from(vec![
                marker,
                Span::styled(&project.name, Style::default().fg(theme::TEXT)),
                Span::styled(
                    format!(" {}", project.language),
                    Style::default().fg(theme::OVERLAY0),
                ),
            ]));

            if selected {
                item.style(Style::default().bg(theme::SURFACE1))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
