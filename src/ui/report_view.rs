use std::time::Duration;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;
use crate::models::{ParseResult, TestClass, TestFailure, TestStatus};

pub fn draw(frame: &mut Frame, report: &ParseResult, elapsed: Duration, area: Rect) {
    let border_color = if report.all_passed() {
        theme::GREEN
    } else {
        theme::RED
    };
    let block = Block::default()
        .title(format!(" Results: {} ", report.suite.name))
        .title_bottom(Line::from(" press any key to return ").right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let paragraph = Paragraph::new(build_report_text(report, elapsed))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn build_report_text(report: &ParseResult, elapsed: Duration) -> Text<'_> {
    let grouped = &report.grouped;
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(
                format!("{} {}", TestStatus::Passed.icon(), grouped.total_passed),
                Style::default().fg(TestStatus::Passed.color()),
            ),
            Span::raw("   "),
            Span::styled(
                format!("{} {}", TestStatus::Failed.icon(), grouped.total_failed),
                Style::default().fg(TestStatus::Failed.color()),
            ),
            Span::styled(
                format!("   {:.2}s", grouped.total_time),
                Style::default().fg(theme::MAUVE),
            ),
            Span::styled(
                format!("  (wall {:.1}s)", elapsed.as_secs_f64()),
                Style::default().fg(theme::OVERLAY0),
            ),
        ]),
        Line::from(""),
    ];

    for class in &grouped.classes {
        lines.extend(class_lines(class));
        lines.push(Line::from(""));
    }

    Text::from(lines)
}

fn class_lines(class: &TestClass) -> Vec<Line<'_>> {
    let total = class.passed_count + class.failed_count;
    let heading_color = if class.failed_count > 0 {
        theme::RED
    } else if class.is_uncategorized() {
        theme::SUBTEXT0
    } else {
        theme::GREEN
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            class.display_name.as_str(),
            Style::default().fg(heading_color).bold(),
        ),
        Span::styled(
            format!("  {}/{} passed  {:.2}s", class.passed_count, total, class.total_time),
            Style::default().fg(theme::OVERLAY0),
        ),
    ])];

    for test in &class.tests {
        let status = test.status();
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(status.icon(), Style::default().fg(status.color())),
            Span::raw(" "),
            Span::styled(test.name.as_str(), Style::default().fg(theme::TEXT)),
            Span::styled(
                format!("  {:.2}s", test.time),
                Style::default().fg(theme::OVERLAY0),
            ),
        ]));
        if let Some(failure) = &test.failure {
            lines.extend(failure_lines(failure));
        }
    }
    lines
}

fn failure_lines(failure: &TestFailure) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    if !failure.message.is_empty() {
        let mut spans = vec![
            Span::raw("      "),
            Span::styled(failure.message.as_str(), Style::default().fg(theme::RED)),
        ];
        if !failure.kind.is_empty() {
            spans.push(Span::styled(
                format!(" [{}]", failure.kind),
                Style::default().fg(theme::OVERLAY0),
            ));
        }
        lines.push(Line::from(spans));
    }
    for content_line in failure.content.lines().filter(|l| !l.trim().is_empty()) {
        lines.push(Line::from(vec![
            Span::raw("      "),
            Span::styled(content_line, Style::default().fg(theme::SUBTEXT0)),
        ]));
    }
    lines
}
