// Detail panel component
//
// Describes the record under the scatter cursor. Read-only: hovering never
// changes a filter.

use super::panel_block;
use crate::model::Record;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = panel_block(app, " Message ", false);
    let lines = match app.hovered() {
        Some((_, record)) => describe(app, record),
        None if app.coordinator.is_loaded() => vec![Line::styled(
            "Move the scatter cursor onto a point",
            Style::default().fg(app.theme.muted),
        )],
        None => vec![Line::styled(
            "Nothing loaded. Press d for the demo archive.",
            Style::default().fg(app.theme.muted),
        )],
    };

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn describe<'a>(app: &App, record: &'a Record) -> Vec<Line<'a>> {
    let label = Style::default().fg(app.theme.muted);
    let direction = if record.sent { "→" } else { "←" };
    vec![
        Line::from(vec![
            Span::styled(
                record.sender_name.as_str(),
                Style::default()
                    .fg(app.theme.title)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {} ", direction), label),
            Span::raw(record.thread.as_str()),
        ]),
        Line::from(vec![
            Span::raw(format!(
                "{} {}",
                record.date.format("%a %Y-%m-%d"),
                record.time_seconds.format("%H:%M:%S")
            )),
            Span::styled(
                format!(
                    "  {} participants  {} chars  {}",
                    record.nb_participants,
                    record.length,
                    record.media.as_str()
                ),
                label,
            ),
        ]),
        Line::raw(record.message.as_str()),
    ]
}
