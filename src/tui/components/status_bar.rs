// Status bar component
//
// Filtered and total counts, the inferred owner, then either the latest
// status message or key hints for the focused panel.

use super::formatters::format_number;
use crate::tui::app::{App, Focus};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Key hints for the focused panel
pub fn focus_hint(focus: Focus) -> &'static str {
    match focus {
        Focus::Histogram(_) => "↑↓:select  Space:toggle  c:colour  /:search",
        Focus::Scatter => "arrows:move cursor",
        Focus::DateStrip | Focus::TimeStrip => "h/l H/L:edges  ←→:shift  Esc:clear",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let bp = Breakpoint::from_width(area.width);
    let muted = Style::default().fg(app.theme.muted);
    let mut spans = Vec::new();

    match app.coordinator.scene() {
        Some(scene) => {
            spans.push(Span::styled(
                format!(
                    " {} / {} messages",
                    format_number(scene.filtered as u64),
                    format_number(scene.total as u64)
                ),
                Style::default()
                    .fg(app.theme.status_bar)
                    .add_modifier(Modifier::BOLD),
            ));
            if bp.at_least(Breakpoint::Normal) {
                let owner = scene.username.as_deref().unwrap_or("unknown");
                spans.push(Span::styled(format!(" │ owner: {}", owner), muted));
            }
        }
        None => spans.push(Span::styled(" no archive loaded", muted)),
    }

    spans.push(Span::styled(" │ ", muted));
    match &app.status {
        Some(msg) => {
            let color = if msg.is_error {
                app.theme.error
            } else {
                app.theme.info
            };
            spans.push(Span::styled(msg.text.clone(), Style::default().fg(color)));
        }
        None if bp.at_least(Breakpoint::Wide) => {
            spans.push(Span::styled(focus_hint(app.focus), muted));
            spans.push(Span::styled("  r:reset  d:demo  ?:help  q:quit", muted));
        }
        None => spans.push(Span::styled("?:help", muted)),
    }

    let status = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(status, area);
}
