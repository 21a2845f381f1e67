//! Logs panel component
//!
//! Shows the most recent captured log entries, colour-coded by level.

use super::panel_block;
use crate::logging::{LogEntry, LogLevel};
use crate::tui::app::App;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let title = panel_title(app.log_buffer.len());

    let items: Vec<ListItem> = if app.log_buffer.is_empty() {
        vec![ListItem::new("No log entries yet").style(Style::default().fg(app.theme.muted))]
    } else {
        app.log_buffer
            .tail(height)
            .iter()
            .map(|entry| {
                ListItem::new(format_log_entry(entry))
                    .style(log_level_style(&entry.level, &app.theme))
            })
            .collect()
    };

    f.render_widget(List::new(items).block(panel_block(app, title, false)), area);
}

fn panel_title(count: usize) -> String {
    format!(" System Logs ({}) ", count)
}

/// Format a log entry for display
fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

/// Get color style for log level
fn log_level_style(level: &LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.warn),
        LogLevel::Info => Style::default().fg(theme.info),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.debug),
    }
}
