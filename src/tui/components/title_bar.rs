// Title bar component
//
// App name, what is loaded, and a spinner while a load is running.

use crate::tui::app::App;
use crate::tui::modal::Modal;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " msgscope",
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(source) = &app.source {
        spans.push(Span::styled(
            format!(" ──── {}", source),
            Style::default().fg(app.theme.foreground),
        ));
    }
    if let Some(Modal::Loading(what)) = &app.modal {
        spans.push(Span::styled(
            format!("  {} loading {}", app.spinner_char(), what),
            Style::default().fg(app.theme.warn),
        ));
    }

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(4)]).areas(area);
    f.render_widget(Paragraph::new(Line::from(spans)), left);
    f.render_widget(
        Paragraph::new(Line::styled(" ? ", Style::default().fg(app.theme.muted)).right_aligned()),
        right,
    );
}
