// Modal overlay rendering
//
// Overlays are drawn on top of the panels:
// - Help: key bindings
// - Loading: spinner while an archive is read

use crate::tui::app::App;
use crate::tui::modal::{Modal, HELP_ROWS};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::Loading(what) => render_loading(f, app, what),
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.clicked);
    let desc_style = Style::default().fg(app.theme.foreground);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled("  Keys", header_style)),
    ];
    lines.extend(HELP_ROWS.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<16}", key), key_style),
            Span::styled(*desc, desc_style),
        ])
    }));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  Time zone: ", desc_style),
        Span::styled(app.config.time_zone.as_str(), key_style),
        Span::styled("  |  Bars: ", desc_style),
        Span::styled(app.config.display.top_n.to_string(), key_style),
    ]));

    let height = lines.len() as u16 + 2;
    let area = centered_rect(66, height, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(Text::from(lines))
        .style(Style::default().bg(app.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.highlight))
                .border_type(app.theme.border_type)
                .title(" Help ")
                .title_bottom(Line::from(" Press any key to close ").centered()),
        );
    f.render_widget(paragraph, area);
}

fn render_loading(f: &mut Frame, app: &App, what: &str) {
    let text = format!("{} Loading {}", app.spinner_char(), what);
    let width = (text.chars().count() as u16 + 6).max(24);
    let area = centered_rect(width, 3, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Line::styled(text, Style::default().fg(app.theme.warn)).centered()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.highlight)),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(80, 20, area), Rect::new(0, 0, 40, 10));
    }
}
