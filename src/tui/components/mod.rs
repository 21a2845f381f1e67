// Components module - reusable UI building blocks
//
// One module per panel. Each exposes `render(f, area, app, ..)` and reads
// what it needs from App and the panel cache.

pub mod density_strip;
pub mod detail_panel;
pub mod formatters;
pub mod histogram_panel;
pub mod logs_panel;
pub mod overlay;
pub mod scatter_panel;
pub mod status_bar;
pub mod title_bar;

use crate::tui::app::App;
use ratatui::{
    style::Style,
    text::Line,
    widgets::{Block, Borders},
};

/// Bordered panel block, highlighted when focused
pub fn panel_block<'a>(app: &App, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.panel_border(focused))
        .title(title)
        .style(Style::default().bg(app.theme.background))
}
