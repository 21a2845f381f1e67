// Scatter panel component
//
// Each filtered record is one glyph at (day, time of day). Midnight sits on
// the top row. The cursor cell is what the detail panel describes.

use super::panel_block;
use crate::tui::app::{App, Focus};
use crate::tui::cache::Cell;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
    Frame,
};

/// Scatter plot over pre-placed cells
pub struct ScatterPlot<'a> {
    cells: &'a [Cell],
    glyph: char,
    cursor: Option<((u16, u16), Color)>,
}

impl<'a> ScatterPlot<'a> {
    pub fn new(cells: &'a [Cell], glyph: char) -> Self {
        Self {
            cells,
            glyph,
            cursor: None,
        }
    }

    pub fn cursor(mut self, at: (u16, u16), color: Color) -> Self {
        self.cursor = Some((at, color));
        self
    }
}

impl Widget for ScatterPlot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for cell in self.cells {
            if cell.col >= area.width || cell.row >= area.height {
                continue;
            }
            if let Some(c) = buf.cell_mut((area.x + cell.col, area.y + cell.row)) {
                c.set_char(self.glyph).set_fg(cell.color);
            }
        }

        if let Some(((col, row), color)) = self.cursor {
            if col < area.width && row < area.height {
                if let Some(c) = buf.cell_mut((area.x + col, area.y + row)) {
                    if c.symbol() == " " {
                        c.set_char('+');
                    }
                    c.set_bg(color);
                }
            }
        }
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Scatter;
    let cache = &app.cache;

    let title = Line::from(vec![
        Span::styled(" Messages ", Style::default().fg(app.theme.title)),
        Span::styled(
            format!("{} shown ", cache.points),
            Style::default().fg(app.theme.muted),
        ),
    ]);
    let muted = Style::default().fg(app.theme.muted);
    let mut block = panel_block(app, title, focused);
    if app.coordinator.is_loaded() {
        let (first, last) = &cache.date_labels;
        let (top, bottom) = &cache.time_labels;
        block = block
            .title_top(Line::styled(format!(" {} ↓ {} ", top, bottom), muted).right_aligned())
            .title_bottom(Line::styled(format!(" {} ", first), muted).left_aligned())
            .title_bottom(Line::styled(format!(" {} ", last), muted).right_aligned());
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut plot = ScatterPlot::new(&cache.cells, app.config.display.point_glyph);
    if focused {
        plot = plot.cursor(app.cursor, app.theme.cursor);
    }
    f.render_widget(plot, inner);
}
