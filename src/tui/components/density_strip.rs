// Density strip component
//
// Column heights show how many filtered messages fall on each day (date
// strip) or each time of day (time strip). The brushed span is drawn in
// the brush colour; everything else fades while a brush is active.

use super::panel_block;
use crate::coordinator::Axis;
use crate::tui::app::{App, Focus};
use crate::tui::cache::Strip;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
    Frame,
};

const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Vertical sparkline over strip columns
pub struct StripWidget<'a> {
    strip: &'a Strip,
    color: Color,
    brush_color: Color,
    faded: Color,
}

impl Widget for StripWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max = self.strip.max();
        let height = area.height as usize;
        if height == 0 {
            return;
        }

        for (col, value) in self.strip.columns.iter().enumerate() {
            if col >= area.width as usize {
                break;
            }
            let color = match self.strip.brush {
                Some((lo, hi)) if (col as f64) + 0.5 >= lo && (col as f64) + 0.5 <= hi => {
                    self.brush_color
                }
                Some(_) => self.faded,
                None => self.color,
            };
            let mut eighths = if max > 0.0 {
                (value / max * (height * 8) as f64).round() as usize
            } else {
                0
            };
            if eighths == 0 && *value > 0.0 {
                eighths = 1;
            }
            // Fill from the bottom row up
            for row in (0..height).rev() {
                let level = eighths.min(8);
                eighths -= level;
                let x = area.x + col as u16;
                let y = area.y + row as u16;
                if let Some(c) = buf.cell_mut((x, y)) {
                    c.set_char(LEVELS[level]).set_fg(color);
                }
            }
        }
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App, axis: Axis) {
    let (focused, name, strip, labels) = match axis {
        Axis::Date => (
            app.focus == Focus::DateStrip,
            "Days",
            &app.cache.date_strip,
            &app.cache.date_labels,
        ),
        Axis::Time => (
            app.focus == Focus::TimeStrip,
            "Time of day",
            &app.cache.time_strip,
            &app.cache.time_labels,
        ),
    };

    let muted = Style::default().fg(app.theme.muted);
    let mut spans = vec![Span::styled(
        format!(" {} ", name),
        Style::default().fg(app.theme.title),
    )];
    if strip.brush.is_some() {
        spans.push(Span::styled(
            format!("{} .. {} ", labels.0, labels.1),
            Style::default().fg(app.theme.brush),
        ));
    }
    let mut block = panel_block(app, Line::from(spans), focused);

    // The strip always spans the whole axis
    let ends = match axis {
        Axis::Date => app
            .coordinator
            .session()
            .and_then(|s| s.extent())
            .map(|e| (e.first.format("%Y-%m-%d").to_string(), e.last.format("%Y-%m-%d").to_string())),
        Axis::Time => app
            .coordinator
            .is_loaded()
            .then(|| ("00:00".to_string(), "23:59".to_string())),
    };
    if let Some((first, last)) = ends {
        block = block
            .title_bottom(Line::styled(format!(" {} ", first), muted).left_aligned())
            .title_bottom(Line::styled(format!(" {} ", last), muted).right_aligned());
    }

    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        StripWidget {
            strip,
            color: app.theme.foreground,
            brush_color: app.theme.brush,
            faded: app.theme.muted,
        },
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(strip: &Strip, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        StripWidget {
            strip,
            color: Color::White,
            brush_color: Color::Blue,
            faded: Color::DarkGray,
        }
        .render(area, &mut buf);
        buf
    }

    #[test]
    fn test_tallest_column_fills_height() {
        let strip = Strip {
            columns: vec![0.0, 2.0, 4.0],
            brush: None,
        };
        let buf = draw(&strip, Rect::new(0, 0, 3, 2));
        assert_eq!(buf[(2, 0)].symbol(), "█");
        assert_eq!(buf[(2, 1)].symbol(), "█");
        assert_eq!(buf[(1, 0)].symbol(), " ");
        assert_eq!(buf[(1, 1)].symbol(), "█");
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }

    #[test]
    fn test_brush_colours_selected_columns() {
        let strip = Strip {
            columns: vec![1.0, 1.0, 1.0, 1.0],
            brush: Some((1.0, 3.0)),
        };
        let buf = draw(&strip, Rect::new(0, 0, 4, 1));
        assert_eq!(buf[(0, 0)].fg, Color::DarkGray);
        assert_eq!(buf[(1, 0)].fg, Color::Blue);
        assert_eq!(buf[(2, 0)].fg, Color::Blue);
        assert_eq!(buf[(3, 0)].fg, Color::DarkGray);
    }

    #[test]
    fn test_small_values_stay_visible() {
        let strip = Strip {
            columns: vec![1.0, 1000.0],
            brush: None,
        };
        let buf = draw(&strip, Rect::new(0, 0, 2, 1));
        assert_eq!(buf[(0, 0)].symbol(), "▁");
    }
}
