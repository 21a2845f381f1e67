// Histogram panel component
//
// One bar per displayed key: legend, bar, count. Clicked bars are
// highlighted; colorized histograms paint each bar in its scatter colour.

use super::formatters::{bar, format_number, pad_to_width};
use super::panel_block;
use crate::coordinator::color::BASE_COLOR;
use crate::coordinator::HistogramView;
use crate::tui::app::{App, Focus};
use crate::tui::theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Widest legend column, in cells
const MAX_LEGEND: usize = 18;

pub fn render(f: &mut Frame, area: Rect, app: &App, index: usize) {
    let focused = app.focus == Focus::Histogram(index);
    let Some(view) = app.cache.histograms.get(index) else {
        f.render_widget(panel_block(app, " … ", focused), area);
        return;
    };

    let block = panel_block(app, title(app, view), focused);
    let inner = block.inner(area);
    let rows = inner.height as usize;
    let selected = app.selected.get(index).copied().unwrap_or(0);

    // Keep the selected bar on screen
    let offset = if focused && selected >= rows {
        selected + 1 - rows
    } else {
        0
    };

    let max = view.max_value();
    let value_width = format_number(max).len().max(1);
    let legend_width = MAX_LEGEND.min((inner.width as usize) / 3);
    let bar_width = (inner.width as usize).saturating_sub(legend_width + value_width + 2);

    let lines: Vec<Line> = view
        .bars
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, b)| {
            let bar_color = b.color.map_or(theme::color(BASE_COLOR), theme::color);
            let mut legend_style = if b.clicked {
                Style::default()
                    .fg(app.theme.clicked)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.foreground)
            };
            if focused && i == selected {
                legend_style = legend_style.fg(app.theme.selection_fg).bg(app.theme.selection);
            }
            // Bars outside an active selection fade back
            let bar_style = if view.is_filtering() && !b.clicked {
                Style::default().fg(app.theme.muted)
            } else {
                Style::default().fg(bar_color)
            };

            Line::from(vec![
                Span::styled(pad_to_width(&b.legend, legend_width), legend_style),
                Span::raw(" "),
                Span::styled(pad_to_width(&bar(b.value, max, bar_width), bar_width), bar_style),
                Span::raw(" "),
                Span::styled(
                    format!("{:>width$}", format_number(b.value), width = value_width),
                    Style::default().fg(app.theme.muted),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn title(app: &App, view: &HistogramView) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" {} ", view.title),
        Style::default().fg(app.theme.title),
    )];
    if view.colorized {
        spans.push(Span::styled("◆ ", Style::default().fg(app.theme.clicked)));
    }
    if view.searched {
        let term = app
            .search_input
            .clone()
            .or_else(|| app.coordinator.scene().and_then(|s| s.search.clone()))
            .unwrap_or_default();
        spans.push(Span::styled(
            format!("[search: {}] ", term),
            Style::default().fg(app.theme.warn),
        ));
    }
    Line::from(spans)
}
