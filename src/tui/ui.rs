// UI rendering logic
//
// Draws one frame from App state into the areas of a ScreenLayout. The
// same layout supplied the coordinator's viewport, so every panel draws
// at the size its cached data was computed for.

use super::app::App;
use super::components::{
    density_strip, detail_panel, histogram_panel, logs_panel, overlay, scatter_panel, status_bar,
    title_bar,
};
use super::layout::ScreenLayout;
use crate::coordinator::Axis;
use crate::registry::histogram_specs;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Number of histogram panels to lay out, loaded or not
pub fn histogram_count(app: &App) -> usize {
    match app.cache.histograms.len() {
        0 => histogram_specs(app.config.display.top_n).len(),
        n => n,
    }
}

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App, screen: &ScreenLayout) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    title_bar::render(f, screen.title, app);
    for (i, area) in screen.histograms.iter().enumerate() {
        histogram_panel::render(f, *area, app, i);
    }
    scatter_panel::render(f, screen.scatter, app);
    density_strip::render(f, screen.date_strip, app, Axis::Date);
    density_strip::render(f, screen.time_strip, app, Axis::Time);
    detail_panel::render(f, screen.detail, app);
    if let Some(area) = screen.logs {
        logs_panel::render(f, area, app);
    }
    status_bar::render(f, screen.status, app);

    // Overlay on top of everything
    if let Some(modal) = &app.modal {
        overlay::render(f, modal, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::demo;
    use crate::derive::{enrich, TimeBasis};
    use crate::events::{AppEvent, LoadSource};
    use crate::logging::LogBuffer;
    use crate::tui::modal::Modal;
    use ratatui::{backend::TestBackend, layout::Rect, Terminal};
    use tokio::sync::mpsc;

    fn frame_text(app: &mut App, width: u16, height: u16) -> String {
        let screen = ScreenLayout::new(Rect::new(0, 0, width, height), histogram_count(app));
        app.resize(screen.viewport());
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app, &screen)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::channel(4);
        App::new(Config::default(), LogBuffer::new(), tx)
    }

    #[test]
    fn test_empty_screen_invites_demo() {
        let mut app = app();
        let text = frame_text(&mut app, 120, 45);
        assert!(text.contains("msgscope"));
        assert!(text.contains("no archive loaded"));
        assert!(text.contains("Press d for the demo archive"));
    }

    #[test]
    fn test_loaded_screen_shows_every_panel() {
        let mut app = app();
        frame_text(&mut app, 120, 45);
        app.handle_app_event(AppEvent::Loaded {
            source: LoadSource::Demo,
            dataset: enrich(demo::demo_messages(), TimeBasis::Utc),
        });
        let text = frame_text(&mut app, 120, 45);
        for title in ["Messages", "Days", "Time of day", "System Logs"] {
            assert!(text.contains(title), "missing {title}");
        }
        assert!(text.contains("2,400 / 2,400 messages"));
        assert!(text.contains(demo::DEMO_OWNER));
        assert!(!app.cache.cells.is_empty());
    }

    #[test]
    fn test_help_overlay_lists_keys() {
        let mut app = app();
        app.modal = Some(Modal::Help);
        let text = frame_text(&mut app, 120, 45);
        assert!(text.contains("Help"));
        assert!(text.contains("Reset every filter"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = app();
        app.handle_app_event(AppEvent::Loaded {
            source: LoadSource::Demo,
            dataset: enrich(demo::demo_messages(), TimeBasis::Utc),
        });
        frame_text(&mut app, 20, 8);
    }
}
