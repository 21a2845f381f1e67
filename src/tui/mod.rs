// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - The event loop (keyboard input, timer ticks, background loads)
// - Keeping the coordinator's viewport in step with the terminal size

pub mod app;
pub mod cache;
pub mod components;
pub mod layout;
pub mod modal;
pub mod theme;
pub mod ui;

use crate::config::Config;
use crate::events::{AppEvent, LoadSource};
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use layout::ScreenLayout;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the user quits
///
/// `source`, when given, starts loading right away; otherwise the screen
/// stays empty until the demo is requested.
pub async fn run(config: Config, source: Option<LoadSource>, log_buffer: LogBuffer) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(8);
    let mut app = App::new(config, log_buffer, event_tx);
    if let Some(source) = source {
        app.start_load(source);
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on keyboard input, the redraw tick and finished loads with
/// tokio::select!, redrawing after whichever comes first.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let mut tick_interval =
        tokio::time::interval(Duration::from_millis(app.config.display.tick_ms));

    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        let screen = ScreenLayout::new(
            Rect::new(0, 0, size.width, size.height),
            ui::histogram_count(app),
        );
        app.resize(screen.viewport());

        terminal
            .draw(|f| ui::draw(f, app, &screen))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        app.handle_key(key);
                    }
                }
            } => {}

            _ = tick_interval.tick() => app.tick(),

            Some(event) = event_rx.recv() => app.handle_app_event(event),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
