// TUI application state
//
// Owns the filter coordinator and everything the screen needs that the
// scene doesn't carry: focus, selected bars, the scatter cursor, the
// search input and the current overlay.

use super::cache::PanelCache;
use super::modal::{Modal, ModalAction};
use super::theme::Theme;
use crate::config::Config;
use crate::coordinator::{Axis, FilterCoordinator, GestureError, Redraw, Viewport};
use crate::events::{spawn_load, AppEvent, LoadSource};
use crate::logging::LogBuffer;
use crate::model::Record;
use crate::registry::THREAD;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a status message stays in the status bar
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Braille spinner frames for the loading overlay
const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Panel that receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Histogram(usize),
    Scatter,
    DateStrip,
    TimeStrip,
}

impl Focus {
    pub fn next(self, histograms: usize) -> Self {
        match self {
            Focus::Histogram(i) if i + 1 < histograms => Focus::Histogram(i + 1),
            Focus::Histogram(_) => Focus::Scatter,
            Focus::Scatter => Focus::DateStrip,
            Focus::DateStrip => Focus::TimeStrip,
            Focus::TimeStrip if histograms > 0 => Focus::Histogram(0),
            Focus::TimeStrip => Focus::Scatter,
        }
    }

    pub fn prev(self, histograms: usize) -> Self {
        match self {
            Focus::Histogram(0) => Focus::TimeStrip,
            Focus::Histogram(i) => Focus::Histogram(i - 1),
            Focus::Scatter if histograms > 0 => Focus::Histogram(histograms - 1),
            Focus::Scatter => Focus::TimeStrip,
            Focus::DateStrip => Focus::Scatter,
            Focus::TimeStrip => Focus::DateStrip,
        }
    }
}

/// Short-lived message in the status bar
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    created_at: Instant,
}

pub struct App {
    pub coordinator: FilterCoordinator,
    pub cache: PanelCache,
    pub config: Config,
    pub theme: Theme,
    pub log_buffer: LogBuffer,
    pub focus: Focus,
    /// Selected bar per histogram, by display position
    pub selected: Vec<usize>,
    /// Scatter cursor in cells, origin top-left
    pub cursor: (u16, u16),
    /// Thread search input while typing
    pub search_input: Option<String>,
    pub modal: Option<Modal>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    /// What is on screen now
    pub source: Option<LoadSource>,
    frame: usize,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(config: Config, log_buffer: LogBuffer, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            coordinator: FilterCoordinator::new(config.display.top_n),
            cache: PanelCache::default(),
            config,
            theme: Theme::default(),
            log_buffer,
            focus: Focus::Histogram(0),
            selected: Vec::new(),
            cursor: (0, 0),
            search_input: None,
            modal: None,
            status: None,
            should_quit: false,
            source: None,
            frame: 0,
            event_tx,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────

    /// Start loading in the background; the result arrives as an AppEvent
    pub fn start_load(&mut self, source: LoadSource) {
        tracing::info!("Loading {}", source);
        self.modal = Some(Modal::Loading(source.to_string()));
        spawn_load(source, self.config.time_zone, self.event_tx.clone());
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded { source, dataset } => {
                self.modal = None;
                let count = dataset.records.len();
                let result = self.coordinator.reload(dataset);
                self.apply(result);
                self.selected = vec![0; self.cache.histograms.len()];
                self.focus = Focus::Histogram(0);
                self.search_input = None;
                let (w, h) = self.viewport().scatter;
                self.cursor = ((w / 2.0) as u16, (h / 2.0) as u16);
                self.set_status(format!("Loaded {} messages from {}", count, source), false);
                self.source = Some(source);
            }
            AppEvent::LoadFailed { source, error } => {
                self.modal = None;
                self.set_status(format!("Could not load {}: {}", source, error), true);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Frame bookkeeping
    // ─────────────────────────────────────────────────────────────────────

    pub fn viewport(&self) -> Viewport {
        self.coordinator
            .session()
            .map(|s| s.viewport())
            .unwrap_or_default()
    }

    /// Adopt the viewport of the current terminal size
    pub fn resize(&mut self, viewport: Viewport) {
        let result = self.coordinator.resize(viewport);
        self.apply(result);
        let (w, h) = viewport.scatter;
        self.cursor = (
            self.cursor.0.min((w as u16).saturating_sub(1)),
            self.cursor.1.min((h as u16).saturating_sub(1)),
        );
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if self
            .status
            .as_ref()
            .is_some_and(|s| s.created_at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.frame % SPINNER.len()]
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            created_at: Instant::now(),
        });
    }

    /// Feed a gesture's redraw into the panel cache
    fn apply(&mut self, result: Result<Redraw, GestureError>) {
        match result {
            Ok(redraw) if redraw.is_empty() => {}
            Ok(redraw) => {
                if let Some(session) = self.coordinator.session() {
                    self.cache.update(
                        session.scene(),
                        redraw,
                        session.viewport(),
                        session.extent(),
                    );
                }
            }
            Err(e) => self.set_status(e.to_string(), true),
        }
    }

    /// Record under the scatter cursor
    pub fn hovered(&self) -> Option<(usize, &Record)> {
        let (x, y) = self.cursor;
        self.coordinator
            .hover(f64::from(x) + 0.5, f64::from(y) + 0.5)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────

    /// Layered dispatch: modal → search input → global → focused panel
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(modal) = &self.modal {
            match modal.handle_input(key.code) {
                ModalAction::None => {}
                ModalAction::Close => self.modal = None,
                ModalAction::Quit => self.should_quit = true,
            }
            return;
        }

        if self.search_input.is_some() {
            self.handle_search_key(key.code);
            return;
        }

        if self.handle_global_key(key) {
            return;
        }

        match self.focus {
            Focus::Histogram(i) => self.handle_histogram_key(i, key.code),
            Focus::Scatter => self.handle_scatter_key(key.code),
            Focus::DateStrip => self.handle_strip_key(Axis::Date, key.code),
            Focus::TimeStrip => self.handle_strip_key(Axis::Time, key.code),
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        let histograms = self.cache.histograms.len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.modal = Some(Modal::Help),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.focus = self.focus.prev(histograms)
            }
            KeyCode::Tab => self.focus = self.focus.next(histograms),
            KeyCode::BackTab => self.focus = self.focus.prev(histograms),
            KeyCode::Char('r') => {
                let result = self.coordinator.reset_filters();
                self.apply(result);
            }
            KeyCode::Char('d') => self.start_load(LoadSource::Demo),
            KeyCode::Char('/') if self.coordinator.is_loaded() => {
                // A new search starts from the capped thread bars
                let result = self.coordinator.clear_search();
                self.apply(result);
                self.search_input = Some(String::new());
                if let Some(i) = self.histogram_position(THREAD) {
                    self.focus = Focus::Histogram(i);
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let Some(input) = self.search_input.as_mut() else {
            return;
        };
        let result = match code {
            KeyCode::Char(c) => {
                input.push(c);
                let term = input.clone();
                self.coordinator.search_threads(&term)
            }
            KeyCode::Backspace => {
                input.pop();
                let term = input.clone();
                self.coordinator.search_threads(&term)
            }
            KeyCode::Enter => {
                self.search_input = None;
                self.coordinator.commit_search()
            }
            KeyCode::Esc => {
                self.search_input = None;
                self.coordinator.clear_search()
            }
            _ => return,
        };
        self.apply(result);
        if let Some(i) = self.histogram_position(THREAD) {
            if let Some(sel) = self.selected.get_mut(i) {
                *sel = 0;
            }
        }
    }

    fn handle_histogram_key(&mut self, i: usize, code: KeyCode) {
        let bars = self.cache.histograms.get(i).map_or(0, |h| h.bars.len());
        let Some(selected) = self.selected.get_mut(i) else {
            return;
        };
        *selected = (*selected).min(bars.saturating_sub(1));

        match code {
            KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(bars.saturating_sub(1))
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let sel = *selected;
                let Some(view) = self.cache.histograms.get(i) else {
                    return;
                };
                let Some(bar) = view.bars.get(sel) else {
                    return;
                };
                let (name, key) = (view.name, bar.key.clone());
                let result = self.coordinator.toggle_bar(name, key);
                self.apply(result);
            }
            KeyCode::Char('c') => {
                let Some(name) = self.cache.histograms.get(i).map(|h| h.name) else {
                    return;
                };
                let result = self.coordinator.colorize(name);
                self.apply(result);
            }
            // Drops a committed thread search
            KeyCode::Esc if self.cache.histograms.get(i).is_some_and(|h| h.searched) => {
                *selected = 0;
                let result = self.coordinator.clear_search();
                self.apply(result);
            }
            _ => {}
        }
    }

    fn handle_scatter_key(&mut self, code: KeyCode) {
        let (w, h) = self.viewport().scatter;
        let (max_x, max_y) = ((w as u16).saturating_sub(1), (h as u16).saturating_sub(1));
        let (x, y) = &mut self.cursor;
        match code {
            KeyCode::Left | KeyCode::Char('h') => *x = x.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => *x = (*x + 1).min(max_x),
            KeyCode::Up | KeyCode::Char('k') => *y = y.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *y = (*y + 1).min(max_y),
            _ => {}
        }
    }

    fn handle_strip_key(&mut self, axis: Axis, code: KeyCode) {
        match code {
            KeyCode::Char('h') => self.nudge_brush(axis, -1.0, 0.0),
            KeyCode::Char('l') => self.nudge_brush(axis, 1.0, 0.0),
            KeyCode::Char('H') => self.nudge_brush(axis, 0.0, -1.0),
            KeyCode::Char('L') => self.nudge_brush(axis, 0.0, 1.0),
            KeyCode::Left => self.nudge_brush(axis, -1.0, -1.0),
            KeyCode::Right => self.nudge_brush(axis, 1.0, 1.0),
            KeyCode::Esc => self.set_brush(axis, None),
            _ => {}
        }
    }

    /// Move the brush edges by whole cells, keeping at least one cell selected
    fn nudge_brush(&mut self, axis: Axis, lower: f64, upper: f64) {
        let Some(session) = self.coordinator.session() else {
            return;
        };
        let viewport = session.viewport();
        let len = match axis {
            Axis::Date => viewport.date_strip,
            Axis::Time => viewport.time_strip,
        };
        if len < 1.0 {
            return;
        }
        let (mut lo, mut hi) = session.brush_extent(axis);

        if lower == upper {
            // Shifts keep the brush width and stop at the ends of the strip
            let shift = lower.max(-lo).min(len - hi);
            if shift == 0.0 {
                return;
            }
            lo += shift;
            hi += shift;
        } else {
            lo = (lo + lower).clamp(0.0, (hi - 1.0).max(0.0));
            hi = (hi + upper).clamp((lo + 1.0).min(len), len);
        }

        let selection = if lo <= 0.0 && hi >= len {
            None
        } else {
            Some((lo, hi))
        };
        self.set_brush(axis, selection);
    }

    fn set_brush(&mut self, axis: Axis, selection: Option<(f64, f64)>) {
        let result = match axis {
            Axis::Date => self.coordinator.brush_date(selection),
            Axis::Time => self.coordinator.brush_time(selection),
        };
        self.apply(result);
    }

    fn histogram_position(&self, name: &str) -> Option<usize> {
        self.cache.histograms.iter().position(|h| h.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use crate::derive::{enrich, TimeBasis};
    use crate::registry::THREAD;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> App {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = App::new(Config::default(), LogBuffer::new(), tx);
        app.resize(Viewport {
            date_strip: 50.0,
            time_strip: 48.0,
            scatter: (50.0, 20.0),
        });
        app.handle_app_event(AppEvent::Loaded {
            source: LoadSource::Demo,
            dataset: enrich(demo::demo_messages(), TimeBasis::Utc),
        });
        app
    }

    fn filtered(app: &App) -> usize {
        app.coordinator.scene().map_or(0, |s| s.filtered)
    }

    #[test]
    fn test_focus_cycle_round_trips() {
        let mut focus = Focus::Histogram(0);
        for _ in 0..10 {
            focus = focus.next(7);
        }
        assert_eq!(focus, Focus::Histogram(0));
        assert_eq!(Focus::Histogram(0).prev(7), Focus::TimeStrip);
        assert_eq!(Focus::Scatter.prev(7), Focus::Histogram(6));
    }

    #[test]
    fn test_loaded_event_fills_cache() {
        let app = loaded_app();
        assert_eq!(app.cache.histograms.len(), 7);
        assert_eq!(app.selected.len(), 7);
        assert_eq!(filtered(&app), demo::DEMO_SIZE);
        assert_eq!(app.source, Some(LoadSource::Demo));
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_space_toggles_selected_bar() {
        let mut app = loaded_app();
        app.handle_key(press(KeyCode::Char(' ')));
        let narrowed = filtered(&app);
        assert!(narrowed < demo::DEMO_SIZE);
        assert!(app.cache.histograms[0].bars[0].clicked);

        app.handle_key(press(KeyCode::Enter));
        assert_eq!(filtered(&app), demo::DEMO_SIZE);
    }

    #[test]
    fn test_brush_keys_narrow_and_clear() {
        let mut app = loaded_app();
        app.focus = Focus::DateStrip;
        for _ in 0..10 {
            app.handle_key(press(KeyCode::Char('l')));
        }
        let session = app.coordinator.session().unwrap();
        assert_eq!(session.brush_extent(Axis::Date), (10.0, 50.0));
        assert_eq!(app.cache.date_strip.brush, Some((10.0, 50.0)));
        assert!(filtered(&app) < demo::DEMO_SIZE);

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(filtered(&app), demo::DEMO_SIZE);
        assert_eq!(app.cache.date_strip.brush, None);
    }

    #[test]
    fn test_shift_keeps_brush_width() {
        let mut app = loaded_app();
        app.focus = Focus::DateStrip;
        // Whole strip: nothing to shift
        app.handle_key(press(KeyCode::Right));
        assert_eq!(filtered(&app), demo::DEMO_SIZE);

        for _ in 0..5 {
            app.handle_key(press(KeyCode::Char('H')));
        }
        for _ in 0..3 {
            app.handle_key(press(KeyCode::Right));
        }
        let session = app.coordinator.session().unwrap();
        assert_eq!(session.brush_extent(Axis::Date), (3.0, 48.0));

        for _ in 0..10 {
            app.handle_key(press(KeyCode::Left));
        }
        let session = app.coordinator.session().unwrap();
        assert_eq!(session.brush_extent(Axis::Date), (0.0, 45.0));
    }

    #[test]
    fn test_brush_edges_never_cross() {
        let mut app = loaded_app();
        app.focus = Focus::TimeStrip;
        for _ in 0..100 {
            app.handle_key(press(KeyCode::Char('H')));
        }
        let (lo, hi) = app
            .coordinator
            .session()
            .unwrap()
            .brush_extent(Axis::Time);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 1.0);
        assert_eq!(app.cache.time_strip.brush, Some((0.0, 1.0)));
    }

    #[test]
    fn test_search_typing_and_escape() {
        let mut app = loaded_app();
        app.handle_key(press(KeyCode::Char('/')));
        assert!(app.search_input.is_some());
        let thread = app.histogram_position(THREAD).unwrap();
        assert_eq!(app.focus, Focus::Histogram(thread));

        for c in "family".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        let view = &app.cache.histograms[thread];
        assert!(view.searched);
        assert_eq!(view.bars.len(), 1);
        // Typing never filters records
        assert_eq!(filtered(&app), demo::DEMO_SIZE);

        app.handle_key(press(KeyCode::Esc));
        assert!(app.search_input.is_none());
        assert!(!app.cache.histograms[thread].searched);
    }

    #[test]
    fn test_committed_search_cleared_by_escape() {
        let mut app = loaded_app();
        let thread = app.histogram_position(THREAD).unwrap();
        app.handle_key(press(KeyCode::Char('/')));
        for c in "family".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Enter));
        assert!(app.search_input.is_none());
        assert!(app.cache.histograms[thread].searched);
        assert_eq!(app.focus, Focus::Histogram(thread));

        app.handle_key(press(KeyCode::Esc));
        let view = &app.cache.histograms[thread];
        assert!(!view.searched);
        assert!(view.bars.len() > 1);
    }

    #[test]
    fn test_reopening_search_drops_old_term() {
        let mut app = loaded_app();
        let thread = app.histogram_position(THREAD).unwrap();
        app.handle_key(press(KeyCode::Char('/')));
        for c in "family".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.cache.histograms[thread].bars.len(), 1);

        app.handle_key(press(KeyCode::Char('/')));
        assert_eq!(app.search_input.as_deref(), Some(""));
        assert!(!app.cache.histograms[thread].searched);
        assert!(app.cache.histograms[thread].bars.len() > 1);
    }

    #[test]
    fn test_colorize_focused_histogram() {
        let mut app = loaded_app();
        app.focus = Focus::Histogram(1);
        app.handle_key(press(KeyCode::Char('c')));
        assert!(app.cache.histograms[1].colorized);
        assert!(app.cache.histograms[1].bars.iter().all(|b| b.color.is_some()));
    }

    #[test]
    fn test_reset_clears_filters() {
        let mut app = loaded_app();
        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Char('r')));
        assert_eq!(filtered(&app), demo::DEMO_SIZE);
    }

    #[test]
    fn test_scatter_cursor_stays_inside() {
        let mut app = loaded_app();
        app.focus = Focus::Scatter;
        for _ in 0..100 {
            app.handle_key(press(KeyCode::Right));
            app.handle_key(press(KeyCode::Down));
        }
        assert_eq!(app.cursor, (49, 19));
    }

    #[test]
    fn test_gestures_before_load_are_ignored() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = App::new(Config::default(), LogBuffer::new(), tx);
        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Char('r')));
        app.handle_key(press(KeyCode::Char('/')));
        assert!(app.search_input.is_none());
        assert!(app.status.is_none());
        assert!(!app.coordinator.is_loaded());
    }

    #[test]
    fn test_load_failure_sets_error_status() {
        let (tx, _rx) = mpsc::channel(4);
        let mut app = App::new(Config::default(), LogBuffer::new(), tx);
        app.modal = Some(Modal::Loading("x".to_string()));
        app.handle_app_event(AppEvent::LoadFailed {
            source: LoadSource::Paths(vec!["x".into()]),
            error: "boom".to_string(),
        });
        assert!(app.modal.is_none());
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_help_modal_absorbs_keys() {
        let mut app = loaded_app();
        app.handle_key(press(KeyCode::Char('?')));
        assert_eq!(app.modal, Some(Modal::Help));
        app.handle_key(press(KeyCode::Char('r')));
        assert!(app.modal.is_none());
        assert!(!app.should_quit);
    }
}
