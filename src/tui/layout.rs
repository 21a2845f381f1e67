/// Screen layout and responsive breakpoints.
///
/// Single source of truth for where each panel goes; the viewport handed
/// to the coordinator is derived from the same rectangles that get drawn.
use crate::coordinator::Viewport;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    /// < 60 cols: Split pane, minimal terminal
    Compact,
    /// 60-99 cols: Half-screen
    Normal,
    /// 100-139 cols: Full terminal
    Wide,
    /// 140+ cols: Ultrawide monitor
    UltraWide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            100..=139 => Breakpoint::Wide,
            _ => Breakpoint::UltraWide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        self.ordinal() >= min.ordinal()
    }

    fn ordinal(&self) -> u8 {
        match self {
            Breakpoint::Compact => 0,
            Breakpoint::Normal => 1,
            Breakpoint::Wide => 2,
            Breakpoint::UltraWide => 3,
        }
    }
}

/// Height of each density strip, borders included
const STRIP_HEIGHT: u16 = 4;
const DETAIL_HEIGHT: u16 = 6;
const LOGS_HEIGHT: u16 = 7;

/// Where every panel goes for one terminal size
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLayout {
    pub title: Rect,
    /// One area per histogram, in display order
    pub histograms: Vec<Rect>,
    pub scatter: Rect,
    pub date_strip: Rect,
    pub time_strip: Rect,
    pub detail: Rect,
    pub logs: Option<Rect>,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn new(area: Rect, histograms: usize) -> Self {
        let bp = Breakpoint::from_width(area.width);
        let show_logs = bp.at_least(Breakpoint::Normal) && area.height >= 40;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(if show_logs { LOGS_HEIGHT } else { 0 }),
                Constraint::Length(2),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if bp.at_least(Breakpoint::UltraWide) {
                [Constraint::Percentage(40), Constraint::Percentage(60)]
            } else {
                [Constraint::Percentage(50), Constraint::Percentage(50)]
            })
            .split(rows[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(STRIP_HEIGHT),
                Constraint::Length(STRIP_HEIGHT),
                Constraint::Length(DETAIL_HEIGHT),
            ])
            .split(body[1]);

        let columns = if bp.at_least(Breakpoint::Wide) { 2 } else { 1 };

        Self {
            title: rows[0],
            histograms: grid(body[0], histograms, columns),
            scatter: right[0],
            date_strip: right[1],
            time_strip: right[2],
            detail: right[3],
            logs: show_logs.then_some(rows[2]),
            status: rows[3],
        }
    }

    /// Gesture units for the coordinator: inner cells of the strips and scatter
    pub fn viewport(&self) -> Viewport {
        let scatter = inner(self.scatter);
        Viewport {
            date_strip: f64::from(inner(self.date_strip).width),
            time_strip: f64::from(inner(self.time_strip).width),
            scatter: (f64::from(scatter.width), f64::from(scatter.height)),
        }
    }
}

/// Area inside a bordered block
pub fn inner(area: Rect) -> Rect {
    area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    })
}

/// Split `area` into `n` panels, filled column by column
fn grid(area: Rect, n: usize, columns: usize) -> Vec<Rect> {
    if n == 0 {
        return Vec::new();
    }
    let columns = columns.clamp(1, n);
    let per_column = n.div_ceil(columns);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(area);

    let mut areas = Vec::with_capacity(n);
    for (c, col) in cols.iter().enumerate() {
        let count = per_column.min(n - c * per_column);
        let cells = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, count as u32); count])
            .split(*col);
        areas.extend(cells.iter().copied());
    }
    areas
}
