// Per-panel drawing data, rebuilt step by step as the coordinator redraws
//
// ratatui draws every frame from scratch, but placing thousands of points
// and binning the density strips only has to happen when a gesture
// invalidates them. `PanelCache` is the TUI's `Renderer`: it receives the
// redraw steps and keeps cell-level data the widgets read each frame.

use super::theme;
use crate::coordinator::brush::{self, DateExtent};
use crate::coordinator::{
    render, Axis, DensityView, HistogramView, Redraw, Renderer, ScatterView, Scene, Viewport,
};
use crate::crossfilter::{GroupEntry, Key};
use ratatui::style::Color;
use std::collections::HashMap;

/// One occupied cell of the scatter plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub col: u16,
    pub row: u16,
    pub color: Color,
}

/// Binned density strip, one value per column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strip {
    pub columns: Vec<f64>,
    /// Brushed columns, as a cell extent
    pub brush: Option<(f64, f64)>,
}

impl Strip {
    pub fn max(&self) -> f64 {
        self.columns.iter().copied().fold(0.0, f64::max)
    }
}

#[derive(Debug, Default)]
pub struct PanelCache {
    viewport: Viewport,
    extent: Option<DateExtent>,
    pub histograms: Vec<HistogramView>,
    pub cells: Vec<Cell>,
    pub points: usize,
    pub date_strip: Strip,
    pub time_strip: Strip,
    pub date_labels: (String, String),
    pub time_labels: (String, String),
}

impl PanelCache {
    /// Apply a redraw from the coordinator
    ///
    /// `extent` is the full date range the date strip spans.
    pub fn update(
        &mut self,
        scene: &Scene,
        redraw: Redraw,
        viewport: Viewport,
        extent: Option<DateExtent>,
    ) {
        self.viewport = viewport;
        self.extent = extent;
        render(scene, redraw, self);
        // A brushed strip's curve is not redrawn, but its brush always is
        self.date_strip.brush = scene.date_density.brush;
        self.time_strip.brush = scene.time_density.brush;
    }
}

impl Renderer for PanelCache {
    fn histograms(&mut self, views: &[HistogramView]) {
        self.histograms = views.to_vec();
    }

    fn scatter(&mut self, view: &ScatterView) {
        let (width, height) = self.viewport.scatter;
        self.points = view.points.len();
        self.cells = place_cells(view, width, height);
    }

    fn density(&mut self, axis: Axis, view: &DensityView) {
        match axis {
            Axis::Date => {
                self.date_strip = Strip {
                    columns: bin_weeks(&view.points, self.extent, self.viewport.date_strip),
                    brush: view.brush,
                }
            }
            Axis::Time => {
                self.time_strip = Strip {
                    columns: bin_minutes(&view.points, self.viewport.time_strip),
                    brush: view.brush,
                }
            }
        }
    }

    fn axis(&mut self, axis: Axis, scatter: &ScatterView) {
        match axis {
            Axis::Date => {
                self.date_labels = (
                    scatter.dates.first.format("%Y-%m-%d").to_string(),
                    scatter.dates.last.format("%Y-%m-%d").to_string(),
                )
            }
            Axis::Time => {
                self.time_labels = (
                    scatter.times.0.format("%H:%M").to_string(),
                    scatter.times.1.format("%H:%M").to_string(),
                )
            }
        }
    }
}

fn cell_index(pos: f64, len: f64) -> Option<usize> {
    if len < 1.0 || !pos.is_finite() {
        return None;
    }
    Some(pos.floor().clamp(0.0, len - 1.0) as usize)
}

/// One cell per occupied position; later points paint over earlier ones
fn place_cells(view: &ScatterView, width: f64, height: f64) -> Vec<Cell> {
    let mut cells: HashMap<(u16, u16), Color> = HashMap::new();
    for point in &view.points {
        let (x, y) = view.place(point, width, height);
        if let (Some(col), Some(row)) = (cell_index(x, width), cell_index(y, height)) {
            cells.insert((col as u16, row as u16), theme::color(point.color));
        }
    }
    let mut cells: Vec<Cell> = cells
        .into_iter()
        .map(|((col, row), color)| Cell { col, row, color })
        .collect();
    cells.sort_by_key(|c| (c.row, c.col));
    cells
}

/// Spread each week's count over its seven days, then bin days into columns
fn bin_weeks(weeks: &[GroupEntry], extent: Option<DateExtent>, width: f64) -> Vec<f64> {
    let mut columns = vec![0.0; width.max(0.0) as usize];
    let Some(extent) = extent else {
        return columns;
    };
    let scale = extent.scale(width);
    for week in weeks {
        let Key::Date(monday) = week.key else {
            continue;
        };
        for offset in 0..7 {
            let day = brush::add_days(monday, offset);
            if day < extent.first || day > extent.last {
                continue;
            }
            if let Some(col) = cell_index(scale.apply(brush::day_number(day)), width) {
                columns[col] += week.value as f64 / 7.0;
            }
        }
    }
    columns
}

fn bin_minutes(minutes: &[GroupEntry], width: f64) -> Vec<f64> {
    let mut columns = vec![0.0; width.max(0.0) as usize];
    let scale = brush::time_scale(width);
    for minute in minutes {
        let Key::Time(t) = minute.key else {
            continue;
        };
        if let Some(col) = cell_index(scale.apply(brush::seconds(t)), width) {
            columns[col] += minute.value as f64;
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::Session;
    use crate::derive::{enrich, TimeBasis};
    use crate::model::{Media, RawMessage};
    use chrono::{NaiveDate, NaiveTime};

    fn session() -> Session {
        let raw = vec![
            RawMessage::new("Ana", 1_666_692_232.0, "Trip", 2, Media::None, "hello"),
            RawMessage::new("Ben", 1_666_735_200.0, "Trip", 2, Media::None, "late"),
            RawMessage::new("Ana", 1_667_297_032.0, "Work", 3, Media::None, "ok"),
        ];
        let viewport = Viewport {
            date_strip: 20.0,
            time_strip: 24.0,
            scatter: (20.0, 10.0),
        };
        Session::new(enrich(raw, TimeBasis::Utc), 20, viewport).unwrap()
    }

    fn cache_for(session: &Session) -> PanelCache {
        let mut cache = PanelCache::default();
        cache.update(
            session.scene(),
            Redraw::all(),
            session.viewport(),
            session.extent(),
        );
        cache
    }

    #[test]
    fn test_full_redraw_fills_every_panel() {
        let session = session();
        let cache = cache_for(&session);
        assert_eq!(cache.histograms.len(), 7);
        assert_eq!(cache.points, 3);
        assert_eq!(cache.date_strip.columns.len(), 20);
        assert_eq!(cache.time_strip.columns.len(), 24);
        assert_eq!(cache.date_labels.0, "2022-10-25");
        assert_eq!(cache.time_labels, ("00:00".to_string(), "23:59".to_string()));
    }

    #[test]
    fn test_density_totals_survive_binning() {
        let cache = cache_for(&session());
        let time_total: f64 = cache.time_strip.columns.iter().sum();
        assert_eq!(time_total, 3.0);
        // Days of a week outside the extent are dropped, so at most the total
        let date_total: f64 = cache.date_strip.columns.iter().sum();
        assert!(date_total > 0.0 && date_total <= 3.0);
    }

    #[test]
    fn test_minutes_land_in_hour_columns() {
        let minutes = vec![GroupEntry {
            key: Key::Time(NaiveTime::from_hms_opt(22, 0, 0).unwrap()),
            value: 4,
        }];
        let columns = bin_minutes(&minutes, 24.0);
        assert_eq!(columns[21] + columns[22], 4.0);
    }

    #[test]
    fn test_cells_stay_inside_plot() {
        let cache = cache_for(&session());
        assert!(!cache.cells.is_empty());
        assert!(cache.cells.iter().all(|c| c.col < 20 && c.row < 10));
    }

    #[test]
    fn test_partial_redraw_leaves_other_panels() {
        let session = session();
        let mut cache = cache_for(&session);
        cache.date_labels = ("stale".to_string(), "stale".to_string());
        cache.update(
            session.scene(),
            Redraw {
                histograms: true,
                ..Redraw::none()
            },
            session.viewport(),
            session.extent(),
        );
        assert_eq!(cache.date_labels.0, "stale");
    }

    #[test]
    fn test_brush_follows_scene_without_density_step() {
        let mut session = session();
        let mut cache = cache_for(&session);
        let redraw = session.brush_date(Some((5.0, 15.0))).unwrap();
        assert!(!redraw.date_density);
        cache.update(session.scene(), redraw, session.viewport(), session.extent());
        assert_eq!(cache.date_strip.brush, Some((5.0, 15.0)));

        let redraw = session.brush_date(None).unwrap();
        cache.update(session.scene(), redraw, session.viewport(), session.extent());
        assert_eq!(cache.date_strip.brush, None);
    }

    #[test]
    fn test_empty_extent_gives_flat_strip() {
        let weeks = vec![GroupEntry {
            key: Key::Date(NaiveDate::from_ymd_opt(2022, 10, 24).unwrap()),
            value: 7,
        }];
        assert!(bin_weeks(&weeks, None, 10.0).iter().all(|c| *c == 0.0));
    }
}
