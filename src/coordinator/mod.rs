// Filter coordinator: gestures in, consistent scenes out
//
// The coordinator owns the loaded `Session` (index, registry, brushes,
// search and colour state) and turns each user gesture into predicate
// changes followed by a redraw in a fixed order:
//
//   histograms → scatter → affected density strips → axes
//
// Every public operation returns only after the `Scene` is fully rebuilt.

pub mod brush;
pub mod color;
pub mod density;
pub mod scene;

pub use scene::{
    render, Axis, Bar, DensityView, HistogramView, Point, Redraw, Renderer, Scene, ScatterView,
};

use crate::crossfilter::{CrossFilter, FilterError, Key, Predicate};
use crate::derive::Dataset;
use crate::model::Record;
use crate::registry::{search_view, Registry, THREAD};
use brush::DateExtent;
use chrono::{NaiveDate, NaiveTime, Timelike};
use color::{ColorScale, BASE_COLOR};
use std::fmt;

/// Scatter hover tolerance, in scatter units on each side
const HOVER_TOLERANCE: f64 = 2.0;

/// Errors from a gesture that names something the session doesn't have
#[derive(Debug, Clone, PartialEq)]
pub enum GestureError {
    UnknownHistogram(String),
    UnknownKey { histogram: String, key: Key },
    Filter(FilterError),
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHistogram(name) => write!(f, "Unknown histogram '{}'", name),
            Self::UnknownKey { histogram, key } => {
                write!(f, "Histogram '{}' has no key '{}'", histogram, key)
            }
            Self::Filter(e) => write!(f, "Filter error: {}", e),
        }
    }
}

impl std::error::Error for GestureError {}

impl From<FilterError> for GestureError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

/// Sizes of the brushable strips and the scatter, in gesture units
///
/// The TUI uses terminal cells; tests use round numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub date_strip: f64,
    pub time_strip: f64,
    pub scatter: (f64, f64),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            date_strip: 100.0,
            time_strip: 100.0,
            scatter: (100.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ThreadSearch {
    term: String,
    /// Input still open (not yet committed with Enter)
    editing: bool,
}

/// One loaded record set and all interaction state over it
pub struct Session {
    index: CrossFilter<Record>,
    registry: Registry,
    username: Option<String>,
    extent: Option<DateExtent>,
    viewport: Viewport,
    /// Brush extents in strip units, as last set by the user
    date_brush: Option<(f64, f64)>,
    time_brush: Option<(f64, f64)>,
    date_range: Option<(NaiveDate, NaiveDate)>,
    time_range: Option<(NaiveTime, NaiveTime)>,
    search: Option<ThreadSearch>,
    colors: ColorScale,
    scene: Scene,
}

impl Session {
    /// Index a dataset and render the unfiltered scene
    pub fn new(dataset: Dataset, top_n: usize, viewport: Viewport) -> Result<Self, GestureError> {
        let extent = DateExtent::of(dataset.records.iter().map(|r| r.date));
        let mut index = CrossFilter::new(dataset.records);
        let registry = Registry::build(&mut index, top_n)?;

        let mut session = Self {
            index,
            registry,
            username: dataset.username,
            extent,
            viewport,
            date_brush: None,
            time_brush: None,
            date_range: None,
            time_range: None,
            search: None,
            colors: ColorScale::default(),
            scene: Scene::empty(),
        };
        session.refresh(Redraw::all())?;
        Ok(session)
    }

    /// Re-index a new dataset in place, dropping every gesture state
    pub fn reload(&mut self, dataset: Dataset, top_n: usize) -> Result<(), GestureError> {
        self.extent = DateExtent::of(dataset.records.iter().map(|r| r.date));
        self.index.rebuild(dataset.records);
        self.registry = Registry::build(&mut self.index, top_n)?;
        self.username = dataset.username;
        self.date_brush = None;
        self.time_brush = None;
        self.date_range = None;
        self.time_range = None;
        self.search = None;
        self.colors = ColorScale::default();
        self.scene = Scene::empty();
        self.refresh(Redraw::all())?;
        Ok(())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[cfg(test)]
    pub fn records(&self) -> &[Record] {
        self.index.records()
    }

    #[cfg(test)]
    pub fn index(&self) -> &CrossFilter<Record> {
        &self.index
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// First and last record dates; `None` for an empty session
    pub fn extent(&self) -> Option<DateExtent> {
        self.extent
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the thread search input is open
    #[cfg(test)]
    pub fn is_searching(&self) -> bool {
        self.search.as_ref().is_some_and(|s| s.editing)
    }

    /// Current brush extent on `axis`; the whole strip when unbrushed
    pub fn brush_extent(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::Date => self.date_brush.unwrap_or((0.0, self.viewport.date_strip)),
            Axis::Time => self.time_brush.unwrap_or((0.0, self.viewport.time_strip)),
        }
    }

    /// Toggle one bar of a histogram on or off
    pub fn toggle_bar(&mut self, histogram: &str, key: Key) -> Result<Redraw, GestureError> {
        let h = self
            .registry
            .get_mut(histogram)
            .ok_or_else(|| GestureError::UnknownHistogram(histogram.to_string()))?;

        if self.index.records_with_key(h.dimension, &key)?.is_empty() {
            return Err(GestureError::UnknownKey {
                histogram: histogram.to_string(),
                key,
            });
        }

        if !h.clicked.remove(&key) {
            h.clicked.insert(key);
        }
        let predicate = if h.clicked.is_empty() {
            Predicate::All
        } else {
            Predicate::Keys(h.clicked.clone())
        };
        tracing::debug!("{}: {} bar(s) selected", histogram, h.clicked.len());
        self.index.set_filter(h.dimension, predicate)?;

        self.refresh(Redraw {
            histograms: true,
            scatter: true,
            date_density: true,
            time_density: true,
            ..Redraw::none()
        })
    }

    /// Brush the date strip; `None` selects the whole axis
    pub fn brush_date(&mut self, selection: Option<(f64, f64)>) -> Result<Redraw, GestureError> {
        match (selection, self.extent) {
            (Some(px), Some(extent)) => {
                let (lo, hi) = extent.invert(px, self.viewport.date_strip);
                self.index.filter_range(self.registry.date, lo, hi)?;
                self.date_range = Some((lo, hi));
                self.date_brush = Some(clamp_extent(px, self.viewport.date_strip));
                tracing::debug!("Date brush: {} to {}", lo, hi);
            }
            _ => {
                self.index.filter_all(self.registry.date)?;
                self.date_range = None;
                self.date_brush = None;
            }
        }

        // The date strip itself is left alone: its own filter can't change it
        self.refresh(Redraw {
            histograms: true,
            scatter: true,
            time_density: true,
            date_axis: true,
            ..Redraw::none()
        })
    }

    /// Brush the time strip; `None` selects the whole axis
    pub fn brush_time(&mut self, selection: Option<(f64, f64)>) -> Result<Redraw, GestureError> {
        match selection {
            Some(px) => {
                let (lo, hi) = brush::invert_time(px, self.viewport.time_strip);
                self.index.filter_range(self.registry.time, lo, hi)?;
                self.time_range = Some((lo, hi));
                self.time_brush = Some(clamp_extent(px, self.viewport.time_strip));
                tracing::debug!("Time brush: {} to {}", lo, hi);
            }
            None => {
                self.index.filter_all(self.registry.time)?;
                self.time_range = None;
                self.time_brush = None;
            }
        }

        self.refresh(Redraw {
            histograms: true,
            scatter: true,
            date_density: true,
            time_axis: true,
            ..Redraw::none()
        })
    }

    /// Narrow the displayed thread bars; an empty term clears the search
    pub fn search_threads(&mut self, term: &str) -> Result<Redraw, GestureError> {
        if term.trim().is_empty() {
            return self.clear_search();
        }
        self.search = Some(ThreadSearch {
            term: term.to_string(),
            editing: true,
        });
        self.refresh(Redraw {
            histograms: true,
            ..Redraw::none()
        })
    }

    /// Close the search input, keeping the narrowed bars
    pub fn commit_search(&mut self) -> Result<Redraw, GestureError> {
        if let Some(search) = &mut self.search {
            search.editing = false;
        }
        Ok(Redraw::none())
    }

    /// Drop the search and restore the capped thread bars
    pub fn clear_search(&mut self) -> Result<Redraw, GestureError> {
        self.search = None;
        self.refresh(Redraw {
            histograms: true,
            ..Redraw::none()
        })
    }

    /// Colour the scatter by a histogram's displayed keys, or clear it
    ///
    /// Picking the histogram that is already colorized turns colouring off.
    pub fn colorize(&mut self, histogram: &str) -> Result<Redraw, GestureError> {
        let pos = self
            .registry
            .position(histogram)
            .ok_or_else(|| GestureError::UnknownHistogram(histogram.to_string()))?;

        let was_colorized = self.registry.histograms[pos].colorized;
        for h in &mut self.registry.histograms {
            h.colorized = false;
        }

        if was_colorized {
            self.colors = ColorScale::default();
            tracing::debug!("Colorization cleared");
        } else {
            let domain: Vec<Key> = self
                .scene
                .histogram(histogram)
                .map(|view| view.bars.iter().map(|b| b.key.clone()).collect())
                .unwrap_or_default();
            tracing::debug!("Colorizing by {} ({} keys)", histogram, domain.len());
            self.colors = ColorScale::new(domain);
            self.registry.histograms[pos].colorized = true;
        }

        self.refresh(Redraw {
            histograms: true,
            scatter: true,
            ..Redraw::none()
        })
    }

    /// Clear every selection, predicate, brush and the thread search
    pub fn reset_filters(&mut self) -> Result<Redraw, GestureError> {
        for h in &mut self.registry.histograms {
            h.clicked.clear();
            self.index.filter_all(h.dimension)?;
        }
        self.index.filter_all(self.registry.date)?;
        self.index.filter_all(self.registry.time)?;
        self.date_brush = None;
        self.time_brush = None;
        self.date_range = None;
        self.time_range = None;
        self.search = None;
        tracing::info!("Filters reset");
        self.refresh(Redraw::all())
    }

    /// Adopt new strip sizes, rescaling brushes to keep their position
    pub fn resize(&mut self, viewport: Viewport) -> Result<Redraw, GestureError> {
        let old = self.viewport;
        if old == viewport {
            return Ok(Redraw::none());
        }
        self.date_brush = self
            .date_brush
            .map(|e| rescale(e, old.date_strip, viewport.date_strip));
        self.time_brush = self
            .time_brush
            .map(|e| rescale(e, old.time_strip, viewport.time_strip));
        self.viewport = viewport;
        self.refresh(Redraw::all())
    }

    /// First passing record near a scatter position
    ///
    /// Scans the filtered records without touching any predicate.
    pub fn hover(&self, x: f64, y: f64) -> Option<(usize, &Record)> {
        let (width, height) = self.viewport.scatter;
        let xs = self.scene.scatter.x_scale(width);
        let ys = self.scene.scatter.y_scale(height);

        let first_day = xs.invert(x - HOVER_TOLERANCE).floor();
        let last_day = xs.invert(x + HOVER_TOLERANCE).ceil();
        let first_sec = ys.invert(y - HOVER_TOLERANCE);
        let last_sec = ys.invert(y + HOVER_TOLERANCE);

        self.index
            .records()
            .iter()
            .enumerate()
            .filter(|(i, _)| self.index.is_passing(*i))
            .find(|(_, r)| {
                let day = brush::day_number(r.date);
                let sec = brush::seconds(r.time_seconds);
                (first_day..=last_day).contains(&day) && (first_sec..=last_sec).contains(&sec)
            })
    }

    /// Rebuild the invalidated parts of the scene, in redraw order
    fn refresh(&mut self, redraw: Redraw) -> Result<Redraw, GestureError> {
        if redraw.histograms {
            self.scene.histograms = self.histogram_views()?;
        }
        if redraw.scatter {
            self.scene.scatter = self.scatter_view();
        }
        if redraw.date_density {
            let days = self.index.group(self.registry.date)?.all();
            self.scene.date_density.points = density::weekly(&days);
        }
        if redraw.time_density {
            let minutes = self.index.group(self.registry.time)?.all();
            self.scene.time_density.points = density::nonzero(&minutes);
        }
        if redraw.date_axis {
            self.scene.scatter.dates = self.date_domain();
        }
        if redraw.time_axis {
            self.scene.scatter.times = self.time_domain();
        }

        // Brush handles move even when their strip's curve is unchanged
        self.scene.date_density.brush = self.date_brush;
        self.scene.time_density.brush = self.time_brush;
        self.scene.filtered = self.index.filtered_count();
        self.scene.total = self.index.size();
        self.scene.username = self.username.clone();
        self.scene.search = self.search.as_ref().map(|s| s.term.clone());
        Ok(redraw)
    }

    fn histogram_views(&self) -> Result<Vec<HistogramView>, FilterError> {
        let mut views = Vec::with_capacity(self.registry.histograms.len());
        for h in &self.registry.histograms {
            let search = match &self.search {
                Some(s) if h.name() == THREAD => Some(s.term.as_str()),
                _ => None,
            };
            let entries = match search {
                Some(term) => search_view(&self.index.group(h.dimension)?.all(), term),
                None => h.bars(&self.index)?,
            };

            let bars = entries
                .into_iter()
                .map(|e| Bar {
                    legend: h.legend(&e.key),
                    tooltip: h.tooltip(&e.key),
                    clicked: h.clicked.contains(&e.key),
                    color: if h.colorized {
                        self.colors.color_of(&e.key)
                    } else {
                        None
                    },
                    key: e.key,
                    value: e.value,
                })
                .collect();

            views.push(HistogramView {
                name: h.name(),
                title: h.spec.title.clone(),
                bars,
                searched: search.is_some(),
                colorized: h.colorized,
            });
        }
        Ok(views)
    }

    fn scatter_view(&self) -> ScatterView {
        let colorized = self.registry.colorized();
        let records = self.index.records();
        let points = self
            .index
            .filtered_indices()
            .into_iter()
            .map(|i| {
                let r = &records[i];
                let color = colorized
                    .and_then(|h| self.colors.color_of(&h.project(r)))
                    .unwrap_or(BASE_COLOR);
                Point {
                    record: i,
                    date: r.date,
                    time: r.time_seconds,
                    color,
                }
            })
            .collect();

        ScatterView {
            points,
            dates: self.date_domain(),
            times: self.time_domain(),
        }
    }

    /// Scatter x domain: the brushed dates, else every date
    fn date_domain(&self) -> DateExtent {
        match (self.date_range, self.extent) {
            (Some((first, last)), _) => DateExtent { first, last },
            (None, Some(extent)) => extent,
            (None, None) => ScatterView::empty().dates,
        }
    }

    /// Scatter y domain: the brushed minutes (through their last second), else the day
    fn time_domain(&self) -> (NaiveTime, NaiveTime) {
        match self.time_range {
            Some((lo, hi)) => (lo, hi.with_second(59).unwrap_or(hi)),
            None => (NaiveTime::MIN, brush::day_end()),
        }
    }
}

fn clamp_extent((a, b): (f64, f64), len: f64) -> (f64, f64) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo.clamp(0.0, len), hi.clamp(0.0, len))
}

fn rescale((a, b): (f64, f64), from: f64, to: f64) -> (f64, f64) {
    if from <= 0.0 {
        return (0.0, to);
    }
    (a / from * to, b / from * to)
}

/// Owner of the optional session; gestures before the first load are no-ops
pub struct FilterCoordinator {
    session: Option<Session>,
    top_n: usize,
    viewport: Viewport,
}

impl FilterCoordinator {
    pub fn new(top_n: usize) -> Self {
        Self {
            session: None,
            top_n,
            viewport: Viewport::default(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.session.as_ref().map(Session::scene)
    }

    /// Discard the index and registry and rebuild them for a new dataset
    pub fn reload(&mut self, dataset: Dataset) -> Result<Redraw, GestureError> {
        let count = dataset.records.len();
        match &mut self.session {
            Some(session) => {
                if let Err(e) = session.reload(dataset, self.top_n) {
                    self.session = None;
                    return Err(e);
                }
            }
            None => self.session = Some(Session::new(dataset, self.top_n, self.viewport)?),
        }
        tracing::info!(
            "Loaded {} messages (user: {})",
            count,
            self.session
                .as_ref()
                .and_then(Session::username)
                .unwrap_or("unknown")
        );
        Ok(Redraw::all())
    }

    /// Remember the viewport for later loads; resizing is not a gesture
    pub fn resize(&mut self, viewport: Viewport) -> Result<Redraw, GestureError> {
        self.viewport = viewport;
        match &mut self.session {
            Some(session) => session.resize(viewport),
            None => Ok(Redraw::none()),
        }
    }

    pub fn toggle_bar(&mut self, histogram: &str, key: Key) -> Result<Redraw, GestureError> {
        self.with_session("toggle_bar", |s| s.toggle_bar(histogram, key))
    }

    pub fn brush_date(&mut self, selection: Option<(f64, f64)>) -> Result<Redraw, GestureError> {
        self.with_session("brush_date", |s| s.brush_date(selection))
    }

    pub fn brush_time(&mut self, selection: Option<(f64, f64)>) -> Result<Redraw, GestureError> {
        self.with_session("brush_time", |s| s.brush_time(selection))
    }

    pub fn search_threads(&mut self, term: &str) -> Result<Redraw, GestureError> {
        self.with_session("search_threads", |s| s.search_threads(term))
    }

    pub fn commit_search(&mut self) -> Result<Redraw, GestureError> {
        self.with_session("commit_search", |s| s.commit_search())
    }

    pub fn clear_search(&mut self) -> Result<Redraw, GestureError> {
        self.with_session("clear_search", |s| s.clear_search())
    }

    pub fn colorize(&mut self, histogram: &str) -> Result<Redraw, GestureError> {
        self.with_session("colorize", |s| s.colorize(histogram))
    }

    pub fn reset_filters(&mut self) -> Result<Redraw, GestureError> {
        self.with_session("reset_filters", |s| s.reset_filters())
    }

    pub fn hover(&self, x: f64, y: f64) -> Option<(usize, &Record)> {
        self.session.as_ref().and_then(|s| s.hover(x, y))
    }

    fn with_session<F>(&mut self, gesture: &str, f: F) -> Result<Redraw, GestureError>
    where
        F: FnOnce(&mut Session) -> Result<Redraw, GestureError>,
    {
        match &mut self.session {
            None => {
                tracing::debug!("Ignoring {} before any data is loaded", gesture);
                Ok(Redraw::none())
            }
            Some(session) => f(session).inspect_err(|e| {
                tracing::warn!("{} failed: {}", gesture, e);
            }),
        }
    }
}
