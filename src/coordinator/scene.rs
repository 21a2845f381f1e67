// Immutable view models handed to renderers
//
// A `Scene` is fully rebuilt inside a coordinator call before it is
// returned, so a renderer never sees a half-applied filter change.

use super::brush::{self, DateExtent, LinearScale};
use super::color::Rgb;
use crate::crossfilter::{GroupEntry, Key};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// One drawable bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub key: Key,
    pub legend: String,
    pub tooltip: String,
    pub value: u64,
    /// Toggled on by the user
    pub clicked: bool,
    /// Palette colour when this histogram colours the scatter
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramView {
    pub name: &'static str,
    pub title: String,
    pub bars: Vec<Bar>,
    /// Bars narrowed by the thread search
    pub searched: bool,
    pub colorized: bool,
}

impl HistogramView {
    /// Largest bar, for scaling bar lengths
    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }

    /// True when any bar is toggled on, i.e. the dimension is filtering
    pub fn is_filtering(&self) -> bool {
        self.bars.iter().any(|b| b.clicked)
    }
}

/// Curve of a density strip plus the brush currently drawn on it
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DensityView {
    pub points: Vec<GroupEntry>,
    /// Brush extent in strip units; `None` spans the full axis
    pub brush: Option<(f64, f64)>,
}

impl DensityView {
    pub fn max_value(&self) -> u64 {
        self.points.iter().map(|p| p.value).max().unwrap_or(0)
    }
}

/// One scatter dot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// Index into the session's record set
    pub record: usize,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub color: Rgb,
}

/// Filtered point cloud and the axis domains it is plotted against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterView {
    pub points: Vec<Point>,
    pub dates: DateExtent,
    pub times: (NaiveTime, NaiveTime),
}

impl ScatterView {
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            dates: DateExtent {
                first: NaiveDate::MIN,
                last: NaiveDate::MIN,
            },
            times: (NaiveTime::MIN, brush::day_end()),
        }
    }

    pub fn x_scale(&self, width: f64) -> LinearScale {
        self.dates.scale(width)
    }

    pub fn y_scale(&self, height: f64) -> LinearScale {
        LinearScale::new(
            (brush::seconds(self.times.0), brush::seconds(self.times.1)),
            (0.0, height),
        )
    }

    /// Position of a point inside a `width` x `height` plot
    pub fn place(&self, point: &Point, width: f64, height: f64) -> (f64, f64) {
        (
            self.x_scale(width).apply(brush::day_number(point.date)),
            self.y_scale(height).apply(brush::seconds(point.time)),
        )
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub histograms: Vec<HistogramView>,
    pub scatter: ScatterView,
    pub date_density: DensityView,
    pub time_density: DensityView,
    pub filtered: usize,
    pub total: usize,
    pub username: Option<String>,
    /// Live thread search term, if any
    pub search: Option<String>,
}

impl Scene {
    pub fn empty() -> Self {
        Self {
            histograms: Vec::new(),
            scatter: ScatterView::empty(),
            date_density: DensityView::default(),
            time_density: DensityView::default(),
            filtered: 0,
            total: 0,
            username: None,
            search: None,
        }
    }

    pub fn histogram(&self, name: &str) -> Option<&HistogramView> {
        self.histograms.iter().find(|h| h.name == name)
    }
}

/// The two brushable axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Date,
    Time,
}

/// Redraw step, in the order renderers must receive them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Step {
    Histograms,
    Scatter,
    DateDensity,
    TimeDensity,
    DateAxis,
    TimeAxis,
}

/// Which parts of the scene a gesture invalidated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Redraw {
    pub histograms: bool,
    pub scatter: bool,
    pub date_density: bool,
    pub time_density: bool,
    pub date_axis: bool,
    pub time_axis: bool,
}

impl Redraw {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            histograms: true,
            scatter: true,
            date_density: true,
            time_density: true,
            date_axis: true,
            time_axis: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps().is_empty()
    }

    /// Flagged steps: histograms, scatter, densities, then axes
    pub fn steps(&self) -> Vec<Step> {
        [
            (self.histograms, Step::Histograms),
            (self.scatter, Step::Scatter),
            (self.date_density, Step::DateDensity),
            (self.time_density, Step::TimeDensity),
            (self.date_axis, Step::DateAxis),
            (self.time_axis, Step::TimeAxis),
        ]
        .into_iter()
        .filter_map(|(on, step)| on.then_some(step))
        .collect()
    }
}

/// Consumer of redraw steps
pub trait Renderer {
    fn histograms(&mut self, views: &[HistogramView]);
    fn scatter(&mut self, view: &ScatterView);
    fn density(&mut self, axis: Axis, view: &DensityView);
    fn axis(&mut self, axis: Axis, scatter: &ScatterView);
}

/// Feed the invalidated parts of `scene` to `renderer` in step order
pub fn render(scene: &Scene, redraw: Redraw, renderer: &mut dyn Renderer) {
    for step in redraw.steps() {
        match step {
            Step::Histograms => renderer.histograms(&scene.histograms),
            Step::Scatter => renderer.scatter(&scene.scatter),
            Step::DateDensity => renderer.density(Axis::Date, &scene.date_density),
            Step::TimeDensity => renderer.density(Axis::Time, &scene.time_density),
            Step::DateAxis => renderer.axis(Axis::Date, &scene.scatter),
            Step::TimeAxis => renderer.axis(Axis::Time, &scene.scatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_follow_redraw_order() {
        let r = Redraw {
            time_axis: true,
            histograms: true,
            date_density: true,
            scatter: true,
            ..Redraw::none()
        };
        assert_eq!(
            r.steps(),
            vec![Step::Histograms, Step::Scatter, Step::DateDensity, Step::TimeAxis]
        );
        assert!(Redraw::none().is_empty());
        assert_eq!(Redraw::all().steps().len(), 6);
    }

    #[test]
    fn test_place_point() {
        let view = ScatterView {
            points: Vec::new(),
            dates: DateExtent {
                first: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                last: NaiveDate::from_ymd_opt(2022, 1, 11).unwrap(),
            },
            times: (NaiveTime::MIN, NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
        };
        let p = Point {
            record: 0,
            date: NaiveDate::from_ymd_opt(2022, 1, 6).unwrap(),
            time: NaiveTime::from_hms_opt(5, 0, 0).unwrap(),
            color: super::super::color::BASE_COLOR,
        };
        assert_eq!(view.place(&p, 100.0, 20.0), (50.0, 10.0));
    }
}
