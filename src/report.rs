// Headless report: the explorer's aggregates without a terminal UI
//
// The text form is another `Renderer`, fed the same redraw steps the TUI
// gets. The JSON form serializes the aggregates directly.

use crate::coordinator::{
    render, Axis, DensityView, HistogramView, Redraw, Renderer, ScatterView, Session, Viewport,
};
use crate::crossfilter::{GroupEntry, Key};
use crate::derive::Dataset;
use crate::util::fit_width;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use std::fmt::Write;

/// Width of the longest bar in the text report
const BAR_WIDTH: usize = 40;
/// Width of the legend column
const LEGEND_WIDTH: usize = 18;

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Aggregates of one dataset, unfiltered
#[derive(Debug, Serialize)]
pub struct Report {
    pub total: usize,
    pub username: Option<String>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub histograms: Vec<HistogramView>,
    /// Messages per ISO week, keyed by the week's Monday
    pub weekly: Vec<GroupEntry>,
    /// Messages per minute of day, empty minutes omitted
    pub per_minute: Vec<GroupEntry>,
}

impl Report {
    pub fn build(dataset: Dataset, top_n: usize) -> Result<Self> {
        let session = Session::new(dataset, top_n, Viewport::default())
            .context("Failed to index messages")?;
        let scene = session.scene();
        let (first_date, last_date) = if scene.total == 0 {
            (None, None)
        } else {
            (
                Some(scene.scatter.dates.first),
                Some(scene.scatter.dates.last),
            )
        };

        Ok(Self {
            total: scene.total,
            username: scene.username.clone(),
            first_date,
            last_date,
            histograms: scene.histograms.clone(),
            weekly: scene.date_density.points.clone(),
            per_minute: scene.time_density.points.clone(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}

/// Plain-text rendering of a session's scene
pub fn text(session: &Session) -> String {
    let scene = session.scene();
    let mut out = TextRenderer::default();

    let _ = writeln!(
        out.buf,
        "{} messages{}",
        scene.total,
        scene
            .username
            .as_deref()
            .map(|u| format!(" (owner: {})", u))
            .unwrap_or_default()
    );
    render(scene, Redraw::all(), &mut out);
    out.finish()
}

/// Collects the report; each density section holds its own axis range
#[derive(Default)]
struct TextRenderer {
    buf: String,
    date: String,
    time: String,
}

impl TextRenderer {
    fn section(&mut self, axis: Axis) -> &mut String {
        match axis {
            Axis::Date => &mut self.date,
            Axis::Time => &mut self.time,
        }
    }

    fn finish(mut self) -> String {
        self.buf.push_str(&self.date);
        self.buf.push_str(&self.time);
        self.buf
    }

    fn histogram(&mut self, view: &HistogramView) {
        let _ = writeln!(self.buf, "\n{}", view.title);
        let max = view.max_value().max(1);
        for bar in &view.bars {
            let len = (bar.value as usize * BAR_WIDTH).div_ceil(max as usize);
            let _ = writeln!(
                self.buf,
                "  {} {:>7} {}",
                fit_width(&bar.legend, LEGEND_WIDTH),
                bar.value,
                "█".repeat(len)
            );
        }
    }
}

impl Renderer for TextRenderer {
    fn histograms(&mut self, views: &[HistogramView]) {
        for view in views {
            self.histogram(view);
        }
    }

    fn scatter(&mut self, view: &ScatterView) {
        let _ = writeln!(self.buf, "\nMessages by date and time: {} points", view.points.len());
    }

    fn density(&mut self, axis: Axis, view: &DensityView) {
        let out = self.section(axis);
        match axis {
            Axis::Date => {
                let _ = writeln!(out, "\nWeekly activity");
                let _ = writeln!(out, "  {}", sparkline(&view.points, view.max_value()));
            }
            Axis::Time => {
                let hours = hourly(&view.points);
                let max = hours.iter().map(|h| h.value).max().unwrap_or(0);
                let _ = writeln!(out, "\nActivity by hour (00-23)");
                let _ = writeln!(out, "  {}", sparkline(&hours, max));
            }
        }
    }

    fn axis(&mut self, axis: Axis, scatter: &ScatterView) {
        let out = self.section(axis);
        let _ = match axis {
            Axis::Date => writeln!(
                out,
                "  {} .. {}",
                scatter.dates.first.format("%Y-%m-%d"),
                scatter.dates.last.format("%Y-%m-%d")
            ),
            Axis::Time => writeln!(
                out,
                "  {} .. {}",
                scatter.times.0.format("%H:%M"),
                scatter.times.1.format("%H:%M")
            ),
        };
    }
}

/// Fold per-minute counts into 24 hourly counts
fn hourly(minutes: &[GroupEntry]) -> Vec<GroupEntry> {
    let mut hours = [0u64; 24];
    for entry in minutes {
        if let Key::Time(t) = entry.key {
            hours[t.hour() as usize] += entry.value;
        }
    }
    hours
        .iter()
        .enumerate()
        .map(|(h, &value)| GroupEntry {
            key: Key::Int(h as i64),
            value,
        })
        .collect()
}

/// One spark per point, scaled to `max`
fn sparkline(points: &[GroupEntry], max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    points
        .iter()
        .map(|p| {
            if p.value == 0 {
                ' '
            } else {
                let level = (p.value * (SPARKS.len() as u64 - 1)).div_ceil(max) as usize;
                SPARKS[level.min(SPARKS.len() - 1)]
            }
        })
        .collect()
}
