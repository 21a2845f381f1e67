// Dimension registry: one histogram per visualized attribute
//
// Each histogram binds a projection over `Record` to a cross-filter
// dimension, plus the label functions renderers use and the set of bars
// the user has toggled on. The registry also owns the date and time
// dimensions that back the brushes and density strips.

pub mod buckets;

use crate::crossfilter::{sort_by_count, CrossFilter, DimensionId, FilterError, GroupEntry, Key};
use crate::model::Record;
use crate::util::truncate_chars;
use chrono::Datelike;
use std::collections::BTreeSet;

/// Dimension names for the brushable axes
pub const DATE_DIMENSION: &str = "date";
pub const TIME_DIMENSION: &str = "time";

/// Histogram name for the searchable thread panel
pub const THREAD: &str = "thread";

const DAY_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const DAY_LONG: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// How many bars a histogram shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarCap {
    /// Every key, in key order
    All,
    /// The n largest counts
    Top(usize),
}

type Projection = fn(&Record) -> Key;
type Label = fn(&Key) -> String;

/// Static description of a histogram, before it is bound to an index
#[derive(Clone)]
pub struct HistogramSpec {
    pub name: &'static str,
    pub title: String,
    pub project: Projection,
    pub legend: Label,
    pub tooltip: Label,
    pub cap: BarCap,
}

/// Histograms in display order; `top_n` caps the thread and sender panels
pub fn histogram_specs(top_n: usize) -> Vec<HistogramSpec> {
    vec![
        HistogramSpec {
            name: "received-sent",
            title: "Received / Sent".into(),
            project: |r| Key::Bool(r.sent),
            legend: |k| match k {
                Key::Bool(true) => "Sent".into(),
                _ => "Recvd".into(),
            },
            tooltip: |k| match k {
                Key::Bool(true) => "Sent".into(),
                _ => "Received".into(),
            },
            cap: BarCap::All,
        },
        HistogramSpec {
            name: "week-day",
            title: "Week Day".into(),
            project: |r| Key::Int(r.date.weekday().num_days_from_monday() as i64),
            legend: |k| day_name(k, &DAY_SHORT),
            tooltip: |k| day_name(k, &DAY_LONG),
            cap: BarCap::All,
        },
        HistogramSpec {
            name: THREAD,
            title: format!("Top {} Threads", top_n),
            project: |r| Key::text(r.thread.as_str()),
            legend: short_label,
            tooltip: long_label,
            cap: BarCap::Top(top_n),
        },
        HistogramSpec {
            name: "nb-participants",
            title: "Number of Participants".into(),
            project: |r| {
                if r.nb_participants < 9 {
                    Key::text(r.nb_participants.to_string())
                } else {
                    Key::text("9 +")
                }
            },
            legend: |k| k.to_string(),
            tooltip: |k| k.to_string(),
            cap: BarCap::All,
        },
        HistogramSpec {
            name: "sender",
            title: format!("Top {} Senders", top_n),
            project: |r| Key::text(r.sender_name.as_str()),
            legend: short_label,
            tooltip: long_label,
            cap: BarCap::Top(top_n),
        },
        HistogramSpec {
            name: "media",
            title: "Media".into(),
            project: |r| Key::text(r.media.as_str()),
            legend: short_label,
            tooltip: long_label,
            cap: BarCap::All,
        },
        HistogramSpec {
            name: "nb-characters",
            title: "Number of characters".into(),
            project: |r| Key::Int(buckets::bucket(r.length) as i64),
            legend: length_label,
            tooltip: length_label,
            cap: BarCap::All,
        },
    ]
}

fn day_name(key: &Key, names: &[&str; 7]) -> String {
    key.as_int()
        .and_then(|i| names.get(i as usize))
        .map(|s| s.to_string())
        .unwrap_or_else(|| key.to_string())
}

fn short_label(key: &Key) -> String {
    truncate_chars(&key.to_string(), 5).to_string()
}

fn long_label(key: &Key) -> String {
    truncate_chars(&key.to_string(), 40).to_string()
}

fn length_label(key: &Key) -> String {
    match key.as_int() {
        Some(lower) => buckets::bucket_label(lower as u32),
        None => key.to_string(),
    }
}

/// A histogram bound to a dimension of the current index
#[derive(Clone)]
pub struct Histogram {
    pub spec: HistogramSpec,
    pub dimension: DimensionId,
    /// Keys the user toggled on; empty means no filter
    pub clicked: BTreeSet<Key>,
    pub colorized: bool,
}

impl Histogram {
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn project(&self, record: &Record) -> Key {
        (self.spec.project)(record)
    }

    pub fn legend(&self, key: &Key) -> String {
        (self.spec.legend)(key)
    }

    pub fn tooltip(&self, key: &Key) -> String {
        (self.spec.tooltip)(key)
    }

    /// Bars to display, honouring the cap
    pub fn bars(&self, index: &CrossFilter<Record>) -> Result<Vec<GroupEntry>, FilterError> {
        let group = index.group(self.dimension)?;
        Ok(match self.spec.cap {
            BarCap::All => group.all(),
            BarCap::Top(n) => group.top(n),
        })
    }
}

/// Every histogram plus the brushable date/time dimensions
#[derive(Clone)]
pub struct Registry {
    pub histograms: Vec<Histogram>,
    pub date: DimensionId,
    pub time: DimensionId,
}

impl Registry {
    /// Register every dimension against a freshly built index
    pub fn build(index: &mut CrossFilter<Record>, top_n: usize) -> Result<Self, FilterError> {
        let mut histograms = Vec::new();
        for spec in histogram_specs(top_n) {
            let dimension = index.create_dimension(spec.name, spec.project)?;
            histograms.push(Histogram {
                spec,
                dimension,
                clicked: BTreeSet::new(),
                colorized: false,
            });
        }
        let date = index.create_dimension(DATE_DIMENSION, |r| Key::Date(r.date))?;
        let time = index.create_dimension(TIME_DIMENSION, |r| Key::Time(r.time_minutes))?;

        tracing::debug!(
            "Registry built: {} histograms over {} records",
            histograms.len(),
            index.size()
        );

        Ok(Self {
            histograms,
            date,
            time,
        })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.histograms.iter().position(|h| h.name() == name)
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Histogram> {
        self.histograms.iter().find(|h| h.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Histogram> {
        self.histograms.iter_mut().find(|h| h.name() == name)
    }

    /// The histogram whose keys currently colour the scatter, if any
    pub fn colorized(&self) -> Option<&Histogram> {
        self.histograms.iter().find(|h| h.colorized)
    }
}

/// Thread bars narrowed to names containing `term`, case-insensitively
///
/// Works on a copy of the full aggregate and re-sorts it by count, so the
/// index's own key-ordered aggregate is never reordered.
pub fn search_view(all: &[GroupEntry], term: &str) -> Vec<GroupEntry> {
    let needle = term.to_lowercase();
    let mut matches: Vec<GroupEntry> = all
        .iter()
        .filter(|e| {
            e.key
                .as_text()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    sort_by_count(&mut matches);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{enrich, TimeBasis};
    use crate::model::{Media, RawMessage};

    fn scenario() -> Vec<Record> {
        let raw = vec![
            RawMessage::new("A", 1_666_692_232.0, "T1", 2, Media::None, "abc"),
            RawMessage::new("B", 1_666_692_300.0, "T1", 2, Media::None, "x".repeat(15)),
            RawMessage::new("A", 1_666_700_000.0, "T2", 2, Media::Media, "y".repeat(300)),
        ];
        enrich(raw, TimeBasis::Utc).records
    }

    fn pairs(entries: &[GroupEntry]) -> Vec<(String, u64)> {
        entries
            .iter()
            .map(|e| (e.key.to_string(), e.value))
            .collect()
    }

    #[test]
    fn test_registry_dimensions_in_display_order() {
        let mut index = CrossFilter::new(scenario());
        let registry = Registry::build(&mut index, 20).unwrap();
        let names: Vec<_> = registry.histograms.iter().map(|h| h.name()).collect();
        assert_eq!(
            names,
            vec![
                "received-sent",
                "week-day",
                "thread",
                "nb-participants",
                "sender",
                "media",
                "nb-characters"
            ]
        );
        assert_eq!(index.dimension_name(registry.date).unwrap(), "date");
        assert_eq!(index.dimension_name(registry.time).unwrap(), "time");
    }

    #[test]
    fn test_scenario_groups() {
        let mut index = CrossFilter::new(scenario());
        let registry = Registry::build(&mut index, 20).unwrap();

        let sender = registry.get("sender").unwrap();
        let all = index.group(sender.dimension).unwrap().all();
        assert_eq!(pairs(&all), vec![("A".into(), 2), ("B".into(), 1)]);

        let length = registry.get("nb-characters").unwrap();
        let all = index.group(length.dimension).unwrap().all();
        assert_eq!(
            pairs(&all),
            vec![("2".into(), 1), ("10".into(), 1), ("200".into(), 1)]
        );
    }

    #[test]
    fn test_labels() {
        let mut index = CrossFilter::new(scenario());
        let registry = Registry::build(&mut index, 20).unwrap();

        let rs = registry.get("received-sent").unwrap();
        assert_eq!(rs.legend(&Key::Bool(false)), "Recvd");
        assert_eq!(rs.tooltip(&Key::Bool(false)), "Received");
        assert_eq!(rs.legend(&Key::Bool(true)), "Sent");

        let day = registry.get("week-day").unwrap();
        assert_eq!(day.legend(&Key::Int(0)), "Mon");
        assert_eq!(day.tooltip(&Key::Int(6)), "Sunday");

        let thread = registry.get("thread").unwrap();
        let name = Key::text("A very long thread name that keeps going and going");
        assert_eq!(thread.legend(&name), "A ver");
        assert_eq!(thread.tooltip(&name).chars().count(), 40);

        let length = registry.get("nb-characters").unwrap();
        assert_eq!(length.legend(&Key::Int(1000)), "1k-2k");
    }

    #[test]
    fn test_weekday_is_monday_based() {
        let mut index = CrossFilter::new(scenario());
        let registry = Registry::build(&mut index, 20).unwrap();
        let day = registry.get("week-day").unwrap();
        // 2022-10-25 was a Tuesday
        assert_eq!(day.project(&index.records()[0]), Key::Int(1));
    }

    #[test]
    fn test_participants_overflow_bucket() {
        let raw = vec![
            RawMessage::new("A", 0.0, "T", 3, Media::None, "a"),
            RawMessage::new("A", 0.0, "T", 12, Media::None, "a"),
        ];
        let records = enrich(raw, TimeBasis::Utc).records;
        let spec = &histogram_specs(20)[3];
        assert_eq!((spec.project)(&records[0]), Key::text("3"));
        assert_eq!((spec.project)(&records[1]), Key::text("9 +"));
    }

    #[test]
    fn test_cap_limits_bars() {
        let mut index = CrossFilter::new(scenario());
        let registry = Registry::build(&mut index, 1).unwrap();
        let thread = registry.get("thread").unwrap();
        assert_eq!(thread.spec.title, "Top 1 Threads");
        assert_eq!(pairs(&thread.bars(&index).unwrap()), vec![("T1".into(), 2)]);
    }

    #[test]
    fn test_search_view_is_a_sorted_copy() {
        let all = vec![
            GroupEntry { key: Key::text("Book club"), value: 2 },
            GroupEntry { key: Key::text("Family"), value: 9 },
            GroupEntry { key: Key::text("The BOOKish"), value: 5 },
        ];
        let view = search_view(&all, "book");
        assert_eq!(
            pairs(&view),
            vec![("The BOOKish".into(), 5), ("Book club".into(), 2)]
        );
        // Source order untouched
        assert_eq!(all[0].key, Key::text("Book club"));
        assert!(search_view(&all, "zzz").is_empty());
    }
}
