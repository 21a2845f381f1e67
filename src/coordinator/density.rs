// Density strips derived from the date and time groups

use crate::crossfilter::{GroupEntry, Key};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Monday opening the ISO week of `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    super::brush::add_days(date, -(date.weekday().num_days_from_monday() as i64))
}

/// Sum per-day counts into ISO weeks, keyed by the week's Monday
pub fn weekly(days: &[GroupEntry]) -> Vec<GroupEntry> {
    let mut weeks: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for entry in days {
        if let Key::Date(d) = entry.key {
            *weeks.entry(week_start(d)).or_default() += entry.value;
        }
    }
    weeks
        .into_iter()
        .map(|(monday, value)| GroupEntry {
            key: Key::Date(monday),
            value,
        })
        .collect()
}

/// Per-minute counts with empty minutes dropped
pub fn nonzero(minutes: &[GroupEntry]) -> Vec<GroupEntry> {
    minutes.iter().filter(|e| e.value > 0).cloned().collect()
}
