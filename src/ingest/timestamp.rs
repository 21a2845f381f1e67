// Timestamp parsing for export footers
//
// HTML exports print wall-clock times without a zone; they are read in
// the configured time basis. Anything unparseable becomes "now" so the
// message is kept.

use crate::derive::TimeBasis;
use chrono::{Local, NaiveDateTime, TimeZone, Utc};

/// Footer formats seen in exports, most common first
const FORMATS: &[&str] = &[
    // October 25, 2022 10:03:52 am
    "%B %d, %Y %I:%M:%S %p",
    "%B %d, %Y, %I:%M %p",
    // Oct 25, 2022 10:03:52 am
    "%b %d, %Y %I:%M:%S %p",
    // Oct 25, 2022, 10:03 am
    "%b %d, %Y, %I:%M %p",
    "%b %d, %Y %I:%M %p",
    // 10/25/2022 10:03:52 am
    "%m/%d/%Y %I:%M:%S %p",
    // 2022-10-25 10:03:52
    "%Y-%m-%d %H:%M:%S",
];

/// Wall-clock footer text to a naive datetime
pub fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Footer text to epoch seconds, falling back to the current time
pub fn parse_export_timestamp(text: &str, basis: TimeBasis) -> f64 {
    let parsed = parse_naive(text).and_then(|naive| match basis {
        TimeBasis::Utc => Some(naive.and_utc().timestamp()),
        // DST gaps have no local instant; ambiguous times take the earlier
        TimeBasis::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp()),
    });

    match parsed {
        Some(secs) => secs as f64,
        None => {
            tracing::warn!("Could not parse timestamp '{}', using current time", text);
            now_seconds()
        }
    }
}

/// Current time as fractional epoch seconds
pub fn now_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
