// Derived-field computation
//
// Dates and times are always computed here from `timestamp`; nothing else
// in the crate constructs a `Record`.

use crate::model::{RawMessage, Record};
use chrono::{DateTime, Local, NaiveTime, TimeZone, Timelike, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Time zone used to turn epoch timestamps into calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeBasis {
    /// The machine's local time zone (what the export owner saw)
    #[default]
    Local,
    Utc,
}

impl FromStr for TimeBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(format!("unknown time zone '{}' (expected local or utc)", other)),
        }
    }
}

impl TimeBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Utc => "utc",
        }
    }
}

/// Result of enrichment: records plus the inferred export owner
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub username: Option<String>,
}

/// Infer the export owner: the sender present in the most distinct threads.
///
/// Ties go to the lexically smallest name so the result never depends on
/// file read order. Returns `None` for an empty message list.
pub fn infer_username(messages: &[RawMessage]) -> Option<String> {
    let mut threads_by_sender: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for m in messages {
        threads_by_sender
            .entry(m.sender_name.as_str())
            .or_default()
            .insert(m.thread.as_str());
    }

    // BTreeMap iterates in name order; max_by_key keeps the last maximum,
    // so iterate in reverse to keep the first name among equals.
    threads_by_sender
        .iter()
        .rev()
        .max_by_key(|(_, threads)| threads.len())
        .map(|(name, _)| (*name).to_string())
}

/// Enrich raw messages with date, time-of-day and sent flags
pub fn enrich(messages: Vec<RawMessage>, basis: TimeBasis) -> Dataset {
    let username = infer_username(&messages);
    let records = messages
        .into_iter()
        .map(|m| match basis {
            TimeBasis::Local => to_record(m, &Local, username.as_deref()),
            TimeBasis::Utc => to_record(m, &Utc, username.as_deref()),
        })
        .collect();

    Dataset { records, username }
}

fn to_record<Tz: TimeZone>(m: RawMessage, tz: &Tz, username: Option<&str>) -> Record {
    let local = localize(m.timestamp, tz);
    let time_seconds = NaiveTime::from_hms_opt(local.hour(), local.minute(), local.second())
        .unwrap_or(NaiveTime::MIN);
    let time_minutes =
        NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(NaiveTime::MIN);

    Record {
        sent: username == Some(m.sender_name.as_str()),
        date: local.date_naive(),
        time_minutes,
        time_seconds,
        sender_name: m.sender_name,
        timestamp: m.timestamp,
        thread: m.thread,
        nb_participants: m.nb_participants,
        media: m.media,
        message: m.message,
        length: m.length,
    }
}

/// Convert epoch seconds to a zoned datetime; out-of-range values clamp to the epoch
fn localize<Tz: TimeZone>(timestamp: f64, tz: &Tz) -> DateTime<Tz> {
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    let utc = if secs.is_finite() {
        DateTime::<Utc>::from_timestamp(secs as i64, nanos)
    } else {
        None
    };
    utc.unwrap_or(DateTime::<Utc>::UNIX_EPOCH).with_timezone(tz)
}
