// Linear scales and brush inversion for the date and time strips
//
// A brush selection arrives as a pixel (or cell) extent along a strip.
// It is mapped back through the strip's scale to a key range that the
// date or time dimension can filter on.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

/// Last second of the time-of-day axis
pub fn day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Affine map from a data domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Pixel back to domain; positions outside the range clamp to the domain
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        let t = ((px - r0) / (r1 - r0)).clamp(0.0, 1.0);
        d0 + t * (d1 - d0)
    }
}

/// Inclusive date range of a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateExtent {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateExtent {
    pub fn of(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        let mut it = dates.into_iter();
        let d = it.next()?;
        let (first, last) = it.fold((d, d), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { first, last })
    }

    pub fn scale(&self, width: f64) -> LinearScale {
        LinearScale::new((day_number(self.first), day_number(self.last)), (0.0, width))
    }

    /// Whole days covered by a pixel extent: the start rounds up, the end down
    pub fn invert(&self, extent: (f64, f64), width: f64) -> (NaiveDate, NaiveDate) {
        let scale = self.scale(width);
        let (x0, x1) = ordered(extent);
        let lo = from_day_number(scale.invert(x0).ceil()).unwrap_or(self.first);
        let hi = from_day_number(scale.invert(x1).floor()).unwrap_or(self.last);
        (lo, hi)
    }
}

/// Time-of-day axis, 00:00:00 to 23:59:59
pub fn time_scale(height: f64) -> LinearScale {
    LinearScale::new((0.0, seconds(day_end())), (0.0, height))
}

/// Minutes covered by a pixel extent along the time strip
///
/// Both ends truncate to the minute, matching the minute-resolution keys
/// of the time dimension.
pub fn invert_time(extent: (f64, f64), height: f64) -> (NaiveTime, NaiveTime) {
    let scale = time_scale(height);
    let (y0, y1) = ordered(extent);
    (minute_of(scale.invert(y0)), minute_of(scale.invert(y1)))
}

pub fn seconds(t: NaiveTime) -> f64 {
    t.num_seconds_from_midnight() as f64
}

pub fn day_number(d: NaiveDate) -> f64 {
    d.num_days_from_ce() as f64
}

pub fn from_day_number(n: f64) -> Option<NaiveDate> {
    if !n.is_finite() {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(n as i32)
}

/// Time of day at a fractional second offset, second resolution
pub fn time_at(secs: f64) -> NaiveTime {
    let s = secs.clamp(0.0, seconds(day_end())) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(s, 0).unwrap_or(NaiveTime::MIN)
}

fn minute_of(secs: f64) -> NaiveTime {
    let t = time_at(secs);
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(NaiveTime::MIN)
}

/// Shift a date by whole days, saturating at chrono's limits
pub fn add_days(d: NaiveDate, days: i64) -> NaiveDate {
    d.checked_add_signed(Duration::days(days)).unwrap_or(d)
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
