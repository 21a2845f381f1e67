//! Dimension keys and filter predicates

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Value a record projects to along one dimension
///
/// A projection always yields the same variant, so within a dimension the
/// derived ordering is the natural order of the wrapped type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Key {
    pub fn text(s: impl Into<String>) -> Self {
        Key::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::Text(s) => write!(f, "{}", s),
            Key::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Key::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
        }
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(s)
    }
}

impl From<NaiveDate> for Key {
    fn from(d: NaiveDate) -> Self {
        Key::Date(d)
    }
}

impl From<NaiveTime> for Key {
    fn from(t: NaiveTime) -> Self {
        Key::Time(t)
    }
}

/// Active filter condition on one dimension
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Predicate {
    /// Pass-through
    #[default]
    All,
    /// Accept only records whose key is in the set
    Keys(BTreeSet<Key>),
    /// Accept keys in `lo..=hi`
    Range { lo: Key, hi: Key },
}

impl Predicate {
    pub fn range(lo: impl Into<Key>, hi: impl Into<Key>) -> Self {
        Predicate::Range {
            lo: lo.into(),
            hi: hi.into(),
        }
    }

    #[allow(dead_code)] // Used by CrossFilter::filter_keys
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Predicate::Keys(keys.into_iter().map(Into::into).collect())
    }

    #[allow(dead_code)] // Reserved for diagnostics
    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }

    #[allow(dead_code)] // Reserved for per-record checks; filtering works on key spans
    pub fn accepts(&self, key: &Key) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Keys(set) => set.contains(key),
            Predicate::Range { lo, hi } => lo <= key && key <= hi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_inclusive() {
        let p = Predicate::range(2i64, 5i64);
        assert!(p.accepts(&Key::Int(2)));
        assert!(p.accepts(&Key::Int(5)));
        assert!(!p.accepts(&Key::Int(6)));
        assert!(!p.accepts(&Key::Int(1)));
    }

    #[test]
    fn test_key_set() {
        let p = Predicate::keys(["a", "c"]);
        assert!(p.accepts(&Key::text("a")));
        assert!(!p.accepts(&Key::text("b")));
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::Int(10).to_string(), "10");
        assert_eq!(
            Key::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()).to_string(),
            "2024-03-09"
        );
    }
}
