//! Calendar-day boundaries and inclusive date ranges
//!
//! Query bounds are date-granular: an `on_or_after` date includes everything
//! from the first instant of that day, an `on_or_before` date everything up to
//! and including the last representable instant of that day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const FIRST_INSTANT: NaiveTime = match NaiveTime::from_hms_opt(0, 0, 0) {
    Some(time) => time,
    None => panic!("00:00:00 is a valid time"),
};

const LAST_INSTANT: NaiveTime = match NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999) {
    Some(time) => time,
    None => panic!("23:59:59.999999999 is a valid time"),
};

/// First instant of the given calendar day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(FIRST_INSTANT)
}

/// Last representable instant of the given calendar day
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(LAST_INSTANT)
}

/// A date range with optional, inclusive, day-granular bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_or_after: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_or_before: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(on_or_after: Option<NaiveDate>, on_or_before: Option<NaiveDate>) -> Self {
        Self {
            on_or_after,
            on_or_before,
        }
    }

    /// A range with no bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.on_or_after.is_none() && self.on_or_before.is_none()
    }

    /// Lower bound as an instant, if any
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.on_or_after.map(start_of_day)
    }

    /// Upper bound as an instant, if any
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.on_or_before.map(end_of_day)
    }

    /// Whether the timestamp satisfies every configured bound
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start().is_none_or(|start| timestamp >= start)
            && self.end().is_none_or(|end| timestamp <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.on_or_after, self.on_or_before) {
            (Some(a), Some(b)) => write!(f, "[{}, {}]", a, b),
            (Some(a), None) => write!(f, "[{}, ..)", a),
            (None, Some(b)) => write!(f, "(.., {}]", b),
            (None, None) => write!(f, "(..)"),
        }
    }
}
