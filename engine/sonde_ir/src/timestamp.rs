//! Magnitude-based timestamp detection.
//!
//! Candid and protobuf integers carry no "this is a time" marker, so the
//! renderer guesses: a numeric field whose *name* mentions time, date or
//! seconds, and whose value falls in one of three windows, is shown with a
//! human-relative time beside the raw number. The windows are open at both
//! ends:
//!
//! | range                    | read as       |
//! |--------------------------|---------------|
//! | `1e9  < n < 2.5e9`       | seconds       |
//! | `1e12 < n < 2.5e12`      | milliseconds  |
//! | `1e15 < n < 2.5e15`      | microseconds  |
//!
//! Anything else is just a number. Nanosecond timestamps (the usual unit for
//! IC system time) fall outside every window and are left alone.

use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Unit a number was classified as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    Microseconds,
}

/// A number read as a point in time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timestamp {
    pub unit: TimeUnit,
    /// Milliseconds since the Unix epoch.
    pub millis: i64,
}

impl Timestamp {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.millis).single()
    }

    /// Human-relative text against `now` (`"3 days ago"`, `"in 2 hours"`).
    pub fn relative_to(self, now: DateTime<Utc>) -> String {
        relative(self.millis, now.timestamp_millis())
    }
}

/// Whether a field name suggests it holds a time value.
pub fn looks_like_time_field(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ["time", "date", "seconds"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Classify `n` by magnitude; `None` when it is not plausibly a timestamp.
pub fn classify_timestamp(n: &BigInt) -> Option<Timestamp> {
    let n = n.to_i64()?;
    if n > 1_000_000_000 && n < 2_500_000_000 {
        Some(Timestamp {
            unit: TimeUnit::Seconds,
            millis: n * 1000,
        })
    } else if n > 1_000_000_000_000 && n < 2_500_000_000_000 {
        Some(Timestamp {
            unit: TimeUnit::Milliseconds,
            millis: n,
        })
    } else if n > 1_000_000_000_000_000 && n < 2_500_000_000_000_000 {
        Some(Timestamp {
            unit: TimeUnit::Microseconds,
            millis: n / 1000,
        })
    } else {
        None
    }
}

const UNITS: [(i64, &str); 6] = [
    (365 * 24 * 60 * 60, "year"),
    (30 * 24 * 60 * 60, "month"),
    (24 * 60 * 60, "day"),
    (60 * 60, "hour"),
    (60, "minute"),
    (1, "second"),
];

fn relative(at_millis: i64, now_millis: i64) -> String {
    let delta = (at_millis - now_millis) / 1000;
    if delta == 0 {
        return "just now".to_owned();
    }
    let magnitude = delta.abs();
    let (size, unit) = UNITS
        .iter()
        .copied()
        .find(|(size, _)| magnitude >= *size)
        .unwrap_or((1, "second"));
    let count = magnitude / size;
    let plural = if count == 1 { "" } else { "s" };
    if delta < 0 {
        format!("{count} {unit}{plural} ago")
    } else {
        format!("in {count} {unit}{plural}")
    }
}
