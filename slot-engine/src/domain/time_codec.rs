//! Conversion between display times (`"09:00 AM"`) and minutes since midnight.
//!
//! Provider data uses either `:` or `.` as the hour/minute separator, so both
//! are accepted. Display output always uses `:` and a zero-padded hour.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

static DISPLAY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2})[:.](\d{2})\s*(AM|PM)\s*$").expect("display time pattern")
});

/// Minutes since midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TimeOfDay(u16);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed time: {0:?}")]
pub struct MalformedTime(pub String);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const NOON: TimeOfDay = TimeOfDay(720);

    /// Builds a time from an arbitrary minute count, wrapping into the day.
    pub fn from_minutes(minutes: i64) -> Self {
        let wrapped = minutes.rem_euclid(i64::from(MINUTES_PER_DAY));
        Self(wrapped as u16)
    }

    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(u16::from(hour) * 60 + u16::from(minute)))
        } else {
            None
        }
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Adds a duration, wrapping at midnight. Day rollover is not tracked.
    pub fn add_minutes(self, minutes: i64) -> Self {
        Self::from_minutes(i64::from(self.0) + minutes)
    }

    pub fn to_time(self) -> time::Time {
        time::Time::from_hms(self.hour(), self.minute(), 0).unwrap_or(time::Time::MIDNIGHT)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour24 = self.hour();
        let period = if hour24 >= 12 { "PM" } else { "AM" };
        let hour12 = match hour24 % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{:02}:{:02} {}", hour12, self.minute(), period)
    }
}

impl FromStr for TimeOfDay {
    type Err = MalformedTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_to_minutes(s).ok_or_else(|| MalformedTime(s.to_string()))
    }
}

impl TryFrom<u16> for TimeOfDay {
    type Error = MalformedTime;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value < MINUTES_PER_DAY {
            Ok(Self(value))
        } else {
            Err(MalformedTime(value.to_string()))
        }
    }
}

impl From<TimeOfDay> for u16 {
    fn from(value: TimeOfDay) -> Self {
        value.0
    }
}

/// Parses `"H:MM AM"` / `"H.MM PM"` into minutes since midnight.
///
/// Returns `None` for anything else, including out-of-range hours or minutes.
pub fn parse_to_minutes(display: &str) -> Option<TimeOfDay> {
    let caps = DISPLAY_TIME.captures(display)?;
    let hour: u8 = caps[1].parse().ok()?;
    let minute: u8 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let is_pm = caps[3].eq_ignore_ascii_case("PM");
    let hour24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    TimeOfDay::from_hm(hour24, minute)
}

/// Renders minutes as a display time, normalizing into the day first.
pub fn format_from_minutes(minutes: i64) -> String {
    TimeOfDay::from_minutes(minutes).to_string()
}

pub fn add_duration(start: TimeOfDay, minutes: i64) -> TimeOfDay {
    start.add_minutes(minutes)
}

/// Splits a slot label into its start and optional end portions.
///
/// Labels are either a bare start (`"09:00 AM"`) or a range
/// (`"09:00 AM - 10:00 AM"`, sometimes written with an en dash).
pub fn split_label(label: &str) -> (&str, Option<&str>) {
    let separator = label
        .find('-')
        .map(|i| (i, 1))
        .or_else(|| label.find('–').map(|i| (i, '–'.len_utf8())));

    match separator {
        Some((idx, width)) => {
            let start = label[..idx].trim();
            let end = label[idx + width..].trim();
            let start = if start.is_empty() { label.trim() } else { start };
            (start, (!end.is_empty()).then_some(end))
        }
        None => (label.trim(), None),
    }
}

/// The start portion of a slot label.
pub fn label_start(label: &str) -> &str {
    split_label(label).0
}

/// Normalized start time of a slot label, if it parses.
pub fn label_start_time(label: &str) -> Option<TimeOfDay> {
    parse_to_minutes(label_start(label))
}
