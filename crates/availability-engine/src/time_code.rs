//! 12-hour clock strings ↔ minutes since local midnight.
//!
//! A [`TimeCode`] is the comparable form of a user-entered time such as
//! `"9:30 am"` or `"05:00 PM"`. Values past 1439 are legal: they denote a time
//! after midnight within the same booking session (see
//! [`rollover_adjust`](crate::interval::rollover_adjust)) and format back to the
//! wall-clock hour while keeping the raw count for ordering.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(0?[1-9]|1[0-2]):([0-5][0-9])\s?(AM|PM)$").expect("static time pattern")
});

/// Minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeCode(u32);

impl TimeCode {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Parse `H:MM AM|PM` (hour 1–12, case-insensitive meridiem, optional
    /// single space). Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// Returns [`ScheduleError::InvalidTimeFormat`] for anything else; a
    /// malformed string never maps to a wrong-but-valid time.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = TIME_PATTERN
            .captures(s.trim())
            .ok_or_else(|| ScheduleError::InvalidTimeFormat(s.to_string()))?;

        // The pattern guarantees both groups are small decimal numbers.
        let hour: u32 = caps[1]
            .parse()
            .map_err(|_| ScheduleError::InvalidTimeFormat(s.to_string()))?;
        let minute: u32 = caps[2]
            .parse()
            .map_err(|_| ScheduleError::InvalidTimeFormat(s.to_string()))?;
        let pm = caps[3].eq_ignore_ascii_case("PM");

        let hour24 = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };

        Ok(Self(hour24 * 60 + minute))
    }

    /// Format as `HH:MM AM|PM`. Minute counts past midnight wrap onto the
    /// 24-hour clock (`1470` → `"12:30 AM"`).
    pub fn format(self) -> String {
        let hour24 = (self.0 / 60) % 24;
        let minute = self.0 % 60;
        let (hour12, meridiem) = match hour24 {
            0 => (12, "AM"),
            1..=11 => (hour24, "AM"),
            12 => (12, "PM"),
            _ => (hour24 - 12, "PM"),
        };
        format!("{:02}:{:02} {}", hour12, minute, meridiem)
    }

    /// Whether this value lies past the end of the day it started in.
    pub const fn is_next_day(self) -> bool {
        self.0 >= MINUTES_PER_DAY
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for TimeCode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Canonical spelling of a time string: zero-padded hour, upper-case
/// meridiem, single separating space.
///
/// ```
/// use availability_engine::time_code::normalize;
///
/// assert_eq!(normalize("9:05pm").unwrap(), "09:05 PM");
/// ```
pub fn normalize(s: &str) -> Result<String> {
    TimeCode::parse(s).map(TimeCode::format)
}
