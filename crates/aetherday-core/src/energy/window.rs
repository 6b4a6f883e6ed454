//! Workday window parsing.
//!
//! A profile may configure the hours it schedules work in as `HH:MM`
//! strings. Time outside that window is "night" and regenerates energy
//! faster. Windows may wrap past midnight (e.g. `20:00`-`04:00`).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::constants::{FALLBACK_WORKDAY_END, FALLBACK_WORKDAY_START};

/// Daily workday window in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

impl WorkdayWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// The 06:00-22:00 UTC window used when a profile has none.
    pub fn fallback() -> Self {
        // Both constants are valid clock strings.
        let start = parse_clock(FALLBACK_WORKDAY_START).unwrap_or(NaiveTime::MIN);
        let end = parse_clock(FALLBACK_WORKDAY_END).unwrap_or(NaiveTime::MIN);
        Self { start, end }
    }

    /// Build from the profile's optional start/end strings.
    ///
    /// Falls back to [`WorkdayWindow::fallback`] when either side is missing
    /// or cannot be parsed.
    pub fn from_profile(start: Option<&str>, end: Option<&str>) -> Self {
        match (start.and_then(parse_clock), end.and_then(parse_clock)) {
            (Some(start), Some(end)) => Self { start, end },
            _ => Self::fallback(),
        }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Whether a time of day falls inside the workday.
    ///
    /// A zero-length window (`start == end`) covers the whole day.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start == self.end {
            return true;
        }
        if self.wraps_midnight() {
            time >= self.start || time < self.end
        } else {
            time >= self.start && time < self.end
        }
    }

    /// Whether `at` falls outside the workday (minute precision).
    pub fn is_night(&self, at: DateTime<Utc>) -> bool {
        let time = at.time();
        let truncated =
            NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        !self.contains(truncated)
    }

    /// Absolute bounds of the workday that starts on `date`.
    pub fn bounds_on(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = date.and_time(self.start).and_utc();
        let mut end = date.and_time(self.end).and_utc();
        if end <= start {
            end += Duration::days(1);
        }
        (start, end)
    }
}

impl Default for WorkdayWindow {
    fn default() -> Self {
        Self::fallback()
    }
}
