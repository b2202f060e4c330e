//! Timetable clock times.
//!
//! Published timetables give departures as a bare hour and minute with no
//! date attached. A [`ClockTime`] is resolved against "now" to find the next
//! instant it refers to, rolling into the following day at most once.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Error returned when an hour/minute pair is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time: {reason}")]
pub struct ClockTimeError {
    reason: &'static str,
}

impl ClockTimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute precision, as printed in a timetable.
///
/// # Examples
///
/// ```
/// use board_server::domain::ClockTime;
///
/// let t = ClockTime::new(9, 5).unwrap();
/// assert_eq!(t.to_string(), "9:05");
///
/// assert!(ClockTime::new(24, 0).is_err());
/// assert!(ClockTime::new(12, 60).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Create a clock time from an hour (0-23) and minute (0-59).
    pub fn new(hour: u32, minute: u32) -> Result<Self, ClockTimeError> {
        if hour > 23 {
            return Err(ClockTimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(ClockTimeError::new("minute must be 0-59"));
        }
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| ClockTimeError::new("invalid time"))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// This time on the given date.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }

    /// The next instant at or after `now` showing this time.
    ///
    /// A time strictly earlier than `now` on today's date is moved to the
    /// following day. Only one day is ever added, so the result is always
    /// less than 24 hours ahead of `now`.
    ///
    /// Returns `None` only if the following day is not representable.
    ///
    /// # Examples
    ///
    /// ```
    /// use board_server::domain::ClockTime;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let now = date.and_hms_opt(23, 50, 0).unwrap();
    ///
    /// let next = ClockTime::new(0, 10).unwrap().next_occurrence(now).unwrap();
    /// assert!(next.rolled_over);
    /// assert_eq!(next.at, NaiveDate::from_ymd_opt(2024, 3, 16).unwrap().and_hms_opt(0, 10, 0).unwrap());
    /// ```
    pub fn next_occurrence(&self, now: NaiveDateTime) -> Option<Occurrence> {
        let today = self.on(now.date());
        if today >= now {
            return Some(Occurrence {
                at: today,
                rolled_over: false,
            });
        }

        let tomorrow = now.date().succ_opt()?;
        Some(Occurrence {
            at: self.on(tomorrow),
            rolled_over: true,
        })
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({self})")
    }
}

/// Formats as `H:MM`, with an unpadded hour.
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour(), self.minute())
    }
}

/// A resolved departure instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub at: NaiveDateTime,
    /// Whether the time was moved to the day after `now`.
    pub rolled_over: bool,
}

impl Occurrence {
    /// Whole minutes from `now` until this occurrence, rounded up.
    ///
    /// Never negative: an occurrence before `now` counts as zero.
    pub fn minutes_from(&self, now: NaiveDateTime) -> u32 {
        remaining_minutes(self.at, now)
    }
}

/// `ceil((at - now) / 1 minute)`, clamped to zero.
pub fn remaining_minutes(at: NaiveDateTime, now: NaiveDateTime) -> u32 {
    let millis = at.signed_duration_since(now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let minutes = (millis + 59_999) / 60_000;
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Midnight at the start of the day after `now`.
pub fn next_midnight(now: NaiveDateTime) -> Option<NaiveDateTime> {
    now.date().succ_opt().map(|d| d.and_time(NaiveTime::MIN))
}

/// Whether `at` lies no more than `horizon` past the midnight following `now`.
pub fn within_next_day_horizon(at: NaiveDateTime, now: NaiveDateTime, horizon: Duration) -> bool {
    match next_midnight(now).and_then(|m| m.checked_add_signed(horizon)) {
        Some(limit) => at <= limit,
        None => false,
    }
}
