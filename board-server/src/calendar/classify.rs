//! Weekday/holiday classification.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::domain::DayType;

use super::HolidayCalendar;

/// Localized label for Saturdays not listed in the calendar.
pub const SATURDAY_LABEL: &str = "土曜日";

/// Localized label for Sundays not listed in the calendar.
pub const SUNDAY_LABEL: &str = "日曜日";

/// How a single date is classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayClass {
    pub is_holiday: bool,
    /// Holiday or weekend name; empty on weekdays.
    pub name: String,
}

impl DayClass {
    pub fn weekday() -> Self {
        Self {
            is_holiday: false,
            name: String::new(),
        }
    }

    pub fn holiday(name: impl Into<String>) -> Self {
        Self {
            is_holiday: true,
            name: name.into(),
        }
    }

    pub fn day_type(&self) -> DayType {
        DayType::from_holiday(self.is_holiday)
    }
}

/// Classify a date.
///
/// A calendar entry wins regardless of weekday. Otherwise Saturdays and
/// Sundays are holidays with a localized weekday label, and every other day
/// is a weekday.
///
/// # Examples
///
/// ```
/// use board_server::calendar::{classify_day, HolidayCalendar};
/// use chrono::NaiveDate;
///
/// let calendar = HolidayCalendar::empty();
/// let tuesday = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
/// assert!(!classify_day(tuesday, &calendar).is_holiday);
/// ```
pub fn classify_day(date: NaiveDate, calendar: &HolidayCalendar) -> DayClass {
    if let Some(name) = calendar.get(date) {
        return DayClass::holiday(name);
    }

    match date.weekday() {
        Weekday::Sat => DayClass::holiday(SATURDAY_LABEL),
        Weekday::Sun => DayClass::holiday(SUNDAY_LABEL),
        _ => DayClass::weekday(),
    }
}
