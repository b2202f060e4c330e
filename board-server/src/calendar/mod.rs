//! Holiday calendar resolution.
//!
//! Turns the published holiday CSV into a date → name lookup and decides
//! whether a given date runs the weekday or holiday timetable. A calendar
//! that cannot be fetched degrades to weekend-only classification.

mod classify;
mod client;
mod error;
mod parse;

pub use classify::{DayClass, SATURDAY_LABEL, SUNDAY_LABEL, classify_day};
pub use client::{CalendarClient, CalendarClientConfig, DEFAULT_CALENDAR_URL, DEFAULT_ENCODING};
pub use error::CalendarError;
pub use parse::{HolidayCalendar, parse_calendar};
