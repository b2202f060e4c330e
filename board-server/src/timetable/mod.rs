//! Timetable provider access.
//!
//! The provider publishes one JSON document holding every operator's
//! timetable: train operators keyed by station and direction, bus operators
//! keyed by stop, and a `lastUpdated` timestamp. This module fetches that
//! document; interpreting it is the normalizer's job.

mod client;
mod error;
mod file;
mod types;

use chrono::NaiveDate;

pub use client::{BusFallback, DEFAULT_BASE_URL, TimetableClient, TimetableClientConfig};
pub use error::TimetableError;
pub use file::FileTimetableSource;
pub use types::{BUS_METADATA_KEYS, RawBusStop, RawClock, RawDeparture, RawHourBucket, RawTimetable};

/// Where raw timetables come from.
#[derive(Debug, Clone)]
pub enum TimetableSource {
    Http(TimetableClient),
    File(FileTimetableSource),
}

impl TimetableSource {
    pub async fn fetch(&self, today: NaiveDate) -> Result<RawTimetable, TimetableError> {
        match self {
            TimetableSource::Http(client) => client.fetch_all(today).await,
            TimetableSource::File(file) => file.load(),
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            TimetableSource::Http(client) => client.base_url().to_string(),
            TimetableSource::File(file) => file.path().display().to_string(),
        }
    }
}
