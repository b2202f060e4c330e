//! Caching layer for the holiday calendar.
//!
//! The calendar resource changes once a year but the data refresh runs
//! every few minutes. Successful downloads are cached for a configurable
//! TTL; failures are never cached, so the next refresh retries.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::calendar::{CalendarClient, CalendarError, DayClass, HolidayCalendar, classify_day};

/// Configuration for the calendar cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for a downloaded calendar.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(6 * 60 * 60),
        }
    }
}

/// Calendar client with caching.
///
/// Cache entries are keyed by resource URL.
pub struct CachedCalendarClient {
    client: CalendarClient,
    calendars: MokaCache<String, Arc<HolidayCalendar>>,
}

impl CachedCalendarClient {
    pub fn new(client: CalendarClient, config: &CacheConfig) -> Self {
        let calendars = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(4)
            .build();

        Self { client, calendars }
    }

    /// Get the calendar, using the cache if available.
    pub async fn calendar(&self) -> Result<Arc<HolidayCalendar>, CalendarError> {
        let key = self.client.url().to_string();

        if let Some(cached) = self.calendars.get(&key).await {
            return Ok(cached);
        }

        let calendar = Arc::new(self.client.fetch().await?);
        debug!(holidays = calendar.len(), "downloaded holiday calendar");
        self.calendars.insert(key, calendar.clone()).await;

        Ok(calendar)
    }

    /// Classify a date, degrading to weekend-only rules if the calendar is
    /// unavailable.
    pub async fn classify(&self, date: NaiveDate) -> DayClass {
        match self.calendar().await {
            Ok(calendar) => classify_day(date, &calendar),
            Err(e) => {
                warn!(error = %e, "holiday calendar unavailable, using weekends only");
                classify_day(date, &HolidayCalendar::empty())
            }
        }
    }

    pub fn cache_entry_count(&self) -> u64 {
        self.calendars.entry_count()
    }
}
