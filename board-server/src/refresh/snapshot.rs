//! Data snapshots and the refresh that produces them.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::cache::CachedCalendarClient;
use crate::calendar::{DayClass, HolidayCalendar, classify_day};
use crate::clock::Clock;
use crate::normalize::{NormalizeOptions, NormalizedTimetable, normalize_with};
use crate::timetable::{TimetableError, TimetableSource};

/// Everything one refresh produced. Never modified once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub timetable: NormalizedTimetable,
    /// Day classification made during this refresh.
    pub day: DayClass,
    pub fetched_at: NaiveDateTime,
}

impl Snapshot {
    pub fn new(timetable: NormalizedTimetable, day: DayClass, fetched_at: NaiveDateTime) -> Self {
        Self {
            timetable,
            day,
            fetched_at,
        }
    }
}

/// Snapshot and refresh error, always read and written together.
#[derive(Debug, Default)]
struct StoreState {
    snapshot: Option<Arc<Snapshot>>,
    last_error: Option<String>,
}

/// The latest snapshot and the latest refresh error.
///
/// A failed refresh records its error but leaves the snapshot in place.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    state: Arc<RwLock<StoreState>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.state.read().await.snapshot.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Snapshot and error as of the same moment.
    pub async fn load(&self) -> (Option<Arc<Snapshot>>, Option<String>) {
        let state = self.state.read().await;
        (state.snapshot.clone(), state.last_error.clone())
    }

    /// Install a new snapshot and clear the error.
    pub async fn replace(&self, snapshot: Arc<Snapshot>) {
        let mut state = self.state.write().await;
        state.snapshot = Some(snapshot);
        state.last_error = None;
    }

    pub async fn record_error(&self, message: impl Into<String>) {
        self.state.write().await.last_error = Some(message.into());
    }
}

/// Fetches, classifies and normalizes, then publishes to a [`SnapshotStore`].
pub struct Refresher {
    source: TimetableSource,
    calendar: Option<Arc<CachedCalendarClient>>,
    options: NormalizeOptions,
    clock: Clock,
    store: SnapshotStore,
}

impl Refresher {
    pub fn new(
        source: TimetableSource,
        calendar: Option<Arc<CachedCalendarClient>>,
        options: NormalizeOptions,
        clock: Clock,
        store: SnapshotStore,
    ) -> Self {
        Self {
            source,
            calendar,
            options,
            clock,
            store,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    async fn classify(&self, now: NaiveDateTime) -> DayClass {
        match &self.calendar {
            Some(calendar) => calendar.classify(now.date()).await,
            None => classify_day(now.date(), &HolidayCalendar::empty()),
        }
    }

    /// Run one refresh.
    ///
    /// The timetable and the calendar are fetched concurrently. On a
    /// timetable failure the previous snapshot stays current.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, TimetableError> {
        let now = self.clock.now();

        let (raw, day) = futures::join!(self.source.fetch(now.date()), self.classify(now));

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                let stale = self.store.current().await.is_some();
                warn!(source = %self.source.describe(), error = %e, stale, "timetable refresh failed");
                self.store.record_error(e.to_string()).await;
                return Err(e);
            }
        };

        let timetable = normalize_with(&raw, &self.options);
        info!(
            stations = timetable.stations.len(),
            bus_groups = timetable.bus_groups.len(),
            holiday = day.is_holiday,
            day_name = %day.name,
            "timetable refreshed"
        );

        let snapshot = Arc::new(Snapshot::new(timetable, day, now));
        self.store.replace(snapshot.clone()).await;
        Ok(snapshot)
    }
}
