//! Live departure board computation.
//!
//! Everything here is a pure function of a data snapshot and "now": the
//! runtime calls [`BoardEngine::compute`] on every clock tick.

mod assemble;
mod bus;
mod layout;
mod rank;

use chrono::NaiveDateTime;

use crate::calendar::{DayClass, HolidayCalendar, classify_day};
use crate::domain::OperationType;
use crate::refresh::Snapshot;

pub use assemble::{DisplayDirection, StationGroup, assemble};
pub use bus::{BusStopBoard, merge_bus_stops};
pub use layout::{
    DEFAULT_COLOR, LayoutEntry, LayoutError, LineStyles, StationLayout, direction_title,
    extract_station_name,
};
pub use rank::{DisplayTrain, RankConfig, rank, rank_departures};

/// Whether the board has data to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardStatus {
    /// No refresh has completed yet.
    Loading,
    Ready,
    /// No operator data has ever been obtained.
    Unavailable(String),
}

impl BoardStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, BoardStatus::Ready)
    }
}

/// Merged stops of one bus operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusOperatorBoard {
    pub operator: String,
    pub color: String,
    /// Operation type in effect, as stated by the operator or derived from the day.
    pub operation_type: OperationType,
    /// Service date the operator published for these stops.
    pub date: Option<String>,
    pub stops: Vec<BusStopBoard>,
}

/// One computed board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub generated_at: NaiveDateTime,
    pub day: DayClass,
    pub stations: Vec<StationGroup>,
    pub buses: Vec<BusOperatorBoard>,
    /// Provider's `lastUpdated`, verbatim.
    pub last_updated: Option<String>,
    /// When the data shown was fetched.
    pub fetched_at: Option<NaiveDateTime>,
    pub status: BoardStatus,
    /// Most recent refresh failure, if the last refresh failed.
    pub last_error: Option<String>,
}

impl Board {
    /// Board shown before any data is available.
    pub fn empty(now: NaiveDateTime, status: BoardStatus) -> Self {
        Self {
            generated_at: now,
            day: classify_day(now.date(), &HolidayCalendar::empty()),
            stations: Vec::new(),
            buses: Vec::new(),
            last_updated: None,
            fetched_at: None,
            status,
            last_error: None,
        }
    }

    pub fn total_departures(&self) -> usize {
        let trains: usize = self
            .stations
            .iter()
            .flat_map(|s| &s.directions)
            .map(|d| d.trains.len())
            .sum();
        let buses: usize = self
            .buses
            .iter()
            .flat_map(|b| &b.stops)
            .map(|s| s.trains.len())
            .sum();
        trains + buses
    }
}

/// Board computation settings.
#[derive(Debug, Clone, Default)]
pub struct BoardEngine {
    pub layout: StationLayout,
    pub styles: LineStyles,
    pub rank: RankConfig,
}

impl BoardEngine {
    pub fn new(layout: StationLayout, styles: LineStyles, rank: RankConfig) -> Self {
        Self {
            layout,
            styles,
            rank,
        }
    }

    /// Compute the board at `now`.
    ///
    /// Without a snapshot the board is empty: `Loading` until the first
    /// refresh fails, `Unavailable` after. A snapshot is always shown, even
    /// if later refreshes failed.
    pub fn compute(
        &self,
        snapshot: Option<&Snapshot>,
        last_error: Option<&str>,
        now: NaiveDateTime,
    ) -> Board {
        let Some(snapshot) = snapshot else {
            let status = match last_error {
                Some(e) => BoardStatus::Unavailable(e.to_string()),
                None => BoardStatus::Loading,
            };
            let mut board = Board::empty(now, status);
            board.last_error = last_error.map(str::to_string);
            return board;
        };

        let day = snapshot.day.day_type();
        let timetable = &snapshot.timetable;

        let stations = assemble(&self.layout, timetable, day, now, &self.rank, &self.styles);

        let buses = timetable
            .bus_groups
            .iter()
            .map(|group| BusOperatorBoard {
                operator: group.operator.clone(),
                color: self
                    .styles
                    .color(Some(&group.line), &group.operator)
                    .to_string(),
                operation_type: group.operation_type.unwrap_or(day.operation_type()),
                date: group.date.clone(),
                stops: merge_bus_stops(&group.routes, day, now, &self.rank),
            })
            .filter(|b| !b.stops.is_empty())
            .collect();

        Board {
            generated_at: now,
            day: snapshot.day.clone(),
            stations,
            buses,
            last_updated: timetable.last_updated.clone(),
            fetched_at: Some(snapshot.fetched_at),
            status: BoardStatus::Ready,
            last_error: last_error.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::timetable::RawTimetable;
    use chrono::NaiveDate;

    fn now(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn snapshot(day: DayClass) -> Snapshot {
        let raw: RawTimetable = serde_json::from_str(
            r#"{
                "jr": {
                    "ＪＲ俊徳道駅": {
                        "久宝寺・奈良方面": [{"hour": "9", "minute": "10", "destination": "久宝寺", "trainType": "普通"}]
                    }
                },
                "kintetsuBus": {
                    "date": "2024-03-15",
                    "stops": [
                        {"stopName": "近畿大学東門前", "routeName": "A便", "operationType": "A", "schedule": [{"hour": 9, "minutes": [15]}]},
                        {"stopName": "八戸ノ里駅前", "routeName": "B便", "operationType": "B", "schedule": [{"hour": 9, "minutes": [20]}]}
                    ]
                },
                "lastUpdated": "2024-03-15T04:00:00Z"
            }"#,
        )
        .unwrap();
        Snapshot::new(normalize(&raw), day, now(8, 0))
    }

    #[test]
    fn loading_before_first_refresh() {
        let board = BoardEngine::default().compute(None, None, now(9, 0));
        assert_eq!(board.status, BoardStatus::Loading);
        assert!(board.stations.is_empty());
        assert_eq!(board.fetched_at, None);
    }

    #[test]
    fn unavailable_after_failed_first_refresh() {
        let board = BoardEngine::default().compute(None, Some("connection refused"), now(9, 0));
        assert_eq!(
            board.status,
            BoardStatus::Unavailable("connection refused".to_string())
        );
    }

    #[test]
    fn stale_snapshot_is_still_ready() {
        let snap = snapshot(DayClass::weekday());
        let board = BoardEngine::default().compute(Some(&snap), Some("timeout"), now(9, 0));
        assert!(board.status.is_ready());
        assert_eq!(board.last_error.as_deref(), Some("timeout"));
        assert_eq!(board.fetched_at, Some(now(8, 0)));
    }

    #[test]
    fn weekday_board() {
        let snap = snapshot(DayClass::weekday());
        let board = BoardEngine::default().compute(Some(&snap), None, now(9, 0));

        assert_eq!(board.stations.len(), 3);
        assert_eq!(board.last_updated.as_deref(), Some("2024-03-15T04:00:00Z"));

        assert_eq!(board.buses.len(), 1);
        let bus = &board.buses[0];
        assert_eq!(bus.color, "#58A6FF");
        assert_eq!(bus.operation_type, OperationType::A);
        assert_eq!(bus.date.as_deref(), Some("2024-03-15"));
        assert_eq!(bus.stops.len(), 1);
        assert_eq!(bus.stops[0].stop_name, "近畿大学東門前");

        assert_eq!(board.total_departures(), 2);
    }

    #[test]
    fn holiday_board_uses_b_day_buses() {
        let snap = snapshot(DayClass::holiday("春分の日"));
        let board = BoardEngine::default().compute(Some(&snap), None, now(9, 0));

        let bus = &board.buses[0];
        assert_eq!(bus.operation_type, OperationType::B);
        assert_eq!(bus.stops[0].stop_name, "八戸ノ里駅前");
        assert_eq!(board.day.name, "春分の日");
    }

    #[test]
    fn board_empties_when_nothing_is_left() {
        let snap = snapshot(DayClass::weekday());
        let engine = BoardEngine::new(
            StationLayout::default(),
            LineStyles::default(),
            RankConfig::new(4, Some(chrono::Duration::hours(0))),
        );
        let board = engine.compute(Some(&snap), None, now(10, 0));
        assert!(board.buses.is_empty());
        assert_eq!(board.total_departures(), 0);
        assert!(board.status.is_ready());
    }
}
