//! Departure filtering and ranking.
//!
//! Turns one direction's published departures into the short list shown on
//! the board, relative to a given "now".

use chrono::Duration;
use serde::Serialize;
use tracing::trace;

use crate::domain::{DayType, Departure, DirectionSchedule, within_next_day_horizon};

/// Parameters for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankConfig {
    /// Maximum number of departures per direction or stop.
    pub cap: usize,

    /// How far past the next midnight a rolled-over departure may be.
    /// `None` keeps every rolled-over departure.
    pub next_day_horizon: Option<Duration>,
}

impl RankConfig {
    pub fn new(cap: usize, next_day_horizon: Option<Duration>) -> Self {
        Self {
            cap,
            next_day_horizon,
        }
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            cap: 4,
            next_day_horizon: Some(Duration::hours(6)),
        }
    }
}

/// One row of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTrain {
    /// `H:MM`.
    pub time: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub remaining_minutes: u32,
    /// Whether this departure is on the day after "now".
    pub next_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

/// Rank the departures of one direction for the given day type.
pub fn rank(
    schedule: &DirectionSchedule,
    day: DayType,
    now: chrono::NaiveDateTime,
    config: &RankConfig,
) -> Vec<DisplayTrain> {
    rank_departures(schedule.departures(day), now, config)
}

/// Rank an arbitrary pool of departures.
///
/// Each departure is resolved to its next occurrence at or after `now`,
/// dropped if it rolled past the next-day horizon, then the pool is sorted
/// by remaining minutes (stable, so ties keep publication order) and cut
/// to `config.cap`. An empty result is returned as-is.
pub fn rank_departures<'a, I>(
    departures: I,
    now: chrono::NaiveDateTime,
    config: &RankConfig,
) -> Vec<DisplayTrain>
where
    I: IntoIterator<Item = &'a Departure>,
{
    let mut ranked: Vec<DisplayTrain> = departures
        .into_iter()
        .filter_map(|departure| {
            let occurrence = departure.time.next_occurrence(now)?;

            if occurrence.rolled_over
                && let Some(horizon) = config.next_day_horizon
                && !within_next_day_horizon(occurrence.at, now, horizon)
            {
                trace!(time = %departure.time, "beyond next-day horizon");
                return None;
            }

            Some(DisplayTrain {
                time: departure.time.to_string(),
                destination: departure.destination.clone(),
                kind: departure.label.clone(),
                remaining_minutes: occurrence.minutes_from(now),
                next_day: occurrence.rolled_over,
                detail_url: departure.detail_url.clone(),
            })
        })
        .collect();

    ranked.sort_by_key(|train| train.remaining_minutes);
    ranked.truncate(config.cap);
    ranked
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::ClockTime;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn departure_strategy() -> impl Strategy<Value = Departure> {
        (0u32..24, 0u32..60).prop_map(|(h, m)| Departure::new(ClockTime::new(h, m).unwrap(), "X"))
    }

    fn now_strategy() -> impl Strategy<Value = NaiveDateTime> {
        (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| {
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap()
        })
    }

    fn config_strategy() -> impl Strategy<Value = RankConfig> {
        (0usize..8, prop::option::of(0i64..24))
            .prop_map(|(cap, hours)| RankConfig::new(cap, hours.map(Duration::hours)))
    }

    proptest! {
        #[test]
        fn ranked_is_sorted_and_capped(
            deps in prop::collection::vec(departure_strategy(), 0..40),
            now in now_strategy(),
            config in config_strategy(),
        ) {
            let ranked = rank_departures(&deps, now, &config);

            prop_assert!(ranked.len() <= config.cap);
            for window in ranked.windows(2) {
                prop_assert!(window[0].remaining_minutes <= window[1].remaining_minutes);
            }
        }

        #[test]
        fn remaining_is_within_one_day(
            deps in prop::collection::vec(departure_strategy(), 0..40),
            now in now_strategy(),
        ) {
            let ranked = rank_departures(&deps, now, &RankConfig::new(usize::MAX, None));

            prop_assert_eq!(ranked.len(), deps.len());
            for train in &ranked {
                prop_assert!(train.remaining_minutes <= 24 * 60);
            }
        }

        #[test]
        fn horizon_bounds_rolled_departures(
            deps in prop::collection::vec(departure_strategy(), 0..40),
            now in now_strategy(),
            hours in 0i64..24,
        ) {
            let config = RankConfig::new(usize::MAX, Some(Duration::hours(hours)));
            let ranked = rank_departures(&deps, now, &config);

            for train in ranked.iter().filter(|t| t.next_day) {
                let (h, m) = train.time.split_once(':').unwrap();
                let minute_of_day = h.parse::<i64>().unwrap() * 60 + m.parse::<i64>().unwrap();
                prop_assert!(minute_of_day <= hours * 60);
            }
        }
    }
}
