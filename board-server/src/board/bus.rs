//! Bus stop boards.
//!
//! A physical stop may be served by several routes, each published as its
//! own record. Routes are pooled per stop before ranking so that the board
//! shows the next buses from that stop regardless of route.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{DayType, Departure};
use crate::normalize::BusRoute;

use super::rank::{DisplayTrain, RankConfig, rank_departures};

/// Ranked departures for one stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusStopBoard {
    pub stop_name: String,
    pub trains: Vec<DisplayTrain>,
}

/// Whether a route runs on the given day.
///
/// Routes without an operation type run every day.
fn runs_on(route: &BusRoute, day: DayType) -> bool {
    route
        .operation_type
        .is_none_or(|op| op == day.operation_type())
}

/// Pool routes by stop and rank each stop.
///
/// Stops appear in the order they are first seen in `routes`. A stop left
/// with nothing to show is omitted.
pub fn merge_bus_stops(
    routes: &[BusRoute],
    day: DayType,
    now: NaiveDateTime,
    config: &RankConfig,
) -> Vec<BusStopBoard> {
    let mut pools: Vec<(&str, Vec<&Departure>)> = Vec::new();

    for route in routes.iter().filter(|r| runs_on(r, day)) {
        let departures = route.schedule.departures(day);
        match pools.iter_mut().find(|(stop, _)| *stop == route.stop_name) {
            Some((_, pool)) => pool.extend(departures),
            None => pools.push((route.stop_name.as_str(), departures.iter().collect())),
        }
    }

    pools
        .into_iter()
        .filter_map(|(stop_name, pool)| {
            let trains = rank_departures(pool, now, config);
            (!trains.is_empty()).then(|| BusStopBoard {
                stop_name: stop_name.to_string(),
                trains,
            })
        })
        .collect()
}
