//! Bus operator groups.
//!
//! Two payload shapes exist. The current one lists `stops`, one record per
//! (stop, route) with hour → minutes buckets and an optional A/B operation
//! type. The legacy one keys stops by name, then routes by name, each holding
//! a train-style schedule. Both become [`BusRoute`]s with the route name as
//! the destination and an empty label.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{ClockTime, Departure, DirectionSchedule, LineId, OperationType};
use crate::timetable::{BUS_METADATA_KEYS, RawBusStop, RawHourBucket};

use super::trains::parse_direction;
use super::{BusGroup, BusRoute, NormalizeOptions};

pub(super) fn parse_bus_group(
    operator: &str,
    value: &Value,
    options: &NormalizeOptions,
) -> Option<BusGroup> {
    let Some(obj) = value.as_object() else {
        debug!(operator, "skipping bus group that is not an object");
        return None;
    };

    let operation_type = obj
        .get("operationType")
        .and_then(Value::as_str)
        .and_then(OperationType::parse);
    let date = obj.get("date").and_then(Value::as_str).map(str::to_string);

    let mut routes: Vec<BusRoute> = match obj.get("stops") {
        Some(Value::Array(stops)) => stops.iter().filter_map(parse_stop_record).collect(),
        _ => parse_legacy(obj),
    };

    routes.retain(|route| {
        let keep = !options.is_excluded_stop(&route.stop_name);
        if !keep {
            debug!(operator, stop = %route.stop_name, "dropping excluded bus stop");
        }
        keep
    });

    Some(BusGroup {
        operator: operator.to_string(),
        line: LineId::operator(operator),
        operation_type,
        date,
        routes,
    })
}

fn parse_stop_record(value: &Value) -> Option<BusRoute> {
    let raw = match RawBusStop::deserialize(value) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "skipping undecodable bus stop record");
            return None;
        }
    };

    let operation_type = match raw.operation_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(tag) => match OperationType::parse(tag) {
            Some(op) => Some(op),
            None => {
                debug!(stop = %raw.stop_name, tag, "skipping bus record with unknown operation type");
                return None;
            }
        },
    };

    let departures = flatten_buckets(&raw.schedule, &raw.route_name);

    Some(BusRoute {
        stop_name: raw.stop_name,
        route_name: raw.route_name,
        operation_type,
        schedule: DirectionSchedule::Uniform(departures),
    })
}

/// Expand hour → minutes buckets into individual departures.
///
/// ```
/// use board_server::normalize::flatten_buckets;
/// use board_server::timetable::{RawClock, RawHourBucket};
///
/// let buckets = vec![RawHourBucket {
///     hour: Some(RawClock::Number(8)),
///     minutes: vec![RawClock::Number(5), RawClock::Number(35)],
/// }];
/// let deps = flatten_buckets(&buckets, "八戸ノ里駅前→近畿大学東門前");
/// assert_eq!(deps.len(), 2);
/// assert_eq!(deps[1].time.to_string(), "8:35");
/// assert_eq!(deps[1].destination, "八戸ノ里駅前→近畿大学東門前");
/// ```
pub fn flatten_buckets(buckets: &[RawHourBucket], route_name: &str) -> Vec<Departure> {
    let mut departures = Vec::new();

    for bucket in buckets {
        let Some(hour) = bucket.hour.as_ref().and_then(|h| h.value()) else {
            debug!(route = route_name, "skipping hour bucket without a valid hour");
            continue;
        };

        for minute in &bucket.minutes {
            let time = minute.value().and_then(|m| ClockTime::new(hour, m).ok());
            match time {
                Some(time) => departures.push(Departure::new(time, route_name)),
                None => debug!(route = route_name, hour, ?minute, "skipping invalid bus minute"),
            }
        }
    }

    departures
}

fn parse_legacy(obj: &Map<String, Value>) -> Vec<BusRoute> {
    let mut routes = Vec::new();

    for (stop_name, stop_routes) in obj {
        if BUS_METADATA_KEYS.contains(&stop_name.as_str()) {
            continue;
        }
        let Some(stop_routes) = stop_routes.as_object() else {
            debug!(stop = %stop_name, "skipping legacy bus stop that is not an object");
            continue;
        };

        for (route_name, schedule) in stop_routes {
            let Some(schedule) = parse_direction(schedule) else {
                debug!(stop = %stop_name, route = %route_name, "skipping legacy route with unknown shape");
                continue;
            };
            routes.push(BusRoute {
                stop_name: stop_name.clone(),
                route_name: route_name.clone(),
                operation_type: None,
                schedule: as_bus_schedule(schedule, route_name),
            });
        }
    }

    routes
}

/// Buses show the route name as the destination and carry no type label.
fn as_bus_schedule(schedule: DirectionSchedule, route_name: &str) -> DirectionSchedule {
    let relabel = |deps: Vec<Departure>| -> Vec<Departure> {
        deps.into_iter()
            .map(|d| Departure::new(d.time, route_name))
            .collect()
    };

    match schedule {
        DirectionSchedule::Uniform(all) => DirectionSchedule::Uniform(relabel(all)),
        DirectionSchedule::SplitByDayType { weekday, holiday } => {
            DirectionSchedule::SplitByDayType {
                weekday: relabel(weekday),
                holiday: relabel(holiday),
            }
        }
    }
}
