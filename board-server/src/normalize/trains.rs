//! Train operator groups: station → direction → schedule.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{ClockTime, Departure, DirectionSchedule, LineId};
use crate::timetable::RawDeparture;

use super::StationEntry;

/// Merge one operator's stations into `stations`.
///
/// A station key already present (from an earlier operator) is replaced.
pub(super) fn merge_operator(
    operator: &str,
    value: &Value,
    stations: &mut HashMap<String, StationEntry>,
) {
    let Some(operator_stations) = value.as_object() else {
        debug!(operator, "skipping operator group that is not an object");
        return;
    };

    for (station_key, directions) in operator_stations {
        let Some(directions) = directions.as_object() else {
            debug!(operator, station = %station_key, "skipping station that is not an object");
            continue;
        };

        let mut parsed = HashMap::with_capacity(directions.len());
        for (direction_key, schedule) in directions {
            match parse_direction(schedule) {
                Some(schedule) => {
                    parsed.insert(direction_key.clone(), schedule);
                }
                None => debug!(
                    operator,
                    station = %station_key,
                    direction = %direction_key,
                    "skipping direction with unknown shape"
                ),
            }
        }

        if stations.contains_key(station_key) {
            debug!(operator, station = %station_key, "station key already present, replacing");
        }

        stations.insert(
            station_key.clone(),
            StationEntry {
                operator: operator.to_string(),
                line: LineId::for_station(operator, station_key),
                directions: parsed,
            },
        );
    }
}

/// Decide the shape of one direction's schedule.
///
/// An array applies to every day type. An object with `weekday` and/or
/// `holiday` keys is split by day type; a missing key is an empty list.
/// Anything else is not a schedule.
pub(crate) fn parse_direction(value: &Value) -> Option<DirectionSchedule> {
    match value {
        Value::Array(items) => Some(DirectionSchedule::Uniform(parse_departures(items))),
        Value::Object(obj) if obj.contains_key("weekday") || obj.contains_key("holiday") => {
            Some(DirectionSchedule::SplitByDayType {
                weekday: departures_at(obj.get("weekday")),
                holiday: departures_at(obj.get("holiday")),
            })
        }
        _ => None,
    }
}

fn departures_at(value: Option<&Value>) -> Vec<Departure> {
    match value {
        Some(Value::Array(items)) => parse_departures(items),
        _ => Vec::new(),
    }
}

/// Parse a list of raw departures, skipping malformed entries.
pub(crate) fn parse_departures(items: &[Value]) -> Vec<Departure> {
    items
        .iter()
        .filter_map(|item| {
            let raw = match RawDeparture::deserialize(item) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(error = %e, "skipping undecodable departure");
                    return None;
                }
            };
            let departure = departure_from_raw(&raw);
            if departure.is_none() {
                debug!(hour = ?raw.hour, minute = ?raw.minute, "skipping departure without a valid time");
            }
            departure
        })
        .collect()
}

/// Convert a raw departure. `None` if the hour or minute is missing,
/// non-numeric or out of range.
pub(crate) fn departure_from_raw(raw: &RawDeparture) -> Option<Departure> {
    let hour = raw.hour.as_ref()?.value()?;
    let minute = raw.minute.as_ref()?.value()?;
    let time = ClockTime::new(hour, minute).ok()?;

    Some(Departure {
        time,
        destination: raw.destination.clone().unwrap_or_default(),
        label: raw
            .train_type
            .as_ref()
            .or(raw.kind.as_ref())
            .cloned()
            .unwrap_or_default(),
        detail_url: raw.detail_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_is_uniform() {
        let value = json!([
            {"hour": "9", "minute": "5", "destination": "久宝寺", "trainType": "普通"}
        ]);
        let schedule = parse_direction(&value).unwrap();
        let DirectionSchedule::Uniform(deps) = schedule else {
            panic!("expected uniform schedule");
        };
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].time, ClockTime::new(9, 5).unwrap());
        assert_eq!(deps[0].destination, "久宝寺");
        assert_eq!(deps[0].label, "普通");
    }

    #[test]
    fn object_is_split() {
        let value = json!({
            "weekday": [{"hour": "6", "minute": "00", "destination": "近鉄奈良"}],
            "holiday": []
        });
        let schedule = parse_direction(&value).unwrap();
        match schedule {
            DirectionSchedule::SplitByDayType { weekday, holiday } => {
                assert_eq!(weekday.len(), 1);
                assert!(holiday.is_empty());
            }
            other => panic!("expected split schedule, got {other:?}"),
        }
    }

    #[test]
    fn missing_variant_is_empty() {
        let value = json!({"weekday": [{"hour": 6, "minute": 0, "destination": "X"}]});
        match parse_direction(&value).unwrap() {
            DirectionSchedule::SplitByDayType { holiday, .. } => assert!(holiday.is_empty()),
            other => panic!("expected split schedule, got {other:?}"),
        }
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        assert!(parse_direction(&json!("06:00")).is_none());
        assert!(parse_direction(&json!({"saturday": []})).is_none());
        assert!(parse_direction(&json!(null)).is_none());
    }

    #[test]
    fn malformed_departures_are_skipped() {
        let items = vec![
            json!({"hour": "7", "minute": "10", "destination": "A"}),
            json!({"minute": "10", "destination": "no hour"}),
            json!({"hour": "7", "destination": "no minute"}),
            json!({"hour": "x", "minute": "10"}),
            json!({"hour": "25", "minute": "10"}),
            json!({"hour": "7", "minute": "10", "destination": 42}),
            json!("not an object"),
            json!({"hour": "0", "minute": "0", "destination": "midnight"}),
        ];
        let deps = parse_departures(&items);
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].destination, "A");
        assert_eq!(deps[1].destination, "midnight");
    }

    #[test]
    fn junk_minute_skips_only_that_departure() {
        let items = vec![
            json!({"hour": 7, "minute": 5.5, "destination": "float"}),
            json!({"hour": 7, "minute": null, "destination": "null"}),
            json!({"hour": 7, "minute": 20, "destination": "ok", "trainType": "急行", "type": "A"}),
        ];
        let deps = parse_departures(&items);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].destination, "ok");
        assert_eq!(deps[0].label, "急行");
    }

    #[test]
    fn publication_order_is_preserved() {
        let items = vec![
            json!({"hour": 10, "minute": 0}),
            json!({"hour": 9, "minute": 0}),
        ];
        let deps = parse_departures(&items);
        assert_eq!(deps[0].time.hour(), 10);
        assert_eq!(deps[1].time.hour(), 9);
    }

    #[test]
    fn merge_attaches_line_id() {
        let value = json!({
            "奈良線 八戸ノ里駅": {
                "奈良線 近鉄奈良方面": {"weekday": [], "holiday": []},
                "broken": 3
            }
        });
        let mut stations = HashMap::new();
        merge_operator("kintetsu", &value, &mut stations);

        let entry = &stations["奈良線 八戸ノ里駅"];
        assert_eq!(entry.operator, "kintetsu");
        assert_eq!(entry.line.as_str(), "kintetsu/奈良線");
        assert_eq!(entry.directions.len(), 1);
        assert!(entry.directions.contains_key("奈良線 近鉄奈良方面"));
    }
}
