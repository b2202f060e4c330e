//! Timetable provider payload DTOs.
//!
//! These map the provider's JSON as-is. Operator groups are kept as raw JSON
//! values because their shape varies per station and per operator; the
//! normalizer decides the shape of each one separately.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level provider payload (`/api/all`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimetable {
    /// When the provider last regenerated the data (ISO 8601).
    pub last_updated: Option<String>,

    /// Operator key → operator payload, in document order.
    #[serde(flatten)]
    pub groups: Map<String, Value>,
}

/// An hour or minute, which providers send either as a number or a string.
///
/// Anything else (`null`, floats, objects) lands in `Other` so that one bad
/// value never fails the record around it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawClock {
    Number(i64),
    Text(String),
    Other(Value),
}

impl RawClock {
    /// The numeric value, if it is a non-negative integer.
    ///
    /// ```
    /// use board_server::timetable::RawClock;
    ///
    /// assert_eq!(RawClock::Text("05".into()).value(), Some(5));
    /// assert_eq!(RawClock::Number(23).value(), Some(23));
    /// assert_eq!(RawClock::Text("".into()).value(), None);
    /// assert_eq!(RawClock::Number(-1).value(), None);
    /// assert_eq!(RawClock::Other(serde_json::json!(5.0)).value(), None);
    /// ```
    pub fn value(&self) -> Option<u32> {
        match self {
            RawClock::Number(n) => u32::try_from(*n).ok(),
            RawClock::Text(s) => s.trim().parse().ok(),
            RawClock::Other(_) => None,
        }
    }
}

/// A train or bus departure as published.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeparture {
    pub hour: Option<RawClock>,
    pub minute: Option<RawClock>,
    #[serde(default)]
    pub destination: Option<String>,
    /// Train type (e.g. "急行").
    #[serde(default)]
    pub train_type: Option<String>,
    /// Legacy bus entries carry their A/B tag here.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub detail_url: Option<String>,
}

/// One route's timetable at one bus stop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBusStop {
    pub stop_name: String,
    pub route_name: String,
    /// `"A"` or `"B"`; absent when the route runs every day.
    #[serde(default)]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub schedule: Vec<RawHourBucket>,
}

/// All minutes past a given hour.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawHourBucket {
    pub hour: Option<RawClock>,
    #[serde(default)]
    pub minutes: Vec<RawClock>,
}

/// Metadata keys that can appear next to stops inside a bus group.
pub const BUS_METADATA_KEYS: [&str; 4] = ["lastUpdated", "operationType", "date", "stops"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_top_level_keeps_group_order() {
        let json = r#"{
            "kintetsu": {},
            "jr": {},
            "lastUpdated": "2024-03-15T04:00:00Z",
            "kintetsuBus": {"stops": []}
        }"#;
        let raw: RawTimetable = serde_json::from_str(json).unwrap();
        assert_eq!(raw.last_updated.as_deref(), Some("2024-03-15T04:00:00Z"));
        let keys: Vec<&str> = raw.groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["kintetsu", "jr", "kintetsuBus"]);
    }

    #[test]
    fn deserialize_departure_with_string_times() {
        let json = r#"{"hour": "9", "minute": "05", "destination": "近鉄奈良", "trainType": "快速急行"}"#;
        let dep: RawDeparture = serde_json::from_str(json).unwrap();
        assert_eq!(dep.hour.unwrap().value(), Some(9));
        assert_eq!(dep.minute.unwrap().value(), Some(5));
        assert_eq!(dep.train_type.as_deref(), Some("快速急行"));
    }

    #[test]
    fn deserialize_legacy_bus_entry() {
        let json = r#"{"hour": 7, "minute": 0, "type": "A"}"#;
        let dep: RawDeparture = serde_json::from_str(json).unwrap();
        assert_eq!(dep.hour.unwrap().value(), Some(7));
        assert_eq!(dep.minute.unwrap().value(), Some(0));
        assert_eq!(dep.destination, None);
        assert_eq!(dep.train_type, None);
        assert_eq!(dep.kind.as_deref(), Some("A"));
    }

    #[test]
    fn deserialize_departure_with_both_type_fields() {
        let json = r#"{"hour": 9, "minute": 5, "trainType": "急行", "type": "A"}"#;
        let dep: RawDeparture = serde_json::from_str(json).unwrap();
        assert_eq!(dep.train_type.as_deref(), Some("急行"));
        assert_eq!(dep.kind.as_deref(), Some("A"));
    }

    #[test]
    fn bucket_tolerates_junk_minutes() {
        let json = r#"{"hour": 9, "minutes": [10, null, 5.0, {"m": 1}, 20]}"#;
        let bucket: RawHourBucket = serde_json::from_str(json).unwrap();
        let minutes: Vec<Option<u32>> = bucket.minutes.iter().map(RawClock::value).collect();
        assert_eq!(minutes, vec![Some(10), None, None, None, Some(20)]);
    }

    #[test]
    fn deserialize_bus_stop() {
        let json = r#"{
            "stopName": "近畿大学東門前",
            "routeName": "近畿大学東門前→八戸ノ里駅前",
            "operationType": "A",
            "schedule": [{"hour": 8, "minutes": [5, 25, 45]}]
        }"#;
        let stop: RawBusStop = serde_json::from_str(json).unwrap();
        assert_eq!(stop.operation_type.as_deref(), Some("A"));
        assert_eq!(stop.schedule[0].minutes.len(), 3);
    }
}
