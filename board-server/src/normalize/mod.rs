//! Schedule normalization.
//!
//! Converts the provider's heterogeneous payload into one canonical shape:
//! a flat station map whose directions are [`DirectionSchedule`]s, plus the
//! bus groups as lists of [`BusRoute`]s. The shape of each direction is
//! decided here, once, so ranking never has to look at raw JSON.
//!
//! Malformed records are skipped individually; normalization never fails.

mod buses;
mod trains;

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::domain::{DirectionSchedule, LineId, OperationType};
use crate::timetable::RawTimetable;

pub use buses::flatten_buckets;

/// Options applied while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Bus stop names to drop from every bus group.
    pub excluded_bus_stops: Vec<String>,
}

impl NormalizeOptions {
    pub fn is_excluded_stop(&self, stop_name: &str) -> bool {
        self.excluded_bus_stops.iter().any(|s| s == stop_name)
    }
}

/// One station as published by one operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationEntry {
    /// Provider group key the station came from.
    pub operator: String,
    pub line: LineId,
    /// Direction key → schedule.
    pub directions: HashMap<String, DirectionSchedule>,
}

/// One route's departures at one bus stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusRoute {
    pub stop_name: String,
    pub route_name: String,
    /// Only runs on days of this type, when present.
    pub operation_type: Option<OperationType>,
    pub schedule: DirectionSchedule,
}

/// All routes published by one bus operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusGroup {
    pub operator: String,
    pub line: LineId,
    /// The operator's own statement of today's operation type.
    pub operation_type: Option<OperationType>,
    /// Service date the operator published, verbatim.
    pub date: Option<String>,
    /// In publication order.
    pub routes: Vec<BusRoute>,
}

/// The canonical form of one provider payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTimetable {
    /// Station key → entry, across all train operators.
    pub stations: HashMap<String, StationEntry>,
    /// In publication order.
    pub bus_groups: Vec<BusGroup>,
    pub last_updated: Option<String>,
}

impl NormalizedTimetable {
    pub fn station(&self, key: &str) -> Option<&StationEntry> {
        self.stations.get(key)
    }

    /// Schedule for a station and direction, if both exist.
    pub fn direction(&self, station_key: &str, direction_key: &str) -> Option<&DirectionSchedule> {
        self.station(station_key)?.directions.get(direction_key)
    }

    /// Nothing usable was found in the payload.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.bus_groups.iter().all(|g| g.routes.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Trains,
    Buses,
    Ignored,
}

/// Classify a top-level group.
///
/// Bus groups are recognised by a key ending in `Bus` or a `stops` array;
/// any other object is a train operator. Non-object values are metadata.
fn classify_group(key: &str, value: &Value) -> GroupKind {
    let Some(obj) = value.as_object() else {
        return GroupKind::Ignored;
    };

    if key.ends_with("Bus") || obj.get("stops").is_some_and(Value::is_array) {
        GroupKind::Buses
    } else {
        GroupKind::Trains
    }
}

/// Normalize with default options.
pub fn normalize(raw: &RawTimetable) -> NormalizedTimetable {
    normalize_with(raw, &NormalizeOptions::default())
}

/// Normalize a provider payload.
///
/// Train operators are merged into one station map in document order, so
/// a station key published by two operators keeps the later one.
pub fn normalize_with(raw: &RawTimetable, options: &NormalizeOptions) -> NormalizedTimetable {
    let mut stations = HashMap::new();
    let mut bus_groups = Vec::new();

    for (key, value) in &raw.groups {
        match classify_group(key, value) {
            GroupKind::Trains => trains::merge_operator(key, value, &mut stations),
            GroupKind::Buses => {
                if let Some(group) = buses::parse_bus_group(key, value, options) {
                    bus_groups.push(group);
                }
            }
            GroupKind::Ignored => debug!(group = %key, "ignoring non-object top-level value"),
        }
    }

    NormalizedTimetable {
        stations,
        bus_groups,
        last_updated: raw.last_updated.clone(),
    }
}
