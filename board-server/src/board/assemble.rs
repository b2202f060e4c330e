//! Mapping the configured layout onto normalized data.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::DayType;
use crate::normalize::NormalizedTimetable;

use super::layout::{LineStyles, StationLayout, direction_title, extract_station_name};
use super::rank::{DisplayTrain, RankConfig, rank};

/// One direction panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDirection {
    pub station: String,
    pub title: String,
    pub color: String,
    pub trains: Vec<DisplayTrain>,
}

/// All panels for one physical station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationGroup {
    pub station: String,
    pub color: String,
    pub directions: Vec<DisplayDirection>,
}

/// Build the station groups for the configured layout.
///
/// A layout station or direction missing from `normalized` produces an
/// empty panel. Entries sharing a short station name share a group.
pub fn assemble(
    layout: &StationLayout,
    normalized: &NormalizedTimetable,
    day: DayType,
    now: NaiveDateTime,
    config: &RankConfig,
    styles: &LineStyles,
) -> Vec<StationGroup> {
    let mut groups: Vec<StationGroup> = Vec::new();

    for entry in &layout.entries {
        let station_entry = normalized.station(&entry.station);
        let station = extract_station_name(&entry.station);
        let color = styles.color(station_entry.map(|s| &s.line), &entry.station);

        let directions = entry.directions().map(|direction_key| {
            let trains = station_entry
                .and_then(|s| s.directions.get(direction_key))
                .map(|schedule| rank(schedule, day, now, config))
                .unwrap_or_default();
            DisplayDirection {
                station: station.to_string(),
                title: direction_title(direction_key).to_string(),
                color: color.to_string(),
                trains,
            }
        });

        match groups.iter_mut().find(|g| g.station == station) {
            Some(group) => group.directions.extend(directions),
            None => groups.push(StationGroup {
                station: station.to_string(),
                color: color.to_string(),
                directions: directions.into(),
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LayoutEntry;
    use crate::normalize::normalize;
    use crate::timetable::RawTimetable;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn timetable() -> NormalizedTimetable {
        let raw: RawTimetable = serde_json::from_str(
            r#"{
                "kintetsu": {
                    "奈良線 八戸ノ里駅": {
                        "奈良線 近鉄奈良方面": {
                            "weekday": [
                                {"hour": "9", "minute": "20", "destination": "近鉄奈良", "trainType": "快速急行"},
                                {"hour": "9", "minute": "05", "destination": "近鉄奈良", "trainType": "普通"}
                            ],
                            "holiday": []
                        }
                    }
                },
                "jr": {
                    "ＪＲ俊徳道駅": {
                        "久宝寺・奈良方面": [{"hour": "9", "minute": "10", "destination": "久宝寺", "trainType": "普通"}]
                    }
                }
            }"#,
        )
        .unwrap();
        normalize(&raw)
    }

    fn run(layout: &StationLayout) -> Vec<StationGroup> {
        assemble(
            layout,
            &timetable(),
            DayType::Weekday,
            now(),
            &RankConfig::new(4, None),
            &LineStyles::default(),
        )
    }

    #[test]
    fn default_layout() {
        let groups = run(&StationLayout::default());
        let names: Vec<_> = groups.iter().map(|g| g.station.as_str()).collect();
        assert_eq!(names, ["八戸ノ里", "長瀬", "ＪＲ俊徳道駅"]);

        let hattori = &groups[0];
        assert_eq!(hattori.color, "#E60012");
        assert_eq!(hattori.directions.len(), 2);
        assert_eq!(hattori.directions[0].title, "大阪難波・尼崎(阪神)方面");
        assert!(hattori.directions[0].trains.is_empty());

        let nara_bound = &hattori.directions[1];
        assert_eq!(nara_bound.title, "近鉄奈良方面");
        let times: Vec<_> = nara_bound.trains.iter().map(|t| t.time.as_str()).collect();
        assert_eq!(times, ["9:05", "9:20"]);

        assert_eq!(groups[2].color, "#009944");
        assert_eq!(groups[2].directions[1].trains.len(), 1);
    }

    #[test]
    fn missing_station_yields_empty_panels() {
        let groups = run(&StationLayout::default());
        let nagase = &groups[1];
        assert_eq!(nagase.color, "#F8B400");
        assert!(nagase.directions.iter().all(|d| d.trains.is_empty()));
    }

    #[test]
    fn entries_with_the_same_name_share_a_group() {
        let layout = StationLayout::new(vec![
            LayoutEntry::new("奈良線 八戸ノ里駅", "奈良線 近鉄奈良方面", "X"),
            LayoutEntry::new("別線 八戸ノ里駅", "Y", "Z"),
        ]);
        let groups = run(&layout);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].directions.len(), 4);
        assert_eq!(groups[0].directions[2].color, "#cccccc");
    }

    #[test]
    fn empty_layout() {
        assert!(run(&StationLayout::new(Vec::new())).is_empty());
    }
}
