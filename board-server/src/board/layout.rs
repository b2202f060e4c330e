//! Which stations and directions the board shows, and in what colours.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::LineId;

/// Colour used when nothing else matches.
pub const DEFAULT_COLOR: &str = "#cccccc";

const STATION_SUFFIX: char = '駅';

/// Errors from loading a layout file.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("failed to read layout {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid layout {path}: {message}")]
    Json { path: String, message: String },
}

/// One station on the board, shown as a left and a right direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutEntry {
    /// Station key as published by the provider.
    pub station: String,
    /// Direction key shown on the left.
    pub left: String,
    /// Direction key shown on the right.
    pub right: String,
}

impl LayoutEntry {
    pub fn new(station: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            station: station.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn directions(&self) -> [&str; 2] {
        [self.left.as_str(), self.right.as_str()]
    }
}

#[derive(Debug, Deserialize)]
struct Sides {
    left: String,
    right: String,
}

/// Layout files are either a list of entries or an object keyed by station.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayoutFile {
    List(Vec<LayoutEntry>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

/// The configured board layout, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationLayout {
    pub entries: Vec<LayoutEntry>,
}

impl StationLayout {
    pub fn new(entries: Vec<LayoutEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries = match serde_json::from_str::<LayoutFile>(json)? {
            LayoutFile::List(entries) => entries,
            LayoutFile::Keyed(map) => map
                .into_iter()
                .map(|(station, sides)| {
                    let sides = Sides::deserialize(sides)?;
                    Ok(LayoutEntry::new(station, sides.left, sides.right))
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()?,
        };
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let json = std::fs::read_to_string(path).map_err(|e| LayoutError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json).map_err(|e| LayoutError::Json {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StationLayout {
    fn default() -> Self {
        Self::new(vec![
            LayoutEntry::new(
                "奈良線 八戸ノ里駅",
                "奈良線 大阪難波・尼崎(阪神)方面",
                "奈良線 近鉄奈良方面",
            ),
            LayoutEntry::new("大阪線 長瀬駅", "大阪線 大阪上本町方面", "大阪線 河内国分方面"),
            LayoutEntry::new(
                "ＪＲ俊徳道駅",
                "放出・新大阪・大阪（地下ホーム）方面",
                "久宝寺・奈良方面",
            ),
        ])
    }
}

/// Line colours.
///
/// Looked up by [`LineId`] first, then by the line's operator. Keys with no
/// table entry fall back to substring rules on the raw key, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStyles {
    by_line: HashMap<LineId, String>,
    rules: Vec<(String, String)>,
    default_color: String,
}

impl LineStyles {
    pub fn empty() -> Self {
        Self {
            by_line: HashMap::new(),
            rules: Vec::new(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn with_line(mut self, line: impl Into<LineId>, color: impl Into<String>) -> Self {
        self.by_line.insert(line.into(), color.into());
        self
    }

    pub fn with_rule(mut self, needle: impl Into<String>, color: impl Into<String>) -> Self {
        self.rules.push((needle.into(), color.into()));
        self
    }

    /// Colour for a line, falling back to `key` matching.
    pub fn color(&self, line: Option<&LineId>, key: &str) -> &str {
        if let Some(line) = line {
            if let Some(color) = self.by_line.get(line) {
                return color;
            }
            let operator = LineId::operator(line.operator_key());
            if let Some(color) = self.by_line.get(&operator) {
                return color;
            }
        }
        self.color_for_key(key)
    }

    /// Colour by substring rules alone.
    pub fn color_for_key(&self, key: &str) -> &str {
        self.rules
            .iter()
            .find(|(needle, _)| key.contains(needle.as_str()))
            .map_or(self.default_color.as_str(), |(_, color)| color.as_str())
    }
}

impl Default for LineStyles {
    fn default() -> Self {
        Self::empty()
            .with_line("kintetsu/奈良線", "#E60012")
            .with_line("kintetsu/大阪線", "#F8B400")
            .with_line("jr", "#009944")
            .with_line("kintetsuBus", "#58A6FF")
            .with_line("osakaBus", "#FF8C00")
            .with_rule("奈良線", "#E60012")
            .with_rule("大阪線", "#F8B400")
            .with_rule("ＪＲ俊徳道駅", "#009944")
            .with_rule("近鉄バス", "#58A6FF")
            .with_rule("大阪バス", "#FF8C00")
    }
}

/// Short station name for display.
///
/// `"奈良線 八戸ノ里駅"` becomes `"八戸ノ里"`. Keys without a space are
/// returned unchanged.
///
/// ```
/// use board_server::board::extract_station_name;
///
/// assert_eq!(extract_station_name("奈良線 八戸ノ里駅"), "八戸ノ里");
/// assert_eq!(extract_station_name("ＪＲ俊徳道駅"), "ＪＲ俊徳道駅");
/// ```
pub fn extract_station_name(key: &str) -> &str {
    let mut parts = key.split(' ');
    match (parts.next(), parts.next()) {
        (Some(_), Some(name)) => name.strip_suffix(STATION_SUFFIX).unwrap_or(name),
        _ => key,
    }
}

/// Direction title: the last whitespace-separated token of the key.
pub fn direction_title(direction_key: &str) -> &str {
    direction_key.split_whitespace().last().unwrap_or(direction_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn station_names() {
        assert_eq!(extract_station_name("大阪線 長瀬駅"), "長瀬");
        assert_eq!(extract_station_name("線 駅名"), "駅名");
        assert_eq!(extract_station_name("ＪＲ俊徳道駅"), "ＪＲ俊徳道駅");
        assert_eq!(extract_station_name(""), "");
    }

    #[test]
    fn direction_titles() {
        assert_eq!(direction_title("奈良線 近鉄奈良方面"), "近鉄奈良方面");
        assert_eq!(direction_title("久宝寺・奈良方面"), "久宝寺・奈良方面");
        assert_eq!(direction_title(""), "");
    }

    #[test]
    fn line_table_wins_over_rules() {
        let styles = LineStyles::default();
        let kintetsu_nara = LineId::for_station("kintetsu", "奈良線 八戸ノ里駅");
        assert_eq!(styles.color(Some(&kintetsu_nara), "奈良線 八戸ノ里駅"), "#E60012");

        let custom = LineStyles::default().with_line("kintetsu/奈良線", "#000000");
        assert_eq!(custom.color(Some(&kintetsu_nara), "奈良線 八戸ノ里駅"), "#000000");
    }

    #[test]
    fn unknown_line_falls_back_to_rules() {
        let styles = LineStyles::default();
        let hankyu = LineId::operator("hankyu");
        assert_eq!(styles.color(Some(&hankyu), "大阪線 長瀬駅"), "#F8B400");
        assert_eq!(styles.color(None, "ＪＲ俊徳道駅"), "#009944");
        assert_eq!(styles.color(None, "梅田駅"), DEFAULT_COLOR);
    }

    #[test]
    fn unlisted_line_uses_operator_color() {
        let styles = LineStyles::default();
        let jr_line = LineId::for_station("jr", "おおさか東線 俊徳道駅");
        assert_eq!(jr_line.as_str(), "jr/おおさか東線");
        assert_eq!(styles.color(Some(&jr_line), "おおさか東線 俊徳道駅"), "#009944");
    }

    #[test]
    fn first_matching_rule_wins() {
        let styles = LineStyles::empty()
            .with_rule("線", "#111111")
            .with_rule("奈良線", "#222222");
        assert_eq!(styles.color_for_key("奈良線"), "#111111");
    }

    #[test]
    fn layout_from_list() {
        let layout = StationLayout::from_json(
            r#"[{"station": "大阪線 長瀬駅", "left": "L", "right": "R"}]"#,
        )
        .unwrap();
        assert_eq!(layout.entries, vec![LayoutEntry::new("大阪線 長瀬駅", "L", "R")]);
    }

    #[test]
    fn layout_from_keyed_object_keeps_order() {
        let layout = StationLayout::from_json(
            r#"{"Z駅": {"left": "a", "right": "b"}, "A駅": {"left": "c", "right": "d"}}"#,
        )
        .unwrap();
        let stations: Vec<_> = layout.entries.iter().map(|e| e.station.as_str()).collect();
        assert_eq!(stations, ["Z駅", "A駅"]);
    }

    #[test]
    fn layout_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{"ＪＲ俊徳道駅": {"left": "a", "right": "b"}}"#).unwrap();

        let layout = StationLayout::load(&path).unwrap();
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.entries[0].directions(), ["a", "b"]);
    }

    #[test]
    fn invalid_layout_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{"駅": {"left": "only"}}"#).unwrap();
        assert!(matches!(StationLayout::load(&path), Err(LayoutError::Json { .. })));

        let missing = dir.path().join("missing.json");
        assert!(matches!(StationLayout::load(&missing), Err(LayoutError::Io { .. })));
    }

    #[test]
    fn default_layout() {
        let layout = StationLayout::default();
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.entries[2].station, "ＪＲ俊徳道駅");
    }
}
