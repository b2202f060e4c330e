//! Line identifiers attached to data at ingestion.

use std::fmt;

/// Stable identifier for an operator's line.
///
/// Derived from the provider's operator key and, where the station key is
/// written as `"<line> <station>"`, the line name. Display styling is keyed
/// on this rather than on the free-form station key.
///
/// # Examples
///
/// ```
/// use board_server::domain::LineId;
///
/// assert_eq!(LineId::for_station("kintetsu", "奈良線 八戸ノ里駅").as_str(), "kintetsu/奈良線");
/// assert_eq!(LineId::for_station("jr", "ＪＲ俊徳道駅").as_str(), "jr");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(String);

impl LineId {
    /// Identifier for a whole operator.
    pub fn operator(operator: &str) -> Self {
        Self(operator.to_string())
    }

    pub fn for_station(operator: &str, station_key: &str) -> Self {
        match station_key.split_once(' ') {
            Some((line, _)) if !line.is_empty() => Self(format!("{operator}/{line}")),
            _ => Self::operator(operator),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The operator part of the identifier.
    pub fn operator_key(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
