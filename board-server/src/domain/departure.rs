//! Normalized departures and per-direction schedules.

use super::{ClockTime, DayType};

/// A single published departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub time: ClockTime,
    pub destination: String,
    /// Train or bus type. May be empty.
    pub label: String,
    pub detail_url: Option<String>,
}

impl Departure {
    pub fn new(time: ClockTime, destination: impl Into<String>) -> Self {
        Self {
            time,
            destination: destination.into(),
            label: String::new(),
            detail_url: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_detail_url(mut self, url: impl Into<String>) -> Self {
        self.detail_url = Some(url.into());
        self
    }
}

/// The departures of one direction, in publication order.
///
/// Providers either publish one list that applies every day, or separate
/// weekday and holiday lists. The shape is decided once at ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionSchedule {
    /// Same timetable regardless of day type.
    Uniform(Vec<Departure>),
    SplitByDayType {
        weekday: Vec<Departure>,
        holiday: Vec<Departure>,
    },
}

impl DirectionSchedule {
    /// The departures that apply on the given day type.
    pub fn departures(&self, day: DayType) -> &[Departure] {
        match self {
            DirectionSchedule::Uniform(all) => all,
            DirectionSchedule::SplitByDayType { weekday, holiday } => match day {
                DayType::Weekday => weekday,
                DayType::Holiday => holiday,
            },
        }
    }

    /// Total departures across all variants.
    pub fn len(&self) -> usize {
        match self {
            DirectionSchedule::Uniform(all) => all.len(),
            DirectionSchedule::SplitByDayType { weekday, holiday } => weekday.len() + holiday.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DirectionSchedule {
    fn default() -> Self {
        DirectionSchedule::Uniform(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(h: u32, m: u32, dest: &str) -> Departure {
        Departure::new(ClockTime::new(h, m).unwrap(), dest)
    }

    #[test]
    fn uniform_ignores_day_type() {
        let schedule = DirectionSchedule::Uniform(vec![dep(9, 0, "Nara")]);
        assert_eq!(schedule.departures(DayType::Weekday).len(), 1);
        assert_eq!(schedule.departures(DayType::Holiday).len(), 1);
    }

    #[test]
    fn split_selects_variant() {
        let schedule = DirectionSchedule::SplitByDayType {
            weekday: vec![dep(9, 0, "Nara"), dep(9, 10, "Nara")],
            holiday: vec![dep(10, 0, "Namba")],
        };
        assert_eq!(schedule.departures(DayType::Weekday).len(), 2);
        assert_eq!(
            schedule.departures(DayType::Holiday)[0].destination,
            "Namba"
        );
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn builder_sets_optional_fields() {
        let d = dep(9, 0, "Nara")
            .with_label("急行")
            .with_detail_url("https://example.com/1");
        assert_eq!(d.label, "急行");
        assert_eq!(d.detail_url.as_deref(), Some("https://example.com/1"));
    }
}
