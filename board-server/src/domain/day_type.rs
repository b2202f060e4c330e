//! Day-type vocabulary.

use std::fmt;

use serde::Serialize;

/// Which timetable variant applies today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Holiday,
}

impl DayType {
    pub fn from_holiday(is_holiday: bool) -> Self {
        if is_holiday {
            DayType::Holiday
        } else {
            DayType::Weekday
        }
    }

    pub fn is_holiday(self) -> bool {
        self == DayType::Holiday
    }

    /// The bus operation type running on this kind of day.
    ///
    /// ```
    /// use board_server::domain::{DayType, OperationType};
    ///
    /// assert_eq!(DayType::Weekday.operation_type(), OperationType::A);
    /// assert_eq!(DayType::Holiday.operation_type(), OperationType::B);
    /// ```
    pub fn operation_type(self) -> OperationType {
        match self {
            DayType::Weekday => OperationType::A,
            DayType::Holiday => OperationType::B,
        }
    }

    /// Key used for this variant in provider payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Holiday => "holiday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bus "A day" / "B day" calendar tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationType {
    A,
    B,
}

impl OperationType {
    /// Parse a provider tag. Surrounding whitespace and case are ignored;
    /// anything other than `A` or `B` is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(OperationType::A),
            "B" | "b" => Some(OperationType::B),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::A => "A",
            OperationType::B => "B",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
