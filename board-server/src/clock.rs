//! Source of "now".

use chrono::{Local, NaiveDateTime};

/// Wall clock, optionally frozen at a fixed instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    fixed: Option<NaiveDateTime>,
}

impl Clock {
    /// The system's local wall clock.
    pub fn system() -> Self {
        Self { fixed: None }
    }

    /// A clock that always reads `at`.
    pub fn frozen(at: NaiveDateTime) -> Self {
        Self { fixed: Some(at) }
    }

    pub fn from_override(fixed: Option<NaiveDateTime>) -> Self {
        Self { fixed }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.fixed.unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn is_frozen(&self) -> bool {
        self.fixed.is_some()
    }
}
