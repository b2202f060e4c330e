//! Domain types for the departure board.
//!
//! These are the validated, provider-independent shapes that the rest of
//! the crate works with. Raw payloads are converted into them once, at
//! ingestion, so downstream code never re-inspects the provider's layout.

mod day_type;
mod departure;
mod line;
mod time;

pub use day_type::{DayType, OperationType};
pub use departure::{Departure, DirectionSchedule};
pub use line::LineId;
pub use time::{
    ClockTime, ClockTimeError, Occurrence, next_midnight, remaining_minutes,
    within_next_day_horizon,
};
