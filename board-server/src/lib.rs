//! Live departure board server.
//!
//! Normalizes multi-operator train and bus timetables and keeps a board of
//! the next departures per direction, with countdowns, current to the
//! second.

pub mod board;
pub mod cache;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod domain;
pub mod normalize;
pub mod refresh;
pub mod timetable;
pub mod web;
