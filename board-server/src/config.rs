//! Runtime configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::board::RankConfig;
use crate::cache::CacheConfig;
use crate::calendar::{DEFAULT_CALENDAR_URL, DEFAULT_ENCODING};
use crate::normalize::NormalizeOptions;
use crate::timetable::DEFAULT_BASE_URL;

/// A variable was set to something unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub api_base_url: String,
    pub calendar_url: String,
    pub calendar_encoding: String,
    pub calendar_cache_ttl: Duration,
    pub data_refresh: Duration,
    pub clock_tick: Duration,
    pub display_cap: usize,
    /// `None` means rolled-over departures are never cut off.
    pub next_day_horizon: Option<chrono::Duration>,
    /// Frozen "now" for testing the board at a given instant.
    pub debug_datetime: Option<NaiveDateTime>,
    pub timetable_file: Option<PathBuf>,
    pub layout_file: Option<PathBuf>,
    pub excluded_bus_stops: Vec<String>,
    pub show_footer: bool,
    pub bind_addr: SocketAddr,
    pub request_timeout_secs: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            calendar_url: DEFAULT_CALENDAR_URL.to_string(),
            calendar_encoding: DEFAULT_ENCODING.to_string(),
            calendar_cache_ttl: Duration::from_secs(6 * 60 * 60),
            data_refresh: Duration::from_secs(5 * 60),
            clock_tick: Duration::from_secs(1),
            display_cap: 4,
            next_day_horizon: Some(chrono::Duration::hours(6)),
            debug_datetime: None,
            timetable_file: None,
            layout_file: None,
            excluded_bus_stops: Vec::new(),
            show_footer: true,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout_secs: 30,
        }
    }
}

impl BoardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from a variable lookup.
    ///
    /// Unset and blank variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            api_base_url: get("API_BASE_URL").unwrap_or(defaults.api_base_url),
            calendar_url: get("HOLIDAY_CALENDAR_URL").unwrap_or(defaults.calendar_url),
            calendar_encoding: get("HOLIDAY_CALENDAR_ENCODING")
                .unwrap_or(defaults.calendar_encoding),
            calendar_cache_ttl: match get("HOLIDAY_CACHE_SECS") {
                Some(v) => Duration::from_secs(parse_positive("HOLIDAY_CACHE_SECS", &v)?),
                None => defaults.calendar_cache_ttl,
            },
            data_refresh: match get("DATA_REFRESH_SECS") {
                Some(v) => Duration::from_secs(parse_positive("DATA_REFRESH_SECS", &v)?),
                None => defaults.data_refresh,
            },
            clock_tick: match get("CLOCK_TICK_MILLIS") {
                Some(v) => Duration::from_millis(parse_positive("CLOCK_TICK_MILLIS", &v)?),
                None => defaults.clock_tick,
            },
            display_cap: match get("DISPLAY_CAP") {
                Some(v) => parse("DISPLAY_CAP", &v)?,
                None => defaults.display_cap,
            },
            next_day_horizon: match get("NEXT_DAY_LOOKAHEAD_HOURS") {
                Some(v) => parse_horizon(&v)?,
                None => defaults.next_day_horizon,
            },
            debug_datetime: get("DEBUG_DATETIME")
                .map(|v| parse_datetime(&v))
                .transpose()?,
            timetable_file: get("TIMETABLE_FILE").map(PathBuf::from),
            layout_file: get("LAYOUT_FILE").map(PathBuf::from),
            excluded_bus_stops: get("EXCLUDED_BUS_STOPS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            show_footer: match get("SHOW_FOOTER") {
                Some(v) => parse_bool("SHOW_FOOTER", &v)?,
                None => defaults.show_footer,
            },
            bind_addr: match get("BIND_ADDR") {
                Some(v) => parse("BIND_ADDR", &v)?,
                None => defaults.bind_addr,
            },
            request_timeout_secs: match get("REQUEST_TIMEOUT_SECS") {
                Some(v) => parse_positive("REQUEST_TIMEOUT_SECS", &v)?,
                None => defaults.request_timeout_secs,
            },
        })
    }

    pub fn rank_config(&self) -> RankConfig {
        RankConfig::new(self.display_cap, self.next_day_horizon)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.calendar_cache_ttl,
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            excluded_bus_stops: self.excluded_bus_stops.clone(),
        }
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::new(var, value, e.to_string()))
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match parse::<u64>(var, value)? {
        0 => Err(ConfigError::new(var, value, "must be greater than zero")),
        n => Ok(n),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::new(var, value, "expected true or false")),
    }
}

fn parse_horizon(value: &str) -> Result<Option<chrono::Duration>, ConfigError> {
    const VAR: &str = "NEXT_DAY_LOOKAHEAD_HOURS";
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let hours: i64 = parse(VAR, value)?;
    if !(0..=24).contains(&hours) {
        return Err(ConfigError::new(VAR, value, "must be between 0 and 24"));
    }
    Ok(Some(chrono::Duration::hours(hours)))
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime, ConfigError> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| ConfigError::new("DEBUG_DATETIME", value, "expected YYYY-MM-DDTHH:MM[:SS]"))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
