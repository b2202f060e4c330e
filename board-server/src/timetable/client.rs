//! Timetable provider HTTP client.
//!
//! The provider serves every operator's timetable in one `/api/all`
//! document. When the default bus group is missing from that document, its
//! per-day calendar endpoint is queried separately.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::TimetableError;
use super::types::RawTimetable;

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// A bus group that is fetched separately when `/api/all` omits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusFallback {
    /// Group key the result is stored under
    pub operator: String,
    /// Path prefix; the date is appended as `/{YYYY-MM-DD}`
    pub path: String,
}

impl Default for BusFallback {
    fn default() -> Self {
        Self {
            operator: "kintetsuBus".to_string(),
            path: "/api/kintetsu-bus/calendar".to_string(),
        }
    }
}

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct TimetableClientConfig {
    /// Base URL of the provider
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Separate endpoint for a bus group missing from `/api/all`
    pub bus_fallback: Option<BusFallback>,
}

impl TimetableClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
            bus_fallback: Some(BusFallback::default()),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_bus_fallback(mut self, fallback: Option<BusFallback>) -> Self {
        self.bus_fallback = fallback;
        self
    }
}

impl Default for TimetableClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the timetable provider.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
    bus_fallback: Option<BusFallback>,
}

impl TimetableClient {
    pub fn new(config: TimetableClientConfig) -> Result<Self, TimetableError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bus_fallback: config.bus_fallback,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every operator's timetable.
    ///
    /// `today` selects the bus fallback calendar, if one is needed.
    pub async fn fetch_all(&self, today: NaiveDate) -> Result<RawTimetable, TimetableError> {
        let url = format!("{}/api/all", self.base_url);
        let body = self.get_text(&url).await?;

        let mut timetable: RawTimetable =
            serde_json::from_str(&body).map_err(|e| TimetableError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if let Some(fallback) = &self.bus_fallback
            && !timetable.groups.contains_key(&fallback.operator)
        {
            match self.fetch_bus_calendar(fallback, today).await {
                Ok(group) => {
                    debug!(operator = %fallback.operator, "loaded bus group from calendar endpoint");
                    timetable.groups.insert(fallback.operator.clone(), group);
                }
                Err(e) => {
                    warn!(operator = %fallback.operator, error = %e, "bus calendar fetch failed");
                }
            }
        }

        Ok(timetable)
    }

    /// Fetch a bus group for one date.
    pub async fn fetch_bus_calendar(
        &self,
        fallback: &BusFallback,
        date: NaiveDate,
    ) -> Result<Value, TimetableError> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            fallback.path,
            date.format("%Y-%m-%d")
        );
        let body = self.get_text(&url).await?;

        serde_json::from_str(&body).map_err(|e| TimetableError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, TimetableError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TimetableError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TimetableClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.bus_fallback, Some(BusFallback::default()));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = TimetableClient::new(TimetableClientConfig::new("http://example.com/")).unwrap();
        assert_eq!(client.base_url(), "http://example.com");
    }

    #[test]
    fn fallback_can_be_disabled() {
        let config = TimetableClientConfig::default().with_bus_fallback(None);
        assert!(config.bus_fallback.is_none());
    }
}
