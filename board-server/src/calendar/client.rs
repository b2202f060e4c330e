//! Holiday calendar HTTP client.

use super::error::CalendarError;
use super::parse::{HolidayCalendar, parse_calendar};

/// Cabinet Office national holiday list.
pub const DEFAULT_CALENDAR_URL: &str = "https://www8.cao.go.jp/chosei/shukujitsu/syukujitsu.csv";

/// Charset assumed when the response does not declare one.
pub const DEFAULT_ENCODING: &str = "Shift_JIS";

/// Configuration for the calendar client.
#[derive(Debug, Clone)]
pub struct CalendarClientConfig {
    /// URL of the CSV resource
    pub url: String,
    /// Encoding used when the response has no charset
    pub default_encoding: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CalendarClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_encoding: DEFAULT_ENCODING.to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.default_encoding = encoding.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for CalendarClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CALENDAR_URL)
    }
}

/// Fetches and parses the holiday calendar.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: reqwest::Client,
    url: String,
    default_encoding: String,
}

impl CalendarClient {
    pub fn new(config: CalendarClientConfig) -> Result<Self, CalendarError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
            default_encoding: config.default_encoding,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and parse the calendar.
    ///
    /// A body that yields no holidays at all is reported as
    /// [`CalendarError::Empty`] so callers can tell it apart from a real,
    /// empty year.
    pub async fn fetch(&self) -> Result<HolidayCalendar, CalendarError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CalendarError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text_with_charset(&self.default_encoding).await?;
        let calendar = parse_calendar(&text);

        if calendar.is_empty() {
            return Err(CalendarError::Empty);
        }

        Ok(calendar)
    }
}
