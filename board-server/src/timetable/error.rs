//! Timetable provider error types.

/// Errors from fetching or decoding the provider payload.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Reading a local timetable file failed
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TimetableError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = TimetableError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");

        let err = TimetableError::Io {
            path: "timetable.json".into(),
            message: "not found".into(),
        };
        assert!(err.to_string().contains("timetable.json"));
    }
}
