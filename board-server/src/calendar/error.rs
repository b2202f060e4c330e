//! Holiday calendar fetch errors.

/// Errors fetching the holiday calendar resource.
///
/// None of these are fatal to the board; callers fall back to weekend-only
/// classification.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("calendar resource returned status {status}")]
    Status { status: u16 },

    /// Response parsed to no holidays at all
    #[error("calendar resource contained no holidays")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CalendarError::Status { status: 404 };
        assert_eq!(err.to_string(), "calendar resource returned status 404");

        assert_eq!(
            CalendarError::Empty.to_string(),
            "calendar resource contained no holidays"
        );
    }
}
