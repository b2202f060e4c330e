//! File-backed timetable source for development without a provider.
//!
//! Reads the same JSON document that `/api/all` serves. The file is re-read
//! on every refresh so it can be edited while the board is running.

use std::path::{Path, PathBuf};

use super::error::TimetableError;
use super::types::RawTimetable;

#[derive(Debug, Clone)]
pub struct FileTimetableSource {
    path: PathBuf,
}

impl FileTimetableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RawTimetable, TimetableError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| TimetableError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&json).map_err(|e| TimetableError::Json {
            message: format!("{}: {}", self.path.display(), e),
            body: None,
        })
    }
}
