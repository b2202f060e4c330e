//! JSON response bodies.

use serde::Serialize;

use crate::board::{Board, BoardStatus, BusOperatorBoard, BusStopBoard, StationGroup};
use crate::calendar::DayClass;
use crate::domain::{DayType, OperationType};

/// `GET /api/board`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    /// `YYYY-MM-DDTHH:MM:SS`, local wall clock.
    pub generated_at: String,
    pub status: &'static str,

    /// Set when the status is `unavailable`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last refresh failed; the data shown is from an earlier refresh.
    pub stale: bool,

    pub day_type: DayType,
    pub day: DayClass,
    pub stations: Vec<StationGroup>,
    pub buses: Vec<BusOperatorResponse>,
    pub last_updated: Option<String>,
    /// `YYYY-MM-DDTHH:MM:SS`, when the data shown was fetched.
    pub fetched_at: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusOperatorResponse {
    pub operator: String,
    pub color: String,
    pub operation_type: OperationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub stops: Vec<BusStopBoard>,
}

impl From<&BusOperatorBoard> for BusOperatorResponse {
    fn from(board: &BusOperatorBoard) -> Self {
        Self {
            operator: board.operator.clone(),
            color: board.color.clone(),
            operation_type: board.operation_type,
            date: board.date.clone(),
            stops: board.stops.clone(),
        }
    }
}

impl BoardResponse {
    pub fn from_board(board: &Board) -> Self {
        let (status, message) = match &board.status {
            BoardStatus::Loading => ("loading", None),
            BoardStatus::Ready => ("ready", None),
            BoardStatus::Unavailable(message) => ("unavailable", Some(message.clone())),
        };

        Self {
            generated_at: board.generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            status,
            message,
            stale: board.status.is_ready() && board.last_error.is_some(),
            day_type: board.day.day_type(),
            day: board.day.clone(),
            stations: board.stations.clone(),
            buses: board.buses.iter().map(BusOperatorResponse::from).collect(),
            last_updated: board.last_updated.clone(),
            fetched_at: board
                .fetched_at
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
