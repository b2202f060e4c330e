//! Askama templates for the board page.

use askama::Template;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::board::{Board, BoardStatus, BusOperatorBoard, DisplayTrain, StationGroup};
use crate::calendar::DayClass;
use crate::domain::OperationType;

/// Departures this close are highlighted.
pub const IMMINENT_MINUTES: u32 = 20;

const WEEKDAY_NAMES: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];

/// The full board page.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate {
    pub date_header: String,
    pub clock: String,
    pub day_banner: String,
    pub is_holiday: bool,
    pub stations: Vec<StationView>,
    pub buses: Vec<BusOperatorView>,
    /// Shown instead of the board when there is nothing to show.
    pub status_message: Option<String>,
    /// Shown above the board when the data may be stale.
    pub warning: Option<String>,
    pub footer: Option<String>,
}

impl BoardTemplate {
    pub fn from_board(board: &Board, show_footer: bool) -> Self {
        let status_message = match &board.status {
            BoardStatus::Loading => Some("時刻表を読み込み中...".to_string()),
            BoardStatus::Unavailable(message) => Some(format!("時刻表を取得できません: {message}")),
            BoardStatus::Ready => None,
        };
        let warning = match (&board.status, &board.last_error) {
            (BoardStatus::Ready, Some(e)) => Some(format!("最新データの取得に失敗しました: {e}")),
            _ => None,
        };

        Self {
            date_header: format_date_header(board.generated_at.date()),
            clock: board.generated_at.format("%H:%M:%S").to_string(),
            day_banner: day_banner(&board.day),
            is_holiday: board.day.is_holiday,
            stations: board.stations.iter().map(StationView::from_group).collect(),
            buses: board.buses.iter().map(BusOperatorView::from_board).collect(),
            status_message,
            warning,
            footer: show_footer
                .then(|| footer_text(board.last_updated.as_deref(), board.generated_at)),
        }
    }
}

/// One departure row.
#[derive(Debug, Clone)]
pub struct TrainView {
    pub time: String,
    pub destination: String,
    pub kind: String,
    pub countdown: String,
    pub imminent: bool,
    pub next_day: bool,
    pub detail_url: Option<String>,
}

impl TrainView {
    pub fn from_train(train: &DisplayTrain) -> Self {
        Self {
            time: train.time.clone(),
            destination: train.destination.clone(),
            kind: train.kind.clone(),
            countdown: countdown_text(train.remaining_minutes),
            imminent: is_imminent(train.remaining_minutes),
            next_day: train.next_day,
            detail_url: train.detail_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionView {
    pub title: String,
    pub color: String,
    pub trains: Vec<TrainView>,
}

#[derive(Debug, Clone)]
pub struct StationView {
    pub station: String,
    pub color: String,
    pub directions: Vec<DirectionView>,
}

impl StationView {
    pub fn from_group(group: &StationGroup) -> Self {
        Self {
            station: group.station.clone(),
            color: group.color.clone(),
            directions: group
                .directions
                .iter()
                .map(|d| DirectionView {
                    title: d.title.clone(),
                    color: d.color.clone(),
                    trains: d.trains.iter().map(TrainView::from_train).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BusStopView {
    pub stop_name: String,
    pub trains: Vec<TrainView>,
}

#[derive(Debug, Clone)]
pub struct BusOperatorView {
    pub color: String,
    pub banner: String,
    pub stops: Vec<BusStopView>,
}

impl BusOperatorView {
    pub fn from_board(board: &BusOperatorBoard) -> Self {
        Self {
            color: board.color.clone(),
            banner: operation_banner(board.operation_type),
            stops: board
                .stops
                .iter()
                .map(|s| BusStopView {
                    stop_name: s.stop_name.clone(),
                    trains: s.trains.iter().map(TrainView::from_train).collect(),
                })
                .collect(),
        }
    }
}

/// Countdown label, e.g. `あと5分` or `あと1時間10分`.
pub fn countdown_text(minutes: u32) -> String {
    match minutes {
        0 => "まもなく".to_string(),
        1..=59 => format!("あと{minutes}分"),
        _ => {
            let (hours, rest) = (minutes / 60, minutes % 60);
            if rest == 0 {
                format!("あと{hours}時間")
            } else {
                format!("あと{hours}時間{rest}分")
            }
        }
    }
}

pub fn is_imminent(minutes: u32) -> bool {
    (1..=IMMINENT_MINUTES).contains(&minutes)
}

/// `2024年3月15日（金）`.
pub fn format_date_header(date: NaiveDate) -> String {
    let weekday = WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize];
    format!(
        "{}年{}月{}日（{}）",
        date.year(),
        date.month(),
        date.day(),
        weekday
    )
}

pub fn day_banner(day: &DayClass) -> String {
    match (day.is_holiday, day.name.as_str()) {
        (false, _) => "平日ダイヤ".to_string(),
        (true, "") => "休日ダイヤ".to_string(),
        (true, name) => format!("休日ダイヤ（{name}）"),
    }
}

pub fn operation_banner(op: OperationType) -> String {
    format!("{op}日運行")
}

/// `最終更新: 2024/3/15 4:00:00`.
///
/// Uses the provider's timestamp in its own offset when it parses, the
/// raw string when it does not, and `generated_at` when there is none.
pub fn footer_text(last_updated: Option<&str>, generated_at: NaiveDateTime) -> String {
    let stamp = match last_updated {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => format_stamp(parsed.naive_local()),
            Err(_) => raw.to_string(),
        },
        None => format_stamp(generated_at),
    };
    format!("最終更新: {stamp}")
}

fn format_stamp(at: NaiveDateTime) -> String {
    at.format("%Y/%-m/%-d %-H:%M:%S").to_string()
}
