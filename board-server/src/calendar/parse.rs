//! Holiday CSV parsing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

/// Holiday date → display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    /// A calendar with no holidays. Classification then falls back to
    /// weekends only.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, name: impl Into<String>) {
        self.holidays.insert(date, name.into());
    }

    pub fn get(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// Look up by ISO `YYYY-MM-DD` string.
    pub fn get_iso(&self, iso: &str) -> Option<&str> {
        let date = NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok()?;
        self.get(date)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

impl FromIterator<(NaiveDate, String)> for HolidayCalendar {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, String)>>(iter: T) -> Self {
        Self {
            holidays: iter.into_iter().collect(),
        }
    }
}

/// Parse the holiday CSV resource.
///
/// The first row is a header. Each data row has a `YYYY/M/D` date and a
/// holiday name, either of which may be quoted; extra columns are ignored.
/// Rows with fewer than two columns or an unparseable date are skipped.
/// Quote characters are stripped per field rather than treated as CSV
/// quoting, so an unbalanced quote only affects its own row.
///
/// # Examples
///
/// ```
/// use board_server::calendar::parse_calendar;
///
/// let text = "国民の祝日・休日月日,国民の祝日・休日名称\n2024/1/1,元日\n\"2024/2/11\",\"建国記念の日\"\n";
/// let calendar = parse_calendar(text);
/// assert_eq!(calendar.get_iso("2024-01-01"), Some("元日"));
/// assert_eq!(calendar.get_iso("2024-02-11"), Some("建国記念の日"));
/// ```
pub fn parse_calendar(text: &str) -> HolidayCalendar {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut calendar = HolidayCalendar::empty();

    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(row, error = %e, "skipping unreadable calendar row");
                continue;
            }
        };

        let (Some(date), Some(name)) = (record.get(0), record.get(1)) else {
            if record.iter().any(|f| !f.is_empty()) {
                debug!(row, "skipping calendar row with fewer than two columns");
            }
            continue;
        };

        match parse_slash_date(date) {
            Some(date) => calendar.insert(date, strip_quotes(name)),
            None => debug!(row, date, "skipping calendar row with unparseable date"),
        }
    }

    calendar
}

/// Parse `YYYY/M/D` (zero padding optional).
fn parse_slash_date(s: &str) -> Option<NaiveDate> {
    let s = strip_quotes(s);
    let mut parts = s.split('/');
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Remove quote characters from a field.
fn strip_quotes(s: &str) -> String {
    s.replace('"', "").trim().to_string()
}
