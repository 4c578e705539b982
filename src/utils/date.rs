use chrono::{NaiveDate, NaiveTime};

use crate::consts::{BACKEND_DATETIME_FORMAT, DATE_FORMAT};
use crate::error::AppError;

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Lenient parse of a backend date field ("2026-02-27", "2026-02-27 00:00:00",
/// "2026-02-27T00:00:00Z", ...). Only the calendar day is kept.
pub(crate) fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

/// "2026-02-27 00:00:00"
pub(crate) fn backend_start_of_day(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .format(BACKEND_DATETIME_FORMAT)
        .to_string()
}

/// "2026-02-27 23:59:59"
pub(crate) fn backend_end_of_day(date: NaiveDate) -> String {
    let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(end).format(BACKEND_DATETIME_FORMAT).to_string()
}
