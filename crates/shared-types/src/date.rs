//! Long-form Vietnamese dates ("ngày 5 tháng 3 năm 2025")

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VN_DATE_PATTERN: Regex =
        Regex::new(r"(\d{1,2})\s+tháng\s+(\d{1,2})\s+năm\s+(\d{4})").unwrap();
}

/// Parse the first `D tháng M năm YYYY` found in `text`.
///
/// Returns `None` when nothing matches or the triple is not a calendar date.
pub fn parse_vn_date(text: &str) -> Option<NaiveDate> {
    let caps = VN_DATE_PATTERN.captures(text)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_vn_date(date: NaiveDate) -> String {
    format!(
        "ngày {} tháng {} năm {}",
        date.day(),
        date.month(),
        date.year()
    )
}
