//! Cell-level parsing utilities.
//!
//! Parsing never fails loudly: a cell that cannot be interpreted becomes
//! `None`, and the loader decides what to do with the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::schema::SchemaConfig;

/// Parses a date cell, trying each `chrono` format in order.
///
/// Date-time values are reduced to their calendar date, taken in the offset
/// the value was written with. RFC 3339 timestamps parse even when no
/// format lists them. Returns `None` for empty cells and for text that
/// matches nothing.
#[must_use]
pub fn parse_date(s: &str, formats: &[String]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.date_naive());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Returns the cell exactly as written, or `None` if it is absent, blank,
/// or one of the schema's missing-value tokens.
#[must_use]
pub fn present<'a>(cell: Option<&'a str>, schema: &SchemaConfig) -> Option<&'a str> {
    cell.filter(|c| !schema.is_na(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        SchemaConfig::st_louis().date_formats
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_date("2021-01-05", &formats()), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn parses_iso_datetime_variants() {
        let f = formats();
        assert_eq!(parse_date("2022-03-04 13:45:00", &f), Some(ymd(2022, 3, 4)));
        assert_eq!(parse_date("2022-03-04T13:45:00", &f), Some(ymd(2022, 3, 4)));
        assert_eq!(parse_date("2022-03-04T13:45:00.000", &f), Some(ymd(2022, 3, 4)));
    }

    #[test]
    fn parses_us_dates() {
        let f = formats();
        assert_eq!(parse_date("07/20/2021", &f), Some(ymd(2021, 7, 20)));
        assert_eq!(parse_date("7/20/2021 14:00", &f), Some(ymd(2021, 7, 20)));
        assert_eq!(parse_date("12/31/2023 11:59:00 PM", &f), Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn parses_offset_timestamps() {
        let f = formats();
        assert_eq!(parse_date("2021-01-05T10:00:00Z", &f), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("2021-01-05 10:00:00-06:00", &f), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("2021-01-05T23:30:00+09:00", &f), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn rfc3339_needs_no_listed_format() {
        let f = vec!["%Y-%m-%d".to_string()];
        assert_eq!(parse_date("2021-01-05T10:00:00Z", &f), Some(ymd(2021, 1, 5)));
        assert!(parse_date("2021/01/05", &f).is_none());
    }

    #[test]
    fn parses_slashed_and_twelve_hour_dates() {
        let f = formats();
        assert_eq!(parse_date("2021/01/05", &f), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("2021/01/05 10:00:00", &f), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("01/05/2021 10:00 AM", &f), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("01/05/2021 10:00 PM", &f), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_date("  2021-01-05 ", &formats()), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        let f = formats();
        assert!(parse_date("", &f).is_none());
        assert!(parse_date("   ", &f).is_none());
        assert!(parse_date("not-a-date", &f).is_none());
        assert!(parse_date("2021-02-30", &f).is_none());
    }

    #[test]
    fn present_keeps_cells_as_written() {
        let schema = SchemaConfig::st_louis();
        assert_eq!(present(Some(" Theft "), &schema), Some(" Theft "));
        assert_eq!(present(Some("10:00"), &schema), Some("10:00"));
    }

    #[test]
    fn present_drops_blank_and_na_cells() {
        let schema = SchemaConfig::st_louis();
        assert_eq!(present(Some("  "), &schema), None);
        assert_eq!(present(Some("N/A"), &schema), None);
        assert_eq!(present(Some("NULL"), &schema), None);
        assert_eq!(present(Some("nan"), &schema), None);
        assert_eq!(present(None, &schema), None);
    }
}
