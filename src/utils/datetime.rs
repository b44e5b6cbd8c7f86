//! Date utility functions
//!
//! All due dates are calendar dates. Comparisons never look at time-of-day.

use chrono::{Duration, Local, NaiveDate};

/// Date format used in configuration, forms and logs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Local date offset from today by `days_offset` days
pub fn date_with_offset(days_offset: i64) -> NaiveDate {
    today() + Duration::days(days_offset)
}

/// Order optional dates ascending with missing dates last.
pub fn cmp_due_asc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order optional dates descending with missing dates last.
pub fn cmp_due_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
