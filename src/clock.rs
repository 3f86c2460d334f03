//! Calendar-day helpers.
//!
//! Every statistics function takes "today" as an argument; this module is the
//! only place that reads the wall clock. Resolution order for today:
//! 1) CLI `--today` (explicit)
//! 2) `HABITUAL_TODAY` environment variable
//! 3) Local calendar date

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::error::{Error, Result};

/// Format used for date-keys (`YYYY-MM-DD`)
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Environment override for the current day
pub const TODAY_ENV: &str = "HABITUAL_TODAY";

/// Resolve the current day from an explicit value, the environment, or the local clock.
pub fn resolve_today(explicit: Option<&str>) -> Result<NaiveDate> {
    if let Some(raw) = non_empty(explicit) {
        return parse_date(raw);
    }

    if let Ok(raw) = std::env::var(TODAY_ENV) {
        if let Some(raw) = non_empty(Some(raw.as_str())) {
            return parse_date(raw);
        }
    }

    Ok(Local::now().date_naive())
}

/// Parse a `YYYY-MM-DD` date-key.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT)
        .map_err(|_| Error::InvalidDate(format!("expected YYYY-MM-DD, got '{trimmed}'")))
}

/// Parse a `YYYY-MM` month selector into (year, month).
pub fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let trimmed = raw.trim();
    let first = NaiveDate::parse_from_str(&format!("{trimmed}-01"), DATE_KEY_FORMAT)
        .map_err(|_| Error::InvalidDate(format!("expected YYYY-MM, got '{trimmed}'")))?;
    Ok((first.year(), first.month()))
}

/// Render a date as its date-key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Sunday that starts the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Inclusive range of `len` days ending at `end`, oldest first.
pub fn trailing_days(end: NaiveDate, len: u32) -> Vec<NaiveDate> {
    (0..i64::from(len))
        .rev()
        .map(|offset| end - Duration::days(offset))
        .collect()
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
