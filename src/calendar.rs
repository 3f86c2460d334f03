//! Month heat map over the completion store.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::completion::CompletionStore;
use crate::error::{Error, Result};
use crate::stats::{self, DayCompletion};

/// Intensity bucket for a day's completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Heat {
    Empty,
    Minimal,
    Low,
    Medium,
    High,
    Perfect,
}

impl Heat {
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            0 => Heat::Empty,
            p if p >= 100 => Heat::Perfect,
            p if p >= 75 => Heat::High,
            p if p >= 50 => Heat::Medium,
            p if p >= 25 => Heat::Low,
            _ => Heat::Minimal,
        }
    }

    /// Single-cell glyph for terminal rendering.
    pub fn glyph(self) -> char {
        match self {
            Heat::Empty => '·',
            Heat::Minimal => '░',
            Heat::Low => '▒',
            Heat::Medium => '▓',
            Heat::High => '█',
            Heat::Perfect => '★',
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub completion: DayCompletion,
    pub heat: Heat,
    pub is_today: bool,
    pub is_future: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub active_days: u32,
    pub perfect_days: u32,
    pub average_percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Blank cells before the 1st in a Sunday-first grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
    pub totals: MonthTotals,
}

impl MonthView {
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

pub fn month_view(
    store: &CompletionStore,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<MonthView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidDate(format!("no such month {year}-{month:02}")))?;

    let mut days = Vec::with_capacity(31);
    let mut date = first;
    while date.month() == month {
        let completion = stats::day_completion(store, date);
        days.push(CalendarDay {
            day: date.day(),
            date,
            completion,
            heat: Heat::for_percentage(completion.percentage),
            is_today: date == today,
            is_future: date > today,
        });
        date += Duration::days(1);
    }

    let totals = month_totals(&days);
    Ok(MonthView {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
        totals,
    })
}

fn month_totals(days: &[CalendarDay]) -> MonthTotals {
    let active: Vec<&DayCompletion> = days
        .iter()
        .map(|day| &day.completion)
        .filter(|completion| completion.has_data())
        .collect();
    if active.is_empty() {
        return MonthTotals::default();
    }

    let sum: u32 = active.iter().map(|completion| completion.percentage).sum();
    MonthTotals {
        active_days: active.len() as u32,
        perfect_days: active.iter().filter(|completion| completion.is_perfect()).count() as u32,
        average_percentage: (f64::from(sum) / active.len() as f64).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn heat_buckets() {
        assert_eq!(Heat::for_percentage(0), Heat::Empty);
        assert_eq!(Heat::for_percentage(10), Heat::Minimal);
        assert_eq!(Heat::for_percentage(25), Heat::Low);
        assert_eq!(Heat::for_percentage(50), Heat::Medium);
        assert_eq!(Heat::for_percentage(75), Heat::High);
        assert_eq!(Heat::for_percentage(99), Heat::High);
        assert_eq!(Heat::for_percentage(100), Heat::Perfect);
    }

    #[test]
    fn february_leap_year_layout() {
        let view = month_view(&CompletionStore::new(), 2024, 2, day("2024-02-10")).unwrap();
        assert_eq!(view.days.len(), 29);
        // 2024-02-01 is a Thursday
        assert_eq!(view.leading_blanks, 4);
        assert_eq!(view.title(), "February 2024");
        assert!(view.days[9].is_today);
        assert!(view.days[10].is_future);
        assert_eq!(view.totals, MonthTotals::default());
    }

    #[test]
    fn totals_cover_active_days_only() {
        let mut store = CompletionStore::new();
        store.toggle(day("2024-03-01"), "a");
        store.toggle(day("2024-03-02"), "a");
        store.seed(day("2024-03-02"), ["b"]);

        let view = month_view(&store, 2024, 3, day("2024-03-31")).unwrap();
        assert_eq!(view.days[0].heat, Heat::Perfect);
        assert_eq!(view.days[1].heat, Heat::Medium);
        assert_eq!(view.days[2].heat, Heat::Empty);
        assert_eq!(
            view.totals,
            MonthTotals { active_days: 2, perfect_days: 1, average_percentage: 75 }
        );
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_view(&CompletionStore::new(), 2024, 13, day("2024-01-01")).is_err());
    }
}
