//! Statistics over the completion store.
//!
//! Everything here is a pure function of a store snapshot and an explicit
//! `today`; nothing reads the clock or mutates state.
//!
//! Streak rule, shared by every caller: a day qualifies when it has at least
//! one entry and at least one completed entry. A tracked day with nothing
//! completed breaks the streak just like an untracked day.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::clock;
use crate::completion::CompletionStore;
use crate::config::StatsConfig;
use crate::task::TaskRegistry;

/// Length of the rolling window used for weekly figures.
pub const ROLLING_WINDOW_DAYS: u32 = 7;

/// Default number of Sunday-aligned weeks scanned for perfect weeks.
pub const DEFAULT_PERFECT_WEEK_SCAN: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayCompletion {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

impl DayCompletion {
    pub fn has_data(&self) -> bool {
        self.total > 0
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    fn qualifies_for_streak(&self) -> bool {
        self.total > 0 && self.completed > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub today: NaiveDate,
    pub today_completion: DayCompletion,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub overall_completion: u32,
    pub days_active: u32,
    pub consistency: u32,
    pub avg_completed_per_day: u32,
    pub tracked_days: usize,
    pub perfect_weeks: u32,
    pub weeks_scanned: u32,
    pub tasks_total: usize,
    pub last_seven_days: Vec<DaySummary>,
}

/// `round(part / whole * 100)`, or 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

pub fn day_completion(store: &CompletionStore, date: NaiveDate) -> DayCompletion {
    let counts = store.counts(date);
    DayCompletion {
        completed: counts.completed,
        total: counts.total,
        percentage: percent(counts.completed, counts.total),
    }
}

/// Consecutive qualifying days ending at `today`, walking backward.
pub fn current_streak(store: &CompletionStore, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = today;
    while day_completion(store, cursor).qualifies_for_streak() {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive qualifying days anywhere in the store.
pub fn longest_streak(store: &CompletionStore) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for (date, _) in store.tracked_days() {
        if !day_completion(store, date).qualifies_for_streak() {
            run = 0;
            previous = None;
            continue;
        }
        run = match previous {
            Some(prev) if date - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    longest
}

/// Days with data among the 7 days ending at `today`, oldest first.
pub fn last_7_days(store: &CompletionStore, today: NaiveDate) -> Vec<DaySummary> {
    clock::trailing_days(today, ROLLING_WINDOW_DAYS)
        .into_iter()
        .filter_map(|date| {
            let completion = day_completion(store, date);
            completion.has_data().then_some(DaySummary {
                date,
                completed: completion.completed,
                total: completion.total,
                percentage: completion.percentage,
            })
        })
        .collect()
}

/// Mean of the daily percentages in `days`, rounded; 0 for an empty slice.
pub fn average_percentage(days: &[DaySummary]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    let sum: u32 = days.iter().map(|day| day.percentage).sum();
    (f64::from(sum) / days.len() as f64).round() as u32
}

/// Rolling 7-day completion: averaged over active days only.
pub fn rolling_completion(store: &CompletionStore, today: NaiveDate) -> u32 {
    average_percentage(&last_7_days(store, today))
}

/// Perfect weeks among the last `weeks_to_scan` Sunday-aligned weeks.
///
/// Weeks without any data count as perfect.
pub fn perfect_weeks(store: &CompletionStore, today: NaiveDate, weeks_to_scan: u32) -> u32 {
    perfect_weeks_with(store, today, weeks_to_scan, true)
}

/// Perfect weeks with an explicit policy for weeks that have no data.
pub fn perfect_weeks_with(
    store: &CompletionStore,
    today: NaiveDate,
    weeks_to_scan: u32,
    lenient_empty_weeks: bool,
) -> u32 {
    let current_week = clock::week_start(today);
    (0..weeks_to_scan)
        .filter(|week| {
            let start = current_week - Duration::weeks(i64::from(*week));
            let days: Vec<DayCompletion> = (0..7)
                .map(|offset| day_completion(store, start + Duration::days(offset)))
                .filter(DayCompletion::has_data)
                .collect();
            if days.is_empty() {
                return lenient_empty_weeks;
            }
            days.iter().all(DayCompletion::is_perfect)
        })
        .count() as u32
}

/// Number of days with at least one entry.
pub fn tracked_days(store: &CompletionStore) -> usize {
    store.tracked_day_count()
}

pub fn summarize(
    store: &CompletionStore,
    registry: &TaskRegistry,
    today: NaiveDate,
    config: &StatsConfig,
) -> DashboardStats {
    let last_seven_days = last_7_days(store, today);
    let days_active = last_seven_days.len() as u32;
    let completed_in_window: u32 = last_seven_days.iter().map(|day| day.completed).sum();
    let avg_completed_per_day = if days_active == 0 {
        0
    } else {
        (f64::from(completed_in_window) / f64::from(days_active)).round() as u32
    };

    DashboardStats {
        today,
        today_completion: day_completion(store, today),
        current_streak: current_streak(store, today),
        longest_streak: longest_streak(store),
        overall_completion: average_percentage(&last_seven_days),
        days_active,
        consistency: percent(days_active, ROLLING_WINDOW_DAYS),
        avg_completed_per_day,
        tracked_days: tracked_days(store),
        perfect_weeks: perfect_weeks_with(
            store,
            today,
            config.perfect_week_scan,
            config.lenient_empty_weeks,
        ),
        weeks_scanned: config.perfect_week_scan,
        tasks_total: registry.len(),
        last_seven_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::completion::{DayEntries, DayEntry};

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn store_from(days: &[(&str, &[(&str, bool)])]) -> CompletionStore {
        let mut map = BTreeMap::new();
        for (date, entries) in days {
            let entries: DayEntries = entries
                .iter()
                .map(|(id, done)| (id.to_string(), DayEntry::Flag(*done)))
                .collect();
            map.insert(day(date), entries);
        }
        CompletionStore::from_map(map)
    }

    #[test]
    fn day_completion_half_done() {
        let store = store_from(&[("2024-01-01", &[("a", true), ("b", false)])]);
        assert_eq!(
            day_completion(&store, day("2024-01-01")),
            DayCompletion { completed: 1, total: 2, percentage: 50 }
        );
    }

    #[test]
    fn absent_and_empty_days_are_identical() {
        let store = store_from(&[("2024-01-01", &[])]);
        let empty = day_completion(&store, day("2024-01-01"));
        let absent = day_completion(&store, day("2024-01-02"));
        assert_eq!(empty, absent);
        assert_eq!(empty, DayCompletion { completed: 0, total: 0, percentage: 0 });
    }

    #[test]
    fn percentage_rounds_half_up() {
        let store = store_from(&[("2024-01-01", &[("a", true), ("b", false), ("c", false)])]);
        assert_eq!(day_completion(&store, day("2024-01-01")).percentage, 33);
        let store = store_from(&[("2024-01-01", &[("a", true), ("b", true), ("c", false)])]);
        assert_eq!(day_completion(&store, day("2024-01-01")).percentage, 67);
        assert_eq!(percent(1, 8), 13);
    }

    #[test]
    fn empty_store_has_no_streak() {
        assert_eq!(current_streak(&CompletionStore::new(), day("2024-01-10")), 0);
    }

    #[test]
    fn streak_counts_consecutive_partial_days() {
        let store = store_from(&[
            ("2024-01-07", &[("a", true), ("b", false)]),
            ("2024-01-08", &[("a", true)]),
            ("2024-01-09", &[("a", false), ("b", true)]),
            ("2024-01-10", &[("a", true)]),
        ]);
        assert_eq!(current_streak(&store, day("2024-01-10")), 4);
    }

    #[test]
    fn today_without_progress_breaks_streak() {
        let store = store_from(&[
            ("2024-01-08", &[("a", true)]),
            ("2024-01-09", &[("a", true)]),
            ("2024-01-10", &[("a", false)]),
        ]);
        assert_eq!(current_streak(&store, day("2024-01-10")), 0);
    }

    #[test]
    fn gap_day_stops_streak() {
        let store = store_from(&[
            ("2024-01-07", &[("a", true)]),
            ("2024-01-09", &[("a", true)]),
            ("2024-01-10", &[("a", true)]),
        ]);
        assert_eq!(current_streak(&store, day("2024-01-10")), 2);
    }

    #[test]
    fn longest_streak_finds_best_run() {
        let store = store_from(&[
            ("2024-01-01", &[("a", true)]),
            ("2024-01-02", &[("a", true)]),
            ("2024-01-03", &[("a", true)]),
            ("2024-01-04", &[("a", false)]),
            ("2024-01-05", &[("a", true)]),
            ("2024-01-07", &[("a", true)]),
            ("2024-01-08", &[("a", true)]),
        ]);
        assert_eq!(longest_streak(&store), 3);
        assert_eq!(longest_streak(&CompletionStore::new()), 0);
    }

    #[test]
    fn last_seven_days_skips_empty_days() {
        let store = store_from(&[
            ("2024-01-08", &[("a", true), ("b", true)]),
            ("2024-01-10", &[("a", true), ("b", false)]),
            ("2024-01-01", &[("a", true)]),
        ]);
        let days = last_7_days(&store, day("2024-01-10"));
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, day("2024-01-08"));
        assert_eq!(days[0].percentage, 100);
        assert_eq!(days[1].date, day("2024-01-10"));
        assert_eq!(days[1].percentage, 50);
    }

    #[test]
    fn rolling_completion_divides_by_active_days() {
        let store = store_from(&[
            ("2024-01-08", &[("a", true), ("b", true)]),
            ("2024-01-10", &[("a", true), ("b", false)]),
        ]);
        assert_eq!(rolling_completion(&store, day("2024-01-10")), 75);
        assert_eq!(rolling_completion(&CompletionStore::new(), day("2024-01-10")), 0);
    }

    #[test]
    fn week_without_data_is_perfect() {
        // Deliberate leniency: an untracked week counts as perfect.
        assert_eq!(perfect_weeks(&CompletionStore::new(), day("2024-01-10"), 1), 1);
        assert_eq!(perfect_weeks(&CompletionStore::new(), day("2024-01-10"), 12), 12);
        assert_eq!(
            perfect_weeks_with(&CompletionStore::new(), day("2024-01-10"), 12, false),
            0
        );
    }

    #[test]
    fn imperfect_day_spoils_its_week() {
        // Week of 2024-01-07 (Sunday) through 2024-01-13.
        let store = store_from(&[
            ("2024-01-07", &[("a", true)]),
            ("2024-01-09", &[("a", true), ("b", false)]),
            ("2023-12-31", &[("a", true)]),
        ]);
        assert_eq!(perfect_weeks_with(&store, day("2024-01-10"), 2, false), 1);
        assert_eq!(perfect_weeks_with(&store, day("2024-01-10"), 3, true), 2);
    }

    #[test]
    fn summarize_combines_figures() {
        let store = store_from(&[
            ("2024-01-09", &[("a", true), ("b", true)]),
            ("2024-01-10", &[("a", true), ("b", false)]),
        ]);
        let stats = summarize(
            &store,
            &TaskRegistry::default(),
            day("2024-01-10"),
            &StatsConfig::default(),
        );
        assert_eq!(stats.today_completion.percentage, 50);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.overall_completion, 75);
        assert_eq!(stats.days_active, 2);
        assert_eq!(stats.consistency, 29);
        assert_eq!(stats.avg_completed_per_day, 2);
        assert_eq!(stats.tracked_days, 2);
        assert_eq!(stats.weeks_scanned, 12);
    }
}
