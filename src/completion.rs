//! Date-keyed completion store.
//!
//! Maps a calendar day to the entries tracked on that day. A day with no
//! entries is the same as a day that is absent; aggregates never distinguish
//! the two. A day's total is the number of entries it holds, so past days keep
//! the task set they were touched with.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::task::{Color, Icon};

/// Entries tracked on one day, keyed by task id.
pub type DayEntries = BTreeMap<String, DayEntry>;

/// One tracked item on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayEntry {
    /// Completion flag for a registry task.
    Flag(bool),
    /// One-off task that exists only on this day.
    Record(DayTask),
}

impl DayEntry {
    pub fn is_done(&self) -> bool {
        match self {
            DayEntry::Flag(done) => *done,
            DayEntry::Record(record) => record.completed,
        }
    }

    fn flip(&mut self) -> bool {
        match self {
            DayEntry::Flag(done) => {
                *done = !*done;
                *done
            }
            DayEntry::Record(record) => {
                record.completed = !record.completed;
                record.completed
            }
        }
    }
}

/// One-off task record stored directly under a date-key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub icon: Icon,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl DayTask {
    /// New open record, or `None` for a blank title.
    pub fn new(title: &str, color: Color, icon: Icon, created_at: DateTime<Utc>) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            id: format!("task-{}", Ulid::new()),
            title: title.to_string(),
            color,
            icon,
            created_at,
            completed: false,
        })
    }
}

/// Completed/total counts for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCounts {
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionStore {
    days: BTreeMap<NaiveDate, DayEntries>,
}

impl CompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(days: BTreeMap<NaiveDate, DayEntries>) -> Self {
        Self { days }
    }

    /// Entries for `date`; `None` when the day is absent or empty.
    pub fn day(&self, date: NaiveDate) -> Option<&DayEntries> {
        self.days.get(&date).filter(|entries| !entries.is_empty())
    }

    pub fn counts(&self, date: NaiveDate) -> DayCounts {
        match self.day(date) {
            Some(entries) => DayCounts {
                completed: entries.values().filter(|entry| entry.is_done()).count() as u32,
                total: entries.len() as u32,
            },
            None => DayCounts::default(),
        }
    }

    pub fn entry(&self, date: NaiveDate, id: &str) -> Option<&DayEntry> {
        self.days.get(&date).and_then(|entries| entries.get(id))
    }

    pub fn is_done(&self, date: NaiveDate, id: &str) -> bool {
        self.entry(date, id).is_some_and(DayEntry::is_done)
    }

    /// Non-empty days in chronological order.
    pub fn tracked_days(&self) -> impl Iterator<Item = (NaiveDate, &DayEntries)> {
        self.days
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(date, entries)| (*date, entries))
    }

    pub fn tracked_day_count(&self) -> usize {
        self.tracked_days().count()
    }

    /// Flip the entry for `id` on `date`, creating it as `false` first.
    ///
    /// Returns the new state, so the first toggle of a fresh entry is `true`.
    pub fn toggle(&mut self, date: NaiveDate, id: &str) -> bool {
        self.days
            .entry(date)
            .or_default()
            .entry(id.to_string())
            .or_insert(DayEntry::Flag(false))
            .flip()
    }

    /// Insert `false` for each id that has no entry on `date`.
    ///
    /// Existing entries are left untouched. Returns how many were added.
    pub fn seed<'a, I>(&mut self, date: NaiveDate, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seeded = 0;
        for id in ids {
            let entries = self.days.entry(date).or_default();
            if !entries.contains_key(id) {
                entries.insert(id.to_string(), DayEntry::Flag(false));
                seeded += 1;
            }
        }
        if self.days.get(&date).is_some_and(|entries| entries.is_empty()) {
            self.days.remove(&date);
        }
        seeded
    }

    /// Remove `id` from every day. Days left empty are dropped.
    ///
    /// Returns the number of days that referenced the id.
    pub fn purge_task(&mut self, id: &str) -> usize {
        let mut purged = 0;
        for entries in self.days.values_mut() {
            if entries.remove(id).is_some() {
                purged += 1;
            }
        }
        self.days.retain(|_, entries| !entries.is_empty());
        purged
    }

    pub fn add_record(&mut self, date: NaiveDate, record: DayTask) {
        self.days
            .entry(date)
            .or_default()
            .insert(record.id.clone(), DayEntry::Record(record));
    }

    /// Remove a single entry from `date`, dropping the day if it empties.
    pub fn remove_entry(&mut self, date: NaiveDate, id: &str) -> Option<DayEntry> {
        let entries = self.days.get_mut(&date)?;
        let removed = entries.remove(id);
        if entries.is_empty() {
            self.days.remove(&date);
        }
        removed
    }

    pub fn references(&self, id: &str) -> bool {
        self.days.values().any(|entries| entries.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn first_toggle_marks_done() {
        let mut store = CompletionStore::new();
        assert!(store.toggle(day("2024-01-01"), "a"));
        assert!(store.is_done(day("2024-01-01"), "a"));
        assert!(!store.toggle(day("2024-01-01"), "a"));
        assert_eq!(store.counts(day("2024-01-01")), DayCounts { completed: 0, total: 1 });
    }

    #[test]
    fn empty_day_reads_as_absent() {
        let mut days = BTreeMap::new();
        days.insert(day("2024-01-01"), DayEntries::new());
        let store = CompletionStore::from_map(days);

        assert!(store.day(day("2024-01-01")).is_none());
        assert_eq!(store.counts(day("2024-01-01")), store.counts(day("2024-01-02")));
        assert_eq!(store.tracked_day_count(), 0);
    }

    #[test]
    fn seed_only_fills_missing_entries() {
        let mut store = CompletionStore::new();
        store.toggle(day("2024-01-01"), "a");

        assert_eq!(store.seed(day("2024-01-01"), ["a", "b"]), 1);
        assert!(store.is_done(day("2024-01-01"), "a"));
        assert!(!store.is_done(day("2024-01-01"), "b"));
        assert_eq!(store.seed(day("2024-01-01"), ["a", "b"]), 0);
    }

    #[test]
    fn seeding_nothing_leaves_no_empty_day() {
        let mut store = CompletionStore::new();
        assert_eq!(store.seed(day("2024-01-01"), std::iter::empty()), 0);
        assert_eq!(store, CompletionStore::new());
    }

    #[test]
    fn purge_removes_id_everywhere() {
        let mut store = CompletionStore::new();
        store.toggle(day("2024-01-01"), "a");
        store.toggle(day("2024-01-01"), "b");
        store.toggle(day("2024-01-02"), "a");
        store.toggle(day("2024-01-03"), "b");

        assert_eq!(store.purge_task("a"), 2);
        assert!(!store.references("a"));
        assert_eq!(store.tracked_day_count(), 2);
        assert!(store.day(day("2024-01-02")).is_none());
    }

    #[test]
    fn records_toggle_their_completed_flag() {
        let mut store = CompletionStore::new();
        let record = DayTask::new("Dentist", Color::Rose, Icon::Heart, Utc::now()).unwrap();
        let id = record.id.clone();
        store.add_record(day("2024-05-01"), record);

        assert_eq!(store.counts(day("2024-05-01")), DayCounts { completed: 0, total: 1 });
        assert!(store.toggle(day("2024-05-01"), &id));
        assert!(matches!(
            store.entry(day("2024-05-01"), &id),
            Some(DayEntry::Record(DayTask { completed: true, .. }))
        ));

        assert!(store.remove_entry(day("2024-05-01"), &id).is_some());
        assert!(store.day(day("2024-05-01")).is_none());
    }

    #[test]
    fn blank_record_title_is_rejected() {
        assert!(DayTask::new("  ", Color::Indigo, Icon::Star, Utc::now()).is_none());
    }

    #[test]
    fn serializes_with_date_keys() {
        let mut store = CompletionStore::new();
        store.toggle(day("2024-01-01"), "a");
        store.seed(day("2024-01-01"), ["b"]);

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"2024-01-01":{"a":true,"b":false}}"#);

        let parsed: CompletionStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store);
    }
}
