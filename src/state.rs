//! Application state container.
//!
//! `AppState` owns every per-user store and is the only way to mutate them.
//! Validation failures and unknown ids are no-ops that return `None`; callers
//! decide how to report them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::completion::{CompletionStore, DayEntry, DayTask};
use crate::profile::{Profile, Theme, WeeklyGoals};
use crate::task::{Color, Icon, Task, TaskDraft, TaskPatch, TaskRegistry};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub completions: CompletionStore,
    pub tasks: TaskRegistry,
    pub profile: Profile,
    pub goals: WeeklyGoals,
    pub theme: Theme,
}

/// Input for a one-off task that lives on a single day.
#[derive(Debug, Clone, Default)]
pub struct DayTaskDraft {
    pub title: String,
    pub color: Option<Color>,
    pub icon: Option<Icon>,
}

impl AppState {
    /// Create a task from `draft`.
    ///
    /// A recurring task is seeded into `today` right away.
    pub fn add_task(&mut self, draft: TaskDraft, today: NaiveDate) -> Option<Task> {
        self.add_task_at(draft, today, Utc::now())
    }

    pub(crate) fn add_task_at(
        &mut self,
        draft: TaskDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Option<Task> {
        let task = draft.build(today, now)?;
        if task.recurrence.is_recurring() {
            self.completions.seed(today, [task.id.as_str()]);
        }
        tracing::debug!(id = %task.id, label = %task.label, "task added");
        self.tasks.push(task.clone());
        Some(task)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch, today: NaiveDate) -> Option<Task> {
        self.tasks.update(id, patch, today).cloned()
    }

    /// Remove a task and purge its id from every day.
    pub fn delete_task(&mut self, id: &str) -> Option<Task> {
        let task = self.tasks.remove(id)?;
        let purged = self.completions.purge_task(id);
        tracing::debug!(id, purged, "task deleted");
        Some(task)
    }

    /// Toggle completion of `id` on `date`; future dates are refused.
    pub fn toggle_completion(&mut self, date: NaiveDate, id: &str, today: NaiveDate) -> Option<bool> {
        if date > today {
            return None;
        }
        Some(self.completions.toggle(date, id))
    }

    pub fn add_day_task(&mut self, date: NaiveDate, draft: DayTaskDraft) -> Option<DayTask> {
        let record = DayTask::new(
            &draft.title,
            draft.color.unwrap_or_default(),
            draft.icon.unwrap_or_default(),
            Utc::now(),
        )?;
        self.completions.add_record(date, record.clone());
        Some(record)
    }

    pub fn remove_day_entry(&mut self, date: NaiveDate, id: &str) -> Option<DayEntry> {
        self.completions.remove_entry(date, id)
    }

    /// Seed every recurring task missing from `today`. Idempotent.
    pub fn apply_recurrence(&mut self, today: NaiveDate) -> usize {
        let ids: Vec<String> = self.tasks.recurring().map(|task| task.id.clone()).collect();
        self.completions.seed(today, ids.iter().map(String::as_str))
    }

    /// Display label for an entry id on a given day.
    pub fn entry_label(&self, date: NaiveDate, id: &str) -> String {
        if let Some(label) = self.tasks.label_of(id) {
            return label.to_string();
        }
        match self.completions.entry(date, id) {
            Some(DayEntry::Record(record)) => record.title.clone(),
            _ => format!("Task {id}"),
        }
    }
}
