//! Task definitions and the ordered task registry.
//!
//! The registry only holds definitions. Completion state lives in
//! [`crate::completion::CompletionStore`], keyed by task id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::Error;

const DEFAULT_CATEGORY: &str = "General";

/// Icon shown next to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icon {
    #[serde(alias = "BookOpen")]
    Book,
    Activity,
    Code,
    Trophy,
    #[serde(alias = "Droplets")]
    Water,
    Moon,
    #[default]
    Star,
    Heart,
}

impl Icon {
    pub const ALL: [Icon; 8] = [
        Icon::Book,
        Icon::Activity,
        Icon::Code,
        Icon::Trophy,
        Icon::Water,
        Icon::Moon,
        Icon::Star,
        Icon::Heart,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Book => "Book",
            Icon::Activity => "Activity",
            Icon::Code => "Code",
            Icon::Trophy => "Trophy",
            Icon::Water => "Water",
            Icon::Moon => "Moon",
            Icon::Star => "Star",
            Icon::Heart => "Heart",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Icon::Book => "📚",
            Icon::Activity => "🏃",
            Icon::Code => "💻",
            Icon::Trophy => "🏆",
            Icon::Water => "💧",
            Icon::Moon => "🌙",
            Icon::Star => "⭐",
            Icon::Heart => "❤️",
        }
    }
}

impl FromStr for Icon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" | "bookopen" => Ok(Icon::Book),
            "activity" => Ok(Icon::Activity),
            "code" => Ok(Icon::Code),
            "trophy" => Ok(Icon::Trophy),
            "water" | "droplets" => Ok(Icon::Water),
            "moon" => Ok(Icon::Moon),
            "star" => Ok(Icon::Star),
            "heart" => Ok(Icon::Heart),
            _ => Err(Error::InvalidArgument(format!(
                "invalid icon '{}': must be one of {}",
                s,
                Icon::ALL.map(Icon::as_str).join(", ")
            ))),
        }
    }
}

/// Accent color of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Indigo,
    Teal,
    Purple,
    Rose,
    Orange,
    Emerald,
    Blue,
    Green,
    Yellow,
    Red,
    Cyan,
    Pink,
}

impl Color {
    pub const ALL: [Color; 12] = [
        Color::Indigo,
        Color::Teal,
        Color::Purple,
        Color::Rose,
        Color::Orange,
        Color::Emerald,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Red,
        Color::Cyan,
        Color::Pink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Indigo => "indigo",
            Color::Teal => "teal",
            Color::Purple => "purple",
            Color::Rose => "rose",
            Color::Orange => "orange",
            Color::Emerald => "emerald",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Cyan => "cyan",
            Color::Pink => "pink",
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Color::ALL
            .into_iter()
            .find(|color| color.as_str() == wanted)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid color '{}': must be one of {}",
                    s,
                    Color::ALL.map(Color::as_str).join(", ")
                ))
            })
    }
}

/// Which days a task is shown on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    #[default]
    Daily,
    Tomorrow,
    EveryDay,
    CustomDate,
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "daily" => Ok(Schedule::Daily),
            "tomorrow" => Ok(Schedule::Tomorrow),
            "everyday" => Ok(Schedule::EveryDay),
            "customdate" | "custom" => Ok(Schedule::CustomDate),
            _ => Err(Error::InvalidArgument(format!(
                "invalid schedule '{}': must be daily, tomorrow, every-day, or custom-date",
                s
            ))),
        }
    }
}

/// Recurrence rule; anything but `None` is seeded into each new day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

impl FromStr for Recurrence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(Error::InvalidArgument(format!(
                "invalid recurrence '{}': must be none, daily, weekly, or monthly",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: Icon,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Task {
    /// Whether the task belongs on the checklist for `date`.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        match self.schedule {
            Schedule::Daily | Schedule::EveryDay => true,
            Schedule::Tomorrow | Schedule::CustomDate => self.custom_date == Some(date),
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub label: String,
    pub icon: Option<Icon>,
    pub color: Option<Color>,
    pub category: Option<String>,
    pub schedule: Option<Schedule>,
    pub recurrence: Option<Recurrence>,
    pub custom_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Build a task, or `None` when the draft is not acceptable.
    ///
    /// `Tomorrow` pins the task to `today + 1`; `CustomDate` requires a date.
    pub fn build(self, today: NaiveDate, created_at: DateTime<Utc>) -> Option<Task> {
        let label = self.label.trim();
        if label.is_empty() {
            return None;
        }

        let schedule = self.schedule.unwrap_or_default();
        let custom_date = match schedule {
            Schedule::Tomorrow => Some(today + Duration::days(1)),
            Schedule::CustomDate => Some(self.custom_date?),
            Schedule::Daily | Schedule::EveryDay => self.custom_date,
        };

        Some(Task {
            id: Ulid::new().to_string(),
            label: label.to_string(),
            icon: self.icon.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            category: self
                .category
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(default_category),
            schedule,
            recurrence: self.recurrence.unwrap_or_default(),
            custom_date,
            created_at,
        })
    }
}

/// Field-wise edit of an existing task; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub label: Option<String>,
    pub icon: Option<Icon>,
    pub color: Option<Color>,
    pub category: Option<String>,
    pub schedule: Option<Schedule>,
    pub recurrence: Option<Recurrence>,
    pub custom_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.icon.is_none()
            && self.color.is_none()
            && self.category.is_none()
            && self.schedule.is_none()
            && self.recurrence.is_none()
            && self.custom_date.is_none()
    }

    fn apply(self, task: &mut Task, today: NaiveDate) {
        if let Some(label) = self.label {
            task.label = label.trim().to_string();
        }
        if let Some(icon) = self.icon {
            task.icon = icon;
        }
        if let Some(color) = self.color {
            task.color = color;
        }
        if let Some(category) = self.category {
            let trimmed = category.trim();
            task.category = if trimmed.is_empty() {
                default_category()
            } else {
                trimmed.to_string()
            };
        }
        if let Some(schedule) = self.schedule {
            task.schedule = schedule;
            if schedule == Schedule::Tomorrow && self.custom_date.is_none() {
                task.custom_date = Some(today + Duration::days(1));
            }
        }
        if let Some(recurrence) = self.recurrence {
            task.recurrence = recurrence;
        }
        if let Some(date) = self.custom_date {
            task.custom_date = Some(date);
        }
    }
}

/// Ordered collection of task definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn from_vec(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.find(id).map(|task| task.label.as_str())
    }

    pub fn recurring(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.recurrence.is_recurring())
    }

    pub fn scheduled_on(&self, date: NaiveDate) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| task.is_scheduled_on(date))
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Merge `patch` into the task with `id`.
    ///
    /// Returns `None` (and changes nothing) when the id is unknown or the
    /// patch would blank the label. Switching to `Tomorrow` without a date
    /// pins the task to `today + 1`.
    pub fn update(&mut self, id: &str, patch: TaskPatch, today: NaiveDate) -> Option<&Task> {
        if patch
            .label
            .as_deref()
            .is_some_and(|label| label.trim().is_empty())
        {
            return None;
        }
        if patch.schedule == Some(Schedule::CustomDate) && patch.custom_date.is_none() {
            let has_date = self.find(id).is_some_and(|task| task.custom_date.is_some());
            if !has_date {
                return None;
            }
        }

        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        patch.apply(task, today);
        Some(&*task)
    }

    /// Remove a task by id
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn blank_label_is_rejected() {
        assert!(TaskDraft::new("   ").build(day("2024-01-01"), Utc::now()).is_none());
        assert!(TaskDraft::new("").build(day("2024-01-01"), Utc::now()).is_none());
    }

    #[test]
    fn draft_defaults_apply() {
        let task = TaskDraft::new("  Read  ")
            .build(day("2024-01-01"), Utc::now())
            .unwrap();
        assert_eq!(task.label, "Read");
        assert_eq!(task.icon, Icon::Star);
        assert_eq!(task.color, Color::Indigo);
        assert_eq!(task.category, "General");
        assert_eq!(task.schedule, Schedule::Daily);
        assert_eq!(task.recurrence, Recurrence::None);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn custom_date_schedule_requires_a_date() {
        let mut draft = TaskDraft::new("Dentist");
        draft.schedule = Some(Schedule::CustomDate);
        assert!(draft.clone().build(day("2024-01-01"), Utc::now()).is_none());

        draft.custom_date = Some(day("2024-02-10"));
        let task = draft.build(day("2024-01-01"), Utc::now()).unwrap();
        assert!(task.is_scheduled_on(day("2024-02-10")));
        assert!(!task.is_scheduled_on(day("2024-02-11")));
    }

    #[test]
    fn tomorrow_schedule_pins_next_day() {
        let mut draft = TaskDraft::new("Call mom");
        draft.schedule = Some(Schedule::Tomorrow);
        let task = draft.build(day("2024-01-31"), Utc::now()).unwrap();
        assert_eq!(task.custom_date, Some(day("2024-02-01")));
        assert!(task.is_scheduled_on(day("2024-02-01")));
        assert!(!task.is_scheduled_on(day("2024-01-31")));
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut registry = TaskRegistry::default();
        registry.push(TaskDraft::new("Read").build(day("2024-01-01"), Utc::now()).unwrap());
        let before = registry.clone();

        let patch = TaskPatch {
            label: Some("Write".to_string()),
            ..TaskPatch::default()
        };
        assert!(registry.update("missing", patch, day("2024-01-01")).is_none());
        assert_eq!(registry, before);
    }

    #[test]
    fn update_rejects_blank_label() {
        let mut registry = TaskRegistry::default();
        let task = TaskDraft::new("Read").build(day("2024-01-01"), Utc::now()).unwrap();
        let id = task.id.clone();
        registry.push(task);

        let patch = TaskPatch {
            label: Some("  ".to_string()),
            ..TaskPatch::default()
        };
        assert!(registry.update(&id, patch, day("2024-01-01")).is_none());
        assert_eq!(registry.label_of(&id), Some("Read"));
    }

    #[test]
    fn update_to_tomorrow_pins_next_day() {
        let mut registry = TaskRegistry::default();
        let task = TaskDraft::new("Read").build(day("2024-01-01"), Utc::now()).unwrap();
        let id = task.id.clone();
        registry.push(task);

        let patch = TaskPatch {
            schedule: Some(Schedule::Tomorrow),
            ..TaskPatch::default()
        };
        let updated = registry.update(&id, patch, day("2024-03-09")).unwrap();
        assert_eq!(updated.schedule, Schedule::Tomorrow);
        assert_eq!(updated.custom_date, Some(day("2024-03-10")));
        assert!(updated.is_scheduled_on(day("2024-03-10")));
        assert!(!updated.is_scheduled_on(day("2024-03-09")));

        let patch = TaskPatch {
            schedule: Some(Schedule::Tomorrow),
            custom_date: Some(day("2024-04-01")),
            ..TaskPatch::default()
        };
        let updated = registry.update(&id, patch, day("2024-03-09")).unwrap();
        assert_eq!(updated.custom_date, Some(day("2024-04-01")));
    }

    #[test]
    fn update_merges_fields() {
        let mut registry = TaskRegistry::default();
        let task = TaskDraft::new("Read").build(day("2024-01-01"), Utc::now()).unwrap();
        let id = task.id.clone();
        registry.push(task);

        let patch = TaskPatch {
            color: Some(Color::Teal),
            recurrence: Some(Recurrence::Weekly),
            ..TaskPatch::default()
        };
        let updated = registry.update(&id, patch, day("2024-01-01")).unwrap();
        assert_eq!(updated.label, "Read");
        assert_eq!(updated.color, Color::Teal);
        assert_eq!(updated.recurrence, Recurrence::Weekly);
    }

    #[test]
    fn parses_enum_names_leniently() {
        assert_eq!("BookOpen".parse::<Icon>().unwrap(), Icon::Book);
        assert_eq!("droplets".parse::<Icon>().unwrap(), Icon::Water);
        assert_eq!("EMERALD".parse::<Color>().unwrap(), Color::Emerald);
        assert_eq!("every-day".parse::<Schedule>().unwrap(), Schedule::EveryDay);
        assert_eq!("custom_date".parse::<Schedule>().unwrap(), Schedule::CustomDate);
        assert!("hourly".parse::<Recurrence>().is_err());
    }

    #[test]
    fn legacy_icon_names_deserialize() {
        let raw = r#"{"id":"1","label":"Swim","icon":"Droplets","created_at":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.icon, Icon::Water);
        assert_eq!(task.category, "General");
        assert_eq!(task.recurrence, Recurrence::None);
    }
}
