//! Profile record, weekly goals and display theme.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::GoalsConfig;
use crate::error::{Error, Result};
use crate::stats::DashboardStats;

/// Flat user profile. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub location: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    pub occupation: String,
    pub phone: String,
    pub website: String,
    pub interests: String,
    pub bio: String,
}

/// Partial profile edit; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub dob: Option<NaiveDate>,
    pub occupation: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub interests: Option<String>,
    pub bio: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.location.is_none()
            && self.title.is_none()
            && self.dob.is_none()
            && self.occupation.is_none()
            && self.phone.is_none()
            && self.website.is_none()
            && self.interests.is_none()
            && self.bio.is_none()
    }
}

impl Profile {
    pub fn apply(&mut self, patch: ProfilePatch) {
        let fields = [
            (&mut self.name, patch.name),
            (&mut self.email, patch.email),
            (&mut self.location, patch.location),
            (&mut self.title, patch.title),
            (&mut self.occupation, patch.occupation),
            (&mut self.phone, patch.phone),
            (&mut self.website, patch.website),
            (&mut self.interests, patch.interests),
            (&mut self.bio, patch.bio),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value.trim().to_string();
            }
        }
        if patch.dob.is_some() {
            self.dob = patch.dob;
        }
    }

    /// Fill a blank name or email from the authenticated account.
    ///
    /// Returns whether anything changed.
    pub fn fill_identity(&mut self, name: &str, email: &str) -> bool {
        let mut changed = false;
        if self.name.trim().is_empty() && !name.trim().is_empty() {
            self.name = name.trim().to_string();
            changed = true;
        }
        if self.email.trim().is_empty() && !email.trim().is_empty() {
            self.email = email.trim().to_string();
            changed = true;
        }
        changed
    }

    /// Whether the fields shown on the profile card are all filled.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.location, &self.title, &self.bio]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "User"
        } else {
            self.name.trim()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyGoals {
    pub target_completion_percent: u32,
    pub tasks_per_day: u32,
    pub streak_target_days: u32,
    pub notes: String,
}

impl Default for WeeklyGoals {
    fn default() -> Self {
        Self::from_config(&GoalsConfig::default())
    }
}

/// Partial goals edit; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct GoalsPatch {
    pub target_completion_percent: Option<u32>,
    pub tasks_per_day: Option<u32>,
    pub streak_target_days: Option<u32>,
    pub notes: Option<String>,
}

/// Progress toward each goal, as a capped percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub completion: u32,
    pub tasks_per_day: u32,
    pub streak: u32,
}

impl WeeklyGoals {
    pub fn from_config(config: &GoalsConfig) -> Self {
        Self {
            target_completion_percent: config.target_completion_percent,
            tasks_per_day: config.tasks_per_day,
            streak_target_days: config.streak_target_days,
            notes: String::new(),
        }
    }

    /// Apply `patch`, or reject it without touching `self`.
    pub fn update(&mut self, patch: GoalsPatch) -> Result<()> {
        let mut next = self.clone();
        if let Some(value) = patch.target_completion_percent {
            next.target_completion_percent = value;
        }
        if let Some(value) = patch.tasks_per_day {
            next.tasks_per_day = value;
        }
        if let Some(value) = patch.streak_target_days {
            next.streak_target_days = value;
        }
        if let Some(notes) = patch.notes {
            next.notes = notes.trim().to_string();
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_completion_percent > 100 {
            return Err(Error::InvalidArgument(
                "target completion must be between 0 and 100".to_string(),
            ));
        }
        if self.tasks_per_day == 0 {
            return Err(Error::InvalidArgument(
                "tasks per day must be at least 1".to_string(),
            ));
        }
        if self.streak_target_days == 0 {
            return Err(Error::InvalidArgument(
                "streak target must be at least 1 day".to_string(),
            ));
        }
        Ok(())
    }

    pub fn progress(&self, stats: &DashboardStats) -> GoalProgress {
        GoalProgress {
            completion: capped_progress(stats.overall_completion, self.target_completion_percent),
            tasks_per_day: capped_progress(stats.avg_completed_per_day, self.tasks_per_day),
            streak: capped_progress(stats.current_streak, self.streak_target_days),
        }
    }
}

/// `min(100, round(current / target * 100))`; a zero target is met.
pub fn capped_progress(current: u32, target: u32) -> u32 {
    if target == 0 {
        return 100;
    }
    crate::stats::percent(current, target).min(100)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(Error::InvalidArgument(format!(
                "invalid theme '{s}': must be dark or light"
            ))),
        }
    }
}
