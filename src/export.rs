//! Export and import of a user's data.
//!
//! - CSV of every tracked entry
//! - JSON backup of all stores, and import of the same format
//! - Plain-text weekly report
//! - Share code: base64 of a small JSON summary

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::completion::CompletionStore;
use crate::error::{Error, Result};
use crate::profile::{Profile, Theme, WeeklyGoals};
use crate::state::AppState;
use crate::stats::DashboardStats;
use crate::task::TaskRegistry;

pub const CSV_HEADER: &str = "Date,Task,Completed";

/// Top-level keys an import must carry.
const REQUIRED_IMPORT_KEYS: [&str; 2] = ["dashboardData", "userProfile"];

/// One row per entry, in date order.
pub fn to_csv(state: &AppState) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for (date, entries) in state.completions.tracked_days() {
        for (id, entry) in entries {
            let label = state.entry_label(date, id).replace('"', "\"\"");
            let done = if entry.is_done() { "Yes" } else { "No" };
            csv.push_str(&format!("{},\"{}\",{}\n", clock::date_key(date), label, done));
        }
    }
    csv
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    dashboard_data: &'a CompletionStore,
    checklist_tasks: &'a TaskRegistry,
    user_profile: &'a Profile,
    weekly_goals: &'a WeeklyGoals,
    theme: Theme,
    exported_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportDocument {
    dashboard_data: CompletionStore,
    user_profile: Profile,
    #[serde(default)]
    checklist_tasks: TaskRegistry,
    #[serde(default)]
    weekly_goals: Option<WeeklyGoals>,
    #[serde(default)]
    theme: Theme,
}

/// Pretty-printed JSON backup of every store.
pub fn to_json(state: &AppState, exported_at: DateTime<Utc>) -> Result<String> {
    let document = ExportDocument {
        dashboard_data: &state.completions,
        checklist_tasks: &state.tasks,
        user_profile: &state.profile,
        weekly_goals: &state.goals,
        theme: state.theme,
        exported_at,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse a JSON backup into a fresh state.
///
/// Goals missing from the backup take `goal_defaults`.
pub fn from_json(raw: &str, goal_defaults: WeeklyGoals) -> Result<AppState> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| Error::InvalidImport(format!("not valid JSON: {err}")))?;

    let missing: Vec<&str> = REQUIRED_IMPORT_KEYS
        .into_iter()
        .filter(|key| value.get(key).map_or(true, serde_json::Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(Error::InvalidImport(format!(
            "missing {}",
            missing.join(" and ")
        )));
    }

    let document: ImportDocument = serde_json::from_value(value)
        .map_err(|err| Error::InvalidImport(err.to_string()))?;
    let goals = document.weekly_goals.unwrap_or(goal_defaults);
    goals.validate()?;

    Ok(AppState {
        completions: document.dashboard_data,
        tasks: document.checklist_tasks,
        profile: document.user_profile,
        goals,
        theme: document.theme,
    })
}

/// Plain-text weekly performance report.
pub fn weekly_report(state: &AppState, stats: &DashboardStats, generated_at: DateTime<Utc>) -> String {
    let rule = "=".repeat(43);
    let profile = &state.profile;
    let or_na = |value: &str| {
        if value.trim().is_empty() {
            "N/A".to_string()
        } else {
            value.trim().to_string()
        }
    };

    let mut lines = vec![
        "WEEKLY PERFORMANCE REPORT".to_string(),
        format!("Week ending: {}", clock::date_key(stats.today)),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
        String::new(),
        rule.clone(),
        "USER INFORMATION".to_string(),
        rule.clone(),
        format!("Name: {}", profile.display_name()),
        format!("Email: {}", or_na(&profile.email)),
        format!("Location: {}", or_na(&profile.location)),
        format!("Title: {}", or_na(&profile.title)),
        String::new(),
        rule.clone(),
        "PERFORMANCE METRICS".to_string(),
        rule.clone(),
        format!("Current Streak: {} days", stats.current_streak),
        format!("Longest Streak: {} days", stats.longest_streak),
        format!("Overall Completion: {}%", stats.overall_completion),
        format!("Days Active (Last 7): {}/7", stats.days_active),
        format!("Total Check-Ins: {}", stats.tracked_days),
        format!("Tasks Created: {}", stats.tasks_total),
        String::new(),
        rule.clone(),
        "WEEKLY BREAKDOWN".to_string(),
        rule.clone(),
    ];

    if stats.last_seven_days.is_empty() {
        lines.push("No activity in the last 7 days".to_string());
    }
    for day in &stats.last_seven_days {
        lines.push(format!(
            "{}: {}/{} tasks ({}%)",
            clock::date_key(day.date),
            day.completed,
            day.total,
            day.percentage
        ));
    }

    if !state.goals.notes.is_empty() {
        lines.push(String::new());
        lines.push(rule.clone());
        lines.push("NOTES".to_string());
        lines.push(rule.clone());
        lines.push(state.goals.notes.clone());
    }
    lines.push(rule);

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Summary carried by a share code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSummary {
    pub user: String,
    pub streak: u32,
    pub completion: u32,
    pub tasks: usize,
    pub date: NaiveDate,
}

impl ShareSummary {
    pub fn new(profile: &Profile, stats: &DashboardStats) -> Self {
        Self {
            user: profile.display_name().to_string(),
            streak: stats.current_streak,
            completion: stats.overall_completion,
            tasks: stats.tasks_total,
            date: stats.today,
        }
    }
}

pub fn share_code(summary: &ShareSummary) -> Result<String> {
    let json = serde_json::to_vec(summary)?;
    Ok(STANDARD.encode(json))
}

pub fn decode_share_code(code: &str) -> Result<ShareSummary> {
    let bytes = STANDARD
        .decode(code.trim())
        .map_err(|err| Error::InvalidArgument(format!("invalid share code: {err}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| Error::InvalidArgument(format!("invalid share code: {err}")))
}
