//! habitual day command implementation
//!
//! Shows and edits the entries tracked on a single day, including one-off
//! records that exist only on that day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::context::{date_or_today, Globals};
use crate::clock;
use crate::completion::DayEntry;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::state::DayTaskDraft;
use crate::stats::{self, DayCompletion};
use crate::task::{Color, Icon};

/// Options for `habitual day show`
pub struct ShowOptions {
    pub date: Option<String>,
    pub globals: Globals,
}

/// Options for `habitual day add`
pub struct AddOptions {
    pub title: String,
    pub date: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub globals: Globals,
}

/// Options for `habitual day rm`
pub struct RmOptions {
    pub id: String,
    pub date: Option<String>,
    pub globals: Globals,
}

#[derive(Serialize)]
struct DayEntryView {
    id: String,
    label: String,
    kind: &'static str,
    done: bool,
}

#[derive(Serialize)]
struct DayReport {
    date: NaiveDate,
    completion: DayCompletion,
    entries: Vec<DayEntryView>,
}

#[derive(Serialize)]
struct DayChangeReport {
    id: String,
    date: NaiveDate,
    changed: bool,
    completion: DayCompletion,
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let session = options.globals.open_session()?;
    let date = date_or_today(options.date.as_deref(), session.today)?;
    let state = &session.state;

    let entries: Vec<DayEntryView> = state
        .completions
        .day(date)
        .map(|entries| {
            entries
                .iter()
                .map(|(id, entry)| DayEntryView {
                    id: id.clone(),
                    label: state.entry_label(date, id),
                    kind: match entry {
                        DayEntry::Flag(_) => "task",
                        DayEntry::Record(_) => "one-off",
                    },
                    done: entry.is_done(),
                })
                .collect()
        })
        .unwrap_or_default();
    let completion = stats::day_completion(&state.completions, date);

    let mut human = HumanOutput::new(format!("habitual day: {}", clock::date_key(date)));
    human.push_summary(
        "completed",
        format!(
            "{}/{} ({}%)",
            completion.completed, completion.total, completion.percentage
        ),
    );
    for entry in &entries {
        let mark = if entry.done { "[x]" } else { "[ ]" };
        human.push_detail(format!("{mark} {} ({}, {})", entry.label, entry.kind, entry.id));
    }
    if entries.is_empty() {
        human.push_detail("nothing tracked");
    }

    emit_success(
        options.globals.output(),
        "day show",
        &DayReport {
            date,
            completion,
            entries,
        },
        Some(&human),
    )
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let icon: Option<Icon> = options.icon.as_deref().map(str::parse).transpose()?;
    let color: Option<Color> = options.color.as_deref().map(str::parse).transpose()?;
    let mut session = options.globals.open_session()?;
    let date = date_or_today(options.date.as_deref(), session.today)?;

    let record = session
        .state
        .add_day_task(
            date,
            DayTaskDraft {
                title: options.title,
                color,
                icon,
            },
        )
        .ok_or_else(|| Error::InvalidArgument("entry title cannot be empty".to_string()))?;
    session.save()?;

    let completion = stats::day_completion(&session.state.completions, date);
    let mut human = HumanOutput::new(format!("habitual day add: {}", record.title));
    human.push_summary("id", record.id.clone());
    human.push_summary("date", clock::date_key(date));
    human.push_next_step(format!(
        "habitual check {} --date {}",
        record.id,
        clock::date_key(date)
    ));

    emit_success(
        options.globals.output(),
        "day add",
        &DayChangeReport {
            id: record.id,
            date,
            changed: true,
            completion,
        },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut session = options.globals.open_session()?;
    let date = date_or_today(options.date.as_deref(), session.today)?;

    let removed = session.state.remove_day_entry(date, &options.id);
    if removed.is_some() {
        session.save()?;
    }

    let completion = stats::day_completion(&session.state.completions, date);
    let mut human = HumanOutput::new(format!(
        "habitual day rm: {} on {}",
        options.id,
        clock::date_key(date)
    ));
    if removed.is_none() {
        human.push_warning(format!(
            "no entry {} on {}; nothing removed",
            options.id,
            clock::date_key(date)
        ));
    }

    emit_success(
        options.globals.output(),
        "day rm",
        &DayChangeReport {
            id: options.id,
            date,
            changed: removed.is_some(),
            completion,
        },
        Some(&human),
    )
}
