//! habitual task and check command implementations
//!
//! Registry edits (add/edit/rm/ls) and daily completion toggles.

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::context::{date_or_today, Globals};
use crate::cli::TaskFields;
use crate::clock;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::task::{Color, Icon, Recurrence, Schedule, Task, TaskDraft, TaskPatch};

/// Options for `habitual task add`
pub struct AddOptions {
    pub label: String,
    pub fields: TaskFields,
    pub globals: Globals,
}

/// Options for `habitual task edit`
pub struct EditOptions {
    pub id: String,
    pub label: Option<String>,
    pub fields: TaskFields,
    pub globals: Globals,
}

/// Options for `habitual task rm`
pub struct RmOptions {
    pub id: String,
    pub globals: Globals,
}

/// Options for `habitual task ls`
pub struct LsOptions {
    pub date: Option<String>,
    pub all: bool,
    pub globals: Globals,
}

/// Options for `habitual check`
pub struct CheckOptions {
    pub id: String,
    pub date: Option<String>,
    pub globals: Globals,
}

/// Typed view of the shared task flags
struct ParsedFields {
    icon: Option<Icon>,
    color: Option<Color>,
    category: Option<String>,
    schedule: Option<Schedule>,
    recurrence: Option<Recurrence>,
    custom_date: Option<NaiveDate>,
}

impl ParsedFields {
    fn parse(fields: TaskFields) -> Result<Self> {
        Ok(Self {
            icon: fields.icon.as_deref().map(str::parse).transpose()?,
            color: fields.color.as_deref().map(str::parse).transpose()?,
            category: fields.category,
            schedule: fields.schedule.as_deref().map(str::parse).transpose()?,
            recurrence: fields.recurrence.as_deref().map(str::parse).transpose()?,
            custom_date: fields.date.as_deref().map(clock::parse_date).transpose()?,
        })
    }
}

#[derive(Serialize)]
struct TaskAddReport {
    task: Task,
    seeded_today: bool,
}

#[derive(Serialize)]
struct TaskChangeReport {
    id: String,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
}

#[derive(Serialize)]
struct TaskListItem {
    #[serde(flatten)]
    task: Task,
    scheduled: bool,
    tracked: bool,
    done: bool,
}

#[derive(Serialize)]
struct TaskListReport {
    date: NaiveDate,
    total: usize,
    tasks: Vec<TaskListItem>,
}

#[derive(Serialize)]
struct CheckReport {
    id: String,
    date: NaiveDate,
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    done: Option<bool>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let fields = ParsedFields::parse(options.fields)?;
    let mut session = options.globals.open_session()?;
    let today = session.today;

    let label_blank = options.label.trim().is_empty();
    let draft = TaskDraft {
        label: options.label,
        icon: fields.icon,
        color: fields.color,
        category: fields.category,
        schedule: fields.schedule,
        recurrence: fields.recurrence,
        custom_date: fields.custom_date,
    };
    let task = session.state.add_task(draft, today).ok_or_else(|| {
        if label_blank {
            Error::InvalidArgument("task label cannot be empty".to_string())
        } else {
            Error::InvalidArgument("a custom-date schedule needs --date YYYY-MM-DD".to_string())
        }
    })?;
    session.save()?;

    let seeded_today = session.state.completions.entry(today, &task.id).is_some();
    let mut human = HumanOutput::new(format!("habitual task add: {}", task.label));
    human.push_summary("id", task.id.clone());
    human.push_summary("icon", format!("{} {}", task.icon.emoji(), task.icon.as_str()));
    human.push_summary("color", task.color.as_str());
    human.push_summary("category", task.category.clone());
    human.push_summary("recurrence", task.recurrence.to_string());
    if let Some(date) = task.custom_date {
        human.push_summary("date", clock::date_key(date));
    }
    human.push_next_step(format!("habitual check {}", task.id));

    emit_success(
        options.globals.output(),
        "task add",
        &TaskAddReport { task, seeded_today },
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let fields = ParsedFields::parse(options.fields)?;
    let patch = TaskPatch {
        label: options.label,
        icon: fields.icon,
        color: fields.color,
        category: fields.category,
        schedule: fields.schedule,
        recurrence: fields.recurrence,
        custom_date: fields.custom_date,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass at least one field".to_string(),
        ));
    }

    let mut session = options.globals.open_session()?;
    let exists = session.state.tasks.find(&options.id).is_some();
    let updated = session.state.update_task(&options.id, patch, session.today);
    if exists && updated.is_none() {
        return Err(Error::InvalidArgument(
            "edit rejected: label cannot be blank and custom-date needs a date".to_string(),
        ));
    }
    if updated.is_some() {
        session.save()?;
    }

    let mut human = HumanOutput::new(format!("habitual task edit: {}", options.id));
    match &updated {
        Some(task) => {
            human.push_summary("label", task.label.clone());
            human.push_summary("color", task.color.as_str());
            human.push_summary("recurrence", task.recurrence.to_string());
        }
        None => {
            human.push_warning(format!("no task with id {}; nothing changed", options.id));
            human.push_next_step("habitual task ls --all");
        }
    }

    emit_success(
        options.globals.output(),
        "task edit",
        &TaskChangeReport {
            id: options.id,
            changed: updated.is_some(),
            task: updated,
        },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut session = options.globals.open_session()?;
    let removed = session.state.delete_task(&options.id);
    if removed.is_some() {
        session.save()?;
    }

    let mut human = HumanOutput::new(format!("habitual task rm: {}", options.id));
    match &removed {
        Some(task) => human.push_summary("removed", task.label.clone()),
        None => {
            human.push_warning(format!("no task with id {}; nothing removed", options.id));
            human.push_next_step("habitual task ls --all");
        }
    }

    emit_success(
        options.globals.output(),
        "task rm",
        &TaskChangeReport {
            id: options.id,
            changed: removed.is_some(),
            task: removed,
        },
        Some(&human),
    )
}

pub fn run_ls(options: LsOptions) -> Result<()> {
    let session = options.globals.open_session()?;
    let date = date_or_today(options.date.as_deref(), session.today)?;
    let state = &session.state;

    let tasks: Vec<TaskListItem> = state
        .tasks
        .all()
        .iter()
        .filter_map(|task| {
            let scheduled = task.is_scheduled_on(date);
            let tracked = state.completions.entry(date, &task.id).is_some();
            (options.all || scheduled || tracked).then(|| TaskListItem {
                task: task.clone(),
                scheduled,
                tracked,
                done: state.completions.is_done(date, &task.id),
            })
        })
        .collect();

    let mut human = HumanOutput::new(format!(
        "habitual task ls: {} ({} tasks)",
        clock::date_key(date),
        tasks.len()
    ));
    for item in &tasks {
        let mark = if item.done { "[x]" } else { "[ ]" };
        human.push_detail(format!(
            "{mark} {} {} ({}, {})",
            item.task.icon.emoji(),
            item.task.label,
            item.task.category,
            item.task.id
        ));
    }
    if state.tasks.is_empty() {
        human.push_next_step("habitual task add <label>");
    }

    emit_success(
        options.globals.output(),
        "task ls",
        &TaskListReport {
            date,
            total: state.tasks.len(),
            tasks,
        },
        Some(&human),
    )
}

pub fn run_check(options: CheckOptions) -> Result<()> {
    let mut session = options.globals.open_session()?;
    let today = session.today;
    let date = date_or_today(options.date.as_deref(), today)?;

    let known = session.state.tasks.find(&options.id).is_some()
        || session.state.completions.entry(date, &options.id).is_some();

    let mut human = HumanOutput::new(format!(
        "habitual check: {} on {}",
        options.id,
        clock::date_key(date)
    ));
    let done = if known {
        session.state.toggle_completion(date, &options.id, today)
    } else {
        None
    };

    match done {
        Some(done) => {
            session.save()?;
            let label = session.state.entry_label(date, &options.id);
            human.push_summary(label, if done { "done" } else { "not done" });
            let completion = crate::stats::day_completion(&session.state.completions, date);
            human.push_summary(
                "day",
                format!(
                    "{}/{} ({}%)",
                    completion.completed, completion.total, completion.percentage
                ),
            );
        }
        None if !known => {
            human.push_warning(format!("no task or entry with id {}", options.id));
            human.push_next_step("habitual task ls");
        }
        None => {
            human.push_warning("cannot check off a future date; nothing changed");
        }
    }

    emit_success(
        options.globals.output(),
        "check",
        &CheckReport {
            id: options.id,
            date,
            changed: done.is_some(),
            done,
        },
        Some(&human),
    )
}
