//! habitual profile/goals/theme command implementations

use serde::Serialize;

use crate::cli::context::Globals;
use crate::cli::ProfileFields;
use crate::clock;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::profile::{GoalProgress, GoalsPatch, Profile, ProfilePatch, Theme, WeeklyGoals};
use crate::session::Session;
use crate::stats;

/// Options for `habitual profile set`
pub struct ProfileSetOptions {
    pub fields: ProfileFields,
    pub globals: Globals,
}

/// Options for `habitual goals set`
pub struct GoalsSetOptions {
    pub target: Option<u32>,
    pub tasks_per_day: Option<u32>,
    pub streak: Option<u32>,
    pub notes: Option<String>,
    pub globals: Globals,
}

pub enum ThemeAction {
    Show,
    Set(String),
    Toggle,
}

/// Options for `habitual theme`
pub struct ThemeOptions {
    pub action: ThemeAction,
    pub globals: Globals,
}

#[derive(Serialize)]
struct ProfileReport {
    profile: Profile,
    complete: bool,
}

#[derive(Serialize)]
struct GoalsReport {
    goals: WeeklyGoals,
    progress: GoalProgress,
}

#[derive(Serialize)]
struct ThemeReport {
    theme: Theme,
    changed: bool,
}

pub fn run_profile_show(globals: Globals) -> Result<()> {
    let session = globals.open_session()?;
    emit_profile(&globals, "profile show", &session.state.profile)
}

pub fn run_profile_set(options: ProfileSetOptions) -> Result<()> {
    let fields = options.fields;
    let patch = ProfilePatch {
        name: fields.name,
        email: fields.email,
        location: fields.location,
        title: fields.title,
        dob: fields.dob.as_deref().map(clock::parse_date).transpose()?,
        occupation: fields.occupation,
        phone: fields.phone,
        website: fields.website,
        interests: fields.interests,
        bio: fields.bio,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass at least one field".to_string(),
        ));
    }

    let mut session = options.globals.open_session()?;
    session.state.profile.apply(patch);
    session.save()?;

    emit_profile(&options.globals, "profile set", &session.state.profile)
}

fn emit_profile(globals: &Globals, command: &str, profile: &Profile) -> Result<()> {
    let mut human = HumanOutput::new(format!("habitual {command}: {}", profile.display_name()));
    let fields = [
        ("email", &profile.email),
        ("location", &profile.location),
        ("title", &profile.title),
        ("occupation", &profile.occupation),
        ("phone", &profile.phone),
        ("website", &profile.website),
        ("interests", &profile.interests),
        ("bio", &profile.bio),
    ];
    for (key, value) in fields {
        if !value.is_empty() {
            human.push_summary(key, value.clone());
        }
    }
    if let Some(dob) = profile.dob {
        human.push_summary("born", clock::date_key(dob));
    }
    if !profile.is_complete() {
        human.push_next_step("habitual profile set --location <place> --title <title> --bio <text>");
    }

    emit_success(
        globals.output(),
        command,
        &ProfileReport {
            profile: profile.clone(),
            complete: profile.is_complete(),
        },
        Some(&human),
    )
}

pub fn run_goals_show(globals: Globals) -> Result<()> {
    let session = globals.open_session()?;
    emit_goals(&globals, "goals show", &session)
}

pub fn run_goals_set(options: GoalsSetOptions) -> Result<()> {
    let patch = GoalsPatch {
        target_completion_percent: options.target,
        tasks_per_day: options.tasks_per_day,
        streak_target_days: options.streak,
        notes: options.notes,
    };

    let mut session = options.globals.open_session()?;
    session.state.goals.update(patch)?;
    session.save()?;

    emit_goals(&options.globals, "goals set", &session)
}

fn emit_goals(globals: &Globals, command: &str, session: &Session) -> Result<()> {
    let state = &session.state;
    let summary = stats::summarize(
        &state.completions,
        &state.tasks,
        session.today,
        &session.config.stats,
    );
    let goals = state.goals.clone();
    let progress = goals.progress(&summary);

    let mut human = HumanOutput::new(format!("habitual {command}"));
    human.push_summary(
        "completion",
        format!(
            "{}% of {}% target ({}%)",
            summary.overall_completion, goals.target_completion_percent, progress.completion
        ),
    );
    human.push_summary(
        "tasks per day",
        format!(
            "{} of {} ({}%)",
            summary.avg_completed_per_day, goals.tasks_per_day, progress.tasks_per_day
        ),
    );
    human.push_summary(
        "streak",
        format!(
            "{} of {} days ({}%)",
            summary.current_streak, goals.streak_target_days, progress.streak
        ),
    );
    if !goals.notes.is_empty() {
        human.push_detail(goals.notes.clone());
    }

    emit_success(
        globals.output(),
        command,
        &GoalsReport { goals, progress },
        Some(&human),
    )
}

pub fn run_theme(options: ThemeOptions) -> Result<()> {
    let mut session = options.globals.open_session()?;
    let current = session.state.theme;
    let (command, next) = match options.action {
        ThemeAction::Show => ("theme show", current),
        ThemeAction::Set(raw) => ("theme set", raw.parse::<Theme>()?),
        ThemeAction::Toggle => ("theme toggle", current.toggle()),
    };

    let changed = next != current;
    if changed {
        session.state.theme = next;
        session.save()?;
    }

    let human = HumanOutput::new(format!("habitual {command}: {next}"));
    emit_success(
        options.globals.output(),
        command,
        &ThemeReport {
            theme: next,
            changed,
        },
        Some(&human),
    )
}
