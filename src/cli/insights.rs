//! habitual stats/calendar/achievements/quote
//!
//! Read-only views derived from the loaded stores.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::achievements::{self, AchievementInput, AchievementStatus};
use crate::calendar::{self, MonthView};
use crate::cli::context::Globals;
use crate::clock;
use crate::error::Result;
use crate::motivation;
use crate::output::{emit_success, HumanOutput};
use crate::profile::GoalProgress;
use crate::stats::{self, DashboardStats};

/// Options for `habitual calendar`
pub struct CalendarOptions {
    pub month: Option<String>,
    pub globals: Globals,
}

#[derive(Serialize)]
struct StatsReport {
    #[serde(flatten)]
    stats: DashboardStats,
    goal_progress: GoalProgress,
}

#[derive(Serialize)]
struct AchievementsReport {
    unlocked: usize,
    total: usize,
    achievements: Vec<AchievementStatus>,
}

#[derive(Serialize)]
struct QuoteReport {
    date: NaiveDate,
    quote: &'static str,
}

pub fn run_stats(globals: Globals) -> Result<()> {
    let session = globals.open_session()?;
    let state = &session.state;
    let summary = stats::summarize(
        &state.completions,
        &state.tasks,
        session.today,
        &session.config.stats,
    );
    let goal_progress = state.goals.progress(&summary);

    let mut human = HumanOutput::new(format!(
        "habitual stats: {}",
        clock::date_key(summary.today)
    ));
    let today = summary.today_completion;
    human.push_summary(
        "today",
        format!("{}/{} ({}%)", today.completed, today.total, today.percentage),
    );
    human.push_summary("current streak", format!("{} days", summary.current_streak));
    human.push_summary("longest streak", format!("{} days", summary.longest_streak));
    human.push_summary("7-day completion", format!("{}%", summary.overall_completion));
    human.push_summary(
        "days active",
        format!("{}/7 ({}% consistency)", summary.days_active, summary.consistency),
    );
    human.push_summary("avg completed/day", summary.avg_completed_per_day.to_string());
    human.push_summary("total check-ins", summary.tracked_days.to_string());
    human.push_summary(
        "perfect weeks",
        format!("{} of last {}", summary.perfect_weeks, summary.weeks_scanned),
    );
    human.push_summary("tasks", summary.tasks_total.to_string());
    for day in &summary.last_seven_days {
        human.push_detail(format!(
            "{}: {}/{} ({}%)",
            clock::date_key(day.date),
            day.completed,
            day.total,
            day.percentage
        ));
    }
    if summary.tasks_total == 0 {
        human.push_next_step("habitual task add <label> --recurrence daily");
    }

    emit_success(
        globals.output(),
        "stats",
        &StatsReport {
            stats: summary,
            goal_progress,
        },
        Some(&human),
    )
}

pub fn run_calendar(options: CalendarOptions) -> Result<()> {
    let session = options.globals.open_session()?;
    let (year, month) = match options.month.as_deref() {
        Some(raw) => clock::parse_month(raw)?,
        None => (session.today.year(), session.today.month()),
    };
    let view = calendar::month_view(&session.state.completions, year, month, session.today)?;

    let mut human = HumanOutput::new(format!("habitual calendar: {}", view.title()));
    human.push_summary("active days", view.totals.active_days.to_string());
    human.push_summary("perfect days", view.totals.perfect_days.to_string());
    human.push_summary("average", format!("{}%", view.totals.average_percentage));
    for line in render_grid(&view) {
        human.push_detail(line);
    }

    emit_success(options.globals.output(), "calendar", &view, Some(&human))
}

/// Sunday-first week rows of heat glyphs.
fn render_grid(view: &MonthView) -> Vec<String> {
    let mut cells: Vec<String> = (0..view.leading_blanks).map(|_| "    ".to_string()).collect();
    for day in &view.days {
        let marker = if day.is_today { '>' } else { ' ' };
        let glyph = if day.is_future { ' ' } else { day.heat.glyph() };
        cells.push(format!("{marker}{:>2}{glyph}", day.day));
    }

    let mut rows = vec!["  Su  Mo  Tu  We  Th  Fr  Sa".to_string()];
    rows.extend(cells.chunks(7).map(|week| week.join("")));
    rows
}

pub fn run_achievements(globals: Globals) -> Result<()> {
    let session = globals.open_session()?;
    let state = &session.state;
    let statuses = achievements::evaluate(&AchievementInput {
        store: &state.completions,
        registry: &state.tasks,
        profile: &state.profile,
        today: session.today,
    });
    let unlocked = achievements::unlocked_count(&statuses);

    let mut human = HumanOutput::new(format!(
        "habitual achievements: {unlocked}/{} unlocked",
        statuses.len()
    ));
    for status in &statuses {
        let mark = if status.unlocked { "[x]" } else { "[ ]" };
        human.push_detail(format!(
            "{mark} {} ({:?}): {}",
            status.name, status.rarity, status.description
        ));
    }

    emit_success(
        globals.output(),
        "achievements",
        &AchievementsReport {
            unlocked,
            total: statuses.len(),
            achievements: statuses,
        },
        Some(&human),
    )
}

pub fn run_quote(globals: Globals) -> Result<()> {
    let date = globals.today()?;
    let quote = motivation::quote_for(date);

    let human = HumanOutput::new(quote);
    emit_success(globals.output(), "quote", &QuoteReport { date, quote }, Some(&human))
}
