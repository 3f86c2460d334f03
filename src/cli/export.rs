//! habitual export/import/share command implementations
//!
//! Exports print to stdout unless `--output` names a file. With `--json` the
//! exported text is wrapped in the usual envelope instead.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::cli::context::Globals;
use crate::clock;
use crate::error::{Error, Result};
use crate::export::{self, ShareSummary};
use crate::lock;
use crate::output::{emit_success, HumanOutput};
use crate::profile::WeeklyGoals;
use crate::stats;

/// Options for `habitual export`
pub struct ExportOptions {
    pub format: String,
    pub output: Option<PathBuf>,
    pub globals: Globals,
}

/// Options for `habitual import`
pub struct ImportOptions {
    pub file: PathBuf,
    pub globals: Globals,
}

/// Options for `habitual share`
pub struct ShareOptions {
    pub decode: Option<String>,
    pub globals: Globals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ExportFormat {
    Csv,
    Json,
    Report,
}

impl ExportFormat {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "report" | "txt" => Ok(ExportFormat::Report),
            _ => Err(Error::InvalidArgument(format!(
                "invalid export format '{raw}': must be csv, json, or report"
            ))),
        }
    }
}

#[derive(Serialize)]
struct ExportReport {
    format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Serialize)]
struct ImportReport {
    file: PathBuf,
    tasks: usize,
    tracked_days: usize,
}

#[derive(Serialize)]
struct ShareReport {
    code: String,
    summary: ShareSummary,
}

pub fn run_export(options: ExportOptions) -> Result<()> {
    let format = ExportFormat::parse(&options.format)?;
    let session = options.globals.open_session()?;
    let state = &session.state;

    let content = match format {
        ExportFormat::Csv => export::to_csv(state),
        ExportFormat::Json => export::to_json(state, Utc::now())?,
        ExportFormat::Report => {
            let summary = stats::summarize(
                &state.completions,
                &state.tasks,
                session.today,
                &session.config.stats,
            );
            export::weekly_report(state, &summary, Utc::now())
        }
    };

    if let Some(path) = &options.output {
        lock::write_atomic(path, content.as_bytes())?;
        tracing::debug!(path = %path.display(), "wrote export");

        let mut human = HumanOutput::new(format!(
            "habitual export: wrote {}",
            path.display()
        ));
        human.push_summary("format", options.format.trim().to_lowercase());
        human.push_summary("bytes", content.len().to_string());
        return emit_success(
            options.globals.output(),
            "export",
            &ExportReport {
                format,
                path: Some(path.clone()),
                content: None,
            },
            Some(&human),
        );
    }

    if options.globals.json {
        return emit_success(
            options.globals.output(),
            "export",
            &ExportReport {
                format,
                path: None,
                content: Some(content),
            },
            None,
        );
    }

    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn run_import(options: ImportOptions) -> Result<()> {
    let raw = fs::read_to_string(&options.file)?;
    let mut session = options.globals.open_session()?;

    let imported = export::from_json(&raw, WeeklyGoals::from_config(&session.config.goals))?;
    session.state = imported;
    session
        .state
        .profile
        .fill_identity(&session.account.name, &session.account.email);
    session.save()?;

    let report = ImportReport {
        file: options.file.clone(),
        tasks: session.state.tasks.len(),
        tracked_days: session.state.completions.tracked_day_count(),
    };

    let mut human = HumanOutput::new(format!(
        "habitual import: {}",
        options.file.display()
    ));
    human.push_summary("tasks", report.tasks.to_string());
    human.push_summary("tracked days", report.tracked_days.to_string());
    human.push_warning("previous data was replaced");
    human.push_next_step("habitual stats");

    emit_success(options.globals.output(), "import", &report, Some(&human))
}

pub fn run_share(options: ShareOptions) -> Result<()> {
    let (code, summary) = match options.decode {
        Some(code) => {
            let summary = export::decode_share_code(&code)?;
            (code.trim().to_string(), summary)
        }
        None => {
            let session = options.globals.open_session()?;
            let state = &session.state;
            let stats = stats::summarize(
                &state.completions,
                &state.tasks,
                session.today,
                &session.config.stats,
            );
            let summary = ShareSummary::new(&state.profile, &stats);
            (export::share_code(&summary)?, summary)
        }
    };

    let mut human = HumanOutput::new(format!("habitual share: {}", summary.user));
    human.push_summary("code", code.clone());
    human.push_summary("streak", format!("{} days", summary.streak));
    human.push_summary("completion", format!("{}%", summary.completion));
    human.push_summary("tasks", summary.tasks.to_string());
    human.push_summary("date", clock::date_key(summary.date));

    emit_success(
        options.globals.output(),
        "share",
        &ShareReport { code, summary },
        Some(&human),
    )
}
