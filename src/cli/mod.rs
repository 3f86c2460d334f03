//! Command-line interface for habitual
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod account;
mod context;
mod day;
mod export;
mod insights;
mod profile;
mod task;

pub use context::Globals;

/// habitual - a personal habit checklist
///
/// Define recurring or one-off tasks, tick them off each day, and follow
/// streaks, weekly goals and achievements.
#[derive(Parser, Debug)]
#[command(name = "habitual")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "HABITUAL_HOME")]
    pub home: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, env = "HABITUAL_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Task registry management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Toggle completion of a task on a day
    Check {
        /// Task or day-entry id
        id: String,

        /// Day to toggle (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// One-off entries on a single day
    #[command(subcommand)]
    Day(DayCommands),

    /// Dashboard statistics
    Stats,

    /// Month heat map
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Achievement progress
    Achievements,

    /// Profile management
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Weekly goals
    #[command(subcommand)]
    Goals(GoalsCommands),

    /// Display theme preference
    #[command(subcommand)]
    Theme(ThemeCommands),

    /// Export data: csv, json or report
    Export {
        /// Export format: csv, json, report
        format: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace all data with a JSON backup
    Import {
        /// Backup file produced by `habitual export json`
        file: PathBuf,
    },

    /// Print a share code summarizing progress
    Share {
        /// Decode an existing share code instead
        #[arg(long)]
        decode: Option<String>,
    },

    /// Motivation for today
    Quote,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task label
        label: String,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Edit a task
    Edit {
        /// Task id
        id: String,

        /// New label
        #[arg(long)]
        label: Option<String>,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Delete a task and its history
    Rm {
        /// Task id
        id: String,
    },

    /// List tasks with their state for a day
    Ls {
        /// Day to show (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Include tasks not scheduled on that day
        #[arg(long)]
        all: bool,
    },
}

/// Optional task attributes shared by `task add` and `task edit`
#[derive(clap::Args, Debug, Default)]
pub struct TaskFields {
    /// Icon: book, activity, code, trophy, water, moon, star, heart
    #[arg(long)]
    pub icon: Option<String>,

    /// Color: indigo, teal, purple, rose, orange, emerald, blue, green, yellow, red, cyan, pink
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Schedule: daily, tomorrow, every-day, custom-date
    #[arg(long)]
    pub schedule: Option<String>,

    /// Recurrence: none, daily, weekly, monthly
    #[arg(long)]
    pub recurrence: Option<String>,

    /// Date for a custom-date schedule (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

/// Day subcommands
#[derive(Subcommand, Debug)]
pub enum DayCommands {
    /// Show every entry tracked on a day
    Show {
        #[arg(long)]
        date: Option<String>,
    },

    /// Add a one-off entry to a day
    Add {
        /// Entry title
        title: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Remove an entry from a day
    Rm {
        /// Entry id
        id: String,

        #[arg(long)]
        date: Option<String>,
    },
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the profile
    Show,

    /// Update profile fields
    Set(ProfileFields),
}

#[derive(clap::Args, Debug, Default)]
pub struct ProfileFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub dob: Option<String>,
    #[arg(long)]
    pub occupation: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub interests: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
}

/// Goals subcommands
#[derive(Subcommand, Debug)]
pub enum GoalsCommands {
    /// Show goals and progress toward them
    Show,

    /// Update goals
    Set {
        /// Target completion percentage (0-100)
        #[arg(long)]
        target: Option<u32>,

        /// Completed tasks per active day
        #[arg(long)]
        tasks_per_day: Option<u32>,

        /// Streak length in days
        #[arg(long)]
        streak: Option<u32>,

        #[arg(long)]
        notes: Option<String>,
    },
}

/// Theme subcommands
#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Show the current theme
    Show,

    /// Set the theme: dark or light
    Set { theme: String },

    /// Switch between dark and light
    Toggle,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = Globals {
            home: self.home,
            today: self.today,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Signup {
                name,
                email,
                password,
            } => account::run_signup(account::SignupOptions {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                password: password.unwrap_or_default(),
                globals,
            }),
            Commands::Login { email, password } => account::run_login(account::LoginOptions {
                email: email.unwrap_or_default(),
                password: password.unwrap_or_default(),
                globals,
            }),
            Commands::Logout => account::run_logout(globals),
            Commands::Whoami => account::run_whoami(globals),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add { label, fields } => {
                    task::run_add(task::AddOptions {
                        label,
                        fields,
                        globals,
                    })
                }
                TaskCommands::Edit { id, label, fields } => task::run_edit(task::EditOptions {
                    id,
                    label,
                    fields,
                    globals,
                }),
                TaskCommands::Rm { id } => task::run_rm(task::RmOptions { id, globals }),
                TaskCommands::Ls { date, all } => {
                    task::run_ls(task::LsOptions { date, all, globals })
                }
            },
            Commands::Check { id, date } => {
                task::run_check(task::CheckOptions { id, date, globals })
            }
            Commands::Day(cmd) => match cmd {
                DayCommands::Show { date } => day::run_show(day::ShowOptions { date, globals }),
                DayCommands::Add {
                    title,
                    date,
                    icon,
                    color,
                } => day::run_add(day::AddOptions {
                    title,
                    date,
                    icon,
                    color,
                    globals,
                }),
                DayCommands::Rm { id, date } => day::run_rm(day::RmOptions { id, date, globals }),
            },
            Commands::Stats => insights::run_stats(globals),
            Commands::Calendar { month } => {
                insights::run_calendar(insights::CalendarOptions { month, globals })
            }
            Commands::Achievements => insights::run_achievements(globals),
            Commands::Quote => insights::run_quote(globals),
            Commands::Profile(cmd) => match cmd {
                ProfileCommands::Show => profile::run_profile_show(globals),
                ProfileCommands::Set(fields) => {
                    profile::run_profile_set(profile::ProfileSetOptions { fields, globals })
                }
            },
            Commands::Goals(cmd) => match cmd {
                GoalsCommands::Show => profile::run_goals_show(globals),
                GoalsCommands::Set {
                    target,
                    tasks_per_day,
                    streak,
                    notes,
                } => profile::run_goals_set(profile::GoalsSetOptions {
                    target,
                    tasks_per_day,
                    streak,
                    notes,
                    globals,
                }),
            },
            Commands::Theme(cmd) => match cmd {
                ThemeCommands::Show => profile::run_theme(profile::ThemeOptions {
                    action: profile::ThemeAction::Show,
                    globals,
                }),
                ThemeCommands::Set { theme } => profile::run_theme(profile::ThemeOptions {
                    action: profile::ThemeAction::Set(theme),
                    globals,
                }),
                ThemeCommands::Toggle => profile::run_theme(profile::ThemeOptions {
                    action: profile::ThemeAction::Toggle,
                    globals,
                }),
            },
            Commands::Export { format, output } => export::run_export(export::ExportOptions {
                format,
                output,
                globals,
            }),
            Commands::Import { file } => {
                export::run_import(export::ImportOptions { file, globals })
            }
            Commands::Share { decode } => {
                export::run_share(export::ShareOptions { decode, globals })
            }
        }
    }
}
