//! habitual - Personal Habit Checklist Library
//!
//! This library provides the core functionality for the habitual CLI:
//! a task registry, per-day completion tracking, and the statistics
//! derived from them.
//!
//! # Core Concepts
//!
//! - **Tasks**: Registry entries with an icon, color, schedule and recurrence
//! - **Completions**: A date-keyed store of which tasks were done each day
//! - **Streaks**: Consecutive days with at least one completed entry
//! - **Perfect Weeks**: Sunday-started weeks where every tracked day hit 100%
//! - **Sessions**: Token-authenticated access to one user's data
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task registry and task enums
//! - `completion`: Completion store and one-off day records
//! - `stats`: Streaks, rolling completion and perfect weeks
//! - `calendar`: Month grid with per-day heat levels
//! - `achievements`: Badge catalog evaluated against the stores
//! - `profile`: Profile, weekly goals and theme
//! - `state`: Per-user state and the edits that keep it consistent
//! - `auth`: Account registry and the local authenticator
//! - `session`: Stored session plus the daily rollover
//! - `export`: CSV/JSON export, JSON import, weekly report, share codes
//! - `storage`: Data directory layout and JSON persistence
//! - `lock`: File locking and atomic writes

pub mod achievements;
pub mod auth;
pub mod calendar;
pub mod cli;
pub mod clock;
pub mod completion;
pub mod config;
pub mod error;
pub mod export;
pub mod lock;
pub mod motivation;
pub mod output;
pub mod profile;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
