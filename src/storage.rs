//! Storage layer for habitual
//!
//! Every document is a standalone JSON file under the data home. Documents are
//! loaded independently: a missing or unreadable one falls back to its default
//! and the rest still load.
//!
//! # Directory Structure
//!
//! ```text
//! <home>/
//!   config.toml                 # Optional configuration
//!   accounts.json               # Account registry (locked updates)
//!   session.json                # Active credential for this machine
//!   users/<user_id>/
//!     completions.json          # Date-keyed completion store
//!     tasks.json                # Task registry
//!     profile.json              # Profile record
//!     goals.json                # Weekly goals
//!     theme.json                # Display theme
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};

use crate::auth::AccountRegistry;
use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::profile::WeeklyGoals;
use crate::session::SessionRecord;
use crate::state::AppState;

/// Environment override for the data home
pub const HOME_ENV: &str = "HABITUAL_HOME";

const ACCOUNTS_FILE: &str = "accounts.json";
const SESSION_FILE: &str = "session.json";
const USERS_DIR: &str = "users";

/// Resolve the data home from an explicit path, the environment, or the
/// platform data directory.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(raw) = std::env::var(HOME_ENV) {
        if !raw.trim().is_empty() {
            return Ok(PathBuf::from(raw.trim()));
        }
    }

    ProjectDirs::from("dev", "habitual", "habitual")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::OperationFailed(format!(
                "cannot determine a data directory; pass --home or set {HOME_ENV}"
            ))
        })
}

/// Storage manager for one data home
#[derive(Debug, Clone)]
pub struct Storage {
    home: PathBuf,
}

impl Storage {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn config_file(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.home.join(ACCOUNTS_FILE)
    }

    pub fn session_file(&self) -> PathBuf {
        self.home.join(SESSION_FILE)
    }

    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.home.join(USERS_DIR).join(user_id)
    }

    pub fn completions_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("completions.json")
    }

    pub fn tasks_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("tasks.json")
    }

    pub fn profile_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("profile.json")
    }

    pub fn goals_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("goals.json")
    }

    pub fn theme_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("theme.json")
    }

    pub fn load_config(&self) -> Config {
        Config::load_from_home(&self.home)
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Write JSON atomically (temp file + rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Read a document, or `fallback` when it is missing or unreadable
    pub fn read_json_or<T: DeserializeOwned>(&self, path: &Path, fallback: T) -> T {
        if !path.exists() {
            return fallback;
        }
        match self.read_json(path) {
            Ok(data) => {
                tracing::debug!(path = %path.display(), "loaded document");
                data
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "unreadable document, using default");
                fallback
            }
        }
    }

    // =========================================================================
    // Account registry
    // =========================================================================

    pub fn load_accounts(&self) -> Result<AccountRegistry> {
        let path = self.accounts_file();
        if path.exists() {
            self.read_json(&path)
        } else {
            Ok(AccountRegistry::default())
        }
    }

    /// Read-modify-write the account registry under its file lock
    ///
    /// Nothing is written when `f` fails.
    pub fn update_accounts<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut AccountRegistry) -> Result<T>,
    {
        let path = self.accounts_file();
        let _lock = FileLock::acquire(lock::lock_path_for(&path), DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut registry = self.load_accounts()?;
        let result = f(&mut registry)?;
        self.write_json(&path, &registry)?;

        Ok(result)
    }

    // =========================================================================
    // Session credential
    // =========================================================================

    pub fn read_session(&self) -> Option<SessionRecord> {
        let path = self.session_file();
        if !path.exists() {
            return None;
        }
        match self.read_json(&path) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable session file");
                None
            }
        }
    }

    /// Replace the stored credential under `session.json.lock`
    pub fn write_session(&self, record: &SessionRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        lock::write_atomic_locked(self.session_file(), json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }

    /// Remove the stored credential. Returns whether one existed.
    pub fn clear_session(&self) -> Result<bool> {
        let path = self.session_file();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    // =========================================================================
    // Per-user state
    // =========================================================================

    /// Load every per-user document, each independently
    pub fn load_state(&self, user_id: &str, goal_defaults: WeeklyGoals) -> AppState {
        AppState {
            completions: self.read_json_or(&self.completions_file(user_id), Default::default()),
            tasks: self.read_json_or(&self.tasks_file(user_id), Default::default()),
            profile: self.read_json_or(&self.profile_file(user_id), Default::default()),
            goals: self.read_json_or(&self.goals_file(user_id), goal_defaults),
            theme: self.read_json_or(&self.theme_file(user_id), Default::default()),
        }
    }

    pub fn save_state(&self, user_id: &str, state: &AppState) -> Result<()> {
        self.write_json(&self.completions_file(user_id), &state.completions)?;
        self.write_json(&self.tasks_file(user_id), &state.tasks)?;
        self.write_json(&self.profile_file(user_id), &state.profile)?;
        self.write_json(&self.goals_file(user_id), &state.goals)?;
        self.write_json(&self.theme_file(user_id), &state.theme)?;
        tracing::debug!(user_id, "saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    use crate::profile::Theme;
    use crate::task::TaskDraft;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_storage_paths() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());

        assert_eq!(storage.accounts_file(), temp.path().join("accounts.json"));
        assert_eq!(storage.session_file(), temp.path().join("session.json"));
        assert_eq!(storage.config_file(), temp.path().join("config.toml"));
        assert_eq!(
            storage.tasks_file("u1"),
            temp.path().join("users").join("u1").join("tasks.json")
        );
    }

    #[test]
    fn explicit_home_wins() {
        let temp = TempDir::new().unwrap();
        assert_eq!(resolve_home(Some(temp.path())).unwrap(), temp.path());
    }

    #[test]
    fn missing_documents_load_as_defaults() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        let state = storage.load_state("nobody", WeeklyGoals::default());
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn state_round_trips() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        let today = day("2024-01-10");

        let mut state = AppState::default();
        let task = state.add_task(TaskDraft::new("Read"), today).unwrap();
        state.toggle_completion(today, &task.id, today);
        state.theme = Theme::Light;
        storage.save_state("u1", &state).unwrap();

        let loaded = storage.load_state("u1", WeeklyGoals::default());
        assert_eq!(loaded, state);
    }

    #[test]
    fn corrupt_document_falls_back_alone() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        let today = day("2024-01-10");

        let mut state = AppState::default();
        let task = state.add_task(TaskDraft::new("Read"), today).unwrap();
        state.toggle_completion(today, &task.id, today);
        storage.save_state("u1", &state).unwrap();

        fs::write(storage.completions_file("u1"), "{not json").unwrap();
        let loaded = storage.load_state("u1", WeeklyGoals::default());
        assert_eq!(loaded.completions, Default::default());
        assert_eq!(loaded.tasks, state.tasks);
    }

    #[test]
    fn failed_account_update_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());

        let result: Result<()> = storage.update_accounts(|_| {
            Err(Error::OperationFailed("boom".to_string()))
        });
        assert!(result.is_err());
        assert!(!storage.accounts_file().exists());
    }

    #[test]
    fn session_file_lifecycle() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path());
        assert!(storage.read_session().is_none());
        assert!(!storage.clear_session().unwrap());

        let record = SessionRecord {
            token: "abc".to_string(),
            user_id: "u1".to_string(),
            email: "a@example.com".to_string(),
            issued_at: Utc::now(),
        };
        storage.write_session(&record).unwrap();
        assert_eq!(storage.read_session(), Some(record));
        assert!(storage.clear_session().unwrap());
        assert!(storage.read_session().is_none());
    }
}
