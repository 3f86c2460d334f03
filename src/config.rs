//! Configuration loading and management
//!
//! Handles parsing of `config.toml` in the data home.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// File name of the configuration document inside the data home
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Statistics configuration
    #[serde(default)]
    pub stats: StatsConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Weekly goal defaults for a fresh user
    #[serde(default)]
    pub goals: GoalsConfig,
}

/// Statistics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Number of Sunday-aligned weeks scanned for perfect weeks
    #[serde(default = "default_perfect_week_scan")]
    pub perfect_week_scan: u32,

    /// Count weeks without any data as perfect
    #[serde(default = "default_true")]
    pub lenient_empty_weeks: bool,
}

fn default_perfect_week_scan() -> u32 {
    crate::stats::DEFAULT_PERFECT_WEEK_SCAN
}

fn default_true() -> bool {
    true
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            perfect_week_scan: default_perfect_week_scan(),
            lenient_empty_weeks: true,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Days before an issued token expires
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: u32,

    /// PBKDF2 rounds applied to new passwords
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
}

fn default_token_ttl_days() -> u32 {
    7
}

fn default_password_iterations() -> u32 {
    crate::auth::DEFAULT_PASSWORD_ITERATIONS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_days: default_token_ttl_days(),
            password_iterations: default_password_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_target_completion_percent")]
    pub target_completion_percent: u32,

    #[serde(default = "default_tasks_per_day")]
    pub tasks_per_day: u32,

    #[serde(default = "default_streak_target_days")]
    pub streak_target_days: u32,
}

fn default_target_completion_percent() -> u32 {
    80
}

fn default_tasks_per_day() -> u32 {
    5
}

fn default_streak_target_days() -> u32 {
    7
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            target_completion_percent: default_target_completion_percent(),
            tasks_per_day: default_tasks_per_day(),
            streak_target_days: default_streak_target_days(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data home, or return defaults
    ///
    /// An unreadable or invalid file is logged and ignored.
    pub fn load_from_home(home: &Path) -> Self {
        let config_path = home.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring config file");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        self.stats.validate()?;
        self.auth.validate()?;
        self.goals.validate()?;
        Ok(())
    }
}

impl StatsConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=52).contains(&self.perfect_week_scan) {
            return Err(Error::InvalidConfig(
                "stats.perfect_week_scan must be between 1 and 52".to_string(),
            ));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn validate(&self) -> Result<()> {
        if self.token_ttl_days == 0 {
            return Err(Error::InvalidConfig(
                "auth.token_ttl_days must be >= 1".to_string(),
            ));
        }
        if self.password_iterations < crate::auth::MIN_PASSWORD_ITERATIONS {
            return Err(Error::InvalidConfig(format!(
                "auth.password_iterations must be >= {}",
                crate::auth::MIN_PASSWORD_ITERATIONS
            )));
        }
        Ok(())
    }
}

impl GoalsConfig {
    fn validate(&self) -> Result<()> {
        if self.target_completion_percent > 100 {
            return Err(Error::InvalidConfig(
                "goals.target_completion_percent must be <= 100".to_string(),
            ));
        }
        if self.tasks_per_day == 0 {
            return Err(Error::InvalidConfig(
                "goals.tasks_per_day must be >= 1".to_string(),
            ));
        }
        if self.streak_target_days == 0 {
            return Err(Error::InvalidConfig(
                "goals.streak_target_days must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
