//! Authenticated session bound to a user's loaded state.
//!
//! Opening a session validates the stored credential, loads every per-user
//! document and runs the daily rollover. Callers mutate `state` and call
//! [`Session::save`] afterward.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Account, AuthResponse, Authenticator};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::profile::WeeklyGoals;
use crate::state::AppState;
use crate::storage::Storage;

/// Credential persisted in `session.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn from_response(response: &AuthResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: response.token.clone(),
            user_id: response.user_id.clone(),
            email: response.email.clone(),
            issued_at,
        }
    }
}

pub struct Session {
    storage: Storage,
    pub account: Account,
    pub config: Config,
    pub state: AppState,
    pub today: NaiveDate,
    /// Recurring tasks seeded into today when the session opened.
    pub seeded: usize,
}

impl Session {
    /// Open the session stored in the data home.
    pub fn open(
        storage: Storage,
        authenticator: &dyn Authenticator,
        config: Config,
        today: NaiveDate,
    ) -> Result<Self> {
        let record = storage.read_session().ok_or(Error::NotLoggedIn)?;
        let account = authenticator.validate(&record.token, Utc::now())?;

        let mut state = storage.load_state(&account.id, WeeklyGoals::from_config(&config.goals));
        let filled = state.profile.fill_identity(&account.name, &account.email);
        let seeded = state.apply_recurrence(today);
        if seeded > 0 {
            tracing::info!(seeded, %today, "seeded recurring tasks");
        }

        let session = Self {
            storage,
            account,
            config,
            state,
            today,
            seeded,
        };
        if seeded > 0 || filled {
            session.save()?;
        }
        Ok(session)
    }

    pub fn user_id(&self) -> &str {
        &self.account.id
    }

    pub fn save(&self) -> Result<()> {
        self.storage.save_state(&self.account.id, &self.state)
    }
}
