//! Per-invocation context shared by every command.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::auth::LocalAuthenticator;
use crate::clock;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::session::Session;
use crate::storage::{self, Storage};

/// Global flags, carried into every command's options
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub home: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

impl Globals {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    pub fn storage(&self) -> Result<Storage> {
        let home = storage::resolve_home(self.home.as_deref())?;
        Ok(Storage::new(home))
    }

    pub fn today(&self) -> Result<NaiveDate> {
        clock::resolve_today(self.today.as_deref())
    }

    /// Storage, configuration and the authenticator configured for it
    pub fn authenticator(&self) -> Result<(Storage, Config, LocalAuthenticator)> {
        let storage = self.storage()?;
        let config = storage.load_config();
        let auth = LocalAuthenticator::new(storage.clone(), &config.auth);
        Ok((storage, config, auth))
    }

    /// Open the stored session, running the daily rollover
    pub fn open_session(&self) -> Result<Session> {
        let today = self.today()?;
        let (storage, config, auth) = self.authenticator()?;
        Session::open(storage, &auth, config, today)
    }
}

/// Resolve an optional `--date` against today
pub fn date_or_today(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match raw {
        Some(raw) => clock::parse_date(raw),
        None => Ok(today),
    }
}
