//! habitual signup/login/logout/whoami
//!
//! Talks to the authentication collaborator and keeps `session.json` in step.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{AuthResponse, Authenticator, LoginRequest, SignupRequest};
use crate::cli::context::Globals;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::session::SessionRecord;

/// Options for `habitual signup`
pub struct SignupOptions {
    pub name: String,
    pub email: String,
    pub password: String,
    pub globals: Globals,
}

/// Options for `habitual login`
pub struct LoginOptions {
    pub email: String,
    pub password: String,
    pub globals: Globals,
}

#[derive(Serialize)]
struct AuthReport {
    user_id: String,
    name: String,
    email: String,
    expires_at: DateTime<Utc>,
}

impl From<&AuthResponse> for AuthReport {
    fn from(response: &AuthResponse) -> Self {
        Self {
            user_id: response.user_id.clone(),
            name: response.name.clone(),
            email: response.email.clone(),
            expires_at: response.expires_at,
        }
    }
}

#[derive(Serialize)]
struct LogoutReport {
    logged_out: bool,
}

#[derive(Serialize)]
struct WhoamiReport {
    user_id: String,
    name: String,
    email: String,
    today: String,
    seeded_today: usize,
}

pub fn run_signup(options: SignupOptions) -> Result<()> {
    let (storage, _config, auth) = options.globals.authenticator()?;
    let response = auth.signup(SignupRequest {
        name: options.name,
        email: options.email,
        password: options.password,
    })?;
    storage.write_session(&SessionRecord::from_response(&response, Utc::now()))?;

    let mut human = HumanOutput::new(format!("habitual signup: welcome, {}", response.name));
    human.push_summary("email", response.email.clone());
    human.push_summary("user id", response.user_id.clone());
    human.push_next_step("habitual task add <label> --recurrence daily");

    emit_success(
        options.globals.output(),
        "signup",
        &AuthReport::from(&response),
        Some(&human),
    )
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let (storage, _config, auth) = options.globals.authenticator()?;
    let response = auth.login(LoginRequest {
        email: options.email,
        password: options.password,
    })?;
    storage.write_session(&SessionRecord::from_response(&response, Utc::now()))?;

    let mut human = HumanOutput::new(format!("habitual login: {}", response.email));
    human.push_summary("name", response.name.clone());
    human.push_summary(
        "session expires",
        response.expires_at.format("%Y-%m-%d").to_string(),
    );
    human.push_next_step("habitual stats");

    emit_success(
        options.globals.output(),
        "login",
        &AuthReport::from(&response),
        Some(&human),
    )
}

pub fn run_logout(globals: Globals) -> Result<()> {
    let (storage, _config, auth) = globals.authenticator()?;
    if let Some(record) = storage.read_session() {
        auth.revoke(&record.token)?;
    }
    let logged_out = storage.clear_session()?;

    let mut human = HumanOutput::new(if logged_out {
        "habitual logout: session cleared"
    } else {
        "habitual logout: no active session"
    });
    if !logged_out {
        human.push_warning("nothing to log out of");
    }

    emit_success(
        globals.output(),
        "logout",
        &LogoutReport { logged_out },
        Some(&human),
    )
}

pub fn run_whoami(globals: Globals) -> Result<()> {
    let session = globals.open_session()?;
    let report = WhoamiReport {
        user_id: session.account.id.clone(),
        name: session.account.name.clone(),
        email: session.account.email.clone(),
        today: crate::clock::date_key(session.today),
        seeded_today: session.seeded,
    };

    let mut human = HumanOutput::new(format!("habitual whoami: {}", report.name));
    human.push_summary("email", report.email.clone());
    human.push_summary("user id", report.user_id.clone());
    human.push_summary("today", report.today.clone());
    if report.seeded_today > 0 {
        human.push_detail(format!(
            "{} recurring task(s) added to today",
            report.seeded_today
        ));
    }

    emit_success(globals.output(), "whoami", &report, Some(&human))
}
