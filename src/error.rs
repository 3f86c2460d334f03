//! Error types for habitual
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid dates, rejected input)
//! - 3: Authentication required (no session, expired token, bad credentials)
//! - 4: Operation failed (I/O, serialization, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the habitual CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_REQUIRED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for habitual operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Please provide {0}")]
    MissingFields(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    // Authentication (exit code 3)
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidDate(_)
            | Error::MissingFields(_)
            | Error::EmailTaken(_)
            | Error::InvalidImport(_) => exit_codes::USER_ERROR,

            // Authentication
            Error::NotLoggedIn | Error::SessionExpired | Error::InvalidCredentials => {
                exit_codes::AUTH_REQUIRED
            }

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// HTTP status the signup/login contract assigns to this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::MissingFields(_)
            | Error::EmailTaken(_)
            | Error::InvalidArgument(_)
            | Error::InvalidDate(_)
            | Error::InvalidImport(_) => 400,
            Error::NotLoggedIn | Error::SessionExpired | Error::InvalidCredentials => 401,
            _ => 500,
        }
    }

    /// Machine-readable band name for the exit code.
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            exit_codes::AUTH_REQUIRED => "auth_required",
            _ => "operation_failed",
        }
    }

    /// Commands that usually get the user past this error.
    pub fn next_steps(&self) -> Vec<String> {
        match self {
            Error::NotLoggedIn | Error::SessionExpired => {
                vec!["habitual login --email <email> --password <password>".to_string()]
            }
            Error::InvalidCredentials => vec![
                "check the email and password, or create an account with habitual signup"
                    .to_string(),
            ],
            Error::EmailTaken(email) => {
                vec![format!("habitual login --email {email} --password <password>")]
            }
            Error::InvalidImport(_) => {
                vec!["habitual export json --output backup.json".to_string()]
            }
            Error::InvalidConfig(_) => vec!["fix config.toml then retry".to_string()],
            Error::LockFailed(_) => {
                vec!["retry once the other habitual process finishes".to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Structured details attached to JSON error envelopes.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::MissingFields(_)
            | Error::EmailTaken(_)
            | Error::InvalidCredentials
            | Error::SessionExpired
            | Error::NotLoggedIn => Some(serde_json::json!({ "http_status": self.http_status() })),
            Error::LockFailed(path) => Some(serde_json::json!({ "path": path })),
            _ => None,
        }
    }
}

/// Result type alias for habitual operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
