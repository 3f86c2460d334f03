//! Authentication collaborator.
//!
//! `Authenticator` is the signup/login/validate contract the rest of the crate
//! talks to. `LocalAuthenticator` honors it with an account registry stored in
//! the data home. Tokens are opaque strings with an expiry; nothing decodes
//! them. Passwords are stretched with PBKDF2-HMAC-SHA256 and each account
//! records the round count it was hashed with.

use chrono::{DateTime, Duration, Utc};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ulid::Ulid;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::storage::Storage;

pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 200_000;
pub const MIN_PASSWORD_ITERATIONS: u32 = 1_000;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    password_hash: String,
    salt: String,
    #[serde(default = "default_iterations")]
    iterations: u32,
    pub created_at: DateTime<Utc>,
}

fn default_iterations() -> u32 {
    DEFAULT_PASSWORD_ITERATIONS
}

impl Account {
    fn new(
        name: &str,
        email: &str,
        password: &str,
        iterations: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        let salt = Uuid::new_v4().to_string();
        Self {
            id: Ulid::new().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password_hash: hash_password(&salt, password, iterations),
            salt,
            iterations,
            created_at,
        }
    }

    fn verify_password(&self, password: &str) -> bool {
        let candidate = hash_password(&self.salt, password, self.iterations);
        constant_time_eq(candidate.as_bytes(), self.password_hash.as_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Persisted accounts and their outstanding tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRegistry {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    tokens: Vec<IssuedToken>,
}

impl AccountRegistry {
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn find(&self, user_id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == user_id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Account> {
        let wanted = normalize_email(email);
        self.accounts
            .iter()
            .find(|account| normalize_email(&account.email) == wanted)
    }

    pub fn token(&self, token: &str) -> Option<&IssuedToken> {
        self.tokens.iter().find(|issued| issued.token == token)
    }

    /// Drop expired tokens. Returns how many were removed.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|issued| !issued.is_expired(now));
        before - self.tokens.len()
    }

    fn issue(&mut self, user_id: &str, now: DateTime<Utc>, ttl: Duration) -> IssuedToken {
        self.prune_expired(now);
        let issued = IssuedToken {
            token: opaque_token(user_id),
            user_id: user_id.to_string(),
            expires_at: now + ttl,
        };
        self.tokens.push(issued.clone());
        issued
    }

    fn revoke(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|issued| issued.token != token);
        before != self.tokens.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful signup or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthResponse {
    fn new(account: &Account, issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            user_id: account.id.clone(),
            email: account.email.clone(),
            name: account.name.clone(),
            expires_at: issued.expires_at,
        }
    }
}

pub trait Authenticator {
    /// Register an account and issue a token.
    fn signup(&self, request: SignupRequest) -> Result<AuthResponse>;

    /// Exchange credentials for a token.
    fn login(&self, request: LoginRequest) -> Result<AuthResponse>;

    /// Resolve a token to its account.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Account>;

    /// Invalidate a token. Returns whether it was known.
    fn revoke(&self, token: &str) -> Result<bool>;
}

/// File-backed authenticator over `accounts.json`.
#[derive(Debug, Clone)]
pub struct LocalAuthenticator {
    storage: Storage,
    token_ttl: Duration,
    password_iterations: u32,
}

impl LocalAuthenticator {
    pub fn new(storage: Storage, config: &AuthConfig) -> Self {
        Self {
            storage,
            token_ttl: Duration::days(i64::from(config.token_ttl_days)),
            password_iterations: config.password_iterations,
        }
    }
}

impl Authenticator for LocalAuthenticator {
    fn signup(&self, request: SignupRequest) -> Result<AuthResponse> {
        if is_blank(&request.name) || is_blank(&request.email) || is_blank(&request.password) {
            return Err(Error::MissingFields("name, email and password".to_string()));
        }

        let now = Utc::now();
        let ttl = self.token_ttl;
        let iterations = self.password_iterations;
        let response = self.storage.update_accounts(|registry| {
            if registry.find_by_email(&request.email).is_some() {
                return Err(Error::EmailTaken(request.email.trim().to_string()));
            }
            let account = Account::new(
                &request.name,
                &request.email,
                &request.password,
                iterations,
                now,
            );
            let issued = registry.issue(&account.id, now, ttl);
            let response = AuthResponse::new(&account, issued);
            registry.accounts.push(account);
            Ok(response)
        })?;

        tracing::info!(user_id = %response.user_id, "account created");
        Ok(response)
    }

    fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        if is_blank(&request.email) || is_blank(&request.password) {
            return Err(Error::MissingFields("email and password".to_string()));
        }

        let now = Utc::now();
        let ttl = self.token_ttl;
        let response = self.storage.update_accounts(|registry| {
            let account = registry
                .find_by_email(&request.email)
                .filter(|account| account.verify_password(&request.password))
                .cloned()
                .ok_or(Error::InvalidCredentials)?;
            let issued = registry.issue(&account.id, now, ttl);
            Ok(AuthResponse::new(&account, issued))
        })?;

        tracing::info!(user_id = %response.user_id, "logged in");
        Ok(response)
    }

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Account> {
        let registry = self.storage.load_accounts()?;
        let issued = registry.token(token).ok_or(Error::InvalidCredentials)?;
        if issued.is_expired(now) {
            return Err(Error::SessionExpired);
        }
        registry
            .find(&issued.user_id)
            .cloned()
            .ok_or(Error::InvalidCredentials)
    }

    fn revoke(&self, token: &str) -> Result<bool> {
        self.storage.update_accounts(|registry| Ok(registry.revoke(token)))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str, iterations: u32) -> String {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    hex::encode(key)
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn opaque_token(user_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(user_id.as_bytes());
    hex::encode(hasher.finalize())
}
