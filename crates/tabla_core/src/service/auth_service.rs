//! Account use-case service.
//!
//! # Responsibility
//! - Log in or register against an `AuthBackend`.
//! - Persist the granted session so it survives restarts.
//!
//! # Invariants
//! - Blank usernames or passwords never reach the backend.
//! - A session is persisted only after the backend grants it.

use crate::backend::{AuthBackend, BackendError};
use crate::model::session::{Credentials, Session};
use crate::repo::session_repo::{RepoError, SessionRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password required";
const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AuthError {
    /// Username or password is blank; no request was sent.
    MissingCredentials,
    Backend(BackendError),
    /// The granted session could not be stored or read locally.
    Repo(RepoError),
}

impl AuthError {
    /// Single human-readable message for the auth form.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials => MISSING_CREDENTIALS_MESSAGE.to_string(),
            Self::Backend(BackendError::Timeout) => {
                "Request timed out. Please try again later.".to_string()
            }
            Self::Backend(BackendError::Rejected {
                message: Some(message),
                ..
            }) => message.clone(),
            Self::Backend(_) => AUTH_FAILED_MESSAGE.to_string(),
            Self::Repo(_) => "Could not remember the session on this device".to_string(),
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "username and password are required"),
            Self::Backend(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingCredentials => None,
            Self::Backend(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<BackendError> for AuthError {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Which account endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

/// Account service facade over a backend and a session repository.
pub struct AuthService<A: AuthBackend, R: SessionRepository> {
    backend: A,
    sessions: R,
}

impl<A: AuthBackend, R: SessionRepository> AuthService<A, R> {
    pub fn new(backend: A, sessions: R) -> Self {
        Self { backend, sessions }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.authenticate(AuthMode::Login, Credentials::new(username, password))
    }

    pub fn register(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        self.authenticate(AuthMode::Register, Credentials::new(username, password))
    }

    /// Calls the endpoint for `mode` and persists the granted session.
    pub fn authenticate(&self, mode: AuthMode, credentials: Credentials) -> Result<Session, AuthError> {
        if !credentials.is_complete() {
            warn!(
                "event=auth module=service op={} status=error error_code=missing_credentials",
                mode.as_str()
            );
            return Err(AuthError::MissingCredentials);
        }

        let granted = match mode {
            AuthMode::Login => self.backend.login(&credentials),
            AuthMode::Register => self.backend.register(&credentials),
        };
        let session = granted.map_err(|err| {
            warn!(
                "event=auth module=service op={} status=error http_status={}",
                mode.as_str(),
                err.status()
                    .map_or_else(|| "none".to_string(), |status| status.to_string())
            );
            AuthError::from(err)
        })?;

        self.sessions.save(&session)?;
        info!("event=auth module=service op={} status=ok", mode.as_str());
        Ok(session)
    }

    /// Forgets the stored session.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        info!("event=auth module=service op=logout status=ok");
        Ok(())
    }

    /// Returns the session stored by a previous login, if any.
    pub fn restore(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.load()?)
    }
}
