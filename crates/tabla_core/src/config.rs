//! Client configuration loaded from the environment.
//!
//! # Responsibility
//! - Resolve backend URL, request time bound and local storage paths.
//! - Load a `.env` file when present before reading variables.
//!
//! # Invariants
//! - `request_timeout` is always positive.
//! - `api_base_url` is an absolute `http`/`https` URL.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "TABLA_API_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TABLA_REQUEST_TIMEOUT_SECS";
pub const ENV_SESSION_DB: &str = "TABLA_SESSION_DB";
pub const ENV_LOG_DIR: &str = "TABLA_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "TABLA_LOG_LEVEL";

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 40;
const DEFAULT_SESSION_DB_FILE_NAME: &str = "tabla_notes.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { key, reason } => write!(f, "invalid `{key}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    /// Upper bound on each backend call.
    pub request_timeout: Duration,
    /// SQLite file holding the persisted session.
    pub session_db_path: PathBuf,
    /// Absolute directory for rolling logs; file logging is off when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl ClientConfig {
    /// Reads configuration from process env, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = parse_base_url(
            read(ENV_API_URL)
                .as_deref()
                .unwrap_or(DEFAULT_API_URL),
        )?;

        let request_timeout = match read(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let session_db_path = read(ENV_SESSION_DB)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DB_FILE_NAME));

        Ok(Self {
            api_base_url,
            request_timeout,
            session_db_path,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|err| ConfigError::Invalid {
        key: ENV_API_URL,
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            key: ENV_API_URL,
            reason: format!("unsupported scheme `{other}`; expected http|https"),
        }),
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            key: ENV_REQUEST_TIMEOUT_SECS,
            reason: format!("expected a positive number of seconds, got `{raw}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, ConfigError, ENV_API_URL, ENV_REQUEST_TIMEOUT_SECS};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.request_timeout, Duration::from_secs(40));
        assert_eq!(config.session_db_path, PathBuf::from("tabla_notes.sqlite3"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn trailing_slash_and_blank_values_are_normalized() {
        let config = config_from(&[
            (ENV_API_URL, "https://notes.example.com/api/"),
            (ENV_REQUEST_TIMEOUT_SECS, "  "),
        ])
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://notes.example.com/api");
        assert_eq!(config.request_timeout, Duration::from_secs(40));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = config_from(&[(ENV_REQUEST_TIMEOUT_SECS, "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: ENV_REQUEST_TIMEOUT_SECS,
                ..
            }
        ));

        let err = config_from(&[(ENV_API_URL, "ftp://files.example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_API_URL, .. }));
    }
}
