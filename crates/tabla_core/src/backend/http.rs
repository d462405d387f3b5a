//! Blocking HTTP implementation of the backend contracts.
//!
//! # Responsibility
//! - Map note and account operations onto the REST endpoints.
//! - Attach `Authorization: Bearer <token>` when a session is supplied.
//! - Translate transport and status failures into `BackendError`.
//!
//! # Invariants
//! - Every request is bounded by the client-wide timeout.
//! - Requests are single-shot; nothing is retried.
//! - Logs carry operation, status and duration only, never bodies or tokens.

use super::{AuthBackend, BackendError, BackendResult, NoteBackend};
use crate::config::ClientConfig;
use crate::logging::sanitize_message;
use crate::model::note::{NoteId, WireNote};
use crate::model::session::{Credentials, Session};
use log::{error, info, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};

const AUTH_FAILED_FALLBACK: &str = "Authentication failed";
const MAX_LOGGED_MESSAGE_CHARS: usize = 120;

/// REST client for one notes service deployment.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthBody {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl From<reqwest::Error> for BackendError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout
        } else if value.is_decode() {
            Self::InvalidResponse(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}

impl HttpBackend {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(base_url: Url, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuses an existing client (and its connection pool).
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> BackendResult<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path `segments` to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BackendError::Transport(format!(
                    "base url `{}` cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(
        &self,
        op: &'static str,
        request: RequestBuilder,
        auth: Option<&Session>,
    ) -> BackendResult<Response> {
        let request = match auth {
            Some(session) => request.bearer_auth(&session.token),
            None => request,
        };

        let started_at = Instant::now();
        let response = match request.send() {
            Ok(response) => response,
            Err(err) => {
                let err = BackendError::from(err);
                error!(
                    "event=backend_call module=backend op={op} status=error duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    error_code(&err)
                );
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(
                "event=backend_call module=backend op={op} status=ok http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = rejection_message(&body);
        warn!(
            "event=backend_call module=backend op={op} status=rejected http_status={} duration_ms={} message={}",
            status.as_u16(),
            started_at.elapsed().as_millis(),
            message
                .as_deref()
                .map_or_else(|| "none".to_string(), |text| sanitize_message(text, MAX_LOGGED_MESSAGE_CHARS))
        );
        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn read_json<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        response.json::<T>().map_err(BackendError::from)
    }

    fn authenticate(&self, op: &'static str, path: &str, credentials: &Credentials) -> BackendResult<Session> {
        let url = self.endpoint(&[path])?;
        let started_at = Instant::now();
        let response = self
            .client
            .post(url)
            .json(credentials)
            .send()
            .map_err(|err| {
                let err = BackendError::from(err);
                error!(
                    "event=backend_call module=backend op={op} status=error duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    error_code(&err)
                );
                err
            })?;

        let status = response.status().as_u16();
        let body = response.text()?;
        let result = session_from_auth_body(status, &body, &credentials.username);
        match &result {
            Ok(_) => info!(
                "event=backend_call module=backend op={op} status=ok http_status={status} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=backend_call module=backend op={op} status=rejected http_status={status} duration_ms={} error_code={}",
                started_at.elapsed().as_millis(),
                error_code(err)
            ),
        }
        result
    }
}

impl NoteBackend for HttpBackend {
    fn list_notes(&self, auth: Option<&Session>) -> BackendResult<Vec<WireNote>> {
        let url = self.endpoint(&["notes"])?;
        let response = self.send("list", self.client.get(url), auth)?;
        Self::read_json(response)
    }

    fn create_note(&self, auth: Option<&Session>, note: &WireNote) -> BackendResult<WireNote> {
        let url = self.endpoint(&["notes"])?;
        let response = self.send("create", self.client.post(url).json(note), auth)?;
        Self::read_json(response)
    }

    fn update_note(
        &self,
        auth: Option<&Session>,
        id: &NoteId,
        note: &WireNote,
    ) -> BackendResult<WireNote> {
        let id = id.to_string();
        let url = self.endpoint(&["notes", id.as_str()])?;
        let response = self.send("update", self.client.put(url).json(note), auth)?;
        Self::read_json(response)
    }

    fn delete_note(&self, auth: Option<&Session>, id: &NoteId) -> BackendResult<()> {
        let id = id.to_string();
        let url = self.endpoint(&["notes", id.as_str()])?;
        self.send("delete", self.client.delete(url), auth)?;
        Ok(())
    }
}

impl AuthBackend for HttpBackend {
    fn login(&self, credentials: &Credentials) -> BackendResult<Session> {
        self.authenticate("login", "login", credentials)
    }

    fn register(&self, credentials: &Credentials) -> BackendResult<Session> {
        self.authenticate("register", "register", credentials)
    }
}

/// Extracts `message`, else `error`, from a JSON failure body.
fn rejection_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    failure_text(parsed.message, parsed.error)
}

/// Service failure text; `message` wins over `error`, blanks are ignored.
fn failure_text(message: Option<String>, error: Option<String>) -> Option<String> {
    message
        .filter(|text| !text.trim().is_empty())
        .or(error.filter(|text| !text.trim().is_empty()))
}

/// Interprets a `/login` or `/register` response.
///
/// A token in the body grants a session only on a success status; anything
/// else is a rejection carrying the service's `message`/`error` text.
fn session_from_auth_body(status: u16, body: &str, username: &str) -> BackendResult<Session> {
    let is_success = (200..300).contains(&status);
    let parsed = match serde_json::from_str::<AuthBody>(body) {
        Ok(parsed) => parsed,
        Err(err) if is_success => return Err(BackendError::InvalidResponse(err.to_string())),
        Err(_) => AuthBody::default(),
    };

    match parsed.token {
        Some(token) if is_success && !token.is_empty() => Ok(Session::new(
            parsed.username.unwrap_or_else(|| username.to_string()),
            token,
        )),
        _ => Err(BackendError::Rejected {
            status,
            message: Some(
                failure_text(parsed.message, parsed.error)
                    .unwrap_or_else(|| AUTH_FAILED_FALLBACK.to_string()),
            ),
        }),
    }
}

fn error_code(err: &BackendError) -> &'static str {
    match err {
        BackendError::Timeout => "timeout",
        BackendError::Transport(_) => "transport",
        BackendError::Rejected { .. } => "rejected",
        BackendError::InvalidResponse(_) => "invalid_response",
    }
}

#[cfg(test)]
mod tests {
    use super::{rejection_message, session_from_auth_body, HttpBackend};
    use crate::backend::BackendError;
    use reqwest::Url;
    use std::time::Duration;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_joins_segments_under_base_path() {
        let backend = backend("https://notes.example.com/api/");
        assert_eq!(
            backend.endpoint(&["notes", "42"]).unwrap().as_str(),
            "https://notes.example.com/api/notes/42"
        );
    }

    #[test]
    fn endpoint_percent_encodes_text_ids() {
        let backend = backend("http://127.0.0.1:5000");
        assert_eq!(
            backend.endpoint(&["notes", "a/b c"]).unwrap().as_str(),
            "http://127.0.0.1:5000/notes/a%2Fb%20c"
        );
    }

    #[test]
    fn rejection_message_prefers_message_then_error() {
        assert_eq!(
            rejection_message(r#"{"error":"Note not found"}"#).as_deref(),
            Some("Note not found")
        );
        assert_eq!(
            rejection_message(r#"{"message":"nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(
            rejection_message(r#"{"error":"Forbidden","message":"Not your note"}"#).as_deref(),
            Some("Not your note")
        );
        assert_eq!(
            rejection_message(r#"{"error":"Forbidden","message":" "}"#).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(rejection_message("<html>502</html>"), None);
    }

    #[test]
    fn auth_body_with_token_grants_session() {
        let session =
            session_from_auth_body(201, r#"{"token":"abc","username":"zakir"}"#, "typed").unwrap();
        assert_eq!(session.username, "zakir");
        assert_eq!(session.token, "abc");

        let session = session_from_auth_body(200, r#"{"token":"abc"}"#, "typed").unwrap();
        assert_eq!(session.username, "typed");
    }

    #[test]
    fn auth_failure_surfaces_service_text_or_fallback() {
        let err =
            session_from_auth_body(401, r#"{"error":"Invalid credentials"}"#, "u").unwrap_err();
        assert_eq!(
            err,
            BackendError::Rejected {
                status: 401,
                message: Some("Invalid credentials".to_string()),
            }
        );

        let err = session_from_auth_body(
            401,
            r#"{"error":"Unauthorized","message":"Invalid credentials"}"#,
            "u",
        )
        .unwrap_err();
        assert_eq!(
            err,
            BackendError::Rejected {
                status: 401,
                message: Some("Invalid credentials".to_string()),
            }
        );

        let err = session_from_auth_body(500, "Internal Server Error", "u").unwrap_err();
        assert_eq!(
            err,
            BackendError::Rejected {
                status: 500,
                message: Some("Authentication failed".to_string()),
            }
        );
    }

    #[test]
    fn auth_success_without_json_is_invalid_response() {
        let err = session_from_auth_body(200, "ok", "u").unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}
