//! Backend collaborator contracts.
//!
//! # Responsibility
//! - Define the request/response contract of the notes REST service.
//! - Classify every failed call into one `BackendError` variant.
//!
//! # Invariants
//! - One call per user action; implementations never retry.
//! - Each call is bounded in time; an elapsed bound is `BackendError::Timeout`.
//! - Note operations carry the session bearer token when one is supplied.
//!
//! # See also
//! - `crate::service` for the use-cases that drive these calls.

use crate::model::note::{NoteId, WireNote};
use crate::model::session::{Credentials, Session};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod http;

pub use http::HttpBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Failure of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The per-call time bound elapsed.
    Timeout,
    /// The service could not be reached (DNS, connect, TLS, I/O).
    Transport(String),
    /// The service answered with a non-success status.
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// A success response whose body did not have the expected shape.
    InvalidResponse(String),
}

impl BackendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Transport(details) => write!(f, "backend unreachable: {details}"),
            Self::Rejected {
                status,
                message: Some(message),
            } => write!(f, "backend rejected request ({status}): {message}"),
            Self::Rejected {
                status,
                message: None,
            } => write!(f, "backend rejected request ({status})"),
            Self::InvalidResponse(details) => write!(f, "unexpected backend response: {details}"),
        }
    }
}

impl Error for BackendError {}

/// Notes endpoints (`/notes`, `/notes/{id}`).
pub trait NoteBackend {
    /// `GET /notes`. Unauthenticated calls may only see public notes.
    fn list_notes(&self, auth: Option<&Session>) -> BackendResult<Vec<WireNote>>;
    /// `POST /notes`; returns the stored note with `id` and `dateModified`.
    fn create_note(&self, auth: Option<&Session>, note: &WireNote) -> BackendResult<WireNote>;
    /// `PUT /notes/{id}`; returns the stored note.
    fn update_note(
        &self,
        auth: Option<&Session>,
        id: &NoteId,
        note: &WireNote,
    ) -> BackendResult<WireNote>;
    /// `DELETE /notes/{id}`; success is signalled by status only.
    fn delete_note(&self, auth: Option<&Session>, id: &NoteId) -> BackendResult<()>;
}

/// Account endpoints (`/login`, `/register`).
///
/// Both return the session granted by the service.
pub trait AuthBackend {
    fn login(&self, credentials: &Credentials) -> BackendResult<Session>;
    fn register(&self, credentials: &Credentials) -> BackendResult<Session>;
}

impl<T: NoteBackend + ?Sized> NoteBackend for &T {
    fn list_notes(&self, auth: Option<&Session>) -> BackendResult<Vec<WireNote>> {
        (**self).list_notes(auth)
    }

    fn create_note(&self, auth: Option<&Session>, note: &WireNote) -> BackendResult<WireNote> {
        (**self).create_note(auth, note)
    }

    fn update_note(
        &self,
        auth: Option<&Session>,
        id: &NoteId,
        note: &WireNote,
    ) -> BackendResult<WireNote> {
        (**self).update_note(auth, id, note)
    }

    fn delete_note(&self, auth: Option<&Session>, id: &NoteId) -> BackendResult<()> {
        (**self).delete_note(auth, id)
    }
}

impl<T: AuthBackend + ?Sized> AuthBackend for &T {
    fn login(&self, credentials: &Credentials) -> BackendResult<Session> {
        (**self).login(credentials)
    }

    fn register(&self, credentials: &Credentials) -> BackendResult<Session> {
        (**self).register(credentials)
    }
}
