//! Core note model and client-side synchronization for tabla notes.
//! This crate is the single source of truth for note invariants.

pub mod backend;
pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod text;

pub use backend::{AuthBackend, BackendError, BackendResult, HttpBackend, NoteBackend};
pub use codec::{decode, encode};
pub use config::{ClientConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    CompositeContent, ContentLayout, Note, NoteContent, NoteId, OwnerId, RemoteId, Structure,
    WireNote,
};
pub use model::session::{Credentials, Session};
pub use repo::session_repo::{RepoError, RepoResult, SessionRepository, SqliteSessionRepository};
pub use service::access::{check_mutation, AccessDenial};
pub use service::auth_service::{AuthError, AuthMode, AuthService};
pub use service::note_service::{
    NoteOperation, NoteService, NoteServiceError, NoteServiceResult,
};
pub use store::{DraftField, EditFocus, NoteStore, StoreError, TaalFilter, ALL_TAALS};

/// Minimal health-check API for wiring probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
