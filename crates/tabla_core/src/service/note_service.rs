//! Note use-case service.
//!
//! # Responsibility
//! - Drive fetch/create/edit/delete round-trips against a `NoteBackend`.
//! - Apply the ownership guard before any mutating request.
//! - Keep exactly one surfaced message describing the last failure.
//!
//! # Invariants
//! - The store is mutated only after a successful backend response.
//! - A failed call leaves `notes` and `visible_notes` untouched.
//! - Every operation clears the previous message on entry.
//! - Nothing is retried.

use crate::backend::{BackendError, NoteBackend};
use crate::codec::encode;
use crate::logging::sanitize_message;
use crate::model::note::{Note, NoteId};
use crate::model::session::Session;
use crate::service::access::{check_mutation, AccessDenial};
use crate::store::{DraftField, NoteStore, StoreError, TaalFilter};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_LOGGED_ERROR_CHARS: usize = 160;

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// Remote note operation, used to phrase surfaced messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOperation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl NoteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn timeout_message(self) -> &'static str {
        match self {
            Self::Fetch => "Request timed out. Please try again later.",
            Self::Create => "Add request timed out. Please try again.",
            Self::Update => "Update request timed out. Please try again.",
            Self::Delete => "Delete request timed out. Please try again.",
        }
    }

    /// `(progressive, infinitive)` phrases, e.g. `("adding note", "add note")`.
    fn phrases(self) -> (&'static str, &'static str) {
        match self {
            Self::Fetch => ("fetching notes", "fetch notes"),
            Self::Create => ("adding note", "add note"),
            Self::Update => ("updating note", "update note"),
            Self::Delete => ("deleting note", "delete note"),
        }
    }
}

/// Service error for note use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteServiceError {
    /// Blocked locally; no request was sent.
    AccessDenied(AccessDenial),
    /// Local state precondition failed; no request was sent.
    Store(StoreError),
    /// The backend call failed.
    Backend {
        operation: NoteOperation,
        source: BackendError,
    },
}

impl NoteServiceError {
    /// Single human-readable message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::AccessDenied(denial) => denial.warning().to_string(),
            Self::Store(StoreError::NoteNotFound(_)) => "Note not found.".to_string(),
            Self::Store(StoreError::NotEditing) => "No note is being edited.".to_string(),
            Self::Store(err) => err.to_string(),
            Self::Backend { operation, source } => backend_message(*operation, source),
        }
    }
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessDenied(denial) => write!(f, "access denied: {denial}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Backend { operation, source } => {
                write!(f, "{} failed: {source}", operation.as_str())
            }
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AccessDenied(denial) => Some(denial),
            Self::Store(err) => Some(err),
            Self::Backend { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<AccessDenial> for NoteServiceError {
    fn from(value: AccessDenial) -> Self {
        Self::AccessDenied(value)
    }
}

fn backend_message(operation: NoteOperation, source: &BackendError) -> String {
    let (progressive, infinitive) = operation.phrases();
    match source {
        BackendError::Timeout => operation.timeout_message().to_string(),
        BackendError::Rejected { status, .. } => {
            format!("Error {progressive}: Failed to {infinitive} (HTTP {status})")
        }
        BackendError::Transport(_) => {
            format!("Error {progressive}: Could not reach the notes service")
        }
        BackendError::InvalidResponse(_) => {
            format!("Error {progressive}: Unexpected response from the notes service")
        }
    }
}

/// Note service facade over a backend implementation.
pub struct NoteService<B: NoteBackend> {
    backend: B,
    store: NoteStore,
    session: Option<Session>,
    message: Option<String>,
}

impl<B: NoteBackend> NoteService<B> {
    /// Creates a signed-out service with an empty store.
    pub fn new(backend: B) -> Self {
        Self::with_session(backend, None)
    }

    pub fn with_session(backend: B, session: Option<Session>) -> Self {
        Self {
            backend,
            store: NoteStore::new(),
            session,
            message: None,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Message describing the most recent failure, if the last action failed.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Installs `session` (or signs out) and reloads notes under it.
    ///
    /// Drafts of the previous session are dropped before the reload.
    pub fn switch_session(&mut self, session: Option<Session>) -> NoteServiceResult<usize> {
        info!(
            "event=session_switch module=service status=ok signed_in={}",
            session.is_some()
        );
        self.session = session;
        self.store.cancel_edit();
        self.store.reset_compose();
        self.refresh()
    }

    /// Fetches every visible note and replaces the store contents.
    ///
    /// Returns the number of notes loaded.
    pub fn refresh(&mut self) -> NoteServiceResult<usize> {
        self.message = None;
        match self.backend.list_notes(self.session.as_ref()) {
            Ok(wire_notes) => {
                let count = wire_notes.len();
                self.store.load(wire_notes);
                Ok(count)
            }
            Err(source) => Err(self.fail(NoteServiceError::Backend {
                operation: NoteOperation::Fetch,
                source,
            })),
        }
    }

    /// Selects a taal label, or every note for `"All"`.
    pub fn set_filter(&mut self, taal: &str) {
        self.store.set_filter(TaalFilter::parse(taal));
    }

    /// Puts an owned note under edit focus and returns its draft.
    ///
    /// Any other unsaved draft is discarded silently.
    pub fn begin_edit(&mut self, id: &NoteId) -> NoteServiceResult<Note> {
        self.message = None;
        if let Err(err) = self.guard(id) {
            return Err(self.fail(err));
        }
        if let Err(err) = self.store.begin_edit(id) {
            return Err(self.fail(err.into()));
        }
        self.store
            .edit_draft()
            .cloned()
            .ok_or(NoteServiceError::Store(StoreError::NotEditing))
    }

    /// Assigns one field of the active draft (edit draft, else compose draft).
    pub fn update_draft_field(&mut self, field: DraftField) -> NoteServiceResult<()> {
        self.message = None;
        match self.store.update_draft_field(field) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Leaves edit focus without contacting the backend.
    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    /// Sends `draft` as a new note and merges the stored result.
    pub fn commit_create(&mut self, draft: &Note) -> NoteServiceResult<Note> {
        self.message = None;
        let mut wire = encode(draft);
        wire.id = None;
        wire.date_modified = None;

        match self.backend.create_note(self.session.as_ref(), &wire) {
            Ok(created) => Ok(self.store.apply_created(created).clone()),
            Err(source) => Err(self.fail(NoteServiceError::Backend {
                operation: NoteOperation::Create,
                source,
            })),
        }
    }

    /// Sends the compose draft and resets it after success.
    pub fn commit_compose(&mut self) -> NoteServiceResult<Note> {
        let draft = self.store.compose_draft().clone();
        let created = self.commit_create(&draft)?;
        self.store.reset_compose();
        Ok(created)
    }

    /// Sends `draft` as the new value of note `id` and merges the result.
    ///
    /// On failure the stored note keeps its pre-edit value and edit focus is
    /// kept so the draft can be resubmitted.
    pub fn commit_edit(&mut self, id: &NoteId, draft: &Note) -> NoteServiceResult<Note> {
        self.message = None;
        if let Err(err) = self.guard(id) {
            return Err(self.fail(err));
        }

        let mut wire = encode(draft);
        wire.id = Some(id.clone());

        match self.backend.update_note(self.session.as_ref(), id, &wire) {
            Ok(updated) => Ok(self.store.apply_updated(id, updated).clone()),
            Err(source) => Err(self.fail(NoteServiceError::Backend {
                operation: NoteOperation::Update,
                source,
            })),
        }
    }

    /// Commits the draft currently under edit focus.
    pub fn save_edit(&mut self) -> NoteServiceResult<Note> {
        let Some((id, draft)) = self
            .store
            .editing_id()
            .cloned()
            .zip(self.store.edit_draft().cloned())
        else {
            self.message = None;
            return Err(self.fail(StoreError::NotEditing.into()));
        };
        self.commit_edit(&id, &draft)
    }

    /// Deletes note `id` and drops it locally once the backend confirms.
    ///
    /// Returns `false` without a request when the note is already gone.
    pub fn remove(&mut self, id: &NoteId) -> NoteServiceResult<bool> {
        self.message = None;
        let denial = match self.store.get(id) {
            None => {
                debug!("event=note_remove module=service status=skipped id={id} reason=absent");
                return Ok(false);
            }
            Some(note) => check_mutation(self.session.as_ref(), note).err(),
        };
        if let Some(denial) = denial {
            return Err(self.fail(denial.into()));
        }

        match self.backend.delete_note(self.session.as_ref(), id) {
            Ok(()) => Ok(self.store.apply_removed(id)),
            Err(source) => Err(self.fail(NoteServiceError::Backend {
                operation: NoteOperation::Delete,
                source,
            })),
        }
    }

    fn guard(&self, id: &NoteId) -> NoteServiceResult<()> {
        let note = self
            .store
            .get(id)
            .ok_or_else(|| StoreError::NoteNotFound(id.clone()))?;
        check_mutation(self.session.as_ref(), note)?;
        Ok(())
    }

    fn fail(&mut self, err: NoteServiceError) -> NoteServiceError {
        let operation = match &err {
            NoteServiceError::AccessDenied(_) => "guard",
            NoteServiceError::Store(_) => "store",
            NoteServiceError::Backend { operation, .. } => operation.as_str(),
        };
        warn!(
            "event=note_op module=service op={operation} status=error error={}",
            sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
        );
        self.message = Some(err.user_message());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::{backend_message, NoteOperation};
    use crate::backend::BackendError;

    #[test]
    fn timeouts_use_operation_specific_text() {
        assert_eq!(
            backend_message(NoteOperation::Fetch, &BackendError::Timeout),
            "Request timed out. Please try again later."
        );
        assert_eq!(
            backend_message(NoteOperation::Delete, &BackendError::Timeout),
            "Delete request timed out. Please try again."
        );
    }

    #[test]
    fn rejections_name_the_operation() {
        let rejected = BackendError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(
            backend_message(NoteOperation::Create, &rejected),
            "Error adding note: Failed to add note (HTTP 500)"
        );
        assert_eq!(
            backend_message(NoteOperation::Update, &rejected),
            "Error updating note: Failed to update note (HTTP 500)"
        );
    }
}
