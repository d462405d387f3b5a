//! In-memory note collection with derived filtered views.
//!
//! # Responsibility
//! - Hold the canonical collection, the taal filter and the edit focus.
//! - Apply confirmed backend results to local state.
//!
//! # Invariants
//! - `notes` is ordered most-recently-created-or-edited first.
//! - At most one note is under edit focus.
//! - The store performs no I/O; every mutation is applied after success.

use crate::model::note::{NoteId, Structure};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod draft;
mod filter;
mod note_store;

pub use draft::{apply_draft_field, DraftField, EditFocus};
pub use filter::{TaalFilter, ALL_TAALS};
pub use note_store::NoteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Local state errors raised before any backend round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No note with this id is held by the store.
    NoteNotFound(NoteId),
    /// The draft field does not exist for the draft's content layout.
    FieldNotApplicable {
        field: &'static str,
        structure: Structure,
    },
    /// An operation that needs edit focus ran while idle.
    NotEditing,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::FieldNotApplicable { field, structure } => write!(
                f,
                "field `{field}` does not apply to structure `{structure}`"
            ),
            Self::NotEditing => write!(f, "no note is being edited"),
        }
    }
}

impl Error for StoreError {}
