//! Client-side mutation guard.
//!
//! This only hides actions that the backend would refuse anyway; the
//! backend stays the authority on ownership.

use crate::model::note::{Note, NoteId};
use crate::model::session::Session;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a mutation was blocked before any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDenial {
    /// No authenticated session is held.
    NoSession,
    /// The target note has no owner and is read-only for every client.
    ReadOnly { id: Option<NoteId> },
}

impl AccessDenial {
    /// Inline warning shown next to the blocked action.
    pub fn warning(&self) -> &'static str {
        match self {
            Self::NoSession => "Sign in to edit or delete notes.",
            Self::ReadOnly { .. } => "This note is read-only.",
        }
    }
}

impl Display for AccessDenial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSession => write!(f, "no authenticated session"),
            Self::ReadOnly { id: Some(id) } => write!(f, "note {id} has no owner"),
            Self::ReadOnly { id: None } => write!(f, "note has no owner"),
        }
    }
}

impl Error for AccessDenial {}

/// Allows editing or deleting `note` only with a session and an owner.
pub fn check_mutation(session: Option<&Session>, note: &Note) -> Result<(), AccessDenial> {
    if session.is_none() {
        return Err(AccessDenial::NoSession);
    }
    if note.is_read_only() {
        return Err(AccessDenial::ReadOnly {
            id: note.id.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_mutation, AccessDenial};
    use crate::model::note::{Note, NoteId, Structure};
    use crate::model::session::Session;

    fn owned_note() -> Note {
        let mut note = Note::draft("A", "Teentaal", Structure::Theka);
        note.id = Some(NoteId::from(1));
        note.owner = Some(NoteId::from(9));
        note
    }

    #[test]
    fn session_is_checked_before_ownership() {
        let mut note = owned_note();
        note.owner = None;
        assert_eq!(check_mutation(None, &note), Err(AccessDenial::NoSession));
    }

    #[test]
    fn ownerless_note_is_read_only() {
        let session = Session::new("u", "t");
        let mut note = owned_note();
        note.owner = None;
        assert_eq!(
            check_mutation(Some(&session), &note),
            Err(AccessDenial::ReadOnly {
                id: Some(NoteId::from(1))
            })
        );
        assert_eq!(check_mutation(Some(&session), &owned_note()), Ok(()));
    }
}
