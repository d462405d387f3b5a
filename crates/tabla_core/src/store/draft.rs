//! Edit focus and draft field updates.

use super::{StoreError, StoreResult};
use crate::model::note::{Note, NoteContent, NoteId, Structure};

/// Edit focus state machine.
///
/// `Idle -> Editing` on `begin_edit`; `Editing -> Idle` on a successful
/// commit or `cancel_edit`; `Editing(x) -> Editing(y)` on `begin_edit(y)`,
/// silently discarding the unsaved draft of `x`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditFocus {
    #[default]
    Idle,
    Editing { id: NoteId, draft: Note },
}

impl EditFocus {
    pub fn editing_id(&self) -> Option<&NoteId> {
        match self {
            Self::Idle => None,
            Self::Editing { id, .. } => Some(id),
        }
    }

    pub fn draft(&self) -> Option<&Note> {
        match self {
            Self::Idle => None,
            Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }
}

/// One draft field assignment.
///
/// `Bals` carries the whole new ordered sequence; appends, deletes and
/// in-place edits of single entries are expressed by rebuilding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Title(String),
    Taal(String),
    Structure(Structure),
    Content(String),
    Main(String),
    Tehai(String),
    Bals(Vec<String>),
}

impl DraftField {
    /// Wire-level field name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Taal(_) => "taal",
            Self::Structure(_) => "structure",
            Self::Content(_) => "content",
            Self::Main(_) => "main",
            Self::Tehai(_) => "tehai",
            Self::Bals(_) => "bals",
        }
    }
}

/// Assigns one field on `draft` without validating its value.
///
/// # Errors
/// - `FieldNotApplicable` when a Simple-only field targets a Composite draft
///   or a Composite-only field targets a Simple draft.
pub fn apply_draft_field(draft: &mut Note, field: DraftField) -> StoreResult<()> {
    match field {
        DraftField::Title(value) => draft.title = value,
        DraftField::Taal(value) => draft.taal = value,
        DraftField::Structure(value) => draft.set_structure(value),
        content_field => assign_content_field(&mut draft.content, content_field).map_err(
            |field| StoreError::FieldNotApplicable {
                field,
                structure: draft.structure.clone(),
            },
        )?,
    }
    Ok(())
}

fn assign_content_field(content: &mut NoteContent, field: DraftField) -> Result<(), &'static str> {
    let name = field.name();
    match (field, content) {
        (DraftField::Content(value), NoteContent::Simple(text)) => *text = value,
        (DraftField::Main(value), NoteContent::Composite(composite)) => composite.main = value,
        (DraftField::Tehai(value), NoteContent::Composite(composite)) => composite.tehai = value,
        (DraftField::Bals(value), NoteContent::Composite(composite)) => composite.bals = value,
        _ => return Err(name),
    }
    Ok(())
}
