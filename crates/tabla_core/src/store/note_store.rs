//! Note store state and confirmed-result merging.

use super::draft::{apply_draft_field, DraftField, EditFocus};
use super::filter::TaalFilter;
use super::{StoreError, StoreResult};
use crate::codec::decode;
use crate::model::note::{Note, NoteId, WireNote};
use log::{debug, info};

/// Canonical note collection plus derived views.
///
/// `visible_notes` is maintained incrementally, mirroring what the list
/// shows: it is recomputed from `notes` on `load` and `set_filter`, and
/// patched in place by the other operations.
#[derive(Debug, Clone)]
pub struct NoteStore {
    notes: Vec<Note>,
    visible: Vec<Note>,
    taals: Vec<String>,
    filter: TaalFilter,
    focus: EditFocus,
    compose: Note,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            visible: Vec::new(),
            taals: Vec::new(),
            filter: TaalFilter::All,
            focus: EditFocus::Idle,
            compose: Note::blank(),
        }
    }

    /// Full collection, most recent first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes shown under the current filter.
    pub fn visible_notes(&self) -> &[Note] {
        &self.visible
    }

    /// Distinct taal labels in order of first appearance.
    ///
    /// The empty label is never listed, on load or on later merges, even
    /// though untagged notes are observed; "All" already covers them.
    pub fn taals(&self) -> &[String] {
        &self.taals
    }

    pub fn filter(&self) -> &TaalFilter {
        &self.filter
    }

    pub fn focus(&self) -> &EditFocus {
        &self.focus
    }

    pub fn editing_id(&self) -> Option<&NoteId> {
        self.focus.editing_id()
    }

    pub fn edit_draft(&self) -> Option<&Note> {
        self.focus.draft()
    }

    /// Draft of the new-note form.
    pub fn compose_draft(&self) -> &Note {
        &self.compose
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.has_id(id))
    }

    /// Replaces the whole collection with decoded `wire_notes`.
    ///
    /// Known taals and `visible_notes` are rebuilt from scratch so no state
    /// from a previous fetch (or previous session) survives. Edit focus is
    /// left untouched.
    pub fn load(&mut self, wire_notes: Vec<WireNote>) {
        self.notes = wire_notes.into_iter().map(decode).collect();
        let observed: Vec<String> = self.notes.iter().map(|note| note.taal.clone()).collect();
        self.taals.clear();
        for taal in observed {
            self.remember_taal(taal);
        }
        self.recompute_visible();
        info!(
            "event=store_load module=store status=ok notes={} taals={} visible={}",
            self.notes.len(),
            self.taals.len(),
            self.visible.len()
        );
    }

    /// Selects a filter and recomputes `visible_notes` from `notes`.
    pub fn set_filter(&mut self, filter: TaalFilter) {
        self.filter = filter;
        self.recompute_visible();
        debug!(
            "event=store_filter module=store status=ok visible={}",
            self.visible.len()
        );
    }

    /// Puts `id` under edit focus and returns its draft.
    ///
    /// Any other in-progress draft is discarded without notice. The note
    /// moves to the front of `notes` and of `visible_notes`, where it is
    /// inserted even if the current filter would hide it.
    ///
    /// # Errors
    /// - `NoteNotFound` when `id` is not held by the store.
    pub fn begin_edit(&mut self, id: &NoteId) -> StoreResult<&Note> {
        let position = self
            .notes
            .iter()
            .position(|note| note.has_id(id))
            .ok_or_else(|| StoreError::NoteNotFound(id.clone()))?;

        if let Some(previous) = self.focus.editing_id() {
            if previous != id {
                debug!(
                    "event=edit_focus module=store status=discarded previous_id={previous} id={id}"
                );
            }
        }

        let note = self.notes.remove(position);
        self.notes.insert(0, note.clone());
        self.visible.retain(|visible| !visible.has_id(id));
        self.visible.insert(0, note.clone());

        self.focus = EditFocus::Editing {
            id: id.clone(),
            draft: note,
        };
        debug!("event=edit_focus module=store status=editing id={id}");

        self.focus.draft().ok_or(StoreError::NotEditing)
    }

    /// Assigns one field on the active draft.
    ///
    /// Targets the edit draft while editing, otherwise the compose draft.
    pub fn update_draft_field(&mut self, field: DraftField) -> StoreResult<()> {
        match &mut self.focus {
            EditFocus::Editing { draft, .. } => apply_draft_field(draft, field),
            EditFocus::Idle => apply_draft_field(&mut self.compose, field),
        }
    }

    /// Drops edit focus and its draft.
    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.focus.editing_id() {
            debug!("event=edit_focus module=store status=cancelled id={id}");
        }
        self.focus = EditFocus::Idle;
    }

    /// Replaces the compose draft.
    pub fn set_compose_draft(&mut self, draft: Note) {
        self.compose = draft;
    }

    /// Resets the compose draft to a blank note.
    pub fn reset_compose(&mut self) {
        self.compose = Note::blank();
    }

    /// Merges a confirmed create result.
    ///
    /// The note is prepended to `notes`, and to `visible_notes` only when it
    /// matches the current filter. A new non-empty taal is appended to the
    /// known taals.
    pub fn apply_created(&mut self, wire: WireNote) -> &Note {
        let note = decode(wire);
        if self.filter.matches(&note) {
            self.visible.insert(0, note.clone());
        }
        self.remember_taal(note.taal.clone());
        self.notes.insert(0, note);
        info!(
            "event=store_apply module=store op=create status=ok notes={} visible={}",
            self.notes.len(),
            self.visible.len()
        );
        &self.notes[0]
    }

    /// Merges a confirmed update result for `id`.
    ///
    /// Every entry keyed by `id` is replaced by the decoded note at the front
    /// of `notes`. In `visible_notes` the old entry is dropped and the new one
    /// is prepended only if it still matches the filter. Edit focus on `id`
    /// is released.
    pub fn apply_updated(&mut self, id: &NoteId, wire: WireNote) -> &Note {
        let mut note = decode(wire);
        if note.id.is_none() {
            note.id = Some(id.clone());
        }

        self.notes.retain(|existing| !existing.has_id(id));
        self.visible.retain(|existing| !existing.has_id(id));
        if self.filter.matches(&note) {
            self.visible.insert(0, note.clone());
        }
        self.remember_taal(note.taal.clone());
        self.notes.insert(0, note);

        if self.focus.editing_id() == Some(id) {
            self.focus = EditFocus::Idle;
        }
        info!(
            "event=store_apply module=store op=update status=ok id={id} notes={} visible={}",
            self.notes.len(),
            self.visible.len()
        );
        &self.notes[0]
    }

    /// Removes `id` from `notes` and `visible_notes`.
    ///
    /// Returns whether anything was removed; removing an absent id is a no-op.
    pub fn apply_removed(&mut self, id: &NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| !note.has_id(id));
        self.visible.retain(|note| !note.has_id(id));
        let removed = self.notes.len() != before;
        info!(
            "event=store_apply module=store op=delete status=ok id={id} removed={removed} notes={}",
            self.notes.len()
        );
        removed
    }

    fn recompute_visible(&mut self) {
        let filter = &self.filter;
        self.visible = self
            .notes
            .iter()
            .filter(|note| filter.matches(note))
            .cloned()
            .collect();
    }

    fn remember_taal(&mut self, taal: String) {
        if !taal.is_empty() && !self.taals.contains(&taal) {
            self.taals.push(taal);
        }
    }
}
