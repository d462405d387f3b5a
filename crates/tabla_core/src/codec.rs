//! Wire <-> canonical note conversion.
//!
//! # Responsibility
//! - Serialize Composite content into the single wire `content` string.
//! - Parse wire `content` back into split Composite fields.
//!
//! # Invariants
//! - `decode(encode(note))` reproduces `main`, `tehai` and `bals` exactly.
//! - Decoding never fails: unparsable Composite content becomes empty fields,
//!   and a wrongly typed field falls back to its own empty value.
//! - Simple content passes through untouched in both directions.

use crate::model::note::{CompositeContent, ContentLayout, Note, NoteContent, WireNote};
use log::debug;
use serde_json::Value;

/// Converts a canonical note into its wire shape.
pub fn encode(note: &Note) -> WireNote {
    let layout = note.structure.layout();
    let content = match note.content.clone().reshape(layout) {
        NoteContent::Simple(text) => text,
        NoteContent::Composite(composite) => encode_composite(&composite),
    };

    WireNote {
        id: note.id.clone(),
        title: note.title.clone(),
        taal: note.taal.clone(),
        structure: note.structure.clone(),
        content,
        owner: note.owner.clone(),
        date_modified: note.date_modified.clone(),
    }
}

/// Converts a wire note into the canonical shape.
///
/// Composite content that is not a JSON object of the expected shape is
/// replaced by empty fields.
pub fn decode(wire: WireNote) -> Note {
    let content = match wire.structure.layout() {
        ContentLayout::Simple => NoteContent::Simple(wire.content),
        ContentLayout::Composite => {
            let composite = decode_composite(&wire.content).unwrap_or_else(|| {
                debug!(
                    "event=content_decode module=codec status=fallback structure={} id={}",
                    wire.structure,
                    wire.id
                        .as_ref()
                        .map_or_else(|| "none".to_string(), ToString::to_string)
                );
                CompositeContent::default()
            });
            NoteContent::Composite(composite)
        }
    };

    Note {
        id: wire.id,
        title: wire.title,
        taal: wire.taal,
        structure: wire.structure,
        content,
        owner: wire.owner,
        date_modified: wire.date_modified,
    }
}

/// Serializes Composite fields as `{"main", "tehai", "bals"}`.
pub fn encode_composite(composite: &CompositeContent) -> String {
    serde_json::json!({
        "main": composite.main,
        "tehai": composite.tehai,
        "bals": composite.bals,
    })
    .to_string()
}

/// Parses Composite fields, returning `None` when `raw` is not a JSON object.
///
/// Each field is read on its own: a missing or wrongly typed `main` or
/// `tehai` becomes `""`, a missing or non-array `bals` becomes `[]`, and a
/// non-string bal entry becomes `""` so the remaining bals keep their slots.
pub fn decode_composite(raw: &str) -> Option<CompositeContent> {
    let Value::Object(fields) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let bals: Vec<String> = fields
        .get("bals")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| entry.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();

    Some(CompositeContent::new(text("main"), text("tehai"), bals))
}
