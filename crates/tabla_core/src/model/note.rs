//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its composition `Structure`.
//! - Define the wire record exchanged with the backend.
//! - Reshape content when a draft switches between content layouts.
//!
//! # Invariants
//! - `Structure` alone decides whether content is Simple or Composite.
//! - `bals` preserve insertion order and may repeat or be empty.
//! - Unknown structure labels round-trip verbatim and behave as Simple.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identifier assigned by the backend.
///
/// The backend may emit numeric or text ids; both are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for RemoteId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RemoteId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RemoteId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Stable note identifier.
pub type NoteId = RemoteId;
/// Reference to the user who created a note.
pub type OwnerId = RemoteId;

/// Compositional form of a note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Structure {
    Theka,
    Peshkar,
    Kaida,
    Rela,
    Mukhda,
    Chakradhar,
    /// Any label outside the fixed set, including the empty draft value.
    Other(String),
}

/// Content layout selected by a `Structure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLayout {
    /// One free-text `content` field.
    Simple,
    /// `main`, `tehai` and an ordered list of `bals`.
    Composite,
}

impl Structure {
    /// Every recognized structure, in form display order.
    pub const ALL: [Structure; 6] = [
        Structure::Theka,
        Structure::Peshkar,
        Structure::Kaida,
        Structure::Rela,
        Structure::Mukhda,
        Structure::Chakradhar,
    ];

    /// Parses a wire label. Matching is exact; anything else is `Other`.
    pub fn parse(value: &str) -> Self {
        match value {
            "theka" => Self::Theka,
            "peshkar" => Self::Peshkar,
            "kaida" => Self::Kaida,
            "rela" => Self::Rela,
            "mukhda" => Self::Mukhda,
            "chakradhar" => Self::Chakradhar,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Theka => "theka",
            Self::Peshkar => "peshkar",
            Self::Kaida => "kaida",
            Self::Rela => "rela",
            Self::Mukhda => "mukhda",
            Self::Chakradhar => "chakradhar",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn layout(&self) -> ContentLayout {
        match self {
            Self::Peshkar | Self::Kaida | Self::Rela => ContentLayout::Composite,
            Self::Theka | Self::Mukhda | Self::Chakradhar | Self::Other(_) => ContentLayout::Simple,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.layout() == ContentLayout::Composite
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Display for Structure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Structure {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<Structure> for String {
    fn from(value: Structure) -> Self {
        match value {
            Structure::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Split fields of a Composite note (`peshkar`, `kaida`, `rela`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub main: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tehai: String,
    /// Ordered sub-phrases; order is significant.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bals: Vec<String>,
}

impl CompositeContent {
    pub fn new(main: impl Into<String>, tehai: impl Into<String>, bals: Vec<String>) -> Self {
        Self {
            main: main.into(),
            tehai: tehai.into(),
            bals,
        }
    }
}

/// Note content, tagged by layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteContent {
    Simple(String),
    Composite(CompositeContent),
}

impl NoteContent {
    /// Empty content for the layout of `structure`.
    pub fn empty_for(structure: &Structure) -> Self {
        match structure.layout() {
            ContentLayout::Simple => Self::Simple(String::new()),
            ContentLayout::Composite => Self::Composite(CompositeContent::default()),
        }
    }

    pub fn layout(&self) -> ContentLayout {
        match self {
            Self::Simple(_) => ContentLayout::Simple,
            Self::Composite(_) => ContentLayout::Composite,
        }
    }

    /// Converts content into `layout`.
    ///
    /// Free text is carried between `content` and `main`; `tehai` and `bals`
    /// are dropped when leaving the Composite layout.
    pub fn reshape(self, layout: ContentLayout) -> Self {
        match (self, layout) {
            (Self::Simple(text), ContentLayout::Composite) => Self::Composite(CompositeContent {
                main: text,
                ..CompositeContent::default()
            }),
            (Self::Composite(composite), ContentLayout::Simple) => Self::Simple(composite.main),
            (unchanged, _) => unchanged,
        }
    }

    pub fn as_simple(&self) -> Option<&str> {
        match self {
            Self::Simple(text) => Some(text.as_str()),
            Self::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeContent> {
        match self {
            Self::Simple(_) => None,
            Self::Composite(composite) => Some(composite),
        }
    }
}

/// Canonical in-memory note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Backend-assigned id; `None` on unsaved drafts.
    pub id: Option<NoteId>,
    pub title: String,
    /// Free-text category label used for filtering. May be empty.
    pub taal: String,
    pub structure: Structure,
    /// Shape always follows `structure.layout()`.
    pub content: NoteContent,
    /// Notes without an owner are read-only for every client.
    pub owner: Option<OwnerId>,
    /// Set by the backend on write; kept verbatim.
    pub date_modified: Option<String>,
}

impl Note {
    /// Creates an unsaved draft with empty content for `structure`.
    pub fn draft(title: impl Into<String>, taal: impl Into<String>, structure: Structure) -> Self {
        let content = NoteContent::empty_for(&structure);
        Self {
            id: None,
            title: title.into(),
            taal: taal.into(),
            structure,
            content,
            owner: None,
            date_modified: None,
        }
    }

    /// Empty draft used to reset the compose form.
    pub fn blank() -> Self {
        Self::draft("", "", Structure::default())
    }

    pub fn with_content(mut self, content: NoteContent) -> Self {
        self.content = content.reshape(self.structure.layout());
        self
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_read_only(&self) -> bool {
        self.owner.is_none()
    }

    pub fn has_id(&self, id: &NoteId) -> bool {
        self.id.as_ref() == Some(id)
    }

    /// Switches the structure and reshapes content to the new layout.
    pub fn set_structure(&mut self, structure: Structure) {
        let content = std::mem::replace(&mut self.content, NoteContent::Simple(String::new()));
        self.content = content.reshape(structure.layout());
        self.structure = structure;
    }
}

/// Backend-facing note shape.
///
/// Composite content travels as a JSON object string inside `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub taal: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub structure: Structure,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerId>,
    #[serde(
        rename = "dateModified",
        alias = "date_modified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_modified: Option<String>,
}

/// Treats an explicit JSON `null` like an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{CompositeContent, ContentLayout, Note, NoteContent, RemoteId, Structure, WireNote};

    #[test]
    fn structure_classifies_layouts() {
        for structure in [Structure::Peshkar, Structure::Kaida, Structure::Rela] {
            assert_eq!(structure.layout(), ContentLayout::Composite);
        }
        for structure in [Structure::Theka, Structure::Mukhda, Structure::Chakradhar] {
            assert_eq!(structure.layout(), ContentLayout::Simple);
        }
        assert_eq!(Structure::parse("Kaida").layout(), ContentLayout::Simple);
        assert_eq!(Structure::parse("").layout(), ContentLayout::Simple);
    }

    #[test]
    fn unknown_structure_round_trips_verbatim() {
        let structure = Structure::parse("tukra");
        assert!(!structure.is_recognized());
        assert_eq!(String::from(structure), "tukra");
    }

    #[test]
    fn set_structure_carries_main_text_across_layouts() {
        let mut note = Note::draft("t", "Teentaal", Structure::Kaida).with_content(
            NoteContent::Composite(CompositeContent::new(
                "dha dha tit",
                "dha -- dha",
                vec!["ti ra ki ta".to_string()],
            )),
        );

        note.set_structure(Structure::Theka);
        assert_eq!(note.content, NoteContent::Simple("dha dha tit".to_string()));

        note.set_structure(Structure::Rela);
        assert_eq!(
            note.content,
            NoteContent::Composite(CompositeContent::new("dha dha tit", "", Vec::new()))
        );
    }

    #[test]
    fn wire_note_accepts_numeric_ids_nulls_and_snake_case_timestamp() {
        let wire: WireNote = serde_json::from_str(
            r#"{"id":7,"title":"A","taal":null,"structure":"theka","content":"dha","date_modified":"Mon, 01 Jan 2024 00:00:00 GMT"}"#,
        )
        .unwrap();
        assert_eq!(wire.id, Some(RemoteId::Number(7)));
        assert_eq!(wire.taal, "");
        assert_eq!(wire.structure, Structure::Theka);
        assert_eq!(
            wire.date_modified.as_deref(),
            Some("Mon, 01 Jan 2024 00:00:00 GMT")
        );
        assert_eq!(wire.owner, None);
    }

    #[test]
    fn draft_wire_note_omits_id_when_serialized() {
        let wire = WireNote {
            title: "A".to_string(),
            structure: Structure::Mukhda,
            ..WireNote::default()
        };
        let value = serde_json::to_value(&wire).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["structure"], "mukhda");
    }
}
