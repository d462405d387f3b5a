//! Taal filter selection.

use crate::model::note::Note;
use std::fmt::{Display, Formatter};

/// Sentinel label selecting every taal.
pub const ALL_TAALS: &str = "All";

/// Current taal filter of the note list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaalFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on `Note::taal`.
    Taal(String),
}

impl TaalFilter {
    /// Maps the `"All"` sentinel to `TaalFilter::All`; any other label is literal.
    pub fn parse(label: &str) -> Self {
        if label == ALL_TAALS {
            Self::All
        } else {
            Self::Taal(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_TAALS,
            Self::Taal(taal) => taal.as_str(),
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::Taal(taal) => note.taal == *taal,
        }
    }
}

impl Display for TaalFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for TaalFilter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::TaalFilter;
    use crate::model::note::{Note, Structure};

    #[test]
    fn filter_matches_exact_case_sensitive_taal() {
        let note = Note::draft("A", "Teentaal", Structure::Theka);
        assert!(TaalFilter::parse("All").matches(&note));
        assert!(TaalFilter::parse("Teentaal").matches(&note));
        assert!(!TaalFilter::parse("teentaal").matches(&note));
        assert!(!TaalFilter::parse("Teentaal ").matches(&note));
    }
}
