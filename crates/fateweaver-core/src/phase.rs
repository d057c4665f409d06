//! Turn phases and the caller-supplied hint table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The classified category of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Combat,
    Dialogue,
    Negotiation,
    Exploration,
    Rest,
    Recovery,
    Unknown,
}

impl Phase {
    /// Maps an explicit caller-supplied hint to a phase via case-insensitive
    /// substring matching against a fixed keyword table. Hints that match no
    /// table entry return `None`, in which case the caller consults the
    /// language-understanding capability instead.
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<Self> {
        let upper = hint.trim().to_uppercase();
        if upper.is_empty() {
            return None;
        }
        if upper.contains("COMBAT") {
            Some(Self::Combat)
        } else if upper.contains("NEGOTI") {
            Some(Self::Negotiation)
        } else if upper.contains("INFILTRAT") || upper.contains("EXPLOR") {
            Some(Self::Exploration)
        } else if upper.contains("DIALOG") {
            Some(Self::Dialogue)
        } else {
            None
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Combat => "COMBAT",
            Self::Dialogue => "DIALOGUE",
            Self::Negotiation => "NEGOTIATION",
            Self::Exploration => "EXPLORATION",
            Self::Rest => "REST",
            Self::Recovery => "RECOVERY",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}
