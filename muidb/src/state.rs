//! Review states of a translation.
//!
//! States are stored as raw strings so that values written by other tools
//! survive a load/save cycle. Reporting code classifies them through
//! [`TranslationState::classify`] instead of comparing strings.

use std::fmt::Display;

/// State given to entries imported from sources that carry no state.
pub const DEFAULT_STATE: &str = "initial";

/// Review confidence of a [`crate::types::TextEntry`].
///
/// The four known states are ordered `initial < translated < reviewed < final`.
/// The ordering is informational only: imports may write any state over any
/// other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TranslationState {
    Initial,
    Translated,
    Reviewed,
    Final,
    /// Any value outside the four known states, kept verbatim.
    Unknown(String),
}

impl TranslationState {
    /// Classifies a raw state string. Matching is exact and case-sensitive.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "initial" => TranslationState::Initial,
            "translated" => TranslationState::Translated,
            "reviewed" => TranslationState::Reviewed,
            "final" => TranslationState::Final,
            other => TranslationState::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TranslationState::Initial => "initial",
            TranslationState::Translated => "translated",
            TranslationState::Reviewed => "reviewed",
            TranslationState::Final => "final",
            TranslationState::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TranslationState::Unknown(_))
    }

    /// Position in the review order, `None` for unknown states.
    pub fn rank(&self) -> Option<u8> {
        match self {
            TranslationState::Initial => Some(0),
            TranslationState::Translated => Some(1),
            TranslationState::Reviewed => Some(2),
            TranslationState::Final => Some(3),
            TranslationState::Unknown(_) => None,
        }
    }

    /// True once a translator has supplied text (translated or later).
    pub fn is_translated(&self) -> bool {
        self.rank().is_some_and(|rank| rank >= 1)
    }
}

impl Display for TranslationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for TranslationState {
    fn from(raw: &str) -> Self {
        TranslationState::classify(raw)
    }
}
