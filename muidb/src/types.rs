//! Core types of the translation database.
//! Format codecs decode into [`ImportRecord`]s; the export engine reads
//! [`TranslationItem`]s.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::state::TranslationState;

/// Translation of one item into one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    value: String,
    state: String,
}

impl TextEntry {
    pub(crate) fn new(value: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            state: state.into(),
        }
    }

    /// The translated text. May be empty while a translation is pending.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The raw state string as it was written.
    pub fn raw_state(&self) -> &str {
        &self.state
    }

    pub fn state(&self) -> TranslationState {
        TranslationState::classify(&self.state)
    }

    pub(crate) fn set(&mut self, value: impl Into<String>, state: impl Into<String>) {
        self.value = value.into();
        self.state = state.into();
    }
}

/// One localizable unit with its per-language texts and shared comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationItem {
    id: String,
    texts: BTreeMap<String, TextEntry>,
    comments: Vec<String>,
}

impl TranslationItem {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            texts: BTreeMap::new(),
            comments: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// All entries of this item keyed by language code, in language order.
    pub fn texts(&self) -> &BTreeMap<String, TextEntry> {
        &self.texts
    }

    pub fn text(&self, lang: &str) -> Option<&TextEntry> {
        self.texts.get(lang)
    }

    pub fn has_language(&self, lang: &str) -> bool {
        self.texts.contains_key(lang)
    }

    /// Accumulated comments, oldest first.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub(crate) fn texts_mut(&mut self) -> &mut BTreeMap<String, TextEntry> {
        &mut self.texts
    }

    pub(crate) fn push_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }
}

impl Display for TranslationItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Item {{ id: {}, languages: [{}], comments: {} }}",
            self.id,
            self.texts.keys().cloned().collect::<Vec<_>>().join(", "),
            self.comments.len()
        )
    }
}

/// A configured export target: one language written to one file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputFileSpec {
    /// File name, relative to the directory of the database file.
    pub name: String,
    /// Language projected into the file.
    pub lang: String,
}

impl OutputFileSpec {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// One `(id, lang, text, state, comment)` tuple read from a source file,
/// ready to be merged into a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub id: String,
    pub lang: String,
    pub text: String,
    pub state: String,
    pub comment: Option<String>,
}

impl ImportRecord {
    pub fn new(
        id: impl Into<String>,
        lang: impl Into<String>,
        text: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            lang: lang.into(),
            text: text.into(),
            state: state.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }
}
