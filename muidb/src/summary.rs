//! Aggregate counts over a database, as printed by `muidb info`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    database::Database,
    state::TranslationState,
    types::{OutputFileSpec, TranslationItem},
};

/// Entries per review state. Unknown states land in `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StateCounts {
    pub initial: usize,
    pub translated: usize,
    pub reviewed: usize,
    #[serde(rename = "final")]
    pub final_: usize,
    pub default: usize,
}

impl StateCounts {
    fn add(&mut self, state: &TranslationState) {
        match state {
            TranslationState::Initial => self.initial += 1,
            TranslationState::Translated => self.translated += 1,
            TranslationState::Reviewed => self.reviewed += 1,
            TranslationState::Final => self.final_ += 1,
            TranslationState::Unknown(_) => self.default += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.initial + self.translated + self.reviewed + self.final_ + self.default
    }

    /// `(label, count)` pairs in review order, `default` last.
    pub fn labeled(&self) -> [(&'static str, usize); 5] {
        [
            ("initial", self.initial),
            ("translated", self.translated),
            ("reviewed", self.reviewed),
            ("final", self.final_),
            ("default", self.default),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownStateEntry {
    pub id: String,
    pub lang: String,
    pub state: String,
}

/// Immutable result of one pass over a database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub items: usize,
    pub languages: Vec<String>,
    pub states: StateCounts,
    pub per_language: BTreeMap<String, StateCounts>,
    pub unknown_states: Vec<UnknownStateEntry>,
    pub output_files: Vec<OutputFileSpec>,
}

/// Accumulator threaded through a single pass over the items.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    items: usize,
    languages: BTreeSet<String>,
    states: StateCounts,
    per_language: BTreeMap<String, StateCounts>,
    unknown_states: Vec<UnknownStateEntry>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: &TranslationItem) {
        self.items += 1;
        for (lang, entry) in item.texts() {
            let state = entry.state();
            self.states.add(&state);
            self.per_language
                .entry(lang.clone())
                .or_default()
                .add(&state);
            self.languages.insert(lang.clone());

            if let TranslationState::Unknown(raw) = state {
                self.unknown_states.push(UnknownStateEntry {
                    id: item.id().to_string(),
                    lang: lang.clone(),
                    state: raw,
                });
            }
        }
    }

    pub fn finish(self, output_files: &[OutputFileSpec]) -> Summary {
        Summary {
            items: self.items,
            languages: self.languages.into_iter().collect(),
            states: self.states,
            per_language: self.per_language,
            unknown_states: self.unknown_states,
            output_files: output_files.to_vec(),
        }
    }
}

impl Database {
    pub fn summary(&self) -> Summary {
        let mut builder = SummaryBuilder::new();
        for item in self.items() {
            builder.add_item(item);
        }
        builder.finish(self.output_files())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database() {
        let summary = Database::new().summary();
        assert_eq!(summary.items, 0);
        assert!(summary.languages.is_empty());
        assert_eq!(summary.states.total(), 0);
    }

    #[test]
    fn test_single_resx_style_entry() {
        let mut db = Database::new();
        db.add_or_update_translation("Greeting", "en", "Hello", "initial", None)
            .unwrap();

        let summary = db.summary();
        assert_eq!(summary.items, 1);
        assert_eq!(summary.languages, vec!["en"]);
        assert_eq!(
            summary.states,
            StateCounts {
                initial: 1,
                ..StateCounts::default()
            }
        );
    }

    #[test]
    fn test_unknown_states_counted_as_default() {
        let mut db = Database::new();
        db.add_or_update_translation("a", "en", "A", "final", None)
            .unwrap();
        db.add_or_update_translation("a", "de", "A", "pending-review", None)
            .unwrap();
        db.add_or_update_translation("b", "de", "B", "reviewed", None)
            .unwrap();
        db.add_output_file("Strings.de.resx", "de").unwrap();

        let summary = db.summary();
        assert_eq!(summary.items, 2);
        assert_eq!(summary.languages, vec!["de", "en"]);
        assert_eq!(summary.states.final_, 1);
        assert_eq!(summary.states.reviewed, 1);
        assert_eq!(summary.states.default, 1);
        assert_eq!(summary.per_language["de"].default, 1);
        assert_eq!(summary.per_language["de"].reviewed, 1);
        assert_eq!(
            summary.unknown_states,
            vec![UnknownStateEntry {
                id: "a".to_string(),
                lang: "de".to_string(),
                state: "pending-review".to_string(),
            }]
        );
        assert_eq!(summary.output_files.len(), 1);
    }

    #[test]
    fn test_labeled_order() {
        let labels: Vec<_> = StateCounts::default()
            .labeled()
            .iter()
            .map(|(label, _)| *label)
            .collect();
        assert_eq!(
            labels,
            vec!["initial", "translated", "reviewed", "final", "default"]
        );
    }

    #[test]
    fn test_summary_serializes_final_key() {
        let json = serde_json::to_value(StateCounts::default()).unwrap();
        assert!(json.get("final").is_some());
        assert!(json.get("final_").is_none());
    }
}
