//! Whole-database consistency pass.
//!
//! Policy:
//! - Unknown states are reported and left untouched.
//! - Duplicates folded while loading are reported once, then forgotten, so
//!   the next save writes a clean file.
//! - Output files configured twice under the same name collapse to the last
//!   occurrence.
//! - Items missing a configured output language and translated entries with
//!   an empty value are reported only.
//!
//! Nothing is ever removed from an item. Running the pass twice leaves the
//! database as after the first run.

use std::{collections::BTreeSet, fmt::Display};

use log::{debug, info};
use serde::Serialize;

use crate::database::{Database, LoadAnomaly};

/// One finding of the verification pass.
///
/// Variant order is the report order; within a variant, issues sort by id
/// and language.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    DuplicateItem { id: String },
    DuplicateEntry { id: String, lang: String },
    DuplicateOutputFile { name: String },
    UnknownState { id: String, lang: String, state: String },
    MissingOutputLanguage { id: String, lang: String },
    EmptyValue { id: String, lang: String },
}

impl Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::DuplicateItem { id } => {
                write!(f, "item {} was stored more than once; merged", id)
            }
            Issue::DuplicateEntry { id, lang } => {
                write!(f, "item {} had several [{}] texts; kept the last", id, lang)
            }
            Issue::DuplicateOutputFile { name } => {
                write!(f, "output file {} was configured more than once", name)
            }
            Issue::UnknownState { id, lang, state } => {
                write!(f, "item {} [{}] has unknown state '{}'", id, lang, state)
            }
            Issue::MissingOutputLanguage { id, lang } => {
                write!(f, "item {} has no [{}] text for an output file", id, lang)
            }
            Issue::EmptyValue { id, lang } => {
                write!(f, "item {} [{}] is marked translated but empty", id, lang)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VerifyReport {
    pub items_checked: usize,
    pub entries_checked: usize,
    pub issues: Vec<Issue>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn unknown_states(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, Issue::UnknownState { .. }))
    }
}

impl Database {
    /// Runs the consistency pass, normalizing what it can. The caller is
    /// responsible for saving the result.
    pub fn verify(&mut self) -> VerifyReport {
        let mut report = VerifyReport::default();

        for anomaly in self.load_anomalies.drain(..) {
            report.issues.push(match anomaly {
                LoadAnomaly::DuplicateItem { id } => Issue::DuplicateItem { id },
                LoadAnomaly::DuplicateEntry { id, lang } => Issue::DuplicateEntry { id, lang },
            });
        }

        let mut seen_names = BTreeSet::new();
        let mut kept = Vec::with_capacity(self.output_files.len());
        for spec in self.output_files.drain(..).rev() {
            if seen_names.insert(spec.name.clone()) {
                kept.push(spec);
            } else {
                report
                    .issues
                    .push(Issue::DuplicateOutputFile { name: spec.name });
            }
        }
        kept.reverse();
        self.output_files = kept;

        let output_langs: BTreeSet<String> = self
            .output_files
            .iter()
            .map(|spec| spec.lang.clone())
            .collect();

        for item in self.items.values() {
            report.items_checked += 1;
            for (lang, entry) in item.texts() {
                report.entries_checked += 1;
                let state = entry.state();
                if !state.is_known() {
                    report.issues.push(Issue::UnknownState {
                        id: item.id().to_string(),
                        lang: lang.clone(),
                        state: entry.raw_state().to_string(),
                    });
                } else if state.is_translated() && entry.value().is_empty() {
                    report.issues.push(Issue::EmptyValue {
                        id: item.id().to_string(),
                        lang: lang.clone(),
                    });
                }
            }
            for lang in &output_langs {
                if !item.has_language(lang) {
                    report.issues.push(Issue::MissingOutputLanguage {
                        id: item.id().to_string(),
                        lang: lang.clone(),
                    });
                }
            }
        }

        report.issues.sort();
        report.issues.dedup();
        for issue in &report.issues {
            debug!("{}", issue);
        }
        info!(
            "Verified {} items, {} entries: {} issue(s)",
            report.items_checked,
            report.entries_checked,
            report.issues.len()
        );
        report
    }
}
