//! The merge/import engine.
//!
//! Rules:
//! - An unseen `(id, lang)` pair is created and reported as added.
//! - An existing pair is overwritten and reported as updated, even when the
//!   incoming text and state equal the stored ones.
//! - States are stored as given; any state may replace any other.
//! - A non-empty comment is appended to the item's comments.
//! - Imports are not transactional: records merged before a failing record
//!   stay merged.

use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::{
    database::Database,
    error::Error,
    formats::FormatType,
    types::{ImportRecord, TextEntry, TranslationItem},
};

/// What a single merge did to its `(id, lang)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Added,
    Updated,
}

/// Ids touched by an import, split into added and updated pairs.
///
/// An id appears once per language it was merged in, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImportResult {
    pub added: Vec<String>,
    pub updated: Vec<String>,
}

impl ImportResult {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    /// Number of pairs processed.
    pub fn total(&self) -> usize {
        self.added.len() + self.updated.len()
    }

    pub fn record(&mut self, id: &str, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Added => self.added.push(id.to_string()),
            MergeOutcome::Updated => self.updated.push(id.to_string()),
        }
    }
}

impl Database {
    /// Adds or overwrites the translation of `id` into `lang`.
    ///
    /// Creates the item when it does not exist yet. Empty ids and languages
    /// are rejected without touching the database.
    pub fn add_or_update_translation(
        &mut self,
        id: &str,
        lang: &str,
        text: &str,
        state: &str,
        comment: Option<&str>,
    ) -> Result<MergeOutcome, Error> {
        if id.is_empty() {
            return Err(Error::InvalidRecord("translation id is empty".to_string()));
        }
        if lang.is_empty() {
            return Err(Error::InvalidRecord(format!(
                "translation {} has an empty language",
                id
            )));
        }

        let item = self
            .items
            .entry(id.to_string())
            .or_insert_with(|| TranslationItem::new(id));

        let outcome = match item.texts_mut().get_mut(lang) {
            Some(entry) => {
                entry.set(text, state);
                MergeOutcome::Updated
            }
            None => {
                item.texts_mut()
                    .insert(lang.to_string(), TextEntry::new(text, state));
                MergeOutcome::Added
            }
        };

        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            item.push_comment(comment);
        }

        debug!("{:?} {} [{}] state={}", outcome, id, lang, state);
        Ok(outcome)
    }

    /// Appends a comment to an existing item. Empty comments are ignored.
    pub fn add_comment(&mut self, id: &str, comment: &str) -> Result<(), Error> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| Error::InvalidRecord(format!("no item with id {}", id)))?;
        if !comment.is_empty() {
            item.push_comment(comment);
        }
        Ok(())
    }

    /// Merges a batch of records in order.
    pub fn import_records<I>(&mut self, records: I) -> Result<ImportResult, Error>
    where
        I: IntoIterator<Item = ImportRecord>,
    {
        let mut result = ImportResult::default();
        for record in records {
            let outcome = self.add_or_update_translation(
                &record.id,
                &record.lang,
                &record.text,
                &record.state,
                record.comment.as_deref(),
            )?;
            result.record(&record.id, outcome);
        }
        Ok(result)
    }

    /// Reads `path` as `format` and merges its contents in `lang`.
    ///
    /// The source is parsed completely before anything is merged, so a
    /// malformed file leaves the database untouched.
    pub fn import_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: FormatType,
        lang: &str,
    ) -> Result<ImportResult, Error> {
        let path = path.as_ref();
        let records = format.read_records(path, lang)?;
        let result = self.import_records(records)?;
        info!(
            "Imported {} as {} [{}]: {} added, {} updated",
            path.display(),
            format,
            lang,
            result.added_count(),
            result.updated_count()
        );
        Ok(result)
    }
}
