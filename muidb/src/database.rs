//! The [`Database`] aggregate: every translation item plus the configured
//! output files, bound to the file it was loaded from.
//!
//! Items can be read freely but only change through the merge engine
//! ([`Database::add_or_update_translation`], [`Database::add_comment`]); see
//! [`crate::merge`].

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    types::{OutputFileSpec, TextEntry, TranslationItem},
};

/// Irregularities folded away while reading a database file. They are kept
/// until the next verification pass reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadAnomaly {
    /// The same item id appeared in more than one `<item>` element.
    DuplicateItem { id: String },
    /// One item carried more than one text for the same language.
    DuplicateEntry { id: String, lang: String },
}

#[derive(Debug, Clone, Default)]
pub struct Database {
    pub(crate) items: BTreeMap<String, TranslationItem>,
    pub(crate) output_files: Vec<OutputFileSpec>,
    pub(crate) path: Option<PathBuf>,
    pub(crate) load_anomalies: Vec<LoadAnomaly>,
}

/// Structural equality: items, entries, comments and output files. The
/// backing path and pending load anomalies are not part of the content.
impl PartialEq for Database {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.output_files == other.output_files
    }
}

impl Eq for Database {}

impl Database {
    /// Creates an empty database not yet bound to a file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty database that will be saved to `path`.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// The file this database was loaded from or will be saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory against which output file names are resolved.
    pub fn directory(&self) -> PathBuf {
        match self.path.as_deref().and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn item(&self, id: &str) -> Option<&TranslationItem> {
        self.items.get(id)
    }

    /// All items, ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &TranslationItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct language codes used by any entry, sorted.
    pub fn languages(&self) -> BTreeSet<&str> {
        self.items
            .values()
            .flat_map(|item| item.texts().keys().map(String::as_str))
            .collect()
    }

    pub fn output_files(&self) -> &[OutputFileSpec] {
        &self.output_files
    }

    /// Registers an export target. An existing spec with the same `name`
    /// gets its language replaced instead of being duplicated.
    pub fn add_output_file(
        &mut self,
        name: impl Into<String>,
        lang: impl Into<String>,
    ) -> Result<(), Error> {
        let name = name.into();
        let lang = lang.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidRecord("output file name is empty".to_string()));
        }
        if lang.trim().is_empty() {
            return Err(Error::InvalidRecord(format!(
                "output file {} has an empty language",
                name
            )));
        }

        match self.output_files.iter_mut().find(|spec| spec.name == name) {
            Some(spec) => spec.lang = lang,
            None => self.output_files.push(OutputFileSpec::new(name, lang)),
        }
        Ok(())
    }

    /// Resolves an output file name against [`Database::directory`].
    pub fn resolve_output_path(&self, spec: &OutputFileSpec) -> PathBuf {
        self.directory().join(&spec.name)
    }

    /// Pending anomalies from the last load, in document order.
    pub fn load_anomalies(&self) -> &[LoadAnomaly] {
        &self.load_anomalies
    }

    /// Folds one `<item>` read from disk into the database, recording
    /// duplicates instead of failing. Later texts win; comments accumulate.
    pub(crate) fn insert_loaded(
        &mut self,
        id: String,
        texts: Vec<(String, TextEntry)>,
        comments: Vec<String>,
    ) {
        if self.items.contains_key(&id) {
            self.load_anomalies
                .push(LoadAnomaly::DuplicateItem { id: id.clone() });
        }
        let item = self
            .items
            .entry(id.clone())
            .or_insert_with(|| TranslationItem::new(id.clone()));

        for (lang, entry) in texts {
            if item.texts_mut().insert(lang.clone(), entry).is_some() {
                self.load_anomalies.push(LoadAnomaly::DuplicateEntry {
                    id: id.clone(),
                    lang,
                });
            }
        }
        for comment in comments {
            item.push_comment(comment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_of_unbound_database() {
        assert_eq!(Database::new().directory(), PathBuf::from("."));
    }

    #[test]
    fn test_directory_of_relative_file() {
        assert_eq!(
            Database::with_path("strings.muidb").directory(),
            PathBuf::from(".")
        );
        assert_eq!(
            Database::with_path("res/strings.muidb").directory(),
            PathBuf::from("res")
        );
    }

    #[test]
    fn test_add_output_file_replaces_same_name() {
        let mut db = Database::new();
        db.add_output_file("Strings.resx", "en").unwrap();
        db.add_output_file("Strings.de.resx", "de").unwrap();
        db.add_output_file("Strings.resx", "en-US").unwrap();

        assert_eq!(
            db.output_files(),
            [
                OutputFileSpec::new("Strings.resx", "en-US"),
                OutputFileSpec::new("Strings.de.resx", "de"),
            ]
        );
    }

    #[test]
    fn test_add_output_file_rejects_empty_fields() {
        let mut db = Database::new();
        assert!(db.add_output_file("", "en").is_err());
        assert!(db.add_output_file("a.resx", " ").is_err());
        assert!(db.output_files().is_empty());
    }

    #[test]
    fn test_resolve_output_path() {
        let db = Database::with_path("/work/l10n/app.muidb");
        let spec = OutputFileSpec::new("Strings.de.resx", "de");
        assert_eq!(
            db.resolve_output_path(&spec),
            PathBuf::from("/work/l10n/Strings.de.resx")
        );
    }

    #[test]
    fn test_insert_loaded_folds_duplicates() {
        let mut db = Database::new();
        db.insert_loaded(
            "a".to_string(),
            vec![
                ("en".to_string(), TextEntry::new("first", "initial")),
                ("en".to_string(), TextEntry::new("second", "final")),
            ],
            vec!["one".to_string()],
        );
        db.insert_loaded(
            "a".to_string(),
            vec![("de".to_string(), TextEntry::new("zwei", "translated"))],
            vec!["two".to_string()],
        );

        let item = db.item("a").unwrap();
        assert_eq!(item.text("en").unwrap().value(), "second");
        assert_eq!(item.text("de").unwrap().value(), "zwei");
        assert_eq!(item.comments(), ["one", "two"]);
        assert_eq!(
            db.load_anomalies(),
            [
                LoadAnomaly::DuplicateEntry {
                    id: "a".to_string(),
                    lang: "en".to_string()
                },
                LoadAnomaly::DuplicateItem { id: "a".to_string() },
            ]
        );
    }

    #[test]
    fn test_languages_are_distinct_and_sorted() {
        let mut db = Database::new();
        db.insert_loaded(
            "a".to_string(),
            vec![
                ("fr".to_string(), TextEntry::new("", "initial")),
                ("de".to_string(), TextEntry::new("", "initial")),
            ],
            vec![],
        );
        db.insert_loaded(
            "b".to_string(),
            vec![("de".to_string(), TextEntry::new("", "initial"))],
            vec![],
        );
        assert_eq!(db.languages().into_iter().collect::<Vec<_>>(), ["de", "fr"]);
    }

    #[test]
    fn test_equality_ignores_path() {
        assert_eq!(Database::new(), Database::with_path("x.muidb"));
    }
}
